use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::api::FaultPolicy;

/// Top-level application configuration loaded from file + environment.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingSection,
    pub catalog: CatalogSection,
    pub diagnostic: DiagnosticSection,
}

impl AppConfig {
    /// Load configuration from disk and environment.
    pub fn load() -> Result<Self> {
        let config_path = env::var("SEGMOCK_CONFIG").unwrap_or_else(|_| "segmock.toml".to_string());
        Self::load_from(config_path)
    }

    /// Load configuration from the given file (if present) layered under
    /// `SEGMOCK_*` environment variables.
    pub fn load_from(config_path: impl AsRef<Path>) -> Result<Self> {
        let config_path = config_path.as_ref();
        let mut builder = config::Config::builder();

        if config_path.exists() {
            builder = builder.add_source(config::File::from(config_path.to_path_buf()));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("SEGMOCK")
                .separator("_")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| format!("reading configuration from {}", config_path.display()))?;
        let mut config: Self = settings.try_deserialize()?;

        if config.logging.level.trim().is_empty() {
            config.logging.level = "info".to_string();
        }

        Ok(config)
    }

    /// Logging settings used by the diagnostic wrapper: debug level, console
    /// plus the configured log file.
    pub fn diagnostic_logging(&self) -> LoggingSection {
        LoggingSection {
            level: "debug".to_string(),
            format: self.logging.format.clone(),
            file: Some(self.diagnostic.logfile.clone()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8001,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub level: String,
    pub format: LogFormat,
    /// Optional file receiving a copy of every log line
    pub file: Option<String>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
            file: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Text,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct CatalogSection {
    /// JSON catalog to serve instead of the built-in one
    pub path: Option<String>,
}

/// Settings for the `segmock-debug` wrapper
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DiagnosticSection {
    pub host: String,
    pub port: u16,
    /// Directory holding the wrapped application's files
    pub root: String,
    /// Catalog file name, resolved against `root`
    pub catalog: String,
    pub logfile: String,
    /// Embed panic traces in 500 responses
    pub traces: bool,
}

impl DiagnosticSection {
    pub fn catalog_path(&self) -> PathBuf {
        Path::new(&self.root).join(&self.catalog)
    }

    pub fn fault_policy(&self) -> FaultPolicy {
        if self.traces {
            FaultPolicy::Expose
        } else {
            FaultPolicy::Conceal
        }
    }
}

impl Default for DiagnosticSection {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            root: ".".to_string(),
            catalog: "catalog.json".to_string(),
            logfile: "debug.log".to_string(),
            traces: true,
        }
    }
}
