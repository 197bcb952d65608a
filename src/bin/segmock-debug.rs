//! Diagnostic wrapper: serves a catalog-backed app with debug logging and
//! panic traces in 500 responses.

use std::process::ExitCode;

use anyhow::Context;

use segmock::config::AppConfig;
use segmock::diagnostics::bootstrap;
use segmock::logging::init_tracing;
use segmock::server::serve;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let config = AppConfig::load().context("failed to load configuration")?;

    init_tracing(&config.diagnostic_logging())?;

    let router = match bootstrap(&config.diagnostic) {
        Ok(router) => router,
        Err(err) => {
            eprintln!("{}", err);
            tracing::error!(error = ?err, "Startup failed");
            return Ok(ExitCode::FAILURE);
        }
    };

    tracing::info!("Starting server with detailed error logging...");
    serve(router, &config.diagnostic.host, config.diagnostic.port).await?;

    Ok(ExitCode::SUCCESS)
}
