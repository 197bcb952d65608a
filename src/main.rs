//! segmock server binary

use std::sync::Arc;

use anyhow::Context;

use segmock::api::{create_router, AppState, FaultPolicy};
use segmock::catalog::Catalog;
use segmock::config::AppConfig;
use segmock::logging::init_tracing;
use segmock::server::serve;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;

    init_tracing(&config.logging)?;

    let catalog = match &config.catalog.path {
        Some(path) => {
            tracing::info!(%path, "Loading catalog from file");
            Catalog::load(path).with_context(|| format!("failed to load catalog {}", path))?
        }
        None => Catalog::builtin(),
    };

    let router = create_router(AppState::new(Arc::new(catalog), FaultPolicy::Conceal));

    tracing::info!(
        host = %config.server.host,
        port = config.server.port,
        "Starting mock segmentation server"
    );

    serve(router, &config.server.host, config.server.port).await
}
