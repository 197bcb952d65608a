//! HTTP API server

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod error;
pub mod extract;
pub mod fault;
pub mod handlers;
pub mod state;

pub use error::ApiError;
pub use extract::ValidJson;
pub use fault::{catch_panic_layer, Fault, FaultPolicy};
pub use state::AppState;

/// Build the API router using the provided application state.
///
/// Panics escaping a handler are turned into 500 responses according to the
/// state's fault policy.
pub fn create_router(state: AppState) -> Router {
    create_router_with(state, Router::new())
}

/// Like [`create_router`], with `extra` routes mounted behind the same
/// fault boundary, tracing and CORS layers.
pub fn create_router_with(state: AppState, extra: Router<AppState>) -> Router {
    let policy = state.fault_policy;

    Router::new()
        .route("/", get(handlers::root))
        .nest(
            "/api/segment",
            Router::new()
                .route("/comprehensive", post(handlers::comprehensive))
                .route("/:kind", post(handlers::specific)),
        )
        .merge(extra)
        .with_state(state)
        .layer(catch_panic_layer(policy))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
}
