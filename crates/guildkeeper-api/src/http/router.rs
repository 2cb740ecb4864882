//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/`.
//! Middleware: CORS, request tracing.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Wizard lifecycle
        .route("/wizard/begin", post(handlers::wizard::begin))
        .route("/wizard/edit", post(handlers::wizard::begin_edit))
        .route("/wizard/select", post(handlers::wizard::submit_selection))
        .route("/wizard/form", post(handlers::wizard::submit_form))
        .route("/wizard/back", post(handlers::wizard::back))
        .route("/wizard/cancel", post(handlers::wizard::cancel))
        // Timezone helpers for the presentation layer
        .route("/timezone/suggest", get(handlers::timezone::suggest))
        .route("/timezone/regions", get(handlers::timezone::regions))
        // Liveness
        .route("/healthz", get(handlers::health::healthz))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
