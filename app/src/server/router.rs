use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::app::SharedState;
use super::handlers;

/// Create the axum router: liveness at `/`, redirect at `/<short path>`.
pub fn create_router(state: SharedState) -> Router {
    let redirect_route = format!("/{}", state.redirect_path());
    Router::new()
        .route("/", get(handlers::root))
        .route(&redirect_route, get(handlers::redirect))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
