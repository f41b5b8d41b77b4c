//! Lexmem HTTP Server
//!
//! Thin axum layer over the `lexmem-core` scheduling engine. Routing,
//! identity extraction, and JSON mapping live here; every scheduling
//! decision is made by the core crate. The asynchronous explanation
//! generator also lives here, as a detached best-effort task.

pub mod config;
pub mod explain;
pub mod handlers;
pub mod state;

use axum::routing::{get, patch, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/words",
            post(handlers::words::create_word).get(handlers::words::list_words),
        )
        .route(
            "/words/{id}",
            get(handlers::words::get_word).delete(handlers::words::delete_word),
        )
        .route("/words/{id}/confidence", patch(handlers::words::set_confidence))
        .route("/reviews", post(handlers::reviews::submit_review))
        .route("/sessions", post(handlers::sessions::start_session))
        .route("/sessions/{id}/current", get(handlers::sessions::current_item))
        .route("/sessions/{id}/advance", post(handlers::sessions::advance_session))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
