pub mod health;
pub mod pipeline;

use axum::{routing::get, routing::post, Router};
use std::sync::Arc;

use crate::app::AppState;

/// Build the API router with all routes
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health_check))
        // Pipeline operations
        .route("/chat/message", post(pipeline::process_message))
        .route("/chat/confirm", post(pipeline::confirm_details))
        .route("/chat/context/complete", post(pipeline::complete_context))
        .route("/chat/generate", post(pipeline::generate_outfits))
        .route("/chat/reset", post(pipeline::reset))
        // Session inspection
        .route("/chat/sessions/:session_id", get(pipeline::get_session))
        .route("/chat/sessions/:session_id/stage", get(pipeline::get_stage))
}
