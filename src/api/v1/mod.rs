//! Versioned chain API endpoints

pub mod chain;

use axum::{routing::post, Router};

use super::state::AppState;

/// Create v1 API router
pub fn create_v1_router() -> Router<AppState> {
    Router::new().route("/chain", post(chain::run_chain))
}
