pub mod health;
pub mod predict;

use std::sync::Arc;

use axum::Router;

use crate::AppState;

/// Build the full route table.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(health::router())
        .merge(predict::router(state))
}
