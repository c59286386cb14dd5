//! photo-bridge gateway
//!
//! Serves the Immich machine-learning `/predict` API. OCR and CLIP requests
//! are translated to MT Photos AI calls; everything else is proxied to a real
//! Immich ML instance.

pub mod auth;
pub mod config;
pub mod downstream;
pub mod error;
pub mod healthcheck;
pub mod pipeline;
pub mod routes;
pub mod state;

pub use config::Config;
pub use error::{Error, Result};
pub use state::AppState;

use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;

/// Build the application with request tracing.
pub fn app(state: Arc<AppState>) -> Router {
    routes::router(state).layer(TraceLayer::new_for_http())
}
