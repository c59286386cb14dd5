//! Shared application state.

use reqwest::Client;

use crate::config::Config;
use crate::downstream::{ClipClient, InferenceClient, OcrClient};

/// Shared application state passed to all handlers. Nothing in here changes
/// after startup.
pub struct AppState {
    pub config: Config,
    pub ocr_client: OcrClient,
    pub clip_client: ClipClient,
    pub inference_client: InferenceClient,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        // One connection pool for every downstream service.
        let http_client = Client::new();

        Self {
            ocr_client: OcrClient::new(
                http_client.clone(),
                &config.mt_photos_api,
                &config.mt_photos_api_key,
            ),
            clip_client: ClipClient::new(
                http_client.clone(),
                &config.mt_photos_api,
                &config.mt_photos_api_key,
            ),
            inference_client: InferenceClient::new(http_client, &config.immich_api),
            config,
        }
    }
}
