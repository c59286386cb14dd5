//! MT Photos CLIP client.

use photo_bridge_common::{ClipResult, ClipTextRequest};
use reqwest::Client;

use super::{image_form, read_json, API_KEY_HEADER};
use crate::error::{Error, Result};
use crate::pipeline::ImageUpload;

/// Client for `POST {base}/clip/txt` and `POST {base}/clip/img`.
pub struct ClipClient {
    http_client: Client,
    base_url: String,
    api_key: String,
}

impl ClipClient {
    pub fn new(http_client: Client, base_url: &str, api_key: &str) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Embed a search query.
    pub async fn encode_text(&self, request: &ClipTextRequest) -> Result<ClipResult> {
        let url = format!("{}/clip/txt", self.base_url);

        tracing::debug!("Sending CLIP text request: {}", url);

        let response = self
            .http_client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| Error::Downstream(e.to_string()))?;

        read_json(response).await
    }

    /// Embed an image.
    pub async fn encode_image(&self, image: &ImageUpload) -> Result<ClipResult> {
        let url = format!("{}/clip/img", self.base_url);

        tracing::debug!(
            "Sending CLIP image request: {} file={} size={}",
            url,
            image.filename,
            image.data.len()
        );

        let response = self
            .http_client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .multipart(image_form(image)?)
            .send()
            .await
            .map_err(|e| Error::Downstream(e.to_string()))?;

        read_json(response).await
    }
}
