//! MT Photos OCR client.

use photo_bridge_common::{OcrResponse, OcrResult};
use reqwest::Client;

use super::{image_form, read_json, API_KEY_HEADER};
use crate::error::{Error, Result};
use crate::pipeline::ImageUpload;

/// Client for `POST {base}/ocr/rec`.
pub struct OcrClient {
    http_client: Client,
    base_url: String,
    api_key: String,
}

impl OcrClient {
    pub fn new(http_client: Client, base_url: &str, api_key: &str) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Upload an image and return the recognized texts, scores and boxes.
    pub async fn recognize(&self, image: &ImageUpload) -> Result<OcrResult> {
        let url = format!("{}/ocr/rec", self.base_url);

        tracing::debug!(
            "Sending OCR request: {} file={} size={}",
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

        let reply: OcrResponse = read_json(response).await?;
        Ok(reply.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_normalization() {
        let client = OcrClient::new(Client::new(), "http://localhost:8060/", "key");
        assert_eq!(client.base_url, "http://localhost:8060");
    }
}
