//! HTTP clients for the services the gateway translates to.
//!
//! Every call is a single attempt with the transport's default timeouts.
//! There is no retry and no circuit breaking; a hung downstream holds the
//! handler until the transport gives up.

mod clip;
mod inference;
mod ocr;

pub use clip::ClipClient;
pub use inference::{ForwardedResponse, InferenceClient};
pub use ocr::OcrClient;

use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::pipeline::ImageUpload;

/// Header carrying the shared credential on MT Photos calls.
pub const API_KEY_HEADER: &str = "api-key";

/// Form field MT Photos expects the uploaded image in.
const FILE_FIELD: &str = "file";

/// Single-file multipart upload of an image.
fn image_form(image: &ImageUpload) -> Result<Form> {
    let part = Part::bytes(image.data.to_vec()).file_name(image.filename.clone());
    let part = match image.content_type.as_deref() {
        Some(content_type) => part.mime_str(content_type).map_err(|e| {
            Error::InvalidRequest(format!("invalid image content type '{}': {}", content_type, e))
        })?,
        None => part,
    };

    Ok(Form::new().part(FILE_FIELD, part))
}

/// Decode a JSON reply, treating any non-2xx status or undecodable body as a
/// downstream failure that carries the raw body.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| Error::Downstream(e.to_string()))?;

    if !status.is_success() {
        tracing::warn!(status = %status.as_u16(), "Downstream returned an error");
        return Err(Error::Downstream(body));
    }

    serde_json::from_str(&body).map_err(|e| {
        tracing::warn!("Undecodable downstream reply: {}", e);
        Error::Downstream(body)
    })
}
