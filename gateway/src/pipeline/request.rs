//! Binding of the buffered `/predict` body into a [`PredictRequest`].

use axum::body::{Body, Bytes};
use axum::extract::{FromRequest, Multipart};
use axum::http::header::CONTENT_TYPE;
use axum::http::request::Parts;
use axum::http::Request;
use axum::Form;
use photo_bridge_common::PipelineRequest;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Uploaded image, fully buffered.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub filename: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// Unified inbound prediction request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredictRequest {
    pub image: Option<ImageUpload>,
    pub text: Option<String>,
    pub entries: PipelineRequest,
}

/// Body encodings `/predict` understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Encoding {
    Multipart,
    UrlEncoded,
    Json,
    Other,
}

impl Encoding {
    fn detect(parts: &Parts) -> Self {
        let essence = parts
            .headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .map(|value| value.trim().to_ascii_lowercase())
            .unwrap_or_default();

        match essence.as_str() {
            "multipart/form-data" => Encoding::Multipart,
            "application/x-www-form-urlencoded" => Encoding::UrlEncoded,
            "application/json" => Encoding::Json,
            other if other.ends_with("+json") => Encoding::Json,
            _ => Encoding::Other,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FormFields {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    entries: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct JsonFields {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    entries: Option<PipelineRequest>,
}

impl PredictRequest {
    /// Bind a request from its head and the already buffered body.
    ///
    /// `body` is left untouched so the caller can still forward it.
    pub async fn bind(parts: &Parts, body: Bytes) -> Result<Self> {
        match Encoding::detect(parts) {
            Encoding::Multipart => bind_multipart(replay(parts, body)).await,
            Encoding::UrlEncoded => {
                let Form(fields) = Form::<FormFields>::from_request(replay(parts, body), &())
                    .await
                    .map_err(|e| Error::InvalidRequest(e.body_text()))?;

                Ok(Self {
                    image: None,
                    text: fields.text,
                    entries: parse_entries(fields.entries.as_deref().unwrap_or_default())?,
                })
            }
            Encoding::Json => bind_json(&body),
            Encoding::Other => Ok(Self::default()),
        }
    }
}

/// Rebuild a request from its head and `body`, so extractors can consume it.
/// Extensions are carried over, including the route's body limit.
pub fn replay(parts: &Parts, body: impl Into<Body>) -> Request<Body> {
    let mut request = Request::new(body.into());
    *request.method_mut() = parts.method.clone();
    *request.uri_mut() = parts.uri.clone();
    *request.headers_mut() = parts.headers.clone();
    *request.extensions_mut() = parts.extensions.clone();
    request
}

async fn bind_multipart(request: Request<Body>) -> Result<PredictRequest> {
    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|e| Error::InvalidRequest(e.body_text()))?;

    let mut bound = PredictRequest::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::InvalidRequest(e.body_text()))?
    {
        let name = field.name().map(str::to_string);
        let filename = field
            .file_name()
            .filter(|name| !name.is_empty())
            .map(str::to_string);

        match (name.as_deref(), filename) {
            // Only a part that carries a filename is an upload.
            (Some("image"), Some(filename)) => {
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await.map_err(|e| {
                    if e.status().is_client_error() {
                        Error::InvalidRequest(e.body_text())
                    } else {
                        Error::ImageRead(e.body_text())
                    }
                })?;

                bound.image = Some(ImageUpload {
                    filename,
                    content_type,
                    data,
                });
            }
            (Some("text"), _) => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| Error::InvalidRequest(e.body_text()))?;
                bound.text = Some(text);
            }
            (Some("entries"), _) => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| Error::InvalidRequest(e.body_text()))?;
                bound.entries = parse_entries(&raw)?;
            }
            (other, _) => {
                tracing::debug!("Ignoring form field {:?}", other);
            }
        }
    }

    Ok(bound)
}

/// JSON bodies bind `text` and `entries` from a top-level object. Any other
/// JSON value carries nothing to classify and binds to an empty request.
fn bind_json(body: &Bytes) -> Result<PredictRequest> {
    if body.is_empty() {
        return Ok(PredictRequest::default());
    }

    let value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| Error::InvalidRequest(format!("invalid JSON body: {}", e)))?;

    if !value.is_object() {
        return Ok(PredictRequest::default());
    }

    let fields: JsonFields = serde_json::from_value(value)
        .map_err(|e| Error::InvalidRequest(format!("invalid JSON body: {}", e)))?;

    Ok(PredictRequest {
        image: None,
        text: fields.text,
        entries: fields.entries.unwrap_or_default(),
    })
}

/// Parse the JSON-encoded `entries` field. A blank field is an empty
/// descriptor.
pub fn parse_entries(raw: &str) -> Result<PipelineRequest> {
    if raw.trim().is_empty() {
        return Ok(PipelineRequest::default());
    }

    serde_json::from_str(raw).map_err(|e| Error::InvalidRequest(format!("invalid entries: {}", e)))
}
