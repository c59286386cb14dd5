//! Translation of a classified request into a downstream call.

use photo_bridge_common::ClipTextRequest;

use super::{ImageUpload, PredictRequest, Route};
use crate::error::{Error, Result};

/// A downstream call, with the payload it needs already checked.
#[derive(Debug, Clone, PartialEq)]
pub enum DownstreamCall<'a> {
    Ocr(&'a ImageUpload),
    ClipText(ClipTextRequest),
    ClipImage(&'a ImageUpload),
    Passthrough,
}

impl<'a> DownstreamCall<'a> {
    /// Check the fields `route` needs and build its payload.
    pub fn build(route: Route, request: &'a PredictRequest) -> Result<Self> {
        match route {
            Route::Ocr => Ok(DownstreamCall::Ocr(require_image(request)?)),
            Route::ClipText => {
                let text = request.text.as_ref().ok_or(Error::MissingText)?;
                Ok(DownstreamCall::ClipText(ClipTextRequest { text: text.clone() }))
            }
            Route::ClipImage => Ok(DownstreamCall::ClipImage(require_image(request)?)),
            Route::Passthrough => Ok(DownstreamCall::Passthrough),
        }
    }
}

fn require_image(request: &PredictRequest) -> Result<&ImageUpload> {
    request.image.as_ref().ok_or(Error::MissingImage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;

    fn image() -> ImageUpload {
        ImageUpload {
            filename: "cat.jpg".to_string(),
            content_type: Some("image/jpeg".to_string()),
            data: Bytes::from_static(b"jpeg"),
        }
    }

    #[test]
    fn test_clip_text_builds_json_payload() {
        let request = PredictRequest {
            text: Some("cat".to_string()),
            ..Default::default()
        };
        let call = DownstreamCall::build(Route::ClipText, &request).unwrap();
        assert_eq!(
            call,
            DownstreamCall::ClipText(ClipTextRequest {
                text: "cat".to_string()
            })
        );
    }

    #[test]
    fn test_clip_text_requires_text() {
        let request = PredictRequest {
            image: Some(image()),
            ..Default::default()
        };
        let result = DownstreamCall::build(Route::ClipText, &request);
        assert!(matches!(result, Err(Error::MissingText)));
    }

    #[test]
    fn test_image_routes_require_image() {
        let request = PredictRequest {
            text: Some("cat".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            DownstreamCall::build(Route::Ocr, &request),
            Err(Error::MissingImage)
        ));
        assert!(matches!(
            DownstreamCall::build(Route::ClipImage, &request),
            Err(Error::MissingImage)
        ));
    }

    #[test]
    fn test_image_routes_borrow_upload() {
        let request = PredictRequest {
            image: Some(image()),
            ..Default::default()
        };
        let call = DownstreamCall::build(Route::Ocr, &request).unwrap();
        assert_eq!(call, DownstreamCall::Ocr(&image()));
    }

    #[test]
    fn test_passthrough_needs_nothing() {
        let req = PredictRequest::default();
        let call = DownstreamCall::build(Route::Passthrough, &req).unwrap();
        assert_eq!(call, DownstreamCall::Passthrough);
    }
}
