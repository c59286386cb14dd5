//! Route selection for a bound prediction request.

use photo_bridge_common::PipelineRequest;

use crate::error::{Error, Result};

/// Where a prediction request is served.
///
/// Selection uses a fixed precedence: an `ocr` slot wins over everything,
/// then `clip` (textual before visual), and anything else is forwarded to
/// Immich ML untouched. Slots that lose are ignored, not rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// MT Photos `/ocr/rec`
    Ocr,
    /// MT Photos `/clip/txt`
    ClipText,
    /// MT Photos `/clip/img`
    ClipImage,
    /// Immich ML, body and headers unchanged
    Passthrough,
}

impl Route {
    pub fn classify(entries: &PipelineRequest) -> Result<Self> {
        match (&entries.ocr, &entries.clip) {
            (Some(_), _) => Ok(Route::Ocr),
            (None, Some(clip)) => match (&clip.textual, &clip.visual) {
                (Some(_), _) => Ok(Route::ClipText),
                (None, Some(_)) => Ok(Route::ClipImage),
                (None, None) => Err(Error::UnsupportedClipTask),
            },
            (None, None) => Ok(Route::Passthrough),
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Route::Ocr => write!(f, "ocr"),
            Route::ClipText => write!(f, "clip-text"),
            Route::ClipImage => write!(f, "clip-image"),
            Route::Passthrough => write!(f, "passthrough"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(json: &str) -> PipelineRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_ocr_wins_over_every_other_slot() {
        let cases = [
            r#"{"ocr":{}}"#,
            r#"{"ocr":{},"clip":{"textual":{}}}"#,
            r#"{"clip":{"visual":{}},"ocr":{"recognition":{}}}"#,
            r#"{"ocr":{},"clip":{},"face-recognition":{"detection":{}}}"#,
        ];
        for case in cases {
            assert_eq!(Route::classify(&entries(case)).unwrap(), Route::Ocr, "{}", case);
        }
    }

    #[test]
    fn test_clip_textual_before_visual() {
        let route = Route::classify(&entries(r#"{"clip":{"visual":{},"textual":{}}}"#)).unwrap();
        assert_eq!(route, Route::ClipText);

        let route = Route::classify(&entries(r#"{"clip":{"visual":{}}}"#)).unwrap();
        assert_eq!(route, Route::ClipImage);
    }

    #[test]
    fn test_clip_without_task_is_rejected() {
        let result = Route::classify(&entries(r#"{"clip":{"detection":{}}}"#));
        assert!(matches!(result, Err(Error::UnsupportedClipTask)));
    }

    #[test]
    fn test_everything_else_passes_through() {
        assert_eq!(
            Route::classify(&PipelineRequest::default()).unwrap(),
            Route::Passthrough
        );
        assert_eq!(
            Route::classify(&entries(r#"{"face-recognition":{"detection":{}}}"#)).unwrap(),
            Route::Passthrough
        );
    }
}
