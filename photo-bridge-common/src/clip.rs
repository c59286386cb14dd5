//! CLIP wire formats.

use serde::{Deserialize, Serialize};

/// Body of `/clip/txt`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipTextRequest {
    pub text: String,
}

/// Reply of MT Photos `/clip/txt` and `/clip/img`: one embedding whose
/// components arrive as decimal strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClipResult {
    #[serde(default)]
    pub result: Vec<String>,
}

/// Outward CLIP response. Immich expects the embedding as a single string
/// in `[a,b,c]` form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClipPrediction {
    pub clip: String,
}

impl From<ClipResult> for ClipPrediction {
    fn from(result: ClipResult) -> Self {
        Self {
            clip: format!("[{}]", result.result.join(",")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_is_bracketed_and_comma_joined() {
        let result: ClipResult = serde_json::from_str(r#"{"result":["0.1","0.2"]}"#).unwrap();
        let prediction = ClipPrediction::from(result);
        assert_eq!(prediction.clip, "[0.1,0.2]");
    }

    #[test]
    fn test_components_are_not_reformatted() {
        let result = ClipResult {
            result: vec!["-1.50000".to_string(), "3e-5".to_string()],
        };
        assert_eq!(ClipPrediction::from(result).clip, "[-1.50000,3e-5]");
    }

    #[test]
    fn test_text_request_body() {
        let request = ClipTextRequest {
            text: "cat".to_string(),
        };
        assert_eq!(serde_json::to_string(&request).unwrap(), r#"{"text":"cat"}"#);
    }

    #[test]
    fn test_empty_embedding() {
        let prediction = ClipPrediction::from(ClipResult::default());
        assert_eq!(
            serde_json::to_string(&prediction).unwrap(),
            r#"{"clip":"[]"}"#
        );
    }
}
