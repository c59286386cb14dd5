//! OCR wire formats: the MT Photos `/ocr/rec` reply and the shape handed
//! back to Immich.

use serde::{Deserialize, Serialize};

/// A text box as MT Photos reports it. Every coordinate is a decimal string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OcrBox {
    #[serde(default)]
    pub x: String,
    #[serde(default)]
    pub y: String,
    #[serde(default)]
    pub width: String,
    #[serde(default)]
    pub height: String,
}

/// Parallel sequences of recognized texts, scores and boxes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OcrResult {
    #[serde(default)]
    pub texts: Vec<String>,
    #[serde(default)]
    pub scores: Vec<String>,
    #[serde(default)]
    pub boxes: Vec<OcrBox>,
}

/// Envelope of the `/ocr/rec` reply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OcrResponse {
    #[serde(default)]
    pub result: OcrResult,
}

/// Box in the outward representation.
///
/// `x2`/`y2` carry the source `width`/`height` values as-is. Callers already
/// consume this shape, so it is a relabeling and not a corner computation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// Any coordinate that is not a number turns the whole box into the zero box.
impl From<&OcrBox> for NormalizedBox {
    fn from(source: &OcrBox) -> Self {
        let parse = |value: &str| value.parse::<f64>().ok();

        match (
            parse(&source.x),
            parse(&source.y),
            parse(&source.width),
            parse(&source.height),
        ) {
            (Some(x1), Some(y1), Some(x2), Some(y2)) => Self { x1, y1, x2, y2 },
            _ => Self::default(),
        }
    }
}

/// Structured part of the outward OCR response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OcrPredictionResult {
    pub texts: Vec<String>,
    pub scores: Vec<String>,
    pub boxes: Vec<NormalizedBox>,
}

/// Outward OCR response: a space-joined convenience string plus the full
/// structured result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OcrPrediction {
    pub ocr: String,
    pub result: OcrPredictionResult,
}

impl From<OcrResult> for OcrPrediction {
    fn from(result: OcrResult) -> Self {
        let boxes = result.boxes.iter().map(NormalizedBox::from).collect();

        Self {
            ocr: result.texts.join(" "),
            result: OcrPredictionResult {
                texts: result.texts,
                scores: result.scores,
                boxes,
            },
        }
    }
}
