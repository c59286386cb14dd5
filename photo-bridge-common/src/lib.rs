//! photo-bridge Common Types
//!
//! Wire types shared by the gateway and its tests: the Immich pipeline
//! descriptor, the MT Photos OCR/CLIP replies and the normalized responses
//! handed back to Immich.

pub mod clip;
pub mod entries;
pub mod ocr;

pub use clip::{ClipPrediction, ClipResult, ClipTextRequest};
pub use entries::{ModelParams, ModelTask, PipelineEntry, PipelineRequest};
pub use ocr::{NormalizedBox, OcrBox, OcrPrediction, OcrPredictionResult, OcrResponse, OcrResult};
