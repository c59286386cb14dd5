//! Pipeline descriptor sent by Immich in the `entries` form field.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Top-level pipeline slots Immich can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelTask {
    /// Text recognition
    Ocr,
    /// Text or image embeddings for smart search
    Clip,
    /// Face detection and recognition
    #[serde(rename = "face-recognition")]
    FacialRecognition,
}

impl ModelTask {
    /// All task variants for iteration.
    pub const ALL: [ModelTask; 3] = [
        ModelTask::Ocr,
        ModelTask::Clip,
        ModelTask::FacialRecognition,
    ];
}

impl std::fmt::Display for ModelTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelTask::Ocr => write!(f, "ocr"),
            ModelTask::Clip => write!(f, "clip"),
            ModelTask::FacialRecognition => write!(f, "face-recognition"),
        }
    }
}

/// Model selection for a single pipeline stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelParams {
    #[serde(rename = "modelName", default)]
    pub model_name: String,
    #[serde(default)]
    pub options: HashMap<String, serde_json::Value>,
}

/// Stages requested within one pipeline slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detection: Option<ModelParams>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recognition: Option<ModelParams>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub textual: Option<ModelParams>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual: Option<ModelParams>,
}

/// The `entries` descriptor. Every slot is optional; an empty descriptor is
/// valid and means "nothing this gateway understands".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ocr: Option<PipelineEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clip: Option<PipelineEntry>,
    #[serde(
        rename = "face-recognition",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub face_recognition: Option<PipelineEntry>,
}

impl PipelineRequest {
    /// Slot for a given task, if the caller filled it in.
    pub fn entry(&self, task: ModelTask) -> Option<&PipelineEntry> {
        match task {
            ModelTask::Ocr => self.ocr.as_ref(),
            ModelTask::Clip => self.clip.as_ref(),
            ModelTask::FacialRecognition => self.face_recognition.as_ref(),
        }
    }

    /// Tasks present in this descriptor, in precedence order.
    pub fn tasks(&self) -> Vec<ModelTask> {
        ModelTask::ALL
            .into_iter()
            .filter(|task| self.entry(*task).is_some())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_clip_textual_entries() {
        let json = r#"{"clip":{"textual":{"modelName":"ViT-B-32__openai","options":{"language":"en"}}}}"#;
        let entries: PipelineRequest = serde_json::from_str(json).unwrap();

        let clip = entries.clip.as_ref().unwrap();
        let textual = clip.textual.as_ref().unwrap();
        assert_eq!(textual.model_name, "ViT-B-32__openai");
        assert_eq!(textual.options["language"], "en");
        assert!(clip.visual.is_none());
        assert!(entries.ocr.is_none());
        assert_eq!(entries.tasks(), vec![ModelTask::Clip]);
    }

    #[test]
    fn test_parse_face_recognition_slot() {
        let json = r#"{
            "face-recognition": {
                "detection": {"modelName": "buffalo_l", "options": {"minScore": 0.7}},
                "recognition": {"modelName": "buffalo_l"}
            }
        }"#;
        let entries: PipelineRequest = serde_json::from_str(json).unwrap();

        let face = entries.face_recognition.as_ref().unwrap();
        assert_eq!(face.detection.as_ref().unwrap().options["minScore"], 0.7);
        assert!(face.recognition.as_ref().unwrap().options.is_empty());
        assert_eq!(entries.tasks(), vec![ModelTask::FacialRecognition]);
    }

    #[test]
    fn test_empty_slot_is_present() {
        let entries: PipelineRequest = serde_json::from_str(r#"{"ocr":{}}"#).unwrap();
        assert_eq!(entries.ocr, Some(PipelineEntry::default()));
    }

    #[test]
    fn test_tasks_follow_precedence_order() {
        let json = r#"{"face-recognition":{},"clip":{},"ocr":{}}"#;
        let entries: PipelineRequest = serde_json::from_str(json).unwrap();
        assert_eq!(
            entries.tasks(),
            vec![ModelTask::Ocr, ModelTask::Clip, ModelTask::FacialRecognition]
        );
    }

    #[test]
    fn test_serialize_skips_missing_slots() {
        let entries = PipelineRequest {
            clip: Some(PipelineEntry {
                visual: Some(ModelParams {
                    model_name: "ViT-B-32__openai".to_string(),
                    options: HashMap::new(),
                }),
                ..Default::default()
            }),
            ..Default::default()
        };
        let json = serde_json::to_string(&entries).unwrap();
        assert_eq!(
            json,
            r#"{"clip":{"visual":{"modelName":"ViT-B-32__openai","options":{}}}}"#
        );
    }

    #[test]
    fn test_model_task_display() {
        assert_eq!(ModelTask::FacialRecognition.to_string(), "face-recognition");
        let json = serde_json::to_string(&ModelTask::FacialRecognition).unwrap();
        assert_eq!(json, r#""face-recognition""#);
    }
}
