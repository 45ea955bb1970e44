//! Structured rubric extraction from free-form model output.
//!
//! The model is asked for JSON but wraps it in prose more often than
//! not. The parser takes the first `{` through the last `}` as the
//! candidate document and deserializes it into the five-dimension
//! rubric. Parsing is single-shot: a malformed rubric is a `None`
//! payload, never a retry.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Five-dimension scored evaluation of a candidate's answer. Field
/// names are the wire contract given to the model verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Evaluation {
    pub clarity_score: i32,
    pub clarity_feedback: String,
    pub structure_score: i32,
    pub structure_feedback: String,
    pub relevance_score: i32,
    pub relevance_feedback: String,
    pub communication_score: i32,
    pub communication_feedback: String,
    pub depth_score: i32,
    pub depth_feedback: String,
}

impl Evaluation {
    /// A dimension without feedback text is unsubstantiated: its score
    /// is forced to 0 regardless of what the model returned.
    pub fn normalize(&mut self) {
        if self.clarity_feedback.is_empty() {
            self.clarity_score = 0;
        }
        if self.structure_feedback.is_empty() {
            self.structure_score = 0;
        }
        if self.relevance_feedback.is_empty() {
            self.relevance_score = 0;
        }
        if self.communication_feedback.is_empty() {
            self.communication_score = 0;
        }
        if self.depth_feedback.is_empty() {
            self.depth_score = 0;
        }
    }
}

/// Take the substring from the first `{` to the last `}`, inclusive.
pub fn extract_json(input: &str) -> Option<&str> {
    let start = input.find('{')?;
    let end = input.rfind('}')?;
    if end > start {
        Some(input[start..=end].trim())
    } else {
        None
    }
}

/// Parse and normalize an evaluation out of raw model text.
pub fn parse_evaluation(raw: &str) -> Option<Evaluation> {
    let json = match extract_json(raw) {
        Some(json) => json,
        None => {
            warn!("No JSON object found in evaluation output: {}", raw);
            return None;
        }
    };

    match serde_json::from_str::<Evaluation>(json) {
        Ok(mut evaluation) => {
            evaluation.normalize();
            Some(evaluation)
        }
        Err(e) => {
            warn!("Evaluation JSON failed to deserialize: {}", e);
            None
        }
    }
}
