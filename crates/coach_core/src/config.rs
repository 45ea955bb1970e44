//! Engine configuration.
//!
//! Every tunable that changed across the project's history is an explicit
//! field here instead of a hard-coded constant: the slow-response
//! threshold, the invocation timeout, the word ceilings for questions and
//! feedback, the retry budget, and how far the low-performance mode
//! degrades.

use crate::error::CoachError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default inference binary name; resolved through PATH.
pub const DEFAULT_INFERENCE_BINARY: &str = "ollama";

/// Default model used when no settings file selects one.
pub const DEFAULT_MODEL: &str = "llama3.2:3b";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoachConfig {
    /// Inference binary invoked as `<binary> run <model>`.
    pub inference_binary: String,
    /// Model identifier passed to the inference binary.
    pub model: String,
    /// Wall-clock ceiling for one model invocation, in seconds.
    pub invoke_timeout_secs: u64,
    /// An invocation taking at least this long is flagged slow; the
    /// calibration call uses the same threshold to pick the mode.
    pub slow_threshold_secs: f64,
    /// Word ceiling for generated interview questions.
    pub question_word_limit: usize,
    /// Word ceiling for generated feedback.
    pub feedback_word_limit: usize,
    /// Re-prompts allowed beyond the first attempt when output is
    /// over the word ceiling.
    pub max_retry_attempts: usize,
    /// When true, low-performance mode still calls the model (once,
    /// no retries) for feedback and evaluation. When false those
    /// operations return canned degraded output without spawning.
    pub degraded_model_calls: bool,
}

impl Default for CoachConfig {
    fn default() -> Self {
        Self {
            inference_binary: DEFAULT_INFERENCE_BINARY.to_string(),
            model: DEFAULT_MODEL.to_string(),
            invoke_timeout_secs: 90,
            slow_threshold_secs: 90.0,
            question_word_limit: 20,
            feedback_word_limit: 200,
            max_retry_attempts: 3,
            degraded_model_calls: true,
        }
    }
}

impl CoachConfig {
    /// Load configuration from a TOML file, falling back to defaults
    /// for missing fields. A missing file yields the full defaults.
    pub fn load(path: &Path) -> Result<Self, CoachError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&raw)
            .map_err(|e| CoachError::Config(format!("{}: {e}", path.display())))?;
        Ok(config)
    }

    pub fn invoke_timeout(&self) -> Duration {
        Duration::from_secs(self.invoke_timeout_secs)
    }
}
