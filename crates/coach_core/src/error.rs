//! Error types for the coaching engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Library-level errors. Model invocation failures are deliberately not
/// here: they are carried inside `InvocationResult` so callers always
/// receive a result object instead of a fault.
#[derive(Error, Debug)]
pub enum CoachError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a model invocation produced no usable payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// Binary missing or the spawn/stdin write failed.
    ProcessLaunch,
    /// Exceeded the invocation timeout; process was killed.
    Timeout,
    /// Process exited with a non-zero code.
    NonZeroExit,
    /// Process exited cleanly but produced no output.
    EmptyOutput,
    /// The invocation succeeded but its output could not be
    /// interpreted (evaluation JSON malformed or absent).
    ParseFailure,
}

impl FailureReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProcessLaunch => "process launch failure",
            Self::Timeout => "timeout",
            Self::NonZeroExit => "non-zero exit",
            Self::EmptyOutput => "empty output",
            Self::ParseFailure => "parse failure",
        }
    }
}
