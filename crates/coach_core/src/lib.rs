//! Interview coaching engine.
//!
//! Everything needed to drive a simulated behavioral interview against
//! a locally-run inference binary: process invocation with a hard
//! timeout, terminal-output sanitization, host capability probing,
//! startup calibration, quality-gated question/feedback generation,
//! and structured rubric extraction.
//!
//! The web/controller layer consumes this crate through
//! [`pipeline::Pipeline`] and always receives a best-effort
//! [`invoke::InvocationResult`]; no model failure propagates as an
//! error past this crate.

pub mod capability;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod invoke;
pub mod perf;
pub mod pipeline;
pub mod prompts;
pub mod question_bank;
pub mod sanitize;
pub mod session;
pub mod text;

pub use capability::{CapabilityReport, SystemProbe};
pub use config::CoachConfig;
pub use error::{CoachError, FailureReason};
pub use evaluation::Evaluation;
pub use invoke::{InvocationResult, ModelRunner, OllamaRunner};
pub use perf::{calibrate, PerformanceMode};
pub use pipeline::{EvaluationOutcome, Pipeline};
pub use session::SessionState;
