//! Model invocation layer.
//!
//! Runs the inference binary as a child process: prompt on stdin, answer
//! on stdout (stderr folded in), bounded by a wall-clock timeout. Every
//! outcome — success, timeout, spawn failure, bad exit, empty output —
//! is normalized into an `InvocationResult`; nothing here returns `Err`
//! to the caller.
//!
//! The output pipes are drained by a spawned task while the caller waits
//! on process exit. Pipes have bounded capacity: a model that fills its
//! pipe with no concurrent reader would deadlock against the bounded
//! wait.

use crate::config::CoachConfig;
use crate::error::FailureReason;
use crate::sanitize::sanitize;
use async_trait::async_trait;
use serde::Serialize;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;
use tracing::{debug, error, info, warn};

/// Outcome of one spawn-write-read-terminate cycle. Immutable once
/// built; `slow_response` is derived from the elapsed time at
/// construction and never recomputed.
#[derive(Debug, Clone, Serialize)]
pub struct InvocationResult {
    pub executed_successfully: bool,
    pub failure_reason: Option<FailureReason>,
    pub elapsed_secs: f64,
    pub slow_response: bool,
    pub text: String,
}

impl InvocationResult {
    pub fn success(text: String, elapsed: Duration, slow_threshold_secs: f64) -> Self {
        let elapsed_secs = elapsed.as_secs_f64();
        Self {
            executed_successfully: true,
            failure_reason: None,
            elapsed_secs,
            slow_response: elapsed_secs >= slow_threshold_secs,
            text,
        }
    }

    pub fn failure(reason: FailureReason, elapsed: Duration, slow_threshold_secs: f64) -> Self {
        let elapsed_secs = elapsed.as_secs_f64();
        Self {
            executed_successfully: false,
            failure_reason: Some(reason),
            elapsed_secs,
            slow_response: elapsed_secs >= slow_threshold_secs,
            text: String::new(),
        }
    }

    /// A success that never touched the model, e.g. a question drawn
    /// from the static bank.
    pub fn instant(text: String) -> Self {
        Self {
            executed_successfully: true,
            failure_reason: None,
            elapsed_secs: 0.0,
            slow_response: false,
            text,
        }
    }

    /// Replace the payload after response shaping (quote stripping,
    /// sentence extraction), keeping the timing and status intact.
    pub fn with_text(mut self, text: String) -> Self {
        self.text = text;
        self
    }
}

/// Seam between the generation policies and the real inference binary.
/// Production uses `OllamaRunner`; tests use scripted fakes.
#[async_trait]
pub trait ModelRunner: Send + Sync {
    async fn execute(&self, prompt: &str) -> InvocationResult;
}

/// Invokes `<binary> run <model>` with the prompt on stdin.
pub struct OllamaRunner {
    binary: String,
    model: String,
    timeout: Duration,
    slow_threshold_secs: f64,
}

impl OllamaRunner {
    pub fn new(config: &CoachConfig) -> Self {
        Self::from_parts(
            &config.inference_binary,
            &config.model,
            config.invoke_timeout(),
            config.slow_threshold_secs,
        )
    }

    pub fn from_parts(
        binary: &str,
        model: &str,
        timeout: Duration,
        slow_threshold_secs: f64,
    ) -> Self {
        Self {
            binary: binary.to_string(),
            model: model.to_string(),
            timeout,
            slow_threshold_secs,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn fail(&self, reason: FailureReason, start: Instant) -> InvocationResult {
        InvocationResult::failure(reason, start.elapsed(), self.slow_threshold_secs)
    }

    async fn run_process(&self, prompt: &str) -> InvocationResult {
        let start = Instant::now();

        // kill_on_drop: the child cannot outlive this call, whichever
        // path unwinds.
        let mut child = match Command::new(&self.binary)
            .arg("run")
            .arg(&self.model)
            .env("OLLAMA_NO_COLOR", "1")
            .env("OLLAMA_SILENT", "1")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                error!("Failed to start {}: {}", self.binary, e);
                return self.fail(FailureReason::ProcessLaunch, start);
            }
        };

        // Write the prompt, then drop stdin so the model sees EOF and
        // starts generating.
        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(prompt.as_bytes()).await {
                error!("Failed to write prompt to {}: {}", self.binary, e);
                let _ = child.kill().await;
                return self.fail(FailureReason::ProcessLaunch, start);
            }
        }

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let reader = tokio::spawn(async move {
            let drain_out = async {
                let mut buf = Vec::new();
                if let Some(mut pipe) = stdout {
                    let _ = pipe.read_to_end(&mut buf).await;
                }
                buf
            };
            let drain_err = async {
                let mut buf = Vec::new();
                if let Some(mut pipe) = stderr {
                    let _ = pipe.read_to_end(&mut buf).await;
                }
                buf
            };
            let (out, err) = tokio::join!(drain_out, drain_err);
            let mut combined = String::from_utf8_lossy(&out).into_owned();
            combined.push_str(&String::from_utf8_lossy(&err));
            combined
        });

        let status = match tokio::time::timeout(self.timeout, child.wait()).await {
            Ok(Ok(status)) => status,
            Ok(Err(e)) => {
                error!("Failed waiting on {}: {}", self.binary, e);
                reader.abort();
                let _ = child.kill().await;
                return self.fail(FailureReason::ProcessLaunch, start);
            }
            Err(_) => {
                error!(
                    "{} timed out after {}s, killing process",
                    self.binary,
                    self.timeout.as_secs()
                );
                reader.abort();
                let _ = child.kill().await;
                return self.fail(FailureReason::Timeout, start);
            }
        };

        let elapsed = start.elapsed();
        let raw = reader.await.unwrap_or_default();
        debug!("Raw model output ({} bytes)", raw.len());

        if !status.success() {
            error!(
                "{} exited with code {:?} after {:.1}s",
                self.binary,
                status.code(),
                elapsed.as_secs_f64()
            );
            return InvocationResult::failure(
                FailureReason::NonZeroExit,
                elapsed,
                self.slow_threshold_secs,
            );
        }

        let cleaned = sanitize(&raw);
        if cleaned.is_empty() {
            warn!("{} returned empty output", self.binary);
            return InvocationResult::failure(
                FailureReason::EmptyOutput,
                elapsed,
                self.slow_threshold_secs,
            );
        }

        info!(
            "Model call completed in {:.1}s ({} chars)",
            elapsed.as_secs_f64(),
            cleaned.len()
        );
        InvocationResult::success(cleaned, elapsed, self.slow_threshold_secs)
    }
}

#[async_trait]
impl ModelRunner for OllamaRunner {
    async fn execute(&self, prompt: &str) -> InvocationResult {
        debug!("Running {} with model {}", self.binary, self.model);
        self.run_process(prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// Write a stub inference binary. It receives `run <model>` as
    /// arguments and the prompt on stdin, like the real one.
    fn stub_binary(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("fake-ollama");
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
        path
    }

    fn runner(path: &PathBuf, timeout_secs: u64, slow_threshold: f64) -> OllamaRunner {
        OllamaRunner::from_parts(
            path.to_str().unwrap(),
            "test-model",
            Duration::from_secs(timeout_secs),
            slow_threshold,
        )
    }

    #[tokio::test]
    async fn test_success_echoes_prompt() {
        let dir = TempDir::new().unwrap();
        let path = stub_binary(&dir, "cat -");
        let result = runner(&path, 10, 90.0).execute("hello model").await;

        assert!(result.executed_successfully);
        assert!(result.failure_reason.is_none());
        assert_eq!(result.text, "hello model");
        assert!(result.elapsed_secs >= 0.0);
        assert!(!result.slow_response);
    }

    #[tokio::test]
    async fn test_output_is_sanitized() {
        let dir = TempDir::new().unwrap();
        let path = stub_binary(&dir, "cat - > /dev/null; printf '\\033[32manswer\\033[0m[?25h'");
        let result = runner(&path, 10, 90.0).execute("prompt").await;

        assert!(result.executed_successfully);
        assert_eq!(result.text, "answer");
    }

    #[tokio::test]
    async fn test_non_zero_exit() {
        let dir = TempDir::new().unwrap();
        let path = stub_binary(&dir, "cat - > /dev/null; echo oops; exit 3");
        let result = runner(&path, 10, 90.0).execute("prompt").await;

        assert!(!result.executed_successfully);
        assert_eq!(result.failure_reason, Some(FailureReason::NonZeroExit));
        assert!(result.text.is_empty());
    }

    #[tokio::test]
    async fn test_empty_output() {
        let dir = TempDir::new().unwrap();
        let path = stub_binary(&dir, "cat - > /dev/null; exit 0");
        let result = runner(&path, 10, 90.0).execute("prompt").await;

        assert!(!result.executed_successfully);
        assert_eq!(result.failure_reason, Some(FailureReason::EmptyOutput));
    }

    #[tokio::test]
    async fn test_timeout_kills_process() {
        let dir = TempDir::new().unwrap();
        let path = stub_binary(&dir, "cat - > /dev/null; sleep 30");
        let result = runner(&path, 1, 1.0).execute("prompt").await;

        assert!(!result.executed_successfully);
        assert_eq!(result.failure_reason, Some(FailureReason::Timeout));
        assert!(result.slow_response);
        assert!(result.elapsed_secs >= 1.0);
        // Well under the 30s the stub would have slept.
        assert!(result.elapsed_secs < 5.0);
    }

    #[tokio::test]
    async fn test_missing_binary() {
        let runner = OllamaRunner::from_parts(
            "/nonexistent/inference-binary",
            "test-model",
            Duration::from_secs(5),
            90.0,
        );
        let result = runner.execute("prompt").await;

        assert!(!result.executed_successfully);
        assert_eq!(result.failure_reason, Some(FailureReason::ProcessLaunch));
    }

    #[test]
    fn test_slow_flag_derivation() {
        let ok = InvocationResult::success("x".into(), Duration::from_secs(95), 90.0);
        assert!(ok.slow_response);
        let fast = InvocationResult::success("x".into(), Duration::from_secs(5), 90.0);
        assert!(!fast.slow_response);
        let timed_out =
            InvocationResult::failure(FailureReason::Timeout, Duration::from_secs(90), 90.0);
        assert!(timed_out.slow_response);
    }
}
