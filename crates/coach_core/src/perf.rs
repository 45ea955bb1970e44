//! Performance-mode selection.
//!
//! One calibration call at startup decides whether the host can run
//! the full pipeline. The verdict is computed once and threaded
//! through the request context; it is never re-evaluated per request.

use crate::config::CoachConfig;
use crate::invoke::ModelRunner;
use crate::prompts;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Process-lifetime classification of host capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceMode {
    High,
    Low,
}

impl PerformanceMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Low => "low",
        }
    }
}

/// Run the fixed calibration prompt and classify the host. A failed
/// call counts as slow: a machine that cannot complete the probe is
/// not going to handle the full pipeline either.
pub async fn calibrate(runner: &dyn ModelRunner, config: &CoachConfig) -> PerformanceMode {
    info!("Running calibration prompt");
    let result = runner.execute(prompts::CALIBRATION_PROMPT).await;

    if !result.executed_successfully {
        warn!(
            "Calibration call failed ({:?}), selecting low-performance mode",
            result.failure_reason
        );
        return PerformanceMode::Low;
    }

    if result.elapsed_secs >= config.slow_threshold_secs {
        warn!(
            "Calibration took {:.1}s (threshold {:.0}s), selecting low-performance mode",
            result.elapsed_secs, config.slow_threshold_secs
        );
        return PerformanceMode::Low;
    }

    info!(
        "Calibration completed in {:.1}s, selecting high-performance mode",
        result.elapsed_secs
    );
    PerformanceMode::High
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureReason;
    use crate::invoke::InvocationResult;
    use async_trait::async_trait;
    use std::time::Duration;

    struct FixedRunner {
        result: InvocationResult,
    }

    #[async_trait]
    impl ModelRunner for FixedRunner {
        async fn execute(&self, _prompt: &str) -> InvocationResult {
            self.result.clone()
        }
    }

    #[tokio::test]
    async fn test_fast_host_is_high() {
        let runner = FixedRunner {
            result: InvocationResult::success("ok".into(), Duration::from_secs(4), 90.0),
        };
        let mode = calibrate(&runner, &CoachConfig::default()).await;
        assert_eq!(mode, PerformanceMode::High);
    }

    #[tokio::test]
    async fn test_slow_host_is_low() {
        // 95s with a 90s threshold, exit code 0.
        let runner = FixedRunner {
            result: InvocationResult::success("ok".into(), Duration::from_secs(95), 90.0),
        };
        let mode = calibrate(&runner, &CoachConfig::default()).await;
        assert_eq!(mode, PerformanceMode::Low);
    }

    #[tokio::test]
    async fn test_failed_calibration_is_low() {
        let runner = FixedRunner {
            result: InvocationResult::failure(
                FailureReason::Timeout,
                Duration::from_secs(90),
                90.0,
            ),
        };
        let mode = calibrate(&runner, &CoachConfig::default()).await;
        assert_eq!(mode, PerformanceMode::Low);
    }
}
