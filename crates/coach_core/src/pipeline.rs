//! Generation pipelines.
//!
//! The `Pipeline` trait covers the three operations the web layer
//! consumes: question, feedback, evaluation. Two implementations exist:
//! the full quality-gated pipeline, and a degraded one for hosts the
//! calibration call classified as slow. The factory picks one at
//! startup; no per-request mode checks.
//!
//! Retry ladders are bounded and silent to the caller. Exhausting a
//! ladder is not an error: the last candidate is returned and the
//! violation is logged at warning level.

use crate::config::CoachConfig;
use crate::error::FailureReason;
use crate::evaluation::{self, Evaluation};
use crate::invoke::{InvocationResult, ModelRunner};
use crate::perf::PerformanceMode;
use crate::prompts::{self, QuestionRetryContext};
use crate::question_bank;
use crate::session::SessionState;
use crate::text;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

/// Evaluation call outcome. `invocation.executed_successfully` refers
/// to the model call itself; a rubric that failed to parse leaves it
/// true while `evaluation` is `None` and the failure reason records
/// `ParseFailure`. Callers must not conflate the two.
#[derive(Debug, Clone)]
pub struct EvaluationOutcome {
    pub invocation: InvocationResult,
    pub evaluation: Option<Evaluation>,
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn generate_question(
        &self,
        profession: &str,
        session: &mut SessionState,
    ) -> InvocationResult;

    async fn generate_feedback(
        &self,
        profession: &str,
        question: &str,
        transcript: &str,
    ) -> InvocationResult;

    async fn generate_evaluation(
        &self,
        profession: &str,
        question: &str,
        transcript: &str,
    ) -> EvaluationOutcome;
}

/// Pick the pipeline for the calibrated mode, once, at startup.
pub fn select(
    mode: PerformanceMode,
    runner: Arc<dyn ModelRunner>,
    config: &CoachConfig,
) -> Box<dyn Pipeline> {
    match mode {
        PerformanceMode::High => Box::new(HighPerformancePipeline::new(runner, config.clone())),
        PerformanceMode::Low => Box::new(LowPerformancePipeline::new(runner, config.clone())),
    }
}

// ============================================================================
// High-performance pipeline
// ============================================================================

pub struct HighPerformancePipeline {
    runner: Arc<dyn ModelRunner>,
    config: CoachConfig,
}

impl HighPerformancePipeline {
    pub fn new(runner: Arc<dyn ModelRunner>, config: CoachConfig) -> Self {
        Self { runner, config }
    }
}

#[async_trait]
impl Pipeline for HighPerformancePipeline {
    async fn generate_question(
        &self,
        profession: &str,
        session: &mut SessionState,
    ) -> InvocationResult {
        info!("Generating question for profession: {}", profession);
        session.reset_if_profession_changed(profession);

        let limit = self.config.question_word_limit;
        let prompt = if session.first_question_pending {
            session.first_question_pending = false;
            prompts::first_question(profession, limit)
        } else {
            prompts::followup_question(profession, limit)
        };

        let mut result = self.runner.execute(&prompt).await;
        let mut question = result.text.clone();
        let mut words = text::count_words(&question);

        if words > limit {
            warn!(
                "Question has {} words (limit {}), re-prompting",
                words, limit
            );
            for attempt in 1..=self.config.max_retry_attempts {
                let retry_prompt = {
                    let ctx = QuestionRetryContext {
                        profession,
                        word_limit: limit,
                        previous_question: &question,
                    };
                    prompts::question_retry_prompt(attempt, &ctx)
                };

                result = self.runner.execute(&retry_prompt).await;
                // Re-prompted models tend to append an explanation of
                // what they shortened; keep only the first sentence.
                question = text::extract_first_sentence(&result.text);
                words = text::count_words(&question);
                if words <= limit {
                    break;
                }
                warn!(
                    "Retry {} still has {} words (limit {})",
                    attempt, words, limit
                );
            }
        }

        if words > limit {
            warn!("Returning question over the {} word limit", limit);
        } else {
            info!("Question word count: {}", words);
        }

        result.with_text(text::remove_quotes(&question))
    }

    async fn generate_feedback(
        &self,
        profession: &str,
        question: &str,
        transcript: &str,
    ) -> InvocationResult {
        let limit = self.config.feedback_word_limit;
        let prompt = prompts::feedback(profession, question, transcript);

        let mut result = self.runner.execute(&prompt).await;
        let mut feedback = result.text.clone();
        let mut words = text::count_words(&feedback);

        if words > limit {
            warn!(
                "Feedback has {} words (limit {}), re-prompting",
                words, limit
            );
            for attempt in 1..=self.config.max_retry_attempts {
                let retry_prompt = prompts::shorten_feedback(limit, &feedback);
                result = self.runner.execute(&retry_prompt).await;
                feedback = result.text.clone();
                words = text::count_words(&feedback);
                if words <= limit {
                    break;
                }
                warn!(
                    "Retry {} still has {} words (limit {})",
                    attempt, words, limit
                );
            }
        }

        if words > limit {
            warn!("Returning feedback over the {} word limit", limit);
        } else {
            info!("Feedback word count: {}", words);
        }

        result.with_text(text::remove_quotes_and_format_list(&feedback))
    }

    async fn generate_evaluation(
        &self,
        profession: &str,
        question: &str,
        transcript: &str,
    ) -> EvaluationOutcome {
        let prompt = prompts::evaluation(profession, question, transcript);
        let invocation = self.runner.execute(&prompt).await;
        finish_evaluation(invocation)
    }
}

// ============================================================================
// Low-performance pipeline
// ============================================================================

/// Degraded strategy for slow hosts. Questions come from the static
/// bank with no model call. Feedback and evaluation make one model
/// call each, no retry ladder and no word-ceiling enforcement, unless
/// `degraded_model_calls` is off, in which case they return canned
/// output without spawning anything.
pub struct LowPerformancePipeline {
    runner: Arc<dyn ModelRunner>,
    config: CoachConfig,
}

const DEGRADED_FEEDBACK_UNAVAILABLE: &str =
    "Feedback is not available in low-performance mode. Review your answer for Situation, Task, Action and Result coverage.";

impl LowPerformancePipeline {
    pub fn new(runner: Arc<dyn ModelRunner>, config: CoachConfig) -> Self {
        Self { runner, config }
    }
}

#[async_trait]
impl Pipeline for LowPerformancePipeline {
    async fn generate_question(
        &self,
        profession: &str,
        session: &mut SessionState,
    ) -> InvocationResult {
        session.reset_if_profession_changed(profession);
        session.first_question_pending = false;

        let question = question_bank::random_question();
        info!("Serving question from static bank");
        InvocationResult::instant(question.to_string())
    }

    async fn generate_feedback(
        &self,
        _profession: &str,
        question: &str,
        transcript: &str,
    ) -> InvocationResult {
        if !self.config.degraded_model_calls {
            return InvocationResult::instant(DEGRADED_FEEDBACK_UNAVAILABLE.to_string());
        }

        let prompt = prompts::degraded_feedback(question, transcript);
        let result = self.runner.execute(&prompt).await;
        let formatted = text::remove_quotes_and_format_list(&result.text);
        result.with_text(formatted)
    }

    async fn generate_evaluation(
        &self,
        _profession: &str,
        question: &str,
        transcript: &str,
    ) -> EvaluationOutcome {
        if !self.config.degraded_model_calls {
            return EvaluationOutcome {
                invocation: InvocationResult::instant(String::new()),
                evaluation: None,
            };
        }

        let prompt = prompts::degraded_evaluation(question, transcript);
        let invocation = self.runner.execute(&prompt).await;
        finish_evaluation(invocation)
    }
}

/// Shared tail of both evaluation paths: parse the rubric out of a
/// completed invocation. A failed parse marks `ParseFailure` on the
/// result without downgrading `executed_successfully`.
fn finish_evaluation(mut invocation: InvocationResult) -> EvaluationOutcome {
    if !invocation.executed_successfully {
        return EvaluationOutcome {
            invocation,
            evaluation: None,
        };
    }

    match evaluation::parse_evaluation(&invocation.text) {
        Some(parsed) => EvaluationOutcome {
            invocation,
            evaluation: Some(parsed),
        },
        None => {
            warn!("Evaluation could not be parsed from model output");
            invocation.failure_reason = Some(FailureReason::ParseFailure);
            EvaluationOutcome {
                invocation,
                evaluation: None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Scripted model: returns canned responses in order and records
    /// every prompt it was given.
    struct ScriptedRunner {
        responses: Vec<String>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedRunner {
        fn new(responses: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                responses: responses.iter().map(|r| r.to_string()).collect(),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        fn prompt(&self, index: usize) -> String {
            self.calls.lock().unwrap()[index].clone()
        }
    }

    #[async_trait]
    impl ModelRunner for ScriptedRunner {
        async fn execute(&self, prompt: &str) -> InvocationResult {
            let mut calls = self.calls.lock().unwrap();
            let index = calls.len();
            calls.push(prompt.to_string());
            let text = self
                .responses
                .get(index)
                .cloned()
                .unwrap_or_else(|| self.responses.last().cloned().unwrap_or_default());
            InvocationResult::success(text, Duration::from_secs(1), 90.0)
        }
    }

    fn config() -> CoachConfig {
        CoachConfig::default()
    }

    fn over_limit(words: usize) -> String {
        vec!["word"; words].join(" ")
    }

    #[tokio::test]
    async fn test_first_then_followup_question() {
        let runner = ScriptedRunner::new(&["What is your biggest strength?"]);
        let pipeline = HighPerformancePipeline::new(runner.clone(), config());
        let mut session = SessionState::new();

        let first = pipeline.generate_question("engineer", &mut session).await;
        assert!(first.executed_successfully);
        assert!(!session.first_question_pending);
        assert!(runner.prompt(0).contains("concise behavioral interview coach"));

        let _second = pipeline.generate_question("engineer", &mut session).await;
        assert!(runner.prompt(1).contains("another behavioral interview question"));
    }

    #[tokio::test]
    async fn test_profession_change_restarts_session() {
        let runner = ScriptedRunner::new(&["Tell me about a conflict?"]);
        let pipeline = HighPerformancePipeline::new(runner.clone(), config());
        let mut session = SessionState::new();

        pipeline.generate_question("engineer", &mut session).await;
        pipeline.generate_question("nurse", &mut session).await;

        // Second call is for a new profession, so it is an opening
        // question again.
        assert!(runner.prompt(1).contains("concise behavioral interview coach"));
        assert_eq!(session.current_profession.as_deref(), Some("nurse"));
    }

    #[tokio::test]
    async fn test_question_ladder_bounded_and_returns_last_candidate() {
        // Every response is over the 20 word ceiling.
        let long = over_limit(30);
        let runner = ScriptedRunner::new(&[long.as_str()]);
        let pipeline = HighPerformancePipeline::new(runner.clone(), config());
        let mut session = SessionState::new();

        let result = pipeline.generate_question("engineer", &mut session).await;

        // 1 initial + exactly 3 retries, then gives up without erroring.
        assert_eq!(runner.call_count(), 4);
        assert!(result.executed_successfully);
        assert_eq!(result.text, long);
    }

    #[tokio::test]
    async fn test_question_ladder_escalation_order() {
        let long = over_limit(25);
        let runner = ScriptedRunner::new(&[long.as_str()]);
        let pipeline = HighPerformancePipeline::new(runner.clone(), config());
        let mut session = SessionState::new();

        pipeline.generate_question("engineer", &mut session).await;

        assert!(runner.prompt(1).contains("words or less"));
        assert!(runner.prompt(2).contains("totally different"));
        assert!(runner.prompt(3).contains("most common"));
    }

    #[tokio::test]
    async fn test_question_retry_extracts_first_sentence() {
        let long = over_limit(25);
        let runner = ScriptedRunner::new(&[
            &long,
            "What is your greatest weakness? I removed the filler words to shorten it.",
        ]);
        let pipeline = HighPerformancePipeline::new(runner.clone(), config());
        let mut session = SessionState::new();

        let result = pipeline.generate_question("engineer", &mut session).await;
        assert_eq!(runner.call_count(), 2);
        assert_eq!(result.text, "What is your greatest weakness?");
    }

    #[tokio::test]
    async fn test_feedback_single_retry_then_conformant() {
        let long = over_limit(250);
        let runner = ScriptedRunner::new(&[long.as_str(), "Good answer. Add more metrics."]);
        let pipeline = HighPerformancePipeline::new(runner.clone(), config());

        let result = pipeline
            .generate_feedback("engineer", "Q?", "my answer")
            .await;

        // Exactly 2 total invocations; final payload under the ceiling.
        assert_eq!(runner.call_count(), 2);
        assert!(text::count_words(&result.text) <= 200);
        assert!(runner.prompt(1).contains("200 words or less"));
    }

    #[tokio::test]
    async fn test_feedback_formatting_applied() {
        let runner =
            ScriptedRunner::new(&["\"Strong start.\" 1. Add numbers 2. Tighten the ending"]);
        let pipeline = HighPerformancePipeline::new(runner, config());

        let result = pipeline
            .generate_feedback("engineer", "Q?", "my answer")
            .await;
        assert!(!result.text.contains('"'));
        assert!(result.text.contains("\n1. Add numbers"));
        assert!(result.text.contains("\n2. Tighten the ending"));
    }

    #[tokio::test]
    async fn test_evaluation_parse_failure_keeps_success_flag() {
        let runner = ScriptedRunner::new(&["I cannot produce JSON today."]);
        let pipeline = HighPerformancePipeline::new(runner, config());

        let outcome = pipeline
            .generate_evaluation("engineer", "Q?", "my answer")
            .await;
        assert!(outcome.invocation.executed_successfully);
        assert_eq!(
            outcome.invocation.failure_reason,
            Some(FailureReason::ParseFailure)
        );
        assert!(outcome.evaluation.is_none());
    }

    #[tokio::test]
    async fn test_evaluation_parses_embedded_json() {
        let runner = ScriptedRunner::new(&[r#"Sure! {"clarityScore":7,"clarityFeedback":"Clear.","structureScore":6,"structureFeedback":"OK.","relevanceScore":8,"relevanceFeedback":"Good.","communicationScore":7,"communicationFeedback":"Fine.","depthScore":5,"depthFeedback":"Thin."} done"#]);
        let pipeline = HighPerformancePipeline::new(runner, config());

        let outcome = pipeline
            .generate_evaluation("engineer", "Q?", "my answer")
            .await;
        let evaluation = outcome.evaluation.unwrap();
        assert_eq!(evaluation.clarity_score, 7);
        assert_eq!(evaluation.depth_feedback, "Thin.");
        assert!(outcome.invocation.failure_reason.is_none());
    }

    #[tokio::test]
    async fn test_low_perf_question_skips_model() {
        let runner = ScriptedRunner::new(&[]);
        let pipeline = LowPerformancePipeline::new(runner.clone(), config());
        let mut session = SessionState::new();

        let result = pipeline.generate_question("engineer", &mut session).await;
        assert_eq!(runner.call_count(), 0);
        assert!(result.executed_successfully);
        assert_eq!(result.elapsed_secs, 0.0);
        assert!(question_bank::BEHAVIORAL_QUESTIONS.contains(&result.text.as_str()));
    }

    #[tokio::test]
    async fn test_low_perf_feedback_single_call_no_ceiling() {
        let long = over_limit(400);
        let runner = ScriptedRunner::new(&[long.as_str()]);
        let pipeline = LowPerformancePipeline::new(runner.clone(), config());

        let result = pipeline
            .generate_feedback("engineer", "Q?", "my answer")
            .await;
        // One call, no retry, over-length output accepted.
        assert_eq!(runner.call_count(), 1);
        assert_eq!(text::count_words(&result.text), 400);
    }

    #[tokio::test]
    async fn test_low_perf_gated_off_never_spawns() {
        let mut cfg = config();
        cfg.degraded_model_calls = false;
        let runner = ScriptedRunner::new(&[]);
        let pipeline = LowPerformancePipeline::new(runner.clone(), cfg);

        let feedback = pipeline
            .generate_feedback("engineer", "Q?", "my answer")
            .await;
        let outcome = pipeline
            .generate_evaluation("engineer", "Q?", "my answer")
            .await;

        assert_eq!(runner.call_count(), 0);
        assert!(feedback.executed_successfully);
        assert!(!feedback.text.is_empty());
        assert!(outcome.evaluation.is_none());
    }

    #[tokio::test]
    async fn test_select_factory() {
        let runner = ScriptedRunner::new(&[]);
        let pipeline = select(PerformanceMode::Low, runner.clone(), &config());
        let mut session = SessionState::new();

        let result = pipeline.generate_question("engineer", &mut session).await;
        assert_eq!(runner.call_count(), 0);
        assert!(result.executed_successfully);
    }
}
