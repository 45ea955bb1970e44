//! Subcommand implementations.

use anyhow::{bail, Result};
use coach_core::{
    calibrate as run_calibration, pipeline, CoachConfig, OllamaRunner, PerformanceMode,
    SessionState, SystemProbe,
};
use owo_colors::OwoColorize;
use std::io::Read;
use std::sync::Arc;

pub fn doctor(config: &CoachConfig) -> Result<()> {
    let report = SystemProbe::new(config).check();

    println!("{}", "System requirements".bold());
    for message in &report.messages {
        if message.ends_with("OK") || message.contains(": OK") {
            println!("  {} {}", "✓".green(), message);
        } else {
            println!("  {} {}", "✗".red(), message);
        }
    }

    println!();
    if report.all_requirements_met {
        println!("{}", "All requirements met.".green());
    } else {
        println!(
            "{}",
            "Some requirements are not met; expect degraded behavior.".yellow()
        );
    }
    Ok(())
}

pub fn models(config: &CoachConfig) -> Result<()> {
    let report = SystemProbe::new(config).check();
    if report.available_models.is_empty() {
        println!("No models found (is {} installed?)", config.inference_binary);
        return Ok(());
    }

    for model in &report.available_models {
        if model.eq_ignore_ascii_case(&config.model) {
            println!("{} {}", model.green().bold(), "(selected)".dimmed());
        } else {
            println!("{}", model);
        }
    }
    Ok(())
}

pub async fn calibrate(config: &CoachConfig) -> Result<()> {
    let runner = OllamaRunner::new(config);
    let mode = run_calibration(&runner, config).await;

    match mode {
        PerformanceMode::High => println!("{}", "Performance mode: high".green()),
        PerformanceMode::Low => println!("{}", "Performance mode: low".yellow()),
    }
    Ok(())
}

/// Resolve the pipeline: forced mode if given, otherwise calibrate.
async fn resolve_pipeline(
    config: &CoachConfig,
    forced_mode: Option<&str>,
) -> Result<Box<dyn pipeline::Pipeline>> {
    let runner = Arc::new(OllamaRunner::new(config));

    let mode = match forced_mode {
        Some("high") => PerformanceMode::High,
        Some("low") => PerformanceMode::Low,
        Some(other) => bail!("Unknown mode '{}', expected 'high' or 'low'", other),
        None => run_calibration(runner.as_ref(), config).await,
    };

    Ok(pipeline::select(mode, runner, config))
}

fn read_transcript(transcript: &str) -> Result<String> {
    if transcript == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf.trim().to_string())
    } else {
        Ok(transcript.to_string())
    }
}

pub async fn ask(
    config: &CoachConfig,
    profession: &str,
    count: usize,
    forced_mode: Option<&str>,
) -> Result<()> {
    let pipeline = resolve_pipeline(config, forced_mode).await?;
    let mut session = SessionState::new();

    for index in 1..=count.max(1) {
        let result = pipeline.generate_question(profession, &mut session).await;
        if result.executed_successfully {
            println!("{}. {}", index, result.text);
        } else {
            println!(
                "{}. {} ({})",
                index,
                "question generation failed".red(),
                result
                    .failure_reason
                    .map(|r| r.as_str())
                    .unwrap_or("unknown")
            );
        }
    }
    Ok(())
}

pub async fn grade(
    config: &CoachConfig,
    profession: &str,
    question: &str,
    transcript: &str,
    forced_mode: Option<&str>,
) -> Result<()> {
    let transcript = read_transcript(transcript)?;
    let pipeline = resolve_pipeline(config, forced_mode).await?;

    let result = pipeline
        .generate_feedback(profession, question, &transcript)
        .await;

    if result.executed_successfully {
        println!("{}", result.text);
        if result.slow_response {
            eprintln!(
                "{}",
                format!("(slow response: {:.1}s)", result.elapsed_secs).yellow()
            );
        }
    } else {
        bail!(
            "Feedback generation failed: {}",
            result
                .failure_reason
                .map(|r| r.as_str())
                .unwrap_or("unknown")
        );
    }
    Ok(())
}

pub async fn evaluate(
    config: &CoachConfig,
    profession: &str,
    question: &str,
    transcript: &str,
    forced_mode: Option<&str>,
) -> Result<()> {
    let transcript = read_transcript(transcript)?;
    let pipeline = resolve_pipeline(config, forced_mode).await?;

    let outcome = pipeline
        .generate_evaluation(profession, question, &transcript)
        .await;

    match outcome.evaluation {
        Some(evaluation) => {
            println!("{}", serde_json::to_string_pretty(&evaluation)?);
        }
        None => {
            println!(
                "{}",
                "Evaluation unavailable (model output could not be interpreted).".yellow()
            );
        }
    }
    Ok(())
}
