//! Interview Coach control CLI.
//!
//! Operator surface over the coaching engine: capability diagnostics,
//! startup calibration, and the three generation operations.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use coach_core::CoachConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "coachctl")]
#[command(about = "Interview Coach - simulated behavioral interviews on a local model", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the TOML config file
    #[arg(long, default_value = "coach.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check host capability and binary availability
    Doctor,

    /// List models known to the inference binary
    Models,

    /// Run the calibration prompt and report the performance mode
    Calibrate,

    /// Generate interview questions for a profession
    Ask {
        /// Profession to interview for
        profession: String,

        /// Number of questions to generate
        #[arg(long, default_value_t = 1)]
        count: usize,

        /// Skip calibration and force a mode (high|low)
        #[arg(long)]
        mode: Option<String>,
    },

    /// Generate prose feedback for a transcribed answer
    Grade {
        profession: String,
        question: String,
        /// Transcribed answer; pass "-" to read stdin
        transcript: String,

        /// Skip calibration and force a mode (high|low)
        #[arg(long)]
        mode: Option<String>,
    },

    /// Produce the five-dimension rubric for a transcribed answer
    Evaluate {
        profession: String,
        question: String,
        /// Transcribed answer; pass "-" to read stdin
        transcript: String,

        /// Skip calibration and force a mode (high|low)
        #[arg(long)]
        mode: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = CoachConfig::load(&cli.config)?;

    match cli.command {
        Commands::Doctor => commands::doctor(&config),
        Commands::Models => commands::models(&config),
        Commands::Calibrate => commands::calibrate(&config).await,
        Commands::Ask {
            profession,
            count,
            mode,
        } => commands::ask(&config, &profession, count, mode.as_deref()).await,
        Commands::Grade {
            profession,
            question,
            transcript,
            mode,
        } => commands::grade(&config, &profession, &question, &transcript, mode.as_deref()).await,
        Commands::Evaluate {
            profession,
            question,
            transcript,
            mode,
        } => {
            commands::evaluate(&config, &profession, &question, &transcript, mode.as_deref()).await
        }
    }
}
