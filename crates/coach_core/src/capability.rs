//! Host capability probe.
//!
//! Runs once at startup: inspects CPU, RAM and GPU, then verifies the
//! inference binary, the selected model, and the companion binaries
//! (ffmpeg for audio extraction, whisper for transcription). Every
//! check is a diagnostic; none of them aborts startup.

use crate::config::CoachConfig;
use serde::{Deserialize, Serialize};
use std::process::Command;
use sysinfo::System;
use tracing::{info, warn};

const MIN_CPU_CORES: usize = 4;
const MIN_CPU_SPEED_GHZ: f64 = 2.0;
const MIN_RAM_MB: u64 = 8000;
const MIN_VRAM_MB: u64 = 2048;

/// Aggregated result of all capability checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityReport {
    pub cpu_ok: bool,
    pub ram_ok: bool,
    pub gpu_ok: bool,
    pub inference_binary_ok: bool,
    pub model_ok: bool,
    pub ffmpeg_ok: bool,
    pub whisper_ok: bool,
    pub all_requirements_met: bool,
    /// Per-check diagnostic lines, in display order.
    pub messages: Vec<String>,
    /// Model inventory harvested from `<binary> list`, surfaced to
    /// the settings layer.
    pub available_models: Vec<String>,
}

pub fn cpu_meets_minimum(cores: usize, speed_ghz: f64) -> bool {
    cores >= MIN_CPU_CORES && speed_ghz >= MIN_CPU_SPEED_GHZ
}

pub fn ram_meets_minimum(ram_mb: u64) -> bool {
    ram_mb >= MIN_RAM_MB
}

/// Parse `<binary> list` output: tab/space-delimited rows, first row
/// is a header, first column is the model name.
pub fn parse_model_list(output: &str) -> Vec<String> {
    output
        .lines()
        .skip(1)
        .filter_map(|line| line.split_whitespace().next())
        .map(|name| name.to_string())
        .collect()
}

pub struct SystemProbe {
    inference_binary: String,
    model: String,
}

impl SystemProbe {
    pub fn new(config: &CoachConfig) -> Self {
        Self {
            inference_binary: config.inference_binary.clone(),
            model: config.model.clone(),
        }
    }

    /// Run all checks and build the report.
    pub fn check(&self) -> CapabilityReport {
        let mut messages = Vec::new();

        let cpu_ok = self.check_cpu(&mut messages);
        let ram_ok = self.check_ram(&mut messages);
        let gpu_ok = self.check_gpu(&mut messages);
        let inference_binary_ok = self.check_inference_binary(&mut messages);
        let (model_ok, available_models) = self.check_model(&mut messages);
        let ffmpeg_ok = self.check_ffmpeg(&mut messages);
        let whisper_ok = self.check_whisper(&mut messages);

        let all_requirements_met = cpu_ok
            && ram_ok
            && gpu_ok
            && inference_binary_ok
            && model_ok
            && ffmpeg_ok
            && whisper_ok;
        info!("All system requirements met: {}", all_requirements_met);

        CapabilityReport {
            cpu_ok,
            ram_ok,
            gpu_ok,
            inference_binary_ok,
            model_ok,
            ffmpeg_ok,
            whisper_ok,
            all_requirements_met,
            messages,
            available_models,
        }
    }

    fn check_cpu(&self, messages: &mut Vec<String>) -> bool {
        let mut sys = System::new_all();
        sys.refresh_all();

        let cores = num_cpus::get();
        let speed_ghz = sys
            .cpus()
            .first()
            .map(|cpu| cpu.frequency() as f64 / 1000.0)
            .unwrap_or(0.0);
        info!("Detected CPU: {} logical cores, {:.2} GHz", cores, speed_ghz);

        let ok = cpu_meets_minimum(cores, speed_ghz);
        if !ok {
            let msg = format!(
                "CPU below minimum ({} cores @ {:.1} GHz, need {} cores @ {:.1} GHz)",
                cores, speed_ghz, MIN_CPU_CORES, MIN_CPU_SPEED_GHZ
            );
            warn!("{}", msg);
            messages.push(format!("CPU: {}", msg));
        } else {
            messages.push("CPU: OK".to_string());
        }
        ok
    }

    fn check_ram(&self, messages: &mut Vec<String>) -> bool {
        let mut sys = System::new_all();
        sys.refresh_memory();
        let ram_mb = sys.total_memory() / (1024 * 1024);
        info!("Detected RAM: {} MB", ram_mb);

        let ok = ram_meets_minimum(ram_mb);
        if !ok {
            let msg = format!("{} MB detected, minimum {} MB required", ram_mb, MIN_RAM_MB);
            warn!("RAM: {}", msg);
            messages.push(format!("RAM: {}", msg));
        } else {
            messages.push("RAM: OK".to_string());
        }
        ok
    }

    /// GPU is required on Windows/Linux; macOS integrated graphics are
    /// acceptable for the smaller models.
    fn check_gpu(&self, messages: &mut Vec<String>) -> bool {
        if cfg!(target_os = "macos") {
            messages.push("GPU: OK (integrated acceptable on macOS)".to_string());
            return true;
        }

        let lspci = Command::new("lspci").output();
        let listing = match lspci {
            Ok(output) => String::from_utf8_lossy(&output.stdout).into_owned(),
            Err(_) => String::new(),
        };

        let vendor_present =
            listing.contains("NVIDIA") || (listing.contains("AMD") && listing.contains("VGA"));

        // nvidia-smi gives VRAM when the driver is functional.
        let vram_mb = Command::new("nvidia-smi")
            .args(["--query-gpu=memory.total", "--format=csv,noheader,nounits"])
            .output()
            .ok()
            .filter(|output| output.status.success())
            .and_then(|output| {
                String::from_utf8_lossy(&output.stdout)
                    .lines()
                    .next()
                    .and_then(|line| line.trim().parse::<u64>().ok())
            });

        let ok = match vram_mb {
            Some(mb) => mb >= MIN_VRAM_MB,
            None => vendor_present,
        };

        if !ok {
            let msg = "No GPU meets minimum requirements (>=2GB VRAM, NVIDIA/AMD)".to_string();
            warn!("{}", msg);
            messages.push(format!("GPU: {}", msg));
        } else {
            messages.push("GPU: OK".to_string());
        }
        ok
    }

    fn check_inference_binary(&self, messages: &mut Vec<String>) -> bool {
        let ok = Command::new(&self.inference_binary)
            .arg("--version")
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false);

        if ok {
            info!("Inference binary detected: {}", self.inference_binary);
            messages.push(format!("AI provider ({}): OK", self.inference_binary));
        } else {
            let msg = format!("{} not installed or not in PATH", self.inference_binary);
            warn!("{}", msg);
            messages.push(format!("AI provider: {}", msg));
        }
        ok
    }

    /// Verifies the selected model is installed and harvests the full
    /// inventory for the settings surface.
    fn check_model(&self, messages: &mut Vec<String>) -> (bool, Vec<String>) {
        let output = match Command::new(&self.inference_binary).arg("list").output() {
            Ok(output) if output.status.success() => {
                String::from_utf8_lossy(&output.stdout).into_owned()
            }
            _ => {
                let msg = format!("Failed to list {} models", self.inference_binary);
                warn!("{}", msg);
                messages.push(format!("AI model: {}", msg));
                return (false, Vec::new());
            }
        };

        let models = parse_model_list(&output);
        let ok = models
            .iter()
            .any(|name| name.eq_ignore_ascii_case(&self.model));

        if ok {
            info!("Model detected: {}", self.model);
            messages.push(format!("AI model ({}): OK", self.model));
        } else {
            let msg = format!("Model not found: {}", self.model);
            warn!("{}", msg);
            messages.push(format!("AI model: {}", msg));
        }
        (ok, models)
    }

    fn check_ffmpeg(&self, messages: &mut Vec<String>) -> bool {
        let ok = Command::new("ffmpeg")
            .arg("-version")
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false);

        if ok {
            messages.push("FFmpeg: OK".to_string());
        } else {
            warn!("FFmpeg not installed or not in PATH");
            messages.push("FFmpeg: not installed or not in PATH".to_string());
        }
        ok
    }

    fn check_whisper(&self, messages: &mut Vec<String>) -> bool {
        let ok = Command::new("whisper")
            .arg("--help")
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false);

        if ok {
            messages.push("Whisper: OK".to_string());
        } else {
            warn!("Whisper not installed or not in PATH");
            messages.push("Whisper: not installed or not in PATH".to_string());
        }
        ok
    }
}
