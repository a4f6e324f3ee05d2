//! Environment readiness check.
//!
//! Verifies the three things a scrape needs before it launches anything:
//! an API key, a Chromium binary, and a writable output directory. Every
//! failure prints the fix.

use crate::cli::output::{self, Styled};
use crate::config::ScrapeConfig;
use crate::renderer::chromium::find_chromium;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Readiness facts gathered from the environment.
#[derive(Debug, Clone)]
pub struct DoctorReport {
    pub api_key: Result<(), String>,
    pub chromium: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub output_writable: Result<(), String>,
}

impl DoctorReport {
    pub fn ready(&self) -> bool {
        self.api_key.is_ok() && self.chromium.is_some() && self.output_writable.is_ok()
    }
}

/// Gather the report.
pub fn diagnose() -> DoctorReport {
    let config = ScrapeConfig::from_env();
    let (api_key, explicit_chromium, output_dir) = match &config {
        Ok(c) => (Ok(()), c.chromium_path.clone(), c.output_dir.clone()),
        Err(e) => (Err(e.to_string()), None, PathBuf::from("output")),
    };

    DoctorReport {
        api_key,
        chromium: find_chromium(explicit_chromium.as_ref()),
        output_writable: check_writable(&output_dir),
        output_dir,
    }
}

/// Create `dir` if needed and prove a file can be written into it.
pub fn check_writable(dir: &Path) -> Result<(), String> {
    std::fs::create_dir_all(dir).map_err(|e| e.to_string())?;
    let probe = dir.join(".playlist-sweep-probe");
    std::fs::write(&probe, b"ok").map_err(|e| e.to_string())?;
    let _ = std::fs::remove_file(&probe);
    Ok(())
}

/// Run the doctor and print the report.
pub async fn run(json: bool) -> Result<()> {
    let report = diagnose();

    if json {
        output::print_json(&serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "api_key": report.api_key.is_ok(),
            "chromium_path": report.chromium.as_ref().map(|p| p.display().to_string()),
            "output_dir": report.output_dir.display().to_string(),
            "output_writable": report.output_writable.is_ok(),
            "ready": report.ready(),
        }));
        return Ok(());
    }

    let s = Styled::new();
    output::print_header(&s);
    output::print_section(&s, "Environment");

    match &report.api_key {
        Ok(()) => output::print_check(s.ok_sym(), "API key:", "AGENTQL_API_KEY set"),
        Err(msg) => {
            output::print_check(s.fail_sym(), "API key:", msg);
            output::print_detail("Fix: export AGENTQL_API_KEY=<your key>");
        }
    }

    match &report.chromium {
        Some(path) => output::print_check(s.ok_sym(), "Chromium:", &path.display().to_string()),
        None => {
            output::print_check(s.fail_sym(), "Chromium:", "NOT FOUND");
            output::print_detail("Install Chrome/Chromium or set PLAYLIST_SWEEP_CHROMIUM_PATH");
        }
    }

    let dir = report.output_dir.display().to_string();
    match &report.output_writable {
        Ok(()) => output::print_check(s.ok_sym(), "Output dir:", &format!("{dir} (writable)")),
        Err(msg) => {
            output::print_check(s.fail_sym(), "Output dir:", &format!("{dir}: {msg}"));
            output::print_detail("Fix: set PLAYLIST_SWEEP_OUTPUT_DIR to a writable directory");
        }
    }

    if report.ready() {
        output::print_status(&s, &s.green("READY"), "run 'playlist-sweep'");
    } else {
        output::print_status(&s, &s.red("NOT READY"), "fix issues above");
    }
    Ok(())
}
