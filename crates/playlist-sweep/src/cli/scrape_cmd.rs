//! `playlist-sweep`: scrape one playlist and export it.

use crate::cli::output::{self, Styled};
use crate::config::ScrapeConfig;
use crate::export::{ExportOutcome, ExportReport};
use crate::pipeline::{Orchestrator, ScrapeSummary};
use crate::renderer::chromium::ChromiumRenderer;
use crate::renderer::Renderer;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

/// Command-line overrides layered on top of the environment config.
#[derive(Debug, Clone, Default)]
pub struct ScrapeArgs {
    pub url: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub headful: bool,
    pub no_sandbox: bool,
    pub json: bool,
}

impl ScrapeArgs {
    /// Apply the overrides to `config`.
    pub fn apply(&self, config: &mut ScrapeConfig) {
        if let Some(url) = &self.url {
            config.target_url = url.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if self.headful {
            config.headless = false;
        }
        if self.no_sandbox {
            config.no_sandbox = true;
        }
    }
}

/// Run a scrape.
pub async fn run(args: ScrapeArgs) -> Result<()> {
    // Configuration problems surface before any browser is launched.
    let mut config = ScrapeConfig::from_env()?;
    args.apply(&mut config);

    let start = Instant::now();
    let renderer = ChromiumRenderer::launch(&config)
        .await
        .context("failed to start the browser; run 'playlist-sweep doctor'")?;

    let result = Orchestrator::new(&config).run(&renderer).await;

    if let Err(e) = renderer.shutdown().await {
        warn!("browser shutdown failed: {e:#}");
    }

    let summary = result?;
    info!(
        collected = summary.collected,
        steps = summary.scroll.steps,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "scrape finished"
    );

    if args.json {
        output::print_json(&summary_json(&summary));
    } else if !output::is_quiet() {
        print_summary(&Styled::new(), &summary, start.elapsed().as_secs());
    }
    Ok(())
}

fn summary_json(summary: &ScrapeSummary) -> serde_json::Value {
    let (written, failures): (Vec<String>, Vec<serde_json::Value>) = match &summary.export {
        ExportOutcome::Skipped => (Vec::new(), Vec::new()),
        ExportOutcome::Written(report) => (
            report
                .written
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            report
                .failures
                .iter()
                .map(|f| serde_json::json!({ "format": f.format, "error": f.error.to_string() }))
                .collect(),
        ),
    };
    serde_json::json!({
        "final_url": summary.final_url,
        "collected": summary.collected,
        "scroll_steps": summary.scroll.steps,
        "failed_batches": summary.scroll.failed_batches,
        "written": written,
        "failures": failures,
    })
}

fn print_summary(s: &Styled, summary: &ScrapeSummary, secs: u64) {
    output::print_header(s);
    output::print_section(s, "Scrape");
    output::print_check(s.ok_sym(), "Page:", &summary.final_url);
    output::print_check(
        s.ok_sym(),
        "Videos:",
        &format!(
            "{} unique over {} scroll steps",
            summary.collected, summary.scroll.steps
        ),
    );
    if summary.scroll.failed_batches > 0 {
        output::print_check(
            s.warn_sym(),
            "Failed batches:",
            &summary.scroll.failed_batches.to_string(),
        );
    }
    output::print_check(s.ok_sym(), "Elapsed:", &output::format_duration(secs));
    eprintln!();

    output::print_section(s, "Export");
    match &summary.export {
        ExportOutcome::Skipped => {
            output::print_check(s.warn_sym(), "Files:", "none (no videos collected)");
        }
        ExportOutcome::Written(report) => print_report(s, report),
    }
}

fn print_report(s: &Styled, report: &ExportReport) {
    if !report.is_complete() {
        warn!(
            failed = report.failures.len(),
            "export incomplete for {}",
            report.base_name
        );
    }
    for path in &report.written {
        output::print_check(s.ok_sym(), "Saved:", &path.display().to_string());
    }
    for failure in &report.failures {
        output::print_check(
            s.fail_sym(),
            &format!("{}:", failure.format),
            &failure.error.to_string(),
        );
    }
}
