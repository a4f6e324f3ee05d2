//! Scrape orchestration: one page, one scroll pass, one export.

use crate::collect::CollectedSet;
use crate::config::ScrapeConfig;
use crate::error::{NavigationError, ScrapeError};
use crate::export::{self, ExportOutcome};
use crate::extraction::PlaylistExtractor;
use crate::renderer::{RenderContext, Renderer};
use crate::scroll::{ScrollDriver, ScrollReport};
use crate::stealth::behavior;
use std::time::Duration;
use tracing::{info, warn};

/// Everything a completed run produced.
#[derive(Debug)]
pub struct ScrapeSummary {
    pub final_url: String,
    pub scroll: ScrollReport,
    pub collected: usize,
    pub export: ExportOutcome,
}

/// Pause between the list appearing and the first scroll.
#[derive(Debug, Clone, Copy)]
pub enum ReadyPause {
    /// Randomised human-like pause.
    Human,
    Fixed(Duration),
}

/// Runs a full scrape against a renderer.
pub struct Orchestrator<'a> {
    config: &'a ScrapeConfig,
    ready_pause: ReadyPause,
}

impl<'a> Orchestrator<'a> {
    pub fn new(config: &'a ScrapeConfig) -> Self {
        Self {
            config,
            ready_pause: ReadyPause::Human,
        }
    }

    pub fn with_ready_pause(mut self, pause: ReadyPause) -> Self {
        self.ready_pause = pause;
        self
    }

    /// Open a page, scrape it, export, and close the page on every path.
    pub async fn run(&self, renderer: &dyn Renderer) -> Result<ScrapeSummary, ScrapeError> {
        let mut context = renderer.new_context().await.map_err(ScrapeError::render)?;

        let result = self.scrape(context.as_mut()).await;

        if let Err(e) = context.close().await {
            warn!("failed to close page: {e:#}");
        }
        result
    }

    async fn scrape(&self, context: &mut dyn RenderContext) -> Result<ScrapeSummary, ScrapeError> {
        let config = self.config;
        let fp = &config.fingerprint;

        context
            .apply_fingerprint(fp)
            .await
            .map_err(ScrapeError::render)?;
        context
            .set_viewport(fp.viewport_width, fp.viewport_height)
            .await
            .map_err(ScrapeError::render)?;

        info!(url = %config.target_url, "loading playlist page");
        let nav = context
            .navigate(&config.target_url, config.navigation_timeout.as_millis() as u64)
            .await
            .map_err(|e| NavigationError::LoadFailed {
                url: config.target_url.clone(),
                reason: format!("{e:#}"),
            })?;
        info!(final_url = %nav.final_url, load_ms = nav.load_time_ms, "page loaded");

        context
            .wait_for_selector(&config.list_selector, config.ready_timeout)
            .await
            .map_err(|_| NavigationError::ReadyTimeout {
                selector: config.list_selector.clone(),
                timeout_ms: config.ready_timeout.as_millis() as u64,
            })?;

        match self.ready_pause {
            ReadyPause::Human => behavior::sleep_ready_pause().await,
            ReadyPause::Fixed(d) => tokio::time::sleep(d).await,
        }

        let mut collected = CollectedSet::new();
        let driver = ScrollDriver::new(config.scroll.clone(), PlaylistExtractor::default());
        let scroll = driver.run(&*context, &mut collected).await?;

        let export = export::export(&collected, &config.output_dir).await;

        Ok(ScrapeSummary {
            final_url: nav.final_url,
            scroll,
            collected: collected.len(),
            export,
        })
    }
}
