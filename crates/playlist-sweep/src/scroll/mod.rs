//! Incremental scroll-and-collect loop.
//!
//! The playlist renders more entries as the viewport nears the bottom. The
//! driver walks the page in fixed steps, lets each step settle, collects
//! whatever is rendered, and stops once the scrollable height stops growing
//! while the offset is already past it.
//!
//! ```text
//! Scrolling -> Settling -> Extracting -> (height grew) -> Scrolling
//!                                     -> (height stable, offset past it) -> Done
//! ```

use crate::collect::CollectedSet;
use crate::config::ScrollSettings;
use crate::error::ScrapeError;
use crate::extraction::PlaylistExtractor;
use crate::renderer::RenderContext;
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, info, trace, warn};

/// Driver states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollState {
    Scrolling,
    Settling,
    Extracting,
    Done,
}

/// What a finished scroll loop did.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScrollReport {
    pub steps: usize,
    pub final_offset: u64,
    pub final_height: u64,
    pub items_added: usize,
    pub failed_batches: usize,
    pub elapsed: Duration,
}

/// End-of-content test: height unchanged and offset already beyond it.
pub fn reached_end(previous_height: u64, new_height: u64, offset: u64) -> bool {
    new_height == previous_height && offset > previous_height
}

/// Sequential scroll driver over one page.
pub struct ScrollDriver {
    settings: ScrollSettings,
    extractor: PlaylistExtractor,
}

impl ScrollDriver {
    pub fn new(settings: ScrollSettings, extractor: PlaylistExtractor) -> Self {
        Self {
            settings,
            extractor,
        }
    }

    /// Scroll to the end of the list, feeding every batch into `collected`.
    ///
    /// Extraction failures are logged and followed by the backoff pause;
    /// only renderer failures abort the loop.
    pub async fn run(
        &self,
        context: &dyn RenderContext,
        collected: &mut CollectedSet,
    ) -> Result<ScrollReport, ScrapeError> {
        let start = Instant::now();
        let mut report = ScrollReport::default();
        let mut offset: u64 = 0;
        let mut total_height = context.scroll_height().await.map_err(ScrapeError::render)?;
        let mut state = ScrollState::Scrolling;

        info!(initial_height = total_height, "starting scroll process");

        while state != ScrollState::Done {
            trace!(?state, step = report.steps, "scroll state");
            state = match state {
                ScrollState::Scrolling => {
                    offset += self.settings.step_px;
                    context.scroll_to(offset).await.map_err(ScrapeError::render)?;
                    report.steps += 1;
                    ScrollState::Settling
                }
                ScrollState::Settling => {
                    tokio::time::sleep(self.settings.settle).await;
                    ScrollState::Extracting
                }
                ScrollState::Extracting => {
                    self.collect_batch(context, collected, report.steps, &mut report)
                        .await;

                    let new_height = context.scroll_height().await.map_err(ScrapeError::render)?;
                    if reached_end(total_height, new_height, offset) {
                        ScrollState::Done
                    } else {
                        total_height = new_height;
                        ScrollState::Scrolling
                    }
                }
                ScrollState::Done => ScrollState::Done,
            };
        }

        report.final_offset = offset;
        report.final_height = total_height;
        report.elapsed = start.elapsed();
        info!(
            steps = report.steps,
            items = collected.len(),
            failed_batches = report.failed_batches,
            "scrolling completed in {:.2} seconds",
            report.elapsed.as_secs_f64()
        );
        Ok(report)
    }

    async fn collect_batch(
        &self,
        context: &dyn RenderContext,
        collected: &mut CollectedSet,
        step: usize,
        report: &mut ScrollReport,
    ) {
        match self.extractor.extract(context).await {
            Ok(batch) => {
                let seen = batch.len();
                let added = collected.ingest(batch);
                report.items_added += added;
                if added > 0 {
                    info!(step, added, total = collected.len(), "added new videos");
                } else {
                    debug!(step, seen, "no new videos in batch");
                }
            }
            Err(e) => {
                report.failed_batches += 1;
                warn!(step, "error querying video data: {e}");
                tokio::time::sleep(self.settings.failure_backoff).await;
            }
        }
    }
}
