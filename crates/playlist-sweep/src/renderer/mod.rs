//! Browser rendering abstraction.
//!
//! [`Renderer`] owns the browser process; [`RenderContext`] is one page in
//! it. Everything above this module talks to the page only through
//! [`RenderContext`], which keeps the scroll loop testable without Chromium.

pub mod chromium;
#[cfg(test)]
pub(crate) mod scripted;

use crate::stealth::fingerprint::Fingerprint;
use anyhow::{bail, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Interval between selector probes in [`RenderContext::wait_for_selector`].
const SELECTOR_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Outcome of a page navigation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NavigationResult {
    /// URL after redirects.
    pub final_url: String,
    /// Time until the load event, in milliseconds.
    pub load_time_ms: u64,
}

/// A browser process able to open pages.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Open a fresh page.
    async fn new_context(&self) -> Result<Box<dyn RenderContext>>;

    /// Terminate the browser process.
    async fn shutdown(&self) -> Result<()>;
}

/// A single page.
#[async_trait]
pub trait RenderContext: Send + Sync {
    /// Navigate and wait for the load event.
    async fn navigate(&mut self, url: &str, timeout_ms: u64) -> Result<NavigationResult>;

    /// Evaluate a JavaScript expression and return its JSON value.
    async fn execute_js(&self, script: &str) -> Result<serde_json::Value>;

    /// Override the layout viewport.
    async fn set_viewport(&mut self, width: u32, height: u32) -> Result<()>;

    /// Install the stealth patches and user agent for every later document.
    async fn apply_fingerprint(&mut self, fingerprint: &Fingerprint) -> Result<()>;

    /// Run a declarative structured query over the current rendered content.
    async fn query_structured(&self, query: &str) -> Result<serde_json::Value>;

    /// Close the page.
    async fn close(self: Box<Self>) -> Result<()>;

    /// Poll until `selector` matches an element or `timeout` passes.
    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<()> {
        let script = format!(
            "document.querySelector({}) !== null",
            serde_json::Value::String(selector.to_string())
        );
        let start = Instant::now();

        loop {
            // Probe errors while the page is still settling count as "not yet".
            if let Ok(value) = self.execute_js(&script).await {
                if value.as_bool() == Some(true) {
                    return Ok(());
                }
            }
            if start.elapsed() >= timeout {
                bail!("selector '{selector}' not found within {}ms", timeout.as_millis());
            }
            tokio::time::sleep(SELECTOR_POLL_INTERVAL).await;
        }
    }

    /// Total scrollable height of the document.
    async fn scroll_height(&self) -> Result<u64> {
        let value = self
            .execute_js("document.documentElement.scrollHeight")
            .await?;
        match value.as_u64().or_else(|| value.as_f64().map(|f| f as u64)) {
            Some(h) => Ok(h),
            None => bail!("scrollHeight returned non-numeric value: {value}"),
        }
    }

    /// Scroll the window to an absolute vertical offset.
    async fn scroll_to(&self, offset: u64) -> Result<()> {
        self.execute_js(&format!("window.scrollTo(0, {offset})"))
            .await?;
        Ok(())
    }
}
