//! Chromium-backed renderer over the DevTools protocol.

use super::{NavigationResult, RenderContext, Renderer};
use crate::config::ScrapeConfig;
use crate::extraction::agentql::AgentQlClient;
use crate::stealth::fingerprint::{stealth_script, Fingerprint};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::Page;
use futures::StreamExt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Find a Chromium binary: explicit path, `~/.playlist-sweep/chromium/`, then `PATH`.
pub fn find_chromium(explicit: Option<&PathBuf>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        if path.exists() {
            return Some(path.clone());
        }
    }

    if let Some(home) = dirs::home_dir() {
        let candidates = if cfg!(target_os = "macos") {
            vec![
                home.join(".playlist-sweep/chromium/Google Chrome for Testing.app/Contents/MacOS/Google Chrome for Testing"),
                home.join(".playlist-sweep/chromium/chrome"),
            ]
        } else {
            vec![
                home.join(".playlist-sweep/chromium/chrome"),
                home.join(".playlist-sweep/chromium/chrome-linux64/chrome"),
            ]
        };
        if let Some(found) = candidates.into_iter().find(|c| c.exists()) {
            return Some(found);
        }
    }

    ["google-chrome", "chromium", "chromium-browser"]
        .iter()
        .find_map(|name| which::which(name).ok())
}

/// A launched headless Chromium.
pub struct ChromiumRenderer {
    browser: Mutex<Browser>,
    handler: JoinHandle<()>,
    agentql: Arc<AgentQlClient>,
}

impl ChromiumRenderer {
    /// Launch the browser described by `config`.
    pub async fn launch(config: &ScrapeConfig) -> Result<Self> {
        let fp = &config.fingerprint;
        let mut builder =
            BrowserConfig::builder().window_size(fp.viewport_width, fp.viewport_height);
        if !config.headless {
            builder = builder.with_head();
        }
        if config.no_sandbox {
            builder = builder.no_sandbox();
        }
        if let Some(path) = find_chromium(config.chromium_path.as_ref()) {
            debug!("using chromium at {}", path.display());
            builder = builder.chrome_executable(path);
        }
        let browser_config = builder
            .build()
            .map_err(|e| anyhow!("invalid browser config: {e}"))?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .context("launching chromium")?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        info!(headless = config.headless, "browser launched");

        Ok(Self {
            browser: Mutex::new(browser),
            handler,
            agentql: Arc::new(AgentQlClient::new(&config.api_key, &config.agentql_endpoint)?),
        })
    }
}

#[async_trait]
impl Renderer for ChromiumRenderer {
    async fn new_context(&self) -> Result<Box<dyn RenderContext>> {
        let page = self
            .browser
            .lock()
            .await
            .new_page("about:blank")
            .await
            .context("opening page")?;
        Ok(Box::new(ChromiumContext {
            page,
            agentql: Arc::clone(&self.agentql),
        }))
    }

    async fn shutdown(&self) -> Result<()> {
        let mut browser = self.browser.lock().await;
        browser.close().await.context("closing browser")?;
        if let Err(e) = browser.wait().await {
            warn!("waiting for browser exit failed: {e}");
        }
        self.handler.abort();
        info!("browser closed");
        Ok(())
    }
}

/// One Chromium tab.
pub struct ChromiumContext {
    page: Page,
    agentql: Arc<AgentQlClient>,
}

#[async_trait]
impl RenderContext for ChromiumContext {
    async fn navigate(&mut self, url: &str, timeout_ms: u64) -> Result<NavigationResult> {
        let start = Instant::now();
        tokio::time::timeout(Duration::from_millis(timeout_ms), self.page.goto(url))
            .await
            .map_err(|_| anyhow!("navigation timed out after {timeout_ms}ms"))?
            .with_context(|| format!("navigating to {url}"))?;

        let final_url = self.page.url().await?.unwrap_or_else(|| url.to_string());
        Ok(NavigationResult {
            final_url,
            load_time_ms: start.elapsed().as_millis() as u64,
        })
    }

    async fn execute_js(&self, script: &str) -> Result<serde_json::Value> {
        let result = self.page.evaluate(script).await?;
        Ok(result.value().cloned().unwrap_or(serde_json::Value::Null))
    }

    async fn set_viewport(&mut self, width: u32, height: u32) -> Result<()> {
        self.page
            .execute(SetDeviceMetricsOverrideParams::new(
                i64::from(width),
                i64::from(height),
                1.0,
                false,
            ))
            .await
            .context("setting viewport")?;
        Ok(())
    }

    async fn apply_fingerprint(&mut self, fingerprint: &Fingerprint) -> Result<()> {
        self.page
            .set_user_agent(fingerprint.user_agent.as_str())
            .await
            .context("setting user agent")?;
        self.page
            .evaluate_on_new_document(AddScriptToEvaluateOnNewDocumentParams::new(
                stealth_script(fingerprint),
            ))
            .await
            .context("installing stealth script")?;
        Ok(())
    }

    async fn query_structured(&self, query: &str) -> Result<serde_json::Value> {
        let html = self.page.content().await.context("reading page content")?;
        Ok(self.agentql.query_data(query, &html).await?)
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.page.close().await.context("closing page")?;
        Ok(())
    }
}
