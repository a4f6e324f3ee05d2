//! In-memory render context replaying scripted heights and query responses.

use super::{NavigationResult, RenderContext, Renderer};
use crate::stealth::fingerprint::Fingerprint;
use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Everything the scripted page observed or still has to replay.
#[derive(Debug, Clone, Default)]
pub(crate) struct ScriptedState {
    pub heights: VecDeque<u64>,
    pub last_height: u64,
    pub height_reads: usize,
    pub scroll_offsets: Vec<u64>,
    pub responses: VecDeque<Result<Value, String>>,
    pub queries: usize,
    pub navigations: Vec<String>,
    pub viewport: Option<(u32, u32)>,
    pub fingerprint: Option<Fingerprint>,
    pub closed: bool,
}

pub(crate) struct ScriptedContext {
    state: Arc<Mutex<ScriptedState>>,
    container_present: bool,
    navigation_error: Option<String>,
}

impl ScriptedContext {
    /// Page whose `scrollHeight` reads walk through `heights`, repeating the last.
    pub fn new(heights: Vec<u64>) -> Self {
        let state = ScriptedState {
            last_height: heights.first().copied().unwrap_or(0),
            heights: heights.into(),
            ..ScriptedState::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
            container_present: true,
            navigation_error: None,
        }
    }

    /// Queue a successful structured-query response.
    pub fn respond(self, value: Value) -> Self {
        self.lock().responses.push_back(Ok(value));
        self
    }

    /// Queue a failing structured query.
    pub fn fail_query(self, message: &str) -> Self {
        self.lock().responses.push_back(Err(message.to_string()));
        self
    }

    /// The list container never appears.
    pub fn without_container(mut self) -> Self {
        self.container_present = false;
        self
    }

    /// Navigation fails with `message`.
    pub fn failing_navigation(mut self, message: &str) -> Self {
        self.navigation_error = Some(message.to_string());
        self
    }

    /// Shared view of the state, usable after the context is consumed.
    pub fn handle(&self) -> Arc<Mutex<ScriptedState>> {
        Arc::clone(&self.state)
    }

    pub fn state(&self) -> ScriptedState {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ScriptedState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl RenderContext for ScriptedContext {
    async fn navigate(&mut self, url: &str, _timeout_ms: u64) -> Result<NavigationResult> {
        if let Some(msg) = &self.navigation_error {
            bail!("{msg}");
        }
        self.lock().navigations.push(url.to_string());
        Ok(NavigationResult {
            final_url: url.to_string(),
            load_time_ms: 1,
        })
    }

    async fn execute_js(&self, script: &str) -> Result<Value> {
        let mut state = self.lock();
        if script.contains("scrollHeight") {
            state.height_reads += 1;
            if let Some(h) = state.heights.pop_front() {
                state.last_height = h;
            }
            return Ok(json!(state.last_height));
        }
        if let Some(rest) = script.strip_prefix("window.scrollTo(0, ") {
            let offset = rest
                .trim_end_matches(')')
                .parse::<u64>()
                .map_err(|e| anyhow!("bad scroll offset in '{script}': {e}"))?;
            state.scroll_offsets.push(offset);
            return Ok(Value::Null);
        }
        if script.contains("querySelector") {
            return Ok(Value::Bool(self.container_present));
        }
        Ok(Value::Null)
    }

    async fn set_viewport(&mut self, width: u32, height: u32) -> Result<()> {
        self.lock().viewport = Some((width, height));
        Ok(())
    }

    async fn apply_fingerprint(&mut self, fingerprint: &Fingerprint) -> Result<()> {
        self.lock().fingerprint = Some(fingerprint.clone());
        Ok(())
    }

    async fn query_structured(&self, _query: &str) -> Result<Value> {
        let mut state = self.lock();
        state.queries += 1;
        match state.responses.pop_front() {
            Some(Ok(value)) => Ok(value),
            Some(Err(msg)) => Err(anyhow!(msg)),
            None => Ok(json!({ "videos": [] })),
        }
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.lock().closed = true;
        Ok(())
    }
}

/// Renderer handing out one pre-built scripted page.
pub(crate) struct ScriptedRenderer {
    context: Mutex<Option<ScriptedContext>>,
    pub shutdown_called: Mutex<bool>,
}

impl ScriptedRenderer {
    pub fn new(context: ScriptedContext) -> Self {
        Self {
            context: Mutex::new(Some(context)),
            shutdown_called: Mutex::new(false),
        }
    }
}

#[async_trait]
impl Renderer for ScriptedRenderer {
    async fn new_context(&self) -> Result<Box<dyn RenderContext>> {
        let context = self
            .context
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
            .ok_or_else(|| anyhow!("scripted renderer has a single page"))?;
        Ok(Box::new(context))
    }

    async fn shutdown(&self) -> Result<()> {
        *self.shutdown_called.lock().unwrap_or_else(|e| e.into_inner()) = true;
        Ok(())
    }
}
