use super::Renderer;
use crate::error::RenderError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

/// A call observed by [`ScriptedRenderer`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Navigate(String),
    Scroll(String, i64),
    Snapshot,
    Close,
}

/// What a scripted URL returns
#[derive(Debug, Clone)]
pub enum Reply {
    Html(String),
    Timeout,
}

/// Renderer serving canned HTML per URL and recording every call
#[derive(Default, Clone)]
pub struct ScriptedRenderer {
    pages: HashMap<String, Reply>,
    snapshot: Option<String>,
    calls: Arc<Mutex<Vec<Call>>>,
    stamps: Arc<Mutex<Vec<(Call, Instant)>>>,
}

impl ScriptedRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), Reply::Html(html.to_string()));
        self
    }

    pub fn timeout(mut self, url: &str) -> Self {
        self.pages.insert(url.to_string(), Reply::Timeout);
        self
    }

    pub fn snapshot_html(mut self, html: &str) -> Self {
        self.snapshot = Some(html.to_string());
        self
    }

    /// Shared handle to the call log, usable after the renderer is moved
    pub fn calls(&self) -> Arc<Mutex<Vec<Call>>> {
        Arc::clone(&self.calls)
    }

    /// Each call with the (possibly paused) tokio clock reading it was made at
    pub fn timeline(&self) -> Arc<Mutex<Vec<(Call, Instant)>>> {
        Arc::clone(&self.stamps)
    }

    fn record(&self, call: Call) {
        self.stamps.lock().unwrap().push((call.clone(), Instant::now()));
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Renderer for ScriptedRenderer {
    async fn navigate(
        &mut self,
        url: &str,
        readiness: Option<&str>,
        timeout: Duration,
    ) -> Result<String, RenderError> {
        self.record(Call::Navigate(url.to_string()));
        match self.pages.get(url) {
            Some(Reply::Html(html)) => Ok(html.clone()),
            Some(Reply::Timeout) => Err(RenderError::Timeout {
                what: format!("selector `{}`", readiness.unwrap_or("<none>")),
                secs: timeout.as_secs(),
            }),
            None => Err(RenderError::Navigation {
                url: url.to_string(),
                reason: "404".to_string(),
            }),
        }
    }

    async fn scroll(&mut self, container: &str, distance: i64) -> Result<(), RenderError> {
        self.record(Call::Scroll(container.to_string(), distance));
        Ok(())
    }

    async fn snapshot(&mut self) -> Result<String, RenderError> {
        self.record(Call::Snapshot);
        self.snapshot.clone().ok_or(RenderError::NoPage)
    }

    async fn close(&mut self) -> Result<(), RenderError> {
        self.record(Call::Close);
        Ok(())
    }
}
