pub mod browser;
pub mod http;

#[cfg(test)]
pub(crate) mod mock;

use crate::config::{RendererConfig, RendererKind};
use crate::error::RenderError;
use async_trait::async_trait;
use std::time::Duration;

pub use browser::BrowserRenderer;
pub use http::HttpRenderer;

/// A session able to turn URLs into HTML.
///
/// One session is owned by the pipeline for a whole run and closed at the end.
#[async_trait]
pub trait Renderer: Send {
    /// Load `url`, wait up to `timeout` for `readiness` to match, and return the HTML
    async fn navigate(
        &mut self,
        url: &str,
        readiness: Option<&str>,
        timeout: Duration,
    ) -> Result<String, RenderError>;

    /// Scroll the first element matching `container` down by `distance` pixels
    async fn scroll(&mut self, container: &str, distance: i64) -> Result<(), RenderError>;

    /// HTML of the current page
    async fn snapshot(&mut self) -> Result<String, RenderError>;

    /// Release the session
    async fn close(&mut self) -> Result<(), RenderError>;
}

/// Open the renderer selected by `config`
pub async fn connect(config: &RendererConfig) -> Result<Box<dyn Renderer>, RenderError> {
    match config.kind {
        RendererKind::Browser => Ok(Box::new(BrowserRenderer::connect(config).await?)),
        RendererKind::Http => Ok(Box::new(HttpRenderer::new(config)?)),
    }
}
