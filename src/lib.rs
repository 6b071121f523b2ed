pub mod accumulator;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod parsers;
pub mod pipeline;
pub mod presets;
pub mod renderers;
pub mod results;
pub mod sink;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::{RendererKind, SourceConfig, TerminationMode, TraversalConfig};
pub use error::{ConfigError, RenderError, ScrapeError, SinkError};
pub use pipeline::{Harvest, PageStats, Pipeline};
pub use results::{PageResult, Record};

use std::path::{Path, PathBuf};

/// Builder for a single scrape run
#[derive(Debug, Clone)]
pub struct Scrape {
    config: SourceConfig,
    webdriver_url: Option<String>,
}

impl Scrape {
    /// Create a new Scrape builder for the given source
    pub fn new(config: SourceConfig) -> Self {
        Self {
            config,
            webdriver_url: None,
        }
    }

    /// Start from one of the built-in sources
    pub fn from_preset(name: &str) -> Option<Self> {
        presets::preset(name).map(Self::new)
    }

    /// Load the source from a JSON configuration file
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Ok(Self::new(SourceConfig::from_file(path)?))
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    /// Override the destination CSV file
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output = Some(path.into());
        self
    }

    /// Override the first page of a paginated source
    pub fn with_first_page(mut self, page: u32) -> Self {
        match &mut self.config.traversal {
            TraversalConfig::Paginated(cfg) => cfg.first_page = page,
            TraversalConfig::InfiniteScroll(_) => {
                ::log::warn!("Ignoring first page override for infinite scroll source")
            }
        }
        self
    }

    /// Override the last page of a paginated source
    pub fn with_last_page(mut self, page: u32) -> Self {
        match &mut self.config.traversal {
            TraversalConfig::Paginated(cfg) => cfg.last_page = page,
            TraversalConfig::InfiniteScroll(_) => {
                ::log::warn!("Ignoring last page override for infinite scroll source")
            }
        }
        self
    }

    /// Override the empty-page policy of a paginated source
    pub fn with_termination(mut self, mode: TerminationMode) -> Self {
        match &mut self.config.traversal {
            TraversalConfig::Paginated(cfg) => cfg.termination = mode,
            TraversalConfig::InfiniteScroll(_) => {
                ::log::warn!("Infinite scroll sources never stop early; ignoring termination mode")
            }
        }
        self
    }

    /// Override the number of scroll steps of an infinite-scroll source
    pub fn with_scroll_count(mut self, count: u32) -> Self {
        match &mut self.config.traversal {
            TraversalConfig::InfiniteScroll(cfg) => cfg.scroll_count = count,
            TraversalConfig::Paginated(_) => {
                ::log::warn!("Ignoring scroll count override for paginated source")
            }
        }
        self
    }

    /// Choose the renderer backend
    pub fn with_renderer(mut self, kind: RendererKind) -> Self {
        self.config.renderer.kind = kind;
        self
    }

    /// Set the WebDriver URL, taking precedence over `WEBDRIVER_URL`
    pub fn with_webdriver_url(mut self, url: impl Into<String>) -> Self {
        self.webdriver_url = Some(url.into());
        self
    }

    /// Connect the renderer, run the pipeline, and return the collected records.
    ///
    /// Writing the output is left to the caller so a failed write keeps the records.
    pub async fn run(mut self) -> Result<Harvest, ScrapeError> {
        // Override the WebDriver URL with an environment variable if provided
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                self.config.renderer.webdriver_url = webdriver_url;
            }
        }
        if let Some(url) = self.webdriver_url.take() {
            self.config.renderer.webdriver_url = url;
        }

        let pipeline = Pipeline::new(self.config)?;
        let renderer = renderers::connect(&pipeline.config().renderer).await?;
        Ok(pipeline.run(renderer).await)
    }
}
