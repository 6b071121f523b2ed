use crate::error::ConfigError;
use crate::parsers::RecordSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Placeholder substituted with the page number in paginated URL templates
pub const PAGE_PLACEHOLDER: &str = "{page}";

/// Configuration for one scrape source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Short name used in logs and for the default output file
    pub name: String,

    /// Origin that relative links are resolved against
    pub origin: String,

    /// How pages of results are reached
    pub traversal: TraversalConfig,

    /// Renderer used to fetch pages
    #[serde(default)]
    pub renderer: RendererConfig,

    /// Container and field selectors
    pub schema: RecordSchema,

    /// Destination CSV file (defaults to `output/<name>.csv`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

/// Page traversal strategy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TraversalConfig {
    /// Distinct URL per page, built from a template
    Paginated(PaginatedConfig),

    /// Single page whose content grows as an inner container is scrolled
    InfiniteScroll(InfiniteScrollConfig),
}

/// Configuration for paginated sources
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedConfig {
    /// URL template containing `{page}`
    pub url_template: String,

    /// First page to visit (inclusive)
    #[serde(default = "default_first_page")]
    pub first_page: u32,

    /// Last page to visit (inclusive)
    #[serde(default = "default_last_page")]
    pub last_page: u32,

    /// Selector whose presence means the page is ready to scrape
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readiness_selector: Option<String>,

    /// How long to wait for the readiness selector
    #[serde(default = "default_readiness_timeout_secs")]
    pub readiness_timeout_secs: u64,

    /// Pause after each page that produced records
    #[serde(default = "default_politeness_delay_ms")]
    pub politeness_delay_ms: u64,

    /// What to do when a page has no containers
    #[serde(default)]
    pub termination: TerminationMode,
}

/// Configuration for infinite-scroll sources
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfiniteScrollConfig {
    /// Page to open
    pub url: String,

    /// Selector of the scrollable element holding the listings
    pub scroll_container: String,

    /// Number of scroll steps; always performed in full
    #[serde(default = "default_scroll_count")]
    pub scroll_count: u32,

    /// Pause after each scroll step
    #[serde(default = "default_scroll_wait_ms")]
    pub scroll_wait_ms: u64,

    /// Pixels scrolled per step
    #[serde(default = "default_scroll_distance")]
    pub scroll_distance: i64,

    /// How long to wait for the scroll container after navigation
    #[serde(default = "default_scroll_readiness_timeout_secs")]
    pub readiness_timeout_secs: u64,
}

/// Policy for pages that yield no containers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TerminationMode {
    /// Skip the empty page and keep going through the configured range
    #[default]
    SkipEmpty,
    /// Stop the run at the first empty page
    StopOnFirstEmpty,
}

/// Which renderer backend fetches pages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RendererKind {
    /// WebDriver-controlled browser (for script-rendered pages)
    #[default]
    Browser,
    /// Plain HTTP GET (for static pages)
    Http,
}

/// Renderer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RendererConfig {
    #[serde(default)]
    pub kind: RendererKind,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Run the browser without a visible window
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Browser viewport as (width, height)
    #[serde(default = "default_window_size")]
    pub window_size: (u32, u32),

    /// User agent sent by the browser or HTTP client
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,

    /// Extra request headers (HTTP renderer only)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,

    /// Upper bound on a single navigation or request
    #[serde(default = "default_navigation_timeout_secs")]
    pub navigation_timeout_secs: u64,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            kind: RendererKind::default(),
            webdriver_url: default_webdriver_url(),
            headless: default_headless(),
            window_size: default_window_size(),
            user_agent: None,
            headers: BTreeMap::new(),
            navigation_timeout_secs: default_navigation_timeout_secs(),
        }
    }
}

fn default_first_page() -> u32 {
    1
}

fn default_last_page() -> u32 {
    5
}

fn default_readiness_timeout_secs() -> u64 {
    10
}

fn default_politeness_delay_ms() -> u64 {
    2000
}

fn default_scroll_count() -> u32 {
    100
}

fn default_scroll_wait_ms() -> u64 {
    5000
}

fn default_scroll_distance() -> i64 {
    1500
}

fn default_scroll_readiness_timeout_secs() -> u64 {
    30
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_headless() -> bool {
    true
}

fn default_window_size() -> (u32, u32) {
    (1920, 1080)
}

fn default_navigation_timeout_secs() -> u64 {
    60
}

impl SourceConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parsed origin URL
    pub fn origin_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.origin).map_err(|_| ConfigError::Origin(self.origin.clone()))
    }

    /// Output path, falling back to `output/<name>.csv`
    pub fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            Path::new("output").join(format!(
                "{}.csv",
                crate::utils::sanitize_filename(&self.name)
            ))
        })
    }

    /// Check the settings that serde cannot
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.origin_url()?;

        match &self.traversal {
            TraversalConfig::Paginated(cfg) => {
                if !cfg.url_template.contains(PAGE_PLACEHOLDER) {
                    return Err(ConfigError::Invalid(format!(
                        "url_template `{}` has no {} placeholder",
                        cfg.url_template, PAGE_PLACEHOLDER
                    )));
                }
                if cfg.first_page == 0 || cfg.first_page > cfg.last_page {
                    return Err(ConfigError::Invalid(format!(
                        "invalid page range {}..={}",
                        cfg.first_page, cfg.last_page
                    )));
                }
            }
            TraversalConfig::InfiniteScroll(cfg) => {
                if cfg.scroll_container.trim().is_empty() {
                    return Err(ConfigError::Invalid(
                        "scroll_container must not be empty".to_string(),
                    ));
                }
                if self.renderer.kind == RendererKind::Http {
                    return Err(ConfigError::Invalid(
                        "infinite scroll sources need the browser renderer".to_string(),
                    ));
                }
            }
        }

        Ok(())
    }
}

impl PaginatedConfig {
    /// Build the URL for one page
    pub fn page_url(&self, page: u32) -> String {
        self.url_template
            .replace(PAGE_PLACEHOLDER, &page.to_string())
    }

    pub fn readiness_timeout(&self) -> Duration {
        Duration::from_secs(self.readiness_timeout_secs)
    }

    pub fn politeness_delay(&self) -> Duration {
        Duration::from_millis(self.politeness_delay_ms)
    }
}

impl InfiniteScrollConfig {
    pub fn readiness_timeout(&self) -> Duration {
        Duration::from_secs(self.readiness_timeout_secs)
    }

    pub fn scroll_wait(&self) -> Duration {
        Duration::from_millis(self.scroll_wait_ms)
    }
}

impl RendererConfig {
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }
}
