use std::path::PathBuf;

/// Errors raised while loading or validating a source configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {}", .path.display(), .source)]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid CSS selector `{selector}` for {context}: {reason}")]
    Selector {
        context: String,
        selector: String,
        reason: String,
    },

    #[error("invalid origin URL `{0}`")]
    Origin(String),

    #[error("{0}")]
    Invalid(String),
}

/// Errors reported by a renderer session
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to connect to WebDriver: {0}")]
    Connect(String),

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("timed out after {secs}s waiting for {what}")]
    Timeout { what: String, secs: u64 },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("WebDriver command failed: {0}")]
    Command(#[from] fantoccini::error::CmdError),

    #[error("{0} is not supported by this renderer")]
    Unsupported(&'static str),

    #[error("no page has been loaded yet")]
    NoPage,
}

/// Errors raised while writing the output file
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("failed to create output directory {}: {}", .path.display(), .source)]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write CSV to {}: {}", .path.display(), .source)]
    Csv { path: PathBuf, source: csv::Error },

    #[error("failed to flush {}: {}", .path.display(), .source)]
    Flush {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Error that aborts a scrape run before any records are produced
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Render(#[from] RenderError),
}
