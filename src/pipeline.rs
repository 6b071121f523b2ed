use crate::accumulator::Accumulator;
use crate::config::{
    InfiniteScrollConfig, PaginatedConfig, SourceConfig, TerminationMode, TraversalConfig,
};
use crate::error::{ConfigError, SinkError};
use crate::fetcher::Fetcher;
use crate::parsers::Extractor;
use crate::renderers::Renderer;
use crate::results::{PageResult, Record};
use crate::sink;
use std::path::{Path, PathBuf};

/// Per-run page counters
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PageStats {
    /// Pages (or scroll snapshots) requested from the renderer
    pub visited: u32,
    /// Pages that produced no records
    pub empty: u32,
    /// Pages lost to navigation, readiness or network failures
    pub failed: u32,
}

/// Mutable state of one run, owned by the driver
#[derive(Debug, Default)]
struct RunState {
    cursor: u32,
    accumulator: Accumulator,
    stats: PageStats,
}

impl RunState {
    fn page_failed(&mut self, error: &dyn std::error::Error) {
        ::log::warn!("Error on page {}: {}", self.cursor, error);
        self.stats.failed += 1;
    }

    /// Returns true when the run should stop
    fn page_empty(&mut self, termination: TerminationMode) -> bool {
        ::log::info!("No records found on page {}", self.cursor);
        self.stats.empty += 1;
        let stop = termination == TerminationMode::StopOnFirstEmpty;
        if stop {
            ::log::info!("Stopping at first empty page {}", self.cursor);
        }
        stop
    }

    fn page_scraped(&mut self, records: Vec<Record>) {
        ::log::info!(
            "Scraped page {} with {} records ({} total)",
            self.cursor,
            records.len(),
            self.accumulator.len() + records.len()
        );
        self.accumulator.append(records);
    }
}

/// Records collected by a finished run
#[derive(Debug)]
pub struct Harvest {
    source: String,
    columns: Vec<String>,
    records: Vec<Record>,
    stats: PageStats,
    output: PathBuf,
}

impl Harvest {
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn stats(&self) -> PageStats {
        self.stats
    }

    /// Configured destination file
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Write to the configured destination
    pub fn write(&self) -> Result<usize, SinkError> {
        self.write_to(&self.output)
    }

    /// Write to `path`; the harvest is left intact on failure
    pub fn write_to(&self, path: &Path) -> Result<usize, SinkError> {
        sink::write_csv(&self.columns, &self.records, path)
    }
}

/// A validated source with its compiled extractor
#[derive(Debug)]
pub struct Pipeline {
    config: SourceConfig,
    extractor: Extractor,
}

impl Pipeline {
    pub fn new(config: SourceConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let extractor = Extractor::new(config.schema.compile()?, config.origin_url()?);
        Ok(Self { config, extractor })
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    /// Run the source to completion and close the renderer.
    ///
    /// Page failures are logged and skipped, so a run always yields a harvest.
    pub async fn run(&self, mut renderer: Box<dyn Renderer>) -> Harvest {
        ::log::info!("Starting scrape of {}", self.config.name);

        let state = {
            let mut fetcher = Fetcher::new(renderer.as_mut());
            match &self.config.traversal {
                TraversalConfig::Paginated(cfg) => self.run_paginated(&mut fetcher, cfg).await,
                TraversalConfig::InfiniteScroll(cfg) => {
                    self.run_infinite_scroll(&mut fetcher, cfg).await
                }
            }
        };

        if let Err(e) = renderer.close().await {
            ::log::warn!("Failed to close renderer: {}", e);
        }

        ::log::info!(
            "Finished {}: {} records from {} pages ({} empty, {} failed)",
            self.config.name,
            state.accumulator.len(),
            state.stats.visited,
            state.stats.empty,
            state.stats.failed
        );

        Harvest {
            source: self.config.name.clone(),
            columns: self.extractor.schema().columns().to_vec(),
            records: state.accumulator.into_records(),
            stats: state.stats,
            output: self.config.output_path(),
        }
    }

    async fn run_paginated(&self, fetcher: &mut Fetcher<'_>, cfg: &PaginatedConfig) -> RunState {
        let mut state = RunState::default();

        for page in cfg.first_page..=cfg.last_page {
            state.cursor = page;
            state.stats.visited += 1;

            let records = match fetcher.fetch_page(cfg, page).await {
                PageResult::Failed(e) => {
                    state.page_failed(&e);
                    continue;
                }
                PageResult::Empty => Vec::new(),
                PageResult::Html(html) => self.extractor.extract(&html),
            };

            if records.is_empty() {
                if state.page_empty(cfg.termination) {
                    break;
                }
                continue;
            }

            state.page_scraped(records);

            if page < cfg.last_page {
                tokio::time::sleep(cfg.politeness_delay()).await;
            }
        }

        state
    }

    async fn run_infinite_scroll(
        &self,
        fetcher: &mut Fetcher<'_>,
        cfg: &InfiniteScrollConfig,
    ) -> RunState {
        let mut state = RunState {
            cursor: 1,
            ..RunState::default()
        };
        state.stats.visited = 1;
        ::log::info!(
            "Scrolling {} {} times by {}px",
            cfg.scroll_container,
            cfg.scroll_count,
            cfg.scroll_distance
        );

        match fetcher.fetch_scrolled(cfg).await {
            PageResult::Failed(e) => state.page_failed(&e),
            PageResult::Empty => {
                state.page_empty(TerminationMode::SkipEmpty);
            }
            PageResult::Html(html) => {
                let records = self.extractor.extract(&html);
                if records.is_empty() {
                    state.page_empty(TerminationMode::SkipEmpty);
                } else {
                    state.page_scraped(records);
                }
            }
        }

        state
    }
}
