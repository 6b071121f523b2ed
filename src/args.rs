use clap::{Parser, ValueEnum};
use listing_scraper::{ConfigError, RendererKind, Scrape, TerminationMode};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "listing-scraper")]
#[command(about = "Scrapes product and property listings into CSV files")]
#[command(version)]
pub struct Args {
    /// Built-in source to scrape
    #[arg(value_enum, required_unless_present = "config")]
    pub preset: Option<PresetArg>,

    /// Path to a JSON source configuration
    #[arg(short, long, conflicts_with = "preset")]
    pub config: Option<PathBuf>,

    /// Destination CSV file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// First page to scrape (paginated sources)
    #[arg(long)]
    pub first_page: Option<u32>,

    /// Last page to scrape, inclusive (paginated sources)
    #[arg(long)]
    pub last_page: Option<u32>,

    /// What to do when a page has no listings (paginated sources)
    #[arg(long, value_enum)]
    pub termination: Option<TerminationArg>,

    /// Renderer backend
    #[arg(long, value_enum)]
    pub renderer: Option<RendererArg>,

    /// Number of scroll steps (infinite-scroll sources)
    #[arg(long)]
    pub scroll_count: Option<u32>,

    /// WebDriver server URL
    #[arg(long)]
    pub webdriver_url: Option<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum PresetArg {
    NoonLaptops,
    NoonLaptopsStatic,
    NawyProperties,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum TerminationArg {
    SkipEmpty,
    StopOnFirstEmpty,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum RendererArg {
    Browser,
    Http,
}

impl PresetArg {
    fn name(self) -> &'static str {
        match self {
            PresetArg::NoonLaptops => "noon-laptops",
            PresetArg::NoonLaptopsStatic => "noon-laptops-static",
            PresetArg::NawyProperties => "nawy-properties",
        }
    }
}

impl From<TerminationArg> for TerminationMode {
    fn from(arg: TerminationArg) -> Self {
        match arg {
            TerminationArg::SkipEmpty => TerminationMode::SkipEmpty,
            TerminationArg::StopOnFirstEmpty => TerminationMode::StopOnFirstEmpty,
        }
    }
}

impl From<RendererArg> for RendererKind {
    fn from(arg: RendererArg) -> Self {
        match arg {
            RendererArg::Browser => RendererKind::Browser,
            RendererArg::Http => RendererKind::Http,
        }
    }
}

impl Args {
    /// Build the scrape described by the command line
    pub fn into_scrape(self) -> Result<Scrape, ConfigError> {
        let mut scrape = match (&self.config, self.preset) {
            (Some(path), _) => Scrape::from_config_file(path)?,
            (None, Some(preset)) => Scrape::from_preset(preset.name()).ok_or_else(|| {
                ConfigError::Invalid(format!("unknown preset {}", preset.name()))
            })?,
            (None, None) => {
                return Err(ConfigError::Invalid(
                    "either a preset or --config is required".to_string(),
                ));
            }
        };

        if let Some(output) = self.output {
            scrape = scrape.with_output(output);
        }
        if let Some(page) = self.first_page {
            scrape = scrape.with_first_page(page);
        }
        if let Some(page) = self.last_page {
            scrape = scrape.with_last_page(page);
        }
        if let Some(mode) = self.termination {
            scrape = scrape.with_termination(mode.into());
        }
        if let Some(kind) = self.renderer {
            scrape = scrape.with_renderer(kind.into());
        }
        if let Some(count) = self.scroll_count {
            scrape = scrape.with_scroll_count(count);
        }
        if let Some(url) = self.webdriver_url {
            scrape = scrape.with_webdriver_url(url);
        }

        Ok(scrape)
    }
}
