use crate::config::{InfiniteScrollConfig, PaginatedConfig};
use crate::renderers::Renderer;
use crate::results::PageResult;

/// Produces rendered pages from a renderer session
pub struct Fetcher<'r> {
    renderer: &'r mut dyn Renderer,
}

impl<'r> Fetcher<'r> {
    pub fn new(renderer: &'r mut dyn Renderer) -> Self {
        Self { renderer }
    }

    /// Render page `page` of a paginated source
    pub async fn fetch_page(&mut self, config: &PaginatedConfig, page: u32) -> PageResult {
        let url = config.page_url(page);
        ::log::info!("Scraping page {}: {}", page, url);

        self.renderer
            .navigate(
                &url,
                config.readiness_selector.as_deref(),
                config.readiness_timeout(),
            )
            .await
            .into()
    }

    /// Open an infinite-scroll source, scroll it `scroll_count` times, and snapshot it.
    ///
    /// The step count is fixed; no attempt is made to detect the end of the content.
    pub async fn fetch_scrolled(&mut self, config: &InfiniteScrollConfig) -> PageResult {
        ::log::info!("Opening {}", config.url);

        if let Err(e) = self
            .renderer
            .navigate(
                &config.url,
                Some(config.scroll_container.as_str()),
                config.readiness_timeout(),
            )
            .await
        {
            return PageResult::Failed(e);
        }

        for step in 1..=config.scroll_count {
            if let Err(e) = self
                .renderer
                .scroll(&config.scroll_container, config.scroll_distance)
                .await
            {
                return PageResult::Failed(e);
            }
            ::log::debug!("Scroll {}/{}", step, config.scroll_count);
            tokio::time::sleep(config.scroll_wait()).await;
        }

        self.renderer.snapshot().await.into()
    }
}
