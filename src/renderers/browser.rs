use super::Renderer;
use crate::config::RendererConfig;
use crate::error::RenderError;
use async_trait::async_trait;
use fantoccini::error::CmdError;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{Map, Value, json};
use std::time::Duration;
use tokio::time::timeout;

/// Local WebDriver endpoints tried when the configured one is unreachable
const FALLBACK_WEBDRIVER_URLS: [&str; 4] = [
    "http://localhost:9515", // ChromeDriver default
    "http://localhost:4723", // Appium default
    "http://localhost:9222", // Chrome debug port default
    "http://127.0.0.1:4444", // Try with IP instead of localhost
];

const SCROLL_SCRIPT: &str = r#"
    const container = document.querySelector(arguments[0]);
    if (container) {
        container.scrollBy(0, arguments[1]);
    }
"#;

/// Renderer driving a real browser through WebDriver
pub struct BrowserRenderer {
    client: Option<Client>,
    navigation_timeout: Duration,
}

impl BrowserRenderer {
    /// Start a browser session
    pub async fn connect(config: &RendererConfig) -> Result<Self, RenderError> {
        let client = connect_to_webdriver(&config.webdriver_url, capabilities(config)).await?;
        Ok(Self {
            client: Some(client),
            navigation_timeout: config.navigation_timeout(),
        })
    }

    fn client(&self) -> Result<&Client, RenderError> {
        self.client.as_ref().ok_or(RenderError::NoPage)
    }
}

/// Chrome (and Firefox) capabilities for headless mode, viewport and user agent
fn capabilities(config: &RendererConfig) -> Map<String, Value> {
    let (width, height) = config.window_size;
    let mut chrome_args = vec![format!("--window-size={},{}", width, height)];
    let mut firefox_args = Vec::new();

    if config.headless {
        chrome_args.push("--headless=new".to_string());
        firefox_args.push("-headless".to_string());
    }
    if let Some(user_agent) = &config.user_agent {
        chrome_args.push(format!("--user-agent={}", user_agent));
    }

    let mut caps = Map::new();
    caps.insert("goog:chromeOptions".to_string(), json!({ "args": chrome_args }));
    caps.insert("moz:firefoxOptions".to_string(), json!({ "args": firefox_args }));
    caps
}

/// Connects to the WebDriver instance, trying common local ports on failure
async fn connect_to_webdriver(
    webdriver_url: &str,
    caps: Map<String, Value>,
) -> Result<Client, RenderError> {
    let mut builder = ClientBuilder::native();
    builder.capabilities(caps);

    let first_error = match builder.connect(webdriver_url).await {
        Ok(client) => {
            ::log::debug!("Connected to WebDriver at {}", webdriver_url);
            return Ok(client);
        }
        Err(e) => {
            ::log::error!("Failed to connect to WebDriver at {}: {}", webdriver_url, e);
            e.to_string()
        }
    };

    for url in FALLBACK_WEBDRIVER_URLS {
        if url == webdriver_url {
            continue;
        }

        ::log::info!("Trying fallback WebDriver URL: {}", url);
        if let Ok(client) = builder.connect(url).await {
            ::log::debug!("Connected to fallback WebDriver at {}", url);
            return Ok(client);
        }
    }

    ::log::error!(
        "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
    );
    Err(RenderError::Connect(first_error))
}

#[async_trait]
impl Renderer for BrowserRenderer {
    async fn navigate(
        &mut self,
        url: &str,
        readiness: Option<&str>,
        wait: Duration,
    ) -> Result<String, RenderError> {
        let client = self.client()?;

        match timeout(self.navigation_timeout, client.goto(url)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                return Err(RenderError::Navigation {
                    url: url.to_string(),
                    reason: e.to_string(),
                });
            }
            Err(_) => {
                return Err(RenderError::Timeout {
                    what: format!("navigation to {}", url),
                    secs: self.navigation_timeout.as_secs(),
                });
            }
        }

        if let Some(selector) = readiness {
            ::log::debug!("Waiting up to {:?} for {}", wait, selector);
            match client.wait().at_most(wait).for_element(Locator::Css(selector)).await {
                Ok(_) => {}
                Err(CmdError::WaitTimeout) => {
                    return Err(RenderError::Timeout {
                        what: format!("selector `{}`", selector),
                        secs: wait.as_secs(),
                    });
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok(client.source().await?)
    }

    async fn scroll(&mut self, container: &str, distance: i64) -> Result<(), RenderError> {
        let client = self.client()?;
        client
            .execute(SCROLL_SCRIPT, vec![json!(container), json!(distance)])
            .await?;
        Ok(())
    }

    async fn snapshot(&mut self) -> Result<String, RenderError> {
        Ok(self.client()?.source().await?)
    }

    async fn close(&mut self) -> Result<(), RenderError> {
        if let Some(client) = self.client.take() {
            client.close().await?;
            ::log::debug!("Closed WebDriver session");
        }
        Ok(())
    }
}
