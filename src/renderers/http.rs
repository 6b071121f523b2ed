use super::Renderer;
use crate::config::RendererConfig;
use crate::error::RenderError;
use crate::parsers::html;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use reqwest::{Client, ClientBuilder};
use scraper::Selector;
use std::time::Duration;

/// Renderer for static pages: a plain GET, no script execution
pub struct HttpRenderer {
    client: Client,
    last_body: Option<String>,
}

impl HttpRenderer {
    pub fn new(config: &RendererConfig) -> Result<Self, RenderError> {
        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => ::log::warn!("Ignoring invalid request header {:?}", name),
            }
        }
        if let Some(user_agent) = &config.user_agent {
            match HeaderValue::from_str(user_agent) {
                Ok(value) => {
                    headers.insert(USER_AGENT, value);
                }
                Err(_) => ::log::warn!("Ignoring invalid user agent {:?}", user_agent),
            }
        }

        let client = ClientBuilder::new()
            .default_headers(headers)
            .timeout(config.navigation_timeout())
            .build()?;

        Ok(Self {
            client,
            last_body: None,
        })
    }
}

#[async_trait]
impl Renderer for HttpRenderer {
    async fn navigate(
        &mut self,
        url: &str,
        readiness: Option<&str>,
        _timeout: Duration,
    ) -> Result<String, RenderError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status.is_success() {
            ::log::info!("Page {} status: {}", url, status);
        } else {
            ::log::warn!("Page {} status: {}", url, status);
        }

        // Error pages are still parsed; extraction decides whether they are empty
        let body = response.text().await?;

        // A static page cannot become ready later; a miss is left to extraction
        if let Some(readiness) = readiness {
            match Selector::parse(readiness) {
                Ok(selector) if !html::contains(&body, &selector) => {
                    ::log::debug!("Readiness selector {} not present in {}", readiness, url);
                }
                Ok(_) => {}
                Err(e) => ::log::warn!("Invalid readiness selector {}: {}", readiness, e),
            }
        }

        self.last_body = Some(body.clone());
        Ok(body)
    }

    async fn scroll(&mut self, _container: &str, _distance: i64) -> Result<(), RenderError> {
        Err(RenderError::Unsupported("scrolling"))
    }

    async fn snapshot(&mut self) -> Result<String, RenderError> {
        self.last_body.clone().ok_or(RenderError::NoPage)
    }

    async fn close(&mut self) -> Result<(), RenderError> {
        self.last_body = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SourceConfig;
    use crate::pipeline::{PageStats, Pipeline};
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves every request with `status` and `body`, keeping the raw request heads
    async fn serve(status: &'static str, body: &'static str) -> (String, Arc<Mutex<Vec<String>>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut head = Vec::new();
                let mut buf = [0u8; 1024];
                while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => head.extend_from_slice(&buf[..n]),
                    }
                }
                seen.lock()
                    .unwrap()
                    .push(String::from_utf8_lossy(&head).to_lowercase());

                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        (format!("http://{}", addr), requests)
    }

    #[tokio::test]
    async fn test_navigate_sends_headers_and_user_agent() {
        let (base, requests) = serve("200 OK", "<div class=\"card\">ok</div>").await;
        let mut headers = BTreeMap::new();
        headers.insert("accept-language".to_string(), "en-US".to_string());
        let config = RendererConfig {
            kind: crate::config::RendererKind::Http,
            headers,
            user_agent: Some("listing-agent/1.0".to_string()),
            ..RendererConfig::default()
        };
        let mut renderer = HttpRenderer::new(&config).unwrap();

        let body = renderer
            .navigate(&format!("{}/list?page=1", base), Some("div.card"), Duration::from_secs(1))
            .await
            .unwrap();
        assert!(body.contains("ok"));
        assert_eq!(renderer.snapshot().await.unwrap(), body);

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].starts_with("get /list?page=1 "));
        assert!(requests[0].contains("user-agent: listing-agent/1.0"));
        assert!(requests[0].contains("accept-language: en-us"));
    }

    #[tokio::test]
    async fn test_error_status_still_returns_body() {
        let (base, _) = serve("403 Forbidden", "<body>Access denied</body>").await;
        let mut renderer = HttpRenderer::new(&RendererConfig::default()).unwrap();

        let body = renderer
            .navigate(&base, None, Duration::from_secs(1))
            .await
            .unwrap();
        assert!(body.contains("Access denied"));
    }

    #[tokio::test]
    async fn test_connection_refused_is_an_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mut renderer = HttpRenderer::new(&RendererConfig::default()).unwrap();
        let result = renderer
            .navigate(&format!("http://{}", addr), None, Duration::from_secs(1))
            .await;
        assert!(matches!(result, Err(RenderError::Http(_))));
    }

    #[tokio::test]
    async fn test_blocked_site_stops_at_first_page() {
        let (base, requests) = serve("403 Forbidden", "<body>Access denied</body>").await;
        let json = format!(
            r#"{{
                "name": "blocked",
                "origin": "{base}",
                "traversal": {{
                    "type": "paginated",
                    "url_template": "{base}/list?page={{page}}",
                    "first_page": 1,
                    "last_page": 5,
                    "politeness_delay_ms": 0,
                    "termination": "stop-on-first-empty"
                }},
                "renderer": {{ "kind": "http" }},
                "schema": {{
                    "container": "div.card",
                    "sentinel": "N/A",
                    "fields": [{{ "name": "Title", "selectors": ["h2"] }}]
                }}
            }}"#
        );
        let source = SourceConfig::from_json(&json).unwrap();
        let renderer = HttpRenderer::new(&source.renderer).unwrap();

        let harvest = Pipeline::new(source)
            .unwrap()
            .run(Box::new(renderer))
            .await;

        assert!(harvest.is_empty());
        assert_eq!(
            harvest.stats(),
            PageStats {
                visited: 1,
                empty: 1,
                failed: 0
            }
        );
        assert_eq!(requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_snapshot_before_navigation_fails() {
        let mut renderer = HttpRenderer::new(&RendererConfig::default()).unwrap();
        assert!(matches!(renderer.snapshot().await, Err(RenderError::NoPage)));
        assert!(matches!(
            renderer.scroll("div", 100).await,
            Err(RenderError::Unsupported(_))
        ));
    }

    #[test]
    fn test_invalid_headers_are_skipped() {
        let mut headers = BTreeMap::new();
        headers.insert("bad header".to_string(), "x".to_string());
        headers.insert("accept".to_string(), "text/html".to_string());
        let config = RendererConfig {
            headers,
            user_agent: Some("Mozilla/5.0".to_string()),
            ..RendererConfig::default()
        };
        assert!(HttpRenderer::new(&config).is_ok());
    }
}
