//! Landing-page context: fetch a URL and reduce it to plain text.
//!
//! The model only needs the offer language on the page, so scripts, styles,
//! navigation and footers are dropped and the remaining text is collapsed to
//! single spaces and capped at a character budget. Fetching is best-effort:
//! any network failure yields [`FALLBACK_CONTEXT`] so generation can still
//! proceed from the category and ad-group name alone. Error pages are parsed
//! like any other body; a soft 404 often still carries the offer text.

use async_trait::async_trait;
use scraper::Html;
use std::time::Duration;
use tracing::{debug, warn};

/// Context used when the landing page cannot be fetched.
pub const FALLBACK_CONTEXT: &str = "High quality direct response offer";

/// Elements whose text never reaches the model.
const EXCLUDED_ELEMENTS: &[&str] = &["script", "style", "nav", "footer"];

/// Retrieves page text for a landing-page URL.
///
/// Implementations never fail: they return a placeholder instead.
#[async_trait]
pub trait ContextFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> String;
}

/// [`ContextFetcher`] backed by a plain HTTP GET.
pub struct HttpContextFetcher {
    client: reqwest::Client,
    char_budget: usize,
}

impl HttpContextFetcher {
    /// Build a fetcher with a per-request timeout and output character budget.
    pub fn new(timeout_secs: u64, char_budget: usize) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent("Mozilla/5.0")
            .build()?;
        Ok(Self {
            client,
            char_budget,
        })
    }

    async fn try_fetch(&self, url: &str) -> Result<String, String> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                "timed out".to_string()
            } else {
                e.to_string()
            }
        })?;

        if !response.status().is_success() {
            debug!("{} answered HTTP {}; parsing body anyway", url, response.status());
        }

        response.text().await.map_err(|e| e.to_string())
    }
}

#[async_trait]
impl ContextFetcher for HttpContextFetcher {
    async fn fetch(&self, url: &str) -> String {
        match self.try_fetch(url).await {
            Ok(html) => {
                let text = extract_page_text(&html, self.char_budget);
                debug!("Fetched {} chars of context from {}", text.chars().count(), url);
                text
            }
            Err(reason) => {
                warn!("Context fetch failed for {}: {}; using placeholder", url, reason);
                FALLBACK_CONTEXT.to_string()
            }
        }
    }
}

/// Visible page text with excluded elements removed, whitespace collapsed,
/// capped at `char_budget` characters.
pub fn extract_page_text(html: &str, char_budget: usize) -> String {
    let doc = Html::parse_document(html);

    let words = doc
        .root_element()
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let excluded = node.ancestors().any(|a| {
                a.value()
                    .as_element()
                    .is_some_and(|el| EXCLUDED_ELEMENTS.contains(&el.name()))
            });
            (!excluded).then_some(&**text)
        })
        .flat_map(str::split_whitespace);

    let mut out = String::new();
    for word in words {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }

    match out.char_indices().nth(char_budget) {
        Some((cut, _)) => out[..cut].to_string(),
        None => out,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Answer a single request with `status` and an HTML `body`.
    async fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 2048];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: text/html; charset=utf-8\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
        });
        format!("http://{addr}/landing")
    }

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Weight Loss Program</title><style>body { color: red; }</style></head>
<body>
  <nav><a href="/">Home</a> <a href="/about">About</a></nav>
  <h1>Lose   Weight
      Fast</h1>
  <p>Get 50% off your first month.</p>
  <script>var tracking = "secret";</script>
  <footer>Copyright 2026</footer>
</body>
</html>"#;

    #[test]
    fn test_extract_strips_excluded_elements() {
        let text = extract_page_text(PAGE, 1800);
        assert!(text.contains("Lose Weight Fast"));
        assert!(text.contains("Get 50% off your first month."));
        assert!(!text.contains("tracking"));
        assert!(!text.contains("color: red"));
        assert!(!text.contains("About"));
        assert!(!text.contains("Copyright"));
    }

    #[test]
    fn test_extract_keeps_title() {
        assert!(extract_page_text(PAGE, 1800).starts_with("Weight Loss Program"));
    }

    #[test]
    fn test_extract_respects_budget() {
        let text = extract_page_text(PAGE, 10);
        assert_eq!(text.chars().count(), 10);
        assert_eq!(text, "Weight Los");
    }

    #[test]
    fn test_extract_empty_document() {
        assert_eq!(extract_page_text("", 100), "");
    }

    #[tokio::test]
    async fn test_unreachable_url_falls_back() {
        let fetcher = HttpContextFetcher::new(1, 1800).unwrap();
        let text = fetcher.fetch("http://127.0.0.1:9/landing").await;
        assert_eq!(text, FALLBACK_CONTEXT);
    }

    #[tokio::test]
    async fn test_invalid_url_falls_back() {
        let fetcher = HttpContextFetcher::new(1, 1800).unwrap();
        assert_eq!(fetcher.fetch("not a url").await, FALLBACK_CONTEXT);
    }

    #[test]
    fn test_extract_budget_counts_chars() {
        let text = extract_page_text("<p>Crème brûlée à volonté</p>", 8);
        assert_eq!(text, "Crème br");
        assert_eq!(text.chars().count(), 8);
    }

    #[tokio::test]
    async fn test_success_page_is_extracted() {
        let url = serve_once("200 OK", "<h1>Business VoIP</h1><nav>Menu</nav>").await;
        let fetcher = HttpContextFetcher::new(5, 1800).unwrap();
        assert_eq!(fetcher.fetch(&url).await, "Business VoIP");
    }

    #[tokio::test]
    async fn test_error_status_body_is_still_parsed() {
        let url = serve_once(
            "404 Not Found",
            "<h1>Page moved</h1><p>Try our Casino Bonus offers</p>",
        )
        .await;
        let fetcher = HttpContextFetcher::new(5, 1800).unwrap();
        assert_eq!(fetcher.fetch(&url).await, "Page moved Try our Casino Bonus offers");
    }
}
