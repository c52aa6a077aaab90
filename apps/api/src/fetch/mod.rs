//! Page retrieval: one GET per URL, reduced to readable text.

pub mod extract;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client, Response};
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use crate::fetch::extract::extract_readable_text;

/// User-Agent string for page requests.
const USER_AGENT: &str = concat!("postgen/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_REDIRECTS: usize = 5;
/// Body bytes read per character of page text the pipeline keeps. HTML is
/// mostly markup, so the raw page is allowed to be much larger than its text.
const BODY_BYTES_PER_PAGE_CHAR: usize = 32;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} responded with status {status}")]
    Status { url: String, status: u16 },

    #[error("unsupported content type '{content_type}' at {url}")]
    UnsupportedContent { url: String, content_type: String },

    #[error("no readable text at {url}")]
    EmptyPage { url: String },
}

#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Retrieves the readable text of `url`.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

pub struct HttpPageFetcher {
    client: Client,
    max_body_bytes: usize,
}

impl HttpPageFetcher {
    /// `max_page_chars` is the pipeline's page text cap; the response body is
    /// read up to a proportional byte limit and the rest is dropped.
    pub fn new(max_page_chars: usize) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            max_body_bytes: max_page_chars.saturating_mul(BODY_BYTES_PER_PAGE_CHAR),
        })
    }

    /// Reads the body chunk by chunk and stops at `max_body_bytes`.
    async fn read_body(&self, response: &mut Response, url: &Url) -> Result<String, FetchError> {
        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            let room = self.max_body_bytes.saturating_sub(body.len());
            if chunk.len() > room {
                body.extend_from_slice(&chunk[..room]);
                debug!(url = %url, limit = self.max_body_bytes, "Page body truncated");
                break;
            }
            body.extend_from_slice(&chunk);
        }
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let target = normalize_url(url)?;
        info!(url = %target, "Fetching page");

        let mut response = self.client.get(target.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: target.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(media_type);

        let is_html = match content_type.as_deref() {
            Some("text/html") | Some("application/xhtml+xml") => true,
            Some("text/plain") | None => false,
            Some(other) => {
                return Err(FetchError::UnsupportedContent {
                    url: target.to_string(),
                    content_type: other.to_string(),
                })
            }
        };

        let body = self.read_body(&mut response, &target).await?;
        debug!(url = %target, bytes = body.len(), ?content_type, "Page downloaded");

        if is_html {
            Ok(extract_readable_text(&body))
        } else {
            Ok(body)
        }
    }
}

/// Parses `raw` as an http(s) URL. A bare host such as `b.com/page` is read
/// as `https://b.com/page`.
pub fn normalize_url(raw: &str) -> Result<Url, FetchError> {
    let raw = raw.trim();
    let parsed = match Url::parse(raw) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(&format!("https://{raw}"))
            .map_err(|e| FetchError::InvalidUrl {
                url: raw.to_string(),
                reason: e.to_string(),
            })?,
        Err(e) => {
            return Err(FetchError::InvalidUrl {
                url: raw.to_string(),
                reason: e.to_string(),
            })
        }
    };

    match parsed.scheme() {
        "http" | "https" if parsed.host_str().is_some() => Ok(parsed),
        scheme => Err(FetchError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{scheme}'"),
        }),
    }
}

/// `text/html; charset=utf-8` → `text/html`
fn media_type(header: &str) -> String {
    header
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_normalize_bare_host_gets_https() {
        let url = normalize_url("b.com").unwrap();
        assert_eq!(url.as_str(), "https://b.com/");
    }

    #[test]
    fn test_normalize_keeps_explicit_http() {
        let url = normalize_url("http://example.org/a?b=1").unwrap();
        assert_eq!(url.as_str(), "http://example.org/a?b=1");
    }

    #[test]
    fn test_normalize_rejects_other_schemes() {
        let err = normalize_url("ftp://example.org/file").unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl { .. }));
    }

    #[test]
    fn test_media_type_strips_parameters() {
        assert_eq!(media_type("Text/HTML; charset=UTF-8"), "text/html");
        assert_eq!(media_type("application/pdf"), "application/pdf");
    }

    #[tokio::test]
    async fn test_fetch_html_returns_readable_text() {
        let server = MockServer::start().await;

        let html = r#"<html><head><title>t</title><style>p{}</style></head>
            <body><nav>Home | About</nav>
            <article><h1>Coffee brewing</h1><p>Coffee brewing is   an art.</p></article>
            <footer>(c) 2024</footer></body></html>"#;

        Mock::given(method("GET"))
            .and(path("/guide"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(html, "text/html; charset=utf-8"))
            .mount(&server)
            .await;

        let fetcher = HttpPageFetcher::new(24_000).unwrap();
        let text = fetcher.fetch(&format!("{}/guide", server.uri())).await.unwrap();
        assert_eq!(text, "Coffee brewing\nCoffee brewing is an art.");
    }

    #[tokio::test]
    async fn test_fetch_plain_text_is_passed_through() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("plain words"))
            .mount(&server)
            .await;

        let fetcher = HttpPageFetcher::new(24_000).unwrap();
        assert_eq!(fetcher.fetch(&server.uri()).await.unwrap(), "plain words");
    }

    #[tokio::test]
    async fn test_fetch_not_found_is_status_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = HttpPageFetcher::new(24_000).unwrap();
        let err = fetcher.fetch(&server.uri()).await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_fetch_non_plain_text_types_are_unsupported() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("body { color: red }", "text/css"))
            .mount(&server)
            .await;

        let fetcher = HttpPageFetcher::new(24_000).unwrap();
        let err = fetcher.fetch(&server.uri()).await.unwrap_err();
        assert!(matches!(
            err,
            FetchError::UnsupportedContent { ref content_type, .. } if content_type == "text/css"
        ));
    }

    #[tokio::test]
    async fn test_fetch_stops_reading_at_body_limit() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("x".repeat(10_000)))
            .mount(&server)
            .await;

        // 10 page chars allow 320 body bytes
        let fetcher = HttpPageFetcher::new(10).unwrap();
        let text = fetcher.fetch(&server.uri()).await.unwrap();
        assert_eq!(text.len(), 10 * BODY_BYTES_PER_PAGE_CHAR);
    }

    #[tokio::test]
    async fn test_fetch_binary_content_is_unsupported() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0u8, 1, 2], "application/pdf"))
            .mount(&server)
            .await;

        let fetcher = HttpPageFetcher::new(24_000).unwrap();
        let err = fetcher.fetch(&server.uri()).await.unwrap_err();
        assert!(matches!(
            err,
            FetchError::UnsupportedContent { ref content_type, .. } if content_type == "application/pdf"
        ));
    }
}
