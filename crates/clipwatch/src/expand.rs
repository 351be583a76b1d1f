//! Short-link expansion.
//!
//! Text mentioning a known shortener domain is sent as-is to a
//! [`LinkResolver`], which follows redirects and reports where they end.
//! Resolution never fails from the caller's point of view: any problem
//! yields the input text unchanged.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::redirect::Policy;
use tracing::debug;

use crate::error::Result;

/// Domains whose links get expanded.
pub const SHORT_LINK_DOMAINS: [&str; 3] = ["bit.ly", "t.co", "tinyurl.com"];

/// Upper bound on one resolution request.
pub const RESOLVE_TIMEOUT: Duration = Duration::from_secs(5);

const MAX_REDIRECTS: usize = 10;

/// Check if `text` mentions a short-link domain anywhere.
#[must_use]
pub fn contains_short_link(text: &str) -> bool {
    SHORT_LINK_DOMAINS.iter().any(|domain| text.contains(domain))
}

/// Resolves a URL to the destination its redirects lead to.
#[async_trait]
pub trait LinkResolver: Send + Sync {
    /// Return the final URL for `url`, or `url` itself if it cannot be
    /// resolved.
    async fn resolve(&self, url: &str) -> String;
}

/// Resolver issuing one HTTP `HEAD` request per call.
#[derive(Debug, Clone)]
pub struct HttpResolver {
    client: reqwest::Client,
}

impl HttpResolver {
    /// Create a resolver with the standard timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new() -> Result<Self> {
        Self::with_timeout(RESOLVE_TIMEOUT)
    }

    /// Create a resolver with a custom timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .redirect(Policy::limited(MAX_REDIRECTS))
            .timeout(timeout)
            .build()?;
        Ok(Self::from_client(client))
    }

    /// Wrap a preconfigured client. The client's redirect policy decides
    /// how far a link is followed.
    #[must_use]
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LinkResolver for HttpResolver {
    async fn resolve(&self, url: &str) -> String {
        match self.client.head(url).send().await {
            Ok(response) if response.status().is_success() => {
                let resolved = response.url().to_string();
                debug!(from = %url, to = %resolved, "Short link resolved");
                resolved
            }
            Ok(response) => {
                debug!(url = %url, status = %response.status(), "Short link did not resolve");
                url.to_string()
            }
            Err(e) => {
                debug!(url = %url, error = %e, "Short link request failed");
                url.to_string()
            }
        }
    }
}

/// Resolver that never touches the network.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineResolver;

#[async_trait]
impl LinkResolver for OfflineResolver {
    async fn resolve(&self, url: &str) -> String {
        url.to_string()
    }
}

/// Detects short links and expands them through a resolver.
#[derive(Clone)]
pub struct ShortLinkExpander {
    resolver: Arc<dyn LinkResolver>,
}

impl std::fmt::Debug for ShortLinkExpander {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShortLinkExpander").finish_non_exhaustive()
    }
}

impl ShortLinkExpander {
    /// Expand links through `resolver`.
    pub fn new(resolver: impl LinkResolver + 'static) -> Self {
        Self {
            resolver: Arc::new(resolver),
        }
    }

    /// Expander that detects short links but leaves them as they are.
    #[must_use]
    pub fn offline() -> Self {
        Self::new(OfflineResolver)
    }

    /// Expand `text` if it mentions a short-link domain.
    ///
    /// Makes at most one resolver call. Returns `None` when there is nothing
    /// to expand or the resolver handed back the same text.
    pub async fn expand(&self, text: &str) -> Option<String> {
        if !contains_short_link(text) {
            return None;
        }
        let resolved = self.resolver.resolve(text).await;
        (resolved != text).then_some(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve `/short` as a redirect to `/final`, `/final` as 200, anything
    /// else as 404. Returns the base URL.
    async fn spawn_redirect_server() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                tokio::spawn(async move {
                    let mut buf = vec![0u8; 2048];
                    let n = socket.read(&mut buf).await.unwrap_or(0);
                    let request = String::from_utf8_lossy(&buf[..n]);
                    let status = match request.split_whitespace().nth(1) {
                        Some("/short") => "301 Moved Permanently\r\nLocation: /final",
                        Some("/final") => "200 OK",
                        _ => "404 Not Found",
                    };
                    let response = format!(
                        "HTTP/1.1 {status}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                });
            }
        });
        base
    }

    /// Accept connections and never answer. Returns the base URL.
    async fn spawn_stalling_server() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });
        base
    }

    fn local_resolver_with_timeout(timeout: Duration) -> HttpResolver {
        let client = reqwest::Client::builder()
            .no_proxy()
            .redirect(Policy::limited(MAX_REDIRECTS))
            .timeout(timeout)
            .build()
            .unwrap();
        HttpResolver::from_client(client)
    }

    fn local_resolver() -> HttpResolver {
        local_resolver_with_timeout(RESOLVE_TIMEOUT)
    }

    #[derive(Debug, Default)]
    struct CountingResolver {
        target: Option<String>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl LinkResolver for CountingResolver {
        async fn resolve(&self, url: &str) -> String {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.target.clone().unwrap_or_else(|| url.to_string())
        }
    }

    #[test]
    fn test_contains_short_link() {
        assert!(contains_short_link("https://bit.ly/abc"));
        assert!(contains_short_link("see https://t.co/xyz now"));
        assert!(contains_short_link("tinyurl.com/q"));
        assert!(!contains_short_link("https://example.com/"));
    }

    #[test]
    fn test_contains_short_link_matches_substrings() {
        // Substring match, not a host match
        assert!(contains_short_link("https://start.com/"));
    }

    #[tokio::test]
    async fn test_expand_returns_target() {
        let calls = Arc::new(AtomicUsize::new(0));
        let expander = ShortLinkExpander::new(CountingResolver {
            target: Some("https://example.com/final".to_string()),
            calls: Arc::clone(&calls),
        });

        let out = expander.expand("https://bit.ly/abc").await;
        assert_eq!(out.as_deref(), Some("https://example.com/final"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_expand_skips_plain_text() {
        let calls = Arc::new(AtomicUsize::new(0));
        let expander = ShortLinkExpander::new(CountingResolver {
            target: Some("unused".to_string()),
            calls: Arc::clone(&calls),
        });

        assert_eq!(expander.expand("https://example.com/").await, None);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_expand_unresolved_is_none() {
        let expander = ShortLinkExpander::new(CountingResolver::default());
        assert_eq!(expander.expand("https://bit.ly/abc").await, None);
    }

    #[tokio::test]
    async fn test_offline_expander() {
        assert_eq!(ShortLinkExpander::offline().expand("https://t.co/x").await, None);
    }

    #[tokio::test]
    async fn test_http_resolver_invalid_url_returns_input() {
        let resolver = HttpResolver::new().unwrap();
        let text = "not a url but mentions bit.ly";
        assert_eq!(resolver.resolve(text).await, text);
    }

    #[tokio::test]
    async fn test_http_resolver_follows_redirect() {
        let base = spawn_redirect_server().await;
        let resolved = local_resolver().resolve(&format!("{base}/short")).await;
        assert_eq!(resolved, format!("{base}/final"));
    }

    #[tokio::test]
    async fn test_http_resolver_non_success_returns_input() {
        let base = spawn_redirect_server().await;
        let url = format!("{base}/missing");
        assert_eq!(local_resolver().resolve(&url).await, url);
    }

    #[tokio::test]
    async fn test_http_resolver_unreachable_returns_input() {
        let resolver = HttpResolver::with_timeout(Duration::from_millis(500)).unwrap();
        // Port 9 on loopback: connection refused or timeout, never a response
        let url = "http://127.0.0.1:9/bit.ly";
        assert_eq!(resolver.resolve(url).await, url);
    }

    #[tokio::test]
    async fn test_http_resolver_stalled_server_times_out() {
        let base = spawn_stalling_server().await;
        let url = format!("{base}/bit.ly/stall");
        let resolver = local_resolver_with_timeout(Duration::from_millis(300));

        let started = std::time::Instant::now();
        assert_eq!(resolver.resolve(&url).await, url);
        assert!(started.elapsed() < RESOLVE_TIMEOUT);
    }
}
