#![forbid(unsafe_code)]

//! HTTP content loader backed by `reqwest`.
//!
//! Works natively (tokio + rustls) and on wasm32, where `reqwest` issues
//! the request through the browser's `fetch`.

use futures::future::LocalBoxFuture;
use reqwest::header::{ACCEPT, CACHE_CONTROL, PRAGMA};
use reqwest::{Client, Url};
use scrim_modal::{ContentLoader, FetchRequest, LoadError};

/// Loads panel content with HTTP GET requests.
#[derive(Debug, Clone)]
pub struct HttpLoader {
    client: Client,
    base: Option<Url>,
}

impl HttpLoader {
    /// Loader with a default client and no base URL.
    pub fn new() -> Self {
        Self::with_client(Client::new())
    }

    pub fn with_client(client: Client) -> Self {
        Self { client, base: None }
    }

    /// Resolve relative URLs (`/page.html`) against `base`.
    pub fn with_base(mut self, base: Url) -> Self {
        self.base = Some(base);
        self
    }

    /// Absolute URL for `url`.
    pub fn resolve(&self, url: &str) -> Result<Url, LoadError> {
        let parsed = match &self.base {
            Some(base) => base.join(url),
            None => Url::parse(url),
        };
        parsed.map_err(|err| LoadError::Network {
            url: url.to_string(),
            message: format!("invalid URL: {err}"),
        })
    }
}

impl Default for HttpLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentLoader for HttpLoader {
    fn fetch(&self, request: FetchRequest) -> LocalBoxFuture<'static, Result<String, LoadError>> {
        let client = self.client.clone();
        let resolved = self.resolve(&request.effective_url);
        Box::pin(async move {
            let url = resolved?;
            let shown = request.effective_url;
            let mut builder = client.get(url).header(ACCEPT, "text/html");
            if !request.cache {
                builder = builder
                    .header(CACHE_CONTROL, "no-cache")
                    .header(PRAGMA, "no-cache");
            }

            let response = builder.send().await.map_err(|err| LoadError::Network {
                url: shown.clone(),
                message: err.to_string(),
            })?;
            let status = response.status();
            if !status.is_success() {
                tracing::warn!(url = %shown, status = status.as_u16(), "content request failed");
                return Err(LoadError::Http {
                    url: shown,
                    status: status.as_u16(),
                });
            }
            let text = response.text().await.map_err(|err| LoadError::Body {
                url: shown.clone(),
                message: err.to_string(),
            })?;
            tracing::debug!(url = %shown, bytes = text.len(), "content fetched");
            Ok(text)
        })
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn response(status_line: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    /// Serve one canned response; the handle yields the raw request.
    async fn serve_once(reply: String) -> (Url, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            socket.write_all(reply.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&request).into_owned()
        });
        (Url::parse(&format!("http://{addr}/")).unwrap(), handle)
    }

    fn request(url: &str, cache: bool) -> FetchRequest {
        FetchRequest {
            url: url.to_string(),
            effective_url: url.to_string(),
            cache,
        }
    }

    #[test]
    fn test_resolve_against_base() {
        let loader =
            HttpLoader::new().with_base(Url::parse("http://example.com/docs/index.html").unwrap());
        assert_eq!(
            loader.resolve("/page.html").unwrap().as_str(),
            "http://example.com/page.html"
        );
        assert_eq!(
            loader.resolve("other.html?_=5").unwrap().as_str(),
            "http://example.com/docs/other.html?_=5"
        );
    }

    #[test]
    fn edge_relative_url_without_base() {
        let err = HttpLoader::new().resolve("/page.html").unwrap_err();
        assert!(matches!(err, LoadError::Network { .. }));
        assert_eq!(err.url(), "/page.html");
    }

    #[tokio::test]
    async fn test_fetch_returns_document() {
        let (base, server) = serve_once(response("200 OK", "<body>\n<p>hi</p></body>")).await;
        let loader = HttpLoader::new().with_base(base);
        let text = loader.fetch(request("/page.html", true)).await.unwrap();
        assert_eq!(text, "<body>\n<p>hi</p></body>");

        let raw = server.await.unwrap().to_ascii_lowercase();
        assert!(raw.starts_with("get /page.html "));
        assert!(!raw.contains("cache-control: no-cache"));
    }

    #[tokio::test]
    async fn test_uncached_fetch_sends_no_cache() {
        let (base, server) = serve_once(response("200 OK", "ok")).await;
        let loader = HttpLoader::new().with_base(base);
        loader.fetch(request("/page.html?_=1", false)).await.unwrap();

        let raw = server.await.unwrap().to_ascii_lowercase();
        assert!(raw.starts_with("get /page.html?_=1 "));
        assert!(raw.contains("cache-control: no-cache"));
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let (base, server) = serve_once(response("404 Not Found", "missing")).await;
        let loader = HttpLoader::new().with_base(base);
        let err = loader.fetch(request("/gone.html", true)).await.unwrap_err();
        assert_eq!(
            err,
            LoadError::Http {
                url: "/gone.html".into(),
                status: 404
            }
        );
        server.await.unwrap();
    }

    #[tokio::test]
    async fn edge_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let err = HttpLoader::new()
            .fetch(request(&format!("http://{addr}/page.html"), true))
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::Network { .. }));
    }
}
