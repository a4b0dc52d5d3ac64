#![forbid(unsafe_code)]

//! Content loading contract.
//!
//! Remote panel content is fetched through a [`ContentLoader`]. The modal
//! only needs a string back; transport, redirects and TLS are the loader's
//! business. [`extract_body`] then keeps the body interior of the returned
//! document and drops the head and doctype.

use std::cell::Cell;

use futures::future::LocalBoxFuture;
use scrim_core::ElementId;
use web_time::{SystemTime, UNIX_EPOCH};

use crate::error::LoadError;

/// One GET request for panel content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// URL as configured or clicked.
    pub url: String,
    /// URL to actually request (cache-busted when caching is off).
    pub effective_url: String,
    /// Whether cached responses are acceptable.
    pub cache: bool,
}

/// Fetches remote documents.
pub trait ContentLoader {
    /// Fetch `request.effective_url` and return the raw response text.
    fn fetch(&self, request: FetchRequest) -> LocalBoxFuture<'static, Result<String, LoadError>>;
}

/// Produces strictly increasing `_=<stamp>` query parameters.
#[derive(Debug, Default)]
pub struct CacheBuster {
    last: Cell<u64>,
}

impl CacheBuster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next stamp: wall-clock milliseconds, bumped past the previous stamp.
    pub fn next_stamp(&self) -> u64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        let stamp = now.max(self.last.get().saturating_add(1));
        self.last.set(stamp);
        stamp
    }

    /// Build the request for `url` under the given cache policy.
    pub fn request(&self, url: &str, cache: bool) -> FetchRequest {
        let effective_url = if cache {
            url.to_string()
        } else {
            append_query(url, "_", &self.next_stamp().to_string())
        };
        FetchRequest {
            url: url.to_string(),
            effective_url,
            cache,
        }
    }
}

/// Append `key=value` to the query string, ahead of any fragment.
fn append_query(url: &str, key: &str, value: &str) -> String {
    let (base, fragment) = match url.find('#') {
        Some(i) => url.split_at(i),
        None => (url, ""),
    };
    let sep = if base.contains('?') { '&' } else { '?' };
    format!("{base}{sep}{key}={value}{fragment}")
}

/// Body interior of an HTML document.
///
/// Starts at the first `<body` tag (case-insensitive), or at the beginning
/// when there is none, and ends at the first `</body>` after it, or at the
/// end. The opening tag and one newline after it are dropped.
pub fn extract_body(html: &str) -> &str {
    // ASCII lowercasing keeps byte offsets identical.
    let lower = html.to_ascii_lowercase();

    let start = match lower.find("<body") {
        Some(open) => match lower[open..].find('>') {
            Some(close) => {
                let mut after = open + close + 1;
                if lower[after..].starts_with("\r\n") {
                    after += 2;
                } else if lower[after..].starts_with('\n') {
                    after += 1;
                }
                after
            }
            // Unterminated opening tag.
            None => html.len(),
        },
        None => 0,
    };

    let end = lower[start..]
        .find("</body>")
        .map_or(html.len(), |i| start + i);

    &html[start..end]
}

/// What an open or swap will put into the panel body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// The body already holds the content.
    Present,
    /// Markup to inject.
    Fragment(String),
    /// An existing element to move into the body.
    Element(ElementId),
}
