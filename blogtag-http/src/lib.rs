//! Minimal HTTP client for fetching articles and roster documents.
//!
//! - Request options: per-request timeout
//! - Absolute URLs only; there is no base URL to join against
//! - Exactly one attempt per request; failures are returned, never retried
//! - Optional *raw* request/response logging via `BLOGTAG_HTTP_RAW=1`
//!
//! Example (no_run):
//! ```no_run
//! # async fn demo() -> Result<(), blogtag_http::HttpError> {
//! let client = blogtag_http::HttpClient::new()?;
//! let body = client
//!     .get_text("https://example.com/blog/post", blogtag_http::RequestOpts::default())
//!     .await?;
//! assert!(!body.is_empty());
//! # Ok(()) }
//! ```
//!
//! Observability: structured `tracing` events are emitted for request start,
//! response headers, body snippets (truncated), final errors, and (optionally)
//! raw request/response lines (target `http.raw`) when `BLOGTAG_HTTP_RAW=1`.

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, Method, StatusCode, Url};
use std::env;
use std::time::{Duration, Instant};
use thiserror::Error;

// ==============================
// Raw logging toggles
// ==============================

const RAW_ENV: &str = "BLOGTAG_HTTP_RAW";
const RAW_MAX_BODY: usize = 64 * 1024; // cap raw body logs (64 KiB)
const SNIPPET_MAX: usize = 500;

pub const DEFAULT_USER_AGENT: &str = concat!("blogtag/", env!("CARGO_PKG_VERSION"));

fn raw_enabled() -> bool {
    matches!(
        env::var(RAW_ENV).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

/// Render a best-effort curl command for repro/debug.
fn make_curl(method: &Method, url: &Url, headers: &HeaderMap) -> String {
    let mut parts = vec!["curl".to_string(), format!("-X{}", method)];
    for (name, val) in redact_headers(headers) {
        parts.push(format!("-H '{}: {}'", name, val.replace('\'', r"'\''")));
    }
    parts.push(format!("'{}'", url.as_str()));
    parts.join(" ")
}

/// Redact sensitive headers for logging
fn redact_headers(h: &HeaderMap) -> Vec<(String, String)> {
    h.iter()
        .map(|(k, v)| {
            let key = k.as_str().to_string();
            let mut val = v.to_str().unwrap_or("").to_string();
            if key.eq_ignore_ascii_case("authorization") || key.eq_ignore_ascii_case("cookie") {
                val = "<redacted>".into();
            }
            (key, val)
        })
        .collect()
}

// ==============================
// Errors
// ==============================

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("request build failed: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("server returned error {status} for {url}: {body_snippet}")]
    Status {
        status: StatusCode,
        url: String,
        body_snippet: String,
    },
}

// ==============================
// Request Options
// ==============================

/// Per-request tuning knobs for the HTTP client.
///
/// ```
/// use blogtag_http::RequestOpts;
/// use std::time::Duration;
///
/// let opts = RequestOpts {
///     timeout: Some(Duration::from_secs(30)),
/// };
///
/// assert_eq!(opts.timeout.unwrap().as_secs(), 30);
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestOpts {
    /// Overrides the client's default timeout for this request.
    pub timeout: Option<Duration>,
}

// ==============================
// Client
// ==============================

#[derive(Clone, Debug)]
pub struct HttpClient {
    inner: Client,
    /// Applied when a request does not carry its own timeout. `None` waits indefinitely.
    pub default_timeout: Option<Duration>,
    pub user_agent: String,
}

impl HttpClient {
    /// Construct a client with no default timeout.
    ///
    /// ```no_run
    /// use blogtag_http::{HttpClient, HttpError};
    ///
    /// let client = HttpClient::new()?;
    /// assert!(client.default_timeout.is_none());
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn new() -> Result<Self, HttpError> {
        let inner = Client::builder()
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self {
            inner,
            default_timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        })
    }

    /// Set the timeout used when a request does not override it.
    ///
    /// ```no_run
    /// use blogtag_http::{HttpClient, HttpError};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::new()?.with_timeout(Duration::from_secs(2));
    /// assert_eq!(client.default_timeout, Some(Duration::from_secs(2)));
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.default_timeout = Some(dur);
        self
    }

    /// Override the `User-Agent` header sent with every request.
    pub fn with_user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = ua.into();
        self
    }

    /// GET raw bytes from an absolute URL.
    pub async fn get_bytes(&self, url: &str, opts: RequestOpts) -> Result<Bytes, HttpError> {
        self.request_internal(Method::GET, url, opts).await
    }

    /// GET a body and decode it as UTF-8, replacing invalid sequences.
    pub async fn get_text(&self, url: &str, opts: RequestOpts) -> Result<String, HttpError> {
        let bytes = self.get_bytes(url, opts).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    // ==============================
    // Core request implementation
    // ==============================

    async fn request_internal(
        &self,
        method: Method,
        url: &str,
        opts: RequestOpts,
    ) -> Result<Bytes, HttpError> {
        let url = Url::parse(url).map_err(|e| HttpError::Url(format!("{url}: {e}")))?;

        // ----- Build request -----
        let mut rb = self.inner.request(method.clone(), url.clone());

        let timeout = opts.timeout.or(self.default_timeout);
        if let Some(t) = timeout {
            rb = rb.timeout(t);
        }

        let mut headers = HeaderMap::new();
        let ua = HeaderValue::from_str(&self.user_agent)
            .map_err(|e| HttpError::Build(format!("invalid User-Agent: {e}")))?;
        headers.insert(USER_AGENT, ua);
        rb = rb.headers(headers.clone());

        let req_id = format!(
            "r{:x}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        );

        tracing::debug!(
            req_id=%req_id,
            method=%method,
            host_path=%format!("{}{}", url.host_str().unwrap_or("-"), url.path()),
            timeout_ms=?timeout.map(|t| t.as_millis() as u64),
            "http.request.start"
        );

        if raw_enabled() {
            let curl = make_curl(&method, &url, &headers);
            tracing::debug!(target: "http.raw", %req_id, %curl, "request");
        }

        // ----- Send -----
        let t0 = Instant::now();
        let resp = rb.send().await.map_err(|err| {
            let message = err.to_string();
            tracing::warn!(req_id=%req_id, message=%message, "http.network_error.send");
            HttpError::Network(message)
        })?;
        let status = resp.status();
        let resp_headers = resp.headers().clone();
        let bytes = resp.bytes().await.map_err(|err| {
            let message = err.to_string();
            tracing::warn!(req_id=%req_id, message=%message, "http.network_error.body");
            HttpError::Network(message)
        })?;
        let dur_ms = t0.elapsed().as_millis() as u64;

        tracing::debug!(
            req_id=%req_id,
            %status,
            duration_ms=dur_ms,
            body_len=bytes.len(),
            content_type=?resp_headers.get(reqwest::header::CONTENT_TYPE).and_then(|v| v.to_str().ok()),
            "http.response.headers"
        );

        if raw_enabled() {
            let hdrs = redact_headers(&resp_headers);
            let truncated = bytes.len() > RAW_MAX_BODY;
            let text = String::from_utf8_lossy(&bytes[..bytes.len().min(RAW_MAX_BODY)]);
            tracing::info!(
                target:"http.raw",
                %req_id,
                status=%status,
                duration_ms=dur_ms,
                headers=?hdrs,
                body=%text,
                truncated
            );
        }

        if status.is_success() {
            return Ok(bytes);
        }

        let body_snippet = snip_body(&bytes);
        tracing::warn!(
            req_id=%req_id,
            %status,
            url=%url,
            body_snippet=%body_snippet,
            "http.error"
        );
        Err(HttpError::Status {
            status,
            url: url.to_string(),
            body_snippet,
        })
    }
}

// ==============================
// Helpers
// ==============================

fn snip_body(body: &[u8]) -> String {
    let mut snip = String::from_utf8_lossy(body).to_string();
    if snip.len() > SNIPPET_MAX {
        let mut cut = SNIPPET_MAX;
        while !snip.is_char_boundary(cut) {
            cut -= 1;
        }
        snip.truncate(cut);
        snip.push_str("...");
    }
    snip
}
