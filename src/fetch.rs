//! Remote data sources: fetch a JSON document and hand it to a continuation.
//!
//! The facade only sees the [`JsonFetch`] callback contract; [`HttpFetcher`] is
//! the default implementation on top of a blocking `reqwest` client, so both
//! callbacks run before `fetch_json` returns. Other implementations may defer.
//!
//! ```no_run
//! # use chartkick::fetch::{HttpFetcher, JsonFetch};
//! let fetcher = HttpFetcher::new()?.with_base_url("https://example.com/api");
//! fetcher.fetch_json(
//!     "sales.json",
//!     Box::new(|data| println!("{data}")),
//!     Box::new(|message| eprintln!("{message}")),
//! );
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::{Context, Result, bail};
use log::{debug, warn};
use reqwest::blocking::Client as HttpClient;
use reqwest::redirect::Policy;
use serde_json::Value;
use std::time::Duration;

pub type OnSuccess = Box<dyn FnOnce(Value)>;
pub type OnError = Box<dyn FnOnce(String)>;

/// HTTP JSON retrieval with success/error continuations.
pub trait JsonFetch {
    /// Fetch `url` and call exactly one of the continuations.
    fn fetch_json(&self, url: &str, on_success: OnSuccess, on_error: OnError);
}

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    /// Prefix for references that are not absolute URLs.
    pub base_url: Option<String>,
    http: HttpClient,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(30))
    }

    /// Client with a total request timeout of `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .redirect(Policy::limited(5))
            .user_agent(concat!("chartkick-rs/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("build http client")?;
        Ok(Self {
            base_url: None,
            http,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Absolute URLs pass through; anything else is joined onto `base_url`.
    pub fn resolve(&self, reference: &str) -> String {
        let absolute = reference.starts_with("http://") || reference.starts_with("https://");
        match &self.base_url {
            Some(base) if !absolute => format!(
                "{}/{}",
                base.trim_end_matches('/'),
                reference.trim_start_matches('/')
            ),
            _ => reference.to_string(),
        }
    }

    /// GET `url` and decode the body as JSON. One attempt, no retries.
    pub fn get_json(&self, url: &str) -> Result<Value> {
        let resp = self.http.get(url).send().context("network error")?;
        let status = resp.status();
        if !status.is_success() {
            bail!("request failed with HTTP {}", status);
        }
        resp.json().context("decode json")
    }
}

impl JsonFetch for HttpFetcher {
    fn fetch_json(&self, url: &str, on_success: OnSuccess, on_error: OnError) {
        let url = self.resolve(url);
        debug!("fetching chart data from {url}");
        match self.get_json(&url).with_context(|| format!("GET {url}")) {
            Ok(data) => on_success(data),
            Err(e) => {
                warn!("chart data fetch failed: {e:#}");
                on_error(format!("{e:#}"));
            }
        }
    }
}
