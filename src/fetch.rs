use std::future::Future;
use std::time::{Duration, Instant};

use serde::Deserialize;
use spider_client::shapes::request::{ReturnFormat, ReturnFormatHandling};
use spider_client::{RequestParams, Spider};
use tracing::{debug, warn};
use url::Url;

use crate::config::Settings;
use crate::error::ImportError;

const BASE_BACKOFF_MS: u64 = 2000;
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Source of raw HTML for a page. The CORS proxy is one implementation; anything
/// that can turn a URL into markup can stand in for it.
pub trait PageFetcher: Send + Sync {
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<String, ImportError>> + Send;
}

// ── CORS proxy ──

/// `{ "contents": "<html>…" }` as returned by allorigins-style proxies.
#[derive(Debug, Deserialize)]
struct ProxyEnvelope {
    contents: Option<String>,
}

pub struct ProxyFetcher {
    http: reqwest::Client,
    endpoint: String,
}

impl ProxyFetcher {
    pub fn new(endpoint: &str, timeout: Option<Duration>) -> Result<Self, ImportError> {
        let mut builder = reqwest::Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let http = builder
            .build()
            .map_err(|e| ImportError::fetch(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            http,
            endpoint: endpoint.to_string(),
        })
    }
}

impl PageFetcher for ProxyFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, ImportError> {
        let start = Instant::now();
        let res = self
            .http
            .get(&self.endpoint)
            .query(&[("url", url.as_str())])
            .send()
            .await
            .map_err(|e| ImportError::fetch(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            return Err(ImportError::http_status(status.as_u16()));
        }

        let envelope: ProxyEnvelope = res
            .json()
            .await
            .map_err(|e| ImportError::fetch(format!("Invalid proxy response: {}", e)))?;
        debug!(
            "Proxy fetched {} in {}ms",
            url,
            start.elapsed().as_millis()
        );

        envelope
            .contents
            .ok_or_else(|| ImportError::fetch("Proxy response has no contents"))
    }
}

// ── spider.cloud ──

pub struct SpiderFetcher {
    spider: Spider,
}

impl SpiderFetcher {
    pub fn new(api_key: &str) -> Result<Self, ImportError> {
        let spider = Spider::new(Some(api_key.to_string()))
            .map_err(|e| ImportError::fetch(format!("Failed to create Spider client: {}", e)))?;
        Ok(Self { spider })
    }
}

impl PageFetcher for SpiderFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, ImportError> {
        let params = RequestParams {
            return_format: Some(ReturnFormatHandling::Single(ReturnFormat::Raw)),
            ..Default::default()
        };

        let response = self
            .spider
            .scrape_url(url.as_str(), Some(params), "application/json")
            .await
            .map_err(|e| ImportError::fetch(format!("Spider scrape failed: {}", e)))?;

        let parsed: serde_json::Value = match response.as_str() {
            Some(s) => serde_json::from_str(s).unwrap_or(response.clone()),
            None => response,
        };
        let first = parsed.as_array().and_then(|arr| arr.first());

        let status = first
            .and_then(|obj| obj.get("status"))
            .and_then(|s| s.as_u64())
            .map(|s| s as u16);
        if let Some(code) = status.filter(|c| !(200..300).contains(c)) {
            return Err(ImportError::http_status(code));
        }

        first
            .and_then(|obj| obj.get("content"))
            .and_then(|c| c.as_str())
            .map(str::to_string)
            .ok_or_else(|| ImportError::fetch("No content in spider response"))
    }
}

// ── Provider selection ──

pub enum Provider {
    Proxy(ProxyFetcher),
    Spider(SpiderFetcher),
}

pub type Fetcher = RetryingFetcher<Provider>;

/// Build the configured provider wrapped in the retry policy.
pub fn build_fetcher(settings: &Settings) -> anyhow::Result<Fetcher> {
    let provider = match settings.provider.as_str() {
        "proxy" => Provider::Proxy(ProxyFetcher::new(
            &settings.proxy_url,
            settings.timeout_secs.map(Duration::from_secs),
        )?),
        "spider" => {
            let key = settings.spider_api_key.as_deref().ok_or_else(|| {
                anyhow::anyhow!("RECIPE_SPIDER_API_KEY must be set for the spider provider")
            })?;
            Provider::Spider(SpiderFetcher::new(key)?)
        }
        other => anyhow::bail!("Unknown provider '{}' (expected proxy or spider)", other),
    };
    Ok(RetryingFetcher::new(provider, settings.max_retries))
}

impl PageFetcher for Provider {
    async fn fetch(&self, url: &Url) -> Result<String, ImportError> {
        match self {
            Provider::Proxy(p) => p.fetch(url).await,
            Provider::Spider(s) => s.fetch(url).await,
        }
    }
}

// ── Retry ──

/// Retries retryable failures with exponential backoff. `max_retries == 0` is a
/// single attempt.
pub struct RetryingFetcher<F> {
    inner: F,
    max_retries: u32,
    base_backoff: Duration,
}

impl<F: PageFetcher> RetryingFetcher<F> {
    pub fn new(inner: F, max_retries: u32) -> Self {
        Self {
            inner,
            max_retries,
            base_backoff: Duration::from_millis(BASE_BACKOFF_MS),
        }
    }

    #[cfg(test)]
    fn with_backoff(mut self, base: Duration) -> Self {
        self.base_backoff = base;
        self
    }

    /// Doubles per attempt, capped at `MAX_BACKOFF`.
    fn backoff(&self, attempt: u32) -> Duration {
        self.base_backoff
            .checked_mul(2u32.saturating_pow(attempt))
            .map_or(MAX_BACKOFF, |d| d.min(MAX_BACKOFF))
    }
}

impl<F: PageFetcher> PageFetcher for RetryingFetcher<F> {
    async fn fetch(&self, url: &Url) -> Result<String, ImportError> {
        let mut attempt = 0;
        loop {
            match self.inner.fetch(url).await {
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    let backoff = self.backoff(attempt);
                    warn!(
                        "Fetch failed for {} (attempt {}/{}): {}, backing off {:.1}s",
                        url,
                        attempt + 1,
                        self.max_retries,
                        e,
                        backoff.as_secs_f64()
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
}
