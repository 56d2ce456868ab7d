// src/session.rs

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::error::{FlowError, Result};

/// Shared outbound HTTP session: one connection pool, one rate limiter.
///
/// Built once at startup and handed to every adapter and notifier through an `Arc`.
pub struct HttpSession {
    client: Client,
    rate_limiter: Arc<Mutex<RateLimiter>>,
}

impl HttpSession {
    pub fn new(
        request_timeout: Duration,
        requests_per_second: u32,
        max_burst: u32,
    ) -> std::result::Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(request_timeout)
            .user_agent(concat!("flowrank/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(HttpSession {
            client,
            rate_limiter: Arc::new(Mutex::new(RateLimiter::new(requests_per_second, max_burst))),
        })
    }

    /// GETs `url` and decodes the body as JSON.
    ///
    /// Transport failures and non-2xx statuses become `SourceUnavailable`,
    /// undecodable bodies become `SourceParse`, both tagged with `source`.
    pub async fn get_json(&self, source: &str, url: &str, headers: &[(&str, String)]) -> Result<Value> {
        self.rate_limiter.lock().await.acquire().await;
        debug!(source, url, "GET");

        let response = self
            .client
            .get(url)
            .headers(build_headers(source, headers)?)
            .send()
            .await
            .map_err(|e| FlowError::unavailable(source, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FlowError::unavailable(
                source,
                format!("HTTP {}: {}", status, truncate(&body, 200)),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FlowError::unavailable(source, e))?;

        serde_json::from_str::<Value>(&body).map_err(|e| FlowError::parse(source, e))
    }

    /// POSTs a JSON body and returns the raw response for the caller to inspect.
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
    ) -> std::result::Result<reqwest::Response, reqwest::Error> {
        self.rate_limiter.lock().await.acquire().await;
        self.client.post(url).json(body).send().await
    }
}

fn build_headers(source: &str, headers: &[(&str, String)]) -> Result<HeaderMap> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| FlowError::unavailable(source, e))?;
        let value = HeaderValue::from_str(value).map_err(|e| FlowError::unavailable(source, e))?;
        map.insert(name, value);
    }
    Ok(map)
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Token bucket refilled at `requests_per_second`, holding at most `max_burst` tokens.
struct RateLimiter {
    tokens: u32,
    max_burst: u32,
    last_refill_time: Instant,
    refill_interval: Duration,
}

impl RateLimiter {
    fn new(requests_per_second: u32, max_burst: u32) -> Self {
        let max_burst = max_burst.max(1);
        RateLimiter {
            tokens: max_burst,
            max_burst,
            last_refill_time: Instant::now(),
            refill_interval: Duration::from_secs(1) / requests_per_second.max(1),
        }
    }

    /// Waits for a token. Callers hold the session's lock across the wait, so
    /// waiters are served one at a time in lock order.
    async fn acquire(&mut self) {
        while self.tokens == 0 {
            let now = Instant::now();
            let elapsed = now - self.last_refill_time;

            if elapsed >= self.refill_interval {
                let refill_count = (elapsed.as_secs_f64() / self.refill_interval.as_secs_f64()) as u32;
                self.tokens = self.tokens.saturating_add(refill_count).min(self.max_burst);
                self.last_refill_time = now;
            } else {
                sleep(self.refill_interval - elapsed).await;
            }
        }

        self.tokens -= 1;
    }
}
