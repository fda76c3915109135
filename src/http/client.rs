use crate::rate_limiter::RateLimiter;
use anyhow::{Context, Result};
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Client;
use std::time::Duration;

const AUTH_HEADER: &str = "X-TBA-Auth-Key";

/// HTTP client with built-in rate limiting
pub struct RateLimitedClient {
    client: Client,
    rate_limiter: RateLimiter,
}

impl RateLimitedClient {
    pub fn new(
        user_agent: &str,
        timeout_secs: u64,
        rate_limit_ms: u64,
        auth_key: Option<&str>,
    ) -> Result<Self> {
        let client = Self::build_client(user_agent, timeout_secs, auth_key)?;
        let rate_limiter = RateLimiter::new(rate_limit_ms);

        Ok(Self {
            client,
            rate_limiter,
        })
    }

    pub async fn get(&mut self, url: &str) -> Result<reqwest::Response> {
        self.rate_limiter.wait().await;
        self.send_get_request(url).await
    }

    fn build_client(user_agent: &str, timeout_secs: u64, auth_key: Option<&str>) -> Result<Client> {
        Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_secs))
            .default_headers(Self::build_headers(auth_key)?)
            .build()
            .context("Failed to build HTTP client")
    }

    fn build_headers(auth_key: Option<&str>) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        if let Some(key) = auth_key {
            let mut value = HeaderValue::from_str(key.trim()).context("Invalid TBA auth key")?;
            value.set_sensitive(true);
            headers.insert(AUTH_HEADER, value);
        }
        Ok(headers)
    }

    async fn send_get_request(&self, url: &str) -> Result<reqwest::Response> {
        debug!("GET {}", url);
        self.client
            .get(url)
            .send()
            .await
            .context("Failed to send GET request")
    }
}
