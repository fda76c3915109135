use crate::cache::Cache;
use crate::config::ApiSettings;
use crate::domain::{
    qualification_schedule, EventResponse, EventStatistics, Match, MatchResponse, TeamEventStatus,
    TeamKey,
};
use crate::errors::{fetch_context, parse_context};
use crate::http::RateLimitedClient;
use anyhow::{Context, Result};
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// The Blue Alliance API v3 client
pub struct TbaClient {
    client: RateLimitedClient,
    base_url: String,
    has_auth_key: bool,
    cache: Cache,
    read_cache: bool,
}

impl TbaClient {
    /// `read_cache = false` always hits the API but still refreshes the cache
    pub fn new(settings: &ApiSettings, cache: Cache, read_cache: bool) -> Result<Self> {
        let client = RateLimitedClient::new(
            settings.user_agent,
            settings.timeout_secs,
            settings.rate_limit_ms,
            settings.auth_key.as_deref(),
        )?;

        Ok(Self {
            client,
            base_url: settings.base_url.clone(),
            has_auth_key: settings.auth_key.is_some(),
            cache,
            read_cache,
        })
    }

    /// All events of a season
    pub async fn fetch_events(&mut self, year: i32) -> Result<Vec<EventResponse>> {
        let events: Vec<EventResponse> = self.fetch_json(&format!("/events/{}/simple", year)).await?;
        info!("Fetched {} events for {}", events.len(), year);
        Ok(events)
    }

    pub async fn fetch_event(&mut self, event_key: &str) -> Result<EventResponse> {
        let event: Option<EventResponse> =
            self.fetch_json(&format!("/event/{}/simple", event_key)).await?;
        event.with_context(|| format!("Event {} not found", event_key))
    }

    /// Every match of the event, all competition levels, in API order
    pub async fn fetch_matches(&mut self, event_key: &str) -> Result<Vec<MatchResponse>> {
        let matches: Vec<MatchResponse> =
            self.fetch_json(&format!("/event/{}/matches/simple", event_key)).await?;
        info!("Fetched {} matches for event {}", matches.len(), event_key);
        Ok(matches)
    }

    /// Played qualification matches sorted by match number
    pub async fn fetch_qualification_matches(&mut self, event_key: &str) -> Result<Vec<Match>> {
        let responses = self.fetch_matches(event_key).await?;
        let schedule = qualification_schedule(&responses)
            .with_context(|| format!("Invalid match data for event {}", event_key))?;
        info!("Event {} has {} played qualification matches", event_key, schedule.len());
        Ok(schedule)
    }

    /// Official OPR/DPR/CCWM; empty when the event has no statistics yet
    pub async fn fetch_event_statistics(&mut self, event_key: &str) -> Result<EventStatistics> {
        let stats: Option<EventStatistics> =
            self.fetch_json(&format!("/event/{}/oprs", event_key)).await?;
        Ok(stats.unwrap_or_default())
    }

    /// `None` when the team did not attend the event
    pub async fn fetch_team_status(
        &mut self,
        team: &TeamKey,
        event_key: &str,
    ) -> Result<Option<TeamEventStatus>> {
        self.fetch_json(&format!("/team/{}/event/{}/status", team, event_key)).await
    }

    // --- Helper Methods ---

    async fn fetch_json<T: DeserializeOwned>(&mut self, endpoint: &str) -> Result<T> {
        let value = self.fetch_value(endpoint).await?;
        serde_json::from_value(value).with_context(|| parse_context(endpoint))
    }

    async fn fetch_value(&mut self, endpoint: &str) -> Result<Value> {
        if self.read_cache {
            if let Some(value) = self.cache.load_raw(endpoint)? {
                return Ok(value);
            }
        }

        let text = self.fetch_raw(endpoint).await?;
        let value: Value = serde_json::from_str(&text).with_context(|| parse_context(endpoint))?;

        if let Err(e) = self.cache.save_raw(endpoint, &value) {
            warn!("Failed to save {} to cache: {:?}", endpoint, e);
        }
        Ok(value)
    }

    async fn fetch_raw(&mut self, endpoint: &str) -> Result<String> {
        if !self.has_auth_key {
            anyhow::bail!("TBA_AUTH_KEY is not set; The Blue Alliance API requires a read key");
        }

        let url = self.build_url(endpoint);
        info!("Fetching {}", url);

        let response = self.client.get(&url).await.with_context(|| fetch_context(&url))?;
        if !response.status().is_success() {
            anyhow::bail!("API returned status {} for {}", response.status(), url);
        }

        response.text().await.with_context(|| fetch_context(&url))
    }

    fn build_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }
}
