use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Default)]
pub struct RatingSettings {
    /// Overrides the solver's rank threshold (singular values at or below
    /// it count as zero). `None` scales with matrix size and magnitude.
    pub rank_tolerance: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub auth_key: Option<String>,
    pub user_agent: &'static str,
    pub timeout_secs: u64,
    pub rate_limit_ms: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://www.thebluealliance.com/api/v3".to_string(),
            auth_key: None,
            user_agent: "OprTracker/1.0",
            timeout_secs: 10,
            rate_limit_ms: 100, // 10 req/sec
        }
    }
}

#[derive(Debug, Clone)]
pub struct OutputSettings {
    pub chart_dir: PathBuf,
    pub cache_dir: PathBuf,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            chart_dir: PathBuf::from("out"),
            cache_dir: PathBuf::from("cache"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub rating: RatingSettings,
    pub api: ApiSettings,
    pub output: OutputSettings,
}

impl AppConfig {
    /// Defaults overridden by `TBA_AUTH_KEY`, `TBA_BASE_URL`,
    /// `OPR_OUTPUT_DIR` and `OPR_CACHE_DIR`
    pub fn new() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        config.api.auth_key = lookup("TBA_AUTH_KEY").filter(|key| !key.trim().is_empty());
        if let Some(url) = lookup("TBA_BASE_URL") {
            config.api.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(dir) = lookup("OPR_OUTPUT_DIR") {
            config.output.chart_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("OPR_CACHE_DIR") {
            config.output.cache_dir = PathBuf::from(dir);
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_environment_overrides() {
        let vars: HashMap<&str, &str> = [
            ("TBA_AUTH_KEY", "secret"),
            ("TBA_BASE_URL", "http://localhost:8080/api/v3/"),
            ("OPR_OUTPUT_DIR", "charts"),
        ]
        .into_iter()
        .collect();

        let config = AppConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.api.auth_key.as_deref(), Some("secret"));
        assert_eq!(config.api.base_url, "http://localhost:8080/api/v3");
        assert_eq!(config.output.chart_dir, PathBuf::from("charts"));
        assert_eq!(config.output.cache_dir, PathBuf::from("cache"));
        assert_eq!(config.rating.rank_tolerance, None);
    }

    #[test]
    fn test_blank_auth_key_is_missing() {
        let config = AppConfig::from_lookup(|name| (name == "TBA_AUTH_KEY").then(|| "  ".to_string()));
        assert_eq!(config.api.auth_key, None);
    }
}
