use anyhow::{Context, Result};
use log::{debug, info};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// File cache of raw API responses, one JSON file per endpoint
pub struct Cache {
    raw_dir: PathBuf,
}

impl Cache {
    /// Create a new cache instance
    pub fn new<P: AsRef<Path>>(cache_dir: P) -> Result<Self> {
        let raw_dir = cache_dir.as_ref().join("raw");
        fs::create_dir_all(&raw_dir).context("Failed to create raw cache directory")?;
        Ok(Self { raw_dir })
    }

    /// Save raw API response to cache
    pub fn save_raw(&self, endpoint: &str, data: &Value) -> Result<()> {
        let file_path = self.build_raw_path(endpoint);
        let json = serde_json::to_string_pretty(data)?;
        fs::write(&file_path, json).context("Failed to write cache file")?;
        info!("Saved raw data to cache: {}", file_path.display());
        Ok(())
    }

    /// Load raw API response from cache
    pub fn load_raw(&self, endpoint: &str) -> Result<Option<Value>> {
        let file_path = self.build_raw_path(endpoint);
        if !file_path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&file_path)?;
        let data = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse JSON from {:?}. First 200 chars: {}",
                file_path,
                json.chars().take(200).collect::<String>()))?;
        debug!("Loaded raw data from cache: {}", file_path.display());
        Ok(Some(data))
    }

    /// Clear all cached responses
    #[cfg(test)]
    pub fn clear(&self) -> Result<()> {
        fs::remove_dir_all(&self.raw_dir).context("Failed to clear cache")?;
        fs::create_dir_all(&self.raw_dir).context("Failed to recreate cache directory")?;
        info!("Cleared cache directory");
        Ok(())
    }

    // --- Helper Methods ---

    fn build_raw_path(&self, endpoint: &str) -> PathBuf {
        self.raw_dir.join(format!("{}.json", Self::file_stem(endpoint)))
    }

    /// `/event/2018wasno/matches/simple` -> `event_2018wasno_matches_simple`
    fn file_stem(endpoint: &str) -> String {
        endpoint
            .trim_matches('/')
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect()
    }
}
