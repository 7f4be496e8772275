//! Engine configuration

use std::time::Duration;

use td_core::task::DEFAULT_PAGE_SIZE;

/// Environment variable holding the API base URL
pub const API_URL_ENV: &str = "TASKS_API_URL";

/// Configuration for the synchronization engine
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Base URL of the remote task API, e.g. `http://localhost:1337/api`
    pub base_url: String,
    /// Page size for every list request
    pub page_size: u32,
    /// Delay before retrying a failed primary list fetch
    pub retry_delay: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:1337/api".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            retry_delay: Duration::from_millis(5000),
        }
    }
}

impl SyncConfig {
    /// Build a config from the process environment, keeping defaults
    /// for anything unset
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.is_empty() {
                config.base_url = url;
            }
        }
        config
    }

    /// Set the retry delay
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Set the page size
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SyncConfig::default();
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.retry_delay, Duration::from_millis(5000));
    }

    #[test]
    fn test_builders() {
        let config = SyncConfig::default()
            .with_page_size(10)
            .with_retry_delay(Duration::from_millis(50));
        assert_eq!(config.page_size, 10);
        assert_eq!(config.retry_delay, Duration::from_millis(50));
    }
}
