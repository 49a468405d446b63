use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Seconds before an outstanding request is abandoned. Applies to every call.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 5;

/// Environment variable overriding the banking backend base URL.
pub const API_URL_ENV: &str = "UEHS_BANK_API_URL";
/// Environment variable overriding the exchange-rate service base URL.
pub const RATES_URL_ENV: &str = "UEHS_BANK_RATES_URL";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the banking REST backend, without a trailing slash.
    pub api_base_url: String,
    /// Base URL of the third-party exchange-rate service.
    pub rates_base_url: String,
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://192.168.1.11:8000/api".to_string(),
            rates_base_url: "https://api.nbp.pl/api".to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Default configuration with environment-variable overrides applied.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var(API_URL_ENV) {
            config.api_base_url = url;
        }
        if let Ok(url) = std::env::var(RATES_URL_ENV) {
            config.rates_base_url = url;
        }
        config.normalize();
        config
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self.normalize();
        self
    }

    pub fn with_rates_base_url(mut self, url: impl Into<String>) -> Self {
        self.rates_base_url = url.into();
        self.normalize();
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    fn normalize(&mut self) {
        while self.api_base_url.ends_with('/') {
            self.api_base_url.pop();
        }
        while self.rates_base_url.ends_with('/') {
            self.rates_base_url.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slashes_stripped() {
        let config = ClientConfig::default().with_api_base_url("http://localhost:8000/api//");
        assert_eq!(config.api_base_url, "http://localhost:8000/api");
    }

    #[test]
    fn default_timeout_is_five_seconds() {
        assert_eq!(
            ClientConfig::default().request_timeout(),
            Duration::from_secs(5)
        );
    }
}
