//! Configuration management for the storefront client.
//!
//! Loads configuration from environment variables with sensible defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Marketplace API configuration
    pub api: ApiConfig,
    /// Path of the persisted session record
    pub session_file: PathBuf,
    /// Payment-flow pacing
    pub payment: PaymentConfig,
}

/// Marketplace API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the marketplace API
    pub base_url: String,
    /// Per-request timeout in seconds
    pub request_timeout: u64,
}

/// Payment-flow pacing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentConfig {
    /// Simulated processing duration in milliseconds
    pub processing_delay_ms: u64,
    /// How long the success screen is shown before returning home, in milliseconds
    pub redirect_delay_ms: u64,
}

impl PaymentConfig {
    /// Simulated processing duration
    #[must_use]
    pub const fn processing_delay(&self) -> Duration {
        Duration::from_millis(self.processing_delay_ms)
    }

    /// Success-screen duration before returning home
    #[must_use]
    pub const fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.redirect_delay_ms)
    }
}

impl Config {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            api: ApiConfig {
                base_url: env::var("SKILLSPHERE_API_BASE_URL")
                    .unwrap_or_else(|_| "http://localhost:3007".to_string()),
                request_timeout: env::var("SKILLSPHERE_API_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            },
            session_file: env::var("SKILLSPHERE_SESSION_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".skillsphere_session.json")),
            payment: PaymentConfig {
                processing_delay_ms: env::var("SKILLSPHERE_PAYMENT_PROCESSING_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(2000),
                redirect_delay_ms: env::var("SKILLSPHERE_PAYMENT_REDIRECT_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(3000),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_service_contract() {
        // Only assert defaults when the overrides are absent in the test env
        if env::var("SKILLSPHERE_API_BASE_URL").is_err() {
            let config = Config::from_env();
            assert_eq!(config.api.base_url, "http://localhost:3007");
            assert_eq!(config.payment.processing_delay(), Duration::from_millis(2000));
            assert_eq!(config.payment.redirect_delay(), Duration::from_millis(3000));
        }
    }
}
