//! Runtime configuration.
//!
//! Values come from the process environment, after loading a `.env` file when one
//! is present:
//!
//! - `DIET_ADMIN_API_URL`: backend base URL (default `http://localhost:8081`)
//! - `DIET_ADMIN_TIMEOUT_SECS`: per-request timeout (default 5)
//! - `DIET_ADMIN_EMAIL` / `DIET_ADMIN_PASSWORD`: admin login pair

use std::env;
use std::time::Duration;

use crate::auth::AdminCredentials;
use crate::error::{DashboardError, Result};

pub const DEFAULT_API_URL: &str = "http://localhost:8081";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub timeout: Duration,
    pub admin: Option<AdminCredentials>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            admin: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Config::default();

        if let Ok(url) = env::var("DIET_ADMIN_API_URL") {
            if !url.trim().is_empty() {
                config.api_url = url.trim().to_string();
            }
        }

        if let Ok(secs) = env::var("DIET_ADMIN_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                DashboardError::Config(format!("DIET_ADMIN_TIMEOUT_SECS is not a number: {secs}"))
            })?;
            if secs == 0 {
                return Err(DashboardError::Config(
                    "DIET_ADMIN_TIMEOUT_SECS must be positive".to_string(),
                ));
            }
            config.timeout = Duration::from_secs(secs);
        }

        if let (Ok(email), Ok(password)) =
            (env::var("DIET_ADMIN_EMAIL"), env::var("DIET_ADMIN_PASSWORD"))
        {
            config.admin = Some(AdminCredentials::new(email, password));
        }

        Ok(config)
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_backend_contract() {
        let config = Config::default();
        assert_eq!(config.api_url, "http://localhost:8081");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert!(config.admin.is_none());
    }

    #[test]
    fn api_url_override() {
        let config = Config::default().with_api_url("http://10.0.0.2:8081");
        assert_eq!(config.api_url, "http://10.0.0.2:8081");
    }
}
