//! Configuration for the supplies API client.

use std::env;
use std::time::Duration;

use crate::error::SuppliesApiError;

/// Production base URL of the supplies API.
pub const DEFAULT_BASE_URL: &str = "https://supplies-api.wildberries.ru";

/// Configuration for connecting to the supplies API.
#[derive(Clone)]
pub struct SuppliesApiConfig {
    /// Base URL (e.g., "https://supplies-api.wildberries.ru").
    pub base_url: String,
    /// Token sent in the `Authorization` header.
    pub api_key: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl SuppliesApiConfig {
    /// Create a configuration for the production API.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Override the base URL (useful for staging or a local stub).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `WB_API_KEY`
    ///
    /// Optional env vars:
    /// - `WB_API_URL` (default: https://supplies-api.wildberries.ru)
    /// - `WB_API_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, SuppliesApiError> {
        let api_key = env::var("WB_API_KEY")
            .map_err(|_| SuppliesApiError::Config("WB_API_KEY not set".to_string()))?;

        let mut config = Self::new(api_key);
        if let Ok(url) = env::var("WB_API_URL") {
            config = config.with_base_url(url);
        }
        if let Some(secs) = env::var("WB_API_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Get the warehouse list endpoint URL.
    pub fn warehouses_url(&self) -> String {
        format!("{}/api/v1/warehouses", self.base_url)
    }

    /// Get the coefficients endpoint URL for one warehouse.
    pub fn coefficients_url(&self, warehouse_id: i64) -> String {
        format!(
            "{}/api/v1/acceptance/coefficients?warehouseIDs={}",
            self.base_url, warehouse_id
        )
    }
}

impl std::fmt::Debug for SuppliesApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuppliesApiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}
