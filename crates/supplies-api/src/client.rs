//! Supplies API HTTP client.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use supply_core::{AcceptanceCoefficient, FetchError, SuppliesProvider, Warehouse};
use tracing::{debug, info};

use crate::config::SuppliesApiConfig;
use crate::error::SuppliesApiError;

/// Client for the Wildberries supplies API.
#[derive(Clone)]
pub struct SuppliesClient {
    http: Client,
    config: SuppliesApiConfig,
}

impl SuppliesClient {
    /// Create a client with the given configuration.
    pub fn new(config: SuppliesApiConfig) -> Result<Self, SuppliesApiError> {
        if config.api_key.is_empty() {
            return Err(SuppliesApiError::Config("API key is empty".to_string()));
        }

        let http = Client::builder()
            .user_agent("SlotWatchBot/1.0")
            .timeout(config.timeout)
            .build()?;

        Ok(Self { http, config })
    }

    /// Create a client from environment variables.
    pub fn from_env() -> Result<Self, SuppliesApiError> {
        Self::new(SuppliesApiConfig::from_env()?)
    }

    /// Get the configuration.
    pub fn config(&self) -> &SuppliesApiConfig {
        &self.config
    }

    /// Fetch the warehouse directory.
    pub async fn warehouses(&self) -> Result<Vec<Warehouse>, SuppliesApiError> {
        let warehouses: Vec<Warehouse> = self.get_json(&self.config.warehouses_url()).await?;
        info!("Fetched {} warehouses", warehouses.len());
        Ok(warehouses)
    }

    /// Fetch acceptance coefficients for a warehouse.
    pub async fn coefficients(
        &self,
        warehouse_id: i64,
    ) -> Result<Vec<AcceptanceCoefficient>, SuppliesApiError> {
        let rows: Vec<AcceptanceCoefficient> = self
            .get_json(&self.config.coefficients_url(warehouse_id))
            .await?;
        info!(
            "Fetched {} acceptance coefficients for warehouse {}",
            rows.len(),
            warehouse_id
        );
        Ok(rows)
    }

    async fn get_json<R: DeserializeOwned>(&self, url: &str) -> Result<R, SuppliesApiError> {
        debug!("GET {}", url);

        let response = self
            .http
            .get(url)
            .header("Authorization", &self.config.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SuppliesApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        // Decode from text so that malformed bodies surface as Json errors.
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl SuppliesProvider for SuppliesClient {
    async fn fetch_warehouses(&self) -> Result<Vec<Warehouse>, FetchError> {
        Ok(self.warehouses().await?)
    }

    async fn fetch_coefficients(
        &self,
        warehouse_id: i64,
    ) -> Result<Vec<AcceptanceCoefficient>, FetchError> {
        Ok(self.coefficients(warehouse_id).await?)
    }

    fn name(&self) -> &str {
        "wildberries"
    }
}

impl std::fmt::Debug for SuppliesClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuppliesClient")
            .field("config", &self.config)
            .finish()
    }
}
