//! HTTP client adapter for the property directory service.
//!
//! Implements the `PropertyDirectory` port against the property service's
//! REST API. Two endpoints are used:
//!
//! - `GET /v1/properties/{id}` - ownership and availability facts
//! - `GET /v1/owners/{id}/payout-details` - current bank details
//!
//! Payout details are snapshotted by the caller at settlement creation;
//! this adapter always returns whatever the directory currently holds.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::domain::foundation::{DomainError, ErrorCode, PropertyId, UserId};
use crate::ports::{OwnerPayoutDetails, PropertyDirectory, PropertyInfo};

/// Configuration for the property directory client.
#[derive(Clone)]
pub struct PropertyDirectoryConfig {
    /// Base URL of the property service (no trailing slash required).
    pub base_url: String,

    /// Bearer token for service-to-service calls.
    api_token: SecretString,

    /// Request timeout. Defaults to 10 seconds.
    pub timeout: Duration,
}

impl PropertyDirectoryConfig {
    /// Create a new configuration with required fields.
    pub fn new(base_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_token: SecretString::new(api_token.into()),
            timeout: Duration::from_secs(10),
        }
    }

    /// Set a custom request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

impl std::fmt::Debug for PropertyDirectoryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertyDirectoryConfig")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Wire representation of a property.
#[derive(Debug, Deserialize)]
struct PropertyResponse {
    id: PropertyId,
    owner_id: String,
    available_units: u32,
}

/// Wire representation of an owner's payout details.
#[derive(Debug, Deserialize)]
struct PayoutDetailsResponse {
    bank_name: String,
    account_number: String,
    account_holder: String,
}

/// HTTP-backed property directory.
pub struct HttpPropertyDirectory {
    config: PropertyDirectoryConfig,
    http_client: reqwest::Client,
}

impl HttpPropertyDirectory {
    /// Create a new client with the given configuration.
    pub fn new(config: PropertyDirectoryConfig) -> Result<Self, DomainError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::ExternalServiceError,
                    format!("Failed to build property directory client: {}", e),
                )
            })?;

        Ok(Self {
            config,
            http_client,
        })
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        not_found: DomainError,
    ) -> Result<T, DomainError> {
        let response = self
            .http_client
            .get(url)
            .bearer_auth(self.config.api_token.expose_secret())
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, url, "Property directory request failed");
                DomainError::new(
                    ErrorCode::ExternalServiceError,
                    format!("Property directory unreachable: {}", e),
                )
            })?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(not_found);
        }

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(%status, error = %error_text, "Property directory returned error");
            return Err(DomainError::new(
                ErrorCode::ExternalServiceError,
                format!("Property directory returned {}", status),
            ));
        }

        response.json().await.map_err(|e| {
            DomainError::new(
                ErrorCode::ExternalServiceError,
                format!("Failed to parse property directory response: {}", e),
            )
        })
    }
}

#[async_trait]
impl PropertyDirectory for HttpPropertyDirectory {
    async fn get_property(&self, property_id: &PropertyId) -> Result<PropertyInfo, DomainError> {
        let url = self
            .config
            .endpoint(&format!("/v1/properties/{}", property_id));

        let body: PropertyResponse = self
            .get_json(
                &url,
                DomainError::new(
                    ErrorCode::PropertyNotFound,
                    format!("Property {} not found", property_id),
                ),
            )
            .await?;

        let owner_id = UserId::new(&body.owner_id).map_err(|e| {
            DomainError::new(
                ErrorCode::ExternalServiceError,
                format!("Property directory returned invalid owner id: {}", e),
            )
        })?;

        Ok(PropertyInfo {
            id: body.id,
            owner_id,
            available_units: body.available_units,
        })
    }

    async fn get_owner_payout_details(
        &self,
        owner_id: &UserId,
    ) -> Result<OwnerPayoutDetails, DomainError> {
        let url = self
            .config
            .endpoint(&format!("/v1/owners/{}/payout-details", owner_id.as_str()));

        let body: PayoutDetailsResponse = self
            .get_json(
                &url,
                DomainError::new(
                    ErrorCode::ExternalServiceError,
                    format!("No payout details for owner {}", owner_id.as_str()),
                ),
            )
            .await?;

        Ok(OwnerPayoutDetails {
            bank_name: body.bank_name,
            account_number: body.account_number,
            account_holder: body.account_holder,
        })
    }
}

impl std::fmt::Debug for HttpPropertyDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpPropertyDirectory")
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}
