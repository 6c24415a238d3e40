//! Property Directory client configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Property Directory configuration
///
/// The directory is the external CRUD service owning property listings,
/// owner verification, and payout details.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PropertyConfig {
    /// Base URL of the directory API
    pub directory_url: String,

    /// Service-to-service API token
    pub directory_token: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl PropertyConfig {
    /// Validate property directory configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.directory_url.is_empty() {
            return Err(ValidationError::MissingRequired("PROPERTY_DIRECTORY_URL"));
        }
        if !self.directory_url.starts_with("http://") && !self.directory_url.starts_with("https://")
        {
            return Err(ValidationError::InvalidDirectoryUrl);
        }
        if self.directory_token.is_empty() {
            return Err(ValidationError::MissingRequired("PROPERTY_DIRECTORY_TOKEN"));
        }
        if self.request_timeout_secs == 0 || self.request_timeout_secs > 60 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

fn default_timeout_secs() -> u64 {
    10
}
