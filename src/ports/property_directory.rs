//! Property directory port.
//!
//! Properties are owned by a separate service; this port exposes the two
//! lookups the booking and settlement flows need: who owns a property and
//! how many units it has free, and the owner's payout details at the
//! moment a settlement is created.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, PropertyId, UserId};

/// Port for property and owner lookups.
#[async_trait]
pub trait PropertyDirectory: Send + Sync {
    /// Fetch a property's booking-relevant facts.
    ///
    /// # Errors
    ///
    /// - `PropertyNotFound` if the property doesn't exist
    /// - `ExternalServiceError` if the directory is unreachable
    async fn get_property(&self, property_id: &PropertyId) -> Result<PropertyInfo, DomainError>;

    /// Fetch an owner's current payout details.
    ///
    /// Callers snapshot the result; later changes must not affect
    /// settlements already created.
    async fn get_owner_payout_details(
        &self,
        owner_id: &UserId,
    ) -> Result<OwnerPayoutDetails, DomainError>;
}

/// Booking-relevant facts about a property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyInfo {
    pub id: PropertyId,
    pub owner_id: UserId,
    pub available_units: u32,
}

impl PropertyInfo {
    pub fn has_availability(&self) -> bool {
        self.available_units > 0
    }
}

/// An owner's payout details as currently registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerPayoutDetails {
    pub bank_name: String,
    pub account_number: String,
    pub account_holder: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_directory_is_object_safe() {
        fn _accepts_dyn(_dir: &dyn PropertyDirectory) {}
    }

    #[test]
    fn availability_requires_at_least_one_unit() {
        let mut info = PropertyInfo {
            id: PropertyId::new(),
            owner_id: UserId::new("owner-1").unwrap(),
            available_units: 0,
        };
        assert!(!info.has_availability());
        info.available_units = 1;
        assert!(info.has_availability());
    }
}
