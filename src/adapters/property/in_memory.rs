//! In-memory property directory for testing.
//!
//! Implements the `PropertyDirectory` port from fixed maps, so booking
//! and settlement flows can be tested without the property service.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ErrorCode, PropertyId, UserId};
use crate::ports::{OwnerPayoutDetails, PropertyDirectory, PropertyInfo};

/// In-memory property directory for tests.
///
/// Unknown properties return `PropertyNotFound`; unknown owners return
/// `ExternalServiceError`, matching the HTTP adapter.
#[derive(Debug, Default)]
pub struct InMemoryPropertyDirectory {
    properties: RwLock<HashMap<PropertyId, PropertyInfo>>,
    payout_details: RwLock<HashMap<String, OwnerPayoutDetails>>,
    /// Optional error to return for all lookups (for error testing)
    force_error: RwLock<Option<DomainError>>,
}

impl InMemoryPropertyDirectory {
    /// Creates a new empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a property.
    pub fn with_property(self, info: PropertyInfo) -> Self {
        self.properties.write().unwrap().insert(info.id, info);
        self
    }

    /// Registers a property owned by the given owner with one free unit.
    pub fn with_simple_property(self, property_id: PropertyId, owner_id: &UserId) -> Self {
        self.with_property(PropertyInfo {
            id: property_id,
            owner_id: owner_id.clone(),
            available_units: 1,
        })
    }

    /// Registers payout details for an owner.
    pub fn with_payout_details(self, owner_id: &UserId, details: OwnerPayoutDetails) -> Self {
        self.payout_details
            .write()
            .unwrap()
            .insert(owner_id.as_str().to_string(), details);
        self
    }

    /// Forces all lookups to return the specified error.
    pub fn with_error(self, error: DomainError) -> Self {
        *self.force_error.write().unwrap() = Some(error);
        self
    }

    /// Updates a property's availability at runtime.
    pub fn set_available_units(&self, property_id: &PropertyId, units: u32) {
        if let Some(info) = self.properties.write().unwrap().get_mut(property_id) {
            info.available_units = units;
        }
    }

    /// Replaces an owner's payout details at runtime.
    ///
    /// Settlements snapshot details at creation, so tests use this to
    /// verify later changes don't leak into existing rows.
    pub fn update_payout_details(&self, owner_id: &UserId, details: OwnerPayoutDetails) {
        self.payout_details
            .write()
            .unwrap()
            .insert(owner_id.as_str().to_string(), details);
    }
}

#[async_trait]
impl PropertyDirectory for InMemoryPropertyDirectory {
    async fn get_property(&self, property_id: &PropertyId) -> Result<PropertyInfo, DomainError> {
        if let Some(error) = self.force_error.read().unwrap().clone() {
            return Err(error);
        }

        self.properties
            .read()
            .unwrap()
            .get(property_id)
            .cloned()
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::PropertyNotFound,
                    format!("Property {} not found", property_id),
                )
            })
    }

    async fn get_owner_payout_details(
        &self,
        owner_id: &UserId,
    ) -> Result<OwnerPayoutDetails, DomainError> {
        if let Some(error) = self.force_error.read().unwrap().clone() {
            return Err(error);
        }

        self.payout_details
            .read()
            .unwrap()
            .get(owner_id.as_str())
            .cloned()
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::ExternalServiceError,
                    format!("No payout details for owner {}", owner_id.as_str()),
                )
            })
    }
}
