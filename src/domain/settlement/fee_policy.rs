//! Platform fee policy.
//!
//! The fee rate is a configuration input, not something this module
//! derives. A policy carries a default rate in basis points plus optional
//! per-property-category overrides.

use crate::domain::foundation::{Money, ValidationError, BPS_DENOMINATOR};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Fee rate table applied when a settlement is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeePolicy {
    /// Rate applied when no category override matches, in basis points.
    pub default_fee_bps: u32,

    /// Per-property-category overrides, in basis points.
    #[serde(default)]
    pub category_fee_bps: HashMap<String, u32>,
}

impl FeePolicy {
    /// Creates a flat policy with a single rate for every property.
    ///
    /// # Errors
    ///
    /// Rejects rates above 100%.
    pub fn fixed(default_fee_bps: u32) -> Result<Self, ValidationError> {
        Self::validate_rate(default_fee_bps)?;
        Ok(Self {
            default_fee_bps,
            category_fee_bps: HashMap::new(),
        })
    }

    /// Adds a category-specific rate override.
    pub fn with_category_rate(
        mut self,
        category: impl Into<String>,
        fee_bps: u32,
    ) -> Result<Self, ValidationError> {
        Self::validate_rate(fee_bps)?;
        self.category_fee_bps.insert(category.into(), fee_bps);
        Ok(self)
    }

    /// Returns the rate for a property category, falling back to the default.
    pub fn rate_for(&self, category: Option<&str>) -> u32 {
        category
            .and_then(|c| self.category_fee_bps.get(c).copied())
            .unwrap_or(self.default_fee_bps)
    }

    /// Splits a gross amount into `(platform_fee, owner_amount)`.
    pub fn split(&self, gross: Money, category: Option<&str>) -> (Money, Money) {
        gross.split_at_bps(self.rate_for(category))
    }

    fn validate_rate(fee_bps: u32) -> Result<(), ValidationError> {
        if i64::from(fee_bps) > BPS_DENOMINATOR {
            return Err(ValidationError::invalid_format(
                "fee_bps",
                format!("rate {} exceeds {} (100%)", fee_bps, BPS_DENOMINATOR),
            ));
        }
        Ok(())
    }
}
