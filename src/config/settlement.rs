//! Settlement fee configuration

use std::collections::HashMap;

use serde::Deserialize;

use super::error::ValidationError;

/// Basis points in a whole.
const MAX_FEE_BPS: u32 = 10_000;

/// Settlement ledger configuration
///
/// The platform fee is expressed in basis points of the captured gross.
/// Room-type categories may carry their own rate; everything else uses
/// the default.
#[derive(Debug, Clone, Deserialize)]
pub struct SettlementConfig {
    /// Default platform fee in basis points (10% = 1000)
    #[serde(default = "default_fee_bps")]
    pub default_fee_bps: u32,

    /// Per-room-type fee overrides in basis points
    #[serde(default)]
    pub category_fee_bps: HashMap<String, u32>,
}

impl SettlementConfig {
    /// Validate settlement configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.default_fee_bps > MAX_FEE_BPS {
            return Err(ValidationError::InvalidFeeBps);
        }
        if self.category_fee_bps.values().any(|&bps| bps > MAX_FEE_BPS) {
            return Err(ValidationError::InvalidFeeBps);
        }
        Ok(())
    }
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            default_fee_bps: default_fee_bps(),
            category_fee_bps: HashMap::new(),
        }
    }
}

fn default_fee_bps() -> u32 {
    1_000
}
