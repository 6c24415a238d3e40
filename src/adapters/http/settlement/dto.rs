//! HTTP DTOs for settlement endpoints.
//!
//! Monetary amounts cross the wire as integer minor units; timestamps as
//! RFC 3339 strings. The bank snapshot is returned as captured at
//! settlement creation, never the owner's current details.

use serde::{Deserialize, Serialize};

use crate::domain::settlement::{Settlement, SettlementStatus};
use crate::ports::{SettlementTotals, SettlementView};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Query parameters for the paginated settled history.
#[derive(Debug, Clone, Deserialize)]
pub struct ListSettledParams {
    /// Zero-based page index.
    #[serde(default)]
    pub page: u32,
    /// Rows per page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page_size() -> u32 {
    50
}

impl Default for ListSettledParams {
    fn default() -> Self {
        Self {
            page: 0,
            page_size: default_page_size(),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Bank details snapshotted onto the settlement at creation time.
#[derive(Debug, Clone, Serialize)]
pub struct BankSnapshotResponse {
    pub bank_name: String,
    pub account_number: String,
    pub account_holder: String,
}

/// Full settlement representation.
#[derive(Debug, Clone, Serialize)]
pub struct SettlementResponse {
    pub id: String,
    pub booking_id: String,
    pub owner_id: String,
    pub gross_amount_minor_units: i64,
    pub platform_fee_minor_units: i64,
    pub owner_amount_minor_units: i64,
    pub status: SettlementStatus,
    /// Set exactly once, on the first successful settle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settlement_date: Option<String>,
    pub owner_bank_snapshot: BankSnapshotResponse,
    pub created_at: String,
}

impl From<Settlement> for SettlementResponse {
    fn from(settlement: Settlement) -> Self {
        Self {
            id: settlement.id.to_string(),
            booking_id: settlement.booking_id.to_string(),
            owner_id: settlement.owner_id.to_string(),
            gross_amount_minor_units: settlement.gross_amount.minor_units(),
            platform_fee_minor_units: settlement.platform_fee.minor_units(),
            owner_amount_minor_units: settlement.owner_amount.minor_units(),
            status: settlement.status,
            settlement_date: settlement
                .settlement_date
                .map(|d| d.as_datetime().to_rfc3339()),
            owner_bank_snapshot: BankSnapshotResponse {
                bank_name: settlement.owner_bank_snapshot.bank_name,
                account_number: settlement.owner_bank_snapshot.account_number,
                account_holder: settlement.owner_bank_snapshot.account_holder,
            },
            created_at: settlement.created_at.as_datetime().to_rfc3339(),
        }
    }
}

impl From<SettlementView> for SettlementResponse {
    fn from(view: SettlementView) -> Self {
        Self {
            id: view.id.to_string(),
            booking_id: view.booking_id.to_string(),
            owner_id: view.owner_id.to_string(),
            gross_amount_minor_units: view.gross_amount.minor_units(),
            platform_fee_minor_units: view.platform_fee.minor_units(),
            owner_amount_minor_units: view.owner_amount.minor_units(),
            status: view.status,
            settlement_date: view.settlement_date.map(|d| d.as_datetime().to_rfc3339()),
            owner_bank_snapshot: BankSnapshotResponse {
                bank_name: view.owner_bank_snapshot.bank_name,
                account_number: view.owner_bank_snapshot.account_number,
                account_holder: view.owner_bank_snapshot.account_holder,
            },
            created_at: view.created_at.as_datetime().to_rfc3339(),
        }
    }
}

/// Response for a settle request.
///
/// `already_settled` is true for a repeated settle; the original
/// `settlement_date` is preserved in that case.
#[derive(Debug, Clone, Serialize)]
pub struct MarkSettledResponse {
    #[serde(flatten)]
    pub settlement: SettlementResponse,
    pub already_settled: bool,
}

/// Response for settlement list endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ListSettlementsResponse {
    pub settlements: Vec<SettlementResponse>,
}

/// Response for ledger-wide totals.
#[derive(Debug, Clone, Serialize)]
pub struct SettlementTotalsResponse {
    pub pending_owner_amount_minor_units: i64,
    pub settled_owner_amount_minor_units: i64,
    pub total_gross_amount_minor_units: i64,
    pub total_platform_fee_minor_units: i64,
    pub pending_count: u64,
    pub settled_count: u64,
}

impl From<SettlementTotals> for SettlementTotalsResponse {
    fn from(totals: SettlementTotals) -> Self {
        Self {
            pending_owner_amount_minor_units: totals.pending_owner_amount.minor_units(),
            settled_owner_amount_minor_units: totals.settled_owner_amount.minor_units(),
            total_gross_amount_minor_units: totals.total_gross_amount.minor_units(),
            total_platform_fee_minor_units: totals.total_platform_fee.minor_units(),
            pending_count: totals.pending_count,
            settled_count: totals.settled_count,
        }
    }
}

/// Standard error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error_code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
        }
    }
}
