//! Settlement handlers.
//!
//! ## Commands
//! - Recording captured payments (idempotent on booking_id)
//! - Marking payouts settled (admin-only, idempotent)
//!
//! ## Queries
//! - Pending payout queue, settled history, per-owner history, totals

mod mark_settled;
mod record_payment_captured;
mod settlement_reports;

#[cfg(test)]
pub(crate) mod test_support;

// Commands
pub use mark_settled::{MarkSettledCommand, MarkSettledHandler, MarkSettledResult};
pub use record_payment_captured::{
    RecordPaymentCapturedCommand, RecordPaymentCapturedHandler, RecordPaymentCapturedResult,
};

// Queries
pub use settlement_reports::{
    ListPendingSettlementsQuery, ListSettledQuery, OwnerSettlementHistoryQuery,
    SettlementReportsHandler, SettlementTotalsQuery,
};
