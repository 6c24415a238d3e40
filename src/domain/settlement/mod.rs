//! Settlement domain: payment capture ingestion, fee computation, payout ledger.

mod aggregate;
mod bank;
mod errors;
mod events;
mod fee_policy;
mod status;
mod webhook;

pub use aggregate::{SettleOutcome, Settlement};
pub use bank::OwnerBankSnapshot;
pub use errors::SettlementError;
pub use events::SettlementEvent;
pub use fee_policy::FeePolicy;
pub use status::SettlementStatus;
pub use webhook::{PaymentCapturedEvent, PaymentWebhookVerifier, SignatureHeader, WebhookError};

#[cfg(test)]
pub(crate) use webhook::compute_test_signature;
