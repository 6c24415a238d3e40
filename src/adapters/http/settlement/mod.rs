//! HTTP adapter for settlement endpoints.
//!
//! Exposes the settlement ledger via REST API:
//! - `GET /api/settlements/pending` - Pending payout queue
//! - `GET /api/settlements/settled` - Settled history, paginated
//! - `GET /api/settlements/owners/:owner_id` - One owner's history
//! - `GET /api/settlements/totals` - Ledger-wide totals
//! - `POST /api/settlements/:id/settle` - Release a payout (idempotent)
//! - `POST /api/webhooks/payment` - Payment-captured webhook (HMAC-verified)

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::{SettlementApiError, SettlementAppState};
pub use routes::{settlement_routes, webhook_routes};
