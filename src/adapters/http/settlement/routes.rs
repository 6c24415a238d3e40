//! Axum router configuration for settlement endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    handle_payment_webhook, list_pending, list_settled, mark_settled, owner_history,
    settlement_totals, SettlementAppState,
};

/// Create the settlement API router.
///
/// # Routes
///
/// - `GET /pending` - Pending payout queue (admin)
/// - `GET /settled` - Settled history, paginated (admin)
/// - `GET /owners/:owner_id` - One owner's history (owner or admin)
/// - `GET /totals` - Ledger-wide totals (admin)
/// - `POST /:id/settle` - Release a payout (admin, idempotent)
pub fn settlement_routes() -> Router<SettlementAppState> {
    Router::new()
        .route("/pending", get(list_pending))
        .route("/settled", get(list_settled))
        .route("/owners/:owner_id", get(owner_history))
        .route("/totals", get(settlement_totals))
        .route("/:settlement_id/settle", post(mark_settled))
}

/// Create the payment webhook router.
///
/// Separate from the settlement routes because the webhook carries no
/// user token; trust comes from the HMAC signature.
///
/// # Routes
/// - `POST /payment` - Ingest payment-captured events
pub fn webhook_routes() -> Router<SettlementAppState> {
    Router::new().route("/payment", post(handle_payment_webhook))
}
