//! HTTP handlers for settlement endpoints.
//!
//! Settling and reporting go through the authenticated API; payment
//! capture arrives on a separate unauthenticated webhook route verified
//! by HMAC signature.

use std::sync::Arc;

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::http::middleware::RequireCaller;
use crate::application::handlers::settlement::{
    ListPendingSettlementsQuery, ListSettledQuery, MarkSettledCommand, MarkSettledHandler,
    OwnerSettlementHistoryQuery, RecordPaymentCapturedCommand, RecordPaymentCapturedHandler,
    SettlementReportsHandler, SettlementTotalsQuery,
};
use crate::domain::foundation::{Money, SettlementId, UserId};
use crate::domain::settlement::{
    FeePolicy, PaymentWebhookVerifier, SettleOutcome, SettlementError, WebhookError,
};
use crate::ports::{
    BookingRepository, EventPublisher, PropertyDirectory, SettlementReader, SettlementRepository,
};

use super::dto::{
    ErrorResponse, ListSettledParams, ListSettlementsResponse, MarkSettledResponse,
    SettlementResponse, SettlementTotalsResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all settlement dependencies.
#[derive(Clone)]
pub struct SettlementAppState {
    pub settlement_repository: Arc<dyn SettlementRepository>,
    pub settlement_reader: Arc<dyn SettlementReader>,
    pub booking_repository: Arc<dyn BookingRepository>,
    pub property_directory: Arc<dyn PropertyDirectory>,
    pub event_publisher: Arc<dyn EventPublisher>,
    pub fee_policy: FeePolicy,
    pub webhook_verifier: Arc<PaymentWebhookVerifier>,
}

impl SettlementAppState {
    /// Create handlers on demand from the shared state.
    pub fn record_captured_handler(&self) -> RecordPaymentCapturedHandler {
        RecordPaymentCapturedHandler::new(
            self.settlement_repository.clone(),
            self.booking_repository.clone(),
            self.property_directory.clone(),
            self.event_publisher.clone(),
            self.fee_policy.clone(),
        )
    }

    pub fn mark_settled_handler(&self) -> MarkSettledHandler {
        MarkSettledHandler::new(
            self.settlement_repository.clone(),
            self.event_publisher.clone(),
        )
    }

    pub fn reports_handler(&self) -> SettlementReportsHandler {
        SettlementReportsHandler::new(self.settlement_reader.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/settlements/:id/settle - Release a payout (admin only)
///
/// A repeated settle returns 200 with `already_settled: true`; the
/// original settlement_date is preserved.
pub async fn mark_settled(
    State(state): State<SettlementAppState>,
    RequireCaller(caller): RequireCaller,
    Path(settlement_id): Path<SettlementId>,
) -> Result<impl IntoResponse, SettlementApiError> {
    let handler = state.mark_settled_handler();
    let cmd = MarkSettledCommand {
        caller,
        settlement_id,
    };

    let result = handler.handle(cmd).await?;

    let response = MarkSettledResponse {
        settlement: SettlementResponse::from(result.settlement),
        already_settled: result.outcome == SettleOutcome::AlreadySettled,
    };

    Ok(Json(response))
}

/// POST /api/webhooks/payment - Ingest a payment-captured event
///
/// Unauthenticated; trust comes from the HMAC signature header. Duplicate
/// deliveries are acknowledged without creating a second settlement.
pub async fn handle_payment_webhook(
    State(state): State<SettlementAppState>,
    headers: axum::http::HeaderMap,
    body: axum::body::Bytes,
) -> Result<impl IntoResponse, SettlementApiError> {
    let signature = headers
        .get("Payment-Signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            SettlementApiError::Webhook(WebhookError::ParseError(
                "Missing Payment-Signature header".to_string(),
            ))
        })?;

    let event = state.webhook_verifier.verify_and_parse(&body, signature)?;

    if !event.is_payment_captured() {
        tracing::debug!(event_id = %event.id, event_type = %event.event_type, "Ignoring webhook event type");
        return Ok(StatusCode::OK.into_response());
    }

    let handler = state.record_captured_handler();
    let cmd = RecordPaymentCapturedCommand {
        booking_id: event.booking_id,
        gross_amount: Money::from_minor_units(event.gross_amount),
    };

    let result = handler.handle(cmd).await?;

    if !result.created {
        tracing::info!(
            booking_id = %result.settlement.booking_id,
            "Duplicate payment capture acknowledged"
        );
    }

    Ok(StatusCode::OK.into_response())
}

// ════════════════════════════════════════════════════════════════════════════════
// Query Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/settlements/pending - Pending payout queue (admin only)
pub async fn list_pending(
    State(state): State<SettlementAppState>,
    RequireCaller(caller): RequireCaller,
) -> Result<impl IntoResponse, SettlementApiError> {
    let handler = state.reports_handler();
    let views = handler
        .list_pending(ListPendingSettlementsQuery { caller })
        .await?;

    Ok(Json(ListSettlementsResponse {
        settlements: views.into_iter().map(SettlementResponse::from).collect(),
    }))
}

/// GET /api/settlements/settled - Settled history, paginated (admin only)
pub async fn list_settled(
    State(state): State<SettlementAppState>,
    RequireCaller(caller): RequireCaller,
    Query(params): Query<ListSettledParams>,
) -> Result<impl IntoResponse, SettlementApiError> {
    let handler = state.reports_handler();
    let views = handler
        .list_settled(ListSettledQuery {
            caller,
            page: params.page,
            page_size: params.page_size,
        })
        .await?;

    Ok(Json(ListSettlementsResponse {
        settlements: views.into_iter().map(SettlementResponse::from).collect(),
    }))
}

/// GET /api/settlements/owners/:owner_id - One owner's history
///
/// Owners may query themselves; admins may query anyone.
pub async fn owner_history(
    State(state): State<SettlementAppState>,
    RequireCaller(caller): RequireCaller,
    Path(owner_id): Path<UserId>,
) -> Result<impl IntoResponse, SettlementApiError> {
    let handler = state.reports_handler();
    let views = handler
        .owner_history(OwnerSettlementHistoryQuery { caller, owner_id })
        .await?;

    Ok(Json(ListSettlementsResponse {
        settlements: views.into_iter().map(SettlementResponse::from).collect(),
    }))
}

/// GET /api/settlements/totals - Ledger-wide totals (admin only)
pub async fn settlement_totals(
    State(state): State<SettlementAppState>,
    RequireCaller(caller): RequireCaller,
) -> Result<impl IntoResponse, SettlementApiError> {
    let handler = state.reports_handler();
    let totals = handler.totals(SettlementTotalsQuery { caller }).await?;

    Ok(Json(SettlementTotalsResponse::from(totals)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts settlement and webhook errors to HTTP
/// responses.
pub enum SettlementApiError {
    Settlement(SettlementError),
    Webhook(WebhookError),
}

impl From<SettlementError> for SettlementApiError {
    fn from(err: SettlementError) -> Self {
        Self::Settlement(err)
    }
}

impl From<WebhookError> for SettlementApiError {
    fn from(err: WebhookError) -> Self {
        Self::Webhook(err)
    }
}

impl From<crate::domain::foundation::DomainError> for SettlementApiError {
    fn from(err: crate::domain::foundation::DomainError) -> Self {
        Self::Settlement(err.into())
    }
}

impl IntoResponse for SettlementApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_code, message) = match &self {
            Self::Settlement(err) => {
                let (status, code) = match err {
                    SettlementError::NotFound(_) => {
                        (StatusCode::NOT_FOUND, "SETTLEMENT_NOT_FOUND")
                    }
                    SettlementError::AlreadyExists(_) => {
                        (StatusCode::CONFLICT, "SETTLEMENT_EXISTS")
                    }
                    SettlementError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
                    SettlementError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
                    SettlementError::ValidationFailed { .. } => {
                        (StatusCode::BAD_REQUEST, "VALIDATION_FAILED")
                    }
                    SettlementError::StoreTimeout(_) => {
                        (StatusCode::GATEWAY_TIMEOUT, "STORE_TIMEOUT")
                    }
                    SettlementError::Infrastructure(_) => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
                    }
                };
                (status, code, err.message())
            }
            Self::Webhook(err) => match err {
                WebhookError::ParseError(_) => {
                    (StatusCode::BAD_REQUEST, "WEBHOOK_PARSE_ERROR", err.to_string())
                }
                _ => (
                    StatusCode::UNAUTHORIZED,
                    "INVALID_WEBHOOK_SIGNATURE",
                    err.to_string(),
                ),
            },
        };

        let body = ErrorResponse::new(error_code, message);
        (status, Json(body)).into_response()
    }
}
