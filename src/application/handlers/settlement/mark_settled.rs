//! MarkSettledHandler - Admin command for completing a payout.

use std::sync::Arc;

use crate::domain::foundation::{
    CallerContext, ErrorCode, EventId, SerializableDomainEvent, SettlementId, Timestamp,
};
use crate::domain::settlement::{SettleOutcome, Settlement, SettlementError, SettlementEvent};
use crate::ports::{EventPublisher, SettlementRepository};

/// Command to mark a settlement as paid out.
#[derive(Debug, Clone)]
pub struct MarkSettledCommand {
    pub caller: CallerContext,
    pub settlement_id: SettlementId,
}

/// Result of a settle request.
#[derive(Debug, Clone)]
pub struct MarkSettledResult {
    pub settlement: Settlement,
    /// `AlreadySettled` for a repeated request; the original
    /// settlement_date is preserved and no event is re-emitted.
    pub outcome: SettleOutcome,
}

/// Handler for settling payouts.
///
/// Admin-only. A repeated settle is an idempotent success, not an error.
pub struct MarkSettledHandler {
    repository: Arc<dyn SettlementRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl MarkSettledHandler {
    pub fn new(
        repository: Arc<dyn SettlementRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            event_publisher,
        }
    }

    pub async fn handle(&self, cmd: MarkSettledCommand) -> Result<MarkSettledResult, SettlementError> {
        // 1. Load the settlement
        let mut settlement = self
            .repository
            .find_by_id(&cmd.settlement_id)
            .await?
            .ok_or(SettlementError::NotFound(cmd.settlement_id))?;

        let expected_version = settlement.version;

        // 2. Settle (authorizes; repeated settle short-circuits)
        let outcome = settlement.mark_settled(&cmd.caller)?;

        if outcome == SettleOutcome::AlreadySettled {
            return Ok(MarkSettledResult {
                settlement,
                outcome,
            });
        }

        // 3. Persist under the version read in step 1
        self.repository
            .update(&settlement, expected_version)
            .await
            .map_err(|e| match e.code {
                ErrorCode::Conflict => SettlementError::Conflict(settlement.id),
                _ => e.into(),
            })?;

        // 4. Publish the event
        let event = SettlementEvent::Settled {
            event_id: EventId::new(),
            settlement_id: settlement.id,
            booking_id: settlement.booking_id,
            owner_id: settlement.owner_id.clone(),
            owner_amount: settlement.owner_amount,
            settlement_date: settlement
                .settlement_date
                .unwrap_or_else(Timestamp::now),
            occurred_at: Timestamp::now(),
        };
        self.event_publisher.publish(event.to_envelope()).await?;

        Ok(MarkSettledResult {
            settlement,
            outcome,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::booking::test_support::MockEventPublisher;
    use crate::application::handlers::settlement::test_support::*;
    use crate::domain::foundation::BookingId;
    use crate::domain::settlement::SettlementStatus;

    #[tokio::test]
    async fn admin_settles_pending_payout() {
        let settlement = pending_settlement(BookingId::new());
        let settlement_id = settlement.id;
        let repo = Arc::new(MockSettlementRepository::with_settlement(settlement));
        let publisher = Arc::new(MockEventPublisher::new());
        let handler = MarkSettledHandler::new(repo.clone(), publisher.clone());

        let result = handler
            .handle(MarkSettledCommand {
                caller: admin_caller(),
                settlement_id,
            })
            .await
            .unwrap();

        assert_eq!(result.outcome, SettleOutcome::Settled);
        assert_eq!(result.settlement.status, SettlementStatus::Settled);
        assert!(result.settlement.settlement_date.is_some());
        assert_eq!(repo.stored()[0].status, SettlementStatus::Settled);
        assert_eq!(
            publisher.published_events()[0].event_type,
            "settlement.settled.v1"
        );
    }

    #[tokio::test]
    async fn repeated_settle_is_idempotent_success() {
        let settlement = pending_settlement(BookingId::new());
        let settlement_id = settlement.id;
        let repo = Arc::new(MockSettlementRepository::with_settlement(settlement));
        let publisher = Arc::new(MockEventPublisher::new());
        let handler = MarkSettledHandler::new(repo, publisher.clone());

        let cmd = MarkSettledCommand {
            caller: admin_caller(),
            settlement_id,
        };
        let first = handler.handle(cmd.clone()).await.unwrap();
        let second = handler.handle(cmd).await.unwrap();

        assert_eq!(first.outcome, SettleOutcome::Settled);
        assert_eq!(second.outcome, SettleOutcome::AlreadySettled);
        // Original settlement date preserved, event emitted once
        assert_eq!(
            second.settlement.settlement_date,
            first.settlement.settlement_date
        );
        assert_eq!(publisher.published_events().len(), 1);
    }

    #[tokio::test]
    async fn non_admin_is_forbidden() {
        let settlement = pending_settlement(BookingId::new());
        let settlement_id = settlement.id;
        let repo = Arc::new(MockSettlementRepository::with_settlement(settlement));
        let publisher = Arc::new(MockEventPublisher::new());
        let handler = MarkSettledHandler::new(repo.clone(), publisher);

        let err = handler
            .handle(MarkSettledCommand {
                caller: crate::domain::foundation::CallerContext::owner(owner_id()),
                settlement_id,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, SettlementError::Forbidden(_)));
        assert_eq!(
            repo.stored()[0].status,
            SettlementStatus::PendingSettlement
        );
    }

    #[tokio::test]
    async fn unknown_settlement_is_not_found() {
        let repo = Arc::new(MockSettlementRepository::new());
        let publisher = Arc::new(MockEventPublisher::new());
        let handler = MarkSettledHandler::new(repo, publisher);

        let err = handler
            .handle(MarkSettledCommand {
                caller: admin_caller(),
                settlement_id: SettlementId::new(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, SettlementError::NotFound(_)));
    }
}
