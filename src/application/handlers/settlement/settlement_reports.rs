//! Settlement reporting query handlers.
//!
//! Read-only views over the ledger: the admin payout queue, settled
//! history, per-owner history, and the ledger-wide totals whose sum
//! invariant the tests pin down.

use std::sync::Arc;

use crate::domain::foundation::{CallerContext, Role, UserId};
use crate::domain::settlement::SettlementError;
use crate::ports::{SettlementReader, SettlementTotals, SettlementView};

/// Query for the pending payout queue. Admin-only.
#[derive(Debug, Clone)]
pub struct ListPendingSettlementsQuery {
    pub caller: CallerContext,
}

/// Query for settled history, paginated. Admin-only.
#[derive(Debug, Clone)]
pub struct ListSettledQuery {
    pub caller: CallerContext,
    pub page: u32,
    pub page_size: u32,
}

/// Query for one owner's settlement history.
///
/// Owners see their own; admins may query any owner.
#[derive(Debug, Clone)]
pub struct OwnerSettlementHistoryQuery {
    pub caller: CallerContext,
    pub owner_id: UserId,
}

/// Query for ledger-wide totals. Admin-only.
#[derive(Debug, Clone)]
pub struct SettlementTotalsQuery {
    pub caller: CallerContext,
}

/// Handler for settlement reporting queries.
pub struct SettlementReportsHandler {
    reader: Arc<dyn SettlementReader>,
}

impl SettlementReportsHandler {
    pub fn new(reader: Arc<dyn SettlementReader>) -> Self {
        Self { reader }
    }

    pub async fn list_pending(
        &self,
        query: ListPendingSettlementsQuery,
    ) -> Result<Vec<SettlementView>, SettlementError> {
        require_admin(&query.caller)?;
        Ok(self.reader.list_pending().await?)
    }

    pub async fn list_settled(
        &self,
        query: ListSettledQuery,
    ) -> Result<Vec<SettlementView>, SettlementError> {
        require_admin(&query.caller)?;
        if query.page_size == 0 {
            return Err(SettlementError::validation(
                "page_size",
                "must be at least 1",
            ));
        }
        Ok(self.reader.list_settled(query.page, query.page_size).await?)
    }

    pub async fn owner_history(
        &self,
        query: OwnerSettlementHistoryQuery,
    ) -> Result<Vec<SettlementView>, SettlementError> {
        let allowed = query.caller.has_role(Role::Admin)
            || (query.caller.has_role(Role::Owner) && query.caller.is_user(&query.owner_id));
        if !allowed {
            return Err(SettlementError::forbidden(
                "Owners may only view their own settlement history",
            ));
        }
        Ok(self.reader.list_for_owner(&query.owner_id).await?)
    }

    pub async fn totals(
        &self,
        query: SettlementTotalsQuery,
    ) -> Result<SettlementTotals, SettlementError> {
        require_admin(&query.caller)?;
        Ok(self.reader.totals().await?)
    }
}

fn require_admin(caller: &CallerContext) -> Result<(), SettlementError> {
    if !caller.has_role(Role::Admin) {
        return Err(SettlementError::forbidden(
            "Settlement reports are admin-only",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::settlement::test_support::*;
    use crate::domain::foundation::{
        BookingId, DomainError, Money, SettlementId, Timestamp,
    };
    use crate::domain::settlement::SettlementStatus;
    use async_trait::async_trait;

    struct MockSettlementReader {
        views: Vec<SettlementView>,
        totals: SettlementTotals,
    }

    impl MockSettlementReader {
        fn empty() -> Self {
            Self {
                views: vec![],
                totals: SettlementTotals::default(),
            }
        }

        fn view(owner: &UserId, status: SettlementStatus) -> SettlementView {
            SettlementView {
                id: SettlementId::new(),
                booking_id: BookingId::new(),
                owner_id: owner.clone(),
                gross_amount: Money::from_minor_units(12_000),
                platform_fee: Money::from_minor_units(1_200),
                owner_amount: Money::from_minor_units(10_800),
                status,
                settlement_date: None,
                owner_bank_snapshot: bank_snapshot(),
                created_at: Timestamp::now(),
            }
        }
    }

    #[async_trait]
    impl SettlementReader for MockSettlementReader {
        async fn list_pending(&self) -> Result<Vec<SettlementView>, DomainError> {
            Ok(self
                .views
                .iter()
                .filter(|v| v.status == SettlementStatus::PendingSettlement)
                .cloned()
                .collect())
        }

        async fn list_settled(
            &self,
            _page: u32,
            _page_size: u32,
        ) -> Result<Vec<SettlementView>, DomainError> {
            Ok(self
                .views
                .iter()
                .filter(|v| v.status == SettlementStatus::Settled)
                .cloned()
                .collect())
        }

        async fn list_for_owner(
            &self,
            owner_id: &UserId,
        ) -> Result<Vec<SettlementView>, DomainError> {
            Ok(self
                .views
                .iter()
                .filter(|v| &v.owner_id == owner_id)
                .cloned()
                .collect())
        }

        async fn totals(&self) -> Result<SettlementTotals, DomainError> {
            Ok(self.totals.clone())
        }
    }

    #[tokio::test]
    async fn admin_lists_pending_queue() {
        let reader = Arc::new(MockSettlementReader {
            views: vec![
                MockSettlementReader::view(&owner_id(), SettlementStatus::PendingSettlement),
                MockSettlementReader::view(&owner_id(), SettlementStatus::Settled),
            ],
            totals: SettlementTotals::default(),
        });
        let handler = SettlementReportsHandler::new(reader);

        let pending = handler
            .list_pending(ListPendingSettlementsQuery {
                caller: admin_caller(),
            })
            .await
            .unwrap();

        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].status, SettlementStatus::PendingSettlement);
    }

    #[tokio::test]
    async fn owner_cannot_list_pending_queue() {
        let handler = SettlementReportsHandler::new(Arc::new(MockSettlementReader::empty()));

        let err = handler
            .list_pending(ListPendingSettlementsQuery {
                caller: CallerContext::owner(owner_id()),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, SettlementError::Forbidden(_)));
    }

    #[tokio::test]
    async fn owner_sees_own_history() {
        let reader = Arc::new(MockSettlementReader {
            views: vec![MockSettlementReader::view(
                &owner_id(),
                SettlementStatus::Settled,
            )],
            totals: SettlementTotals::default(),
        });
        let handler = SettlementReportsHandler::new(reader);

        let history = handler
            .owner_history(OwnerSettlementHistoryQuery {
                caller: CallerContext::owner(owner_id()),
                owner_id: owner_id(),
            })
            .await
            .unwrap();

        assert_eq!(history.len(), 1);
    }

    #[tokio::test]
    async fn owner_cannot_see_another_owners_history() {
        let handler = SettlementReportsHandler::new(Arc::new(MockSettlementReader::empty()));

        let err = handler
            .owner_history(OwnerSettlementHistoryQuery {
                caller: CallerContext::owner(UserId::new("owner-2").unwrap()),
                owner_id: owner_id(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, SettlementError::Forbidden(_)));
    }

    #[tokio::test]
    async fn zero_page_size_fails_validation() {
        let handler = SettlementReportsHandler::new(Arc::new(MockSettlementReader::empty()));

        let err = handler
            .list_settled(ListSettledQuery {
                caller: admin_caller(),
                page: 0,
                page_size: 0,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, SettlementError::ValidationFailed { .. }));
    }

    #[tokio::test]
    async fn totals_report_consistent_sums() {
        let totals = SettlementTotals {
            pending_owner_amount: Money::from_minor_units(10_800),
            settled_owner_amount: Money::from_minor_units(21_600),
            total_gross_amount: Money::from_minor_units(36_000),
            total_platform_fee: Money::from_minor_units(3_600),
            pending_count: 1,
            settled_count: 2,
        };
        let reader = Arc::new(MockSettlementReader {
            views: vec![],
            totals,
        });
        let handler = SettlementReportsHandler::new(reader);

        let totals = handler
            .totals(SettlementTotalsQuery {
                caller: admin_caller(),
            })
            .await
            .unwrap();

        assert!(totals.is_consistent());
    }
}
