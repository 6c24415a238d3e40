//! ListBookingsHandler - Query handler for role-scoped booking lists.

use std::sync::Arc;

use crate::domain::booking::BookingError;
use crate::domain::foundation::{CallerContext, PropertyId, Role};
use crate::ports::{BookingReader, BookingSummary};

/// Query for bookings visible to the caller.
///
/// Tenants see their own requests, owners see bookings across their
/// properties. Admins see everything, optionally scoped to one property.
#[derive(Debug, Clone)]
pub struct ListBookingsQuery {
    pub caller: CallerContext,
    /// Admin-only property scope.
    pub property_id: Option<PropertyId>,
}

/// Result of a booking list query.
#[derive(Debug, Clone)]
pub struct ListBookingsResult {
    pub bookings: Vec<BookingSummary>,
}

/// Handler for listing bookings.
pub struct ListBookingsHandler {
    reader: Arc<dyn BookingReader>,
}

impl ListBookingsHandler {
    pub fn new(reader: Arc<dyn BookingReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(&self, query: ListBookingsQuery) -> Result<ListBookingsResult, BookingError> {
        let bookings = match query.caller.role {
            Role::Tenant => self.reader.list_for_tenant(&query.caller.user_id).await?,
            Role::Owner => self.reader.list_for_owner(&query.caller.user_id).await?,
            Role::Admin => match query.property_id {
                Some(property_id) => self.reader.list_for_property(&property_id).await?,
                None => self.reader.list_all().await?,
            },
        };

        Ok(ListBookingsResult { bookings })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::booking::test_support::*;
    use crate::domain::booking::BookingStatus;
    use crate::domain::foundation::{
        BookingId, DomainError, Money, Timestamp, UserId,
    };
    use async_trait::async_trait;

    struct MockBookingReader {
        summaries: Vec<BookingSummary>,
    }

    impl MockBookingReader {
        fn summary(tenant: &UserId, property_id: PropertyId) -> BookingSummary {
            BookingSummary {
                id: BookingId::new(),
                property_id,
                tenant_id: tenant.clone(),
                status: BookingStatus::Pending,
                room_type: "studio".to_string(),
                check_in_date: check_in(),
                amount: Money::from_minor_units(12_000),
                reject_reason: None,
                created_at: Timestamp::now(),
            }
        }
    }

    #[async_trait]
    impl BookingReader for MockBookingReader {
        async fn list_for_tenant(
            &self,
            tenant_id: &UserId,
        ) -> Result<Vec<BookingSummary>, DomainError> {
            Ok(self
                .summaries
                .iter()
                .filter(|s| &s.tenant_id == tenant_id)
                .cloned()
                .collect())
        }

        async fn list_for_owner(
            &self,
            _owner_id: &UserId,
        ) -> Result<Vec<BookingSummary>, DomainError> {
            Ok(self.summaries.clone())
        }

        async fn list_for_property(
            &self,
            property_id: &PropertyId,
        ) -> Result<Vec<BookingSummary>, DomainError> {
            Ok(self
                .summaries
                .iter()
                .filter(|s| &s.property_id == property_id)
                .cloned()
                .collect())
        }

        async fn list_all(&self) -> Result<Vec<BookingSummary>, DomainError> {
            Ok(self.summaries.clone())
        }

        async fn active_tenants(
            &self,
            _property_id: &PropertyId,
        ) -> Result<Vec<UserId>, DomainError> {
            Ok(vec![])
        }

        async fn has_other_active_booking(
            &self,
            _property_id: &PropertyId,
            _tenant_id: &UserId,
            _excluding: &BookingId,
        ) -> Result<bool, DomainError> {
            Ok(false)
        }
    }

    #[tokio::test]
    async fn tenant_sees_only_own_bookings() {
        let property_id = PropertyId::new();
        let other = UserId::new("tenant-2").unwrap();
        let reader = Arc::new(MockBookingReader {
            summaries: vec![
                MockBookingReader::summary(&tenant_id(), property_id),
                MockBookingReader::summary(&other, property_id),
            ],
        });
        let handler = ListBookingsHandler::new(reader);

        let result = handler
            .handle(ListBookingsQuery {
                caller: tenant_caller(),
                property_id: None,
            })
            .await
            .unwrap();

        assert_eq!(result.bookings.len(), 1);
        assert_eq!(result.bookings[0].tenant_id, tenant_id());
    }

    #[tokio::test]
    async fn admin_without_property_scope_sees_all_bookings() {
        let reader = Arc::new(MockBookingReader {
            summaries: vec![
                MockBookingReader::summary(&tenant_id(), PropertyId::new()),
                MockBookingReader::summary(&UserId::new("tenant-2").unwrap(), PropertyId::new()),
            ],
        });
        let handler = ListBookingsHandler::new(reader);

        let caller =
            crate::domain::foundation::CallerContext::admin(UserId::new("admin-1").unwrap());
        let result = handler
            .handle(ListBookingsQuery {
                caller,
                property_id: None,
            })
            .await
            .unwrap();

        assert_eq!(result.bookings.len(), 2);
    }

    #[tokio::test]
    async fn admin_lists_by_property() {
        let property_id = PropertyId::new();
        let reader = Arc::new(MockBookingReader {
            summaries: vec![
                MockBookingReader::summary(&tenant_id(), property_id),
                MockBookingReader::summary(&tenant_id(), PropertyId::new()),
            ],
        });
        let handler = ListBookingsHandler::new(reader);

        let caller =
            crate::domain::foundation::CallerContext::admin(UserId::new("admin-1").unwrap());
        let result = handler
            .handle(ListBookingsQuery {
                caller,
                property_id: Some(property_id),
            })
            .await
            .unwrap();

        assert_eq!(result.bookings.len(), 1);
    }
}
