//! Shared mock ports for booking handler tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::booking::{Booking, BookingStatus};
use crate::domain::foundation::{
    BookingId, CallerContext, DomainError, ErrorCode, EventEnvelope, Money, PropertyId, Timestamp,
    UserId,
};
use crate::ports::{
    BookingRepository, EventPublisher, OwnerPayoutDetails, PropertyDirectory, PropertyInfo,
};

pub fn tenant_id() -> UserId {
    UserId::new("tenant-1").unwrap()
}

pub fn owner_id() -> UserId {
    UserId::new("owner-1").unwrap()
}

pub fn tenant_caller() -> CallerContext {
    CallerContext::tenant(tenant_id())
}

pub fn owner_caller() -> CallerContext {
    CallerContext::owner(owner_id())
}

pub fn check_in() -> Timestamp {
    Timestamp::now().add_days(14)
}

pub fn pending_booking(property_id: PropertyId) -> Booking {
    Booking::request(
        BookingId::new(),
        property_id,
        tenant_id(),
        owner_id(),
        "studio".to_string(),
        check_in(),
        Money::from_minor_units(12_000),
    )
    .unwrap()
}

pub fn booking_in_status(property_id: PropertyId, status: BookingStatus) -> Booking {
    let mut booking = pending_booking(property_id);
    match status {
        BookingStatus::Pending => {}
        BookingStatus::Approved => {
            booking.approve(&owner_caller()).unwrap();
        }
        BookingStatus::Rejected => {
            booking
                .reject(&owner_caller(), "dates unavailable".to_string())
                .unwrap();
        }
        BookingStatus::Confirmed => {
            booking.approve(&owner_caller()).unwrap();
            booking.confirm(&tenant_caller()).unwrap();
        }
        BookingStatus::Completed => {
            booking.approve(&owner_caller()).unwrap();
            booking.confirm(&tenant_caller()).unwrap();
            booking.complete(&owner_caller()).unwrap();
        }
        BookingStatus::Cancelled => {
            booking.approve(&owner_caller()).unwrap();
            booking.cancel(&tenant_caller()).unwrap();
        }
    }
    booking
}

pub struct MockBookingRepository {
    pub bookings: Mutex<Vec<Booking>>,
    pub fail_save: bool,
    pub fail_update_with: Option<ErrorCode>,
}

impl MockBookingRepository {
    pub fn new() -> Self {
        Self {
            bookings: Mutex::new(Vec::new()),
            fail_save: false,
            fail_update_with: None,
        }
    }

    pub fn with_booking(booking: Booking) -> Self {
        Self {
            bookings: Mutex::new(vec![booking]),
            fail_save: false,
            fail_update_with: None,
        }
    }

    pub fn failing_update(booking: Booking, code: ErrorCode) -> Self {
        Self {
            bookings: Mutex::new(vec![booking]),
            fail_save: false,
            fail_update_with: Some(code),
        }
    }

    pub fn stored(&self) -> Vec<Booking> {
        self.bookings.lock().unwrap().clone()
    }
}

#[async_trait]
impl BookingRepository for MockBookingRepository {
    async fn save(&self, booking: &Booking) -> Result<(), DomainError> {
        if self.fail_save {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                "Simulated save failure",
            ));
        }
        self.bookings.lock().unwrap().push(booking.clone());
        Ok(())
    }

    async fn update(&self, booking: &Booking, expected_version: i64) -> Result<(), DomainError> {
        if let Some(code) = self.fail_update_with {
            return Err(DomainError::new(code, "Simulated update failure"));
        }
        let mut bookings = self.bookings.lock().unwrap();
        let stored = bookings
            .iter_mut()
            .find(|b| b.id == booking.id)
            .ok_or_else(|| DomainError::new(ErrorCode::BookingNotFound, "Booking not found"))?;
        if stored.version != expected_version {
            return Err(DomainError::new(
                ErrorCode::Conflict,
                "Version mismatch, concurrent writer won",
            ));
        }
        *stored = booking.clone();
        Ok(())
    }

    async fn find_by_id(&self, id: &BookingId) -> Result<Option<Booking>, DomainError> {
        let bookings = self.bookings.lock().unwrap();
        Ok(bookings.iter().find(|b| &b.id == id).cloned())
    }

    async fn find_overlapping(
        &self,
        property_id: &PropertyId,
        tenant_id: &UserId,
        check_in_date: &Timestamp,
    ) -> Result<Vec<Booking>, DomainError> {
        let bookings = self.bookings.lock().unwrap();
        Ok(bookings
            .iter()
            .filter(|b| {
                &b.property_id == property_id
                    && &b.tenant_id == tenant_id
                    && &b.check_in_date == check_in_date
                    && matches!(b.status, BookingStatus::Pending | BookingStatus::Approved)
            })
            .cloned()
            .collect())
    }
}

pub struct MockPropertyDirectory {
    pub properties: Mutex<Vec<PropertyInfo>>,
}

impl MockPropertyDirectory {
    pub fn with_property(property: PropertyInfo) -> Self {
        Self {
            properties: Mutex::new(vec![property]),
        }
    }

    pub fn available_property(property_id: PropertyId) -> Self {
        Self::with_property(PropertyInfo {
            id: property_id,
            owner_id: owner_id(),
            available_units: 3,
        })
    }

    pub fn full_property(property_id: PropertyId) -> Self {
        Self::with_property(PropertyInfo {
            id: property_id,
            owner_id: owner_id(),
            available_units: 0,
        })
    }
}

#[async_trait]
impl PropertyDirectory for MockPropertyDirectory {
    async fn get_property(&self, property_id: &PropertyId) -> Result<PropertyInfo, DomainError> {
        let properties = self.properties.lock().unwrap();
        properties
            .iter()
            .find(|p| &p.id == property_id)
            .cloned()
            .ok_or_else(|| DomainError::new(ErrorCode::PropertyNotFound, "Property not found"))
    }

    async fn get_owner_payout_details(
        &self,
        _owner_id: &UserId,
    ) -> Result<OwnerPayoutDetails, DomainError> {
        Ok(OwnerPayoutDetails {
            bank_name: "First National".to_string(),
            account_number: "12345678".to_string(),
            account_holder: "Owner One".to_string(),
        })
    }
}

pub struct MockEventPublisher {
    pub published: Mutex<Vec<EventEnvelope>>,
    pub fail_publish: bool,
}

impl MockEventPublisher {
    pub fn new() -> Self {
        Self {
            published: Mutex::new(Vec::new()),
            fail_publish: false,
        }
    }

    pub fn published_events(&self) -> Vec<EventEnvelope> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventPublisher for MockEventPublisher {
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError> {
        if self.fail_publish {
            return Err(DomainError::new(
                ErrorCode::ExternalServiceError,
                "Simulated publish failure",
            ));
        }
        self.published.lock().unwrap().push(event);
        Ok(())
    }

    async fn publish_all(&self, events: Vec<EventEnvelope>) -> Result<(), DomainError> {
        for event in events {
            self.publish(event).await?;
        }
        Ok(())
    }
}
