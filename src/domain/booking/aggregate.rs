//! Booking aggregate entity.
//!
//! A Booking is a tenant's request to occupy a unit of a property for a
//! date range. It moves through a multi-party approval lifecycle: the
//! tenant requests, the owner approves or rejects, the tenant checks in,
//! and the stay completes or is cancelled.
//!
//! # Design Decisions
//!
//! - **Frozen owner_id**: derived from the property at creation and never
//!   updated, even if property ownership later changes, so historical
//!   accountability is preserved
//! - **Money in minor units**: all amounts stored as i64 minor units
//! - **Rebook as new row**: a rejected booking is immutable; rebooking
//!   creates an independent booking with a `rebooked_from` back-reference
//! - **Explicit caller**: every transition takes a [`CallerContext`] and
//!   re-validates role and ownership; nothing reads ambient session state

use crate::domain::foundation::{
    BookingId, CallerContext, DomainError, ErrorCode, Money, PropertyId, Role, Timestamp, UserId,
    ValidationError,
};
use serde::{Deserialize, Serialize};

use super::BookingStatus;

/// Booking aggregate.
///
/// # Invariants
///
/// - `id` is globally unique
/// - `reject_reason` is present if and only if status is Rejected
/// - status transitions follow the state machine; no state is revisited
/// - `owner_id` never changes after construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// Unique identifier for this booking.
    pub id: BookingId,

    /// Property being booked.
    pub property_id: PropertyId,

    /// Tenant who requested the booking.
    pub tenant_id: UserId,

    /// Owner of the property at creation time, frozen thereafter.
    pub owner_id: UserId,

    /// Room type the tenant asked for.
    pub room_type: String,

    /// Requested check-in date.
    pub check_in_date: Timestamp,

    /// Total amount the tenant pays, in minor units.
    pub amount: Money,

    /// Current status in the approval lifecycle.
    pub status: BookingStatus,

    /// Owner's reason for rejecting. Present exactly when status is Rejected.
    pub reject_reason: Option<String>,

    /// Rejected booking this one was rebooked from, if any.
    pub rebooked_from: Option<BookingId>,

    /// When the booking was created.
    pub created_at: Timestamp,

    /// When the booking was last updated.
    pub updated_at: Timestamp,

    /// Optimistic concurrency version, incremented on every persisted write.
    pub version: i64,
}

impl Booking {
    /// Create a new pending booking request.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the room type is empty or the
    /// amount is not positive.
    pub fn request(
        id: BookingId,
        property_id: PropertyId,
        tenant_id: UserId,
        owner_id: UserId,
        room_type: String,
        check_in_date: Timestamp,
        amount: Money,
    ) -> Result<Self, DomainError> {
        if room_type.trim().is_empty() {
            return Err(ValidationError::empty_field("room_type").into());
        }
        if !amount.is_positive() {
            return Err(ValidationError::below_minimum("amount", 1, amount.minor_units()).into());
        }

        let now = Timestamp::now();
        Ok(Self {
            id,
            property_id,
            tenant_id,
            owner_id,
            room_type,
            check_in_date,
            amount,
            status: BookingStatus::Pending,
            reject_reason: None,
            rebooked_from: None,
            created_at: now,
            updated_at: now,
            version: 0,
        })
    }

    /// Create a new pending booking from a rejected one.
    ///
    /// The rejected booking stays untouched; the new booking carries a
    /// `rebooked_from` back-reference so the history graph stays acyclic.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStateTransition` if this booking is not rejected,
    /// or `Forbidden` if the caller is not the original tenant.
    pub fn rebook(
        &self,
        new_id: BookingId,
        caller: &CallerContext,
        check_in_date: Timestamp,
    ) -> Result<Booking, DomainError> {
        if !caller.is_user(&self.tenant_id) {
            return Err(DomainError::new(
                ErrorCode::Forbidden,
                "Only the original tenant may rebook",
            ));
        }
        if self.status != BookingStatus::Rejected {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Only rejected bookings can be rebooked, found {:?}", self.status),
            ));
        }

        let mut booking = Booking::request(
            new_id,
            self.property_id,
            self.tenant_id.clone(),
            self.owner_id.clone(),
            self.room_type.clone(),
            check_in_date,
            self.amount,
        )?;
        booking.rebooked_from = Some(self.id);
        Ok(booking)
    }

    /// Approve this booking request.
    ///
    /// Only the verified owner of the property may approve. An unverified
    /// owner is refused outright with `OwnerNotVerified`; the request is
    /// not queued for later.
    ///
    /// # Errors
    ///
    /// `Forbidden` on role/ownership mismatch, `OwnerNotVerified` when the
    /// owner has not completed verification, `InvalidStateTransition` when
    /// the booking is not pending.
    pub fn approve(&mut self, caller: &CallerContext) -> Result<(), DomainError> {
        self.require_owner(caller)?;
        if !caller.verified {
            return Err(DomainError::new(
                ErrorCode::OwnerNotVerified,
                "Complete owner verification before approving bookings",
            ));
        }
        self.transition_to(BookingStatus::Approved)?;
        Ok(())
    }

    /// Reject this booking request with a reason.
    ///
    /// # Errors
    ///
    /// `Forbidden` on role/ownership mismatch, a validation error when the
    /// reason is empty, `InvalidStateTransition` when the booking is not
    /// pending.
    pub fn reject(&mut self, caller: &CallerContext, reason: String) -> Result<(), DomainError> {
        self.require_owner(caller)?;
        if reason.trim().is_empty() {
            return Err(ValidationError::empty_field("reject_reason").into());
        }
        self.transition_to(BookingStatus::Rejected)?;
        self.reject_reason = Some(reason);
        Ok(())
    }

    /// Record the tenant's check-in.
    ///
    /// Either party may record confirmation. The check-in date is advisory;
    /// confirmation may be recorded early.
    ///
    /// # Errors
    ///
    /// `Forbidden` when the caller is neither the tenant nor the owner,
    /// `InvalidStateTransition` when the booking is not approved.
    pub fn confirm(&mut self, caller: &CallerContext) -> Result<(), DomainError> {
        if !caller.is_user(&self.tenant_id) && !caller.is_user(&self.owner_id) {
            return Err(DomainError::new(
                ErrorCode::Forbidden,
                "Only the tenant or owner of this booking may confirm it",
            ));
        }
        self.transition_to(BookingStatus::Confirmed)?;
        Ok(())
    }

    /// Mark the stay as completed.
    ///
    /// The owner or an admin (acting for scheduled completion) may complete.
    ///
    /// # Errors
    ///
    /// `Forbidden` on role/ownership mismatch, `InvalidStateTransition`
    /// when the booking is not confirmed.
    pub fn complete(&mut self, caller: &CallerContext) -> Result<(), DomainError> {
        if !caller.is_user(&self.owner_id) && !caller.has_role(Role::Admin) {
            return Err(DomainError::new(
                ErrorCode::Forbidden,
                "Only the owner or an admin may complete this booking",
            ));
        }
        self.transition_to(BookingStatus::Completed)?;
        Ok(())
    }

    /// Cancel this booking before completion.
    ///
    /// # Errors
    ///
    /// `Forbidden` when the caller is not the tenant,
    /// `InvalidStateTransition` when the booking cannot be cancelled from
    /// its current state.
    pub fn cancel(&mut self, caller: &CallerContext) -> Result<(), DomainError> {
        if !caller.is_user(&self.tenant_id) {
            return Err(DomainError::new(
                ErrorCode::Forbidden,
                "Only the tenant may cancel this booking",
            ));
        }
        self.transition_to(BookingStatus::Cancelled)?;
        Ok(())
    }

    /// True if this booking currently grants the tenant membership in the
    /// property's chat channel.
    pub fn grants_channel_membership(&self) -> bool {
        self.status.grants_channel_membership()
    }

    fn require_owner(&self, caller: &CallerContext) -> Result<(), DomainError> {
        if !caller.is_user(&self.owner_id) {
            return Err(DomainError::new(
                ErrorCode::Forbidden,
                "Only the property owner may decide this booking",
            ));
        }
        Ok(())
    }

    /// Transition to a new status using the state machine.
    fn transition_to(&mut self, target: BookingStatus) -> Result<(), DomainError> {
        use crate::domain::foundation::StateMachine;

        self.status = self.status.transition_to(target).map_err(|_| {
            DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!(
                    "Cannot transition booking from {:?} to {:?}",
                    self.status, target
                ),
            )
        })?;
        self.updated_at = Timestamp::now();
        self.version += 1;
        Ok(())
    }
}
