//! Booking status state machine.
//!
//! Defines all possible booking states and valid transitions through
//! the multi-party approval lifecycle.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};

/// Booking lifecycle status.
///
/// A booking moves forward only; no transition revisits an exited state.
/// A rejected booking is never resurrected - rebooking creates a new
/// booking that points back at the rejected one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Initial state. Tenant has requested, owner has not yet decided.
    Pending,

    /// Owner accepted the request. Awaiting tenant check-in.
    Approved,

    /// Owner declined the request. Terminal; rebook creates a new booking.
    Rejected,

    /// Tenant checked in (or confirmation recorded early).
    Confirmed,

    /// Stay finished normally. Terminal.
    Completed,

    /// Tenant withdrew after approval. Terminal.
    Cancelled,
}

impl BookingStatus {
    /// Returns true if a tenant in this state counts as an active member
    /// of the property's chat channel.
    pub fn grants_channel_membership(&self) -> bool {
        matches!(self, BookingStatus::Approved | BookingStatus::Confirmed)
    }

    /// Stable string form used in storage and API payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Approved => "approved",
            BookingStatus::Rejected => "rejected",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    /// Parses a status from its string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(BookingStatus::Pending),
            "approved" => Some(BookingStatus::Approved),
            "rejected" => Some(BookingStatus::Rejected),
            "confirmed" => Some(BookingStatus::Confirmed),
            "completed" => Some(BookingStatus::Completed),
            "cancelled" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }
}

impl StateMachine for BookingStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use BookingStatus::*;
        matches!(
            (self, target),
            // From PENDING
            (Pending, Approved)
                | (Pending, Rejected)
            // From APPROVED
                | (Approved, Confirmed)
                | (Approved, Cancelled)
            // From CONFIRMED
                | (Confirmed, Completed)
                | (Confirmed, Cancelled)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use BookingStatus::*;
        match self {
            Pending => vec![Approved, Rejected],
            Approved => vec![Confirmed, Cancelled],
            Confirmed => vec![Completed, Cancelled],
            Rejected => vec![],
            Completed => vec![],
            Cancelled => vec![],
        }
    }
}
