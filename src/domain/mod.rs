//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, enums, errors)
//! - `booking` - Booking lifecycle state machine and authorization rules
//! - `settlement` - Payment capture ingestion, fee policy, payout ledger
//! - `notification` - Personal notifications and channel-based chat fan-out

pub mod booking;
pub mod foundation;
pub mod notification;
pub mod settlement;
