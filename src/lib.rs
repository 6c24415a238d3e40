//! Rentledger - Property Rental Marketplace Core
//!
//! This crate implements the booking lifecycle state machine, the settlement
//! ledger, and the notification/chat fan-out for a property-rental
//! marketplace.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
