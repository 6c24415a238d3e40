//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Following CQRS, it separates command handlers (write) from query handlers (read).

pub mod handlers;

pub use handlers::{
    // Booking handlers
    booking::{
        ApproveBookingCommand, ApproveBookingHandler, CancelBookingCommand, CancelBookingHandler,
        CompleteBookingCommand, CompleteBookingHandler, ConfirmBookingCommand,
        ConfirmBookingHandler, CreateBookingCommand, CreateBookingHandler, ListBookingsHandler,
        ListBookingsQuery, RebookBookingCommand, RebookBookingHandler, RejectBookingCommand,
        RejectBookingHandler,
    },
    // Notification handlers
    notification::{
        ListChannelMessagesHandler, ListNotificationsHandler, MarkAllNotificationsReadHandler,
        MarkNotificationReadHandler, NotificationFanout, PublishMessageHandler,
    },
    // Settlement handlers
    settlement::{
        MarkSettledCommand, MarkSettledHandler, RecordPaymentCapturedCommand,
        RecordPaymentCapturedHandler, SettlementReportsHandler,
    },
};
