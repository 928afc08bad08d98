//! Oxiva WhatsApp Order Intake
//!
//! Takes orders for the Oxiva nasal band over WhatsApp.
//!
//! ## Features
//! - Per-customer conversation state machine (menu, quantity, address, confirmation)
//! - Tiered pricing for bulk orders
//! - Durable order recording before the conversation is closed
//! - Admin notification of placed orders
//! - Twilio-compatible webhook with an always-200 XML envelope

use std::time::Duration;

use thiserror::Error;

pub mod config;
pub mod conversation;
pub mod domain;
pub mod http;
pub mod notify;
pub mod store;

pub use conversation::{ConversationEngine, InboundMessage, Outcome};
pub use domain::aggregates::{ConversationSession, Order, SessionState};
pub use domain::value_objects::{CustomerId, CustomerInfo, Money, OrderReference, Quantity, MAX_QUANTITY};

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("Missing webhook field: {0}")]
    MissingField(&'static str),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Notification error: {0}")]
    Notification(String),

    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),
}

impl From<sqlx::Error> for IntakeError {
    fn from(e: sqlx::Error) -> Self {
        Self::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for IntakeError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, IntakeError>;
