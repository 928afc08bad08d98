//! Aggregates module
pub mod order;
pub mod session;

pub use order::Order;
pub use session::{ConversationSession, SessionRecord, SessionState};
