//! Conversation Session Aggregate

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use crate::domain::value_objects::{CustomerInfo, Money, OrderReference, Quantity};

/// Where a customer is in the ordering conversation. Each variant carries
/// exactly the data collected so far.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConversationSession {
    #[default]
    New,
    Ordering,
    CollectingInfo { quantity: Quantity },
    Confirming {
        quantity: Quantity,
        customer: CustomerInfo,
        total: Money,
        /// Identity the order is saved under when the customer confirms.
        #[serde(default = "OrderReference::generate")]
        reference: OrderReference,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionState { New, Ordering, CollectingInfo, Confirming }

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::Ordering => "ORDERING",
            Self::CollectingInfo => "COLLECTING_INFO",
            Self::Confirming => "CONFIRMING",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl ConversationSession {
    pub fn state(&self) -> SessionState {
        match self {
            Self::New => SessionState::New,
            Self::Ordering => SessionState::Ordering,
            Self::CollectingInfo { .. } => SessionState::CollectingInfo,
            Self::Confirming { .. } => SessionState::Confirming,
        }
    }

    /// Only sessions past `NEW` are kept in the store.
    pub fn is_retained(&self) -> bool { !matches!(self, Self::New) }

    pub fn quantity(&self) -> Option<Quantity> {
        match self {
            Self::CollectingInfo { quantity } | Self::Confirming { quantity, .. } => Some(*quantity),
            _ => None,
        }
    }

    pub fn customer(&self) -> Option<&CustomerInfo> {
        match self { Self::Confirming { customer, .. } => Some(customer), _ => None }
    }

    pub fn reference(&self) -> Option<&OrderReference> {
        match self { Self::Confirming { reference, .. } => Some(reference), _ => None }
    }
}

/// A session as held by a store, stamped with its last activity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session: ConversationSession,
    pub updated_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn new(session: ConversationSession) -> Self { Self { session, updated_at: Utc::now() } }

    pub fn is_idle(&self, now: DateTime<Utc>, idle_timeout: Duration) -> bool {
        now - self.updated_at > idle_timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn reference() -> OrderReference {
        OrderReference { id: uuid::Uuid::nil(), number: "OX00000042".into() }
    }

    fn confirming() -> ConversationSession {
        ConversationSession::Confirming {
            quantity: Quantity::new(2).unwrap(),
            customer: CustomerInfo { name: "Ahmet".into(), phone: "0555".into(), address: "Adres".into(), city: "İstanbul".into() },
            total: Money::lira(Decimal::from(798)),
            reference: reference(),
        }
    }

    #[test]
    fn test_serialized_state_tag() {
        let json = serde_json::to_value(&confirming()).unwrap();
        assert_eq!(json["state"], "CONFIRMING");
        assert_eq!(json["quantity"], 2);
        assert_eq!(json["reference"]["number"], "OX00000042");
        let back: ConversationSession = serde_json::from_value(json).unwrap();
        assert_eq!(back, confirming());
        assert_eq!(serde_json::to_value(&ConversationSession::Ordering).unwrap()["state"], "ORDERING");
    }

    #[test]
    fn test_accessors() {
        assert_eq!(ConversationSession::New.quantity(), None);
        assert!(!ConversationSession::New.is_retained());
        let s = confirming();
        assert_eq!(s.state(), SessionState::Confirming);
        assert_eq!(s.quantity().map(|q| q.value()), Some(2));
        assert_eq!(s.customer().map(|c| c.name.as_str()), Some("Ahmet"));
        assert_eq!(s.reference(), Some(&reference()));
        assert_eq!(ConversationSession::Ordering.reference(), None);
    }

    #[test]
    fn test_confirming_without_reference_gets_one() {
        let mut json = serde_json::to_value(&confirming()).unwrap();
        json.as_object_mut().unwrap().remove("reference");
        let back: ConversationSession = serde_json::from_value(json).unwrap();
        let reference = back.reference().unwrap();
        assert!(reference.number.starts_with("OX"));
        assert_ne!(reference.id, uuid::Uuid::nil());
    }

    #[test]
    fn test_idle_record() {
        let mut record = SessionRecord::new(ConversationSession::Ordering);
        let now = Utc::now();
        assert!(!record.is_idle(now, Duration::hours(1)));
        record.updated_at = now - Duration::hours(2);
        assert!(record.is_idle(now, Duration::hours(1)));
    }
}
