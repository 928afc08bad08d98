//! Pure conversation transition function.
//!
//! Given the current session and the raw inbound text, decides the next
//! session and the reply without touching any store. Confirming an order is
//! returned as a separate outcome because its reply depends on whether the
//! order could be saved.

use super::input::{decision, is_menu_request, menu_choice, normalize, quantity_choice, Decision, MenuChoice};
use super::templates::Reply;
use crate::domain::aggregates::ConversationSession;
use crate::domain::value_objects::{price_for, CustomerInfo, OrderReference, Quantity};

#[derive(Debug, PartialEq, Eq)]
pub enum Transition {
    Reply { next: ConversationSession, reply: Reply },
    PlaceOrder { reference: OrderReference, quantity: Quantity, customer: CustomerInfo },
}

impl Transition {
    fn to(next: ConversationSession, reply: Reply) -> Self { Self::Reply { next, reply } }
    fn stay(current: &ConversationSession, reply: Reply) -> Self { Self::to(current.clone(), reply) }
}

pub fn transition(session: &ConversationSession, text: &str) -> Transition {
    let normalized = normalize(text);

    if is_menu_request(&normalized) {
        return Transition::to(ConversationSession::New, Reply::Welcome);
    }

    match session {
        ConversationSession::New => match menu_choice(&normalized) {
            MenuChoice::Order => Transition::to(ConversationSession::Ordering, Reply::OrderStart),
            MenuChoice::ProductInfo | MenuChoice::Prices => Transition::stay(session, Reply::ProductInfo),
            MenuChoice::Support => Transition::stay(session, Reply::SupportContact),
            MenuChoice::Unknown => Transition::stay(session, Reply::Welcome),
        },

        ConversationSession::Ordering => match quantity_choice(&normalized) {
            Some(quantity) => Transition::to(
                ConversationSession::CollectingInfo { quantity },
                Reply::AskCustomerInfo { quantity },
            ),
            None => Transition::stay(session, Reply::InvalidQuantity),
        },

        ConversationSession::CollectingInfo { quantity } => match CustomerInfo::from_message(text) {
            Ok(customer) => {
                let total = price_for(*quantity);
                Transition::to(
                    ConversationSession::Confirming {
                        quantity: *quantity,
                        customer: customer.clone(),
                        total: total.clone(),
                        reference: OrderReference::generate(),
                    },
                    Reply::OrderSummary { quantity: *quantity, customer, total },
                )
            }
            Err(_) => Transition::stay(session, Reply::MissingCustomerInfo),
        },

        ConversationSession::Confirming { quantity, customer, total, reference } => match decision(&normalized) {
            Some(Decision::Confirm) => Transition::PlaceOrder {
                reference: reference.clone(),
                quantity: *quantity,
                customer: customer.clone(),
            },
            Some(Decision::Cancel) => Transition::to(ConversationSession::New, Reply::OrderCancelled),
            None => Transition::stay(
                session,
                Reply::ConfirmReminder { quantity: *quantity, customer: customer.clone(), total: total.clone() },
            ),
        },
    }
}
