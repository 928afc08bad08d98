//! Order Aggregate

use chrono::{DateTime, Utc};
use uuid::Uuid;
use crate::domain::events::OrderEvent;
use crate::domain::value_objects::{price_for, CustomerId, CustomerInfo, Money, OrderReference, Quantity};

/// An order confirmed by a customer over WhatsApp.
#[derive(Clone, Debug)]
pub struct Order {
    id: Uuid,
    order_number: String,
    customer_id: CustomerId,
    quantity: Quantity,
    total: Money,
    customer: CustomerInfo,
    placed_at: DateTime<Utc>,
    events: Vec<OrderEvent>,
}

impl Order {
    /// Builds the order identified by `reference`. Placing the same reference
    /// twice yields the same id and order number.
    pub fn place(reference: OrderReference, customer_id: CustomerId, quantity: Quantity, customer: CustomerInfo) -> Self {
        let total = price_for(quantity);
        let mut order = Self {
            id: reference.id, order_number: reference.number, customer_id, quantity, total,
            customer, placed_at: Utc::now(), events: vec![],
        };
        order.raise_event(OrderEvent::Placed {
            order_id: order.id,
            order_number: order.order_number.clone(),
            customer_id: order.customer_id.to_string(),
            quantity: quantity.value(),
            total: order.total.amount(),
            currency: order.total.currency().to_string(),
            customer: order.customer.clone(),
        });
        order
    }

    pub fn id(&self) -> Uuid { self.id }
    pub fn order_number(&self) -> &str { &self.order_number }
    pub fn customer_id(&self) -> &CustomerId { &self.customer_id }
    pub fn quantity(&self) -> Quantity { self.quantity }
    pub fn total(&self) -> &Money { &self.total }
    pub fn customer(&self) -> &CustomerInfo { &self.customer }
    pub fn placed_at(&self) -> DateTime<Utc> { self.placed_at }

    pub fn events(&self) -> &[OrderEvent] { &self.events }
    fn raise_event(&mut self, e: OrderEvent) { self.events.push(e); }
}
