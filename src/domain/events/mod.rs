//! Domain events
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;
use crate::domain::value_objects::CustomerInfo;

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OrderEvent {
    Placed {
        order_id: Uuid,
        order_number: String,
        customer_id: String,
        quantity: u32,
        total: Decimal,
        currency: String,
        customer: CustomerInfo,
    },
}
