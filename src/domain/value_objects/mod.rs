//! Value Objects for WhatsApp order intake

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;
use validator::Validate;

pub const CURRENCY: &str = "TRY";

/// Sender identifier as delivered by the gateway (e.g. `whatsapp:+905551234567`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(String);

impl CustomerId {
    pub fn new(value: impl Into<String>) -> Result<Self, CustomerIdError> {
        let value = value.into().trim().to_string();
        if value.is_empty() { return Err(CustomerIdError::Empty); }
        Ok(Self(value))
    }
    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

#[derive(Debug, Clone, Error)]
pub enum CustomerIdError {
    #[error("customer id is empty")]
    Empty,
}

/// Largest quantity accepted in a single WhatsApp order.
pub const MAX_QUANTITY: u32 = 1000;

/// Number of units in an order, between 1 and [`MAX_QUANTITY`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    pub fn new(value: u32) -> Result<Self, QuantityError> {
        if value == 0 { return Err(QuantityError::Zero); }
        if value > MAX_QUANTITY { return Err(QuantityError::TooLarge { max: MAX_QUANTITY }); }
        Ok(Self(value))
    }
    pub fn value(&self) -> u32 { self.0 }
}

impl TryFrom<u32> for Quantity {
    type Error = QuantityError;
    fn try_from(value: u32) -> Result<Self, Self::Error> { Self::new(value) }
}

impl From<Quantity> for u32 {
    fn from(q: Quantity) -> Self { q.0 }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

#[derive(Debug, Clone, Error)]
pub enum QuantityError {
    #[error("quantity must be positive")]
    Zero,
    #[error("quantity exceeds {max}")]
    TooLarge { max: u32 },
}

/// Money value object
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money { amount: Decimal, currency: String }

impl Money {
    pub fn new(amount: Decimal, currency: &str) -> Self { Self { amount, currency: currency.to_string() } }
    pub fn lira(amount: Decimal) -> Self { Self::new(amount, CURRENCY) }
    pub fn amount(&self) -> Decimal { self.amount }
    pub fn currency(&self) -> &str { &self.currency }
    pub fn multiply(&self, qty: u32) -> Money { Money::new(self.amount * Decimal::from(qty), &self.currency) }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.currency == CURRENCY { write!(f, "{} TL", self.amount) } else { write!(f, "{} {}", self.amount, self.currency) }
    }
}

/// Price of a single band when buying four or more.
pub const BULK_UNIT_PRICE: u32 = 399;

/// Fixed price tiers: 1 → 449, 2 → 798, 3 → 1197, otherwise 399 per unit.
pub fn price_for(quantity: Quantity) -> Money {
    let amount = match quantity.value() {
        1 => Decimal::from(449),
        2 => Decimal::from(798),
        3 => Decimal::from(1197),
        n => return Money::lira(Decimal::from(BULK_UNIT_PRICE)).multiply(n),
    };
    Money::lira(amount)
}

/// Identity of an order, fixed when the customer reaches `CONFIRMING` so
/// that every retry of the same confirmation saves the same order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderReference {
    pub id: Uuid,
    pub number: String,
}

impl OrderReference {
    pub fn generate() -> Self { Self { id: Uuid::now_v7(), number: generate_order_number() } }
}

/// `OX` followed by eight digits taken from a random UUID.
fn generate_order_number() -> String {
    let n = Uuid::new_v4().as_u128() % 100_000_000;
    format!("OX{n:08}")
}

/// Delivery details, one field per line of the customer's message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CustomerInfo {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 40))]
    pub phone: String,
    #[validate(length(min = 1, max = 500))]
    pub address: String,
    #[validate(length(min = 1, max = 200))]
    pub city: String,
}

impl CustomerInfo {
    /// Parses name, phone, address and city/district from the first four
    /// non-blank lines of `text`. Control characters are dropped.
    pub fn from_message(text: &str) -> Result<Self, CustomerInfoError> {
        let lines: Vec<String> = text
            .lines()
            .map(|l| l.chars().filter(|c| !c.is_control()).collect::<String>().trim().to_string())
            .filter(|l| !l.is_empty())
            .collect();
        if lines.len() < 4 {
            return Err(CustomerInfoError::MissingLines { found: lines.len() });
        }
        let mut fields = lines.into_iter();
        let mut next = || fields.next().unwrap_or_default();
        let info = Self { name: next(), phone: next(), address: next(), city: next() };
        info.validate().map_err(|e| CustomerInfoError::Invalid(e.to_string()))?;
        Ok(info)
    }
}

#[derive(Debug, Clone, Error)]
pub enum CustomerInfoError {
    #[error("expected 4 lines, found {found}")]
    MissingLines { found: usize },
    #[error("invalid customer info: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qty(n: u32) -> Quantity { Quantity::new(n).unwrap() }

    #[test]
    fn test_price_tiers() {
        assert_eq!(price_for(qty(1)).amount(), Decimal::from(449));
        assert_eq!(price_for(qty(2)).amount(), Decimal::from(798));
        assert_eq!(price_for(qty(3)).amount(), Decimal::from(1197));
        assert_eq!(price_for(qty(4)).amount(), Decimal::from(1596));
        assert_eq!(price_for(qty(5)).amount(), Decimal::from(1995));
        assert_eq!(price_for(qty(5)).currency(), "TRY");
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::lira(Decimal::from(798)).to_string(), "798 TL");
    }

    #[test]
    fn test_quantity_rejects_zero() {
        assert!(Quantity::new(0).is_err());
        assert!(serde_json::from_str::<Quantity>("0").is_err());
        assert_eq!(serde_json::from_str::<Quantity>("3").unwrap().value(), 3);
    }

    #[test]
    fn test_quantity_upper_bound() {
        assert_eq!(qty(MAX_QUANTITY).value(), 1000);
        assert!(matches!(Quantity::new(MAX_QUANTITY + 1), Err(QuantityError::TooLarge { max: 1000 })));
        assert!(serde_json::from_str::<Quantity>("4000000000").is_err());
        assert_eq!(price_for(qty(MAX_QUANTITY)).amount(), Decimal::from(399_000));
    }

    #[test]
    fn test_customer_id_trims() {
        assert_eq!(CustomerId::new("  whatsapp:+905551234567 ").unwrap().as_str(), "whatsapp:+905551234567");
        assert!(CustomerId::new("   ").is_err());
    }

    #[test]
    fn test_customer_info_from_message() {
        let info = CustomerInfo::from_message("Ahmet Yılmaz\n05551234567\nAtatürk Mah. No:5\nİstanbul/Kadıköy").unwrap();
        assert_eq!(info.name, "Ahmet Yılmaz");
        assert_eq!(info.phone, "05551234567");
        assert_eq!(info.address, "Atatürk Mah. No:5");
        assert_eq!(info.city, "İstanbul/Kadıköy");
    }

    #[test]
    fn test_customer_info_skips_blank_lines() {
        let info = CustomerInfo::from_message("  Ayşe Kaya \r\n\r\n0555 000 00 00\nCumhuriyet Cad. 12\n\nAnkara/Çankaya\nextra").unwrap();
        assert_eq!(info.name, "Ayşe Kaya");
        assert_eq!(info.city, "Ankara/Çankaya");
    }

    #[test]
    fn test_customer_info_requires_four_lines() {
        let err = CustomerInfo::from_message("Ahmet\n0555\n\n  \nİstanbul").unwrap_err();
        assert!(matches!(err, CustomerInfoError::MissingLines { found: 3 }));
    }

    #[test]
    fn test_customer_info_drops_control_characters() {
        let info = CustomerInfo::from_message("Ahmet\u{1}\n0555\u{0}\nAdres\u{1b}\n\u{7}\nİzmir").unwrap();
        assert_eq!(info.name, "Ahmet");
        assert_eq!(info.phone, "0555");
        assert_eq!(info.address, "Adres");
        assert_eq!(info.city, "İzmir");
    }

    #[test]
    fn test_order_reference_format() {
        for _ in 0..50 {
            let r = OrderReference::generate();
            assert_eq!(r.number.len(), 10);
            assert!(r.number.starts_with("OX"));
            assert!(r.number[2..].chars().all(|c| c.is_ascii_digit()));
        }
        assert_ne!(OrderReference::generate().id, OrderReference::generate().id);
    }

    #[test]
    fn test_customer_info_rejects_oversized_field() {
        let long = "x".repeat(41);
        let msg = format!("Ahmet\n{long}\nAdres\nİstanbul");
        assert!(matches!(CustomerInfo::from_message(&msg), Err(CustomerInfoError::Invalid(_))));
    }
}
