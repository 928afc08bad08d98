//! Admin notification of placed orders.

use async_trait::async_trait;
use crate::domain::aggregates::Order;
use crate::{IntakeError, Result};

pub const DEFAULT_SUBJECT: &str = "oxiva.orders.placed";

#[async_trait]
pub trait AdminNotifier: Send + Sync {
    async fn order_placed(&self, order: &Order) -> Result<()>;
}

/// Writes placed orders to the log. Used when no NATS server is configured.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl AdminNotifier for LogNotifier {
    async fn order_placed(&self, order: &Order) -> Result<()> {
        tracing::info!(
            order_number = %order.order_number(),
            customer = %order.customer_id(),
            quantity = order.quantity().value(),
            total = %order.total(),
            city = %order.customer().city,
            "📦 New WhatsApp order"
        );
        Ok(())
    }
}

/// Publishes each order event as JSON on a NATS subject for the admin panel.
#[derive(Clone)]
pub struct NatsNotifier {
    client: async_nats::Client,
    subject: String,
}

impl NatsNotifier {
    pub fn new(client: async_nats::Client, subject: impl Into<String>) -> Self {
        Self { client, subject: subject.into() }
    }
}

#[async_trait]
impl AdminNotifier for NatsNotifier {
    async fn order_placed(&self, order: &Order) -> Result<()> {
        for event in order.events() {
            let payload = serde_json::to_vec(event)?;
            self.client
                .publish(self.subject.clone(), payload.into())
                .await
                .map_err(|e| IntakeError::Notification(e.to_string()))?;
        }
        self.client.flush().await.map_err(|e| IntakeError::Notification(e.to_string()))?;
        tracing::debug!(subject = %self.subject, order_number = %order.order_number(), "order event published");
        Ok(())
    }
}
