//! Conversation Session Engine
//!
//! Drives one customer's WhatsApp conversation from the main menu through
//! quantity selection, delivery details and confirmation. Every inbound
//! message yields exactly one reply.
//!
//! Messages from the same customer are handled one at a time, under the
//! session store's lease; different customers proceed in parallel. A
//! confirmed order is saved before the session is removed, and a failed save
//! leaves the customer in `CONFIRMING` so that answering "evet" again retries
//! it under the same order reference.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::domain::aggregates::{ConversationSession, Order, SessionRecord, SessionState};
use crate::domain::value_objects::{CustomerId, CustomerInfo, OrderReference, Quantity};
use crate::notify::AdminNotifier;
use crate::store::{OrderRepository, SessionStore};
use crate::{IntakeError, Result};

pub mod input;
pub mod templates;
pub mod transition;

use templates::{Reply, Storefront};
use transition::{transition, Transition};

/// A text message received from the gateway.
#[derive(Clone, Debug)]
pub struct InboundMessage {
    pub customer_id: CustomerId,
    pub body: String,
    /// Display name; logged, never used to decide anything.
    pub profile_name: Option<String>,
}

/// The reply to send back and the state the customer is left in.
#[derive(Clone, Debug)]
pub struct Outcome {
    pub reply: Reply,
    pub text: String,
    pub state: SessionState,
}

#[derive(Clone, Debug)]
pub struct EngineSettings {
    /// Upper bound on saving an order and on notifying staff about it.
    pub persist_timeout: Duration,
    /// Sessions untouched for longer than this start over at `NEW`.
    pub idle_timeout: chrono::Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self { persist_timeout: Duration::from_secs(5), idle_timeout: chrono::Duration::hours(24) }
    }
}

pub struct ConversationEngine {
    sessions: Arc<dyn SessionStore>,
    orders: Arc<dyn OrderRepository>,
    notifier: Arc<dyn AdminNotifier>,
    storefront: Storefront,
    settings: EngineSettings,
}

impl ConversationEngine {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        orders: Arc<dyn OrderRepository>,
        notifier: Arc<dyn AdminNotifier>,
    ) -> Self {
        Self {
            sessions,
            orders,
            notifier,
            storefront: Storefront::default(),
            settings: EngineSettings::default(),
        }
    }

    pub fn with_storefront(mut self, storefront: Storefront) -> Self {
        self.storefront = storefront;
        self
    }

    pub fn with_settings(mut self, settings: EngineSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Handles one inbound message and returns the reply to send.
    ///
    /// Errors come only from the session store; any text input produces a reply.
    pub async fn handle(&self, message: InboundMessage) -> Result<Outcome> {
        let customer = &message.customer_id;
        let lease = self.sessions.lease(customer).await?;

        if let Some(name) = &message.profile_name {
            debug!(customer = %customer, profile_name = %name, "inbound message");
        }

        let current = self.load(customer).await?;
        let (outcome, placed) = match transition(&current, &message.body) {
            Transition::Reply { next, reply } => {
                self.save(customer, &current, &next).await?;
                (self.outcome(reply, next.state()), None)
            }
            Transition::PlaceOrder { reference, quantity, customer: info } => {
                self.place_order(customer, &current, reference, quantity, info).await?
            }
        };
        drop(lease);

        info!(customer = %customer, from = %current.state(), to = %outcome.state, "conversation step");

        if let Some(order) = placed {
            self.notify(&order).await;
        }
        Ok(outcome)
    }

    async fn load(&self, customer: &CustomerId) -> Result<ConversationSession> {
        match self.sessions.get(customer).await? {
            Some(record) if record.is_idle(Utc::now(), self.settings.idle_timeout) => {
                info!(customer = %customer, state = %record.session.state(), "idle session expired");
                self.sessions.delete(customer).await?;
                Ok(ConversationSession::New)
            }
            Some(record) => Ok(record.session),
            None => Ok(ConversationSession::New),
        }
    }

    async fn save(&self, customer: &CustomerId, current: &ConversationSession, next: &ConversationSession) -> Result<()> {
        if next.is_retained() {
            self.sessions.set(customer, &SessionRecord::new(next.clone())).await
        } else if current.is_retained() {
            self.sessions.delete(customer).await
        } else {
            Ok(())
        }
    }

    async fn place_order(
        &self,
        customer: &CustomerId,
        current: &ConversationSession,
        reference: OrderReference,
        quantity: Quantity,
        info: CustomerInfo,
    ) -> Result<(Outcome, Option<Order>)> {
        let order = Order::place(reference, customer.clone(), quantity, info);
        let timeout = self.settings.persist_timeout;
        let saved = tokio::time::timeout(timeout, self.orders.create(&order))
            .await
            .unwrap_or_else(|_| Err(IntakeError::Timeout(timeout)));

        if let Err(e) = saved {
            error!(customer = %customer, order_number = %order.order_number(), error = %e, "failed to save order");
            self.sessions.set(customer, &SessionRecord::new(current.clone())).await?;
            return Ok((self.outcome(Reply::OrderFailed, SessionState::Confirming), None));
        }

        info!(
            customer = %customer,
            order_number = %order.order_number(),
            quantity = quantity.value(),
            total = %order.total(),
            "order placed"
        );
        // Order already saved; report success even if cleanup fails.
        if let Err(e) = self.sessions.delete(customer).await {
            error!(customer = %customer, error = %e, "failed to remove session after order");
        }

        let reply = Reply::OrderConfirmed { order_number: order.order_number().to_string() };
        Ok((self.outcome(reply, SessionState::New), Some(order)))
    }

    async fn notify(&self, order: &Order) {
        let timeout = self.settings.persist_timeout;
        match tokio::time::timeout(timeout, self.notifier.order_placed(order)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!(order_number = %order.order_number(), error = %e, "admin notification failed"),
            Err(_) => warn!(order_number = %order.order_number(), ?timeout, "admin notification timed out"),
        }
    }

    fn outcome(&self, reply: Reply, state: SessionState) -> Outcome {
        let text = reply.render(&self.storefront);
        Outcome { reply, text, state }
    }
}
