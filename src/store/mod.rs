//! Persistence ports for conversation sessions and placed orders.
//!
//! `memory` backs both with process-local maps (tests, single-instance
//! deployments without a database); `postgres` is used when `DATABASE_URL`
//! is configured so that several instances share conversation state.
//!
//! A session is only read and written while its customer's [`SessionLease`]
//! is held. The in-memory store leases through a process-local mutex; the
//! Postgres store adds a transaction-scoped advisory lock, so instances
//! sharing one database also handle a customer's messages one at a time.

use async_trait::async_trait;
use crate::domain::aggregates::{Order, SessionRecord};
use crate::domain::value_objects::CustomerId;
use crate::Result;

mod locks;
pub mod memory;
pub mod postgres;

pub use memory::{InMemoryOrderRepository, InMemorySessionStore};
pub use postgres::{PgOrderRepository, PgSessionStore};

/// Exclusive hold on one customer's session, released on drop.
pub struct SessionLease {
    _held: Box<dyn Send>,
}

impl SessionLease {
    pub fn new(held: impl Send + 'static) -> Self { Self { _held: Box::new(held) } }
}

/// Session storage keyed by customer id. Only sessions past `NEW` are stored.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Waits until no other holder, in this process or any other sharing the
    /// store, has a lease on `customer`.
    async fn lease(&self, customer: &CustomerId) -> Result<SessionLease>;

    async fn get(&self, customer: &CustomerId) -> Result<Option<SessionRecord>>;

    async fn set(&self, customer: &CustomerId, record: &SessionRecord) -> Result<()>;

    /// Removing a missing session is not an error.
    async fn delete(&self, customer: &CustomerId) -> Result<()>;
}

/// Durable record of confirmed orders.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Saving an order whose id is already stored succeeds without writing.
    async fn create(&self, order: &Order) -> Result<()>;
}
