use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use crate::domain::aggregates::{Order, SessionRecord};
use crate::domain::value_objects::CustomerId;
use crate::Result;
use super::locks::CustomerLocks;
use super::{OrderRepository, SessionLease, SessionStore};

#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<CustomerId, SessionRecord>>,
    locks: CustomerLocks,
}

impl InMemorySessionStore {
    pub fn new() -> Self { Self::default() }
    pub async fn len(&self) -> usize { self.sessions.read().await.len() }
    pub async fn is_empty(&self) -> bool { self.sessions.read().await.is_empty() }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn lease(&self, customer: &CustomerId) -> Result<SessionLease> {
        Ok(SessionLease::new(self.locks.acquire(customer).await))
    }

    async fn get(&self, customer: &CustomerId) -> Result<Option<SessionRecord>> {
        Ok(self.sessions.read().await.get(customer).cloned())
    }

    async fn set(&self, customer: &CustomerId, record: &SessionRecord) -> Result<()> {
        self.sessions.write().await.insert(customer.clone(), record.clone());
        Ok(())
    }

    async fn delete(&self, customer: &CustomerId) -> Result<()> {
        self.sessions.write().await.remove(customer);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryOrderRepository {
    orders: RwLock<Vec<Order>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self { Self::default() }
    pub async fn all(&self) -> Vec<Order> { self.orders.read().await.clone() }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn create(&self, order: &Order) -> Result<()> {
        let mut orders = self.orders.write().await;
        if !orders.iter().any(|o| o.id() == order.id()) {
            orders.push(order.clone());
        }
        Ok(())
    }
}
