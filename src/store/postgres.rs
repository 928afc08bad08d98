use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use crate::domain::aggregates::{ConversationSession, Order, SessionRecord};
use crate::domain::value_objects::CustomerId;
use crate::Result;
use super::locks::CustomerLocks;
use super::{OrderRepository, SessionLease, SessionStore};

/// Sessions in `conversation_sessions`. A lease keeps one transaction open on
/// `lock_pool` holding `pg_advisory_xact_lock` for the customer; reads and
/// writes go through `pool`, so they never wait on a connection held by a
/// lease.
pub struct PgSessionStore {
    pool: PgPool,
    lock_pool: PgPool,
    locks: CustomerLocks,
}

impl PgSessionStore {
    pub fn new(pool: PgPool, lock_pool: PgPool) -> Self { Self { pool, lock_pool, locks: CustomerLocks::new() } }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn lease(&self, customer: &CustomerId) -> Result<SessionLease> {
        // Waiters in this process queue locally instead of each taking a lock connection.
        let local = self.locks.acquire(customer).await;
        let mut tx = self.lock_pool.begin().await?;
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(customer.as_str())
            .execute(&mut *tx)
            .await?;
        // Dropping the transaction rolls it back, which releases the lock.
        Ok(SessionLease::new((local, tx)))
    }

    async fn get(&self, customer: &CustomerId) -> Result<Option<SessionRecord>> {
        let row = sqlx::query_as::<_, (Json<ConversationSession>, DateTime<Utc>)>(
            "SELECT session, updated_at FROM conversation_sessions WHERE customer_id = $1",
        )
        .bind(customer.as_str())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|(Json(session), updated_at)| SessionRecord { session, updated_at }))
    }

    async fn set(&self, customer: &CustomerId, record: &SessionRecord) -> Result<()> {
        sqlx::query(
            "INSERT INTO conversation_sessions (customer_id, state, session, updated_at) VALUES ($1, $2, $3, $4) \
             ON CONFLICT (customer_id) DO UPDATE SET state = EXCLUDED.state, session = EXCLUDED.session, updated_at = EXCLUDED.updated_at",
        )
        .bind(customer.as_str())
        .bind(record.session.state().as_str())
        .bind(Json(&record.session))
        .bind(record.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, customer: &CustomerId) -> Result<()> {
        sqlx::query("DELETE FROM conversation_sessions WHERE customer_id = $1")
            .bind(customer.as_str())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct PgOrderRepository { pool: PgPool }

impl PgOrderRepository {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn create(&self, order: &Order) -> Result<()> {
        let customer = order.customer();
        sqlx::query(
            "INSERT INTO whatsapp_orders (id, order_number, customer_id, quantity, total, currency, customer_name, customer_phone, address, city, status, placed_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 'pending', $11) \
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(order.id())
        .bind(order.order_number())
        .bind(order.customer_id().as_str())
        .bind(i64::from(order.quantity().value()))
        .bind(order.total().amount())
        .bind(order.total().currency())
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&customer.address)
        .bind(&customer.city)
        .bind(order.placed_at())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
