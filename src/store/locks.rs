//! Per-customer serialization within one process.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use crate::domain::value_objects::CustomerId;

/// Registry of one async mutex per customer. Entries nobody holds or waits
/// on are dropped on the next acquire.
#[derive(Default)]
pub struct CustomerLocks {
    inner: Mutex<HashMap<CustomerId, Arc<AsyncMutex<()>>>>,
}

impl CustomerLocks {
    pub fn new() -> Self { Self::default() }

    pub async fn acquire(&self, customer: &CustomerId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            map.retain(|_, l| Arc::strong_count(l) > 1);
            Arc::clone(map.entry(customer.clone()).or_default())
        };
        lock.lock_owned().await
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}
