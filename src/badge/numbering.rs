//! Sequential badge numbers
//!
//! The allocator is the only writer of new sequence values in the process.
//! It is seeded lazily from the highest number already stored and then
//! counts forward in memory. Other processes may move past it; callers
//! claim each number in the database and `reset` on a lost claim. A
//! generation that fails after allocating leaves a gap.

use std::future::Future;

use tokio::sync::Mutex;

use crate::{error::AppResult, models::BadgeNumber};

pub struct BadgeNumberAllocator {
    prefix: String,
    last: Mutex<Option<u32>>,
}

impl BadgeNumberAllocator {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            last: Mutex::new(None),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Hand out the next number.
    ///
    /// `load_last` is only awaited on first use, while the lock is held, and
    /// returns the highest stored sequence for this prefix (if any).
    pub async fn next<F, Fut>(&self, load_last: F) -> AppResult<BadgeNumber>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<Option<u32>>>,
    {
        let mut last = self.last.lock().await;
        let current = match *last {
            Some(n) => n,
            None => load_last().await?.unwrap_or(0),
        };
        let next = current + 1;
        *last = Some(next);

        let number = BadgeNumber::new(&self.prefix, next);
        tracing::debug!(badge_number = %number, "Allocated badge number");
        Ok(number)
    }

    /// Drop the in-memory counter so the next call reseeds from storage
    pub async fn reset(&self) {
        *self.last.lock().await = None;
    }
}
