//! Test doubles shared by the decorator tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use dynamap_core::mapping::{AccessorTable, Entity};
use dynamap_core::storage::{Repository, Result};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Fixture {
    pub id: u32,
}

impl Entity for Fixture {
    const NAME: &'static str = "Fixture";

    fn accessors() -> AccessorTable<Self> {
        AccessorTable::new()
    }
}

/// Sleeps `delay` before answering; only `create` and `find_by_id` are
/// implemented.
pub struct SlowRepository {
    delay: Duration,
    calls: AtomicUsize,
    writes: AtomicUsize,
}

impl SlowRepository {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            calls: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Repository<Fixture, u32> for SlowRepository {
    async fn create(&self, _entity: &Fixture) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn find_by_id(&self, id: u32) -> Result<Option<Fixture>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        Ok(Some(Fixture { id }))
    }
}
