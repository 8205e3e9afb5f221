//! Timeout repository decorator.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use dynamap_core::mapping::Entity;
use dynamap_core::storage::{Repository, RepositoryError, Result};

/// Fails any call on the wrapped repository that runs longer than `timeout`.
///
/// An expired call is dropped at its next await point. Whether a write that
/// was already sent to the store took effect is up to the store.
pub struct TimeoutRepository<R> {
    repository: Arc<R>,
    timeout: Duration,
}

impl<R> TimeoutRepository<R> {
    pub fn new(repository: Arc<R>, timeout: Duration) -> Self {
        Self {
            repository,
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn run<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = Result<T>> + Send,
    ) -> Result<T> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    operation,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Repository call timed out"
                );
                Err(RepositoryError::Timeout {
                    operation,
                    elapsed: self.timeout,
                })
            }
        }
    }
}

#[async_trait]
impl<E, K, R> Repository<E, K> for TimeoutRepository<R>
where
    E: Entity,
    K: Send + 'static,
    R: Repository<E, K> + 'static,
{
    async fn create(&self, entity: &E) -> Result<()> {
        self.run("create", self.repository.create(entity)).await
    }

    async fn find_by_id(&self, id: K) -> Result<Option<E>> {
        self.run("find_by_id", self.repository.find_by_id(id)).await
    }

    async fn save(&self, entity: &E) -> Result<E> {
        self.run("save", self.repository.save(entity)).await
    }

    async fn delete(&self, id: K) -> Result<Option<E>> {
        self.run("delete", self.repository.delete(id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::testing::{Fixture, SlowRepository};

    #[tokio::test]
    async fn test_fast_call_passes_through() {
        let repo = TimeoutRepository::new(
            Arc::new(SlowRepository::new(Duration::ZERO)),
            Duration::from_secs(5),
        );

        let found = repo.find_by_id(7).await.unwrap();

        assert_eq!(found, Some(Fixture { id: 7 }));
    }

    #[tokio::test]
    async fn test_slow_call_times_out() {
        let repo = TimeoutRepository::new(
            Arc::new(SlowRepository::new(Duration::from_secs(5))),
            Duration::from_millis(20),
        );

        let result = repo.find_by_id(7).await;

        assert_eq!(
            result,
            Err(RepositoryError::Timeout {
                operation: "find_by_id",
                elapsed: Duration::from_millis(20),
            })
        );
    }

    #[tokio::test]
    async fn test_timed_out_write_is_not_applied() {
        let inner = Arc::new(SlowRepository::new(Duration::from_secs(5)));
        let repo = TimeoutRepository::new(inner.clone(), Duration::from_millis(20));

        let result = repo.create(&Fixture { id: 1 }).await;

        assert!(matches!(result, Err(RepositoryError::Timeout { .. })));
        assert_eq!(inner.writes(), 0);
    }

    #[tokio::test]
    async fn test_default_operations_still_not_implemented() {
        let repo = TimeoutRepository::new(
            Arc::new(SlowRepository::new(Duration::ZERO)),
            Duration::from_secs(5),
        );

        let result = repo.save(&Fixture { id: 1 }).await;

        assert!(matches!(
            result,
            Err(RepositoryError::NotImplemented { operation: "save", .. })
        ));
    }
}
