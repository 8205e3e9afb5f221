//! Cancellable repository decorator.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use dynamap_core::mapping::Entity;
use dynamap_core::storage::{CancellationSignal, Repository, RepositoryError, Result};

/// Races every call on the wrapped repository against a cancellation signal.
///
/// A signal that is already cancelled fails the call before the wrapped
/// repository is touched. Otherwise the call is dropped at its next await
/// point once the signal fires.
pub struct CancellableRepository<R> {
    repository: Arc<R>,
    signal: CancellationSignal,
}

impl<R> CancellableRepository<R> {
    pub fn new(repository: Arc<R>, signal: CancellationSignal) -> Self {
        Self { repository, signal }
    }

    /// The same repository observing a different signal, e.g. one per request.
    pub fn with_signal(&self, signal: CancellationSignal) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            signal,
        }
    }

    async fn run<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = Result<T>> + Send,
    ) -> Result<T> {
        if self.signal.is_cancelled() {
            return Err(RepositoryError::Cancelled { operation });
        }

        tokio::select! {
            biased;
            _ = self.signal.cancelled() => {
                tracing::debug!(operation, "Repository call cancelled");
                Err(RepositoryError::Cancelled { operation })
            }
            result = call => result,
        }
    }
}

#[async_trait]
impl<E, K, R> Repository<E, K> for CancellableRepository<R>
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
