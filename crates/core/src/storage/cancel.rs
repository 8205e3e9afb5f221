use tokio::sync::watch;

/// Owner side of a cancellation signal.
///
/// Cancelling is one-way and sticky: every signal derived from the handle,
/// including ones created afterwards, observes it.
#[derive(Debug)]
pub struct CancellationHandle {
    tx: watch::Sender<bool>,
}

impl CancellationHandle {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    pub fn signal(&self) -> CancellationSignal {
        CancellationSignal {
            rx: self.tx.subscribe(),
        }
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for CancellationHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Observer side of a cancellation signal, passed alongside a call.
#[derive(Debug, Clone)]
pub struct CancellationSignal {
    rx: watch::Receiver<bool>,
}

impl CancellationSignal {
    /// A signal that is never cancelled.
    pub fn never() -> Self {
        CancellationHandle::new().signal()
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once cancelled. Pends forever if the handle is dropped
    /// without cancelling.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        if rx.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_new_handle_is_not_cancelled() {
        let handle = CancellationHandle::new();
        assert!(!handle.is_cancelled());
        assert!(!handle.signal().is_cancelled());
    }

    #[test]
    fn test_cancel_reaches_existing_and_new_signals() {
        let handle = CancellationHandle::new();
        let before = handle.signal();

        handle.cancel();

        assert!(before.is_cancelled());
        assert!(handle.signal().is_cancelled());
    }

    #[tokio::test]
    async fn test_cancelled_resolves_after_cancel() {
        let handle = CancellationHandle::new();
        let signal = handle.signal();

        let waiter = tokio::spawn(async move { signal.cancelled().await });
        handle.cancel();

        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_never_signal_does_not_resolve() {
        let signal = CancellationSignal::never();

        let result = tokio::time::timeout(Duration::from_millis(20), signal.cancelled()).await;

        assert!(result.is_err());
    }
}
