use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::warn;

/// Convenience layer over raw broadcast receivers.
///
/// Long-lived subscriber tasks should not die because they fell behind the
/// buffer; [`next`](EventReceiverExt::next) logs the lag and resumes from the
/// fresh tail instead of surfacing [`RecvError::Lagged`](broadcast::error::RecvError::Lagged).
pub trait EventReceiverExt<T> {
    /// Receives the next event, transparently recovering from lag.
    ///
    /// Returns `None` once the channel is closed.
    fn next(&mut self) -> impl Future<Output = Option<Arc<T>>> + Send;
}

impl<T: Send + Sync + 'static> EventReceiverExt<T> for broadcast::Receiver<Arc<T>> {
    async fn next(&mut self) -> Option<Arc<T>> {
        loop {
            match self.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(event = std::any::type_name::<T>(), skipped, "subscriber lagged");
                },
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
