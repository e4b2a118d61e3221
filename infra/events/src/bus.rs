use crate::error::EventBusError;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{trace, warn};

/// A safe default for channel buffers.
/// 128 is plenty for domain notifications at conference scale.
const DEFAULT_CAPACITY: usize = 128;
const MIN_CAPACITY: usize = 1;

/// Marker trait for types that can be sent across the [`EventBus`].
///
/// Any type that is `Send + Sync + 'static` automatically implements this trait.
pub trait Event: Any + Send + Sync + 'static {}
impl<T: Any + Send + Sync + 'static> Event for T {}

#[derive(Debug)]
struct ChannelState {
    sender: Box<dyn Any + Send + Sync>,
}

impl ChannelState {
    fn handle<T: Event>(&self) -> Result<broadcast::Sender<Arc<T>>, EventBusError> {
        let sender = self.sender.downcast_ref::<broadcast::Sender<Arc<T>>>().ok_or_else(|| {
            EventBusError::TypeMismatch {
                message: std::any::type_name::<T>().into(),
                context: Some("Unexpected event type".into()),
            }
        })?;
        Ok(sender.clone())
    }
}

/// A thread-safe broadcast bus for in-process domain events.
///
/// Channels are created lazily on first subscription and indexed by the
/// [`TypeId`] of the event, so each event type gets its own channel.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    channels: Arc<RwLock<FxHashMap<TypeId, ChannelState>>>,
}

impl EventBus {
    /// Creates a new, empty `EventBus`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to an event of type `T` with the default buffer capacity.
    ///
    /// # Errors
    /// Returns [`EventBusError::TypeMismatch`] if the registered channel holds
    /// a sender of a different concrete type.
    ///
    /// # Examples
    /// ```rust
    /// use cmt_event_bus::{EventBus, EventReceiverExt};
    ///
    /// #[derive(Clone, Debug, PartialEq)]
    /// struct SubmissionReceived(u64);
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), cmt_event_bus::EventBusError> {
    /// let bus = EventBus::new();
    /// let mut rx = bus.subscribe::<SubmissionReceived>()?;
    /// bus.publish(SubmissionReceived(1))?;
    /// assert_eq!(rx.recv().await.unwrap().0, 1);
    /// # Ok(())
    /// # }
    /// ```
    pub fn subscribe<T: Event>(&self) -> Result<broadcast::Receiver<Arc<T>>, EventBusError> {
        self.subscribe_with_capacity::<T>(DEFAULT_CAPACITY)
    }

    /// Subscribes to an event of type `T` with a specific buffer capacity.
    ///
    /// The capacity only applies when this call creates the channel; later
    /// subscribers attach to the existing channel and inherit its capacity.
    ///
    /// # Errors
    /// Returns [`EventBusError::InvalidCapacity`] if `capacity` is zero.
    pub fn subscribe_with_capacity<T: Event>(
        &self,
        capacity: usize,
    ) -> Result<broadcast::Receiver<Arc<T>>, EventBusError> {
        validate_capacity(capacity)?;
        let sender = self.get_or_create::<T>(capacity)?;
        Ok(sender.subscribe())
    }

    /// Publishes an event, cloning it into an [`Arc`] for delivery.
    ///
    /// Events published before any subscriber exists are dropped with a
    /// warning rather than treated as a failure.
    ///
    /// # Errors
    /// Returns [`EventBusError::TypeMismatch`] if the registered channel holds
    /// a sender of a different concrete type.
    pub fn publish<T: Event>(&self, event: T) -> Result<usize, EventBusError> {
        self.publish_arc(Arc::new(event))
    }

    /// Publishes an already-shared event without an extra allocation.
    ///
    /// # Errors
    /// Returns [`EventBusError::TypeMismatch`] if the registered channel holds
    /// a sender of a different concrete type.
    pub fn publish_arc<T: Event>(&self, event: Arc<T>) -> Result<usize, EventBusError> {
        let type_id = TypeId::of::<T>();
        let sender = {
            let channels = self.channels.read();
            match channels.get(&type_id) {
                Some(state) => state.handle::<T>()?,
                None => {
                    warn!(event = std::any::type_name::<T>(), "event dropped: no subscribers");
                    return Ok(0);
                },
            }
        };

        match sender.send(event) {
            Ok(receivers) => {
                trace!(event = std::any::type_name::<T>(), receivers, "event published");
                Ok(receivers)
            },
            Err(_) => {
                // All receivers dropped since the channel was created.
                warn!(event = std::any::type_name::<T>(), "event dropped: all receivers gone");
                Ok(0)
            },
        }
    }

    /// Returns `true` if a channel is registered for event type `T`.
    #[must_use]
    pub fn has_channel<T: Event>(&self) -> bool {
        self.channels.read().contains_key(&TypeId::of::<T>())
    }

    /// Drops every channel, closing all outstanding receivers.
    ///
    /// Returns the number of channels that were closed.
    pub fn shutdown(&self) -> usize {
        let mut channels = self.channels.write();
        let closed = channels.len();
        channels.clear();
        trace!(closed, "event bus shut down");
        closed
    }

    fn get_or_create<T: Event>(
        &self,
        capacity: usize,
    ) -> Result<broadcast::Sender<Arc<T>>, EventBusError> {
        let type_id = TypeId::of::<T>();

        if let Some(state) = self.channels.read().get(&type_id) {
            return state.handle::<T>();
        }

        let mut channels = self.channels.write();
        // Another subscriber may have raced us between the locks.
        if let Some(state) = channels.get(&type_id) {
            return state.handle::<T>();
        }

        let (sender, _) = broadcast::channel::<Arc<T>>(capacity);
        channels.insert(type_id, ChannelState { sender: Box::new(sender.clone()) });
        trace!(event = std::any::type_name::<T>(), capacity, "event channel created");
        Ok(sender)
    }
}

fn validate_capacity(capacity: usize) -> Result<(), EventBusError> {
    if capacity < MIN_CAPACITY {
        return Err(EventBusError::InvalidCapacity {
            message: format!("capacity must be at least {MIN_CAPACITY}, got {capacity}").into(),
            context: None,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq)]
    struct Ping(u32);

    #[test]
    fn test_zero_capacity_rejected() {
        let bus = EventBus::new();
        assert!(matches!(
            bus.subscribe_with_capacity::<Ping>(0),
            Err(EventBusError::InvalidCapacity { .. })
        ));
    }

    #[test]
    fn test_publish_without_subscribers_is_noop() {
        let bus = EventBus::new();
        assert_eq!(bus.publish(Ping(1)).unwrap(), 0);
        assert!(!bus.has_channel::<Ping>());
    }

    #[test]
    fn test_channel_registered_after_subscribe() {
        let bus = EventBus::new();
        let _rx = bus.subscribe::<Ping>().unwrap();
        assert!(bus.has_channel::<Ping>());
    }
}
