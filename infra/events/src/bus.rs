use crate::error::EventBusError;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{trace, warn};

/// Buffer size for channels created implicitly by `publish`/`subscribe`.
const DEFAULT_CAPACITY: usize = 64;

/// Marker trait for types that can be sent across the [`EventBus`].
///
/// Any type that is `Send + Sync + 'static` automatically implements this trait.
pub trait Event: Any + Send + Sync + 'static {}
impl<T: Any + Send + Sync + 'static> Event for T {}

#[derive(Debug)]
struct Channel {
    capacity: usize,
    sender: Box<dyn Any + Send + Sync>,
}

/// A thread-safe broadcast bus, one channel per event type.
///
/// Cloning is cheap; all clones share the same channel registry.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    channels: Arc<RwLock<FxHashMap<TypeId, Channel>>>,
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to events of type `T` with the default buffer.
    ///
    /// # Errors
    /// Returns [`EventBusError::TypeMismatch`] if the registry is corrupted.
    pub fn subscribe<T: Event>(&self) -> Result<broadcast::Receiver<Arc<T>>, EventBusError> {
        self.subscribe_with_capacity::<T>(DEFAULT_CAPACITY)
    }

    /// Subscribes with an explicit buffer size. The capacity only applies when this call
    /// creates the channel; later calls reuse the existing buffer.
    ///
    /// # Errors
    /// Returns [`EventBusError::InvalidCapacity`] if `capacity` is zero.
    pub fn subscribe_with_capacity<T: Event>(
        &self,
        capacity: usize,
    ) -> Result<broadcast::Receiver<Arc<T>>, EventBusError> {
        if capacity == 0 {
            return Err(EventBusError::InvalidCapacity {
                message: "capacity must be greater than zero".into(),
                context: Some(std::any::type_name::<T>().into()),
            });
        }
        Ok(self.sender::<T>(capacity)?.subscribe())
    }

    /// Publishes an event to every current subscriber.
    ///
    /// Returns the number of receivers the event reached. Publishing with no subscribers is
    /// not an error; the event is dropped and `0` is returned.
    ///
    /// # Errors
    /// Returns [`EventBusError::TypeMismatch`] if the registry is corrupted.
    pub fn publish<T: Event>(&self, event: T) -> Result<usize, EventBusError> {
        let sender = self.sender::<T>(DEFAULT_CAPACITY)?;
        match sender.send(Arc::new(event)) {
            Ok(reached) => Ok(reached),
            Err(_) => {
                trace!(event = std::any::type_name::<T>(), "Event dropped, no subscribers");
                Ok(0)
            },
        }
    }

    /// Drops every channel; pending receivers observe `Closed`.
    ///
    /// Returns how many channels were closed.
    #[must_use]
    pub fn shutdown(&self) -> usize {
        let mut channels = self.channels.write();
        let count = channels.len();
        channels.clear();
        count
    }

    fn sender<T: Event>(
        &self,
        capacity: usize,
    ) -> Result<broadcast::Sender<Arc<T>>, EventBusError> {
        let id = TypeId::of::<T>();

        if let Some(channel) = self.channels.read().get(&id) {
            if channel.capacity != capacity && capacity != DEFAULT_CAPACITY {
                warn!(
                    event = std::any::type_name::<T>(),
                    existing_capacity = channel.capacity,
                    requested_capacity = capacity,
                    "Channel already initialized with a different capacity"
                );
            }
            return downcast::<T>(channel);
        }

        let mut channels = self.channels.write();
        let channel = channels.entry(id).or_insert_with(|| {
            trace!(event = std::any::type_name::<T>(), capacity, "Initializing event channel");
            let (tx, _) = broadcast::channel::<Arc<T>>(capacity);
            Channel { capacity, sender: Box::new(tx) }
        });
        downcast::<T>(channel)
    }
}

fn downcast<T: Event>(channel: &Channel) -> Result<broadcast::Sender<Arc<T>>, EventBusError> {
    channel.sender.downcast_ref::<broadcast::Sender<Arc<T>>>().cloned().ok_or_else(|| {
        EventBusError::TypeMismatch {
            message: std::any::type_name::<T>().into(),
            context: Some("Unexpected sender type in registry".into()),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Ping(u32);

    #[test]
    fn publish_without_subscribers_reaches_nobody() {
        let bus = EventBus::new();
        assert_eq!(bus.publish(Ping(1)).unwrap(), 0);
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let bus = EventBus::new();
        let err = bus.subscribe_with_capacity::<Ping>(0).unwrap_err();
        assert!(matches!(err, EventBusError::InvalidCapacity { .. }));
    }

    #[test]
    fn shutdown_reports_closed_channels() {
        let bus = EventBus::new();
        let _a = bus.subscribe::<Ping>().unwrap();
        let _b = bus.subscribe::<String>().unwrap();
        assert_eq!(bus.shutdown(), 2);
        assert_eq!(bus.shutdown(), 0);
    }
}
