//! # Event Bus
//!
//! A small, type-safe broadcast bus used to decouple feature slices: the lead intake
//! publishes `LeadSubmitted` and the notifier consumes it on its own task, so HTTP
//! responses never wait on outbound notifications.
//!
//! Events are keyed by their Rust type. Every subscriber gets its own copy (`Arc<T>`).
//!
//! # Example
//!
//! ```rust
//! use abect_event_bus::{EventBus, EventReceiverExt, EventBusError};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct LeadSubmitted { id: String }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), EventBusError> {
//!     let bus = EventBus::new();
//!
//!     let mut rx = bus.subscribe::<LeadSubmitted>()?;
//!     bus.publish(LeadSubmitted { id: "abc".into() })?;
//!
//!     let event = rx.next_event().await.unwrap();
//!     assert_eq!(event.id, "abc");
//!     Ok(())
//! }
//! ```

mod bus;
mod error;
mod receiver;

pub use bus::{Event, EventBus};
pub use error::{EventBusError, EventBusErrorExt};
pub use receiver::EventReceiverExt;
