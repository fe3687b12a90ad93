pub use crate::safe_nanoid;
#[cfg(feature = "server")]
pub use crate::server::{ApiState, ApiStateError};
pub use abect_domain::config::AppConfig;
pub use abect_event_bus::EventBus;
