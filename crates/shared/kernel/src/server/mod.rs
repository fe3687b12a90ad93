mod health;
pub mod response;
pub mod router;
mod state;

pub use health::HealthResponse;
pub use response::{ErrorBody, error_response};
pub use state::{ApiState, ApiStateBuilder, ApiStateError, ApiStateErrorExt, ApiStateInner};
