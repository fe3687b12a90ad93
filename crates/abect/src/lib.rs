//! Facade crate for ABECT features and shared modules.
//! Re-exports domain/kernel primitives and aggregates feature initialization.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Add `abect` with the `server` feature.
//! - Call `abect::init` to register feature slices; extend as new slices appear.

pub use abect_domain as domain;
pub use abect_event_bus as events;
pub use abect_kernel as kernel;

#[cfg(feature = "server")]
pub mod server {
    pub mod router {
        pub use abect_kernel::server::router::system_router;
    }
}

/// Feature registry for runtime introspection.
pub mod features {
    pub use abect_calculator as calculator;
    pub use abect_leads as leads;

    /// Build-time enabled features (by Cargo feature).
    pub const ENABLED: &[&str] = &[
        "calculator",
        "leads",
        #[cfg(feature = "server")]
        "server",
    ];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

#[cfg(feature = "server")]
mod error {
    use std::borrow::Cow;

    #[abect_derive::abect_error]
    pub enum InitError {
        #[error("Calculator initialization failed{}: {source}", format_context(.context))]
        Calculator {
            source: abect_calculator::CalculatorError,
            context: Option<Cow<'static, str>>,
        },

        #[error("Leads initialization failed{}: {source}", format_context(.context))]
        Leads { source: abect_leads::LeadError, context: Option<Cow<'static, str>> },
    }
}

#[cfg(feature = "server")]
pub use error::{InitError, InitErrorExt};

/// Initialize all enabled features for server mode.
///
/// # Errors
/// Returns an error if any feature initialization fails.
#[cfg(feature = "server")]
pub async fn init(
    config: &domain::config::AppConfig,
    events: &events::EventBus,
) -> Result<Vec<domain::registry::InitializedSlice>, InitError> {
    let mut slices = Vec::new();

    // Calculator
    slices.push(features::calculator::init(&config.calculator)?);

    // Leads
    slices.push(features::leads::init(config, events).await?);

    Ok(slices)
}

#[cfg(test)]
mod tests {
    #[test]
    fn core_features_are_always_listed() {
        assert!(super::features::is_enabled("calculator"));
        assert!(super::features::is_enabled("leads"));
        assert!(!super::features::is_enabled("licensing"));
    }
}
