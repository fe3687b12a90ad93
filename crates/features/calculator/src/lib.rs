//! Pricing calculator feature slice.
//!
//! A six-step wizard ([`Calculator`]) over an immutable [`Catalog`]. Every transition
//! recomputes the [`Estimate`] through the pure [`estimate`] function, and the session can be
//! mirrored into a [`SelectionStore`] and replayed from it.
//!
//! ```rust
//! use abect_calculator::{Calculator, Catalog};
//! use abect_domain::calculator::Platform;
//! use std::sync::Arc;
//!
//! let mut calc = Calculator::new(Arc::new(Catalog::fallback().unwrap()));
//! calc.set_project_type("landing").unwrap();
//! calc.set_platform(Platform::Standard);
//! calc.set_urgency("urgent").unwrap();
//! assert_eq!(calc.estimate().price, 24_000);
//! ```

mod catalog;
mod engine;
mod error;
mod persistence;
mod selection;
#[cfg(feature = "server")]
mod server;
mod session;

pub use catalog::Catalog;
pub use engine::{ALTERNATE_BASE_RATIO, Estimate, estimate};
pub use error::{CalculatorError, CalculatorErrorExt};
pub use persistence::{MemoryStore, NoopStore, SelectionSnapshot, SelectionStore};
pub use selection::{Contact, Selection, Step};
#[cfg(feature = "server")]
pub use server::{EstimateResponse, router};
pub use session::Calculator;

use std::sync::Arc;

/// Calculator feature state
#[abect_derive::abect_slice]
pub struct Pricing {
    pub catalog: Arc<Catalog>,
}

/// Initialize the calculator feature.
///
/// Loads the catalog from `source.config_path`. A missing or unusable document is logged and
/// replaced by the built-in catalog so the calculator stays available.
///
/// # Errors
/// Only if the built-in catalog itself is invalid.
#[cfg(feature = "server")]
pub fn init(
    source: &abect_domain::config::CalculatorSource,
) -> Result<abect_kernel::domain::registry::InitializedSlice, CalculatorError> {
    let catalog = match source.config_path.as_deref() {
        Some(path) => Catalog::from_file(path).or_else(|e| {
            tracing::error!(error = %e, "Calculator config unusable, using built-in catalog");
            Catalog::fallback()
        })?,
        None => Catalog::fallback()?,
    };

    tracing::info!(
        project_types = catalog.config().project_types.len(),
        currency = %catalog.settings().currency_code,
        "Calculator server slice initialized"
    );

    let slice = Pricing::new(PricingInner { catalog: Arc::new(catalog) });
    Ok(abect_kernel::domain::registry::InitializedSlice::new(slice))
}
