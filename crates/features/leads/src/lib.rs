//! Lead intake feature slice.
//!
//! [`LeadService`] validates a [`LeadRequest`], writes it to the [`LeadStore`] and publishes
//! [`LeadSubmitted`]. The [`TelegramNotifier`] picks the event up on its own task.

mod error;
mod model;
mod record;
#[cfg(feature = "server")]
mod server;
mod service;
mod store;
mod telegram;

pub use error::{LeadError, LeadErrorExt};
pub use model::{
    CalculatorData, CalculatorLead, ContactInfo, Lead, LeadRequest, Utm, is_valid_contact,
    is_valid_name,
};
pub use record::{LeadReceipt, LeadRecord, LeadStatus};
#[cfg(feature = "server")]
pub use server::{LeadAccepted, router};
pub use service::{LeadService, LeadSubmitted, SubmissionAdapter, submit_session};
pub use store::LeadStore;
pub use telegram::{
    TelegramNotifier, escape_markdown, format_calculator_message, format_message, format_price,
    format_simple_message, spawn_notifier,
};

/// Leads feature state
#[abect_derive::abect_slice]
pub struct Leads {
    pub service: LeadService,
}

/// Initialize the leads feature: opens the store below `storage.data_dir` and starts the
/// notifier task. Must run inside a tokio runtime.
///
/// # Errors
/// If the store cannot be opened, the HTTP client cannot be built, or the notifier cannot
/// subscribe.
#[cfg(feature = "server")]
pub async fn init(
    config: &abect_domain::config::AppConfig,
    events: &abect_event_bus::EventBus,
) -> Result<abect_kernel::domain::registry::InitializedSlice, LeadError> {
    let store = LeadStore::open(&config.storage.data_dir).await?;
    let notifier = TelegramNotifier::new(&config.telegram).context("Building Telegram client")?;
    spawn_notifier(events, notifier)?;

    tracing::info!(
        notifications = config.telegram.is_configured(),
        "Leads server slice initialized"
    );

    let slice = Leads::new(LeadsInner { service: LeadService::new(store, events.clone()) });
    Ok(abect_kernel::domain::registry::InitializedSlice::new(slice))
}
