use crate::error::LeadError;
use crate::model::{CalculatorLead, Lead, LeadRequest};
use crate::record::{LeadReceipt, LeadRecord};
use crate::store::LeadStore;
use abect_calculator::Calculator;
use abect_event_bus::EventBus;
use std::future::Future;
use tracing::{info, warn};

/// Published after a lead is stored.
#[derive(Debug, Clone)]
pub struct LeadSubmitted {
    pub record: LeadRecord,
}

/// Destination for completed calculator sessions.
pub trait SubmissionAdapter: Send + Sync {
    /// Hands the lead off and reports the stored record.
    fn submit(
        &self,
        lead: &CalculatorLead,
    ) -> impl Future<Output = Result<LeadReceipt, LeadError>> + Send;
}

/// Builds the lead from `calc`, submits it and locks the session on success.
///
/// # Errors
/// [`LeadError::NotReady`] for an incomplete session, or whatever `adapter` reports. The
/// session stays editable on failure.
pub async fn submit_session<A: SubmissionAdapter>(
    adapter: &A,
    calc: &mut Calculator,
    source: Option<String>,
) -> Result<LeadReceipt, LeadError> {
    let lead = CalculatorLead::from_session(calc, source)?;
    let receipt = adapter.submit(&lead).await?;
    calc.mark_submitted();
    Ok(receipt)
}

/// Lead intake: validation, storage and announcement on the event bus.
///
/// Notifications are left to subscribers of [`LeadSubmitted`], so intake never waits on
/// them.
#[derive(Debug, Clone)]
pub struct LeadService {
    store: LeadStore,
    events: EventBus,
}

impl LeadService {
    #[must_use]
    pub const fn new(store: LeadStore, events: EventBus) -> Self {
        Self { store, events }
    }

    #[must_use]
    pub const fn store(&self) -> &LeadStore {
        &self.store
    }

    /// Validates and accepts a raw request.
    ///
    /// # Errors
    /// [`LeadError::Validation`] for rejected input, storage errors otherwise.
    pub async fn submit_request(&self, request: LeadRequest) -> Result<LeadReceipt, LeadError> {
        let lead = request.validate()?;
        self.accept(lead).await
    }

    /// Stores an already validated lead and announces it.
    ///
    /// # Errors
    /// If the record cannot be written.
    pub async fn accept(&self, lead: Lead) -> Result<LeadReceipt, LeadError> {
        let record = LeadRecord::new(lead);
        self.store.save(&record).await?;

        let receipt = LeadReceipt::from(&record);
        info!(id = %record.id, kind = record.lead.kind(), "Lead accepted");

        match self.events.publish(LeadSubmitted { record }) {
            Ok(0) => warn!(id = %receipt.id, "No lead subscribers"),
            Ok(_) => {},
            Err(e) => warn!(id = %receipt.id, error = %e, "Failed to announce lead"),
        }

        Ok(receipt)
    }
}

impl SubmissionAdapter for LeadService {
    async fn submit(&self, lead: &CalculatorLead) -> Result<LeadReceipt, LeadError> {
        self.accept(Lead::Calculator(lead.clone())).await
    }
}
