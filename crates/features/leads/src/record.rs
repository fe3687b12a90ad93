use crate::model::Lead;
use abect_kernel::safe_nanoid;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Processing state of a lead; set to [`LeadStatus::New`] on intake.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    #[default]
    New,
    Processing,
    Completed,
    Rejected,
}

/// A stored lead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadRecord {
    pub id: String,
    #[serde(flatten)]
    pub lead: Lead,
    #[serde(default)]
    pub status: LeadStatus,
    pub created_at: DateTime<Utc>,
}

impl LeadRecord {
    #[must_use]
    pub fn new(lead: Lead) -> Self {
        Self { id: safe_nanoid!(), lead, status: LeadStatus::New, created_at: Utc::now() }
    }
}

/// What the submitter gets back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
pub struct LeadReceipt {
    pub id: String,
    pub status: LeadStatus,
    #[cfg_attr(feature = "server", schema(value_type = String, format = DateTime))]
    pub created_at: DateTime<Utc>,
}

impl From<&LeadRecord> for LeadReceipt {
    fn from(record: &LeadRecord) -> Self {
        Self { id: record.id.clone(), status: record.status, created_at: record.created_at }
    }
}
