//! Wire shape of incoming leads and the validated form handed to the store.

use crate::error::LeadError;
use abect_calculator::Calculator;
use abect_domain::calculator::Platform;
use abect_domain::constants::CALCULATOR_SOURCE;
use serde::{Deserialize, Serialize};

pub(crate) const NAME_TOO_SHORT: &str = "Ім'я повинно містити мінімум 2 символи";
pub(crate) const INVALID_CONTACT: &str = "Введіть коректний телефон або email";
pub(crate) const INVALID_TYPE: &str = "Невірний тип заявки";
pub(crate) const INCOMPLETE_CALCULATOR_DATA: &str = "Неповні дані калькулятора";

const MIN_NAME_CHARS: usize = 2;
const PHONE_DIGITS: std::ops::RangeInclusive<usize> = 10..=13;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
#[serde(default)]
pub struct Utm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campaign: Option<String>,
}

/// Calculator selections as reported by the client, with display names resolved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct CalculatorData {
    pub project_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_type_name: Option<String>,
    #[cfg_attr(feature = "server", schema(value_type = Option<String>, example = "standard"))]
    pub platform: Option<Platform>,
    pub pages_count: u32,
    pub additional_services: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_services_names: Option<Vec<String>>,
    pub urgency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urgency_name: Option<String>,
    pub estimated_price: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_timeline: Option<String>,
}

/// POST body of the lead intake. Every field is optional on the wire so that a malformed
/// request still gets a specific validation message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct LeadRequest {
    /// `simple` or `calculator`
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    /// Phone number or email address
    pub contact: String,
    pub message: Option<String>,
    /// Page the form was sent from
    pub source: Option<String>,
    pub utm: Option<Utm>,
    pub calculator_data: Option<CalculatorData>,
}

/// Trimmed contact block shared by every lead kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: String,
    pub contact: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utm: Option<Utm>,
}

/// A lead produced by a finished calculator session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorLead {
    #[serde(flatten)]
    pub contact: ContactInfo,
    pub calculator_data: CalculatorData,
}

/// A validated lead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Lead {
    Simple(ContactInfo),
    Calculator(CalculatorLead),
}

impl Lead {
    #[must_use]
    pub const fn contact(&self) -> &ContactInfo {
        match self {
            Self::Simple(contact) | Self::Calculator(CalculatorLead { contact, .. }) => contact,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Simple(_) => "simple",
            Self::Calculator(_) => "calculator",
        }
    }
}

impl LeadRequest {
    /// Checks the request in the order the visitor sees the messages: name, contact, type,
    /// calculator data.
    ///
    /// # Errors
    /// [`LeadError::Validation`] carrying the message for the first failing check.
    pub fn validate(self) -> Result<Lead, LeadError> {
        if !is_valid_name(&self.name) {
            return Err(LeadError::validation(NAME_TOO_SHORT));
        }
        if !is_valid_contact(&self.contact) {
            return Err(LeadError::validation(INVALID_CONTACT));
        }

        let contact = ContactInfo {
            name: self.name.trim().to_owned(),
            contact: self.contact.trim().to_owned(),
            message: non_blank(self.message),
            source: non_blank(self.source),
            utm: self.utm,
        };

        match self.kind.as_str() {
            "simple" => Ok(Lead::Simple(contact)),
            "calculator" => match self.calculator_data {
                Some(data) if !data.project_type.is_empty() && data.platform.is_some() => {
                    Ok(Lead::Calculator(CalculatorLead { contact, calculator_data: data }))
                },
                _ => Err(LeadError::validation(INCOMPLETE_CALCULATOR_DATA)),
            },
            _ => Err(LeadError::validation(INVALID_TYPE)),
        }
    }
}

impl CalculatorLead {
    /// Builds a lead from a completed session, resolving display names from its catalog.
    ///
    /// # Errors
    /// [`LeadError::NotReady`] unless [`Calculator::is_ready_to_submit`] holds, or
    /// [`LeadError::Validation`] if the contact fields fail the intake checks.
    pub fn from_session(calc: &Calculator, source: Option<String>) -> Result<Self, LeadError> {
        if !calc.is_ready_to_submit() {
            return Err(LeadError::NotReady {
                message: calc.step().to_string().into(),
                context: Some("Current step".into()),
            });
        }

        let selection = calc.selection();
        let data = CalculatorData {
            project_type: selection.project_type.clone().unwrap_or_default(),
            project_type_name: calc.selected_project_type().map(|p| p.display_name.clone()),
            platform: selection.platform,
            pages_count: selection.page_count,
            additional_services: selection.add_ons.clone(),
            additional_services_names: Some(
                calc.selected_add_ons().map(|a| a.display_name.clone()).collect(),
            ),
            urgency: selection.urgency.clone().unwrap_or_default(),
            urgency_name: calc.selected_urgency().map(|u| u.display_name.clone()),
            estimated_price: calc.estimate().price,
            estimated_timeline: Some(calc.estimate().timeline.clone()).filter(|t| !t.is_empty()),
        };

        let request = LeadRequest {
            kind: "calculator".to_owned(),
            name: selection.contact.name.clone(),
            contact: selection.contact.value.clone(),
            message: Some(selection.contact.note.clone()),
            source: source.or_else(|| Some(CALCULATOR_SOURCE.to_owned())),
            utm: None,
            calculator_data: Some(data),
        };

        match request.validate()? {
            Lead::Calculator(lead) => Ok(lead),
            Lead::Simple(_) => Err(LeadError::Internal {
                message: "Calculator request validated as a simple lead".into(),
                context: None,
            }),
        }
    }
}

/// Trimmed name with at least two characters.
#[must_use]
pub fn is_valid_name(name: &str) -> bool {
    name.trim().chars().count() >= MIN_NAME_CHARS
}

/// Email in `local@domain.tld` form, or a phone number with 10 to 13 digits in any
/// punctuation.
#[must_use]
pub fn is_valid_contact(contact: &str) -> bool {
    is_valid_email(contact) || is_valid_phone(contact)
}

fn is_valid_email(value: &str) -> bool {
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    // some dot with text on both sides
    domain
        .char_indices()
        .filter(|&(_, c)| c == '.')
        .any(|(i, _)| i > 0 && i + 1 < domain.len())
}

fn is_valid_phone(value: &str) -> bool {
    PHONE_DIGITS.contains(&value.chars().filter(char::is_ascii_digit).count())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}
