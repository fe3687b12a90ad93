use std::borrow::Cow;

/// A specialized [`LeadError`] enum of this crate.
#[abect_derive::abect_error]
pub enum LeadError {
    /// Rejected input. The message is shown to the visitor as is.
    #[error("{message}")]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The calculator session is missing a required selection.
    #[error("Calculator session is not ready for submission{}: {message}", format_context(.context))]
    NotReady { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Lead not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("I/O error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("JSON error{}: {source}", format_context(.context))]
    Json { source: serde_json::Error, context: Option<Cow<'static, str>> },

    #[error("HTTP error{}: {source}", format_context(.context))]
    Http { source: reqwest::Error, context: Option<Cow<'static, str>> },

    #[error("Invalid lead ID{}: {source}", format_context(.context))]
    Id {
        source: abect_kernel::security::resource::ResourceGuardError,
        context: Option<Cow<'static, str>>,
    },

    #[error("Event bus error{}: {source}", format_context(.context))]
    Events { source: abect_event_bus::EventBusError, context: Option<Cow<'static, str>> },

    #[cfg(feature = "server")]
    #[error("API state error{}: {source}", format_context(.context))]
    State {
        source: abect_kernel::server::ApiStateError,
        context: Option<Cow<'static, str>>,
    },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal leads error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl LeadError {
    pub(crate) fn validation(message: &'static str) -> Self {
        Self::Validation { message: message.into(), context: None }
    }
}
