use std::borrow::Cow;

/// A specialized [`CalculatorError`] enum of this crate.
#[abect_derive::abect_error]
pub enum CalculatorError {
    /// The requested project type slug is not part of the catalog.
    #[error("Unknown project type{}: {message}", format_context(.context))]
    UnknownProjectType { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The requested add-on slug is not part of the catalog.
    #[error("Unknown add-on{}: {message}", format_context(.context))]
    UnknownAddOn { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The requested urgency slug is not part of the catalog.
    #[error("Unknown urgency tier{}: {message}", format_context(.context))]
    UnknownUrgency { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Request body that could not be decoded.
    #[error("Invalid request{}: {message}", format_context(.context))]
    InvalidRequest { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Two records of one collection share a slug.
    #[error("Duplicate slug{}: {message}", format_context(.context))]
    DuplicateSlug { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Structurally valid but unusable configuration (page range, negative prices).
    #[error("Invalid calculator config{}: {message}", format_context(.context))]
    InvalidConfig { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Failure reported by a selection store backend.
    #[error("Selection store error{}: {message}", format_context(.context))]
    Storage { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("I/O error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("JSON error{}: {source}", format_context(.context))]
    Json { source: serde_json::Error, context: Option<Cow<'static, str>> },

    #[cfg(feature = "server")]
    #[error("API state error{}: {source}", format_context(.context))]
    State {
        source: abect_kernel::server::ApiStateError,
        context: Option<Cow<'static, str>>,
    },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal calculator error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
