use std::borrow::Cow;

/// Errors that can occur during event bus operations.
#[abect_derive::abect_error]
pub enum EventBusError {
    /// A registered channel holds a sender of a different event type.
    /// This indicates an invariant violation in the type registry.
    #[error("Type mismatch{}: {message}", format_context(.context))]
    TypeMismatch { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Capacity must be greater than zero.
    #[error("Invalid capacity{}: {message}", format_context(.context))]
    InvalidCapacity { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
