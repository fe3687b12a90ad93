use crate::SAFE_ALPHABET;
use std::borrow::Cow;

const MAX_ID_LEN: usize = 64;

#[abect_derive::abect_error]
pub enum ResourceGuardError {
    #[error("Resource validation error{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Utilities for safe resource handling and ID validation.
#[derive(Debug)]
pub struct ResourceGuard;

impl ResourceGuard {
    /// Validates a record ID received from the outside world.
    ///
    /// IDs end up in file names, so only characters from [`SAFE_ALPHABET`] are accepted.
    /// This rules out separators, dots and anything else that could escape the record
    /// directory (e.g. `../config`).
    ///
    /// # Errors
    /// Returns an error if the ID is empty, too long, or contains a foreign character.
    pub fn verify(id: &str) -> Result<&str, ResourceGuardError> {
        if id.is_empty() || id.len() > MAX_ID_LEN {
            return Err(ResourceGuardError::Validation {
                message: format!("ID length must be 1..={MAX_ID_LEN}, got {}", id.len()).into(),
                context: None,
            });
        }

        if let Some(bad) = id.chars().find(|c| !SAFE_ALPHABET.contains(c)) {
            return Err(ResourceGuardError::Validation {
                message: format!("Unexpected character {bad:?}").into(),
                context: Some("ID charset".into()),
            });
        }

        Ok(id)
    }
}
