#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by every crate of the workspace.
//!
//! * [`macro@abect_error`] turns a plain enum into a `thiserror` error type with context
//!   support. Library crates declare their error enums with it so that every error in the
//!   system carries the same shape.
//! * [`macro@abect_slice`] wraps feature state for the server's slice registry.

mod error;
mod slice;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemStruct, parse_macro_input};

/// Attribute macro for defining crate-level error enums.
///
/// # Features
///
/// * **Automatic Derives**: Injects `#[derive(Debug, thiserror::Error)]` unless already present.
/// * **Context Support**: Generates a companion `<Name>Ext` trait that adds `.context()`
///   to `Result<T, Name>` and to `Result<T, Source>` for every wrapped source error.
/// * **Standard Conversions**: Implements `From<Source>` for variants containing a `source`
///   field (or a field marked `#[source]`/`#[from]`), so `?` works on upstream errors.
/// * **Internal Fallback**: Provides `From<&'static str>` and `From<String>` when an
///   `Internal { message, context }` variant is present.
///
/// # Requirements
///
/// 1. The macro must be applied to an **enum** with named-field variants only.
/// 2. A `context` field, when present, must be `Option<Cow<'static, str>>`.
/// 3. Variants wrapping an external error must also declare a `context` field.
///
/// The expansion also emits a private `format_context` helper in the enclosing module, which
/// the `#[error(...)]` strings use to render the optional context. Declare at most one
/// `abect_error` enum per module.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[abect_derive::abect_error]
/// pub enum StoreError {
///     #[error("I/O failure{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal store error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn read(path: &std::path::Path) -> Result<Vec<u8>, StoreError> {
///     std::fs::read(path).context("Reading lead record")
/// }
/// ```
#[proc_macro_attribute]
pub fn abect_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    error::expand(input).into()
}

/// Turns a named-field struct into a cheaply clonable feature slice.
///
/// `#[abect_slice] pub struct Leads { service: LeadService }` expands to `LeadsInner` holding
/// the fields and `Leads(Arc<LeadsInner>)` with `Leads::new`, `Deref<Target = LeadsInner>` and
/// a `FeatureSlice` impl, so the slice can be registered with `InitializedSlice::new`.
///
/// The expansion refers to `::abect_kernel`, so the using crate must depend on it.
#[proc_macro_attribute]
pub fn abect_slice(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    slice::expand(input).into()
}
