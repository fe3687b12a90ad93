use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Fields, ItemStruct};

/// Splits `struct Name { .. }` into `NameInner { .. }` plus an `Arc` newtype `Name` that
/// derefs to it and registers as a feature slice.
pub fn expand(input: ItemStruct) -> TokenStream {
    if !matches!(input.fields, Fields::Named(_)) {
        return syn::Error::new_spanned(&input, "abect_slice requires a struct with named fields")
            .to_compile_error();
    }

    let wrapper = &input.ident;
    let vis = &input.vis;
    let fields = &input.fields;
    let attrs = &input.attrs;
    let inner = format_ident!("{wrapper}Inner");

    quote! {
        #(#attrs)*
        #[derive(Debug)]
        #vis struct #inner #fields

        #[derive(Debug, Clone)]
        #vis struct #wrapper {
            inner: std::sync::Arc<#inner>,
        }

        impl #wrapper {
            #[must_use]
            pub fn new(inner: #inner) -> Self {
                Self { inner: std::sync::Arc::new(inner) }
            }
        }

        impl std::ops::Deref for #wrapper {
            type Target = #inner;

            fn deref(&self) -> &Self::Target {
                &self.inner
            }
        }

        impl ::abect_kernel::domain::registry::FeatureSlice for #wrapper {
            fn as_any(&self) -> &dyn std::any::Any {
                self
            }
        }
    }
}
