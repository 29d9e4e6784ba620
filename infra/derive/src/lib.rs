#![allow(unreachable_pub)]

//! # Macros
//!
//! Procedural macros shared by the Capabilities Hub crates.
//!
//! Every crate in the workspace declares its error enum through [`macro@caphub_error`], which
//! keeps error variants uniform: a human readable `message` (or a wrapped `source`) plus an
//! optional `context` annotation that callers attach with `.context("...")`.
//! Feature crates declare their shared state through [`macro@caphub_slice`].

mod error;
mod slice;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemStruct, parse_macro_input};

/// Attribute macro for defining crate-level error enums.
///
/// # Injected Behaviors
///
/// * **Derives**: `Debug` and `thiserror::Error`, unless already derived.
/// * **Context**: a companion `<Name>Ext` trait adding `.context(...)` to `Result<T, Name>`
///   and to `Result<T, Source>` for every variant wrapping a source error.
/// * **Conversions**: `From<Source>` for variants with a `source` field (or a field marked
///   `#[source]`/`#[from]`), so `?` works on upstream errors.
/// * **Internal fallback**: `From<&'static str>` and `From<String>` when an `Internal`
///   variant exists.
/// * **`format_context`**: a module-level helper used inside `#[error(...)]` strings.
///
/// # Requirements
///
/// * Only enums with named-field variants are accepted.
/// * A `context` field must be typed `Option<Cow<'static, str>>`.
/// * Variants wrapping a source error must also carry a `context` field.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[caphub_derive::caphub_error]
/// pub enum StoreError {
///     #[error("Seed file error{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal store error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn read_seed(path: &str) -> Result<String, StoreError> {
///     std::fs::read_to_string(path).context("Reading capability seed")
/// }
/// ```
#[proc_macro_attribute]
pub fn caphub_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    error::expand(input).into()
}

/// Turns a struct into a feature slice handle.
///
/// The fields move into a generated `<Name>Inner` struct; `<Name>` becomes a cheap `Arc`
/// handle that derefs to it and implements `FeatureSlice`, so it can be registered in
/// the kernel's `ApiState`. The expansion refers to `caphub_kernel`, which the calling crate
/// must depend on.
///
/// # Example
/// ```rust,ignore
/// #[caphub_derive::caphub_slice]
/// pub struct Catalog {
///     pub name: String,
/// }
///
/// fn init() -> Catalog {
///     Catalog::new(CatalogInner { name: "catalog".to_owned() })
/// }
/// ```
#[proc_macro_attribute]
pub fn caphub_slice(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    slice::expand(input).into()
}
