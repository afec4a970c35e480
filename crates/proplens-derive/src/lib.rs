// proplens-derive: derive macro for proplens type introspection
//
// Provides:
// - #[derive(Introspect)] - Describes a struct's accessor methods and public
//   fields so the object resolvers can bind them by name
//
// Example:
// ```
// use proplens::Introspect;
//
// #[derive(Introspect)]
// #[introspect(getters(get_hidden), setters(set_hidden))]
// pub struct SampleEntity {
//     pub plain: String,
//     hidden: String,
// }
// ```

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod attrs;
mod shape;

/// Derives `proplens::Introspect` for a struct with named fields.
///
/// Every `pub` field is exposed as a read/write field unless marked
/// `#[introspect(readonly)]` or `#[introspect(skip)]`. Accessor methods are
/// listed explicitly on the container, since a derive cannot see `impl`
/// blocks:
///
/// ```ignore
/// #[derive(Introspect)]
/// #[introspect(getters(get_hidden), setters(set_hidden))]
/// pub struct SampleEntity {
///     pub plain: String,
///     #[introspect(rename = "displayName")]
///     pub title: String,
///     hidden: String,
/// }
///
/// impl SampleEntity {
///     pub fn get_hidden(&self) -> String { self.hidden.clone() }
///     pub fn set_hidden(&mut self, hidden: String) { self.hidden = hidden; }
/// }
/// ```
///
/// Getters must have the signature `fn(&self) -> R` with `R: ToValue`, and
/// setters `fn(&mut self, A)` with `A: FromValue`.
#[proc_macro_derive(Introspect, attributes(introspect))]
pub fn derive_introspect(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    shape::expand_introspect(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
