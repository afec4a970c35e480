// #[derive(Introspect)] implementation
//
// Generates a `TypeShape` that lists the declared accessor methods and the
// `pub` fields of a struct with named fields.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Result, Visibility};

use crate::attrs::{ident_name, parse_container, parse_field};

/// Expands #[derive(Introspect)].
///
/// Example expansion:
/// ```ignore
/// // Input:
/// #[derive(Introspect)]
/// #[introspect(getters(get_total))]
/// pub struct Order {
///     pub id: u64,
///     #[introspect(readonly)]
///     pub placed: String,
///     lines: Vec<Line>,
/// }
///
/// // Output:
/// impl ::proplens::Introspect for Order {
///     fn shape() -> ::proplens::TypeShape {
///         ::proplens::TypeShape::builder::<Self>("Order")
///             .method("get_total", Self::get_total)
///             .field("id", |this| &this.id, |this| &mut this.id)
///             .readonly_field("placed", |this| &this.placed)
///             .build()
///     }
/// }
/// ```
pub fn expand_introspect(input: DeriveInput) -> Result<TokenStream> {
    let ident = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Introspect cannot be derived for generic types",
        ));
    }

    let data = match &input.data {
        Data::Struct(data) => data,
        Data::Enum(data) => {
            return Err(syn::Error::new_spanned(
                data.enum_token,
                "Introspect can only be derived for structs",
            ))
        }
        Data::Union(data) => {
            return Err(syn::Error::new_spanned(
                data.union_token,
                "Introspect can only be derived for structs",
            ))
        }
    };

    let container = parse_container(&input.attrs)?;
    let type_name = container.name.unwrap_or_else(|| ident_name(ident));

    let mut members = Vec::new();

    for getter in &container.getters {
        let name = ident_name(getter);
        members.push(quote! { .method(#name, Self::#getter) });
    }
    for setter in &container.setters {
        let name = ident_name(setter);
        members.push(quote! { .method_mut(#name, Self::#setter) });
    }

    match &data.fields {
        Fields::Named(fields) => {
            for field in &fields.named {
                let attrs = parse_field(&field.attrs)?;
                if attrs.skip || !matches!(field.vis, Visibility::Public(_)) {
                    continue;
                }
                let Some(field_ident) = &field.ident else {
                    continue;
                };
                let name = attrs.rename.unwrap_or_else(|| ident_name(field_ident));
                if attrs.readonly {
                    members.push(quote! {
                        .readonly_field(#name, |this| &this.#field_ident)
                    });
                } else {
                    members.push(quote! {
                        .field(#name, |this| &this.#field_ident, |this| &mut this.#field_ident)
                    });
                }
            }
        }
        Fields::Unnamed(fields) => {
            return Err(syn::Error::new_spanned(
                fields,
                "Introspect requires named fields",
            ))
        }
        Fields::Unit => {}
    }

    let opaque = container.opaque.then(|| quote! { .opaque() });

    Ok(quote! {
        impl ::proplens::Introspect for #ident {
            fn shape() -> ::proplens::TypeShape {
                ::proplens::TypeShape::builder::<Self>(#type_name)
                    #(#members)*
                    #opaque
                    .build()
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn expand(input: DeriveInput) -> String {
        expand_introspect(input).unwrap().to_string()
    }

    fn expand_err(input: DeriveInput) -> String {
        expand_introspect(input).unwrap_err().to_string()
    }

    #[test]
    fn test_public_fields_only() {
        let out = expand(parse_quote! {
            pub struct Customer {
                pub name: String,
                secret: String,
                pub(crate) internal: u8,
            }
        });
        assert!(out.contains("\"name\""));
        assert!(!out.contains("secret"));
        assert!(!out.contains("internal"));
        assert!(out.contains("builder :: < Self > (\"Customer\")"));
    }

    #[test]
    fn test_field_attributes() {
        let out = expand(parse_quote! {
            pub struct Customer {
                #[introspect(readonly)]
                pub id: u64,
                #[introspect(skip)]
                pub cache: Vec<u8>,
                #[introspect(rename = "displayName")]
                pub title: String,
            }
        });
        assert!(out.contains(". readonly_field (\"id\""));
        assert!(!out.contains("cache"));
        assert!(out.contains(". field (\"displayName\""));
        assert!(out.contains("this . title"));
    }

    #[test]
    fn test_container_attributes() {
        let out = expand(parse_quote! {
            #[introspect(name = "Entity", getters(get_hidden), setters(set_hidden), opaque)]
            pub struct SampleEntity {
                hidden: String,
            }
        });
        assert!(out.contains("(\"Entity\")"));
        assert!(out.contains(". method (\"get_hidden\" , Self :: get_hidden)"));
        assert!(out.contains(". method_mut (\"set_hidden\" , Self :: set_hidden)"));
        assert!(out.contains(". opaque ()"));
    }

    #[test]
    fn test_unit_struct() {
        let out = expand(parse_quote! {
            pub struct Marker;
        });
        assert!(out.contains(". build ()"));
    }

    #[test]
    fn test_rejects_enums() {
        let err = expand_err(parse_quote! {
            pub enum Shape { Circle, Square }
        });
        assert_eq!(err, "Introspect can only be derived for structs");
    }

    #[test]
    fn test_rejects_tuple_structs() {
        let err = expand_err(parse_quote! {
            pub struct Pair(pub u8, pub u8);
        });
        assert_eq!(err, "Introspect requires named fields");
    }

    #[test]
    fn test_rejects_generics() {
        let err = expand_err(parse_quote! {
            pub struct Wrapper<T> { pub inner: T }
        });
        assert_eq!(err, "Introspect cannot be derived for generic types");
    }

    #[test]
    fn test_rejects_unknown_attribute() {
        let err = expand_err(parse_quote! {
            pub struct Customer {
                #[introspect(hidden)]
                pub name: String,
            }
        });
        assert_eq!(err, "expected `readonly`, `skip` or `rename`");
    }
}
