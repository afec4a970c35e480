// #[introspect(...)] attribute parsing
//
// Container level:
//   #[introspect(name = "Customer")]            type name used in errors
//   #[introspect(getters(get_total, get_tag))]  zero-argument methods
//   #[introspect(setters(set_tag))]             one-argument methods
//   #[introspect(opaque)]                       refuse resolution
//
// Field level:
//   #[introspect(readonly)]                     no setter
//   #[introspect(skip)]                         not exposed
//   #[introspect(rename = "displayName")]       declared name override

use syn::ext::IdentExt;
use syn::{Attribute, Ident, LitStr, Result};

/// Options collected from the container attributes
#[derive(Default)]
pub struct ContainerAttrs {
    pub name: Option<String>,
    pub getters: Vec<Ident>,
    pub setters: Vec<Ident>,
    pub opaque: bool,
}

/// Options collected from one field's attributes
#[derive(Default)]
pub struct FieldAttrs {
    pub readonly: bool,
    pub skip: bool,
    pub rename: Option<String>,
}

fn is_introspect(attr: &Attribute) -> bool {
    attr.path().is_ident("introspect")
}

pub fn parse_container(attrs: &[Attribute]) -> Result<ContainerAttrs> {
    let mut out = ContainerAttrs::default();
    for attr in attrs.iter().filter(|a| is_introspect(a)) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let lit: LitStr = meta.value()?.parse()?;
                out.name = Some(lit.value());
                Ok(())
            } else if meta.path.is_ident("getters") {
                meta.parse_nested_meta(|inner| {
                    out.getters.push(inner.path.require_ident()?.clone());
                    Ok(())
                })
            } else if meta.path.is_ident("setters") {
                meta.parse_nested_meta(|inner| {
                    out.setters.push(inner.path.require_ident()?.clone());
                    Ok(())
                })
            } else if meta.path.is_ident("opaque") {
                out.opaque = true;
                Ok(())
            } else {
                Err(meta.error("expected `name`, `getters`, `setters` or `opaque`"))
            }
        })?;
    }
    Ok(out)
}

pub fn parse_field(attrs: &[Attribute]) -> Result<FieldAttrs> {
    let mut out = FieldAttrs::default();
    for attr in attrs.iter().filter(|a| is_introspect(a)) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("readonly") {
                out.readonly = true;
                Ok(())
            } else if meta.path.is_ident("skip") {
                out.skip = true;
                Ok(())
            } else if meta.path.is_ident("rename") {
                let lit: LitStr = meta.value()?.parse()?;
                out.rename = Some(lit.value());
                Ok(())
            } else {
                Err(meta.error("expected `readonly`, `skip` or `rename`"))
            }
        })?;
    }
    Ok(out)
}

/// Identifier text without a raw prefix
pub fn ident_name(ident: &Ident) -> String {
    ident.unraw().to_string()
}
