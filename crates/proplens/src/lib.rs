//! Proplens - name-based property access for Rust values
//!
//! This crate resolves the readable and writable properties of a value into
//! ordered maps of bound accessors, and wraps a value in a proxy that reads
//! and writes those properties by name.
//!
//! Two kinds of values are supported out of the box:
//!
//! - Struct types that describe themselves through [`Introspect`], usually
//!   via `#[derive(Introspect)]`. Their properties come from `get_*`/`set_*`
//!   methods and public fields.
//! - [`Record`] values, whose properties are their current keys.
//!
//! Property names are normalized with the [`case`] module.
//!
//! # Example
//!
//! ```ignore
//! use proplens::{AccessProxy, Introspect, ProxyOptions, Registry};
//!
//! #[derive(Introspect)]
//! pub struct Customer {
//!     pub name: String,
//!     pub postal_code: String,
//! }
//!
//! let registry = Registry::with_defaults();
//! registry.register_type::<Customer>();
//!
//! let mut customer = Customer { name: "Ada".into(), postal_code: "1010".into() };
//! let mut proxy = AccessProxy::new(&registry, &mut customer, &ProxyOptions::new().writable())?;
//! proxy.set("postalCode", "2020")?;
//! assert_eq!(proxy.get("name")?, "Ada".into());
//! ```

#![warn(missing_docs)]

pub mod accessor;
pub mod case;
pub mod convert;
pub mod error;
pub mod introspect;
pub mod options;
pub mod proxy;
pub mod registry;
pub mod resolver;
pub mod target;
pub mod value;

pub use accessor::{resolve_values, AccessorMap, Getter, GetterMap, PropNames, Setter, SetterMap};
pub use case::{Case, UnknownCase};
pub use convert::{ConversionError, FromValue, ToValue};
pub use error::{AccessError, AccessResult, AccessorKind};
pub use introspect::{FieldInfo, Introspect, MethodInfo, MethodKind, ShapeBuilder, ShapeTable, TypeShape};
pub use options::{ProxyOptions, ResolveOptions};
pub use proxy::AccessProxy;
pub use registry::Registry;
pub use resolver::{GetterResolver, SetterResolver};
pub use target::{AsTarget, ProxyTarget};
pub use value::{Record, Value};

/// Derive [`Introspect`] for a struct with named fields
pub use proplens_derive::Introspect;
