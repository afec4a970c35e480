//! Accessor resolvers
//!
//! A resolver decides whether it can handle a value and, if so, builds the
//! map from property name to bound accessor for it. Getter and setter
//! resolution are separate strategies so the registry can keep one ordered
//! chain for each.
//!
//! Two families ship with the crate:
//!
//! - [`object`] resolves introspected struct types through their
//!   [`TypeShape`](crate::TypeShape) and caches one map per type.
//! - [`record`] resolves [`Record`](crate::Record) values by their current
//!   keys and never caches.

pub mod object;
pub mod record;

pub use object::{ObjectGetterResolver, ObjectSetterResolver, TypeAccessors};
pub use record::{RecordGetterResolver, RecordSetterResolver};

use crate::accessor::{AccessorMap, GetterMap, PropNames, SetterMap};
use crate::error::{AccessError, AccessResult, AccessorKind};
use std::any::Any;

/// Strategy producing getter maps for the values it supports
pub trait GetterResolver: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Check whether this resolver handles `target`
    fn supports(&self, target: &dyn Any) -> bool;

    /// Build the getter map of `target`
    ///
    /// With `props`, the map contains exactly the requested names that could
    /// be resolved, keyed by the requested spelling. A name that cannot be
    /// resolved fails the whole call unless `ignore_inaccessible` is set.
    fn resolve_getters(
        &self,
        target: &dyn Any,
        props: Option<&PropNames>,
        ignore_inaccessible: bool,
    ) -> AccessResult<GetterMap>;
}

/// Strategy producing setter maps for the values it supports
pub trait SetterResolver: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Check whether this resolver handles `target`
    fn supports(&self, target: &dyn Any) -> bool;

    /// Build the setter map of `target`
    ///
    /// Same restriction rules as [`GetterResolver::resolve_getters`].
    fn resolve_setters(
        &self,
        target: &dyn Any,
        props: Option<&PropNames>,
        ignore_inaccessible: bool,
    ) -> AccessResult<SetterMap>;
}

/// Restrict resolution to `props`
///
/// Every name is looked up in request order. Missing names are collected
/// and reported together.
pub(crate) fn restrict<A>(
    kind: AccessorKind,
    type_name: &str,
    props: &PropNames,
    ignore_inaccessible: bool,
    lookup: impl Fn(&str) -> Option<A>,
) -> AccessResult<AccessorMap<A>> {
    let mut map = AccessorMap::with_capacity(props.len());
    let mut missing = Vec::new();

    for name in props.iter() {
        match lookup(name) {
            Some(accessor) => {
                map.insert(name.to_string(), accessor);
            }
            None => missing.push(name.to_string()),
        }
    }

    if !missing.is_empty() && !ignore_inaccessible {
        return Err(AccessError::PropertyNotFound {
            kind,
            type_name: type_name.to_string(),
            missing,
        });
    }
    if !missing.is_empty() {
        tracing::trace!(%kind, type_name, ?missing, "skipped inaccessible properties");
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(name: &str) -> Option<u8> {
        match name {
            "a" => Some(1),
            "b" => Some(2),
            _ => None,
        }
    }

    #[test]
    fn test_restrict_keeps_request_order() {
        let props = PropNames::from(["b", "a"]);
        let map = restrict(AccessorKind::Getter, "T", &props, false, lookup).unwrap();
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["b", "a"]);
    }

    #[test]
    fn test_restrict_reports_every_missing_name() {
        let props = PropNames::from(["x", "a", "y"]);
        let err = restrict(AccessorKind::Setter, "T", &props, false, lookup).unwrap_err();
        assert_eq!(
            err,
            AccessError::PropertyNotFound {
                kind: AccessorKind::Setter,
                type_name: "T".to_string(),
                missing: vec!["x".to_string(), "y".to_string()],
            }
        );
    }

    #[test]
    fn test_restrict_ignores_missing_when_asked() {
        let props = PropNames::from(["x", "a"]);
        let map = restrict(AccessorKind::Getter, "T", &props, true, lookup).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map["a"], 1);
    }
}
