//! Name-based access proxy
//!
//! An [`AccessProxy`] borrows a target and exposes its properties through a
//! fixed getter map and, unless read-only, a fixed setter map. Both maps are
//! resolved once at construction. Removing properties through the proxy is
//! never supported; [`AccessProxy::remove_accessors`] only narrows the maps.

use crate::accessor::{GetterMap, SetterMap};
use crate::error::{AccessError, AccessResult, AccessorKind};
use crate::options::ProxyOptions;
use crate::registry::Registry;
use crate::target::ProxyTarget;
use crate::value::Value;
use indexmap::IndexMap;
use std::any::Any;
use std::fmt;

/// Property proxy over a borrowed target
pub struct AccessProxy<'a> {
    target: ProxyTarget<'a>,
    getters: GetterMap,
    setters: Option<SetterMap>,
}

impl<'a> AccessProxy<'a> {
    /// Resolve a proxy for `target` through `registry`
    ///
    /// Every requested name in `opts.props` must resolve. A writable proxy
    /// needs an exclusive borrow of the target.
    pub fn new(
        registry: &Registry,
        target: impl Into<ProxyTarget<'a>>,
        opts: &ProxyOptions,
    ) -> AccessResult<Self> {
        let target = target.into();
        if !opts.read_only && !target.is_exclusive() {
            return Err(AccessError::ReadOnlyViolation);
        }

        let resolve = opts.resolve_options();
        let getters = registry
            .getter_map_of(target.as_any(), target.type_name(), &resolve)?
            .unwrap_or_default();
        let setters = if opts.read_only {
            None
        } else {
            Some(
                registry
                    .setter_map_of(target.as_any(), target.type_name(), &resolve)?
                    .unwrap_or_default(),
            )
        };

        tracing::debug!(
            type_name = target.type_name(),
            getters = getters.len(),
            setters = setters.as_ref().map(|s| s.len()),
            "built access proxy"
        );
        Ok(Self {
            target,
            getters,
            setters,
        })
    }

    /// Best-effort variant of [`AccessProxy::new`]
    ///
    /// Boots the default resolvers if needed. Returns `None` when resolution
    /// fails for any reason or when no getter was found.
    pub fn try_new(
        registry: &Registry,
        target: impl Into<ProxyTarget<'a>>,
        opts: &ProxyOptions,
    ) -> Option<Self> {
        registry.boot_default_resolvers();
        match Self::new(registry, target, opts) {
            Ok(proxy) if !proxy.getters.is_empty() => Some(proxy),
            Ok(_) => None,
            Err(err) => {
                tracing::debug!(error = %err, "no access proxy");
                None
            }
        }
    }

    /// Build a proxy from maps resolved elsewhere
    ///
    /// Passing setters makes the proxy writable, which needs an exclusive
    /// borrow of the target.
    pub fn from_maps(
        target: impl Into<ProxyTarget<'a>>,
        getters: GetterMap,
        setters: Option<SetterMap>,
    ) -> AccessResult<Self> {
        let target = target.into();
        if setters.is_some() && !target.is_exclusive() {
            return Err(AccessError::ReadOnlyViolation);
        }
        Ok(Self {
            target,
            getters,
            setters,
        })
    }

    /// Read property `name`
    pub fn get(&self, name: &str) -> AccessResult<Value> {
        let getter = self
            .getters
            .get(name)
            .ok_or_else(|| self.not_found(AccessorKind::Getter, name))?;
        getter.get(self.target.as_any())
    }

    /// Write `value` into property `name`
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> AccessResult<()> {
        let setters = self.setters.as_ref().ok_or(AccessError::ReadOnlyViolation)?;
        let setter = setters
            .get(name)
            .ok_or_else(|| self.not_found(AccessorKind::Setter, name))?;
        let target = self
            .target
            .as_any_mut()
            .ok_or(AccessError::ReadOnlyViolation)?;
        setter.set(target, value.into())
    }

    /// Check whether `name` is readable and currently not `Null`
    ///
    /// A failing getter counts as absent.
    pub fn contains(&self, name: &str) -> bool {
        self.getters
            .get(name)
            .and_then(|getter| getter.get(self.target.as_any()).ok())
            .is_some_and(|value| !value.is_null())
    }

    /// Always fails: properties cannot be removed through a proxy
    pub fn delete(&mut self, _name: &str) -> AccessResult<()> {
        Err(AccessError::UnsupportedOperation)
    }

    /// Drop accessors from the proxy's maps; the target is untouched
    ///
    /// Unknown names are ignored.
    pub fn remove_accessors<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            let name = name.as_ref();
            self.getters.shift_remove(name);
            if let Some(setters) = self.setters.as_mut() {
                setters.shift_remove(name);
            }
        }
    }

    /// Iterate over `(name, value)` pairs in getter order
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            getters: self.getters.iter(),
            target: self.target.as_any(),
        }
    }

    /// Read every property into an ordered map
    pub fn to_array(&self) -> AccessResult<IndexMap<String, Value>> {
        crate::accessor::resolve_values(&self.getters, self.target.as_any())
    }

    /// Number of readable properties
    pub fn len(&self) -> usize {
        self.getters.len()
    }

    /// Check if the proxy has no readable property
    pub fn is_empty(&self) -> bool {
        self.getters.is_empty()
    }

    /// Readable names in order
    pub fn readable_keys(&self) -> Vec<&str> {
        self.getters.keys().map(String::as_str).collect()
    }

    /// Writable names in order, empty for read-only proxies
    pub fn writable_keys(&self) -> Vec<&str> {
        self.setters
            .iter()
            .flat_map(|setters| setters.keys().map(String::as_str))
            .collect()
    }

    /// The proxied value
    pub fn target(&self) -> &dyn Any {
        self.target.as_any()
    }

    /// The proxied value, if the proxy holds an exclusive borrow
    pub fn target_mut(&mut self) -> Option<&mut dyn Any> {
        self.target.as_any_mut()
    }

    /// Name of the proxied type
    pub fn type_name(&self) -> &'static str {
        self.target.type_name()
    }

    /// Getter map
    pub fn getters(&self) -> &GetterMap {
        &self.getters
    }

    /// Setter map
    pub fn setters(&self) -> AccessResult<&SetterMap> {
        self.setters.as_ref().ok_or(AccessError::ReadOnlyMode)
    }

    /// Check whether the proxy was built without setters
    pub fn is_read_only(&self) -> bool {
        self.setters.is_none()
    }

    fn not_found(&self, kind: AccessorKind, name: &str) -> AccessError {
        AccessError::AccessorNotFound {
            kind,
            name: name.to_string(),
            type_name: self.target.type_name().to_string(),
        }
    }
}

impl fmt::Debug for AccessProxy<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessProxy")
            .field("type_name", &self.target.type_name())
            .field("readable", &self.readable_keys())
            .field("writable", &self.writable_keys())
            .field("read_only", &self.is_read_only())
            .finish()
    }
}

/// Iterator over the properties of an [`AccessProxy`]
pub struct Iter<'p> {
    getters: indexmap::map::Iter<'p, String, crate::accessor::Getter>,
    target: &'p dyn Any,
}

impl<'p> Iterator for Iter<'p> {
    type Item = (&'p str, AccessResult<Value>);

    fn next(&mut self) -> Option<Self::Item> {
        let (name, getter) = self.getters.next()?;
        Some((name.as_str(), getter.get(self.target)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.getters.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'p> IntoIterator for &'p AccessProxy<'_> {
    type Item = (&'p str, AccessResult<Value>);
    type IntoIter = Iter<'p>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Record;

    fn record() -> Record {
        Record::from_iter([("foo", Value::from(1)), ("bar", Value::Null)])
    }

    #[test]
    fn test_read_only_by_default() {
        let registry = Registry::with_defaults();
        let rec = record();
        let mut proxy = AccessProxy::new(&registry, &rec, &ProxyOptions::default()).unwrap();
        assert!(proxy.is_read_only());
        assert_eq!(proxy.set("foo", 2), Err(AccessError::ReadOnlyViolation));
        assert_eq!(proxy.setters().unwrap_err(), AccessError::ReadOnlyMode);
        assert!(proxy.writable_keys().is_empty());
    }

    #[test]
    fn test_writable_needs_exclusive_borrow() {
        let registry = Registry::with_defaults();
        let rec = record();
        let err = AccessProxy::new(&registry, &rec, &ProxyOptions::new().writable()).unwrap_err();
        assert_eq!(err, AccessError::ReadOnlyViolation);
    }

    #[test]
    fn test_writable_proxy_writes_through() {
        let registry = Registry::with_defaults();
        let mut rec = record();
        {
            let mut proxy =
                AccessProxy::new(&registry, &mut rec, &ProxyOptions::new().writable()).unwrap();
            proxy.set("foo", 10).unwrap();
            assert_eq!(proxy.get("foo").unwrap(), Value::Int(10));
            let err = proxy.set("missing", 1).unwrap_err();
            assert!(matches!(err, AccessError::AccessorNotFound { kind: AccessorKind::Setter, .. }));
        }
        assert_eq!(rec.get("foo"), Some(&Value::Int(10)));
    }

    #[test]
    fn test_contains_treats_null_as_absent() {
        let registry = Registry::with_defaults();
        let rec = record();
        let proxy = AccessProxy::new(&registry, &rec, &ProxyOptions::default()).unwrap();
        assert!(proxy.contains("foo"));
        assert!(!proxy.contains("bar"));
        assert!(!proxy.contains("baz"));
    }

    #[test]
    fn test_get_unknown_name() {
        let registry = Registry::with_defaults();
        let rec = record();
        let proxy = AccessProxy::new(&registry, &rec, &ProxyOptions::default()).unwrap();
        let err = proxy.get("baz").unwrap_err();
        assert_eq!(err.to_string(), "No getter found for \"baz\" in proplens::value::Record");
    }

    #[test]
    fn test_delete_is_unsupported() {
        let registry = Registry::with_defaults();
        let rec = record();
        let mut proxy = AccessProxy::new(&registry, &rec, &ProxyOptions::default()).unwrap();
        assert_eq!(proxy.delete("foo"), Err(AccessError::UnsupportedOperation));
        assert_eq!(proxy.len(), 2);
    }

    #[test]
    fn test_remove_accessors_narrows_maps() {
        let registry = Registry::with_defaults();
        let mut rec = record();
        let mut proxy =
            AccessProxy::new(&registry, &mut rec, &ProxyOptions::new().writable()).unwrap();
        proxy.remove_accessors(["foo", "unknown"]);
        assert_eq!(proxy.readable_keys(), vec!["bar"]);
        assert_eq!(proxy.writable_keys(), vec!["bar"]);
        drop(proxy);
        assert!(rec.contains("foo"));
    }

    #[test]
    fn test_iteration_order() {
        let registry = Registry::with_defaults();
        let rec = record();
        let proxy = AccessProxy::new(&registry, &rec, &ProxyOptions::default()).unwrap();
        let pairs: Vec<_> = proxy
            .iter()
            .map(|(name, value)| (name.to_string(), value.unwrap()))
            .collect();
        assert_eq!(
            pairs,
            vec![("foo".to_string(), Value::Int(1)), ("bar".to_string(), Value::Null)]
        );
        assert_eq!((&proxy).into_iter().len(), 2);
    }

    #[test]
    fn test_try_new_boots_and_rejects_empty() {
        let registry = Registry::new();
        let rec = record();
        assert!(AccessProxy::try_new(&registry, &rec, &ProxyOptions::default()).is_some());
        assert!(registry.is_booted());

        let empty = Record::new();
        assert!(AccessProxy::try_new(&registry, &empty, &ProxyOptions::default()).is_none());
        assert!(AccessProxy::try_new(&registry, &5u8, &ProxyOptions::default()).is_none());
    }

    #[test]
    fn test_from_maps() {
        let registry = Registry::with_defaults();
        let rec = record();
        let getters = registry.getters_of(&rec).unwrap();
        let proxy = AccessProxy::from_maps(&rec, getters, None).unwrap();
        assert_eq!(proxy.to_array().unwrap()["foo"], Value::Int(1));

        let setters = registry.setters_of(&rec).unwrap();
        let err = AccessProxy::from_maps(&rec, GetterMap::new(), Some(setters)).unwrap_err();
        assert_eq!(err, AccessError::ReadOnlyViolation);
    }
}
