//! Resolver registry
//!
//! The registry owns two ordered resolver chains, one for getters and one
//! for setters, plus the [`ShapeTable`] the object resolvers read from. A
//! newly registered resolver goes to the front of its chain, and dispatch
//! picks the first resolver whose `supports` accepts the value.
//!
//! The registry is an explicit value rather than process-wide state. Share it
//! behind an `Arc` if several components need it; every method takes `&self`.
//!
//! ```ignore
//! let registry = Registry::with_defaults();
//! registry.register_type::<Customer>();
//!
//! let values = registry.value_map(&customer, &ResolveOptions::default())?;
//! ```

use crate::accessor::{self, GetterMap, SetterMap};
use crate::error::{AccessError, AccessResult, AccessorKind};
use crate::introspect::{Introspect, ShapeTable, TypeShape};
use crate::options::ResolveOptions;
use crate::resolver::{
    GetterResolver, ObjectGetterResolver, ObjectSetterResolver, RecordGetterResolver,
    RecordSetterResolver, SetterResolver,
};
use crate::target::AsTarget;
use crate::value::Value;
use indexmap::IndexMap;
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Ordered getter and setter resolver chains
pub struct Registry {
    getter_resolvers: RwLock<Vec<Arc<dyn GetterResolver>>>,
    setter_resolvers: RwLock<Vec<Arc<dyn SetterResolver>>>,
    shapes: Arc<ShapeTable>,
    booted: OnceCell<()>,
}

impl Registry {
    /// Create a registry with empty chains
    ///
    /// Resolution fails with [`AccessError::RegistryNotBooted`] until a
    /// resolver is registered or [`Registry::boot_default_resolvers`] runs.
    pub fn new() -> Self {
        Self {
            getter_resolvers: RwLock::new(Vec::new()),
            setter_resolvers: RwLock::new(Vec::new()),
            shapes: Arc::new(ShapeTable::new()),
            booted: OnceCell::new(),
        }
    }

    /// Create a registry with the default resolvers installed
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        registry.boot_default_resolvers();
        registry
    }

    /// Install the built-in resolvers, once
    ///
    /// Object resolvers are registered first and record resolvers second, so
    /// records are tried first. Later calls do nothing.
    pub fn boot_default_resolvers(&self) {
        self.booted.get_or_init(|| {
            self.register_getter_resolver(ObjectGetterResolver::new(Arc::clone(&self.shapes)));
            self.register_setter_resolver(ObjectSetterResolver::new(Arc::clone(&self.shapes)));
            self.register_getter_resolver(RecordGetterResolver);
            self.register_setter_resolver(RecordSetterResolver);
            tracing::debug!("booted default resolvers");
        });
    }

    /// Check whether the default resolvers have been installed
    pub fn is_booted(&self) -> bool {
        self.booted.get().is_some()
    }

    /// Add a getter resolver in front of the existing ones
    pub fn register_getter_resolver<R: GetterResolver + 'static>(&self, resolver: R) {
        tracing::debug!(resolver = resolver.name(), "registered getter resolver");
        self.getter_resolvers.write().insert(0, Arc::new(resolver));
    }

    /// Add a setter resolver in front of the existing ones
    pub fn register_setter_resolver<R: SetterResolver + 'static>(&self, resolver: R) {
        tracing::debug!(resolver = resolver.name(), "registered setter resolver");
        self.setter_resolvers.write().insert(0, Arc::new(resolver));
    }

    /// Number of getter resolvers
    pub fn getter_resolver_count(&self) -> usize {
        self.getter_resolvers.read().len()
    }

    /// Number of setter resolvers
    pub fn setter_resolver_count(&self) -> usize {
        self.setter_resolvers.read().len()
    }

    /// Register the shape of `T` with the object resolvers
    pub fn register_type<T: Introspect>(&self) -> Arc<TypeShape> {
        self.shapes.register::<T>()
    }

    /// Register a hand-built shape with the object resolvers
    pub fn register_shape(&self, shape: TypeShape) -> Arc<TypeShape> {
        self.shapes.insert(shape)
    }

    /// Shape table shared with the object resolvers
    pub fn shapes(&self) -> &Arc<ShapeTable> {
        &self.shapes
    }

    fn getter_resolver_for(&self, target: &dyn Any) -> AccessResult<Option<Arc<dyn GetterResolver>>> {
        let chain = self.getter_resolvers.read();
        if chain.is_empty() {
            return Err(AccessError::RegistryNotBooted {
                chain: AccessorKind::Getter,
            });
        }
        Ok(chain.iter().find(|r| r.supports(target)).cloned())
    }

    fn setter_resolver_for(&self, target: &dyn Any) -> AccessResult<Option<Arc<dyn SetterResolver>>> {
        let chain = self.setter_resolvers.read();
        if chain.is_empty() {
            return Err(AccessError::RegistryNotBooted {
                chain: AccessorKind::Setter,
            });
        }
        Ok(chain.iter().find(|r| r.supports(target)).cloned())
    }

    /// Resolve the getter map of `target`
    ///
    /// Returns `Ok(None)` only for unsupported values with
    /// `fail_on_unsupported` unset.
    pub fn getter_map<T: AsTarget + ?Sized>(
        &self,
        target: &T,
        opts: &ResolveOptions,
    ) -> AccessResult<Option<GetterMap>> {
        self.getter_map_of(T::as_target(target), T::target_name(target), opts)
    }

    pub(crate) fn getter_map_of(
        &self,
        target: &dyn Any,
        type_name: &str,
        opts: &ResolveOptions,
    ) -> AccessResult<Option<GetterMap>> {
        match self.getter_resolver_for(target)? {
            Some(resolver) => {
                tracing::trace!(resolver = resolver.name(), type_name, "resolving getters");
                resolver
                    .resolve_getters(target, opts.props.as_ref(), opts.ignore_inaccessible)
                    .map(Some)
            }
            None => unsupported(AccessorKind::Getter, type_name, opts),
        }
    }

    /// Resolve the setter map of `target`
    ///
    /// Same contract as [`Registry::getter_map`], against the setter chain.
    pub fn setter_map<T: AsTarget + ?Sized>(
        &self,
        target: &T,
        opts: &ResolveOptions,
    ) -> AccessResult<Option<SetterMap>> {
        self.setter_map_of(T::as_target(target), T::target_name(target), opts)
    }

    pub(crate) fn setter_map_of(
        &self,
        target: &dyn Any,
        type_name: &str,
        opts: &ResolveOptions,
    ) -> AccessResult<Option<SetterMap>> {
        match self.setter_resolver_for(target)? {
            Some(resolver) => {
                tracing::trace!(resolver = resolver.name(), type_name, "resolving setters");
                resolver
                    .resolve_setters(target, opts.props.as_ref(), opts.ignore_inaccessible)
                    .map(Some)
            }
            None => unsupported(AccessorKind::Setter, type_name, opts),
        }
    }

    /// Resolve the getters of `target` and read every one of them
    pub fn value_map<T: AsTarget + ?Sized>(
        &self,
        target: &T,
        opts: &ResolveOptions,
    ) -> AccessResult<Option<IndexMap<String, Value>>> {
        let any = T::as_target(target);
        match self.getter_map_of(any, T::target_name(target), opts)? {
            Some(getters) => accessor::resolve_values(&getters, any).map(Some),
            None => Ok(None),
        }
    }

    /// Read every getter of `getters` against `target`
    pub fn resolve_values<T: AsTarget + ?Sized>(
        &self,
        getters: &GetterMap,
        target: &T,
    ) -> AccessResult<IndexMap<String, Value>> {
        accessor::resolve_values(getters, T::as_target(target))
    }

    /// Check whether some getter resolver supports `target`
    pub fn can_resolve_getters<T: AsTarget + ?Sized>(&self, target: &T) -> AccessResult<bool> {
        Ok(self.getter_resolver_for(T::as_target(target))?.is_some())
    }

    /// Check whether some setter resolver supports `target`
    pub fn can_resolve_setters<T: AsTarget + ?Sized>(&self, target: &T) -> AccessResult<bool> {
        Ok(self.setter_resolver_for(T::as_target(target))?.is_some())
    }

    /// All canonical getters of `target`, failing if it is unsupported
    pub fn getters_of<T: AsTarget + ?Sized>(&self, target: &T) -> AccessResult<GetterMap> {
        self.getter_map(target, &ResolveOptions::default())?
            .ok_or_else(|| unsupported_error(AccessorKind::Getter, T::target_name(target)))
    }

    /// All canonical setters of `target`, failing if it is unsupported
    pub fn setters_of<T: AsTarget + ?Sized>(&self, target: &T) -> AccessResult<SetterMap> {
        self.setter_map(target, &ResolveOptions::default())?
            .ok_or_else(|| unsupported_error(AccessorKind::Setter, T::target_name(target)))
    }
}

fn unsupported_error(chain: AccessorKind, type_name: &str) -> AccessError {
    AccessError::UnsupportedType {
        chain,
        type_name: type_name.to_string(),
    }
}

fn unsupported<M>(chain: AccessorKind, type_name: &str, opts: &ResolveOptions) -> AccessResult<Option<M>> {
    if opts.fail_on_unsupported {
        return Err(unsupported_error(chain, type_name));
    }
    tracing::trace!(%chain, type_name, "no resolver supports value");
    Ok(None)
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let getters: Vec<_> = self.getter_resolvers.read().iter().map(|r| r.name()).collect();
        let setters: Vec<_> = self.setter_resolvers.read().iter().map(|r| r.name()).collect();
        f.debug_struct("Registry")
            .field("getter_resolvers", &getters)
            .field("setter_resolvers", &setters)
            .field("shapes", &self.shapes.len())
            .field("booted", &self.is_booted())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessor::{Getter, PropNames};
    use crate::value::Record;

    struct Probe {
        level: i64,
    }

    impl Introspect for Probe {
        fn shape() -> TypeShape {
            TypeShape::builder::<Probe>("Probe")
                .field("level", |p| &p.level, |p| &mut p.level)
                .build()
        }
    }

    /// Claims every `i32` and exposes it as `value`
    struct IntResolver;

    impl GetterResolver for IntResolver {
        fn name(&self) -> &'static str {
            "int"
        }

        fn supports(&self, target: &dyn Any) -> bool {
            target.is::<i32>()
        }

        fn resolve_getters(
            &self,
            _target: &dyn Any,
            _props: Option<&PropNames>,
            _ignore_inaccessible: bool,
        ) -> AccessResult<GetterMap> {
            let mut map = GetterMap::new();
            map.insert(
                "value".to_string(),
                Getter::new(|t| Ok(Value::from(*t.downcast_ref::<i32>().unwrap_or(&0)))),
            );
            Ok(map)
        }
    }

    #[test]
    fn test_empty_registry_is_not_booted() {
        let registry = Registry::new();
        let err = registry
            .getter_map(&Record::new(), &ResolveOptions::default())
            .unwrap_err();
        assert_eq!(err, AccessError::RegistryNotBooted { chain: AccessorKind::Getter });
        assert_eq!(
            err.to_string(),
            "No getter resolvers registered. Please boot before use!"
        );
        assert!(registry.can_resolve_setters(&Record::new()).is_err());
    }

    #[test]
    fn test_boot_is_idempotent() {
        let registry = Registry::new();
        registry.boot_default_resolvers();
        registry.boot_default_resolvers();
        assert!(registry.is_booted());
        assert_eq!(registry.getter_resolver_count(), 2);
        assert_eq!(registry.setter_resolver_count(), 2);
    }

    #[test]
    fn test_newest_resolver_wins() {
        let registry = Registry::with_defaults();
        registry.register_getter_resolver(IntResolver);
        let getters = registry.getters_of(&5i32).unwrap();
        assert_eq!(getters.keys().collect::<Vec<_>>(), vec!["value"]);
        assert_eq!(getters["value"].get(&5i32).unwrap(), Value::Int(5));
        assert_eq!(
            format!("{registry:?}"),
            "Registry { getter_resolvers: [\"int\", \"record\", \"object\"], \
             setter_resolvers: [\"record\", \"object\"], shapes: 0, booted: true }"
        );
    }

    #[test]
    fn test_unsupported_value() {
        let registry = Registry::with_defaults();
        let err = registry
            .getter_map(&"text", &ResolveOptions::default())
            .unwrap_err();
        assert_eq!(
            err,
            AccessError::UnsupportedType {
                chain: AccessorKind::Getter,
                type_name: "&str".to_string(),
            }
        );

        let none = registry
            .setter_map(&"text", &ResolveOptions::default().lenient())
            .unwrap();
        assert!(none.is_none());
        assert!(!registry.can_resolve_getters(&"text").unwrap());
    }

    #[test]
    fn test_registered_type_resolves() {
        let registry = Registry::with_defaults();
        let probe = Probe { level: 3 };
        assert!(!registry.can_resolve_getters(&probe).unwrap());

        registry.register_type::<Probe>();
        assert!(registry.can_resolve_getters(&probe).unwrap());
        assert!(registry.can_resolve_setters(&probe).unwrap());

        let values = registry
            .value_map(&probe, &ResolveOptions::default())
            .unwrap()
            .unwrap();
        assert_eq!(values["level"], Value::Int(3));
    }

    #[test]
    fn test_setter_map_uses_setter_chain() {
        let registry = Registry::with_defaults();
        registry.register_getter_resolver(IntResolver);
        assert!(registry.can_resolve_getters(&1i32).unwrap());
        assert!(!registry.can_resolve_setters(&1i32).unwrap());
        assert!(registry.setters_of(&1i32).is_err());
    }

    #[test]
    fn test_record_value_map_with_props() {
        let registry = Registry::with_defaults();
        let rec = Record::from_iter([("a", 1), ("b", 2)]);
        let values = registry
            .value_map(&rec, &ResolveOptions::new().with_props(["b", "zzz"]))
            .unwrap()
            .unwrap();
        assert_eq!(values.keys().collect::<Vec<_>>(), vec!["b"]);

        let err = registry
            .value_map(&rec, &ResolveOptions::new().with_props(["b", "zzz"]).strict())
            .unwrap_err();
        assert!(matches!(err, AccessError::PropertyNotFound { .. }));
    }

    #[test]
    fn test_resolve_values_with_given_map() {
        let registry = Registry::with_defaults();
        let rec = Record::from_iter([("a", 1)]);
        let getters = registry.getters_of(&rec).unwrap();
        let values = registry.resolve_values(&getters, &rec).unwrap();
        assert_eq!(values["a"], Value::Int(1));
    }
}
