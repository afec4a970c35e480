//! Resolvers for introspected struct types
//!
//! Property names come from two sources in the type's [`TypeShape`]:
//!
//! 1. Methods named `get<Name>` (no argument) or `set<Name>` (one argument).
//!    `<Name>` must start at a word boundary (`get_name`, `getName`) and is
//!    converted to camelCase. These win the canonical slot.
//! 2. Public fields. A field fills the camelCase slot of its name only if no
//!    method claimed it, and is additionally reachable under its declared
//!    spelling and its snake_case spelling when those are unclaimed.
//!
//! Unrestricted resolution returns the canonical names only. Restricted
//! resolution also accepts the alias spellings. The full table is computed
//! once per type and cached for the lifetime of the resolver.

use super::{restrict, GetterResolver, SetterResolver};
use crate::accessor::{AccessorMap, Getter, GetterMap, PropNames, Setter, SetterMap};
use crate::case;
use crate::error::{AccessError, AccessResult, AccessorKind};
use crate::introspect::{MethodKind, ShapeTable, TypeShape};
use dashmap::DashMap;
use std::any::{Any, TypeId};
use std::sync::Arc;

/// Accessor table computed for one type
#[derive(Debug)]
pub struct TypeAccessors<A> {
    type_name: &'static str,
    canonical: AccessorMap<A>,
    aliases: AccessorMap<A>,
}

impl<A: Clone> TypeAccessors<A> {
    fn collect<'s>(
        type_name: &'static str,
        methods: impl Iterator<Item = (String, A)>,
        fields: impl Iterator<Item = (&'s str, A)>,
    ) -> Self {
        let mut canonical = AccessorMap::new();
        for (name, accessor) in methods {
            canonical.entry(name).or_insert(accessor);
        }

        let mut aliases = AccessorMap::new();
        for (declared, accessor) in fields {
            let camel = case::to_camel(declared);
            if !camel.is_empty() {
                canonical.entry(camel).or_insert_with(|| accessor.clone());
            }
            for alias in [declared.to_string(), case::to_snake(declared)] {
                if alias.is_empty() || canonical.contains_key(&alias) || aliases.contains_key(&alias) {
                    continue;
                }
                aliases.insert(alias, accessor.clone());
            }
        }

        Self {
            type_name,
            canonical,
            aliases,
        }
    }

    /// Name of the described type
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Canonical camelCase names in discovery order
    pub fn canonical(&self) -> &AccessorMap<A> {
        &self.canonical
    }

    /// Field spellings that only restricted lookups accept
    pub fn aliases(&self) -> &AccessorMap<A> {
        &self.aliases
    }

    /// Find an accessor by canonical name, then by alias
    pub fn lookup(&self, name: &str) -> Option<&A> {
        self.canonical.get(name).or_else(|| self.aliases.get(name))
    }

    fn select(
        &self,
        kind: AccessorKind,
        props: Option<&PropNames>,
        ignore_inaccessible: bool,
    ) -> AccessResult<AccessorMap<A>> {
        match props {
            None => Ok(self.canonical.clone()),
            Some(props) => restrict(kind, self.type_name, props, ignore_inaccessible, |name| {
                self.lookup(name).cloned()
            }),
        }
    }
}

/// Property name for an accessor method, if `method` is `<prefix><Name>`
fn accessor_name(method: &str, prefix: &str) -> Option<String> {
    let rest = method.strip_prefix(prefix)?;
    if !rest.starts_with(|c: char| c == '_' || c.is_ascii_uppercase()) {
        return None;
    }
    let name = case::to_camel(rest);
    (!name.is_empty()).then_some(name)
}

fn getter_accessors(shape: &TypeShape) -> TypeAccessors<Getter> {
    let methods = shape.methods().iter().filter_map(|method| match &method.kind {
        MethodKind::Reader(getter) if method.required_args == 0 => {
            accessor_name(&method.name, "get").map(|name| (name, getter.clone()))
        }
        _ => None,
    });
    let fields = shape
        .fields()
        .iter()
        .map(|field| (field.name.as_str(), field.read.clone()));
    TypeAccessors::collect(shape.type_name(), methods, fields)
}

fn setter_accessors(shape: &TypeShape) -> TypeAccessors<Setter> {
    let methods = shape.methods().iter().filter_map(|method| match &method.kind {
        MethodKind::Writer(setter) if method.required_args == 1 => {
            accessor_name(&method.name, "set").map(|name| (name, setter.clone()))
        }
        _ => None,
    });
    let fields = shape
        .fields()
        .iter()
        .filter_map(|field| field.write.clone().map(|setter| (field.name.as_str(), setter)));
    TypeAccessors::collect(shape.type_name(), methods, fields)
}

/// Per-type cache shared by both object resolvers
#[derive(Debug)]
struct AccessorCache<A> {
    shapes: Arc<ShapeTable>,
    entries: DashMap<TypeId, Arc<TypeAccessors<A>>>,
}

impl<A: Clone> AccessorCache<A> {
    fn new(shapes: Arc<ShapeTable>) -> Self {
        Self {
            shapes,
            entries: DashMap::new(),
        }
    }

    fn supports(&self, target: &dyn Any) -> bool {
        self.shapes
            .get(target.type_id())
            .is_some_and(|shape| !shape.is_opaque())
    }

    fn get_or_build(
        &self,
        target: &dyn Any,
        kind: AccessorKind,
        build: fn(&TypeShape) -> TypeAccessors<A>,
    ) -> AccessResult<Arc<TypeAccessors<A>>> {
        let type_id = target.type_id();
        if let Some(hit) = self.entries.get(&type_id) {
            return Ok(Arc::clone(hit.value()));
        }

        let shape = self
            .shapes
            .get(type_id)
            .filter(|shape| !shape.is_opaque())
            .ok_or_else(|| AccessError::UnsupportedType {
                chain: kind,
                type_name: format!("{type_id:?}"),
            })?;

        let entry = self.entries.entry(type_id).or_insert_with(|| {
            let accessors = build(&shape);
            tracing::debug!(
                type_name = shape.type_name(),
                %kind,
                canonical = accessors.canonical.len(),
                aliases = accessors.aliases.len(),
                "cached accessor table"
            );
            Arc::new(accessors)
        });
        Ok(Arc::clone(entry.value()))
    }
}

/// Getter resolver for types registered in a [`ShapeTable`]
#[derive(Debug)]
pub struct ObjectGetterResolver {
    cache: AccessorCache<Getter>,
}

impl ObjectGetterResolver {
    /// Create a resolver reading shapes from `shapes`
    pub fn new(shapes: Arc<ShapeTable>) -> Self {
        Self {
            cache: AccessorCache::new(shapes),
        }
    }

    /// Full accessor table of the target's type
    ///
    /// Computed on first use and shared afterwards.
    pub fn accessors(&self, target: &dyn Any) -> AccessResult<Arc<TypeAccessors<Getter>>> {
        self.cache.get_or_build(target, AccessorKind::Getter, getter_accessors)
    }

    /// Number of types with a cached table
    pub fn cached_types(&self) -> usize {
        self.cache.entries.len()
    }
}

impl GetterResolver for ObjectGetterResolver {
    fn name(&self) -> &'static str {
        "object"
    }

    fn supports(&self, target: &dyn Any) -> bool {
        self.cache.supports(target)
    }

    fn resolve_getters(
        &self,
        target: &dyn Any,
        props: Option<&PropNames>,
        ignore_inaccessible: bool,
    ) -> AccessResult<GetterMap> {
        self.accessors(target)?
            .select(AccessorKind::Getter, props, ignore_inaccessible)
    }
}

/// Setter resolver for types registered in a [`ShapeTable`]
#[derive(Debug)]
pub struct ObjectSetterResolver {
    cache: AccessorCache<Setter>,
}

impl ObjectSetterResolver {
    /// Create a resolver reading shapes from `shapes`
    pub fn new(shapes: Arc<ShapeTable>) -> Self {
        Self {
            cache: AccessorCache::new(shapes),
        }
    }

    /// Full accessor table of the target's type
    pub fn accessors(&self, target: &dyn Any) -> AccessResult<Arc<TypeAccessors<Setter>>> {
        self.cache.get_or_build(target, AccessorKind::Setter, setter_accessors)
    }

    /// Number of types with a cached table
    pub fn cached_types(&self) -> usize {
        self.cache.entries.len()
    }
}

impl SetterResolver for ObjectSetterResolver {
    fn name(&self) -> &'static str {
        "object"
    }

    fn supports(&self, target: &dyn Any) -> bool {
        self.cache.supports(target)
    }

    fn resolve_setters(
        &self,
        target: &dyn Any,
        props: Option<&PropNames>,
        ignore_inaccessible: bool,
    ) -> AccessResult<SetterMap> {
        self.accessors(target)?
            .select(AccessorKind::Setter, props, ignore_inaccessible)
    }
}
