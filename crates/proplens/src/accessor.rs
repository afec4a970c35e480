//! Bound accessors and accessor maps
//!
//! A [`Getter`] or [`Setter`] is bound to one property of one concrete type.
//! Both are cheap reference-counted handles: cloning shares the same
//! instance, which is how one field accessor is published under several alias
//! keys and how cached maps hand out referentially stable entries.

use crate::error::AccessResult;
use crate::value::Value;
use indexmap::IndexMap;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

type GetFn = dyn Fn(&dyn Any) -> AccessResult<Value> + Send + Sync;
type SetFn = dyn Fn(&mut dyn Any, Value) -> AccessResult<()> + Send + Sync;

/// Read accessor for one property
#[derive(Clone)]
pub struct Getter(Arc<GetFn>);

impl Getter {
    /// Wrap a read function
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&dyn Any) -> AccessResult<Value> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Read the property from `target`
    pub fn get(&self, target: &dyn Any) -> AccessResult<Value> {
        (self.0)(target)
    }

    /// Check whether two handles share the same accessor instance
    pub fn ptr_eq(&self, other: &Getter) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Getter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Getter({:p})", Arc::as_ptr(&self.0))
    }
}

/// Write accessor for one property
#[derive(Clone)]
pub struct Setter(Arc<SetFn>);

impl Setter {
    /// Wrap a write function
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut dyn Any, Value) -> AccessResult<()> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Write `value` into the property of `target`
    pub fn set(&self, target: &mut dyn Any, value: Value) -> AccessResult<()> {
        (self.0)(target, value)
    }

    /// Check whether two handles share the same accessor instance
    pub fn ptr_eq(&self, other: &Setter) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Setter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Setter({:p})", Arc::as_ptr(&self.0))
    }
}

/// Ordered map from property name to accessor
pub type AccessorMap<A> = IndexMap<String, A>;

/// Ordered map from property name to [`Getter`]
pub type GetterMap = AccessorMap<Getter>;

/// Ordered map from property name to [`Setter`]
pub type SetterMap = AccessorMap<Setter>;

/// Invoke every getter of `getters` against `target`
///
/// Keys keep the map's order. Stops at the first failing getter.
pub fn resolve_values(getters: &GetterMap, target: &dyn Any) -> AccessResult<IndexMap<String, Value>> {
    getters
        .iter()
        .map(|(name, getter)| getter.get(target).map(|value| (name.clone(), value)))
        .collect()
}

/// A single property name or an ordered list of names
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PropNames(Vec<String>);

impl PropNames {
    /// Build from any list of names
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    /// Names in request order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Number of names
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if no names were given
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for PropNames {
    fn from(name: &str) -> Self {
        Self(vec![name.to_string()])
    }
}

impl From<String> for PropNames {
    fn from(name: String) -> Self {
        Self(vec![name])
    }
}

impl From<Vec<String>> for PropNames {
    fn from(names: Vec<String>) -> Self {
        Self(names)
    }
}

impl From<Vec<&str>> for PropNames {
    fn from(names: Vec<&str>) -> Self {
        Self::new(names)
    }
}

impl From<&[&str]> for PropNames {
    fn from(names: &[&str]) -> Self {
        Self::new(names.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for PropNames {
    fn from(names: [&str; N]) -> Self {
        Self::new(names)
    }
}
