//! Type introspection tables
//!
//! Rust has no runtime reflection, so every concrete type that should be
//! resolvable by name describes itself once, at startup, as a [`TypeShape`]:
//! its public fields (with read and optional write access) and its public
//! methods (with their required argument count). Shapes are built with
//! [`TypeShape::builder`] or generated by `#[derive(Introspect)]`, then
//! registered in a [`ShapeTable`] keyed by `TypeId`.
//!
//! The table only records what a type exposes. Deciding which members become
//! which property names is the job of the object resolvers.

use crate::accessor::{Getter, Setter};
use crate::convert::{FromValue, ToValue};
use crate::error::AccessError;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::any::{Any, TypeId};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Types that can describe their public surface
pub trait Introspect: Any {
    /// Build the shape of this type
    fn shape() -> TypeShape;
}

/// How a public method can be invoked
#[derive(Debug, Clone)]
pub enum MethodKind {
    /// Takes no argument and returns a value
    Reader(Getter),
    /// Takes exactly one argument and mutates the receiver
    Writer(Setter),
    /// Declared for completeness, not invocable by name
    Opaque,
}

/// One public method of a type
#[derive(Debug, Clone)]
pub struct MethodInfo {
    /// Declared method name
    pub name: String,
    /// Number of arguments without a default
    pub required_args: usize,
    /// Bound invoker
    pub kind: MethodKind,
}

/// One public field of a type
#[derive(Debug, Clone)]
pub struct FieldInfo {
    /// Declared field name
    pub name: String,
    /// Reads the field
    pub read: Getter,
    /// Writes the field, `None` for read-only fields
    pub write: Option<Setter>,
}

/// Public surface of one concrete type
#[derive(Clone)]
pub struct TypeShape {
    type_id: TypeId,
    type_name: &'static str,
    methods: Vec<MethodInfo>,
    fields: Vec<FieldInfo>,
    opaque: bool,
}

impl TypeShape {
    /// Start describing `T`
    pub fn builder<T: Any>(type_name: &'static str) -> ShapeBuilder<T> {
        ShapeBuilder {
            type_name,
            methods: Vec::new(),
            fields: Vec::new(),
            opaque: false,
            _marker: PhantomData,
        }
    }

    /// Type ID of the described type
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Type name (for diagnostics)
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Public methods in declaration order
    pub fn methods(&self) -> &[MethodInfo] {
        &self.methods
    }

    /// Public fields in declaration order
    pub fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }

    /// Whether the type refuses enumeration (identity-keyed containers)
    pub fn is_opaque(&self) -> bool {
        self.opaque
    }
}

impl fmt::Debug for TypeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeShape")
            .field("type_name", &self.type_name)
            .field(
                "methods",
                &self.methods.iter().map(|m| &m.name).collect::<Vec<_>>(),
            )
            .field(
                "fields",
                &self.fields.iter().map(|f| &f.name).collect::<Vec<_>>(),
            )
            .field("opaque", &self.opaque)
            .finish()
    }
}

/// Builder for [`TypeShape`]
pub struct ShapeBuilder<T> {
    type_name: &'static str,
    methods: Vec<MethodInfo>,
    fields: Vec<FieldInfo>,
    opaque: bool,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Any> ShapeBuilder<T> {
    /// Register a public method taking no argument
    pub fn method<R: ToValue + 'static>(mut self, name: &str, f: fn(&T) -> R) -> Self {
        let getter = Getter::new(move |target| Ok(f(downcast_ref::<T>(target)?).to_value()));
        self.methods.push(MethodInfo {
            name: name.to_string(),
            required_args: 0,
            kind: MethodKind::Reader(getter),
        });
        self
    }

    /// Register a public method taking exactly one argument
    pub fn method_mut<A: FromValue + 'static>(mut self, name: &str, f: fn(&mut T, A)) -> Self {
        let property = name.to_string();
        let setter = Setter::new(move |target, value| {
            let this = downcast_mut::<T>(target)?;
            let arg = A::from_value(value).map_err(|source| AccessError::Conversion {
                property: property.clone(),
                source,
            })?;
            f(this, arg);
            Ok(())
        });
        self.methods.push(MethodInfo {
            name: name.to_string(),
            required_args: 1,
            kind: MethodKind::Writer(setter),
        });
        self
    }

    /// Declare a public method that cannot be bound by name
    pub fn opaque_method(mut self, name: &str, required_args: usize) -> Self {
        self.methods.push(MethodInfo {
            name: name.to_string(),
            required_args,
            kind: MethodKind::Opaque,
        });
        self
    }

    /// Register a public read/write field
    pub fn field<F>(mut self, name: &str, get: fn(&T) -> &F, get_mut: fn(&mut T) -> &mut F) -> Self
    where
        F: ToValue + FromValue + 'static,
    {
        let property = name.to_string();
        let write = Setter::new(move |target, value| {
            let slot = get_mut(downcast_mut::<T>(target)?);
            *slot = F::from_value(value).map_err(|source| AccessError::Conversion {
                property: property.clone(),
                source,
            })?;
            Ok(())
        });
        self.fields.push(FieldInfo {
            name: name.to_string(),
            read: field_reader(get),
            write: Some(write),
        });
        self
    }

    /// Register a public field that cannot be written
    pub fn readonly_field<F>(mut self, name: &str, get: fn(&T) -> &F) -> Self
    where
        F: ToValue + 'static,
    {
        self.fields.push(FieldInfo {
            name: name.to_string(),
            read: field_reader(get),
            write: None,
        });
        self
    }

    /// Mark the type as an identity-keyed container that resolvers must reject
    pub fn opaque(mut self) -> Self {
        self.opaque = true;
        self
    }

    /// Build the shape
    pub fn build(self) -> TypeShape {
        TypeShape {
            type_id: TypeId::of::<T>(),
            type_name: self.type_name,
            methods: self.methods,
            fields: self.fields,
            opaque: self.opaque,
        }
    }
}

fn field_reader<T: Any, F: ToValue + 'static>(get: fn(&T) -> &F) -> Getter {
    Getter::new(move |target| Ok(get(downcast_ref::<T>(target)?).to_value()))
}

fn downcast_ref<T: Any>(target: &dyn Any) -> Result<&T, AccessError> {
    target.downcast_ref::<T>().ok_or(AccessError::TargetMismatch {
        expected: std::any::type_name::<T>(),
    })
}

fn downcast_mut<T: Any>(target: &mut dyn Any) -> Result<&mut T, AccessError> {
    target.downcast_mut::<T>().ok_or(AccessError::TargetMismatch {
        expected: std::any::type_name::<T>(),
    })
}

/// Registry of type shapes
///
/// Thread-safe table that maps TypeId to TypeShape. Registration is
/// first-wins: a type that is already known keeps its original shape, so
/// accessor maps cached from it never go stale.
#[derive(Debug, Default)]
pub struct ShapeTable {
    shapes: RwLock<FxHashMap<TypeId, Arc<TypeShape>>>,
}

impl ShapeTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the shape of `T`
    pub fn register<T: Introspect>(&self) -> Arc<TypeShape> {
        if let Some(shape) = self.get(TypeId::of::<T>()) {
            return shape;
        }
        self.insert(T::shape())
    }

    /// Register a hand-built shape
    pub fn insert(&self, shape: TypeShape) -> Arc<TypeShape> {
        let mut shapes = self.shapes.write();
        let entry = shapes.entry(shape.type_id).or_insert_with(|| {
            tracing::debug!(type_name = shape.type_name, "registered type shape");
            Arc::new(shape)
        });
        Arc::clone(entry)
    }

    /// Get the shape registered for a type
    pub fn get(&self, type_id: TypeId) -> Option<Arc<TypeShape>> {
        self.shapes.read().get(&type_id).cloned()
    }

    /// Check if a type is registered
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.shapes.read().contains_key(&type_id)
    }

    /// Get the number of registered types
    pub fn len(&self) -> usize {
        self.shapes.read().len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.shapes.read().is_empty()
    }
}
