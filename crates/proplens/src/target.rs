//! Resolution targets
//!
//! Resolvers and accessors work on `&dyn Any`. [`AsTarget`] is the front
//! door that erases a concrete value while keeping its type name for error
//! messages, and [`ProxyTarget`] records whether a proxy may write through
//! the borrow it holds.

use std::any::Any;

/// Values that can be handed to the registry
///
/// Implemented for every sized `'static` type and for `dyn Any` itself.
pub trait AsTarget {
    /// Erase to `&dyn Any`
    fn as_target(&self) -> &dyn Any;

    /// Erase to `&mut dyn Any`
    fn as_target_mut(&mut self) -> &mut dyn Any;

    /// Name of the concrete type, as far as it is known
    fn target_name(&self) -> &'static str;
}

impl<T: Any> AsTarget for T {
    fn as_target(&self) -> &dyn Any {
        self
    }

    fn as_target_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn target_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

impl AsTarget for dyn Any {
    fn as_target(&self) -> &dyn Any {
        self
    }

    fn as_target_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn target_name(&self) -> &'static str {
        "dyn Any"
    }
}

enum TargetRef<'a> {
    Shared(&'a dyn Any),
    Exclusive(&'a mut dyn Any),
}

/// Borrowed target of an [`AccessProxy`](crate::AccessProxy)
///
/// A shared borrow only supports read-only proxies; writable proxies need an
/// exclusive one.
pub struct ProxyTarget<'a> {
    inner: TargetRef<'a>,
    type_name: &'static str,
}

impl<'a> ProxyTarget<'a> {
    /// Borrow `target` for reading
    pub fn shared<T: AsTarget + ?Sized>(target: &'a T) -> Self {
        Self {
            type_name: T::target_name(target),
            inner: TargetRef::Shared(T::as_target(target)),
        }
    }

    /// Borrow `target` for reading and writing
    pub fn exclusive<T: AsTarget + ?Sized>(target: &'a mut T) -> Self {
        Self {
            type_name: T::target_name(target),
            inner: TargetRef::Exclusive(T::as_target_mut(target)),
        }
    }

    /// Check whether writes are possible through this borrow
    pub fn is_exclusive(&self) -> bool {
        matches!(self.inner, TargetRef::Exclusive(_))
    }

    /// Name of the borrowed type
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Read access to the target
    pub fn as_any(&self) -> &dyn Any {
        match &self.inner {
            TargetRef::Shared(target) => *target,
            TargetRef::Exclusive(target) => &**target,
        }
    }

    /// Write access to the target, if the borrow is exclusive
    pub fn as_any_mut(&mut self) -> Option<&mut dyn Any> {
        match &mut self.inner {
            TargetRef::Shared(_) => None,
            TargetRef::Exclusive(target) => Some(&mut **target),
        }
    }
}

impl<'a, T: AsTarget + ?Sized> From<&'a T> for ProxyTarget<'a> {
    fn from(target: &'a T) -> Self {
        Self::shared(target)
    }
}

impl<'a, T: AsTarget + ?Sized> From<&'a mut T> for ProxyTarget<'a> {
    fn from(target: &'a mut T) -> Self {
        Self::exclusive(target)
    }
}
