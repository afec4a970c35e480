//! Resolvers for dynamic key/value records
//!
//! Records have no fixed shape, so nothing is cached: every resolution looks
//! at the keys present right now. Accessors are bound by key name and look
//! the key up again on each call.

use super::{restrict, GetterResolver, SetterResolver};
use crate::accessor::{Getter, GetterMap, PropNames, Setter, SetterMap};
use crate::error::{AccessError, AccessResult, AccessorKind};
use crate::value::{Record, Value};
use std::any::Any;

const TYPE_NAME: &str = "Record";

fn record(target: &dyn Any) -> AccessResult<&Record> {
    target
        .downcast_ref::<Record>()
        .ok_or(AccessError::TargetMismatch { expected: TYPE_NAME })
}

/// Read `key`, yielding `Null` if it has been removed since binding
fn key_getter(key: &str) -> Getter {
    let key = key.to_string();
    Getter::new(move |target| Ok(record(target)?.get(&key).cloned().unwrap_or(Value::Null)))
}

/// Write `key`, creating it when absent
fn key_setter(key: &str) -> Setter {
    let key = key.to_string();
    Setter::new(move |target, value| {
        target
            .downcast_mut::<Record>()
            .ok_or(AccessError::TargetMismatch { expected: TYPE_NAME })?
            .set(key.clone(), value);
        Ok(())
    })
}

/// Getter resolver for [`Record`] values
#[derive(Debug, Default, Clone, Copy)]
pub struct RecordGetterResolver;

impl GetterResolver for RecordGetterResolver {
    fn name(&self) -> &'static str {
        "record"
    }

    fn supports(&self, target: &dyn Any) -> bool {
        target.is::<Record>()
    }

    fn resolve_getters(
        &self,
        target: &dyn Any,
        props: Option<&PropNames>,
        ignore_inaccessible: bool,
    ) -> AccessResult<GetterMap> {
        let record = record(target)?;
        match props {
            None => Ok(record.keys().map(|key| (key.to_string(), key_getter(key))).collect()),
            Some(props) => restrict(AccessorKind::Getter, TYPE_NAME, props, ignore_inaccessible, |name| {
                record.contains(name).then(|| key_getter(name))
            }),
        }
    }
}

/// Setter resolver for [`Record`] values
///
/// Requested names are bound whether or not the key exists yet, so writing
/// through them adds the key.
#[derive(Debug, Default, Clone, Copy)]
pub struct RecordSetterResolver;

impl SetterResolver for RecordSetterResolver {
    fn name(&self) -> &'static str {
        "record"
    }

    fn supports(&self, target: &dyn Any) -> bool {
        target.is::<Record>()
    }

    fn resolve_setters(
        &self,
        target: &dyn Any,
        props: Option<&PropNames>,
        _ignore_inaccessible: bool,
    ) -> AccessResult<SetterMap> {
        let record = record(target)?;
        let setters = match props {
            None => record.keys().map(|key| (key.to_string(), key_setter(key))).collect(),
            Some(props) => props.iter().map(|name| (name.to_string(), key_setter(name))).collect(),
        };
        Ok(setters)
    }
}
