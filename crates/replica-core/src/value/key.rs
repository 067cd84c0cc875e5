//! Identity tokens and set/map keys
//!
//! Handles (containers and records) are keyed by address; atomics by content.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem;
use std::rc::Rc;

use super::value::Value;

/// Stable address of a shared handle.
///
/// Only meaningful while the handle is alive; `VisitedMap` keeps originals
/// alive for exactly that reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity(usize);

impl Identity {
    pub fn of<T: ?Sized>(handle: &Rc<T>) -> Self {
        Identity(Rc::as_ptr(handle) as *const () as usize)
    }

    pub fn addr(self) -> usize {
        self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{:#x}", self.0)
    }
}

/// Element of a `Set` or key of a `Map`.
///
/// Two distinct handles never compare equal here, even when their contents do;
/// structural comparison is left to `PartialEq for Value`.
#[derive(Clone)]
pub struct ValueKey(Value);

impl ValueKey {
    pub fn new(value: Value) -> Self {
        ValueKey(value)
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for ValueKey {
    fn from(value: Value) -> Self {
        ValueKey(value)
    }
}

impl PartialEq for ValueKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.same(&other.0)
    }
}

impl Eq for ValueKey {}

impl Hash for ValueKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        mem::discriminant(&self.0).hash(state);
        match &self.0 {
            Value::Null => {}
            Value::Bool(b) => b.hash(state),
            Value::Int(i) => i.hash(state),
            Value::Float(x) => x.to_bits().hash(state),
            Value::Char(c) => c.hash(state),
            Value::Str(s) => s.hash(state),
            Value::Enum(e) => e.hash(state),
            handle => handle.identity().hash(state),
        }
    }
}

impl fmt::Debug for ValueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn atomics_key_by_content() {
        let mut keys = HashSet::new();
        assert!(keys.insert(ValueKey::new(Value::str("a"))));
        assert!(!keys.insert(ValueKey::new(Value::str("a"))));
        assert!(keys.insert(ValueKey::new(Value::Int(1))));
        // Int and Float never alias
        assert!(keys.insert(ValueKey::new(Value::Float(1.0))));
    }

    #[test]
    fn equal_handles_stay_distinct() {
        let a = Value::list([Value::Int(1)]);
        let b = Value::list([Value::Int(1)]);
        assert_eq!(a, b);
        assert_ne!(ValueKey::new(a.clone()), ValueKey::new(b));
        assert_eq!(ValueKey::new(a.clone()), ValueKey::new(a));
    }
}
