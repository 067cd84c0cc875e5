//! Value Representation
//!
//! Defines the values the copier walks: atomics, shared containers and
//! composite records. Containers and records are `Rc<RefCell<..>>` handles so
//! that sharing and cycles are representable.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::{IndexMap, IndexSet};

use crate::composite::Composite;

use super::key::{Identity, ValueKey};

pub type ListRef = Rc<RefCell<Vec<Value>>>;
pub type SetRef = Rc<RefCell<IndexSet<ValueKey>>>;
pub type MapRef = Rc<RefCell<IndexMap<ValueKey, Value>>>;
pub type ArrayRef = Rc<RefCell<Box<[Value]>>>;
pub type ObjectRef = Rc<RefCell<dyn Composite>>;

/// Enumerated constant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnumConst {
    pub type_name: &'static str,
    pub variant: &'static str,
}

/// Runtime value
#[derive(Clone, Default)]
pub enum Value {
    /// Absence of a value
    #[default]
    Null,

    Bool(bool),
    Int(i64),
    Float(f64),
    Char(char),

    /// Immutable text; copies share the allocation
    Str(Rc<str>),

    Enum(EnumConst),

    /// Ordered sequence
    List(ListRef),

    /// Insertion-ordered set
    Set(SetRef),

    /// Insertion-ordered key/value mapping
    Map(MapRef),

    /// Fixed-size indexed array
    Array(ArrayRef),

    /// Composite record
    Object(ObjectRef),
}

/// Shape of a value, without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Float,
    Char,
    Str,
    Enum,
    List,
    Set,
    Map,
    Array,
    Object,
}

impl ValueKind {
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Null => "Null",
            ValueKind::Bool => "Bool",
            ValueKind::Int => "Int",
            ValueKind::Float => "Float",
            ValueKind::Char => "Char",
            ValueKind::Str => "Str",
            ValueKind::Enum => "Enum",
            ValueKind::List => "List",
            ValueKind::Set => "Set",
            ValueKind::Map => "Map",
            ValueKind::Array => "Array",
            ValueKind::Object => "Object",
        }
    }

    /// Atomics are immutable and copied by sharing
    pub fn is_atomic(self) -> bool {
        !matches!(
            self,
            ValueKind::List | ValueKind::Set | ValueKind::Map | ValueKind::Array | ValueKind::Object
        )
    }
}

impl Value {
    pub fn str(text: impl Into<Rc<str>>) -> Self {
        Value::Str(text.into())
    }

    pub fn enumeration(type_name: &'static str, variant: &'static str) -> Self {
        Value::Enum(EnumConst { type_name, variant })
    }

    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Value::List(Rc::new(RefCell::new(items.into_iter().collect())))
    }

    /// Builds a set; later duplicates (by `ValueKey` equality) are dropped.
    pub fn set(items: impl IntoIterator<Item = Value>) -> Self {
        let items: IndexSet<ValueKey> = items.into_iter().map(ValueKey::new).collect();
        Value::Set(Rc::new(RefCell::new(items)))
    }

    /// Builds a map; a repeated key keeps its first position and last value.
    pub fn map(entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
        let entries: IndexMap<ValueKey, Value> = entries
            .into_iter()
            .map(|(k, v)| (ValueKey::new(k), v))
            .collect();
        Value::Map(Rc::new(RefCell::new(entries)))
    }

    pub fn array(items: impl IntoIterator<Item = Value>) -> Self {
        let items: Vec<Value> = items.into_iter().collect();
        Value::Array(Rc::new(RefCell::new(items.into_boxed_slice())))
    }

    pub fn object<T: Composite>(record: T) -> Self {
        Value::Object(object_ref(record))
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Char(_) => ValueKind::Char,
            Value::Str(_) => ValueKind::Str,
            Value::Enum(_) => ValueKind::Enum,
            Value::List(_) => ValueKind::List,
            Value::Set(_) => ValueKind::Set,
            Value::Map(_) => ValueKind::Map,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }

    /// Declared type of a record, otherwise the kind name.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Object(object) => match object.try_borrow() {
                Ok(record) => record.type_name(),
                Err(_) => ValueKind::Object.name(),
            },
            Value::Enum(e) => e.type_name,
            other => other.kind().name(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_atomic(&self) -> bool {
        self.kind().is_atomic()
    }

    /// Address token of a container or record; `None` for atomics.
    pub fn identity(&self) -> Option<Identity> {
        match self {
            Value::List(items) => Some(Identity::of(items)),
            Value::Set(items) => Some(Identity::of(items)),
            Value::Map(entries) => Some(Identity::of(entries)),
            Value::Array(items) => Some(Identity::of(items)),
            Value::Object(object) => Some(Identity::of(object)),
            _ => None,
        }
    }

    /// Identity for handles, content equality for atomics.
    ///
    /// Floats compare by bit pattern so that `same` agrees with hashing.
    pub fn same(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Enum(a), Value::Enum(b)) => a == b,
            (a, b) => match (a.identity(), b.identity()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ListRef> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&SetRef> {
        match self {
            Value::Set(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&MapRef> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayRef> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Runs `f` against the concrete record behind this value.
    ///
    /// Returns `None` for non-objects, objects of another type, and objects
    /// currently borrowed mutably.
    pub fn downcast<T: Composite, R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        let object = self.as_object()?;
        let record = object.try_borrow().ok()?;
        record.as_any().downcast_ref::<T>().map(f)
    }

    pub fn downcast_mut<T: Composite, R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let object = self.as_object()?;
        let mut record = object.try_borrow_mut().ok()?;
        record.as_any_mut().downcast_mut::<T>().map(f)
    }
}

/// Wraps a record in a shared handle.
pub fn object_ref<T: Composite>(record: T) -> ObjectRef {
    Rc::new(RefCell::new(record))
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::Char(c)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(Rc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Rc::from(s))
    }
}

impl From<Rc<str>> for Value {
    fn from(s: Rc<str>) -> Self {
        Value::Str(s)
    }
}

impl From<ObjectRef> for Value {
    fn from(object: ObjectRef) -> Self {
        Value::Object(object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atomics_have_no_identity() {
        for v in [
            Value::Null,
            Value::Bool(true),
            Value::Int(42),
            Value::Float(1.5),
            Value::Char('x'),
            Value::str("Hello"),
            Value::enumeration("Color", "Red"),
        ] {
            assert!(v.is_atomic(), "{:?}", v);
            assert_eq!(v.identity(), None);
        }
    }

    #[test]
    fn handles_have_identity() {
        let list = Value::list([Value::Int(1)]);
        let alias = list.clone();
        assert_eq!(list.identity(), alias.identity());
        assert!(list.same(&alias));

        let other = Value::list([Value::Int(1)]);
        assert_ne!(list.identity(), other.identity());
        assert!(!list.same(&other));
    }

    #[test]
    fn set_drops_duplicate_atomics() {
        let set = Value::set([Value::Int(1), Value::Int(2), Value::Int(1)]);
        assert_eq!(set.as_set().map(|s| s.borrow().len()), Some(2));
    }

    #[test]
    fn map_keeps_last_value_for_repeated_key() {
        let map = Value::map([
            (Value::str("k"), Value::Int(1)),
            (Value::str("k"), Value::Int(2)),
        ]);
        let entries = map.as_map().map(|m| m.borrow().clone());
        let entries = entries.expect("map");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries.get(&ValueKey::new(Value::str("k"))), Some(&Value::Int(2)));
    }

    #[test]
    fn type_name_falls_back_to_kind() {
        assert_eq!(Value::Int(3).type_name(), "Int");
        assert_eq!(Value::enumeration("Color", "Red").type_name(), "Color");
        assert_eq!(Value::array([]).type_name(), "Array");
    }
}
