//! Composite records
//!
//! A record opts into deep copying by implementing `Composite`: it enumerates
//! its fields, accepts field writes after construction and, unless it is
//! opaque, exposes a constructor taking every field by name.
//! `impl_composite!` generates all of that for plain structs.

use std::any::Any;
use std::rc::Rc;

use crate::error::{CopyError, CopyResult};
use crate::value::{ObjectRef, Value};

/// Builds a fresh record from a complete set of field values.
pub type Constructor = fn(FieldValues) -> CopyResult<ObjectRef>;

/// Whether a field can be overwritten after construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldAccess {
    Mutable,
    Fixed,
}

/// A named field and its current value
#[derive(Debug, Clone)]
pub struct Field {
    pub name: &'static str,
    pub value: Value,
    pub access: FieldAccess,
}

impl Field {
    pub fn mutable(name: &'static str, value: impl Into<Value>) -> Self {
        Field {
            name,
            value: value.into(),
            access: FieldAccess::Mutable,
        }
    }

    pub fn fixed(name: &'static str, value: impl Into<Value>) -> Self {
        Field {
            name,
            value: value.into(),
            access: FieldAccess::Fixed,
        }
    }
}

pub trait Composite: Any {
    /// Declared type name, used in error messages
    fn type_name(&self) -> &'static str;

    /// Every field with its current value, in declaration order
    fn fields(&self) -> Vec<Field>;

    /// Overwrites a field. Fixed fields may reject the write.
    fn set_field(&mut self, name: &str, value: Value) -> CopyResult<()>;

    /// Full-field constructor; `None` marks the type as opaque.
    fn constructor(&self) -> Option<Constructor> {
        None
    }

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Field values handed to a `Constructor`, looked up by name.
#[derive(Debug)]
pub struct FieldValues {
    type_name: &'static str,
    fields: Vec<Field>,
}

impl FieldValues {
    pub fn new(type_name: &'static str, fields: Vec<Field>) -> Self {
        FieldValues { type_name, fields }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Removes and returns the value of `name`.
    pub fn take(&mut self, name: &'static str) -> CopyResult<Value> {
        match self.fields.iter().position(|f| f.name == name) {
            Some(pos) => Ok(self.fields.swap_remove(pos).value),
            None => Err(CopyError::MissingField {
                type_name: self.type_name,
                field: name,
            }),
        }
    }

    pub fn take_as<T: FieldValue>(&mut self, name: &'static str) -> CopyResult<T> {
        let value = self.take(name)?;
        convert(self.type_name, name, value)
    }
}

/// Conversion between a typed struct field and `Value`.
pub trait FieldValue: Sized {
    /// Human-readable name of the accepted shape
    const EXPECTED: &'static str;

    fn to_value(&self) -> Value;

    /// Gives the value back on mismatch.
    fn from_value(value: Value) -> Result<Self, Value>;
}

/// Converts `value` for field `field` of `type_name`.
pub fn convert<T: FieldValue>(type_name: &'static str, field: &str, value: Value) -> CopyResult<T> {
    T::from_value(value).map_err(|rejected| CopyError::FieldTypeMismatch {
        type_name,
        field: field.to_string(),
        expected: T::EXPECTED,
        found: rejected.kind().name(),
    })
}

impl FieldValue for Value {
    const EXPECTED: &'static str = "any value";

    fn to_value(&self) -> Value {
        self.clone()
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        Ok(value)
    }
}

impl FieldValue for i64 {
    const EXPECTED: &'static str = "i64";

    fn to_value(&self) -> Value {
        Value::Int(*self)
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Int(i) => Ok(i),
            other => Err(other),
        }
    }
}

impl FieldValue for i32 {
    const EXPECTED: &'static str = "i32";

    fn to_value(&self) -> Value {
        Value::Int(i64::from(*self))
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Int(i) => i32::try_from(i).map_err(|_| Value::Int(i)),
            other => Err(other),
        }
    }
}

impl FieldValue for f64 {
    const EXPECTED: &'static str = "f64";

    fn to_value(&self) -> Value {
        Value::Float(*self)
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Float(x) => Ok(x),
            other => Err(other),
        }
    }
}

impl FieldValue for bool {
    const EXPECTED: &'static str = "bool";

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(other),
        }
    }
}

impl FieldValue for char {
    const EXPECTED: &'static str = "char";

    fn to_value(&self) -> Value {
        Value::Char(*self)
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Char(c) => Ok(c),
            other => Err(other),
        }
    }
}

impl FieldValue for Rc<str> {
    const EXPECTED: &'static str = "text";

    fn to_value(&self) -> Value {
        Value::Str(Rc::clone(self))
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Str(s) => Ok(s),
            other => Err(other),
        }
    }
}

impl FieldValue for String {
    const EXPECTED: &'static str = "text";

    fn to_value(&self) -> Value {
        Value::from(self.as_str())
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Str(s) => Ok(s.to_string()),
            other => Err(other),
        }
    }
}

/// Implements `Composite` for a struct whose fields all implement `FieldValue`.
///
/// Every listed field is mutable and the generated constructor takes each
/// field by its declared name.
///
/// ```
/// use replica_core::{impl_composite, Value};
///
/// struct Point {
///     x: i64,
///     y: i64,
/// }
///
/// impl_composite!(Point { x, y });
///
/// let p = Value::object(Point { x: 1, y: 2 });
/// let copy = replica_core::deep_copy(&p).unwrap();
/// assert_eq!(p, copy);
/// ```
#[macro_export]
macro_rules! impl_composite {
    ($ty:ident { $($field:ident),* $(,)? }) => {
        impl $crate::Composite for $ty {
            fn type_name(&self) -> &'static str {
                stringify!($ty)
            }

            fn fields(&self) -> ::std::vec::Vec<$crate::Field> {
                ::std::vec![
                    $($crate::Field::mutable(
                        stringify!($field),
                        $crate::FieldValue::to_value(&self.$field),
                    )),*
                ]
            }

            fn set_field(&mut self, name: &str, value: $crate::Value) -> $crate::CopyResult<()> {
                match name {
                    $(stringify!($field) => {
                        self.$field = $crate::composite::convert(stringify!($ty), name, value)?;
                        Ok(())
                    })*
                    _ => Err($crate::CopyError::UnknownField {
                        type_name: stringify!($ty),
                        field: name.to_string(),
                    }),
                }
            }

            fn constructor(&self) -> ::std::option::Option<$crate::Constructor> {
                #[allow(unused_mut, unused_variables)]
                fn construct(mut args: $crate::FieldValues) -> $crate::CopyResult<$crate::ObjectRef> {
                    let record = $ty {
                        $($field: args.take_as(stringify!($field))?,)*
                    };
                    Ok($crate::object_ref(record))
                }
                Some(construct)
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }
        }
    };
}
