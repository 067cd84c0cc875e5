//! Replica models: sample records for the deep-copy engine
//!
//! Small domain types used by the integration tests and the CLI demo.
//! Each one opts into copying through `impl_composite!`, except
//! `ExternalHandle`, which is deliberately opaque.

pub use replica_core::{ObjectRef, Value};

pub mod node;

pub use node::Node;

use std::any::Any;

use replica_core::{impl_composite, Composite, CopyError, CopyResult, Field};

/// Postal address
#[derive(Debug, Clone, PartialEq)]
pub struct Address {
    pub city: String,
    pub zip: String,
}

impl_composite!(Address { city, zip });

impl Address {
    pub fn new(city: &str, zip: &str) -> Value {
        Value::object(Address {
            city: city.to_string(),
            zip: zip.to_string(),
        })
    }
}

/// Person with a nested address and a list of tags
pub struct Person {
    pub name: String,
    pub age: i32,
    pub address: Value,
    pub tags: Value,
}

impl_composite!(Person { name, age, address, tags });

impl Person {
    pub fn new(name: &str, age: i32, address: Value, tags: &[&str]) -> Value {
        Value::object(Person {
            name: name.to_string(),
            age,
            address,
            tags: Value::list(tags.iter().map(|t| Value::from(*t))),
        })
    }
}

/// Reader with a list of favourite books
pub struct Man {
    pub name: String,
    pub age: i32,
    pub favorite_books: Value,
}

impl_composite!(Man { name, age, favorite_books });

impl Man {
    pub fn new(name: &str, age: i32, books: &[&str]) -> Value {
        Value::object(Man {
            name: name.to_string(),
            age,
            favorite_books: Value::list(books.iter().map(|b| Value::from(*b))),
        })
    }
}

/// Handle to something living outside the value graph.
///
/// It exposes its fields but offers no constructor, so it cannot be copied.
pub struct ExternalHandle {
    pub token: String,
}

impl ExternalHandle {
    pub fn new(token: &str) -> Value {
        Value::object(ExternalHandle {
            token: token.to_string(),
        })
    }
}

impl Composite for ExternalHandle {
    fn type_name(&self) -> &'static str {
        "ExternalHandle"
    }

    fn fields(&self) -> Vec<Field> {
        vec![Field::fixed("token", self.token.as_str())]
    }

    fn set_field(&mut self, name: &str, _value: Value) -> CopyResult<()> {
        Err(CopyError::UnknownField {
            type_name: "ExternalHandle",
            field: name.to_string(),
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
