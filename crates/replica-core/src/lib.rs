//! Replica - Core Library
//!
//! Public API surface for cycle-safe deep copying of value graphs.

pub mod error;
pub mod config;
pub mod value;
pub mod composite;
pub mod copy;

// Re-export commonly used types
pub use error::{CopyError, CopyResult};
pub use config::CopyConfig;
pub use value::{
    object_ref, ArrayRef, EnumConst, Identity, ListRef, MapRef, ObjectRef, SetRef, Value,
    ValueKey, ValueKind,
};
pub use composite::{Composite, Constructor, Field, FieldAccess, FieldValue, FieldValues};
pub use copy::{
    deep_copy, deep_copy_object, deep_copy_with, deep_copy_with_config, CopyReport, DeepCopier,
    VisitedMap,
};
