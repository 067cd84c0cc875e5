pub mod key;
pub mod value;

mod debug;
mod eq;

pub use key::{Identity, ValueKey};
pub use value::{
    object_ref, ArrayRef, EnumConst, ListRef, MapRef, ObjectRef, SetRef, Value, ValueKind,
};
