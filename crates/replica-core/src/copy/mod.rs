pub mod engine;
pub mod report;
pub mod visited;

mod worklist;

pub use engine::DeepCopier;
pub use report::CopyReport;
pub use visited::VisitedMap;

use std::rc::Rc;

use crate::config::CopyConfig;
use crate::error::CopyResult;
use crate::value::{ObjectRef, Value};

/// Deep-copies `value` with a fresh visited map and default limits.
pub fn deep_copy(value: &Value) -> CopyResult<Value> {
    deep_copy_with_config(value, CopyConfig::default())
}

/// Deep-copies `value` into the caller's identity space.
///
/// Originals already present in `visited` resolve to their earlier copies,
/// which merges several copy operations into one shared-identity graph.
pub fn deep_copy_with(value: &Value, visited: &mut VisitedMap) -> CopyResult<Value> {
    DeepCopier::new(CopyConfig::default(), visited).copy(value)
}

pub fn deep_copy_with_config(value: &Value, config: CopyConfig) -> CopyResult<Value> {
    let mut visited = VisitedMap::with_capacity(config.visited_capacity);
    DeepCopier::new(config, &mut visited).copy(value)
}

/// Typed shorthand for copying a single record handle.
pub fn deep_copy_object(object: &ObjectRef) -> CopyResult<ObjectRef> {
    match deep_copy(&Value::Object(Rc::clone(object)))? {
        Value::Object(copy) => Ok(copy),
        other => unreachable!("record copied as {}", other.kind().name()),
    }
}
