//! Deep-Copy Engine
//!
//! Identity-memoized traversal driven by an explicit work-list.
//!
//! Resolving a handle never recurses: it allocates a shell of the same shape,
//! registers it in the visited map and queues a job to fill it. Any later
//! reference to the same original, including one from inside its own
//! contents, resolves to that shell. The native stack depth stays constant
//! regardless of how deep the source graph is.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use indexmap::{IndexMap, IndexSet};

use crate::composite::{FieldAccess, FieldValues};
use crate::config::CopyConfig;
use crate::error::{CopyError, CopyResult};
use crate::value::{ObjectRef, Value, ValueKey};

use super::report::CopyReport;
use super::visited::VisitedMap;
use super::worklist::{Job, WorkList};

/// Deep copier bound to one visited map
pub struct DeepCopier<'m> {
    config: CopyConfig,
    visited: &'m mut VisitedMap,
    pending: WorkList,
    report: CopyReport,
    /// `report.nodes()` when the current call started
    nodes_before: usize,
}

impl<'m> DeepCopier<'m> {
    pub fn new(config: CopyConfig, visited: &'m mut VisitedMap) -> Self {
        DeepCopier {
            config,
            visited,
            pending: WorkList::new(),
            report: CopyReport::default(),
            nodes_before: 0,
        }
    }

    /// Counters accumulated over every `copy` call on this copier
    pub fn report(&self) -> CopyReport {
        CopyReport {
            peak_pending: self.pending.peak(),
            ..self.report
        }
    }

    /// Copies `value`.
    ///
    /// `max_nodes` bounds the containers and records materialised by this
    /// call alone.
    ///
    /// On failure every visited entry added by this call is removed again,
    /// so the map is left as it was before the call.
    pub fn copy(&mut self, value: &Value) -> CopyResult<Value> {
        let checkpoint = self.visited.checkpoint();
        self.nodes_before = self.report.nodes();
        tracing::debug!(
            kind = value.kind().name(),
            visited = checkpoint,
            "deep copy started"
        );

        match self.run(value) {
            Ok(copy) => {
                tracing::debug!(
                    containers = self.report.containers,
                    records = self.report.records,
                    atomics = self.report.atomics,
                    memo_hits = self.report.memo_hits,
                    peak_pending = self.pending.peak(),
                    "deep copy finished"
                );
                Ok(copy)
            }
            Err(err) => {
                self.pending.clear();
                let discarded = self.visited.len() - checkpoint;
                self.visited.rollback(checkpoint);
                tracing::debug!(%err, discarded, "deep copy failed, visited entries rolled back");
                Err(err)
            }
        }
    }

    fn run(&mut self, value: &Value) -> CopyResult<Value> {
        let root = self.resolve(value)?;
        while let Some(job) = self.pending.pop() {
            self.fill(job)?;
        }
        Ok(root)
    }

    /// Returns the copy of `original`: the value itself for atomics, the
    /// registered copy for a revisited handle, or a fresh registered shell.
    fn resolve(&mut self, original: &Value) -> CopyResult<Value> {
        let Some(id) = original.identity() else {
            self.report.atomics += 1;
            return Ok(original.clone());
        };

        if let Some(copy) = self.visited.get(id) {
            self.report.memo_hits += 1;
            tracing::trace!(%id, "memo hit");
            return Ok(copy.clone());
        }

        if let Some(limit) = self.config.max_nodes {
            if self.report.nodes() - self.nodes_before >= limit {
                return Err(CopyError::NodeLimitExceeded { limit });
            }
        }

        let (shell, job) = self.allocate(original)?;
        // Register before any child is resolved: children may lead back here.
        self.visited.register(original, &shell);
        self.pending.push(job);
        tracing::trace!(%id, kind = original.kind().name(), "shell registered");
        Ok(shell)
    }

    fn allocate(&mut self, original: &Value) -> CopyResult<(Value, Job)> {
        let allocated = match original {
            Value::List(src) => {
                let len = borrow(src, "List")?.len();
                let dst = Rc::new(RefCell::new(Vec::with_capacity(len)));
                let job = Job::List {
                    src: Rc::clone(src),
                    dst: Rc::clone(&dst),
                };
                (Value::List(dst), job)
            }
            Value::Set(src) => {
                let len = borrow(src, "Set")?.len();
                let dst = Rc::new(RefCell::new(IndexSet::with_capacity(len)));
                let job = Job::Set {
                    src: Rc::clone(src),
                    dst: Rc::clone(&dst),
                };
                (Value::Set(dst), job)
            }
            Value::Map(src) => {
                let len = borrow(src, "Map")?.len();
                let dst = Rc::new(RefCell::new(IndexMap::with_capacity(len)));
                let job = Job::Map {
                    src: Rc::clone(src),
                    dst: Rc::clone(&dst),
                };
                (Value::Map(dst), job)
            }
            Value::Array(src) => {
                let len = borrow(src, "Array")?.len();
                let slots: Box<[Value]> = vec![Value::Null; len].into_boxed_slice();
                let dst = Rc::new(RefCell::new(slots));
                let job = Job::Array {
                    src: Rc::clone(src),
                    dst: Rc::clone(&dst),
                };
                (Value::Array(dst), job)
            }
            Value::Object(src) => {
                let dst = scaffold(src)?;
                self.report.records += 1;
                let job = Job::Record {
                    src: Rc::clone(src),
                    dst: Rc::clone(&dst),
                };
                return Ok((Value::Object(dst), job));
            }
            atomic => unreachable!("{} has no identity to allocate", atomic.kind().name()),
        };
        self.report.containers += 1;
        Ok(allocated)
    }

    fn fill(&mut self, job: Job) -> CopyResult<()> {
        match job {
            Job::List { src, dst } => {
                let items = borrow(&src, "List")?.clone();
                let mut copies = Vec::with_capacity(items.len());
                for item in &items {
                    copies.push(self.resolve(item)?);
                }
                *borrow_mut(&dst, "List")? = copies;
            }
            Job::Set { src, dst } => {
                let items: Vec<Value> = borrow(&src, "Set")?
                    .iter()
                    .map(|k| k.value().clone())
                    .collect();
                let mut copies = IndexSet::with_capacity(items.len());
                for item in &items {
                    copies.insert(ValueKey::new(self.resolve(item)?));
                }
                *borrow_mut(&dst, "Set")? = copies;
            }
            Job::Map { src, dst } => {
                let entries: Vec<(Value, Value)> = borrow(&src, "Map")?
                    .iter()
                    .map(|(k, v)| (k.value().clone(), v.clone()))
                    .collect();
                let mut copies = IndexMap::with_capacity(entries.len());
                for (key, value) in &entries {
                    let key = self.resolve(key)?;
                    let value = self.resolve(value)?;
                    copies.insert(ValueKey::new(key), value);
                }
                *borrow_mut(&dst, "Map")? = copies;
            }
            Job::Array { src, dst } => {
                let items = borrow(&src, "Array")?.clone();
                let mut copies = Vec::with_capacity(items.len());
                for item in items.iter() {
                    copies.push(self.resolve(item)?);
                }
                *borrow_mut(&dst, "Array")? = copies.into_boxed_slice();
            }
            Job::Record { src, dst } => self.fill_record(&src, &dst)?,
        }
        Ok(())
    }

    /// Overwrites every scaffold field with the copy of the original's field.
    fn fill_record(&mut self, src: &ObjectRef, dst: &ObjectRef) -> CopyResult<()> {
        let (type_name, fields) = {
            let record = borrow(src, "Object")?;
            (record.type_name(), record.fields())
        };

        for field in fields {
            match field.access {
                FieldAccess::Mutable => {
                    let copy = self.resolve(&field.value)?;
                    borrow_mut(dst, "Object")?.set_field(field.name, copy)?;
                }
                // The scaffold already holds the shared atomic.
                FieldAccess::Fixed if field.value.is_atomic() => {}
                FieldAccess::Fixed => {
                    return Err(CopyError::FieldAccessDenied {
                        type_name,
                        field: field.name,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Builds the new record from the original's uncopied field values.
fn scaffold(src: &ObjectRef) -> CopyResult<ObjectRef> {
    let (construct, args) = {
        let record = borrow(src, "Object")?;
        let type_name = record.type_name();
        let construct = record
            .constructor()
            .ok_or(CopyError::UnsupportedShape { type_name })?;
        (construct, FieldValues::new(type_name, record.fields()))
    };
    construct(args)
}

fn borrow<'a, T: ?Sized>(cell: &'a RefCell<T>, kind: &'static str) -> CopyResult<Ref<'a, T>> {
    cell.try_borrow()
        .map_err(|_| CopyError::SourceBorrowed { kind })
}

fn borrow_mut<'a, T: ?Sized>(
    cell: &'a RefCell<T>,
    kind: &'static str,
) -> CopyResult<RefMut<'a, T>> {
    cell.try_borrow_mut()
        .map_err(|_| CopyError::SourceBorrowed { kind })
}
