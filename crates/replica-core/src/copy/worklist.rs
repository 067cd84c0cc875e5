//! Copy Work-List
//!
//! Pending fill jobs for shells that are registered but not yet populated.
//! No copy semantics.

use crate::value::{ArrayRef, ListRef, MapRef, ObjectRef, SetRef};

/// A registered shell paired with the original it must be filled from
pub(crate) enum Job {
    List { src: ListRef, dst: ListRef },
    Set { src: SetRef, dst: SetRef },
    Map { src: MapRef, dst: MapRef },
    Array { src: ArrayRef, dst: ArrayRef },
    Record { src: ObjectRef, dst: ObjectRef },
}

/// LIFO queue of fill jobs
#[derive(Default)]
pub(crate) struct WorkList {
    jobs: Vec<Job>,
    peak: usize,
}

impl WorkList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, job: Job) {
        self.jobs.push(job);
        self.peak = self.peak.max(self.jobs.len());
    }

    pub fn pop(&mut self) -> Option<Job> {
        self.jobs.pop()
    }

    /// Largest number of jobs pending at once
    pub fn peak(&self) -> usize {
        self.peak
    }

    pub fn clear(&mut self) {
        self.jobs.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn list_job() -> Job {
        Job::List {
            src: Rc::new(RefCell::new(Vec::new())),
            dst: Rc::new(RefCell::new(Vec::new())),
        }
    }

    #[test]
    fn tracks_peak_depth() {
        let mut work = WorkList::new();
        work.push(list_job());
        work.push(list_job());
        assert!(work.pop().is_some());
        work.push(list_job());
        assert_eq!(work.peak(), 2);

        work.clear();
        assert!(work.pop().is_none());
        assert_eq!(work.peak(), 2);
    }
}
