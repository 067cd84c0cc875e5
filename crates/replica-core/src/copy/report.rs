//! Copy report
//!
//! Counters collected by a `DeepCopier` over its lifetime.

use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyReport {
    /// Atomic values passed through by sharing
    pub atomics: usize,
    /// Containers materialised
    pub containers: usize,
    /// Records materialised
    pub records: usize,
    /// Lookups answered by the visited map (shared or cyclic references)
    pub memo_hits: usize,
    /// Largest number of fill jobs pending at once
    pub peak_pending: usize,
}

impl CopyReport {
    /// Containers plus records
    pub fn nodes(&self) -> usize {
        self.containers + self.records
    }
}

impl fmt::Display for CopyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} containers, {} records, {} atomics shared, {} memo hits, peak work-list {}",
            self.containers, self.records, self.atomics, self.memo_hits, self.peak_pending
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_summarises_counters() {
        let report = CopyReport {
            atomics: 4,
            containers: 2,
            records: 3,
            memo_hits: 1,
            peak_pending: 2,
        };
        assert_eq!(report.nodes(), 5);
        assert_eq!(
            report.to_string(),
            "2 containers, 3 records, 4 atomics shared, 1 memo hits, peak work-list 2"
        );
    }
}
