//! Replica Configuration
//!
//! Defines resource limits for a single deep copy.
//! Configuration specifies constraints only; enforcement is handled by the copier.

/// Copy configuration
#[derive(Debug, Clone)]
pub struct CopyConfig {
    /// Maximum number of containers and records a single copy may materialise.
    /// `None` means unbounded.
    pub max_nodes: Option<usize>,

    /// Initial capacity of a visited map created for a fresh copy
    pub visited_capacity: usize,
}

impl Default for CopyConfig {
    fn default() -> Self {
        CopyConfig {
            max_nodes: None,
            visited_capacity: 16,
        }
    }
}

impl CopyConfig {
    /// Create a new configuration with default limits
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_nodes(mut self, limit: usize) -> Self {
        self.max_nodes = Some(limit);
        self
    }

    pub fn with_visited_capacity(mut self, capacity: usize) -> Self {
        self.visited_capacity = capacity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_unbounded() {
        let cfg = CopyConfig::new();
        assert_eq!(cfg.max_nodes, None);
        assert_eq!(cfg.visited_capacity, 16);
    }

    #[test]
    fn builders_override_defaults() {
        let cfg = CopyConfig::new().with_max_nodes(3).with_visited_capacity(128);
        assert_eq!(cfg.max_nodes, Some(3));
        assert_eq!(cfg.visited_capacity, 128);
    }
}
