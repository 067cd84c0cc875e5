//! Replica Error Types
//!
//! Defines every condition that aborts a deep copy.
//! Errors are fatal to the copy that raised them; nothing is retried.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CopyError {
    // Shape errors
    #[error("type `{type_name}` has no full-field constructor and cannot be deep-copied")]
    UnsupportedShape { type_name: &'static str },

    #[error("field `{field}` of `{type_name}` is fixed after construction and holds a non-atomic value")]
    FieldAccessDenied {
        type_name: &'static str,
        field: &'static str,
    },

    // Field plumbing errors
    #[error("type `{type_name}` has no field named `{field}`")]
    UnknownField { type_name: &'static str, field: String },

    #[error("constructor of `{type_name}` expects field `{field}` which was not supplied")]
    MissingField {
        type_name: &'static str,
        field: &'static str,
    },

    #[error("field `{field}` of `{type_name}` expects {expected}, got {found}")]
    FieldTypeMismatch {
        type_name: &'static str,
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    // Source graph errors
    #[error("{kind} is mutably borrowed while being copied")]
    SourceBorrowed { kind: &'static str },

    // Resource limits
    #[error("copy exceeded the node limit of {limit}")]
    NodeLimitExceeded { limit: usize },
}

pub type CopyResult<T> = Result<T, CopyError>;
