//! Error types and `error_stack` result aliases

use thiserror::Error;

/// Result type for type-signature resolution
pub type TypeResult<T> = Result<T, error_stack::Report<TypeError>>;

/// Result type for path-based property mutation
pub type MutationResult<T> = Result<T, error_stack::Report<MutationError>>;

/// Result type for configuration and schema loading
pub type ConfigResult<T> = Result<T, error_stack::Report<ConfigError>>;

/// Failures of the type-name resolver
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    /// No grammar branch and no registry lookup matched the name
    #[error("Unknown type: {0}")]
    UnknownType(String),

    /// The signature text does not follow the type grammar
    #[error("Malformed type signature: {0}")]
    MalformedSignature(String),
}

impl TypeError {
    /// Create a `MalformedSignature` error describing what is wrong with `signature`
    #[must_use]
    pub fn malformed(signature: &str, details: impl std::fmt::Display) -> Self {
        Self::MalformedSignature(format!("'{signature}': {details}"))
    }
}

/// Failures of the path-based mutator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MutationError {
    /// A path segment names a field the struct or class does not declare
    #[error("Property '{field}' not found in {owner}")]
    FieldNotFound {
        /// The segment that failed to match
        field: String,
        /// The struct or class that was searched
        owner: String,
    },

    /// A path segment used against an array or set is not a non-negative integer
    #[error("Invalid container index '{segment}'")]
    IndexInvalid {
        /// The offending segment
        segment: String,
    },

    /// The path continues below a leaf value
    #[error("Cannot set sub-property of {kind} value at '{path}'")]
    CannotDescend {
        /// The path consumed up to and including the leaf
        path: String,
        /// Kind of the leaf
        kind: String,
    },

    /// The path ran out on a value that needs a further segment, or was empty
    #[error("Property path '{path}' ends on a {kind} value")]
    PathExhausted {
        /// The full path
        path: String,
        /// Kind of the value the path ended on
        kind: String,
    },

    /// The value kind does not support path mutation
    #[error("Cannot mutate through {kind} values")]
    UnsupportedKind {
        /// Kind that rejected the mutation
        kind: String,
    },

    /// The raw string does not parse as the slot's kind
    #[error("Invalid value '{raw}' for {expected}")]
    InvalidValue {
        /// The raw string supplied by the caller
        raw:      String,
        /// Human-readable description of what was expected
        expected: String,
    },

    /// An object reference identity did not load
    #[error("No {class} object found at '{identity}'")]
    ObjectNotFound {
        /// Class the reference is constrained to
        class:    String,
        /// Identity string supplied by the caller
        identity: String,
    },

    /// The host refused an access to a slot it previously described
    #[error("Host rejected access to slot {slot}")]
    SlotUnavailable {
        /// Rendering of the slot address
        slot: String,
    },
}

impl MutationError {
    /// Create an `InvalidValue` error
    #[must_use]
    pub fn invalid_value(raw: &str, expected: impl std::fmt::Display) -> Self {
        Self::InvalidValue {
            raw:      raw.to_string(),
            expected: expected.to_string(),
        }
    }

    /// Create a `SlotUnavailable` error
    #[must_use]
    pub fn slot_unavailable(slot: impl std::fmt::Display) -> Self {
        Self::SlotUnavailable {
            slot: slot.to_string(),
        }
    }
}

/// Failures while loading configuration or schema documents
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("File operation failed: {0}")]
    Io(String),

    /// The document is not valid JSON for the expected shape
    #[error("Unable to parse document: {0}")]
    Parse(String),

    /// The document parsed but describes an inconsistent schema
    #[error("Schema processing error: {0}")]
    Schema(String),
}
