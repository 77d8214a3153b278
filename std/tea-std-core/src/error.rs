///
/// Runtime error types.
///
/// Records originate exactly two kinds of error, both at the point where a
/// caller precondition is violated. Native behavior errors pass through the
/// call wrapper untouched as `BehaviorError`.
///

use thiserror::Error;

/// Failure to build a record from its key and value sequences.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructionError {
    #[error("Expected keys and values to be the same length (got {keys} keys and {values} values)")]
    LengthMismatch { keys: usize, values: usize },
}

/// Failure to resolve a key on an existing record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("Key not found: {key}")]
    KeyNotFound { key: String },
}

/// Whatever a wrapped native behavior reports. Opaque to the runtime.
pub type BehaviorError = Box<dyn std::error::Error + Send + Sync>;

/// Result of invoking a native behavior through any call shape.
pub type CallResult = Result<(), BehaviorError>;
