// Error taxonomy shared by every engine operation.

/// Recoverable errors across the engine's public APIs.
///
/// Malformed ranges are always reported, never silently swapped or clamped.
/// Degenerate but valid inputs (no usable weights, zero-size sampling) are
/// not errors; they produce defined empty results instead.
#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    /// A ranged operation received `max < min`.
    #[error("invalid range: {0}")]
    Range(String),
    /// Structurally invalid generator configuration.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    /// Unrecoverable missing or empty seed state.
    #[error("seed configuration: {0}")]
    Configuration(String),
}

/// Convenience alias for results using EngineError.
pub type Result<T> = std::result::Result<T, EngineError>;
