//! Error types for the triadic memory core.

use thiserror::Error;

/// Errors raised by the library.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TriadicError {
    /// The `n³` counter cube could not be allocated.
    #[error("cannot allocate counter cube for n={n} ({bytes} bytes)")]
    Allocation { n: usize, bytes: u128 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A position lies outside `[0, n)`.
    #[error("position {position} out of range for universe size {n}")]
    PositionOutOfRange { position: usize, n: usize },

    /// An SDR built over a different universe was passed to a memory.
    #[error("universe size mismatch: memory has n={expected}, SDR has n={found}")]
    UniverseMismatch { expected: usize, found: usize },

    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Wire-format error from the command protocol.
    #[error("{0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, TriadicError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let e = TriadicError::PositionOutOfRange { position: 12, n: 10 };
        assert_eq!(e.to_string(), "position 12 out of range for universe size 10");

        let e = TriadicError::Parse("expecting '{'".into());
        assert_eq!(e.to_string(), "expecting '{'");
    }
}
