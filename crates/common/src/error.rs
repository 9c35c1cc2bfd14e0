//! Errors shared across the noast crates.

use thiserror::Error;

use crate::type_tag::TypeTag;

/// Errors from declaring a name in a [`GlobalTable`](crate::GlobalTable) or
/// [`LocalTable`](crate::LocalTable).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeclareError {
    #[error("'{name}' is already declared")]
    Duplicate { name: String },
}

/// Errors a native callback can report back to the VM.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NativeError {
    /// The callback was given the wrong number of arguments.
    #[error("expected {expected} argument(s), got {found}")]
    Arity { expected: usize, found: usize },

    /// An argument had the wrong type.
    #[error("argument {index} must be {expected}, got {found}")]
    ArgumentType {
        index: usize,
        expected: TypeTag,
        found: TypeTag,
    },

    /// Writing to the output sink failed.
    #[error("output failed: {0}")]
    Io(String),
}

impl From<std::io::Error> for NativeError {
    fn from(e: std::io::Error) -> Self {
        NativeError::Io(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_duplicate() {
        let e = DeclareError::Duplicate {
            name: "x".to_string(),
        };
        assert_eq!(e.to_string(), "'x' is already declared");
    }

    #[test]
    fn display_native_arity() {
        assert_eq!(
            NativeError::Arity {
                expected: 1,
                found: 3
            }
            .to_string(),
            "expected 1 argument(s), got 3"
        );
    }

    #[test]
    fn display_native_argument_type() {
        assert_eq!(
            NativeError::ArgumentType {
                index: 0,
                expected: TypeTag::Int,
                found: TypeTag::Str
            }
            .to_string(),
            "argument 0 must be int, got string"
        );
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        assert_eq!(
            NativeError::from(io),
            NativeError::Io("pipe closed".to_string())
        );
    }
}
