//! Runtime errors for the noast VM.
//!
//! Every error is fatal to the run and carries the index (`at`) of the
//! instruction that failed.

use noast_common::{NativeError, TypeTag};
use thiserror::Error;

/// Errors that occur during program execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// `LOAD_GLOBAL` or `ASSIGN_GLOBAL` on a name with no global slot.
    #[error("unresolved name '{name}' at instruction {at}")]
    UnresolvedName { at: usize, name: String },

    /// An operand, local slot or stored value had the wrong tag.
    #[error("type mismatch at instruction {at}: expected {expected}, found {found}")]
    TypeMismatch {
        at: usize,
        expected: TypeTag,
        found: TypeTag,
    },

    /// A call argument did not match the declared parameter type.
    #[error(
        "argument {index} of '{function}' must be {expected}, found {found} at instruction {at}"
    )]
    ArgumentTypeMismatch {
        at: usize,
        function: String,
        index: usize,
        expected: TypeTag,
        found: TypeTag,
    },

    /// A function was called with the wrong number of arguments.
    #[error("'{function}' expects {expected} argument(s), got {found} at instruction {at}")]
    ArityMismatch {
        at: usize,
        function: String,
        expected: usize,
        found: usize,
    },

    /// `INVOKE` found a callee that is neither a builtin nor a function.
    #[error("cannot invoke a value of type {found} at instruction {at}")]
    NotInvocable { at: usize, found: TypeTag },

    /// `RETURN` with no active call frame.
    #[error("return outside function at instruction {at}")]
    ReturnOutsideFunction { at: usize },

    /// A local access with no active call frame.
    #[error("local access outside function at instruction {at}")]
    NoActiveFrame { at: usize },

    /// A local slot beyond the top of the stack.
    #[error("local slot {slot} out of range at instruction {at}")]
    LocalOutOfRange { at: usize, slot: usize },

    /// Integer division by zero.
    #[error("division by zero at instruction {at}")]
    DivisionByZero { at: usize },

    /// Stack underflow (pop on empty stack).
    #[error("stack underflow at instruction {at}")]
    StackUnderflow { at: usize },

    /// Stack exceeded the maximum depth of 4096 slots.
    #[error("stack overflow at instruction {at}")]
    StackOverflow { at: usize },

    /// More than 1024 nested calls.
    #[error("call depth exceeded at instruction {at}")]
    CallDepthExceeded { at: usize },

    /// A builtin reported an error.
    #[error("builtin '{name}' failed at instruction {at}: {source}")]
    Native {
        at: usize,
        name: String,
        #[source]
        source: NativeError,
    },
}

impl RuntimeError {
    /// Index of the instruction that failed.
    pub fn at(&self) -> usize {
        match self {
            RuntimeError::UnresolvedName { at, .. }
            | RuntimeError::TypeMismatch { at, .. }
            | RuntimeError::ArgumentTypeMismatch { at, .. }
            | RuntimeError::ArityMismatch { at, .. }
            | RuntimeError::NotInvocable { at, .. }
            | RuntimeError::ReturnOutsideFunction { at }
            | RuntimeError::NoActiveFrame { at }
            | RuntimeError::LocalOutOfRange { at, .. }
            | RuntimeError::DivisionByZero { at }
            | RuntimeError::StackUnderflow { at }
            | RuntimeError::StackOverflow { at }
            | RuntimeError::CallDepthExceeded { at }
            | RuntimeError::Native { at, .. } => *at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formats() {
        assert_eq!(
            RuntimeError::DivisionByZero { at: 5 }.to_string(),
            "division by zero at instruction 5"
        );
        assert_eq!(
            RuntimeError::UnresolvedName {
                at: 0,
                name: "y".to_string()
            }
            .to_string(),
            "unresolved name 'y' at instruction 0"
        );
        assert_eq!(
            RuntimeError::TypeMismatch {
                at: 2,
                expected: TypeTag::Int,
                found: TypeTag::Str
            }
            .to_string(),
            "type mismatch at instruction 2: expected int, found string"
        );
        assert_eq!(
            RuntimeError::ArityMismatch {
                at: 7,
                function: "f".to_string(),
                expected: 1,
                found: 2
            }
            .to_string(),
            "'f' expects 1 argument(s), got 2 at instruction 7"
        );
    }

    #[test]
    fn native_error_is_the_source() {
        use std::error::Error;
        let e = RuntimeError::Native {
            at: 3,
            name: "print_one".to_string(),
            source: NativeError::Arity {
                expected: 1,
                found: 0,
            },
        };
        assert_eq!(
            e.to_string(),
            "builtin 'print_one' failed at instruction 3: expected 1 argument(s), got 0"
        );
        assert!(e.source().is_some());
        assert_eq!(e.at(), 3);
    }
}
