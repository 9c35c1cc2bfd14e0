//! Error types for the noast tokenizer and compiler.
//!
//! Every error is fatal: compilation stops at the first one and no partial
//! program is produced.

use thiserror::Error;

/// Errors produced while tokenizing source text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    /// Input ended inside a quoted string.
    #[error("line {line}: unterminated string literal")]
    UnterminatedString { line: usize },

    /// A character that starts no token.
    #[error("line {line}: unrecognized character '{ch}'")]
    UnrecognizedCharacter { line: usize, ch: char },
}

/// Errors produced while compiling source text to instructions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error(transparent)]
    Lex(#[from] LexError),

    /// A token appeared where something else was required.
    #[error("line {line}: expected {expected}, found {found}")]
    UnexpectedToken {
        line: usize,
        expected: &'static str,
        found: String,
    },

    /// An operator token with no instruction behind it (e.g. `<=`).
    #[error("line {line}: unknown operator '{op}'")]
    UnknownOperator { line: usize, op: String },

    /// A number literal that does not fit in an i64.
    #[error("line {line}: invalid number '{token}'")]
    InvalidNumber { line: usize, token: String },

    /// A type name that is not `int` or `string`.
    #[error("line {line}: unknown type '{name}'")]
    UnknownType { line: usize, name: String },

    /// `local` used in top-level code.
    #[error("line {line}: 'local' is only allowed inside a function body")]
    LocalOutsideFunction { line: usize },

    /// A local declared twice in the same function.
    #[error("line {line}: local '{name}' is already declared")]
    DuplicateLocal { line: usize, name: String },

    /// A function signature that names the same parameter twice.
    #[error("function '{function}': parameter '{name}' is already declared")]
    DuplicateParameter { function: String, name: String },

    /// A global declared twice, or a function defined twice.
    #[error("global '{name}' is already declared")]
    DuplicateGlobal { name: String },

    /// Expressions or blocks nested past `MAX_NESTING_DEPTH`.
    #[error(
        "line {line}: nesting exceeds {} levels",
        crate::parser::MAX_NESTING_DEPTH
    )]
    NestingTooDeep { line: usize },
}
