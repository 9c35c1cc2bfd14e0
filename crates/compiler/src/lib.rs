//! noast compiler: source text to a flat instruction array in one pass.
//!
//! The tokenizer feeds a recursive-descent parser that emits instructions
//! as it recognizes them. There is no syntax tree and no optimization.
//!
//! # Usage
//!
//! ```
//! use noast_common::{Instruction, Literal};
//! use noast_compiler::compile;
//!
//! let program = compile("x = 1 + 2").unwrap();
//! assert_eq!(
//!     program.instructions,
//!     vec![
//!         Instruction::Push(Literal::Int(1)),
//!         Instruction::Push(Literal::Int(2)),
//!         Instruction::Add,
//!         Instruction::AssignGlobal("x".to_string()),
//!     ]
//! );
//! ```
//!
//! # Grammar
//!
//! Binary operators have no precedence and associate to the right, so
//! `10 - 3 - 2` means `10 - (3 - 2)`. Use separate assignments to force a
//! different grouping. Nesting is capped at [`MAX_NESTING_DEPTH`] levels.
//!
//! # Programs with functions
//!
//! [`ProgramBuilder`] declares globals, builtins and functions before the
//! top-level code is compiled. [`compile_script`] does the same from a
//! single source text with `var` and `func` declarations at the top.

pub mod error;
pub mod token;

mod builder;
mod disassembler;
mod lexer;
mod parser;
mod script;

pub use builder::{FunctionSignature, ProgramBuilder};
pub use disassembler::disassemble;
pub use error::{CompileError, LexError};
pub use lexer::{tokenize, Tokenizer};
pub use parser::MAX_NESTING_DEPTH;
pub use script::compile_script;
pub use token::{Token, TokenKind};

use noast_common::Program;

/// Compile top-level code with no declared globals.
///
/// Every name resolves to a global at runtime, so the program only runs
/// against a VM whose globals declare those names. Use [`ProgramBuilder`]
/// to declare them.
pub fn compile(source: &str) -> Result<Program, CompileError> {
    ProgramBuilder::new().build(source)
}
