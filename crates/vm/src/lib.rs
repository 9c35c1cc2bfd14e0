//! noast virtual machine: executes compiled programs.
//!
//! The VM is a stack machine with:
//! - An operand stack for intermediate values and function locals
//! - A call-frame stack recording return addresses and local bases
//! - Global memory holding variables, builtins and compiled functions
//!
//! # Usage
//!
//! ```
//! use noast_common::{Instruction, Literal, Program, TypeTag, Value};
//! use noast_vm::{Exit, Vm};
//!
//! let mut program = Program::new(vec![
//!     Instruction::Push(Literal::Int(6)),
//!     Instruction::Push(Literal::Int(7)),
//!     Instruction::Mul,
//!     Instruction::AssignGlobal("x".to_string()),
//! ]);
//! program.globals.declare("x", TypeTag::Int).unwrap();
//! program.memory.push(Value::Int(0));
//!
//! let mut vm = Vm::with_output(&program, Vec::new());
//! assert_eq!(vm.execute().unwrap(), Exit::Completed);
//! assert_eq!(vm.global("x"), Some(&Value::Int(42)));
//! ```
//!
//! # Calls
//!
//! `INVOKE k` finds its callee `k` slots below the top of the stack. A
//! builtin consumes the callee and its arguments. A user function keeps its
//! arguments on the stack as locals `0..k` and returns to the instruction
//! after the `INVOKE`, with the stack cut back to where the callee was.

pub mod builtins;
pub mod error;
pub mod execute;
pub mod machine;
pub mod trace;

pub use error::RuntimeError;
pub use machine::{CallFrame, Exit, Vm, MAX_CALL_DEPTH, MAX_STACK_DEPTH};
pub use trace::Tracer;

use noast_common::Program;

/// Execute a program with builtins writing to stdout.
///
/// # Errors
///
/// Returns [`RuntimeError`] if execution fails (unresolved name, type
/// mismatch, division by zero, etc.).
pub fn run(program: &Program) -> Result<Exit, RuntimeError> {
    Vm::new(program).execute()
}
