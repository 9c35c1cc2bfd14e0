//! noast common types.
//!
//! This crate provides the data model shared by the compiler and the VM:
//!
//! - [`Opcode`] and [`Instruction`]: the instruction set, one typed payload
//!   per opcode
//! - [`TypeTag`] and [`Value`]: tagged runtime values, including
//!   [`Builtin`] callbacks and compiled [`FunctionDescriptor`]s
//! - [`GlobalTable`] and [`LocalTable`]: the name registries
//! - [`Program`]: one flat instruction array plus global memory
//!
//! # Dependencies
//!
//! This crate uses `thiserror` for its error types and has no other
//! dependencies.

pub mod error;
pub mod instruction;
pub mod opcode;
pub mod program;
pub mod registry;
pub mod type_tag;
pub mod value;

// Re-export commonly used types at the crate root.
pub use error::{DeclareError, NativeError};
pub use instruction::{Instruction, Literal};
pub use opcode::Opcode;
pub use program::Program;
pub use registry::{GlobalTable, LocalTable, VariableInfo};
pub use type_tag::TypeTag;
pub use value::{Builtin, Flow, FunctionDescriptor, NativeFn, Value};
