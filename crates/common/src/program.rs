//! A compiled noast program.
//!
//! All function bodies and the top-level code share one flat instruction
//! array. Function bodies come first; top-level code starts at `entry` and
//! runs to the end of the array.

use std::rc::Rc;

use crate::instruction::Instruction;
use crate::registry::GlobalTable;
use crate::value::{FunctionDescriptor, Value};

/// A compiled program: code, global names, and initial global memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    /// The shared instruction array.
    pub instructions: Vec<Instruction>,
    /// Names and declared types of every global slot.
    pub globals: GlobalTable,
    /// Initial contents of global memory, one value per global slot.
    pub memory: Vec<Value>,
    /// Index of the first top-level instruction.
    pub entry: usize,
}

impl Program {
    /// Create a program with no globals that starts at instruction 0.
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Self {
            instructions,
            globals: GlobalTable::new(),
            memory: Vec::new(),
            entry: 0,
        }
    }

    /// Number of instructions in the program.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns true if the program has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// The initial value of a global, by name.
    pub fn initial_value(&self, name: &str) -> Option<&Value> {
        self.globals
            .slot(name)
            .and_then(|slot| self.memory.get(slot))
    }

    /// Every compiled user function, in global slot order.
    pub fn functions(&self) -> impl Iterator<Item = &Rc<FunctionDescriptor>> {
        self.memory.iter().filter_map(|value| match value {
            Value::Function(func) => Some(func),
            _ => None,
        })
    }

    /// The top-level code.
    pub fn main_code(&self) -> &[Instruction] {
        &self.instructions[self.entry.min(self.instructions.len())..]
    }
}
