//! Execution observers.

use noast_common::{Instruction, Value};

/// Receives every instruction, with the operand stack as it is just before
/// the instruction executes.
///
/// Tracers only observe. They cannot change the run.
pub trait Tracer {
    fn before_step(&mut self, pc: usize, instruction: &Instruction, stack: &[Value]);
}

impl<F> Tracer for F
where
    F: FnMut(usize, &Instruction, &[Value]),
{
    fn before_step(&mut self, pc: usize, instruction: &Instruction, stack: &[Value]) {
        self(pc, instruction, stack)
    }
}
