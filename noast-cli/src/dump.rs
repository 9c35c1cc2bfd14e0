//! Step-by-step stack dump for `noast run`.

use std::io::{self, Write};

use noast_common::{Instruction, Value};
use noast_vm::Tracer;

/// Writes every instruction and the stack it sees, pretty-printed.
pub struct StackDump<W: Write> {
    out: W,
}

impl StackDump<io::Stderr> {
    pub fn stderr() -> Self {
        Self { out: io::stderr() }
    }
}

impl<W: Write> StackDump<W> {
    #[cfg(test)]
    fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Tracer for StackDump<W> {
    fn before_step(&mut self, pc: usize, instruction: &Instruction, stack: &[Value]) {
        // Write failures are ignored.
        writeln!(self.out, "--- {pc:04} ---\n{stack:#?}\n{instruction:#?}").ok();
    }
}
