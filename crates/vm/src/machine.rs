//! VM state management: operand stack, call frames, global memory.

use std::io::{self, Write};

use crate::error::RuntimeError;
use crate::trace::Tracer;
use noast_common::{Program, TypeTag, Value};

/// Maximum number of values on the operand stack.
pub const MAX_STACK_DEPTH: usize = 4096;

/// Maximum number of active call frames.
pub const MAX_CALL_DEPTH: usize = 1024;

/// A call frame for a user function invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallFrame {
    /// Instruction index to resume at after `RETURN`.
    pub return_address: usize,
    /// Stack index of local slot 0.
    pub locals_base: usize,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// Execution reached the end of the instruction array.
    Completed,
    /// A builtin stopped the run.
    Halted { by: &'static str },
}

/// The noast virtual machine.
///
/// Builtins write to `out`, which is stdout unless the VM was created with
/// [`Vm::with_output`].
pub struct Vm<'a, W: Write = io::Stdout> {
    /// The program being executed.
    pub(crate) program: &'a Program,
    /// Operand stack. Also holds the locals of every active frame.
    pub(crate) stack: Vec<Value>,
    /// Active call frames, innermost last.
    pub(crate) frames: Vec<CallFrame>,
    /// Global memory, indexed by global slot.
    pub(crate) globals: Vec<Value>,
    /// Index of the instruction being executed.
    pub(crate) pc: usize,
    pub(crate) out: W,
    pub(crate) tracer: Option<Box<dyn Tracer + 'a>>,
}

impl<'a> Vm<'a> {
    /// Create a VM whose builtins write to stdout.
    pub fn new(program: &'a Program) -> Self {
        Self::with_output(program, io::stdout())
    }
}

impl<'a, W: Write> Vm<'a, W> {
    /// Create a VM whose builtins write to `out`.
    pub fn with_output(program: &'a Program, out: W) -> Self {
        Self {
            program,
            stack: Vec::new(),
            frames: Vec::new(),
            globals: program.memory.clone(),
            pc: program.entry,
            out,
            tracer: None,
        }
    }

    /// Observe every instruction before it executes.
    pub fn set_tracer(&mut self, tracer: impl Tracer + 'a) {
        self.tracer = Some(Box::new(tracer));
    }

    /// Current value of a global, by name.
    pub fn global(&self, name: &str) -> Option<&Value> {
        self.program
            .globals
            .slot(name)
            .and_then(|slot| self.globals.get(slot))
    }

    pub fn stack(&self) -> &[Value] {
        &self.stack
    }

    pub fn frames(&self) -> &[CallFrame] {
        &self.frames
    }

    /// Index of the instruction executing, or where the run stopped.
    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Push a value onto the stack, checking for overflow.
    pub(crate) fn push(&mut self, value: Value) -> Result<(), RuntimeError> {
        if self.stack.len() >= MAX_STACK_DEPTH {
            return Err(RuntimeError::StackOverflow { at: self.pc });
        }
        self.stack.push(value);
        Ok(())
    }

    /// Pop a value from the stack.
    pub(crate) fn pop(&mut self) -> Result<Value, RuntimeError> {
        self.stack
            .pop()
            .ok_or(RuntimeError::StackUnderflow { at: self.pc })
    }

    /// Pop a value that must be an Int.
    pub(crate) fn pop_int(&mut self) -> Result<i64, RuntimeError> {
        match self.pop()? {
            Value::Int(n) => Ok(n),
            other => Err(RuntimeError::TypeMismatch {
                at: self.pc,
                expected: TypeTag::Int,
                found: other.type_tag(),
            }),
        }
    }

    /// Global memory cell for `name`. A name declared in the table but
    /// missing from memory is unresolved.
    pub(crate) fn global_mut(&mut self, name: &str) -> Result<&mut Value, RuntimeError> {
        let at = self.pc;
        self.program
            .globals
            .slot(name)
            .and_then(|slot| self.globals.get_mut(slot))
            .ok_or_else(|| RuntimeError::UnresolvedName {
                at,
                name: name.to_string(),
            })
    }

    /// Stack index of local `slot` in the active frame.
    pub(crate) fn local_index(&self, slot: usize) -> Result<usize, RuntimeError> {
        let frame = self
            .frames
            .last()
            .ok_or(RuntimeError::NoActiveFrame { at: self.pc })?;
        let index = frame.locals_base + slot;
        if index >= self.stack.len() {
            return Err(RuntimeError::LocalOutOfRange { at: self.pc, slot });
        }
        Ok(index)
    }
}
