//! Main execution loop and opcode dispatch for the noast VM.

use std::io::Write;
use std::rc::Rc;

use log::{debug, trace};
use noast_common::{Builtin, Flow, FunctionDescriptor, Instruction, TypeTag, Value};

use crate::error::RuntimeError;
use crate::machine::{CallFrame, Exit, Vm, MAX_CALL_DEPTH};

/// Where control goes after an instruction.
enum Step {
    Next,
    Jump(usize),
    Halt(&'static str),
}

impl<'a, W: Write> Vm<'a, W> {
    /// Execute from the current instruction until the end of the program, a
    /// halting builtin, or an error.
    pub fn execute(&mut self) -> Result<Exit, RuntimeError> {
        let program = self.program;
        while let Some(instr) = program.instructions.get(self.pc) {
            trace!("{:04} {}", self.pc, instr);
            if let Some(tracer) = self.tracer.as_mut() {
                tracer.before_step(self.pc, instr, &self.stack);
            }

            match self.step(instr)? {
                Step::Next => self.pc += 1,
                Step::Jump(target) => self.pc = target,
                Step::Halt(by) => {
                    debug!("halted by '{by}' at {:04}", self.pc);
                    return Ok(Exit::Halted { by });
                }
            }
        }
        Ok(Exit::Completed)
    }

    fn step(&mut self, instr: &Instruction) -> Result<Step, RuntimeError> {
        match instr {
            Instruction::Push(lit) => self.push(lit.to_value())?,
            Instruction::LoadGlobal(name) => {
                let value = self.global_mut(name)?.clone();
                self.push(value)?;
            }
            Instruction::AssignGlobal(name) => {
                let value = self.pop()?;
                *self.global_mut(name)? = value;
            }
            Instruction::LoadLocal { slot, ty } => self.exec_load_local(*slot, *ty)?,
            Instruction::SetLocal { slot, ty } => self.exec_set_local(*slot, *ty)?,

            Instruction::Add => self.exec_binary_arith(i64::wrapping_add)?,
            Instruction::Sub => self.exec_binary_arith(i64::wrapping_sub)?,
            Instruction::Mul => self.exec_binary_arith(i64::wrapping_mul)?,
            Instruction::Div => self.exec_div()?,

            Instruction::Eq => self.exec_comparison(|a, b| a == b)?,
            Instruction::Gt => self.exec_comparison(|a, b| a > b)?,
            Instruction::Lt => self.exec_comparison(|a, b| a < b)?,

            Instruction::JumpIfZero(target) => {
                if self.pop_int()? == 0 {
                    return Ok(Step::Jump(*target));
                }
            }
            Instruction::Invoke(argc) => return self.exec_invoke(*argc),
            Instruction::Return => return self.exec_return(),
            Instruction::Pop => {
                self.pop()?;
            }
        }
        Ok(Step::Next)
    }

    fn exec_load_local(&mut self, slot: usize, ty: TypeTag) -> Result<(), RuntimeError> {
        let index = self.local_index(slot)?;
        let value = self.stack[index].clone();
        self.expect_tag(ty, &value)?;
        self.push(value)
    }

    fn exec_set_local(&mut self, slot: usize, ty: TypeTag) -> Result<(), RuntimeError> {
        let value = self.pop()?;
        let index = self.local_index(slot)?;
        self.expect_tag(ty, &self.stack[index])?;
        self.expect_tag(ty, &value)?;
        self.stack[index] = value;
        Ok(())
    }

    fn expect_tag(&self, expected: TypeTag, value: &Value) -> Result<(), RuntimeError> {
        let found = value.type_tag();
        if found != expected {
            return Err(RuntimeError::TypeMismatch {
                at: self.pc,
                expected,
                found,
            });
        }
        Ok(())
    }

    /// Pop right, pop left, push `op(left, right)`.
    fn exec_binary_arith(&mut self, op: fn(i64, i64) -> i64) -> Result<(), RuntimeError> {
        let right = self.pop_int()?;
        let left = self.pop_int()?;
        self.push(Value::Int(op(left, right)))
    }

    fn exec_div(&mut self) -> Result<(), RuntimeError> {
        let right = self.pop_int()?;
        let left = self.pop_int()?;
        if right == 0 {
            return Err(RuntimeError::DivisionByZero { at: self.pc });
        }
        self.push(Value::Int(left.wrapping_div(right)))
    }

    fn exec_comparison(&mut self, op: fn(i64, i64) -> bool) -> Result<(), RuntimeError> {
        let right = self.pop_int()?;
        let left = self.pop_int()?;
        self.push(Value::Int(op(left, right) as i64))
    }

    /// The callee sits below its `argc` arguments.
    fn exec_invoke(&mut self, argc: usize) -> Result<Step, RuntimeError> {
        let callee_index = self
            .stack
            .len()
            .checked_sub(argc + 1)
            .ok_or(RuntimeError::StackUnderflow { at: self.pc })?;

        match self.stack[callee_index].clone() {
            Value::Builtin(builtin) => self.call_builtin(builtin, callee_index),
            Value::Function(func) => self.call_function(func, callee_index),
            other => Err(RuntimeError::NotInvocable {
                at: self.pc,
                found: other.type_tag(),
            }),
        }
    }

    fn call_builtin(
        &mut self,
        builtin: Builtin,
        callee_index: usize,
    ) -> Result<Step, RuntimeError> {
        let args = self.stack.split_off(callee_index + 1);
        self.stack.truncate(callee_index);
        debug!("{:04} builtin '{}' with {} arg(s)", self.pc, builtin.name, args.len());

        let flow = builtin
            .call(&args, &mut self.out)
            .map_err(|source| RuntimeError::Native {
                at: self.pc,
                name: builtin.name.to_string(),
                source,
            })?;
        match flow {
            Flow::Continue => Ok(Step::Next),
            Flow::Halt => Ok(Step::Halt(builtin.name)),
        }
    }

    fn call_function(
        &mut self,
        func: Rc<FunctionDescriptor>,
        callee_index: usize,
    ) -> Result<Step, RuntimeError> {
        let args = &self.stack[callee_index + 1..];
        if args.len() != func.arity() {
            return Err(RuntimeError::ArityMismatch {
                at: self.pc,
                function: func.name.clone(),
                expected: func.arity(),
                found: args.len(),
            });
        }
        for (index, (arg, &expected)) in args.iter().zip(&func.params).enumerate() {
            let found = arg.type_tag();
            if found != expected {
                return Err(RuntimeError::ArgumentTypeMismatch {
                    at: self.pc,
                    function: func.name.clone(),
                    index,
                    expected,
                    found,
                });
            }
        }
        if self.frames.len() >= MAX_CALL_DEPTH {
            return Err(RuntimeError::CallDepthExceeded { at: self.pc });
        }

        // Arguments shift down into the callee's slot and become locals
        // 0..argc; declared locals follow them.
        self.stack.remove(callee_index);
        for value in func.extra_local_defaults() {
            self.push(value)?;
        }
        self.frames.push(CallFrame {
            return_address: self.pc + 1,
            locals_base: callee_index,
        });
        debug!(
            "{:04} call '{}' -> {:04} (depth {})",
            self.pc,
            func.name,
            func.entry,
            self.frames.len()
        );
        Ok(Step::Jump(func.entry))
    }

    fn exec_return(&mut self) -> Result<Step, RuntimeError> {
        let frame = self
            .frames
            .pop()
            .ok_or(RuntimeError::ReturnOutsideFunction { at: self.pc })?;
        self.stack.truncate(frame.locals_base);
        debug!("{:04} return -> {:04}", self.pc, frame.return_address);
        Ok(Step::Jump(frame.return_address))
    }
}
