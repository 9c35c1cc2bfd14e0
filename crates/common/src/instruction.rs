//! The noast instruction set.
//!
//! Each variant carries exactly the operands its opcode needs, so an
//! instruction with the wrong operand shape cannot be built. Jump targets
//! are absolute indices into the program's single instruction array.

use crate::opcode::Opcode;
use crate::type_tag::TypeTag;
use crate::value::Value;

/// A literal operand of a `Push` instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    /// Integer literal.
    Int(i64),
    /// String literal, without quotes.
    Str(String),
}

impl Literal {
    /// Converts the literal into the runtime value it pushes.
    pub fn to_value(&self) -> Value {
        match self {
            Literal::Int(n) => Value::Int(*n),
            Literal::Str(s) => Value::Str(s.clone()),
        }
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Literal::Int(n) => write!(f, "{n}"),
            Literal::Str(s) => write!(f, "{s:?}"),
        }
    }
}

/// A single noast instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    Push(Literal),
    LoadGlobal(String),
    AssignGlobal(String),
    LoadLocal { slot: usize, ty: TypeTag },
    SetLocal { slot: usize, ty: TypeTag },
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Gt,
    Lt,
    /// Call the value found `argc` slots below the top of stack.
    Invoke(usize),
    Return,
    /// Absolute target index.
    JumpIfZero(usize),
    Pop,
}

impl Instruction {
    /// Returns the opcode of this instruction.
    pub fn opcode(&self) -> Opcode {
        match self {
            Instruction::Push(_) => Opcode::Push,
            Instruction::LoadGlobal(_) => Opcode::LoadGlobal,
            Instruction::AssignGlobal(_) => Opcode::AssignGlobal,
            Instruction::LoadLocal { .. } => Opcode::LoadLocal,
            Instruction::SetLocal { .. } => Opcode::SetLocal,
            Instruction::Add => Opcode::Add,
            Instruction::Sub => Opcode::Sub,
            Instruction::Mul => Opcode::Mul,
            Instruction::Div => Opcode::Div,
            Instruction::Eq => Opcode::Eq,
            Instruction::Gt => Opcode::Gt,
            Instruction::Lt => Opcode::Lt,
            Instruction::Invoke(_) => Opcode::Invoke,
            Instruction::Return => Opcode::Return,
            Instruction::JumpIfZero(_) => Opcode::JumpIfZero,
            Instruction::Pop => Opcode::Pop,
        }
    }

    /// Returns the jump target if this is a `JumpIfZero`.
    pub fn jump_target(&self) -> Option<usize> {
        match self {
            Instruction::JumpIfZero(target) => Some(*target),
            _ => None,
        }
    }
}

impl std::fmt::Display for Instruction {
    /// Formats as `MNEMONIC operands`, the form used in listings.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mnemonic = self.opcode().mnemonic();
        match self {
            Instruction::Push(lit) => write!(f, "{mnemonic} {lit}"),
            Instruction::LoadGlobal(name) | Instruction::AssignGlobal(name) => {
                write!(f, "{mnemonic} {name}")
            }
            Instruction::LoadLocal { slot, ty } | Instruction::SetLocal { slot, ty } => {
                write!(f, "{mnemonic} {slot} {ty}")
            }
            Instruction::Invoke(argc) => write!(f, "{mnemonic} {argc}"),
            Instruction::JumpIfZero(target) => write!(f, "{mnemonic} {target}"),
            Instruction::Add
            | Instruction::Sub
            | Instruction::Mul
            | Instruction::Div
            | Instruction::Eq
            | Instruction::Gt
            | Instruction::Lt
            | Instruction::Return
            | Instruction::Pop => f.write_str(mnemonic),
        }
    }
}
