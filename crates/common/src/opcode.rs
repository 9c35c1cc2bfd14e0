//! Opcode names for the noast instruction set.
//!
//! [`Opcode`] is the fieldless discriminant of [`Instruction`](crate::Instruction).
//! It exists so listings, traces and error messages can name an instruction
//! without caring about its payload.

/// Identifies the operation an instruction performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    // Constants and variables
    /// Push a literal.
    Push,
    /// Push the value of a global, resolved by name at runtime.
    LoadGlobal,
    /// Pop a value into a global, resolved by name at runtime.
    AssignGlobal,
    /// Push a frame-relative local.
    LoadLocal,
    /// Pop a value into a frame-relative local.
    SetLocal,

    // Arithmetic
    /// Pop right, pop left, push left + right.
    Add,
    /// Pop right, pop left, push left - right.
    Sub,
    /// Pop right, pop left, push left * right.
    Mul,
    /// Pop right, pop left, push left / right. Division by zero is fatal.
    Div,

    // Comparison
    /// Push 1 if left == right, else 0.
    Eq,
    /// Push 1 if left > right, else 0.
    Gt,
    /// Push 1 if left < right, else 0.
    Lt,

    // Control flow
    /// Call the value sitting below the arguments.
    Invoke,
    /// Leave the active call frame.
    Return,
    /// Pop an Int, jump if it is zero.
    JumpIfZero,

    // Stack
    /// Discard the top of stack.
    Pop,
}

/// All opcodes, in definition order. Useful for exhaustive testing.
pub const ALL_OPCODES: [Opcode; 16] = [
    Opcode::Push,
    Opcode::LoadGlobal,
    Opcode::AssignGlobal,
    Opcode::LoadLocal,
    Opcode::SetLocal,
    Opcode::Add,
    Opcode::Sub,
    Opcode::Mul,
    Opcode::Div,
    Opcode::Eq,
    Opcode::Gt,
    Opcode::Lt,
    Opcode::Invoke,
    Opcode::Return,
    Opcode::JumpIfZero,
    Opcode::Pop,
];

impl Opcode {
    /// Returns the listing mnemonic for this opcode.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::Push => "PUSH",
            Opcode::LoadGlobal => "LOAD_GLOBAL",
            Opcode::AssignGlobal => "ASSIGN_GLOBAL",
            Opcode::LoadLocal => "LOAD_LOCAL",
            Opcode::SetLocal => "SET_LOCAL",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::Div => "DIV",
            Opcode::Eq => "EQ",
            Opcode::Gt => "GT",
            Opcode::Lt => "LT",
            Opcode::Invoke => "INVOKE",
            Opcode::Return => "RETURN",
            Opcode::JumpIfZero => "JUMP_IF_ZERO",
            Opcode::Pop => "POP",
        }
    }

    /// Returns true if executing this opcode may move the instruction
    /// pointer somewhere other than the next instruction.
    pub fn redirects_control(&self) -> bool {
        matches!(self, Opcode::Invoke | Opcode::Return | Opcode::JumpIfZero)
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mnemonic())
    }
}
