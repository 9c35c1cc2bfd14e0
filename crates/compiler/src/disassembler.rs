//! Human-readable program listings.

use std::fmt::Write;

use noast_common::Program;

/// Render one line per instruction as `NNNN MNEMONIC operands`.
///
/// Function entries are preceded by a `; func NAME` line and the top-level
/// entry by `; main`.
pub fn disassemble(program: &Program) -> String {
    let mut out = String::new();
    for (index, instr) in program.instructions.iter().enumerate() {
        for func in program.functions().filter(|f| f.entry == index) {
            let _ = writeln!(out, "; func {}", func.name);
        }
        if index == program.entry {
            out.push_str("; main\n");
        }
        let _ = writeln!(out, "{index:04} {instr}");
    }
    if program.entry >= program.instructions.len() {
        out.push_str("; main\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FunctionSignature, ProgramBuilder};
    use noast_common::TypeTag;

    #[test]
    fn main_only() {
        let program = crate::compile("x = 1 + 2").unwrap();
        assert_eq!(
            disassemble(&program),
            "; main\n\
             0000 PUSH 1\n\
             0001 PUSH 2\n\
             0002 ADD\n\
             0003 ASSIGN_GLOBAL x\n"
        );
    }

    #[test]
    fn function_and_main_markers() {
        let mut builder = ProgramBuilder::new();
        builder
            .function(FunctionSignature::new("f").param("n", TypeTag::Int), "n = n")
            .unwrap();
        let program = builder.build("").unwrap();
        assert_eq!(
            disassemble(&program),
            "; func f\n\
             0000 LOAD_LOCAL 0 int\n\
             0001 SET_LOCAL 0 int\n\
             0002 RETURN\n\
             ; main\n"
        );
    }

    #[test]
    fn jump_targets_are_listed() {
        let program = crate::compile("while x { x = 0 }").unwrap();
        let listing = disassemble(&program);
        assert!(listing.contains("0001 JUMP_IF_ZERO 6"));
        assert!(listing.contains("0005 JUMP_IF_ZERO 0"));
    }
}
