//! Reference builtins.
//!
//! Builtins return nothing to the program. They write to the VM's output
//! sink and may stop the run.

use std::io::Write;

use noast_common::{Builtin, Flow, NativeError, TypeTag, Value};

/// Every reference builtin, ready to declare as globals.
pub fn standard() -> Vec<Builtin> {
    vec![
        Builtin::new("print_one", print_one),
        Builtin::new("print_all", print_all),
        Builtin::new("print_sum", print_sum),
        Builtin::new("done", done),
    ]
}

/// Print exactly one value on its own line.
pub fn print_one(args: &[Value], out: &mut dyn Write) -> Result<Flow, NativeError> {
    let [value] = args else {
        return Err(NativeError::Arity {
            expected: 1,
            found: args.len(),
        });
    };
    writeln!(out, "{value}")?;
    Ok(Flow::Continue)
}

/// Print each value on its own line.
pub fn print_all(args: &[Value], out: &mut dyn Write) -> Result<Flow, NativeError> {
    for value in args {
        writeln!(out, "{value}")?;
    }
    Ok(Flow::Continue)
}

/// Print the sum of any number of ints.
pub fn print_sum(args: &[Value], out: &mut dyn Write) -> Result<Flow, NativeError> {
    let mut sum: i64 = 0;
    for (index, value) in args.iter().enumerate() {
        let n = value.as_int().ok_or(NativeError::ArgumentType {
            index,
            expected: TypeTag::Int,
            found: value.type_tag(),
        })?;
        sum = sum.wrapping_add(n);
    }
    writeln!(out, "{sum}")?;
    Ok(Flow::Continue)
}

/// Stop the run.
pub fn done(_args: &[Value], out: &mut dyn Write) -> Result<Flow, NativeError> {
    writeln!(out, "done the program")?;
    Ok(Flow::Halt)
}
