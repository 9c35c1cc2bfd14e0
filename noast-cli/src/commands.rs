//! CLI command implementations.

use std::fs;

use noast_common::Program;
use noast_compiler::{compile_script, tokenize, TokenKind};
use noast_vm::{builtins, Exit, Vm};

use crate::dump::StackDump;

/// Options shared by the commands that take a script.
struct Options {
    input: String,
    logging_off: bool,
}

impl Options {
    fn parse(command: &str, args: &[String]) -> Result<Self, i32> {
        let mut input = None;
        let mut logging_off = false;
        for arg in args {
            match arg.as_str() {
                "--logging-off" => logging_off = true,
                "--verbose" => {}
                flag if flag.starts_with("--") => {
                    eprintln!("error: unknown option '{flag}'");
                    return Err(1);
                }
                path if input.is_none() => input = Some(path.to_string()),
                extra => {
                    eprintln!("error: unexpected argument '{extra}'");
                    return Err(1);
                }
            }
        }
        let Some(input) = input else {
            eprintln!("error: {command} requires an input file");
            eprintln!("Usage: noast {command} <script>");
            return Err(1);
        };
        Ok(Self { input, logging_off })
    }
}

/// Compile and execute a script.
pub fn run(args: &[String]) -> Result<(), i32> {
    let opts = Options::parse("run", args)?;
    let source = read_source(&opts.input)?;
    let program = compile(&source)?;

    let mut vm = Vm::new(&program);
    if !opts.logging_off {
        vm.set_tracer(StackDump::stderr());
    }

    match vm.execute() {
        Ok(Exit::Completed) | Ok(Exit::Halted { .. }) => Ok(()),
        Err(e) => {
            eprintln!("runtime error: {e}");
            Err(3)
        }
    }
}

/// Print one token per line with its source line.
pub fn tokens(args: &[String]) -> Result<(), i32> {
    let opts = Options::parse("tokens", args)?;
    let source = read_source(&opts.input)?;
    let tokens = tokenize(&source).map_err(|e| {
        eprintln!("error: {e}");
        1
    })?;
    for tok in tokens.iter().filter(|t| t.kind != TokenKind::Eof) {
        println!("{:>4} {}", tok.line, tok.describe());
    }
    Ok(())
}

/// Compile a script and print its instruction listing.
pub fn disassemble(args: &[String]) -> Result<(), i32> {
    let opts = Options::parse("disassemble", args)?;
    let source = read_source(&opts.input)?;
    let program = compile(&source)?;
    print!("{}", noast_compiler::disassemble(&program));
    Ok(())
}

// --- Helpers ---

fn read_source(path: &str) -> Result<String, i32> {
    fs::read_to_string(path).map_err(|e| {
        eprintln!("error: cannot read '{path}': {e}");
        1
    })
}

/// Compile a script with the reference builtins declared.
fn compile(source: &str) -> Result<Program, i32> {
    compile_script(source, &builtins::standard()).map_err(|e| {
        eprintln!("error: {e}");
        1
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn options_input_and_flags() {
        let opts = Options::parse("run", &args(&["prog.noast", "--logging-off"])).unwrap();
        assert_eq!(opts.input, "prog.noast");
        assert!(opts.logging_off);

        let opts = Options::parse("run", &args(&["--verbose", "prog.noast"])).unwrap();
        assert!(!opts.logging_off);
    }

    #[test]
    fn options_errors() {
        assert_eq!(Options::parse("run", &[]).err(), Some(1));
        assert_eq!(Options::parse("run", &args(&["a", "b"])).err(), Some(1));
        assert_eq!(Options::parse("run", &args(&["a", "--fast"])).err(), Some(1));
    }
}
