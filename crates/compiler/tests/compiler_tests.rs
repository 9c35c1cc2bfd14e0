//! Integration tests for the noast compiler.
//!
//! Tests cover:
//! - Tokenizer output for small programs
//! - Code layout for assignments, conditionals, loops and calls
//! - Functions compiled through the builder and the script front end
//! - Disassembly listings
//! - Error cases (lexing, unexpected tokens, unknown operators, declarations)

use noast_common::{Instruction, Literal, TypeTag, Value};
use noast_compiler::{
    compile, compile_script, disassemble, tokenize, CompileError, FunctionSignature, LexError,
    ProgramBuilder, TokenKind,
};

// ---- Test helpers ----

fn int(n: i64) -> Instruction {
    Instruction::Push(Literal::Int(n))
}

fn load(name: &str) -> Instruction {
    Instruction::LoadGlobal(name.to_string())
}

fn store(name: &str) -> Instruction {
    Instruction::AssignGlobal(name.to_string())
}

/// Every `JUMP_IF_ZERO` target lies inside the program or at its end.
fn assert_jumps_in_range(code: &[Instruction]) {
    for (i, instr) in code.iter().enumerate() {
        if let Some(target) = instr.jump_target() {
            assert!(target <= code.len(), "jump at {i} targets {target}");
        }
    }
}

// ---- Tokenizer ----

#[test]
fn tokenize_assignment() {
    let kinds: Vec<_> = tokenize("x = 1+2")
        .unwrap()
        .into_iter()
        .map(|t| (t.kind, t.text))
        .collect();
    assert_eq!(
        kinds,
        vec![
            (TokenKind::Identifier, "x".to_string()),
            (TokenKind::Assign, "=".to_string()),
            (TokenKind::Number, "1".to_string()),
            (TokenKind::Operator, "+".to_string()),
            (TokenKind::Number, "2".to_string()),
            (TokenKind::Eof, String::new()),
        ]
    );
}

#[test]
fn tokenize_whole_script() {
    let source = "var n int\nfunc f(a int) {\n  print_one(a)\n}\nf(n)\n";
    let tokens = tokenize(source).unwrap();
    assert_eq!(tokens.iter().filter(|t| t.kind == TokenKind::Eof).count(), 1);
    assert_eq!(tokens.last().unwrap().line, 6);
}

// ---- Code layout ----

#[test]
fn sequential_assignments() {
    let program = compile("x = 3\n x = x+4").unwrap();
    assert_eq!(
        program.instructions,
        vec![int(3), store("x"), load("x"), int(4), Instruction::Add, store("x")]
    );
}

#[test]
fn right_associative_subtraction() {
    let program = compile("y = 10-3-2").unwrap();
    assert_eq!(
        program.instructions,
        vec![
            int(10),
            int(3),
            int(2),
            Instruction::Sub,
            Instruction::Sub,
            store("y")
        ]
    );
}

#[test]
fn if_inside_while_inside_if() {
    let program = compile(
        "if a {\n  while b < 3 {\n    if c { d = 1 }\n    b = b + 1\n  }\n}\ne = 2",
    )
    .unwrap();
    assert_jumps_in_range(&program.instructions);
    assert!(!program.instructions.contains(&Instruction::JumpIfZero(usize::MAX)));
    // The outer `if` skips straight to `e = 2`.
    let after = program.instructions.len() - 2;
    assert_eq!(program.instructions[1], Instruction::JumpIfZero(after));
}

#[test]
fn call_arguments_in_order() {
    let program = compile("print_all('a', 1 + 2, x)").unwrap();
    assert_eq!(
        program.instructions,
        vec![
            load("print_all"),
            Instruction::Push(Literal::Str("a".to_string())),
            int(1),
            int(2),
            Instruction::Add,
            load("x"),
            Instruction::Invoke(3),
        ]
    );
}

// ---- Functions ----

#[test]
fn recursive_function_resolves_itself_by_name() {
    let mut builder = ProgramBuilder::new();
    builder.global("n", TypeTag::Int).unwrap();
    let f = builder
        .function(
            FunctionSignature::new("down"),
            "if n { n = n - 1  down() }",
        )
        .unwrap();
    let program = builder.build("down()").unwrap();
    let body = &program.instructions[f.entry..program.entry];
    assert!(body.contains(&load("down")));
    assert_eq!(body.last(), Some(&Instruction::Return));
}

#[test]
fn parameters_and_locals_use_frame_slots() {
    let program = compile_script(
        "func greet(name string, times int) {\n\
         local i int\n\
         while i < times { print_one(name)  i = i + 1 }\n\
         }\n\
         greet('hi', 2)",
        &[],
    )
    .unwrap();
    let greet = program.functions().next().unwrap();
    assert_eq!(greet.params, vec![TypeTag::Str, TypeTag::Int]);
    let body = &program.instructions[greet.entry..program.entry];
    assert!(body.contains(&Instruction::LoadLocal {
        slot: 0,
        ty: TypeTag::Str
    }));
    assert!(body.contains(&Instruction::LoadLocal {
        slot: 1,
        ty: TypeTag::Int
    }));
    assert!(body.contains(&Instruction::SetLocal {
        slot: 2,
        ty: TypeTag::Int
    }));
    assert_jumps_in_range(&program.instructions);
}

#[test]
fn script_globals_and_functions_in_memory() {
    let program = compile_script(
        "var total int\nvar label string\nfunc add(n int) { total = total + n }\nadd(2)",
        &[],
    )
    .unwrap();
    let names: Vec<_> = program.globals.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, vec!["total", "label", "add"]);
    assert_eq!(program.memory[0], Value::Int(0));
    assert_eq!(program.memory[1], Value::Str(String::new()));
    assert!(matches!(program.memory[2], Value::Function(_)));
}

// ---- Disassembly ----

#[test]
fn disassemble_script() {
    let program =
        compile_script("var x int\nfunc f() { x = 1 }\nf()", &[]).unwrap();
    assert_eq!(
        disassemble(&program),
        "; func f\n\
         0000 PUSH 1\n\
         0001 ASSIGN_GLOBAL x\n\
         0002 RETURN\n\
         ; main\n\
         0003 LOAD_GLOBAL f\n\
         0004 INVOKE 0\n"
    );
}

#[test]
fn disassemble_string_literal() {
    let program = compile("s = 'a b'").unwrap();
    assert!(disassemble(&program).contains("0000 PUSH \"a b\""));
}

// ---- Error tests ----

#[test]
fn error_unterminated_string() {
    assert_eq!(
        compile("x = 'abc").unwrap_err(),
        CompileError::Lex(LexError::UnterminatedString { line: 1 })
    );
}

#[test]
fn error_unrecognized_character() {
    assert_eq!(
        compile("x = 1 # comment").unwrap_err(),
        CompileError::Lex(LexError::UnrecognizedCharacter { line: 1, ch: '#' })
    );
}

#[test]
fn error_unknown_operator() {
    assert!(matches!(
        compile("x = a += 1").unwrap_err(),
        CompileError::UnknownOperator { op, .. } if op == "+="
    ));
}

#[test]
fn error_missing_closing_brace() {
    assert!(matches!(
        compile("if x { y = 1").unwrap_err(),
        CompileError::UnexpectedToken { expected: "'}'", .. }
    ));
}

#[test]
fn error_reports_line() {
    let err = compile("x = 1\ny = 2\nz = )").unwrap_err();
    assert_eq!(err.to_string(), "line 3: expected term, found PUNCTUATION())");
}

#[test]
fn error_local_at_top_level() {
    assert_eq!(
        compile_script("local x int", &[]).unwrap_err(),
        CompileError::LocalOutsideFunction { line: 1 }
    );
}

#[test]
fn error_duplicate_function() {
    assert!(matches!(
        compile_script("func f() { }\nfunc f() { }", &[]).unwrap_err(),
        CompileError::DuplicateGlobal { .. }
    ));
}
