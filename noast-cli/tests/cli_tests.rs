//! Integration tests for the noast CLI.
//!
//! These tests invoke the `noast` binary as a subprocess and check
//! exit codes, stdout, and stderr.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[allow(deprecated)]
fn noast() -> Command {
    Command::cargo_bin("noast").unwrap()
}

/// Return the workspace root (parent of noast-cli/).
fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .to_path_buf()
}

/// Return the absolute path to a test program file.
fn test_program(name: &str) -> PathBuf {
    workspace_root().join("tests/programs").join(name)
}

/// Helper: write a script into a temp dir and return its path.
fn script(dir: &TempDir, source: &str) -> PathBuf {
    let path = dir.path().join("test.noast");
    fs::write(&path, source).unwrap();
    path
}

// ---- No-args / help ----

#[test]
fn no_args_prints_usage_and_exits_1() {
    noast()
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Usage: noast"));
}

#[test]
fn help_flag_exits_0() {
    noast()
        .arg("--help")
        .assert()
        .success()
        .stderr(predicate::str::contains("Commands:"));
}

#[test]
fn unknown_command_exits_1() {
    noast()
        .arg("frobnicate")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("unknown command"));
}

// ---- Run ----

#[test]
fn run_countdown() {
    noast()
        .args(["run", test_program("countdown.noast").to_str().unwrap(), "--logging-off"])
        .assert()
        .success()
        .stdout("3\n2\n1\nliftoff\n")
        .stderr("");
}

#[test]
fn run_sequential_calls() {
    noast()
        .args(["run", test_program("calls.noast").to_str().unwrap(), "--logging-off"])
        .assert()
        .success()
        .stdout("1\n11\n111\n");
}

#[test]
fn run_done_halts_with_success() {
    noast()
        .args(["run", test_program("greet.noast").to_str().unwrap(), "--logging-off"])
        .assert()
        .success()
        .stdout("hello\nnoast\nhello\nnoast\ndone the program\n");
}

#[test]
fn run_dumps_stack_by_default() {
    let dir = TempDir::new().unwrap();
    let path = script(&dir, "print_one(1)");
    noast()
        .args(["run", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout("1\n")
        .stderr(predicate::str::contains("--- 0000 ---"))
        .stderr(predicate::str::contains("LoadGlobal("));
}

#[test]
fn run_verbose_logs_calls() {
    noast()
        .args(["run", test_program("calls.noast").to_str().unwrap(), "--verbose"])
        .assert()
        .success()
        .stderr(predicate::str::contains("call 'add'"));
}

#[test]
fn run_runtime_error_exits_3() {
    let dir = TempDir::new().unwrap();
    let path = script(&dir, "var x int\nx = 1 / 0\nprint_one(x)");
    noast()
        .args(["run", path.to_str().unwrap(), "--logging-off"])
        .assert()
        .failure()
        .code(3)
        .stdout("")
        .stderr(predicate::str::contains("runtime error: division by zero"));
}

#[test]
fn run_arity_error_exits_3() {
    let dir = TempDir::new().unwrap();
    let path = script(&dir, "func f(a int) { print_one(a) }\nf()");
    noast()
        .args(["run", path.to_str().unwrap(), "--logging-off"])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("'f' expects 1 argument(s), got 0"));
}

#[test]
fn run_compile_error_exits_1() {
    let dir = TempDir::new().unwrap();
    let path = script(&dir, "x = 1 +\n");
    noast()
        .args(["run", path.to_str().unwrap(), "--logging-off"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error: line 2: expected term"));
}

#[test]
fn run_deep_expression_is_compile_error() {
    let dir = TempDir::new().unwrap();
    let sum = vec!["1"; 20_000].join(" + ");
    let path = script(&dir, &format!("var x int\nx = {sum}\nprint_one(x)"));
    noast()
        .args(["run", path.to_str().unwrap(), "--logging-off"])
        .assert()
        .failure()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("error: line 2: nesting exceeds"));
}

#[test]
fn run_missing_file_exits_1() {
    noast()
        .args(["run", "/nonexistent/script.noast"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("cannot read"));
}

#[test]
fn run_requires_input() {
    noast()
        .arg("run")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("requires an input file"));
}

// ---- Tokens ----

#[test]
fn tokens_lists_each_token() {
    let dir = TempDir::new().unwrap();
    let path = script(&dir, "x = 1+2\nprint_one(x)");
    noast()
        .args(["tokens", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(
            "   1 IDENTIFIER(x)\n\
             \x20  1 ASSIGN(=)\n\
             \x20  1 NUMBER(1)\n\
             \x20  1 OPERATOR(+)\n\
             \x20  1 NUMBER(2)\n\
             \x20  2 IDENTIFIER(print_one)\n\
             \x20  2 PUNCTUATION(()\n\
             \x20  2 IDENTIFIER(x)\n\
             \x20  2 PUNCTUATION())\n",
        );
}

#[test]
fn tokens_reports_lex_error() {
    let dir = TempDir::new().unwrap();
    let path = script(&dir, "x = 'open");
    noast()
        .args(["tokens", path.to_str().unwrap()])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("unterminated string"));
}

// ---- Disassemble ----

#[test]
fn disassemble_marks_functions_and_main() {
    noast()
        .args(["disassemble", test_program("calls.noast").to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("; func add\n0000 LOAD_GLOBAL total\n"))
        .stdout(predicate::str::contains("; main\n"))
        .stdout(predicate::str::contains("INVOKE 1"));
}
