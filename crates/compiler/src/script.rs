//! Script front end: declarations followed by top-level code.
//!
//! ```text
//! var total int
//! func add(n int) {
//!     total = total + n
//! }
//! add(3)
//! ```
//!
//! A script is tokenized once. Leading `var NAME TYPE` and
//! `func NAME(p TYPE, ...) [TYPE] { ... }` declarations are read first and
//! every name is registered before any body is compiled. Function bodies
//! are split off by brace matching and compiled in declaration order; the
//! rest of the token stream is the top-level code.

use noast_common::{Builtin, Program};

use crate::builder::{FunctionSignature, ProgramBuilder};
use crate::error::CompileError;
use crate::lexer::tokenize;
use crate::parser::declarable_type;
use crate::token::{Token, TokenKind};

/// Compile a script with the given builtins declared as globals.
pub fn compile_script(source: &str, builtins: &[Builtin]) -> Result<Program, CompileError> {
    let builder = ProgramBuilder::with_builtins(builtins.iter().copied())?;
    compile_with(builder, source)
}

/// A function declaration whose body has not been compiled yet.
struct PendingFunction {
    signature: FunctionSignature,
    body: Vec<Token>,
}

pub(crate) fn compile_with(
    mut builder: ProgramBuilder,
    source: &str,
) -> Result<Program, CompileError> {
    let tokens = tokenize(source)?;
    let mut cursor = Cursor { tokens, pos: 0 };
    let mut pending = Vec::new();

    loop {
        let tok = cursor.peek();
        if tok.is_word("var") {
            cursor.next();
            let name = cursor.identifier("variable name")?;
            let ty = declarable_type(&cursor.identifier("type name")?)?;
            builder.global(&name.text, ty)?;
        } else if tok.is_word("func") {
            cursor.next();
            let function = read_function(&mut cursor)?;
            builder.reserve_function(function.signature.name())?;
            pending.push(function);
        } else {
            break;
        }
    }

    for function in pending {
        builder.function_from_tokens(function.signature, function.body.into_iter().map(Ok))?;
    }
    builder.build_from_tokens(cursor.rest().map(Ok))
}

/// `NAME ( [p TYPE (, p TYPE)*] ) [TYPE] { body }`, after `func`.
fn read_function(cursor: &mut Cursor) -> Result<PendingFunction, CompileError> {
    let name = cursor.identifier("function name")?;
    let mut signature = FunctionSignature::new(name.text);

    cursor.punct("(", "'('")?;
    if cursor.peek().is_punct(")") {
        cursor.next();
    } else {
        loop {
            let param = cursor.identifier("parameter name")?;
            let ty = declarable_type(&cursor.identifier("type name")?)?;
            signature = signature.param(param.text, ty);
            let sep = cursor.next();
            if sep.is_punct(")") {
                break;
            }
            if !sep.is_punct(",") {
                return Err(unexpected("',' or ')'", &sep));
            }
        }
    }

    if cursor.peek().kind == TokenKind::Identifier {
        let ty = declarable_type(&cursor.next())?;
        signature = signature.returns(ty);
    }

    cursor.punct("{", "'{'")?;
    let body = cursor.until_matching_brace()?;
    Ok(PendingFunction { signature, body })
}

struct Cursor {
    tokens: Vec<Token>,
    pos: usize,
}

impl Cursor {
    /// The current token. The last token is always `Eof`.
    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn next(&mut self) -> Token {
        let tok = self.peek().clone();
        if tok.kind != TokenKind::Eof {
            self.pos += 1;
        }
        tok
    }

    fn identifier(&mut self, expected: &'static str) -> Result<Token, CompileError> {
        let tok = self.next();
        if tok.kind == TokenKind::Identifier {
            Ok(tok)
        } else {
            Err(unexpected(expected, &tok))
        }
    }

    fn punct(&mut self, p: &str, expected: &'static str) -> Result<(), CompileError> {
        let tok = self.next();
        if tok.is_punct(p) {
            Ok(())
        } else {
            Err(unexpected(expected, &tok))
        }
    }

    /// Tokens up to the `}` matching an already consumed `{`. The closing
    /// brace is consumed and replaced by `Eof` in the returned run.
    fn until_matching_brace(&mut self) -> Result<Vec<Token>, CompileError> {
        let mut depth = 0usize;
        let mut body = Vec::new();
        loop {
            let tok = self.next();
            match tok.kind {
                TokenKind::Eof => return Err(unexpected("'}'", &tok)),
                TokenKind::Punctuation if tok.text == "{" => depth += 1,
                TokenKind::Punctuation if tok.text == "}" => {
                    if depth == 0 {
                        body.push(Token::eof(tok.line));
                        return Ok(body);
                    }
                    depth -= 1;
                }
                _ => {}
            }
            body.push(tok);
        }
    }

    fn rest(self) -> impl Iterator<Item = Token> {
        let pos = self.pos;
        self.tokens.into_iter().skip(pos)
    }
}

fn unexpected(expected: &'static str, found: &Token) -> CompileError {
    CompileError::UnexpectedToken {
        line: found.line,
        expected,
        found: found.describe(),
    }
}
