//! Recursive-descent parser that emits instructions directly.
//!
//! There is no syntax tree. Each grammar rule appends its code to the shared
//! instruction array as soon as it is recognized. Forward jumps are emitted
//! with a placeholder target and backpatched once the jumped-over code is
//! complete.
//!
//! All binary operators share one precedence level and associate to the
//! right: the right operand is a full expression, so `10 - 3 - 2` is
//! `10 - (3 - 2)`.

use log::trace;
use noast_common::{Instruction, Literal, LocalTable, TypeTag};

use crate::error::{CompileError, LexError};
use crate::token::{Token, TokenKind};

/// Target of a forward jump that has not been patched yet.
pub const PENDING: usize = usize::MAX;

/// Maximum nesting of expressions and blocks. Each binary operator, call
/// argument, and `if`/`while` body is one level.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Parser state: the token source, one token of lookahead, and the code
/// being generated.
///
/// `locals` is `Some` while a function body is compiled and `None` for
/// top-level code.
pub struct Parser<'c, I> {
    tokens: I,
    peeked: Option<Token>,
    last_line: usize,
    depth: usize,
    code: &'c mut Vec<Instruction>,
    locals: Option<&'c mut LocalTable>,
}

impl<'c, I> Parser<'c, I>
where
    I: Iterator<Item = Result<Token, LexError>>,
{
    pub fn new(
        tokens: I,
        code: &'c mut Vec<Instruction>,
        locals: Option<&'c mut LocalTable>,
    ) -> Self {
        Self {
            tokens,
            peeked: None,
            last_line: 1,
            depth: 0,
            code,
            locals,
        }
    }

    /// Compile statements until end of input.
    pub fn compile_block(&mut self) -> Result<(), CompileError> {
        loop {
            let tok = self.advance()?;
            match tok.kind {
                TokenKind::Eof => return Ok(()),
                _ if tok.is_punct("}") => return Err(unexpected("statement", &tok)),
                _ => self.parse_statement(tok)?,
            }
        }
    }

    fn advance(&mut self) -> Result<Token, CompileError> {
        if let Some(tok) = self.peeked.take() {
            return Ok(tok);
        }
        self.pull()
    }

    fn pull(&mut self) -> Result<Token, CompileError> {
        match self.tokens.next() {
            Some(result) => {
                let tok = result?;
                self.last_line = tok.line;
                Ok(tok)
            }
            // A pre-split token run may end without its own Eof.
            None => Ok(Token::eof(self.last_line)),
        }
    }

    fn peek(&mut self) -> Result<&Token, CompileError> {
        let tok = match self.peeked.take() {
            Some(tok) => tok,
            None => self.pull()?,
        };
        Ok(self.peeked.insert(tok))
    }

    fn expect_punct(&mut self, p: &'static str, expected: &'static str) -> Result<(), CompileError> {
        let tok = self.advance()?;
        if tok.is_punct(p) {
            Ok(())
        } else {
            Err(unexpected(expected, &tok))
        }
    }

    fn expect_identifier(&mut self, expected: &'static str) -> Result<Token, CompileError> {
        let tok = self.advance()?;
        if tok.kind == TokenKind::Identifier {
            Ok(tok)
        } else {
            Err(unexpected(expected, &tok))
        }
    }

    fn enter(&mut self, line: usize) -> Result<(), CompileError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(CompileError::NestingTooDeep { line });
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn emit(&mut self, instr: Instruction) -> usize {
        self.code.push(instr);
        self.code.len() - 1
    }

    /// `{ statement* }`
    fn parse_block(&mut self) -> Result<(), CompileError> {
        self.expect_punct("{", "'{'")?;
        self.enter(self.last_line)?;
        let result = self.parse_block_body();
        self.leave();
        result
    }

    fn parse_block_body(&mut self) -> Result<(), CompileError> {
        loop {
            let tok = self.advance()?;
            if tok.is_punct("}") {
                return Ok(());
            }
            if tok.kind == TokenKind::Eof {
                return Err(unexpected("'}'", &tok));
            }
            self.parse_statement(tok)?;
        }
    }

    fn parse_statement(&mut self, tok: Token) -> Result<(), CompileError> {
        if tok.is_punct(";") {
            return Ok(());
        }
        if tok.kind == TokenKind::Identifier {
            match tok.text.as_str() {
                "return" => {
                    self.emit(Instruction::Return);
                    return Ok(());
                }
                "if" => return self.parse_if(),
                "while" => return self.parse_while(),
                "local" => return self.parse_local(tok.line),
                _ => {}
            }
            if self.peek()?.kind == TokenKind::Assign {
                self.advance()?;
                return self.parse_assignment(tok);
            }
        }

        let called = self.parse_callable_term(tok)?;
        if !called {
            self.emit(Instruction::Pop);
        }
        Ok(())
    }

    fn parse_if(&mut self) -> Result<(), CompileError> {
        self.parse_expression()?;
        let jump = self.emit(Instruction::JumpIfZero(PENDING));
        self.parse_block()?;
        self.patch_jump(jump);
        Ok(())
    }

    fn parse_while(&mut self) -> Result<(), CompileError> {
        let start = self.code.len();
        self.parse_expression()?;
        let exit = self.emit(Instruction::JumpIfZero(PENDING));
        self.parse_block()?;
        // Unconditional back-edge: a zero condition always jumps.
        self.emit(Instruction::Push(Literal::Int(0)));
        self.emit(Instruction::JumpIfZero(start));
        self.patch_jump(exit);
        Ok(())
    }

    /// `local NAME TYPE`
    fn parse_local(&mut self, line: usize) -> Result<(), CompileError> {
        let name = self.expect_identifier("local name")?;
        let ty_tok = self.expect_identifier("type name")?;
        let ty = declarable_type(&ty_tok)?;
        let locals = self
            .locals
            .as_deref_mut()
            .ok_or(CompileError::LocalOutsideFunction { line })?;
        locals
            .declare(&name.text, ty)
            .map_err(|_| CompileError::DuplicateLocal {
                line: name.line,
                name: name.text.clone(),
            })?;
        Ok(())
    }

    fn parse_assignment(&mut self, target: Token) -> Result<(), CompileError> {
        self.parse_expression()?;
        let store = match self.local(&target.text) {
            Some((slot, ty)) => Instruction::SetLocal { slot, ty },
            None => Instruction::AssignGlobal(target.text),
        };
        self.emit(store);
        Ok(())
    }

    fn local(&self, name: &str) -> Option<(usize, TypeTag)> {
        self.locals
            .as_deref()
            .and_then(|locals| locals.get(name))
            .map(|info| (info.slot, info.ty))
    }

    fn parse_expression(&mut self) -> Result<(), CompileError> {
        let tok = self.advance()?;
        self.parse_expression_from(tok)
    }

    fn parse_expression_from(&mut self, first: Token) -> Result<(), CompileError> {
        self.enter(first.line)?;
        let result = self.parse_operation(first);
        self.leave();
        result
    }

    /// `callable-term [operator expression]`
    fn parse_operation(&mut self, first: Token) -> Result<(), CompileError> {
        self.parse_callable_term(first)?;
        if self.peek()?.kind != TokenKind::Operator {
            return Ok(());
        }
        let op_tok = self.advance()?;
        let op = binary_op(&op_tok)?;
        self.parse_expression()?;
        self.emit(op);
        Ok(())
    }

    /// `term ( '(' args ')' )*`. Returns true if at least one call suffix
    /// was compiled. Whether the term is invocable is checked at run time.
    fn parse_callable_term(&mut self, tok: Token) -> Result<bool, CompileError> {
        self.parse_term(tok)?;
        let mut called = false;
        while self.peek()?.is_punct("(") {
            self.advance()?;
            let argc = self.parse_arguments()?;
            self.emit(Instruction::Invoke(argc));
            called = true;
        }
        Ok(called)
    }

    /// Arguments after an opening `(`, through the closing `)`.
    fn parse_arguments(&mut self) -> Result<usize, CompileError> {
        if self.peek()?.is_punct(")") {
            self.advance()?;
            return Ok(0);
        }
        let mut argc = 0;
        loop {
            self.parse_expression()?;
            argc += 1;
            let tok = self.advance()?;
            if tok.is_punct(",") {
                continue;
            }
            if tok.is_punct(")") {
                return Ok(argc);
            }
            return Err(unexpected("',' or ')'", &tok));
        }
    }

    fn parse_term(&mut self, tok: Token) -> Result<(), CompileError> {
        let instr = match tok.kind {
            TokenKind::Number => Instruction::Push(Literal::Int(decode_number(&tok)?)),
            TokenKind::Str => Instruction::Push(Literal::Str(tok.text)),
            TokenKind::Identifier => match self.local(&tok.text) {
                Some((slot, ty)) => Instruction::LoadLocal { slot, ty },
                None => Instruction::LoadGlobal(tok.text),
            },
            _ => return Err(unexpected("term", &tok)),
        };
        self.emit(instr);
        Ok(())
    }

    fn patch_jump(&mut self, at: usize) {
        let target = self.code.len();
        if let Some(Instruction::JumpIfZero(pending)) = self.code.get_mut(at) {
            *pending = target;
            trace!("patched jump at {at:04} -> {target:04}");
        }
    }
}

fn unexpected(expected: &'static str, found: &Token) -> CompileError {
    CompileError::UnexpectedToken {
        line: found.line,
        expected,
        found: found.describe(),
    }
}

fn binary_op(tok: &Token) -> Result<Instruction, CompileError> {
    Ok(match tok.text.as_str() {
        "+" => Instruction::Add,
        "-" => Instruction::Sub,
        "*" => Instruction::Mul,
        "/" => Instruction::Div,
        "==" => Instruction::Eq,
        ">" => Instruction::Gt,
        "<" => Instruction::Lt,
        _ => {
            return Err(CompileError::UnknownOperator {
                line: tok.line,
                op: tok.text.clone(),
            })
        }
    })
}

/// Decode a number token. Text after the first `.` is dropped.
fn decode_number(tok: &Token) -> Result<i64, CompileError> {
    let whole = tok.text.split('.').next().unwrap_or_default();
    whole.parse().map_err(|_| CompileError::InvalidNumber {
        line: tok.line,
        token: tok.text.clone(),
    })
}

/// Resolve a type name that a variable may be declared with.
pub(crate) fn declarable_type(tok: &Token) -> Result<TypeTag, CompileError> {
    TypeTag::from_name(&tok.text)
        .filter(TypeTag::is_declarable)
        .ok_or_else(|| CompileError::UnknownType {
            line: tok.line,
            name: tok.text.clone(),
        })
}
