//! Tokenizer for noast source text.
//!
//! [`Tokenizer`] is a lazy iterator: it yields tokens on demand, then one
//! `Eof` token, then nothing. The first error also ends the sequence.

use crate::error::LexError;
use crate::token::{Token, TokenKind};

/// Lazy tokenizer over a source string.
///
/// Cloning a tokenizer restarts nothing; it forks the sequence at the
/// current position. `Tokenizer::new` on the same text starts over.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    source: &'a str,
    pos: usize,
    line: usize,
    finished: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            finished: false,
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek_char(), Some(' ' | '\t' | '\n' | '\r')) {
            self.bump();
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let source = self.source;
        let start = self.pos;
        while self.peek_char().is_some_and(&pred) {
            self.bump();
        }
        &source[start..self.pos]
    }

    fn read_string(&mut self, quote: char) -> Result<Token, LexError> {
        let line = self.line;
        self.bump(); // opening quote
        let start = self.pos;
        loop {
            match self.peek_char() {
                None => return Err(LexError::UnterminatedString { line }),
                Some(c) if c == quote => break,
                Some(_) => {
                    self.bump();
                }
            }
        }
        let text = &self.source[start..self.pos];
        self.bump(); // closing quote
        Ok(Token::new(TokenKind::Str, text, line))
    }

    fn read_operator(&mut self, first: char) -> Token {
        let line = self.line;
        self.bump();
        if self.peek_char() == Some('=') {
            self.bump();
            return Token::new(TokenKind::Operator, format!("{first}="), line);
        }
        let kind = if first == '=' {
            TokenKind::Assign
        } else {
            TokenKind::Operator
        };
        Token::new(kind, first.to_string(), line)
    }

    fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();
        let line = self.line;

        let c = match self.peek_char() {
            None => return Ok(Token::eof(line)),
            Some(c) => c,
        };

        match c {
            '0'..='9' => {
                let text = self.take_while(|c| c.is_ascii_digit() || c == '.');
                Ok(Token::new(TokenKind::Number, text, line))
            }
            'a'..='z' | 'A'..='Z' | '_' => {
                let text = self.take_while(|c| c.is_ascii_alphanumeric() || c == '_');
                Ok(Token::new(TokenKind::Identifier, text, line))
            }
            '+' | '-' | '*' | '/' | '=' | '>' | '<' => Ok(self.read_operator(c)),
            '\'' | '"' => self.read_string(c),
            '(' | ')' | '{' | '}' | ',' | ';' => {
                self.bump();
                Ok(Token::new(TokenKind::Punctuation, c.to_string(), line))
            }
            other => Err(LexError::UnrecognizedCharacter { line, ch: other }),
        }
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let result = self.next_token();
        match &result {
            Ok(tok) if tok.kind != TokenKind::Eof => {}
            _ => self.finished = true,
        }
        Some(result)
    }
}

/// Tokenize a whole source string, ending with the `Eof` token.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Tokenizer::new(source).collect()
}
