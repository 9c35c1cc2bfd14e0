//! Lexical tokens.

/// Classification of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// End of input. Emitted exactly once, last.
    Eof,
    /// `[A-Za-z_][A-Za-z0-9_]*`. Keywords are identifiers too.
    Identifier,
    /// A run of digits and `.` starting with a digit.
    Number,
    /// Quoted text; the token text excludes the quotes.
    Str,
    /// `+ - * / > <`, or any of those (and `=`) followed by `=`.
    Operator,
    /// A lone `=`.
    Assign,
    /// One of `( ) { } , ;`.
    Punctuation,
}

impl TokenKind {
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Eof => "EOF",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Number => "NUMBER",
            TokenKind::Str => "STRING",
            TokenKind::Operator => "OPERATOR",
            TokenKind::Assign => "ASSIGN",
            TokenKind::Punctuation => "PUNCTUATION",
        }
    }
}

/// A single token with the line it started on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// 1-based source line.
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
        }
    }

    pub fn eof(line: usize) -> Self {
        Self::new(TokenKind::Eof, "", line)
    }

    /// True if this is the punctuation token `p`.
    pub fn is_punct(&self, p: &str) -> bool {
        self.kind == TokenKind::Punctuation && self.text == p
    }

    /// True if this is the identifier `word`.
    pub fn is_word(&self, word: &str) -> bool {
        self.kind == TokenKind::Identifier && self.text == word
    }

    /// Same kind and text, ignoring position.
    pub fn same_lexeme(&self, other: &Token) -> bool {
        self.kind == other.kind && self.text == other.text
    }

    /// Diagnostic form, e.g. `IDENTIFIER(x)` or `EOF`.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Eof => "EOF".to_string(),
            kind => format!("{}({})", kind.name(), self.text),
        }
    }
}

impl std::fmt::Display for Token {
    /// Formats the token as source text that tokenizes back to it.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TokenKind::Eof => Ok(()),
            TokenKind::Str if self.text.contains('"') => write!(f, "'{}'", self.text),
            TokenKind::Str => write!(f, "\"{}\"", self.text),
            _ => f.write_str(&self.text),
        }
    }
}
