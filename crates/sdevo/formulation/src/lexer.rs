//! Lexer: tokenizes formulation statements and expressions
//!
//! Handles identifiers (with an optional `this.` or `Math.` qualifier),
//! decimal and scientific number literals, arithmetic operators, the `=` and
//! `+=` assignment forms, and the braces used by interpolation tables.

use crate::error::{FormulationError, FormulationResult};

/// A token produced by the lexer
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The raw text of the token
    pub text: String,
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based)
    pub col: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize, col: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
            col,
        }
    }
}

/// Token types
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    Identifier,
    NumberLiteral,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Assign,     // =
    PlusAssign, // +=

    // Structural
    OpenParen,
    CloseParen,
    OpenBrace,
    CloseBrace,
    Comma,
    Semicolon,

    // End of input
    Eof,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Identifier => write!(f, "identifier"),
            Self::NumberLiteral => write!(f, "number"),
            Self::Plus => write!(f, "+"),
            Self::Minus => write!(f, "-"),
            Self::Star => write!(f, "*"),
            Self::Slash => write!(f, "/"),
            Self::Percent => write!(f, "%"),
            Self::Assign => write!(f, "="),
            Self::PlusAssign => write!(f, "+="),
            Self::OpenParen => write!(f, "("),
            Self::CloseParen => write!(f, ")"),
            Self::OpenBrace => write!(f, "{{"),
            Self::CloseBrace => write!(f, "}}"),
            Self::Comma => write!(f, ","),
            Self::Semicolon => write!(f, ";"),
            Self::Eof => write!(f, "end of input"),
        }
    }
}

/// Qualifiers accepted in front of an identifier and dropped.
const QUALIFIERS: [&str; 2] = ["this", "Math"];

/// Lexer for formulation text
pub struct Lexer {
    input: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
}

impl Lexer {
    /// Create a new lexer from input text
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> FormulationResult<Vec<Token>> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace_and_comments();

            if self.pos >= self.input.len() {
                tokens.push(Token::new(TokenKind::Eof, "", self.line, self.col));
                break;
            }

            let token = self.next_token()?;
            tokens.push(token);
        }

        Ok(tokens)
    }

    fn next_token(&mut self) -> FormulationResult<Token> {
        let ch = self.input[self.pos];
        let line = self.line;
        let col = self.col;

        let single = |kind: TokenKind| Token::new(kind, ch.to_string(), line, col);

        match ch {
            '+' if self.peek_at(1) == Some('=') => {
                self.advance();
                self.advance();
                Ok(Token::new(TokenKind::PlusAssign, "+=", line, col))
            }
            '+' | '-' | '*' | '/' | '%' | '=' | '(' | ')' | '{' | '}' | ',' | ';' => {
                let kind = match ch {
                    '+' => TokenKind::Plus,
                    '-' => TokenKind::Minus,
                    '*' => TokenKind::Star,
                    '/' => TokenKind::Slash,
                    '%' => TokenKind::Percent,
                    '=' => TokenKind::Assign,
                    '(' => TokenKind::OpenParen,
                    ')' => TokenKind::CloseParen,
                    '{' => TokenKind::OpenBrace,
                    '}' => TokenKind::CloseBrace,
                    ',' => TokenKind::Comma,
                    _ => TokenKind::Semicolon,
                };
                self.advance();
                Ok(single(kind))
            }
            c if c.is_ascii_digit() => self.read_number(),
            '.' if self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) => self.read_number(),
            c if c.is_ascii_alphabetic() || c == '_' => self.read_identifier(),
            _ => Err(FormulationError::Parse {
                line,
                col,
                message: format!("unexpected character: '{}'", ch),
            }),
        }
    }

    fn read_number(&mut self) -> FormulationResult<Token> {
        let line = self.line;
        let col = self.col;
        let mut text = String::new();

        self.read_digits(&mut text);
        if self.current() == Some('.') {
            text.push('.');
            self.advance();
            self.read_digits(&mut text);
        }

        // Exponent only when digits follow, so `2e` stays a malformed literal.
        if matches!(self.current(), Some('e' | 'E')) {
            let signed = matches!(self.peek_at(1), Some('+' | '-'));
            let digit_at = if signed { 2 } else { 1 };
            if self.peek_at(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                for _ in 0..digit_at {
                    if let Some(c) = self.current() {
                        text.push(c);
                    }
                    self.advance();
                }
                self.read_digits(&mut text);
            }
        }

        if self
            .current()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        {
            return Err(FormulationError::Parse {
                line,
                col,
                message: format!("malformed number literal starting with '{}'", text),
            });
        }

        Ok(Token::new(TokenKind::NumberLiteral, text, line, col))
    }

    fn read_digits(&mut self, text: &mut String) {
        while let Some(c) = self.current() {
            if !c.is_ascii_digit() {
                break;
            }
            text.push(c);
            self.advance();
        }
    }

    fn read_identifier(&mut self) -> FormulationResult<Token> {
        let line = self.line;
        let col = self.col;
        let mut text = self.read_word();

        while QUALIFIERS.contains(&text.as_str())
            && self.current() == Some('.')
            && self
                .peek_at(1)
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        {
            self.advance();
            text = self.read_word();
        }

        Ok(Token::new(TokenKind::Identifier, text, line, col))
    }

    fn read_word(&mut self) -> String {
        let mut text = String::new();
        while let Some(c) = self.current() {
            if !(c.is_ascii_alphanumeric() || c == '_') {
                break;
            }
            text.push(c);
            self.advance();
        }
        text
    }

    fn skip_whitespace_and_comments(&mut self) {
        while self.pos < self.input.len() {
            let ch = self.input[self.pos];
            if ch.is_whitespace() {
                self.advance();
            } else if ch == '#' || (ch == '/' && self.peek_at(1) == Some('/')) {
                // Line comment
                while self.pos < self.input.len() && self.input[self.pos] != '\n' {
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    fn current(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn advance(&mut self) {
        if self.pos < self.input.len() {
            if self.input[self.pos] == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
            self.pos += 1;
        }
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.input.get(self.pos + offset).copied()
    }
}
