//! Parser: recursive descent over formulation tokens
//!
//! ```text
//! statement := IDENT ('=' | '+=') expr ';'?
//! expr      := term (('+' | '-') term)*
//! term      := unary (('*' | '/' | '%') unary)*
//! unary     := ('-' | '+') unary | primary
//! primary   := NUMBER | IDENT | IDENT '(' args? ')' | '(' expr ')' | table
//! table     := '{' '{' signed ',' signed '}' (',' '{' signed ',' signed '}')* '}'
//! ```

use crate::ast::{AssignOp, BinaryOp, Expr, Statement};
use crate::error::{FormulationError, FormulationResult};
use crate::lexer::{Lexer, Token, TokenKind};

/// Deepest parenthesis nesting and tallest operation tree a statement may
/// have. Both the interpreter and tree teardown recurse once per level.
pub const MAX_DEPTH: usize = 256;

/// An expression and the height of its tree.
type Parsed = (Expr, usize);

/// Parser for formulation statements and expressions
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    nesting: usize,
}

impl Parser {
    /// Parse a single `target = expr` or `target += expr` statement
    pub fn parse_statement(input: &str) -> FormulationResult<Statement> {
        let mut parser = Self::new(input)?;
        let statement = parser.statement()?;
        parser.finish()?;
        Ok(statement)
    }

    /// Parse a standalone expression
    pub fn parse_expression(input: &str) -> FormulationResult<Expr> {
        let mut parser = Self::new(input)?;
        let expr = parser.expression()?;
        parser.finish()?;
        Ok(expr)
    }

    fn new(input: &str) -> FormulationResult<Self> {
        let tokens = Lexer::new(input).tokenize()?;
        Ok(Self {
            tokens,
            pos: 0,
            nesting: 0,
        })
    }

    fn statement(&mut self) -> FormulationResult<Statement> {
        let target = self.expect(TokenKind::Identifier)?.text.clone();
        let op = match self.peek_kind() {
            TokenKind::Assign => AssignOp::Set,
            TokenKind::PlusAssign => AssignOp::Accumulate,
            _ => return Err(self.unexpected("'=' or '+='")),
        };
        self.advance();
        let value = self.expression()?;
        Ok(Statement { target, op, value })
    }

    fn finish(&mut self) -> FormulationResult<()> {
        if self.check(TokenKind::Semicolon) {
            self.advance();
        }
        if self.check(TokenKind::Eof) {
            Ok(())
        } else {
            Err(self.unexpected("end of input"))
        }
    }

    fn expression(&mut self) -> FormulationResult<Expr> {
        Ok(self.sum()?.0)
    }

    fn sum(&mut self) -> FormulationResult<Parsed> {
        let (mut left, mut height) = self.term()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let (right, right_height) = self.term()?;
            height = self.grown(height.max(right_height))?;
            left = Expr::binary(op, left, right);
        }
        Ok((left, height))
    }

    fn term(&mut self) -> FormulationResult<Parsed> {
        let (mut left, mut height) = self.unary()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Rem,
                _ => break,
            };
            self.advance();
            let (right, right_height) = self.unary()?;
            height = self.grown(height.max(right_height))?;
            left = Expr::binary(op, left, right);
        }
        Ok((left, height))
    }

    fn unary(&mut self) -> FormulationResult<Parsed> {
        match self.peek_kind() {
            TokenKind::Minus => {
                self.advance();
                let (inner, height) = self.nested(Self::unary)?;
                Ok((Expr::Negate(Box::new(inner)), self.grown(height)?))
            }
            TokenKind::Plus => {
                self.advance();
                self.nested(Self::unary)
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> FormulationResult<Parsed> {
        match self.peek_kind() {
            TokenKind::NumberLiteral => {
                let value = self.expect_number()?;
                Ok((Expr::Number(value), 1))
            }
            TokenKind::Identifier => {
                let name = self.expect(TokenKind::Identifier)?.text.clone();
                if self.check(TokenKind::OpenParen) {
                    self.advance();
                    let (args, height) = self.nested(Self::arguments)?;
                    Ok((Expr::Call { name, args }, self.grown(height)?))
                } else {
                    Ok((Expr::Variable(name), 1))
                }
            }
            TokenKind::OpenParen => {
                self.advance();
                let inner = self.nested(Self::sum)?;
                self.expect(TokenKind::CloseParen)?;
                Ok(inner)
            }
            TokenKind::OpenBrace => Ok((self.table()?, 1)),
            _ => Err(self.unexpected("expression")),
        }
    }

    /// Call arguments and the height of the tallest one.
    fn arguments(&mut self) -> FormulationResult<(Vec<Expr>, usize)> {
        let mut args = Vec::new();
        let mut height = 0;
        if self.check(TokenKind::CloseParen) {
            self.advance();
            return Ok((args, height));
        }
        loop {
            let (arg, arg_height) = self.sum()?;
            args.push(arg);
            height = height.max(arg_height);
            if self.check(TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        self.expect(TokenKind::CloseParen)?;
        Ok((args, height))
    }

    /// Run `parse` one nesting level deeper.
    fn nested<T>(&mut self, parse: fn(&mut Self) -> FormulationResult<T>) -> FormulationResult<T> {
        if self.nesting >= MAX_DEPTH {
            return Err(FormulationError::TooDeep { limit: MAX_DEPTH });
        }
        self.nesting += 1;
        let result = parse(self);
        self.nesting -= 1;
        result
    }

    /// Height of a new node over a subtree of height `height`.
    fn grown(&self, height: usize) -> FormulationResult<usize> {
        if height >= MAX_DEPTH {
            Err(FormulationError::TooDeep { limit: MAX_DEPTH })
        } else {
            Ok(height + 1)
        }
    }

    fn table(&mut self) -> FormulationResult<Expr> {
        self.expect(TokenKind::OpenBrace)?;
        let mut points = Vec::new();
        loop {
            self.expect(TokenKind::OpenBrace)?;
            let x = self.signed_number()?;
            self.expect(TokenKind::Comma)?;
            let y = self.signed_number()?;
            self.expect(TokenKind::CloseBrace)?;
            points.push((x, y));
            if self.check(TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        self.expect(TokenKind::CloseBrace)?;
        Ok(Expr::Table(points))
    }

    fn signed_number(&mut self) -> FormulationResult<f64> {
        let negative = match self.peek_kind() {
            TokenKind::Minus => {
                self.advance();
                true
            }
            TokenKind::Plus => {
                self.advance();
                false
            }
            _ => false,
        };
        let value = self.expect_number()?;
        Ok(if negative { -value } else { value })
    }

    // --- Helpers ---

    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    fn advance(&mut self) -> &Token {
        let idx = self.pos.min(self.tokens.len() - 1);
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        &self.tokens[idx]
    }

    fn expect(&mut self, kind: TokenKind) -> FormulationResult<&Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(&kind.to_string()))
        }
    }

    fn expect_number(&mut self) -> FormulationResult<f64> {
        let token = self.expect(TokenKind::NumberLiteral)?.clone();
        token.text.parse::<f64>().map_err(|_| FormulationError::Parse {
            line: token.line,
            col: token.col,
            message: format!("invalid number literal '{}'", token.text),
        })
    }

    fn unexpected(&self, expected: &str) -> FormulationError {
        let tok = self.peek();
        let found = if tok.kind == TokenKind::Eof {
            "end of input".to_string()
        } else {
            format!("'{}'", tok.text)
        };
        FormulationError::Parse {
            line: tok.line,
            col: tok.col,
            message: format!("expected {}, found {}", expected, found),
        }
    }
}
