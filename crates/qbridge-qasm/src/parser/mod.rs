//! Recursive-descent parser for the supported OpenQASM subset.

mod expression;
mod lowering;
mod statement;

use qbridge_ir::Circuit;

use crate::ast::Program;
use crate::error::{ParseError, ParseResult};
use crate::lexer::{SpannedToken, Token, tokenize};

/// Parse OpenQASM 2 or 3 source into a source-framework [`Circuit`].
///
/// Register names and declaration order are kept. Gates outside the
/// standard library become opaque custom gates.
pub fn parse(source: &str) -> ParseResult<Circuit> {
    let program = parse_program(source)?;
    lowering::lower_to_circuit(&program)
}

/// Parse OpenQASM source into a syntax tree without lowering it.
pub fn parse_program(source: &str) -> ParseResult<Program> {
    let mut parser = Parser::new(source)?;
    parser.parse_program()
}

/// Parser state.
pub(super) struct Parser {
    pub(super) tokens: Vec<SpannedToken>,
    pub(super) pos: usize,
}

impl Parser {
    fn new(source: &str) -> ParseResult<Self> {
        let tokens = tokenize(source).map_err(|e| ParseError::LexerError {
            line: e.line,
            message: e.message,
        })?;
        Ok(Self { tokens, pos: 0 })
    }

    /// Line of the current token, or of the last one at end of input.
    pub(super) fn line(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or(1, |t| t.line)
    }

    pub(super) fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub(super) fn peek(&self) -> Option<&Token> {
        self.peek_nth(0)
    }

    pub(super) fn peek_nth(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.pos + n).map(|t| &t.token)
    }

    pub(super) fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos)?.token.clone();
        self.pos += 1;
        Some(token)
    }

    /// Expect a token of the same kind as `expected`.
    #[allow(clippy::needless_pass_by_value)]
    pub(super) fn expect(&mut self, expected: Token) -> ParseResult<()> {
        let line = self.line();
        let found = self
            .advance()
            .ok_or_else(|| ParseError::UnexpectedEof(format!("expected {expected}")))?;

        if std::mem::discriminant(&found) != std::mem::discriminant(&expected) {
            return Err(ParseError::UnexpectedToken {
                line,
                expected: expected.to_string(),
                found: found.to_string(),
            });
        }
        Ok(())
    }

    pub(super) fn check(&self, token: &Token) -> bool {
        self.peek()
            .is_some_and(|t| std::mem::discriminant(t) == std::mem::discriminant(token))
    }

    pub(super) fn consume(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub(super) fn unexpected(&self, expected: &str) -> ParseError {
        match self.peek() {
            Some(found) => ParseError::UnexpectedToken {
                line: self.line(),
                expected: expected.to_string(),
                found: found.to_string(),
            },
            None => ParseError::UnexpectedEof(expected.to_string()),
        }
    }

    fn parse_program(&mut self) -> ParseResult<Program> {
        self.expect(Token::OpenQasm)?;
        let version = self.parse_version()?;
        self.expect(Token::Semicolon)?;

        let mut statements = Vec::new();
        while !self.is_eof() {
            statements.push(self.parse_statement()?);
        }

        Ok(Program {
            version,
            statements,
        })
    }

    fn parse_version(&mut self) -> ParseResult<String> {
        let version = match self.advance() {
            Some(Token::FloatLiteral(v)) => format!("{v:?}"),
            Some(Token::IntLiteral(v)) => format!("{v}.0"),
            Some(other) => return Err(ParseError::InvalidVersion(other.to_string())),
            None => return Err(ParseError::UnexpectedEof("version number".into())),
        };
        match version.as_str() {
            "2.0" | "3.0" => Ok(version),
            _ => Err(ParseError::InvalidVersion(version)),
        }
    }

    pub(super) fn parse_identifier(&mut self) -> ParseResult<String> {
        match self.peek() {
            Some(Token::Identifier(_)) => match self.advance() {
                Some(Token::Identifier(s)) => Ok(s),
                _ => Err(self.unexpected("identifier")),
            },
            _ => Err(self.unexpected("identifier")),
        }
    }

    /// Parse an integer literal that must fit a slot index.
    pub(super) fn parse_index(&mut self) -> ParseResult<u32> {
        match self.peek() {
            Some(&Token::IntLiteral(v)) => {
                self.pos += 1;
                u32::try_from(v).map_err(|_| ParseError::LiteralOverflow(v))
            }
            _ => Err(self.unexpected("integer")),
        }
    }
}
