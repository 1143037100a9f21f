//! Statement parsing.

use super::Parser;
use crate::ast::{GateCall, Located, Operand, Statement};
use crate::error::{ParseError, ParseResult};
use crate::lexer::Token;

impl Parser {
    pub(super) fn parse_statement(&mut self) -> ParseResult<Located<Statement>> {
        let line = self.line();
        let token = self
            .peek()
            .cloned()
            .ok_or_else(|| ParseError::UnexpectedEof("statement".into()))?;

        let node = match token {
            Token::Include => self.parse_include()?,
            Token::Qubit => self.parse_sized_decl(true)?,
            Token::Bit => self.parse_sized_decl(false)?,
            Token::Qreg => self.parse_legacy_decl(true)?,
            Token::Creg => self.parse_legacy_decl(false)?,
            Token::Measure => self.parse_measure()?,
            Token::Reset => self.parse_reset()?,
            Token::Barrier => self.parse_barrier()?,
            Token::Identifier(_) => self.parse_identifier_statement()?,
            Token::Gate | Token::If | Token::For | Token::LBrace => {
                return Err(ParseError::Unsupported {
                    line,
                    what: format!("'{token}' blocks"),
                });
            }
            _ => return Err(self.unexpected("statement")),
        };

        Ok(Located { line, node })
    }

    fn parse_include(&mut self) -> ParseResult<Statement> {
        self.expect(Token::Include)?;
        let path = match self.peek() {
            Some(Token::StringLiteral(_)) => match self.advance() {
                Some(Token::StringLiteral(s)) => s,
                _ => return Err(self.unexpected("string literal")),
            },
            _ => return Err(self.unexpected("string literal")),
        };
        self.expect(Token::Semicolon)?;
        Ok(Statement::Include(path))
    }

    /// `qubit[n] name;` / `bit name;`
    fn parse_sized_decl(&mut self, quantum: bool) -> ParseResult<Statement> {
        self.advance();
        let size = if self.consume(&Token::LBracket) {
            let size = self.parse_index()?;
            self.expect(Token::RBracket)?;
            size
        } else {
            1
        };
        let name = self.parse_identifier()?;
        self.expect(Token::Semicolon)?;
        Ok(Self::declaration(quantum, name, size))
    }

    /// `qreg name[n];` / `creg name[n];`
    fn parse_legacy_decl(&mut self, quantum: bool) -> ParseResult<Statement> {
        self.advance();
        let name = self.parse_identifier()?;
        self.expect(Token::LBracket)?;
        let size = self.parse_index()?;
        self.expect(Token::RBracket)?;
        self.expect(Token::Semicolon)?;
        Ok(Self::declaration(quantum, name, size))
    }

    fn declaration(quantum: bool, name: String, size: u32) -> Statement {
        if quantum {
            Statement::QubitDecl { name, size }
        } else {
            Statement::BitDecl { name, size }
        }
    }

    /// `measure q[0] -> c[0];` or `measure q[0];`
    fn parse_measure(&mut self) -> ParseResult<Statement> {
        self.expect(Token::Measure)?;
        let source = self.parse_operand()?;
        let target = if self.consume(&Token::Arrow) {
            Some(self.parse_operand()?)
        } else {
            None
        };
        self.expect(Token::Semicolon)?;
        Ok(Statement::Measure { source, target })
    }

    fn parse_reset(&mut self) -> ParseResult<Statement> {
        self.expect(Token::Reset)?;
        let operand = self.parse_operand()?;
        self.expect(Token::Semicolon)?;
        Ok(Statement::Reset(operand))
    }

    fn parse_barrier(&mut self) -> ParseResult<Statement> {
        self.expect(Token::Barrier)?;
        let operands = if self.check(&Token::Semicolon) {
            vec![]
        } else {
            self.parse_operand_list()?
        };
        self.expect(Token::Semicolon)?;
        Ok(Statement::Barrier(operands))
    }

    /// Either a gate call or a measurement assignment.
    ///
    /// A gate name is never followed by `[` or `=`, so one token of
    /// lookahead past the identifier decides.
    fn parse_identifier_statement(&mut self) -> ParseResult<Statement> {
        match self.peek_nth(1) {
            Some(Token::LBracket | Token::Eq) => self.parse_measure_assignment(),
            _ => self.parse_gate_call().map(Statement::Gate),
        }
    }

    /// `c[0] = measure q[0];`
    fn parse_measure_assignment(&mut self) -> ParseResult<Statement> {
        let target = self.parse_operand()?;
        self.expect(Token::Eq)?;
        self.expect(Token::Measure)?;
        let source = self.parse_operand()?;
        self.expect(Token::Semicolon)?;
        Ok(Statement::Measure {
            source,
            target: Some(target),
        })
    }

    fn parse_gate_call(&mut self) -> ParseResult<GateCall> {
        let name = self.parse_identifier()?;
        let params = if self.consume(&Token::LParen) {
            let params = self.parse_expression_list()?;
            self.expect(Token::RParen)?;
            params
        } else {
            vec![]
        };
        let operands = self.parse_operand_list()?;
        self.expect(Token::Semicolon)?;
        Ok(GateCall {
            name,
            params,
            operands,
        })
    }

    fn parse_operand_list(&mut self) -> ParseResult<Vec<Operand>> {
        let mut operands = vec![self.parse_operand()?];
        while self.consume(&Token::Comma) {
            operands.push(self.parse_operand()?);
        }
        Ok(operands)
    }

    fn parse_operand(&mut self) -> ParseResult<Operand> {
        let register = self.parse_identifier()?;
        let index = if self.consume(&Token::LBracket) {
            let index = self.parse_index()?;
            self.expect(Token::RBracket)?;
            Some(index)
        } else {
            None
        };
        Ok(Operand { register, index })
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{Expression, Operand, Statement};
    use crate::error::ParseError;
    use crate::parser::parse_program;

    fn statements(body: &str) -> Vec<Statement> {
        parse_program(&format!("OPENQASM 3.0;\n{body}"))
            .unwrap()
            .statements
            .into_iter()
            .map(|s| s.node)
            .collect()
    }

    #[test]
    fn test_declarations() {
        let decls = statements("qubit[3] q; bit c; qreg anc[2]; creg out[4];");
        assert_eq!(
            decls,
            vec![
                Statement::QubitDecl {
                    name: "q".into(),
                    size: 3
                },
                Statement::BitDecl {
                    name: "c".into(),
                    size: 1
                },
                Statement::QubitDecl {
                    name: "anc".into(),
                    size: 2
                },
                Statement::BitDecl {
                    name: "out".into(),
                    size: 4
                },
            ]
        );
    }

    #[test]
    fn test_gate_call_with_params() {
        let stmts = statements("crz(0.5) q[0], q[1];");
        let Statement::Gate(call) = &stmts[0] else {
            panic!("expected gate call");
        };
        assert_eq!(call.name, "crz");
        assert_eq!(call.params, vec![Expression::Float(0.5)]);
        assert_eq!(
            call.operands,
            vec![Operand::indexed("q", 0), Operand::indexed("q", 1)]
        );
    }

    #[test]
    fn test_broadcast_operand() {
        let stmts = statements("h q;");
        let Statement::Gate(call) = &stmts[0] else {
            panic!("expected gate call");
        };
        assert_eq!(call.operands, vec![Operand::whole("q")]);
    }

    #[test]
    fn test_whole_register_measure_assignment() {
        let stmts = statements("c = measure q;");
        assert_eq!(
            stmts[0],
            Statement::Measure {
                source: Operand::whole("q"),
                target: Some(Operand::whole("c")),
            }
        );
    }

    #[test]
    fn test_barrier_forms() {
        let stmts = statements("barrier; barrier q[0], r;");
        assert_eq!(stmts[0], Statement::Barrier(vec![]));
        assert_eq!(
            stmts[1],
            Statement::Barrier(vec![Operand::indexed("q", 0), Operand::whole("r")])
        );
    }

    #[test]
    fn test_gate_definition_rejected() {
        let err = parse_program("OPENQASM 3.0;\ngate g a { h a; }").unwrap_err();
        assert!(matches!(err, ParseError::Unsupported { line: 2, .. }));
    }

    #[test]
    fn test_missing_semicolon() {
        let err = parse_program("OPENQASM 3.0;\nh q[0]\nx q[1];").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { line: 3, .. }));
    }
}
