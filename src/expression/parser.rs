use super::lexer::{tokenize, Token, TokenKind};
use super::{ExpressionError, LicenseTerm, Operator, SpdxExpression};

/// Parse an SPDX license expression.
///
/// Grammar (WITH binds tighter than AND, AND tighter than OR):
/// ```text
/// expr     := or_expr
/// or_expr  := and_expr ( "OR" and_expr )*
/// and_expr := primary ( "AND" primary )*
/// primary  := "(" expr ")" | term
/// term     := id [ "+" ] [ "WITH" id ] | license-ref [ "WITH" id ]
/// ```
///
/// A chain of the same operator becomes one compound with all operands.
/// Explicit parentheses are kept as nesting.
pub fn parse(source: &str) -> Result<SpdxExpression, ExpressionError> {
    let tokens = tokenize(source)?;
    if tokens.is_empty() {
        return Err(ExpressionError::syntax(source, "", 0, "empty expression"));
    }

    let mut parser = ExprParser {
        source,
        tokens,
        pos: 0,
    };
    let expression = parser.parse_or()?;

    if let Some(token) = parser.peek() {
        return Err(parser.unexpected(token, "expected an operator"));
    }

    Ok(expression)
}

struct ExprParser<'a> {
    source: &'a str,
    tokens: Vec<Token<'a>>,
    pos: usize,
}

impl<'a> ExprParser<'a> {
    fn peek(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    fn advance(&mut self) -> Option<Token<'a>> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn unexpected(&self, token: &Token<'_>, message: &str) -> ExpressionError {
        ExpressionError::syntax(self.source, token.text, token.offset, message)
    }

    fn end_of_input(&self, message: &str) -> ExpressionError {
        let fragment = self.tokens.last().map(|t| t.text).unwrap_or_default();
        ExpressionError::syntax(self.source, fragment, self.source.len(), message)
    }

    fn parse_or(&mut self) -> Result<SpdxExpression, ExpressionError> {
        let mut operands = vec![self.parse_and()?];
        while self.peek_kind() == Some(TokenKind::Or) {
            self.advance();
            operands.push(self.parse_and()?);
        }
        Ok(collapse(Operator::Or, operands))
    }

    fn parse_and(&mut self) -> Result<SpdxExpression, ExpressionError> {
        let mut operands = vec![self.parse_primary()?];
        while self.peek_kind() == Some(TokenKind::And) {
            self.advance();
            operands.push(self.parse_primary()?);
        }
        Ok(collapse(Operator::And, operands))
    }

    fn parse_primary(&mut self) -> Result<SpdxExpression, ExpressionError> {
        let Some(token) = self.advance() else {
            return Err(self.end_of_input("expected a license id or '('"));
        };

        match token.kind {
            TokenKind::LParen => {
                let inner = self.parse_or()?;
                match self.advance() {
                    Some(t) if t.kind == TokenKind::RParen => Ok(inner),
                    Some(t) => Err(self.unexpected(&t, "expected ')'")),
                    None => Err(self.end_of_input("unbalanced '('")),
                }
            }
            TokenKind::Ident | TokenKind::LicenseRef | TokenKind::DocumentRef => {
                self.parse_term(token).map(SpdxExpression::License)
            }
            _ => Err(self.unexpected(&token, "expected a license id or '('")),
        }
    }

    fn parse_term(&mut self, id: Token<'a>) -> Result<LicenseTerm, ExpressionError> {
        let mut or_later = false;
        if self.peek_kind() == Some(TokenKind::Plus) {
            let plus = self.advance();
            if id.kind != TokenKind::Ident {
                let plus = plus.unwrap_or_else(|| id.clone());
                return Err(self.unexpected(&plus, "'+' is only allowed after a license id"));
            }
            or_later = true;
        }

        let mut exception = None;
        if self.peek_kind() == Some(TokenKind::With) {
            self.advance();
            match self.advance() {
                Some(t) if t.kind == TokenKind::Ident || t.kind == TokenKind::LicenseRef => {
                    exception = Some(t.text.to_string());
                }
                Some(t) => return Err(self.unexpected(&t, "expected an exception id after 'WITH'")),
                None => return Err(self.end_of_input("expected an exception id after 'WITH'")),
            }
        }

        Ok(LicenseTerm {
            id: id.text.to_string(),
            or_later,
            exception,
        })
    }
}

fn collapse(operator: Operator, mut operands: Vec<SpdxExpression>) -> SpdxExpression {
    if operands.len() == 1 {
        operands.remove(0)
    } else {
        SpdxExpression::Compound { operator, operands }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn license(id: &str) -> SpdxExpression {
        SpdxExpression::License(LicenseTerm::new(id))
    }

    #[test]
    fn test_single_license() {
        assert_eq!(parse("MIT").unwrap(), license("MIT"));
    }

    #[test]
    fn test_or_later_and_exception() {
        let expr = parse("GPL-2.0+ WITH Classpath-exception-2.0").unwrap();
        assert_eq!(
            expr,
            SpdxExpression::License(LicenseTerm {
                id: "GPL-2.0".to_string(),
                or_later: true,
                exception: Some("Classpath-exception-2.0".to_string()),
            })
        );
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        let expr = parse("MIT OR GPL-3.0-only AND BSD-3-Clause").unwrap();
        assert_eq!(
            expr,
            SpdxExpression::Compound {
                operator: Operator::Or,
                operands: vec![
                    license("MIT"),
                    SpdxExpression::Compound {
                        operator: Operator::And,
                        operands: vec![license("GPL-3.0-only"), license("BSD-3-Clause")],
                    },
                ],
            }
        );
    }

    #[test]
    fn test_chain_is_flat() {
        match parse("A AND B AND C").unwrap() {
            SpdxExpression::Compound { operator, operands } => {
                assert_eq!(operator, Operator::And);
                assert_eq!(operands.len(), 3);
            }
            other => panic!("expected compound, got {other:?}"),
        }
    }

    #[test]
    fn test_parentheses_keep_nesting() {
        let expr = parse("(A AND B) AND C").unwrap();
        assert_eq!(
            expr,
            SpdxExpression::Compound {
                operator: Operator::And,
                operands: vec![
                    SpdxExpression::Compound {
                        operator: Operator::And,
                        operands: vec![license("A"), license("B")],
                    },
                    license("C"),
                ],
            }
        );
    }

    #[test]
    fn test_redundant_parentheses() {
        assert_eq!(parse("((MIT))").unwrap(), license("MIT"));
    }

    #[test]
    fn test_errors_name_fragment() {
        for (input, fragment) in [
            ("MIT AND", "AND"),
            ("MIT Apache-2.0", "Apache-2.0"),
            ("(MIT OR ISC", "ISC"),
            ("MIT OR )", ")"),
            ("MIT WITH (", "("),
            ("LicenseRef-x+", "+"),
            ("AND MIT", "AND"),
        ] {
            match parse(input) {
                Err(ExpressionError::Syntax { fragment: f, .. }) => {
                    assert_eq!(f, fragment, "input {input:?}")
                }
                other => panic!("expected syntax error for {input:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(parse("   "), Err(ExpressionError::Syntax { .. })));
    }
}
