use sentinel_types::{Number, TypeMask, Value};

use crate::ast::Node;
use crate::error::{new_parse_error, ParseError, ParseErrorKind};
use crate::lexer::{Builtin, ComparisonOp, Lexer, LogicOp, MathOp, Polarity, Token, TokenKind};

/// A parsed, type-checked policy expression: a polarity (`allow`/`deny`)
/// plus an optional expression tree. An absent tree means the bare polarity
/// with no condition, which the guard treats as an unconditional decision.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    pub polarity: Polarity,
    pub root: Option<Node>,
}

/// Parses a full policy expression (`"allow: Role('admin') and $age >= 18"`)
/// into a [`SyntaxTree`].
///
/// Implemented as straightforward recursive descent over the precedence
/// chain `LOGIC -> CMP -> SUM -> PROD -> UNARY -> PRIMARY`, rather than the
/// original's dual-stack operator-precedence merge with in-place node
/// rotation (`ChangeLeft`/`ChangeRight`). Recursive descent produces the
/// identical tree shape for this grammar — every binary level is strictly
/// left-associative and comparisons don't chain — while keeping every node
/// immutable from the moment it's constructed.
pub fn parse(source: &str) -> Result<SyntaxTree, ParseError> {
    let tokens = Lexer::new(source).tokenize()?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        source,
    };
    parser.parse_policy()
}

struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    source: &'a str,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn err_at(&self, tok: &Token, kind: ParseErrorKind) -> ParseError {
        new_parse_error(tok.line, tok.offset, self.source, kind)
    }

    fn parse_policy(&mut self) -> Result<SyntaxTree, ParseError> {
        let polarity = match self.peek().kind.clone() {
            TokenKind::Policy(p) => {
                self.advance();
                p
            }
            _ => return Err(self.err_at(self.peek(), ParseErrorKind::MissingPolarity)),
        };

        if matches!(self.peek().kind, TokenKind::Eof) {
            return Ok(SyntaxTree {
                polarity,
                root: None,
            });
        }

        self.expect_colon()?;
        let root = self.parse_logic()?;
        if !matches!(self.peek().kind, TokenKind::Eof) {
            let tok = self.peek().clone();
            return Err(self.err_at(
                &tok,
                ParseErrorKind::Unexpected {
                    expected: "end of expression".into(),
                    found: tok.kind.to_string(),
                },
            ));
        }
        Ok(SyntaxTree {
            polarity,
            root: Some(root),
        })
    }

    fn expect_colon(&mut self) -> Result<(), ParseError> {
        if matches!(self.peek().kind, TokenKind::Colon) {
            self.advance();
            Ok(())
        } else {
            let tok = self.peek().clone();
            Err(self.err_at(
                &tok,
                ParseErrorKind::Unexpected {
                    expected: "':'".into(),
                    found: tok.kind.to_string(),
                },
            ))
        }
    }

    // LOGIC := CMP (('and'|'or') CMP)*
    fn parse_logic(&mut self) -> Result<Node, ParseError> {
        let mut left = self.parse_cmp()?;
        while let TokenKind::Logic(op) = self.peek().kind {
            let tok = self.advance();
            let right = self.parse_cmp()?;
            self.check_mask(&tok, "and/or", TypeMask::BOOL, &left)?;
            self.check_mask(&tok, "and/or", TypeMask::BOOL, &right)?;
            left = Node::Logic(op, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    // CMP := SUM ( COMPARISON SUM )?  -- non-chainable, at most one
    fn parse_cmp(&mut self) -> Result<Node, ParseError> {
        let left = self.parse_sum()?;
        if let TokenKind::Comparison(op) = self.peek().kind {
            let tok = self.advance();
            let right = self.parse_sum()?;
            let expected = match op {
                ComparisonOp::Eq | ComparisonOp::NotEq => TypeMask::ANY,
                ComparisonOp::Lt | ComparisonOp::Lte | ComparisonOp::Gt | ComparisonOp::Gte => {
                    TypeMask::NUMBER | TypeMask::STRING
                }
            };
            self.check_mask(&tok, &op.to_string(), expected, &left)?;
            self.check_mask(&tok, &op.to_string(), expected, &right)?;
            return Ok(Node::Comparison(op, Box::new(left), Box::new(right)));
        }
        Ok(left)
    }

    // SUM := PROD (('+'|'-') PROD)*
    fn parse_sum(&mut self) -> Result<Node, ParseError> {
        let mut left = self.parse_prod()?;
        while let TokenKind::Math(op @ (MathOp::Add | MathOp::Sub)) = self.peek().kind {
            let tok = self.advance();
            let right = self.parse_prod()?;
            self.check_mask(&tok, &op.to_string(), TypeMask::NUMBER, &left)?;
            self.check_mask(&tok, &op.to_string(), TypeMask::NUMBER, &right)?;
            left = Node::Math(op, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    // PROD := UNARY (('*'|'/'|'%') UNARY)*
    fn parse_prod(&mut self) -> Result<Node, ParseError> {
        let mut left = self.parse_unary()?;
        while let TokenKind::Math(op @ (MathOp::Mul | MathOp::Div | MathOp::Mod)) = self.peek().kind {
            let tok = self.advance();
            let right = self.parse_unary()?;
            self.check_mask(&tok, &op.to_string(), TypeMask::NUMBER, &left)?;
            self.check_mask(&tok, &op.to_string(), TypeMask::NUMBER, &right)?;
            left = Node::Math(op, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    // UNARY := '!' UNARY | PRIMARY
    fn parse_unary(&mut self) -> Result<Node, ParseError> {
        if matches!(self.peek().kind, TokenKind::Negate) {
            let tok = self.advance();
            let inner = self.parse_unary()?;
            self.check_mask(&tok, "!", TypeMask::BOOL, &inner)?;
            return Ok(Node::Negate(Box::new(inner)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Node, ParseError> {
        let tok = self.peek().clone();
        match tok.kind {
            TokenKind::IntegerLiteral(i) => {
                self.advance();
                Ok(Node::Constant(Value::Number(Number::Int(i))))
            }
            TokenKind::FloatLiteral(x) => {
                self.advance();
                Ok(Node::Constant(Value::Number(Number::Float(x))))
            }
            TokenKind::StringLiteral(s) => {
                self.advance();
                Ok(Node::Constant(Value::String(s)))
            }
            TokenKind::PathSigil => {
                self.advance();
                let name = self.expect_identifier()?;
                Ok(Node::PathParam(name))
            }
            TokenKind::CustomSigil => {
                self.advance();
                let name = self.expect_identifier()?;
                Ok(Node::CustomParam(name))
            }
            TokenKind::BuiltinFunction(builtin) => {
                self.advance();
                self.parse_call(builtin)
            }
            TokenKind::ParenOpen => {
                self.advance();
                let inner = self.parse_logic()?;
                self.expect(TokenKind::ParenClose, "')'")?;
                Ok(inner)
            }
            other => Err(self.err_at(
                &tok,
                ParseErrorKind::Unexpected {
                    expected: "a value, parameter, or function call".into(),
                    found: other.to_string(),
                },
            )),
        }
    }

    fn parse_call(&mut self, builtin: Builtin) -> Result<Node, ParseError> {
        self.expect(TokenKind::ParenOpen, "'('")?;
        let is_variadic = matches!(builtin, Builtin::Roles | Builtin::Permissions | Builtin::Groups);
        let mut args = vec![self.expect_string_literal()?];
        while matches!(self.peek().kind, TokenKind::Comma) {
            if !is_variadic {
                let tok = self.peek().clone();
                return Err(self.err_at(
                    &tok,
                    ParseErrorKind::WrongArity {
                        function: builtin.to_string(),
                    },
                ));
            }
            self.advance();
            args.push(self.expect_string_literal()?);
        }
        self.expect(TokenKind::ParenClose, "')'")?;

        Ok(match builtin {
            Builtin::Role => Node::Role(args.remove(0)),
            Builtin::Permission => Node::Permission(args.remove(0)),
            Builtin::Group => Node::Group(args.remove(0)),
            Builtin::Roles => Node::Roles(args),
            Builtin::Permissions => Node::Permissions(args),
            Builtin::Groups => Node::Groups(args),
        })
    }

    fn expect_identifier(&mut self) -> Result<String, ParseError> {
        let tok = self.peek().clone();
        match tok.kind {
            TokenKind::Identifier(name) => {
                self.advance();
                Ok(name)
            }
            other => Err(self.err_at(
                &tok,
                ParseErrorKind::Unexpected {
                    expected: "a parameter name".into(),
                    found: other.to_string(),
                },
            )),
        }
    }

    fn expect_string_literal(&mut self) -> Result<String, ParseError> {
        let tok = self.peek().clone();
        match tok.kind {
            TokenKind::StringLiteral(s) => {
                self.advance();
                Ok(s)
            }
            other => Err(self.err_at(
                &tok,
                ParseErrorKind::Unexpected {
                    expected: "a string literal argument".into(),
                    found: other.to_string(),
                },
            )),
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<(), ParseError> {
        let tok = self.peek().clone();
        if tok.kind == kind {
            self.advance();
            Ok(())
        } else {
            Err(self.err_at(
                &tok,
                ParseErrorKind::Unexpected {
                    expected: expected.into(),
                    found: tok.kind.to_string(),
                },
            ))
        }
    }

    fn check_mask(
        &self,
        tok: &Token,
        operator: &str,
        expected: TypeMask,
        operand: &Node,
    ) -> Result<(), ParseError> {
        let found = operand.return_mask();
        if expected.intersects(found) {
            Ok(())
        } else {
            Err(self.err_at(
                tok,
                ParseErrorKind::TypeMismatch {
                    operator: operator.to_string(),
                    expected,
                    found,
                },
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_polarity() {
        let tree = parse("allow").unwrap();
        assert_eq!(tree.polarity, Polarity::Allow);
        assert!(tree.root.is_none());
    }

    #[test]
    fn parses_simple_role_check() {
        let tree = parse("allow: Role('admin')").unwrap();
        assert!(matches!(tree.root, Some(Node::Role(ref r)) if r == "admin"));
    }

    #[test]
    fn parses_conjunction_with_comparison() {
        let tree = parse("allow: Role('admin') and $age >= 18").unwrap();
        assert!(matches!(tree.root, Some(Node::Logic(LogicOp::And, _, _))));
    }

    #[test]
    fn variadic_roles_accept_multiple_args() {
        let tree = parse("allow: Roles('admin', 'editor')").unwrap();
        match tree.root {
            Some(Node::Roles(names)) => assert_eq!(names, vec!["admin", "editor"]),
            other => panic!("unexpected tree: {other:?}"),
        }
    }

    #[test]
    fn singular_predicate_rejects_a_second_argument() {
        let err = parse("allow: Role('admin', 'editor')").unwrap_err();
        assert!(matches!(
            err.kind.kind,
            ParseErrorKind::WrongArity { ref function } if function == "Role"
        ));
    }

    #[test]
    fn rejects_arithmetic_on_booleans() {
        let err = parse("allow: Role('a') + 1").unwrap_err();
        assert!(matches!(err.kind.kind, ParseErrorKind::TypeMismatch { .. }));
    }

    #[test]
    fn comparisons_do_not_chain() {
        // `1 < 2 < 3` is not valid: CMP only permits one comparison.
        assert!(parse("allow: 1 < 2 < 3").is_err());
    }

    #[test]
    fn precedence_matches_and_over_or_free_chain() {
        // and/or share one precedence tier, strictly left-associative.
        let tree = parse("allow: Role('a') and Role('b') or Role('c')").unwrap();
        match tree.root {
            Some(Node::Logic(LogicOp::Or, left, _)) => {
                assert!(matches!(*left, Node::Logic(LogicOp::And, _, _)));
            }
            other => panic!("unexpected tree: {other:?}"),
        }
    }

    #[test]
    fn parenthesized_expression_overrides_precedence() {
        let tree = parse("allow: (1 + 2) * 3").unwrap();
        assert!(matches!(tree.root, Some(Node::Math(MathOp::Mul, _, _))));
    }

    #[test]
    fn requires_leading_polarity() {
        assert!(parse("Role('admin')").is_err());
    }

    // Property target (spec §8.3): parsing is idempotent across whitespace
    // insertions between tokens (never inside a string or number literal).
    #[test]
    fn parsing_is_stable_across_whitespace_insertions() {
        let tight = "allow:Role('admin')and $age>=18";
        let spaced = "allow  :  Role ( 'admin' )   and   $age   >=   18";
        let a = parse(tight).unwrap();
        let b = parse(spaced).unwrap();
        assert_eq!(a.polarity, b.polarity);
        assert_eq!(format!("{:?}", a.root), format!("{:?}", b.root));
    }
}
