use std::fmt;

use crate::error::{LexErrorKind, ParseError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum MathOp {
    #[strum(serialize = "+")]
    Add,
    #[strum(serialize = "-")]
    Sub,
    #[strum(serialize = "*")]
    Mul,
    #[strum(serialize = "/")]
    Div,
    #[strum(serialize = "%")]
    Mod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum ComparisonOp {
    #[strum(serialize = "==")]
    Eq,
    #[strum(serialize = "!=")]
    NotEq,
    #[strum(serialize = "<")]
    Lt,
    #[strum(serialize = "<=")]
    Lte,
    #[strum(serialize = ">")]
    Gt,
    #[strum(serialize = ">=")]
    Gte,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum LogicOp {
    #[strum(serialize = "and")]
    And,
    #[strum(serialize = "or")]
    Or,
}

/// The six builtin predicate names. Recognized as a function call only when
/// the whole identifier scanned by the lexer matches one of these names
/// exactly — maximal munch during identifier scanning already guarantees
/// `Rolesx` never gets split into `Roles` followed by `x`, which is the
/// boundary problem the original tokenizer needed a dedicated "alone" flag
/// to solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
pub enum Builtin {
    Role,
    Roles,
    Permission,
    Permissions,
    Group,
    Groups,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum Polarity {
    #[strum(serialize = "allow")]
    Allow,
    #[strum(serialize = "deny")]
    Deny,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Policy(Polarity),
    BuiltinFunction(Builtin),
    ParenOpen,
    ParenClose,
    Comma,
    Colon,
    Negate,
    Math(MathOp),
    Comparison(ComparisonOp),
    Logic(LogicOp),
    PathSigil,
    CustomSigil,
    Identifier(String),
    StringLiteral(String),
    IntegerLiteral(i64),
    FloatLiteral(f64),
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Policy(p) => write!(f, "{p}"),
            TokenKind::BuiltinFunction(b) => write!(f, "{b}"),
            TokenKind::ParenOpen => write!(f, "("),
            TokenKind::ParenClose => write!(f, ")"),
            TokenKind::Comma => write!(f, ","),
            TokenKind::Colon => write!(f, ":"),
            TokenKind::Negate => write!(f, "!"),
            TokenKind::Math(op) => write!(f, "{op}"),
            TokenKind::Comparison(op) => write!(f, "{op}"),
            TokenKind::Logic(op) => write!(f, "{op}"),
            TokenKind::PathSigil => write!(f, "$"),
            TokenKind::CustomSigil => write!(f, "#"),
            TokenKind::Identifier(s) => write!(f, "{s}"),
            TokenKind::StringLiteral(s) => write!(f, "'{s}'"),
            TokenKind::IntegerLiteral(i) => write!(f, "{i}"),
            TokenKind::FloatLiteral(x) => write!(f, "{x}"),
            TokenKind::Eof => write!(f, "<eof>"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub offset: usize,
}

/// Scans a policy expression into a flat token stream. Identifiers are
/// scanned to their maximal run of word characters before classification,
/// which is what makes the original tokenizer's "alone" keyword-boundary
/// flag unnecessary here.
pub struct Lexer<'a> {
    source: &'a str,
    chars: Vec<char>,
    pos: usize,
    line: usize,
    line_start: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            line_start: 0,
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace();
            let (line, offset) = (self.line, self.pos - self.line_start);
            let Some(c) = self.peek() else {
                tokens.push(Token {
                    kind: TokenKind::Eof,
                    line,
                    offset,
                });
                break;
            };

            let kind = match c {
                '(' => {
                    self.advance();
                    TokenKind::ParenOpen
                }
                ')' => {
                    self.advance();
                    TokenKind::ParenClose
                }
                ',' => {
                    self.advance();
                    TokenKind::Comma
                }
                ':' => {
                    self.advance();
                    TokenKind::Colon
                }
                '!' => {
                    self.advance();
                    if self.peek() == Some('=') {
                        self.advance();
                        TokenKind::Comparison(ComparisonOp::NotEq)
                    } else {
                        TokenKind::Negate
                    }
                }
                '+' => {
                    self.advance();
                    TokenKind::Math(MathOp::Add)
                }
                '-' => {
                    self.advance();
                    TokenKind::Math(MathOp::Sub)
                }
                '*' => {
                    self.advance();
                    TokenKind::Math(MathOp::Mul)
                }
                '/' => {
                    self.advance();
                    TokenKind::Math(MathOp::Div)
                }
                '%' => {
                    self.advance();
                    TokenKind::Math(MathOp::Mod)
                }
                '=' => {
                    self.advance();
                    if self.peek() == Some('=') {
                        self.advance();
                        TokenKind::Comparison(ComparisonOp::Eq)
                    } else {
                        return Err(self.error(line, offset, LexErrorKind::UnexpectedChar('=')));
                    }
                }
                '<' => {
                    self.advance();
                    if self.peek() == Some('=') {
                        self.advance();
                        TokenKind::Comparison(ComparisonOp::Lte)
                    } else {
                        TokenKind::Comparison(ComparisonOp::Lt)
                    }
                }
                '>' => {
                    self.advance();
                    if self.peek() == Some('=') {
                        self.advance();
                        TokenKind::Comparison(ComparisonOp::Gte)
                    } else {
                        TokenKind::Comparison(ComparisonOp::Gt)
                    }
                }
                '$' => {
                    self.advance();
                    TokenKind::PathSigil
                }
                '#' => {
                    self.advance();
                    TokenKind::CustomSigil
                }
                '\'' | '"' => self.scan_string(line, offset, c)?,
                c if c.is_ascii_digit() => self.scan_number(line, offset),
                c if is_ident_start(c) => self.scan_identifier(),
                other => return Err(self.error(line, offset, LexErrorKind::UnexpectedChar(other))),
            };

            tokens.push(Token { kind, line, offset });
        }
        Ok(tokens)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, delta: usize) -> Option<char> {
        self.chars.get(self.pos + delta).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek();
        if c == Some('\n') {
            self.line += 1;
            self.line_start = self.pos + 1;
        }
        self.pos += 1;
        c
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn scan_identifier(&mut self) -> TokenKind {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if is_ident_continue(c) {
                self.advance();
            } else {
                break;
            }
        }
        let word: String = self.chars[start..self.pos].iter().collect();
        classify_word(word)
    }

    fn scan_number(&mut self, line: usize, offset: usize) -> TokenKind {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        let mut is_float = false;
        if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            is_float = true;
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        let _ = (line, offset);
        if is_float {
            TokenKind::FloatLiteral(text.parse().unwrap_or(0.0))
        } else {
            match text.parse::<i64>() {
                Ok(i) => TokenKind::IntegerLiteral(i),
                Err(_) => TokenKind::FloatLiteral(text.parse().unwrap_or(0.0)),
            }
        }
    }

    fn scan_string(
        &mut self,
        line: usize,
        offset: usize,
        quote: char,
    ) -> Result<TokenKind, ParseError> {
        self.advance();
        let mut out = String::new();
        loop {
            match self.peek() {
                None => return Err(self.error(line, offset, LexErrorKind::UnterminatedString)),
                Some(c) if c == quote => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    match self.advance() {
                        Some('n') => out.push('\n'),
                        Some('t') => out.push('\t'),
                        Some(c) => out.push(c),
                        None => return Err(self.error(line, offset, LexErrorKind::UnterminatedString)),
                    }
                }
                Some(c) => {
                    out.push(c);
                    self.advance();
                }
            }
        }
        Ok(TokenKind::StringLiteral(out))
    }

    fn error(&self, line: usize, offset: usize, kind: LexErrorKind) -> ParseError {
        crate::error::new_parse_error(line, offset, self.source, kind.into())
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn classify_word(word: String) -> TokenKind {
    match word.as_str() {
        "allow" => TokenKind::Policy(Polarity::Allow),
        "deny" => TokenKind::Policy(Polarity::Deny),
        "and" => TokenKind::Logic(LogicOp::And),
        "or" => TokenKind::Logic(LogicOp::Or),
        _ => match word.parse::<Builtin>() {
            Ok(b) => TokenKind::BuiltinFunction(b),
            Err(_) => TokenKind::Identifier(word),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        Lexer::new(src)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn builtin_word_boundary_is_respected() {
        // `Rolesx` must lex as a single identifier, never `Roles` + `x`.
        let ks = kinds("Rolesx");
        assert_eq!(ks, vec![TokenKind::Identifier("Rolesx".into()), TokenKind::Eof]);
    }

    #[test]
    fn recognizes_all_builtins() {
        for (word, expect) in [
            ("Role", Builtin::Role),
            ("Roles", Builtin::Roles),
            ("Permission", Builtin::Permission),
            ("Permissions", Builtin::Permissions),
            ("Group", Builtin::Group),
            ("Groups", Builtin::Groups),
        ] {
            let ks = kinds(word);
            assert_eq!(ks[0], TokenKind::BuiltinFunction(expect));
        }
    }

    #[test]
    fn lexes_full_policy_expression() {
        let ks = kinds("allow: Role('admin') and $age >= 18");
        assert_eq!(
            ks,
            vec![
                TokenKind::Policy(Polarity::Allow),
                TokenKind::Colon,
                TokenKind::BuiltinFunction(Builtin::Role),
                TokenKind::ParenOpen,
                TokenKind::StringLiteral("admin".into()),
                TokenKind::ParenClose,
                TokenKind::Logic(LogicOp::And),
                TokenKind::PathSigil,
                TokenKind::Identifier("age".into()),
                TokenKind::Comparison(ComparisonOp::Gte),
                TokenKind::IntegerLiteral(18),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn distinguishes_not_equal_from_negate() {
        assert_eq!(
            kinds("!= !"),
            vec![
                TokenKind::Comparison(ComparisonOp::NotEq),
                TokenKind::Negate,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn scans_float_literal() {
        assert_eq!(kinds("3.5"), vec![TokenKind::FloatLiteral(3.5), TokenKind::Eof]);
    }
}
