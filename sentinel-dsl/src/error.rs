use std::fmt;

use sentinel_types::error::Traced;
use sentinel_types::TypeMask;

/// Errors raised while turning raw characters into tokens.
#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum LexErrorKind {
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),
    #[error("unterminated string literal")]
    UnterminatedString,
}

/// Errors raised while turning tokens into a typed AST: grammar violations
/// and type-mismatch violations are both detected here, at build time, never
/// later at evaluation time.
#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum ParseErrorKind {
    #[error(transparent)]
    Lex(#[from] LexErrorKind),
    #[error("expected {expected}, found `{found}`")]
    Unexpected { expected: String, found: String },
    #[error("operator `{operator}` requires {expected}, found {found}")]
    TypeMismatch {
        operator: String,
        expected: TypeMask,
        found: TypeMask,
    },
    #[error("a policy expression must start with `allow` or `deny`")]
    MissingPolarity,
    #[error("`{function}` takes exactly one string argument, found a second")]
    WrongArity { function: String },
}

/// A located parse error: line/column plus the offending source line, so a
/// caller can print a caret under the exact token that failed, the same
/// diagnostic shape the original's `parsePanic` builds by hand.
#[derive(Debug, Clone)]
pub struct LocatedParseError {
    pub line: usize,
    pub column: usize,
    pub source_line: String,
    pub kind: ParseErrorKind,
}

impl fmt::Display for LocatedParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}:{}: {}", self.line, self.column, self.kind)?;
        writeln!(f, "{}", self.source_line)?;
        write!(f, "{}^", " ".repeat(self.column))
    }
}

impl std::error::Error for LocatedParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

pub type ParseError = Traced<LocatedParseError>;

pub(crate) fn new_parse_error(
    line: usize,
    column: usize,
    source: &str,
    kind: ParseErrorKind,
) -> ParseError {
    let source_line = source.lines().nth(line - 1).unwrap_or("").to_string();
    ParseError::new(LocatedParseError {
        line,
        column,
        source_line,
        kind,
    })
}

/// Errors raised while walking the AST against an environment.
#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum EvalErrorKind {
    #[error("cannot coerce `{0}` to a number")]
    NumericCoercionFailed(String),
    #[error("modulo is not supported for floating-point operands")]
    FloatModulo,
    #[error("integer division or modulo by zero")]
    DivideByZero,
}

pub type EvalError = Traced<EvalErrorKind>;
