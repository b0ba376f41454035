use std::fmt;

use tracing_error::SpanTrace;

/// Wraps a narrow, leaf error enum with a captured span trace, the same
/// shape `covert`'s own crates use for their per-module error types: a plain
/// `thiserror` enum of variants plus a wrapper that adds diagnostic context
/// without polluting the variants themselves.
#[derive(Debug)]
pub struct Traced<E> {
    pub kind: E,
    pub span_trace: SpanTrace,
}

impl<E> Traced<E> {
    pub fn new(kind: E) -> Self {
        Self {
            kind,
            span_trace: SpanTrace::capture(),
        }
    }
}

impl<E: fmt::Display> fmt::Display for Traced<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl<E: std::error::Error + 'static> std::error::Error for Traced<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

impl<E> From<E> for Traced<E> {
    fn from(kind: E) -> Self {
        Self::new(kind)
    }
}
