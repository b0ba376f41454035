use sentinel_types::error::Traced;

#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum RouteErrorKind {
    #[error("no route matches `{method} {path}`")]
    NoMatch { method: String, path: String },
    #[error("pattern `{0}` has path segments after a `*` wildcard, which is only allowed as the final segment")]
    MidPathWildcard(String),
    #[error("pattern `{pattern}` is missing required query parameter `{key}`")]
    MissingQueryParam { pattern: String, key: String },
}

pub type RouteError = Traced<RouteErrorKind>;
