/// The facade's aggregate error type. Every fallible subsystem raises its
/// own narrow error first; this just gives callers one `?`-friendly type to
/// match on, the same layered shape the original `backend/covert-userpass-auth`
/// error module uses for its own leaf-then-wrapper split.
#[derive(Debug, thiserror::Error)]
pub enum SentinelError {
    #[error(transparent)]
    Parse(#[from] sentinel_dsl::ParseError),
    #[error(transparent)]
    Eval(#[from] sentinel_dsl::EvalError),
    #[error(transparent)]
    Route(#[from] sentinel_router::RouteError),
    #[error(transparent)]
    Config(#[from] sentinel_config::error::ConfigError),
    #[error("endpoint `{0}` already exists")]
    DuplicateEndpoint(String),
}
