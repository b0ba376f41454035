use std::path::PathBuf;

use sentinel_types::error::Traced;

#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum ConfigErrorKind {
    #[error("failed to read config file `{path}`: {message}")]
    Io { path: PathBuf, message: String },
    #[error("`{path}` line {line}: expected `endpoint,expression`, found `{text}`")]
    MalformedLine {
        path: PathBuf,
        line: usize,
        text: String,
    },
}

pub type ConfigError = Traced<ConfigErrorKind>;
