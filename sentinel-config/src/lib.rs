#![forbid(unsafe_code)]
#![forbid(clippy::unwrap_used)]
#![deny(clippy::pedantic)]
#![deny(clippy::get_unwrap)]
#![allow(clippy::module_name_repetitions)]

pub mod error;

use std::fs;
use std::path::{Path, PathBuf};

use error::{ConfigError, ConfigErrorKind};

/// One parsed `endpoint,expression` line from a config file.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigLine {
    pub endpoint: String,
    pub expression: String,
}

/// Parses every line of `contents`, skipping blank lines and `#`-prefixed
/// comments, splitting the rest on the first comma into an endpoint
/// declaration and a policy expression. `path` is only used to attribute
/// errors to a file; `contents` need not actually come from disk.
///
/// Grounded on the original's `WithConfig`, which reads the whole file
/// eagerly and applies the same per-line rule.
pub fn parse_lines<'a>(
    path: &'a Path,
    contents: &'a str,
) -> impl Iterator<Item = Result<ConfigLine, ConfigError>> + 'a {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with('#')
        })
        .map(move |(idx, line)| {
            let trimmed = line.trim();
            match trimmed.split_once(',') {
                Some((endpoint, expression)) => Ok(ConfigLine {
                    endpoint: endpoint.trim().to_string(),
                    expression: expression.trim().to_string(),
                }),
                None => Err(ConfigError::new(ConfigErrorKind::MalformedLine {
                    path: path.to_path_buf(),
                    line: idx + 1,
                    text: trimmed.to_string(),
                })),
            }
        })
}

/// Reads and parses an entire config file from disk.
pub fn load_file(path: impl AsRef<Path>) -> Result<Vec<ConfigLine>, ConfigError> {
    let path: PathBuf = path.as_ref().to_path_buf();
    let contents = fs::read_to_string(&path).map_err(|e| {
        ConfigError::new(ConfigErrorKind::Io {
            path: path.clone(),
            message: e.to_string(),
        })
    })?;
    parse_lines(&path, &contents).collect()
}
