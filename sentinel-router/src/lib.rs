#![forbid(unsafe_code)]
#![forbid(clippy::unwrap_used)]
#![deny(clippy::pedantic)]
#![deny(clippy::get_unwrap)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod pattern;
pub mod single;
mod trie;

pub use error::RouteError;
pub use trie::{Matched, RouteTrie};
