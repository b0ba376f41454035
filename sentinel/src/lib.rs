#![forbid(unsafe_code)]
#![forbid(clippy::unwrap_used)]
#![deny(clippy::pedantic)]
#![deny(clippy::get_unwrap)]
#![allow(clippy::module_name_repetitions)]

pub mod builder;
pub mod engine;
pub mod error;

pub use builder::SentinelBuilder;
pub use engine::Sentinel;
pub use error::SentinelError;

pub use sentinel_config as config;
pub use sentinel_dsl as dsl;
pub use sentinel_router as router;
pub use sentinel_types as types;
