use std::path::Path;

use crate::engine::Sentinel;
use crate::error::SentinelError;

/// Incrementally assembles a [`Sentinel`] from endpoint declarations and
/// config files before anybody can issue a check against it.
///
/// Grounded in `covert-framework::router::Router`'s `.route(...).layer(...)
/// .build()` chain: each builder method consumes and returns `self`, and
/// `build()` is the single point where the accumulated state turns into the
/// real thing. Unlike the `covert` router, there's no `Building`/`Ready`
/// type-state split here — every step can fail (a bad expression, a missing
/// config file), so each one already returns a `Result` rather than
/// deferring failure to `build()`.
#[derive(Default)]
pub struct SentinelBuilder {
    sentinel: Sentinel,
}

impl SentinelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one endpoint declaration and its policy expression,
    /// identical to calling [`Sentinel::add_endpoint`] after `build()`, but
    /// chainable while assembling the engine.
    pub fn with_endpoint(self, endpoint: &str, expression: &str) -> Result<Self, SentinelError> {
        self.sentinel.add_endpoint(endpoint, expression)?;
        Ok(self)
    }

    /// Reads a line-oriented config file eagerly and registers every
    /// endpoint it declares, grounded on the original's `WithConfig` option,
    /// which reads the file at option-construction time rather than at
    /// `build()` time — so a missing file is reported as soon as this method
    /// is called, not deferred.
    pub fn with_config_file(self, path: impl AsRef<Path>) -> Result<Self, SentinelError> {
        let lines = sentinel_config::load_file(path)?;
        for line in lines {
            self.sentinel.add_endpoint(&line.endpoint, &line.expression)?;
        }
        Ok(self)
    }

    pub fn build(self) -> Sentinel {
        self.sentinel
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentinel_types::StaticPrincipal;
    use std::io::Write;

    #[test]
    fn with_endpoint_chains_into_a_usable_engine() {
        let sentinel = SentinelBuilder::new()
            .with_endpoint("GET /admin", "allow: Role('admin')")
            .unwrap()
            .build();
        let admin = StaticPrincipal::new("a").with_roles(["admin"]);
        assert!(sentinel
            .check("GET /admin", &admin, Default::default())
            .unwrap());
    }

    #[test]
    fn with_config_file_loads_every_declared_endpoint() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# comment").unwrap();
        writeln!(file, "GET /users,allow: Role('admin')").unwrap();
        writeln!(file, "GET /ping,allow").unwrap();
        let sentinel = SentinelBuilder::new()
            .with_config_file(file.path())
            .unwrap()
            .build();
        let guest = StaticPrincipal::new("g");
        assert!(!sentinel
            .check("GET /users", &guest, Default::default())
            .unwrap());
        assert!(sentinel
            .check("GET /ping", &guest, Default::default())
            .unwrap());
    }

    #[test]
    fn missing_config_file_surfaces_immediately() {
        let err = SentinelBuilder::new().with_config_file("/no/such/file.conf");
        assert!(err.is_err());
    }
}
