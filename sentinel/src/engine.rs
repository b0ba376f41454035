use std::collections::HashMap;

use parking_lot::RwLock;

use sentinel_dsl::Guard;
use sentinel_router::RouteTrie;
use sentinel_types::{Environment, Principal, Value};

use crate::error::SentinelError;

struct Inner {
    trie: RouteTrie,
    guards: HashMap<String, Guard>,
}

impl Default for Inner {
    fn default() -> Self {
        Self {
            trie: RouteTrie::new(),
            guards: HashMap::new(),
        }
    }
}

/// The authorization engine: a route trie and a pattern-keyed guard map,
/// both behind one reader-preferring lock. Reads (`check`/`strict_check`)
/// take a shared read guard and can run fully concurrently with each other;
/// writes (`add_endpoint`/`clean_endpoints`) take an exclusive write guard
/// and serialize with everything else.
#[derive(Default)]
pub struct Sentinel {
    inner: RwLock<Inner>,
}

fn pattern_key(method: &str, pattern: &str) -> String {
    if method.is_empty() {
        pattern.trim().to_string()
    } else {
        format!("{method} {pattern}").trim().to_string()
    }
}

impl Sentinel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an endpoint declaration (`"GET /users/:id"`) with the
    /// policy expression that guards it. Each method the declaration names
    /// gets its own entry in the guard map; adding an endpoint whose
    /// `method + pattern` key already exists is a [`SentinelError::DuplicateEndpoint`].
    pub fn add_endpoint(&self, endpoint: &str, expression: &str) -> Result<(), SentinelError> {
        let (methods, pattern) = sentinel_router::pattern::split_methods_and_pattern(endpoint);
        let mut inner = self.inner.write();

        for method in &methods {
            let key = pattern_key(method, &pattern);
            if inner.guards.contains_key(&key) {
                return Err(SentinelError::DuplicateEndpoint(key));
            }
        }

        inner.trie.add(endpoint)?;

        for method in &methods {
            let key = pattern_key(method, &pattern);
            let guard = Guard::new(expression)?;
            inner.guards.insert(key, guard);
        }

        Ok(())
    }

    /// Path-only check: the route trie's non-strict match, which does not
    /// require any query parameters the matched pattern declares. `endpoint`
    /// is the same `"METHOD path?query"` surface form [`Self::add_endpoint`]
    /// accepts.
    pub fn check(
        &self,
        endpoint: &str,
        principal: &dyn Principal,
        custom: HashMap<String, String>,
    ) -> Result<bool, SentinelError> {
        let inner = self.inner.read();
        let matched = inner.trie.match_path(endpoint)?;
        self.decide(&inner, endpoint, matched.pattern, matched.bindings, principal, custom)
    }

    /// Strict check: requires every query key the matched pattern declares
    /// to be present in `endpoint`'s actual query string.
    pub fn strict_check(
        &self,
        endpoint: &str,
        principal: &dyn Principal,
        custom: HashMap<String, String>,
    ) -> Result<bool, SentinelError> {
        let inner = self.inner.read();
        let matched = inner.trie.match_strict(endpoint)?;
        self.decide(&inner, endpoint, matched.pattern, matched.bindings, principal, custom)
    }

    fn decide(
        &self,
        inner: &Inner,
        endpoint: &str,
        pattern: String,
        path_bindings: HashMap<String, Value>,
        principal: &dyn Principal,
        custom: HashMap<String, String>,
    ) -> Result<bool, SentinelError> {
        let (methods, _) = sentinel_router::pattern::split_methods_and_pattern(endpoint);
        let method = methods.first().cloned().unwrap_or_default();
        let specific_key = pattern_key(&method, &pattern);
        let any_key = pattern_key("", &pattern);

        let guard = inner
            .guards
            .get(&specific_key)
            .or_else(|| inner.guards.get(&any_key));

        let Some(guard) = guard else {
            // Matched a route, but nobody guarded it: default-allow.
            return Ok(true);
        };

        let env = Environment::new(principal)
            .with_path_bindings(path_bindings)
            .with_custom(custom);
        Ok(guard.check(&env)?)
    }

    /// Resets the engine to empty: no routes, no guards.
    pub fn clean_endpoints(&self) {
        let mut inner = self.inner.write();
        *inner = Inner::default();
    }
}
