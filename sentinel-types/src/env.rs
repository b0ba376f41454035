use std::collections::HashMap;

use crate::principal::Principal;
use crate::value::Value;

/// The per-check environment an AST is evaluated against: the caller's
/// identity, every binding the route trie extracted from the path and query
/// (including `$0`, `$1`, ... wildcard captures), and the caller-supplied
/// custom parameter map. Built fresh for each check and discarded when it
/// returns — the engine never retains one.
pub struct Environment<'a> {
    pub principal: &'a dyn Principal,
    pub path_bindings: HashMap<String, Value>,
    pub custom: HashMap<String, String>,
}

impl<'a> Environment<'a> {
    pub fn new(principal: &'a dyn Principal) -> Self {
        Self {
            principal,
            path_bindings: HashMap::new(),
            custom: HashMap::new(),
        }
    }

    pub fn with_path_bindings(mut self, bindings: HashMap<String, Value>) -> Self {
        self.path_bindings = bindings;
        self
    }

    pub fn with_custom(mut self, custom: HashMap<String, String>) -> Self {
        self.custom = custom;
        self
    }

    /// A path binding's value with its inferred type tag, or an empty
    /// string if the name was never bound.
    pub fn path_binding(&self, name: &str) -> Value {
        self.path_bindings
            .get(name)
            .cloned()
            .unwrap_or_else(|| Value::String(String::new()))
    }

    /// A custom parameter, always a string, or empty if the name is absent.
    pub fn custom_param(&self, name: &str) -> Value {
        match self.custom.get(name) {
            Some(v) => Value::String(v.clone()),
            None => Value::String(String::new()),
        }
    }
}
