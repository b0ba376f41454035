use std::collections::HashMap;

use sentinel_types::Value;

use crate::error::{RouteError, RouteErrorKind};
use crate::pattern::{
    parse_actual_query, parse_query_params, split_methods_and_pattern, split_path_and_query,
    split_segments,
};

#[derive(Clone)]
struct Terminal {
    pattern: String,
    query_params: Vec<(String, String)>,
}

struct ParamChild {
    name: String,
    node: TrieNode,
}

#[derive(Default)]
struct TrieNode {
    static_children: HashMap<String, TrieNode>,
    param_child: Option<Box<ParamChild>>,
    wildcard: Option<Terminal>,
    terminal: Option<Terminal>,
}

/// A successful route match: the pattern it matched (used to look up the
/// guard) and every binding extracted from the path, wildcard remainder, and
/// (for a strict match) query string.
pub struct Matched {
    pub pattern: String,
    pub bindings: HashMap<String, Value>,
}

/// A per-HTTP-method prefix trie over endpoint patterns. An empty method
/// string is the "any method" root, consulted only when a method-specific
/// lookup misses — matching the original's fallback rule exactly.
#[derive(Default)]
pub struct RouteTrie {
    roots: HashMap<String, TrieNode>,
}

impl RouteTrie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an endpoint declaration such as `"GET /users/:id"` or a
    /// bare `"/users/:id"` (applies to every method).
    pub fn add(&mut self, endpoint: &str) -> Result<(), RouteError> {
        let (methods, pattern) = split_methods_and_pattern(endpoint);
        for method in methods {
            self.add_for_method(&method, &pattern)?;
        }
        Ok(())
    }

    fn add_for_method(&mut self, method: &str, pattern: &str) -> Result<(), RouteError> {
        let (path, query) = split_path_and_query(pattern);
        let segments = split_segments(path);
        let query_params = query.map(parse_query_params).unwrap_or_default();
        let terminal = Terminal {
            pattern: pattern.to_string(),
            query_params,
        };
        let root = self.roots.entry(method.to_string()).or_default();
        insert(root, &segments, 0, pattern, terminal)
    }

    /// Path-only ("non-strict") match: `endpoint` is `"METHOD path?query"`
    /// (method optional, same surface form `add` accepts). Query parameters,
    /// if any were declared on the pattern, are not required to be present.
    pub fn match_path(&self, endpoint: &str) -> Result<Matched, RouteError> {
        self.find(endpoint, false)
    }

    /// Strict match: every query key the matched pattern declares must be
    /// present, by key, in `endpoint`'s actual query string.
    pub fn match_strict(&self, endpoint: &str) -> Result<Matched, RouteError> {
        self.find(endpoint, true)
    }

    fn find(&self, endpoint: &str, strict: bool) -> Result<Matched, RouteError> {
        let (methods, pattern) = split_methods_and_pattern(endpoint);
        let method = methods.first().cloned().unwrap_or_default();
        let (path, query) = split_path_and_query(&pattern);
        let segments = split_segments(path);
        let actual_query = query.map(parse_actual_query).unwrap_or_default();

        if let Some(root) = self.roots.get(&method) {
            if let Some(m) = self.try_match(root, &segments, &actual_query, strict) {
                return m;
            }
        }
        // Fall back to the any-method root, but only if the specific lookup
        // missed entirely (never on a found-but-query-mismatched route).
        if let Some(root) = self.roots.get("") {
            if let Some(m) = self.try_match(root, &segments, &actual_query, strict) {
                return m;
            }
        }
        Err(RouteError::new(RouteErrorKind::NoMatch {
            method,
            path: path.to_string(),
        }))
    }

    fn try_match(
        &self,
        root: &TrieNode,
        segments: &[&str],
        actual_query: &[(String, String)],
        strict: bool,
    ) -> Option<Result<Matched, RouteError>> {
        let mut bindings = Vec::new();
        let terminal = find_route(root, segments, 0, &mut bindings)?;

        if strict {
            for (key, _name) in &terminal.query_params {
                let present = actual_query
                    .iter()
                    .any(|(k, _)| k == key || k.strip_prefix('$').is_some_and(|k| k == key));
                if !present {
                    return Some(Err(RouteError::new(RouteErrorKind::MissingQueryParam {
                        pattern: terminal.pattern.clone(),
                        key: key.clone(),
                    })));
                }
            }
        }

        // Every actual query key surfaces under its own name first...
        let mut map: HashMap<String, Value> = actual_query
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        // ...then path/wildcard bindings take precedence over a query value
        // of the same name...
        for (k, v) in bindings {
            map.insert(k, v);
        }
        // ...then the pattern's declared `key=:name` / `key=${name}` query
        // parameters rebind the actual value found under `key` to `name`,
        // without clobbering a path/wildcard binding of the same name.
        for (key, name) in &terminal.query_params {
            if let Some((_, value)) = actual_query.iter().find(|(k, _)| k == key) {
                map.entry(name.clone())
                    .or_insert_with(|| Value::String(value.clone()));
            }
        }

        Some(Ok(Matched {
            pattern: terminal.pattern.clone(),
            bindings: map,
        }))
    }
}

fn insert(
    node: &mut TrieNode,
    segments: &[&str],
    idx: usize,
    pattern: &str,
    terminal: Terminal,
) -> Result<(), RouteError> {
    if idx == segments.len() {
        node.terminal = Some(terminal);
        return Ok(());
    }

    let segment = segments[idx];

    if segment == "*" {
        if idx != segments.len() - 1 {
            return Err(RouteError::new(RouteErrorKind::MidPathWildcard(
                pattern.to_string(),
            )));
        }
        node.wildcard = Some(terminal);
        return Ok(());
    }

    if let Some(name) = segment.strip_prefix(':') {
        match &mut node.param_child {
            Some(existing) if existing.name != name => {
                tracing::warn!(
                    pattern,
                    existing = %existing.name,
                    conflicting = %name,
                    "route pattern declares a different parameter name at an already-bound position; keeping the first-seen name"
                );
                insert(&mut existing.node, segments, idx + 1, pattern, terminal)
            }
            Some(existing) => insert(&mut existing.node, segments, idx + 1, pattern, terminal),
            None => {
                let mut child = ParamChild {
                    name: name.to_string(),
                    node: TrieNode::default(),
                };
                insert(&mut child.node, segments, idx + 1, pattern, terminal)?;
                node.param_child = Some(Box::new(child));
                Ok(())
            }
        }
    } else {
        let child = node.static_children.entry(segment.to_string()).or_default();
        insert(child, segments, idx + 1, pattern, terminal)
    }
}

fn find_route<'a>(
    node: &'a TrieNode,
    segments: &[&str],
    idx: usize,
    bindings: &mut Vec<(String, Value)>,
) -> Option<&'a Terminal> {
    if idx == segments.len() {
        return node.terminal.as_ref();
    }

    let segment = segments[idx];

    if let Some(child) = node.static_children.get(segment) {
        if let Some(t) = find_route(child, segments, idx + 1, bindings) {
            return Some(t);
        }
    }

    if let Some(param) = &node.param_child {
        bindings.push((param.name.clone(), Value::String(segment.to_string())));
        if let Some(t) = find_route(&param.node, segments, idx + 1, bindings) {
            return Some(t);
        }
        bindings.pop();
    }

    if let Some(terminal) = &node.wildcard {
        let remainder = segments[idx..].join("/");
        bindings.push(("$0".to_string(), Value::String(remainder)));
        return Some(terminal);
    }

    None
}
