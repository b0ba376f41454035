use std::collections::HashMap;

use sentinel_types::Value;

use crate::pattern::split_segments;

/// Matches one pattern against one path directly, without building a trie.
/// A standalone helper for testing segment-matching rules in isolation —
/// not part of the facade's public surface, which always goes through
/// [`crate::RouteTrie`] so multiple endpoints can share a lookup.
pub fn match_path(pattern: &str, path: &str) -> Option<HashMap<String, Value>> {
    let pattern_segments = split_segments(pattern);
    let path_segments = split_segments(path);
    let mut bindings = HashMap::new();

    let mut pi = 0;
    let mut si = 0;
    while pi < pattern_segments.len() {
        let seg = pattern_segments[pi];
        if seg == "*" {
            if pi != pattern_segments.len() - 1 {
                return None;
            }
            let remainder = path_segments[si..].join("/");
            bindings.insert("$0".to_string(), Value::String(remainder));
            return Some(bindings);
        }
        if si >= path_segments.len() {
            return None;
        }
        if let Some(name) = seg.strip_prefix(':') {
            bindings.insert(name.to_string(), Value::String(path_segments[si].to_string()));
        } else if seg != path_segments[si] {
            return None;
        }
        pi += 1;
        si += 1;
    }
    if si == path_segments.len() {
        Some(bindings)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_static_path() {
        assert!(match_path("/users/active", "/users/active").is_some());
        assert!(match_path("/users/active", "/users/other").is_none());
    }

    #[test]
    fn binds_param_segment() {
        let bindings = match_path("/users/:id", "/users/7").unwrap();
        assert_eq!(bindings.get("id").unwrap().to_string(), "7");
    }

    #[test]
    fn wildcard_must_be_terminal() {
        assert!(match_path("/a/*", "/a/b/c").is_some());
    }
}
