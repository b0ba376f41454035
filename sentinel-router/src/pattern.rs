/// Splits an endpoint declaration (`"GET/POST /users/:id"` or just
/// `"/users/:id"`) into its uppercased method list and bare pattern. No space
/// means "any method", mirroring the original's treatment of a bare pattern
/// as applying to every HTTP verb.
pub fn split_methods_and_pattern(endpoint: &str) -> (Vec<String>, String) {
    let endpoint = endpoint.trim();
    match endpoint.split_once(' ') {
        Some((methods, pattern)) => (
            methods
                .split('/')
                .filter(|m| !m.is_empty())
                .map(|m| m.to_ascii_uppercase())
                .collect(),
            pattern.trim().to_string(),
        ),
        None => (vec![String::new()], endpoint.to_string()),
    }
}

/// Splits a pattern into its path and query portions.
pub fn split_path_and_query(pattern: &str) -> (&str, Option<&str>) {
    match pattern.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (pattern, None),
    }
}

/// Splits a path into its non-empty segments (`"/users/:id/"` -> `["users",
/// "id"]` is wrong on purpose to show intent; actual output keeps the
/// sigil): `/users/:id/` -> `["users", ":id"]`.
pub fn split_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Parses a query string pattern (`"active=:flag&scope=${scope}"`) into a
/// list of `(key, bound_name)` pairs. Both the `:name` and `${name}` value
/// forms are recognized, matching the original's `parseQueryParams`, which
/// accepted either spelling for a bound query value.
pub fn parse_query_params(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|kv| !kv.is_empty())
        .filter_map(|kv| {
            let (key, value) = kv.split_once('=')?;
            let name = if let Some(inner) = value.strip_prefix("${").and_then(|v| v.strip_suffix('}')) {
                inner.to_string()
            } else if let Some(inner) = value.strip_prefix(':') {
                inner.to_string()
            } else {
                value.to_string()
            };
            Some((key.to_string(), name))
        })
        .collect()
}

/// Parses an actual request's query string (`"category=public&scope=eu"`)
/// into literal `(key, value)` pairs, with no `:name`/`${name}` handling —
/// that indirection only applies to a registered *pattern*'s query part, not
/// to a real request. Grounded on `original_source/internal/parse/
/// router.go`'s `parseActualQueryParams`.
pub fn parse_actual_query(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|kv| !kv.is_empty())
        .filter_map(|kv| {
            let (key, value) = kv.split_once('=')?;
            Some((key.to_string(), value.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_method_list() {
        let (methods, pattern) = split_methods_and_pattern("GET/POST /users/:id");
        assert_eq!(methods, vec!["GET", "POST"]);
        assert_eq!(pattern, "/users/:id");
    }

    #[test]
    fn bare_pattern_means_any_method() {
        let (methods, pattern) = split_methods_and_pattern("/users/:id");
        assert_eq!(methods, vec![""]);
        assert_eq!(pattern, "/users/:id");
    }

    #[test]
    fn splits_segments() {
        assert_eq!(split_segments("/users/:id/posts/*"), vec!["users", ":id", "posts", "*"]);
    }

    #[test]
    fn parses_query_param_both_spellings() {
        let params = parse_query_params("active=:flag&scope=${scope}");
        assert_eq!(
            params,
            vec![
                ("active".to_string(), "flag".to_string()),
                ("scope".to_string(), "scope".to_string()),
            ]
        );
    }

    #[test]
    fn parses_actual_query_as_literal_pairs() {
        let params = parse_actual_query("category=public&scope=eu");
        assert_eq!(
            params,
            vec![
                ("category".to_string(), "public".to_string()),
                ("scope".to_string(), "eu".to_string()),
            ]
        );
    }
}
