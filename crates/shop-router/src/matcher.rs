//! Path pattern matching.

use regex::Regex;

use crate::error::{RouterError, RouterResult};

/// A set of anchored path patterns such as `"/products(.*)"`.
///
/// Each pattern must match the whole path, so `"/"` only matches the root
/// and `"/admin(.*)"` matches `/admin` and everything below it.
#[derive(Debug, Clone, Default)]
pub struct RouteMatcher {
    patterns: Vec<String>,
    compiled: Vec<Regex>,
}

impl RouteMatcher {
    pub fn new<I, S>(patterns: I) -> RouterResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut matcher = Self::default();
        for pattern in patterns {
            let pattern = pattern.into();
            let compiled = Regex::new(&format!("^(?:{pattern})$")).map_err(|source| {
                RouterError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                }
            })?;
            matcher.patterns.push(pattern);
            matcher.compiled.push(compiled);
        }
        Ok(matcher)
    }

    pub fn matches(&self, path: &str) -> bool {
        self.compiled.iter().any(|re| re.is_match(path))
    }

    /// The source patterns, as configured.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_patterns() {
        let m = RouteMatcher::new(["/", "/products(.*)", "/about"]).unwrap();
        assert!(m.matches("/"));
        assert!(m.matches("/products"));
        assert!(m.matches("/products/abc-123"));
        assert!(m.matches("/about"));
        assert!(!m.matches("/about/team"));
        assert!(!m.matches("/cart"));
        assert!(!m.matches("/my/products"));
    }

    #[test]
    fn test_admin_pattern() {
        let m = RouteMatcher::new(["/admin(.*)"]).unwrap();
        assert!(m.matches("/admin"));
        assert!(m.matches("/admin/sales"));
        // Plain prefix after the literal part, not a path segment boundary.
        assert!(m.matches("/administrators"));
        assert!(!m.matches("/"));
    }

    #[test]
    fn test_alternation_stays_anchored() {
        let m = RouteMatcher::new(["/a|/b"]).unwrap();
        assert!(m.matches("/a"));
        assert!(m.matches("/b"));
        assert!(!m.matches("/a/x"));
        assert!(!m.matches("/x/b"));
    }

    #[test]
    fn test_invalid_pattern_names_it() {
        let err = RouteMatcher::new(["/ok", "/bad("]).unwrap_err();
        match err {
            RouterError::InvalidPattern { pattern, .. } => assert_eq!(pattern, "/bad("),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_matches_nothing() {
        let m = RouteMatcher::new(Vec::<String>::new()).unwrap();
        assert!(m.is_empty());
        assert!(!m.matches("/"));
    }
}
