//! Route matching logic.
//!
//! # Responsibilities
//! - Match the configured path prefix on a segment boundary
//! - Strip the prefix to produce the upstream path
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - `/api` matches `/api` and `/api/...`, never `/apix`
//! - No regex to guarantee O(n) matching

/// Matches and strips a fixed path prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    /// Create a new path prefix matcher. Trailing slashes are ignored.
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let prefix = prefix.trim_end_matches('/').to_string();
        Self { prefix }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns true if `path` lives under the prefix.
    pub fn matches(&self, path: &str) -> bool {
        self.strip(path).is_some()
    }

    /// Remainder of `path` after the prefix, or `None` when it does not match.
    ///
    /// The remainder is either empty or starts with `/`.
    pub fn strip<'a>(&self, path: &'a str) -> Option<&'a str> {
        let rest = path.strip_prefix(self.prefix.as_str())?;
        if rest.is_empty() || rest.starts_with('/') {
            Some(rest)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_matcher() {
        let matcher = PathPrefixMatcher::new("/api");

        assert!(matcher.matches("/api/v1"));
        assert!(matcher.matches("/api"));
        assert!(!matcher.matches("/images"));
        assert!(!matcher.matches("/apix"));
        assert!(!matcher.matches("/API/v1"));
    }

    #[test]
    fn strip_keeps_everything_after_prefix() {
        let matcher = PathPrefixMatcher::new("/api/");
        assert_eq!(matcher.prefix(), "/api");
        assert_eq!(matcher.strip("/api/natal"), Some("/natal"));
        assert_eq!(matcher.strip("/api/a/b//c/"), Some("/a/b//c/"));
        assert_eq!(matcher.strip("/api"), Some(""));
        assert_eq!(matcher.strip("/api/"), Some("/"));
        assert_eq!(matcher.strip("/health"), None);
    }

    #[test]
    fn nested_prefix() {
        let matcher = PathPrefixMatcher::new("/proxy/v2");
        assert_eq!(matcher.strip("/proxy/v2/users"), Some("/users"));
        assert_eq!(matcher.strip("/proxy/v22/users"), None);
    }
}
