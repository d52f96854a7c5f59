//! Route matching logic.
//!
//! # Responsibilities
//! - Match a request path against a route prefix
//! - Normalize configured prefixes
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - A prefix only matches at a segment boundary: `/app1` matches
//!   `/app1` and `/app1/x` but never `/app10`
//! - No regex in the hot path

/// Matches the request path prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    /// Create a new path prefix matcher. The prefix is normalized first.
    pub fn new(prefix: impl AsRef<str>) -> Self {
        Self {
            prefix: normalize_prefix(prefix.as_ref()),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns true if `path` falls under this prefix.
    pub fn matches(&self, path: &str) -> bool {
        match path.strip_prefix(self.prefix.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/') || self.prefix == "/",
            None => false,
        }
    }
}

/// Add a missing leading `/` and drop trailing ones.
///
/// The empty string stays empty (no route); any run of slashes becomes `/`.
pub fn normalize_prefix(prefix: &str) -> String {
    if prefix.is_empty() {
        return String::new();
    }
    let trimmed = prefix.trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

/// True when a prefix produces no forwarding route.
///
/// The root belongs to the front end itself.
pub fn is_trivial_prefix(prefix: &str) -> bool {
    prefix.is_empty() || prefix == "/"
}
