//! Route table: prefix → origin.
//!
//! # Responsibilities
//! - Store installed forwarding routes
//! - Look up the route for a request path
//! - Reject routes that cannot be forwarded or that collide
//!
//! # Design Decisions
//! - Immutable once published; installation builds a new table
//! - Longest matching prefix wins, so nested prefixes are unambiguous
//! - An identical prefix is rejected on the second install (first wins)
//! - Routes match every HTTP method
//! - A route whose backend never started stays installed but unavailable,
//!   so its prefix answers 502 instead of falling through to root content

use std::str::FromStr;
use axum::http::uri::{Authority, Scheme};
use thiserror::Error;
use url::Url;

use crate::routing::matcher::PathPrefixMatcher;

/// Error type for route installation.
#[derive(Debug, Error)]
pub enum RouteInstallError {
    /// Origin URL is unparseable, not http(s), or has no host.
    #[error("Invalid origin {origin:?}: {reason}")]
    InvalidOrigin { origin: String, reason: String },

    /// The prefix is already routed to another service.
    #[error("Route prefix {prefix} already installed for {existing}")]
    Conflict { prefix: String, existing: String },
}

/// Parsed forwarding target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    url: String,
    scheme: Scheme,
    authority: Authority,
}

impl Origin {
    /// Parse an origin of the form `scheme://host[:port]`.
    ///
    /// Any path component is ignored: the request path is always forwarded
    /// unchanged.
    pub fn parse(origin: &str) -> Result<Self, RouteInstallError> {
        let invalid = |reason: String| RouteInstallError::InvalidOrigin {
            origin: origin.to_string(),
            reason,
        };

        let url = Url::parse(origin).map_err(|e| invalid(e.to_string()))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(invalid(format!("unsupported scheme {}", url.scheme())));
        }
        let host = url.host_str().ok_or_else(|| invalid("missing host".to_string()))?;
        let authority = match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };

        Ok(Self {
            url: origin.to_string(),
            scheme: Scheme::from_str(url.scheme()).map_err(|e| invalid(e.to_string()))?,
            authority: Authority::from_str(&authority).map_err(|e| invalid(e.to_string()))?,
        })
    }

    /// The origin exactly as configured.
    pub fn as_str(&self) -> &str {
        &self.url
    }

    pub fn scheme(&self) -> &Scheme {
        &self.scheme
    }

    pub fn authority(&self) -> &Authority {
        &self.authority
    }
}

/// One installed forwarding route.
#[derive(Debug, Clone)]
pub struct Route {
    /// Service name, for logs.
    pub name: String,
    pub matcher: PathPrefixMatcher,
    pub origin: Origin,
    /// False when the backend failed to start.
    pub available: bool,
}

impl Route {
    pub fn prefix(&self) -> &str {
        self.matcher.prefix()
    }
}

/// The front end's forwarding routes.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a route for `prefix` forwarding to `origin`.
    ///
    /// Callers are expected to have filtered out trivial prefixes.
    pub fn install(&mut self, name: &str, prefix: &str, origin: &str) -> Result<&Route, RouteInstallError> {
        self.insert(name, prefix, origin, true)
    }

    /// Add a route for a backend that failed to start.
    ///
    /// The prefix stays claimed and requests under it are refused.
    pub fn install_unavailable(&mut self, name: &str, prefix: &str, origin: &str) -> Result<&Route, RouteInstallError> {
        self.insert(name, prefix, origin, false)
    }

    fn insert(&mut self, name: &str, prefix: &str, origin: &str, available: bool) -> Result<&Route, RouteInstallError> {
        let matcher = PathPrefixMatcher::new(prefix);
        if let Some(existing) = self.routes.iter().find(|r| r.matcher == matcher) {
            return Err(RouteInstallError::Conflict {
                prefix: matcher.prefix().to_string(),
                existing: existing.name.clone(),
            });
        }

        let origin = Origin::parse(origin)?;
        self.routes.push(Route {
            name: name.to_string(),
            matcher,
            origin,
            available,
        });
        Ok(&self.routes[self.routes.len() - 1])
    }

    /// Route for `path`, preferring the longest matching prefix.
    pub fn match_path(&self, path: &str) -> Option<&Route> {
        self.routes
            .iter()
            .filter(|r| r.matcher.matches(path))
            .max_by_key(|r| r.prefix().len())
    }

    /// Installed routes in installation order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
