// # Endpoint
//
// A single desired (or observed) DNS record: a fully-qualified name pointing
// at a target. Sources produce endpoints, providers report their records as
// endpoints, and the planner diffs the two.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A normalized (DNS name, target) pair
///
/// `dns_name` always ends with exactly one trailing dot when built through
/// [`Endpoint::new`]. `target` is kept as given: an IP literal or a hostname.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    /// Fully-qualified record name (e.g. "foo.example.com.")
    pub dns_name: String,
    /// IP literal or hostname the record points at
    pub target: String,
}

impl Endpoint {
    /// Create a new endpoint, normalizing the DNS name
    pub fn new(dns_name: &str, target: impl Into<String>) -> Self {
        Self {
            dns_name: sanitize_hostname(dns_name),
            target: target.into(),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.dns_name, self.target)
    }
}

/// Strip leading and trailing dots, then append a single trailing dot
///
/// Total: an empty (or all-dot) input yields `"."`. Callers filter empty
/// hosts before reaching this point.
pub fn sanitize_hostname(hostname: &str) -> String {
    format!("{}.", hostname.trim_matches('.'))
}
