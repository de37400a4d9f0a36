// # Source Trait
//
// Defines the interface for deriving desired DNS endpoints from cluster
// resources.
//
// ## Implementations
//
// - Kubernetes Ingress: `extdns-source-ingress` crate
// - Composition: `extdns_core::source::MultiSource`
//
// ## Usage
//
// ```rust,ignore
// use extdns_core::Source;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let source = /* Source implementation */;
//
//     for endpoint in source.endpoints().await? {
//         println!("{}", endpoint);
//     }
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

use crate::endpoint::Endpoint;

/// Trait for endpoint source implementations
///
/// A source is a read-only view over some set of cluster resources. Each call
/// to [`Source::endpoints`] lists the resources in the source's configured
/// scope and returns the endpoints they imply.
///
/// Implementations must be thread-safe and usable across async tasks.
///
/// # Rules
///
/// - No side effects: sources only read
/// - No caching between calls: every call reflects a fresh listing
/// - No retry: a failed listing is returned as `Error::Retrieval`
/// - All-or-nothing: on error no partial endpoints are returned
/// - No implicit sort or dedup: output follows resource, rule and address order
#[async_trait]
pub trait Source: Send + Sync {
    /// List the desired endpoints for every resource in scope
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<Endpoint>)`: Concatenation of each resource's endpoints
    /// - `Err(Error::Retrieval)`: If the underlying listing failed
    async fn endpoints(&self) -> Result<Vec<Endpoint>, crate::Error>;

    /// Get the source name (for logging/debugging)
    fn source_name(&self) -> &'static str;
}

/// Helper trait for constructing sources from configuration
pub trait SourceFactory: Send + Sync {
    /// Create a Source instance from configuration
    ///
    /// # Parameters
    ///
    /// - `config`: Configuration specific to this source type
    ///
    /// # Returns
    ///
    /// A boxed Source trait object
    fn create(
        &self,
        config: &crate::config::SourceConfig,
    ) -> Result<Box<dyn Source>, crate::Error>;
}
