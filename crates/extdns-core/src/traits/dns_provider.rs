// # DNS Provider Trait
//
// Defines the interface for reading and mutating a DNS backend's zone
// records.
//
// ## Implementations
//
// - In-memory: `extdns_core::provider::InMemoryProvider`
// - Future: Route53, Google Cloud DNS, Cloudflare, etc.
//
// ## Usage
//
// ```rust,ignore
// use extdns_core::{DnsProvider, Plan};
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let provider = /* DnsProvider implementation */;
//
//     let current = provider.records("example.com").await?;
//     let changes = Plan::new(current, desired).calculate();
//     provider.apply_changes("example.com", &changes).await?;
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

use crate::endpoint::Endpoint;
use crate::plan::Changes;

/// Trait for DNS provider implementations
///
/// This trait abstracts a DNS backend so the controller can read and mutate
/// zone records without depending on a specific provider's API.
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks. The
/// controller may call several providers concurrently.
///
/// # Rules
///
/// ## Allowed
/// - ✅ Perform API calls against their own backend
/// - ✅ Translate provider records into [`Endpoint`]s
/// - ✅ Return success or failure
///
/// ## Forbidden
/// - ❌ Spawn tasks or threads
/// - ❌ Implement retry logic or backoff (owned by the caller)
/// - ❌ Decide which records should exist (owned by the planner)
/// - ❌ Silently drop part of a changeset
///
/// A provider that fails halfway through a batch must return an error. The
/// caller assumes the zone may be partially applied and re-reads it with
/// [`DnsProvider::records`] before the next attempt.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// List the current records in a zone
    ///
    /// One [`Endpoint`] per (name, target) pair, in the same shape sources
    /// produce so the two can be diffed.
    ///
    /// # Parameters
    ///
    /// - `zone`: Zone identifier (provider-specific: zone name or ID)
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<Endpoint>)`: The zone's records
    /// - `Err(Error::Provider)`: Zone not found, authentication or network failure
    async fn records(&self, zone: &str) -> Result<Vec<Endpoint>, crate::Error>;

    /// Apply a changeset to a zone
    ///
    /// Atomicity across records is backend-dependent.
    ///
    /// # Parameters
    ///
    /// - `zone`: Zone identifier
    /// - `changes`: Records to create, update and delete
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Every change was applied
    /// - `Err(Error::Provider)`: Any part of the batch failed
    async fn apply_changes(&self, zone: &str, changes: &Changes) -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    ///
    /// # Returns
    ///
    /// A static string identifying the provider (e.g., "inmemory", "route53")
    fn provider_name(&self) -> &'static str;
}

/// Helper trait for constructing DNS providers from configuration
pub trait DnsProviderFactory: Send + Sync {
    /// Create a DnsProvider instance from configuration
    ///
    /// # Parameters
    ///
    /// - `config`: Configuration specific to this provider
    ///
    /// # Returns
    ///
    /// A boxed DnsProvider trait object
    fn create(
        &self,
        config: &crate::config::ProviderConfig,
    ) -> Result<Box<dyn DnsProvider>, crate::Error>;
}
