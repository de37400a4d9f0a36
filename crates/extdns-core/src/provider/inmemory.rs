// # In-Memory DNS Provider
//
// In-memory implementation of DnsProvider.
//
// ## Purpose
//
// Holds zones and their records in process memory. Useful for dry runs,
// local development and tests that need a real backend round trip.
//
// ## Batch Semantics
//
// `apply_changes` validates the whole batch before touching the zone. A
// batch that fails validation leaves the zone exactly as it was.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::config::ProviderConfig;
use crate::endpoint::Endpoint;
use crate::plan::Changes;
use crate::traits::{DnsProvider, DnsProviderFactory};
use crate::Error;

const PROVIDER_NAME: &str = "inmemory";

/// In-memory DNS provider implementation
///
/// Zones map to their records in insertion order, protected by a RwLock.
/// Cloning shares the underlying zones.
///
/// # Example
///
/// ```rust,no_run
/// use extdns_core::provider::InMemoryProvider;
/// use extdns_core::{DnsProvider, Changes, Endpoint};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let provider = InMemoryProvider::with_zones(["example.com"]);
///
///     let changes = Changes {
///         create: vec![Endpoint::new("foo.example.com", "1.2.3.4")],
///         ..Default::default()
///     };
///     provider.apply_changes("example.com", &changes).await?;
///
///     let records = provider.records("example.com").await?;
///     assert_eq!(records.len(), 1);
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    zones: Arc<RwLock<HashMap<String, Vec<Endpoint>>>>,
}

impl InMemoryProvider {
    /// Create a provider with no zones
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider with the given empty zones
    pub fn with_zones<I, S>(zones: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let zones = zones
            .into_iter()
            .map(|zone| (zone.into(), Vec::new()))
            .collect();

        Self {
            zones: Arc::new(RwLock::new(zones)),
        }
    }

    /// Create an empty zone
    ///
    /// Fails if the zone already exists.
    pub async fn create_zone(&self, zone: impl Into<String>) -> Result<(), Error> {
        let zone = zone.into();
        let mut guard = self.zones.write().await;
        if guard.contains_key(&zone) {
            return Err(Error::provider(
                PROVIDER_NAME,
                format!("zone already exists: {}", zone),
            ));
        }
        guard.insert(zone, Vec::new());
        Ok(())
    }

    /// List the zones held by this provider
    pub async fn zones(&self) -> Vec<String> {
        self.zones.read().await.keys().cloned().collect()
    }
}

#[async_trait]
impl DnsProvider for InMemoryProvider {
    async fn records(&self, zone: &str) -> Result<Vec<Endpoint>, Error> {
        let guard = self.zones.read().await;
        guard
            .get(zone)
            .cloned()
            .ok_or_else(|| zone_not_found(zone))
    }

    async fn apply_changes(&self, zone: &str, changes: &Changes) -> Result<(), Error> {
        let mut guard = self.zones.write().await;
        let records = guard.get_mut(zone).ok_or_else(|| zone_not_found(zone))?;

        validate_batch(records, changes)?;

        let removed: HashSet<&Endpoint> = changes
            .delete
            .iter()
            .chain(changes.update_old.iter())
            .collect();
        records.retain(|ep| !removed.contains(ep));
        records.extend(changes.create.iter().cloned());
        records.extend(changes.update_new.iter().cloned());

        debug!(
            zone,
            created = changes.create.len(),
            updated = changes.update_new.len(),
            deleted = changes.delete.len(),
            "Applied changes to in-memory zone"
        );

        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

fn zone_not_found(zone: &str) -> Error {
    Error::provider(PROVIDER_NAME, format!("zone not found: {}", zone))
}

/// Reject the batch unless every change can be applied
fn validate_batch(records: &[Endpoint], changes: &Changes) -> Result<(), Error> {
    let existing: HashSet<&Endpoint> = records.iter().collect();
    let mut seen: HashSet<&Endpoint> = HashSet::new();

    for ep in changes.create.iter().chain(changes.update_new.iter()) {
        if existing.contains(ep) && !is_removed(ep, changes) {
            return Err(conflict("record already exists", ep));
        }
        if !seen.insert(ep) {
            return Err(conflict("record added twice in one batch", ep));
        }
    }

    seen.clear();
    for ep in changes.update_old.iter().chain(changes.delete.iter()) {
        if !existing.contains(ep) {
            return Err(conflict("record does not exist", ep));
        }
        if !seen.insert(ep) {
            return Err(conflict("record removed twice in one batch", ep));
        }
    }

    Ok(())
}

fn is_removed(ep: &Endpoint, changes: &Changes) -> bool {
    changes.update_old.contains(ep) || changes.delete.contains(ep)
}

fn conflict(reason: &str, ep: &Endpoint) -> Error {
    Error::provider(PROVIDER_NAME, format!("{}: {}", reason, ep))
}

/// Factory for creating in-memory providers
pub struct InMemoryProviderFactory;

impl DnsProviderFactory for InMemoryProviderFactory {
    fn create(&self, config: &ProviderConfig) -> Result<Box<dyn DnsProvider>, Error> {
        match config {
            ProviderConfig::InMemory { zones } => {
                Ok(Box::new(InMemoryProvider::with_zones(zones.iter().cloned())))
            }
            _ => Err(Error::config("Invalid config for in-memory provider")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ep(name: &str, target: &str) -> Endpoint {
        Endpoint::new(name, target)
    }

    #[tokio::test]
    async fn test_unknown_zone_is_provider_error() {
        let provider = InMemoryProvider::new();

        let err = provider.records("example.com").await.unwrap_err();
        assert!(err.is_provider());

        let err = provider
            .apply_changes("example.com", &Changes::default())
            .await
            .unwrap_err();
        assert!(err.is_provider());
    }

    #[tokio::test]
    async fn test_create_zone_twice_fails() {
        let provider = InMemoryProvider::new();
        provider.create_zone("example.com").await.unwrap();
        assert!(provider.create_zone("example.com").await.is_err());
        assert_eq!(provider.zones().await, vec!["example.com".to_string()]);
    }

    #[tokio::test]
    async fn test_create_update_delete() {
        let provider = InMemoryProvider::with_zones(["example.com"]);

        let create = Changes {
            create: vec![ep("foo.example.com", "1.2.3.4"), ep("bar.example.com", "5.6.7.8")],
            ..Default::default()
        };
        provider.apply_changes("example.com", &create).await.unwrap();

        let update = Changes {
            update_old: vec![ep("foo.example.com", "1.2.3.4")],
            update_new: vec![ep("foo.example.com", "9.9.9.9")],
            delete: vec![ep("bar.example.com", "5.6.7.8")],
            ..Default::default()
        };
        provider.apply_changes("example.com", &update).await.unwrap();

        let records = provider.records("example.com").await.unwrap();
        assert_eq!(records, vec![ep("foo.example.com", "9.9.9.9")]);
    }

    #[tokio::test]
    async fn test_invalid_batch_leaves_zone_untouched() {
        let provider = InMemoryProvider::with_zones(["example.com"]);
        let seed = Changes {
            create: vec![ep("foo.example.com", "1.2.3.4")],
            ..Default::default()
        };
        provider.apply_changes("example.com", &seed).await.unwrap();

        // Valid create followed by a delete of a missing record
        let batch = Changes {
            create: vec![ep("bar.example.com", "5.6.7.8")],
            delete: vec![ep("missing.example.com", "1.1.1.1")],
            ..Default::default()
        };
        let err = provider.apply_changes("example.com", &batch).await.unwrap_err();
        assert!(err.to_string().contains("does not exist"));

        let records = provider.records("example.com").await.unwrap();
        assert_eq!(records, vec![ep("foo.example.com", "1.2.3.4")]);
    }

    #[tokio::test]
    async fn test_duplicate_create_rejected() {
        let provider = InMemoryProvider::with_zones(["example.com"]);
        let seed = Changes {
            create: vec![ep("foo.example.com", "1.2.3.4")],
            ..Default::default()
        };
        provider.apply_changes("example.com", &seed).await.unwrap();

        let err = provider.apply_changes("example.com", &seed).await.unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[tokio::test]
    async fn test_update_may_shrink_record_set() {
        let provider = InMemoryProvider::with_zones(["example.com"]);
        let seed = Changes {
            create: vec![ep("foo.example.com", "1.2.3.4"), ep("foo.example.com", "lb.example.com")],
            ..Default::default()
        };
        provider.apply_changes("example.com", &seed).await.unwrap();

        // Old and new sets overlap on 1.2.3.4
        let batch = Changes {
            update_old: vec![ep("foo.example.com", "1.2.3.4"), ep("foo.example.com", "lb.example.com")],
            update_new: vec![ep("foo.example.com", "1.2.3.4")],
            ..Default::default()
        };
        provider.apply_changes("example.com", &batch).await.unwrap();

        let records = provider.records("example.com").await.unwrap();
        assert_eq!(records, vec![ep("foo.example.com", "1.2.3.4")]);
    }

    #[test]
    fn test_factory_creation() {
        let factory = InMemoryProviderFactory;
        let config = ProviderConfig::InMemory {
            zones: vec!["example.com".to_string()],
        };

        let provider = factory.create(&config).unwrap();
        assert_eq!(provider.provider_name(), "inmemory");
    }
}
