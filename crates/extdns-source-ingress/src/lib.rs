// # Ingress Source
//
// This crate provides a Kubernetes Ingress source for the extdns system.
//
// ## Extraction
//
// Every rule with a host, crossed with every load-balancer address in the
// Ingress status, becomes one endpoint per address field:
//
// ```text
// spec.rules[].host  x  status.loadBalancer.ingress[].{ip, hostname}
// ```
//
// - Rules without a host are catch-all routes and produce nothing
// - An address with both `ip` and `hostname` produces two endpoints
// - The rule host is normalized to a single trailing dot; targets are not
// - Annotations are ignored
//
// ## Listing
//
// Listing goes through the [`IngressLister`] seam. [`KubeIngressLister`]
// pages through the Kubernetes API; tests substitute a stub.

use std::sync::Arc;

use async_trait::async_trait;
use extdns_core::config::SourceConfig;
use extdns_core::traits::{Source, SourceFactory};
use extdns_core::{Endpoint, Error, ProviderRegistry, Result};
use k8s_openapi::api::networking::v1::Ingress;
use kube::api::ListParams;
use kube::{Api, Client};
use tracing::debug;

/// Page size for Ingress list calls
const LIST_PAGE_SIZE: u32 = 500;

/// Read access to Ingress resources
///
/// Implementations must be safe to call concurrently.
#[async_trait]
pub trait IngressLister: Send + Sync {
    /// List every Ingress in `namespace`, or in all namespaces when `None`
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<Ingress>)`: All matching resources, in API order
    /// - `Err(Error::Retrieval)`: If the listing failed
    async fn list_ingresses(&self, namespace: Option<&str>) -> Result<Vec<Ingress>>;
}

/// Lists Ingresses through the Kubernetes API
#[derive(Clone)]
pub struct KubeIngressLister {
    client: Client,
}

impl KubeIngressLister {
    /// Create a lister over an existing client
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IngressLister for KubeIngressLister {
    async fn list_ingresses(&self, namespace: Option<&str>) -> Result<Vec<Ingress>> {
        let api: Api<Ingress> = match namespace {
            Some(ns) => Api::namespaced(self.client.clone(), ns),
            None => Api::all(self.client.clone()),
        };

        let mut params = ListParams {
            limit: Some(LIST_PAGE_SIZE),
            ..Default::default()
        };
        let mut items = Vec::new();
        let mut pages = 0;

        loop {
            pages += 1;
            let page = api
                .list(&params)
                .await
                .map_err(|e| Error::retrieval(format!("failed to list ingresses: {}", e)))?;

            items.extend(page.items);

            match page.metadata.continue_ {
                Some(token) if !token.is_empty() => params.continue_token = Some(token),
                _ => break,
            }
        }

        debug!(
            namespace = namespace.unwrap_or("<all>"),
            pages,
            items = items.len(),
            "Listed ingresses"
        );

        Ok(items)
    }
}

/// Endpoint source backed by Kubernetes Ingress resources
///
/// Holds only its lister and namespace scope; every call lists afresh.
pub struct IngressSource {
    lister: Arc<dyn IngressLister>,
    namespace: Option<String>,
}

impl IngressSource {
    /// Create a source over `lister`, scoped to `namespace` (`None` = all)
    pub fn new(lister: Arc<dyn IngressLister>, namespace: Option<String>) -> Self {
        Self { lister, namespace }
    }

    /// Create a source that lists through a Kubernetes client
    pub fn from_client(client: Client, namespace: Option<String>) -> Self {
        Self::new(Arc::new(KubeIngressLister::new(client)), namespace)
    }

    /// Namespace scope (`None` = all namespaces)
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }
}

#[async_trait]
impl Source for IngressSource {
    async fn endpoints(&self) -> Result<Vec<Endpoint>> {
        let ingresses = self.lister.list_ingresses(self.namespace()).await?;

        let mut endpoints = Vec::new();
        for ing in &ingresses {
            endpoints.extend(endpoints_from_ingress(ing));
        }

        debug!(
            ingresses = ingresses.len(),
            endpoints = endpoints.len(),
            "Extracted endpoints from ingresses"
        );

        Ok(endpoints)
    }

    fn source_name(&self) -> &'static str {
        "ingress"
    }
}

/// Extract the endpoints implied by one Ingress
///
/// Rule order, then address order, is preserved. No dedup.
pub fn endpoints_from_ingress(ing: &Ingress) -> Vec<Endpoint> {
    let rules = ing
        .spec
        .as_ref()
        .and_then(|spec| spec.rules.as_deref())
        .unwrap_or_default();
    let addresses = ing
        .status
        .as_ref()
        .and_then(|status| status.load_balancer.as_ref())
        .and_then(|lb| lb.ingress.as_deref())
        .unwrap_or_default();

    let mut endpoints = Vec::new();

    for host in rules.iter().filter_map(|rule| non_empty(rule.host.as_deref())) {
        for lb in addresses {
            if let Some(ip) = non_empty(lb.ip.as_deref()) {
                endpoints.push(Endpoint::new(host, ip));
            }
            if let Some(hostname) = non_empty(lb.hostname.as_deref()) {
                endpoints.push(Endpoint::new(host, hostname));
            }
        }
    }

    endpoints
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Factory for creating Ingress sources
pub struct IngressSourceFactory {
    lister: Arc<dyn IngressLister>,
}

impl IngressSourceFactory {
    /// Create a factory whose sources list through `client`
    pub fn new(client: Client) -> Self {
        Self::with_lister(Arc::new(KubeIngressLister::new(client)))
    }

    /// Create a factory whose sources share `lister`
    pub fn with_lister(lister: Arc<dyn IngressLister>) -> Self {
        Self { lister }
    }
}

impl SourceFactory for IngressSourceFactory {
    fn create(&self, config: &SourceConfig) -> Result<Box<dyn Source>> {
        match config {
            SourceConfig::Ingress { namespace } => Ok(Box::new(IngressSource::new(
                Arc::clone(&self.lister),
                namespace.clone(),
            ))),
            _ => Err(Error::config("Invalid config for ingress source")),
        }
    }
}

/// Register the Ingress source with a registry
pub fn register(registry: &ProviderRegistry, client: Client) {
    registry.register_source("ingress", Box::new(IngressSourceFactory::new(client)));
}
