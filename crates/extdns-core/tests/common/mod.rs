//! Test doubles and common utilities for contract tests
//!
//! This module provides minimal test doubles that verify the controller's
//! interaction with sources and providers.

#![allow(dead_code)]

use extdns_core::error::{Error, Result};
use extdns_core::plan::Changes;
use extdns_core::traits::{DnsProvider, Source};
use extdns_core::{Endpoint, InMemoryProvider};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// A source whose endpoints the test controls
#[derive(Clone)]
pub struct StaticSource {
    endpoints: Arc<std::sync::Mutex<Vec<Endpoint>>>,
    call_count: Arc<AtomicUsize>,
}

impl StaticSource {
    pub fn new(endpoints: Vec<Endpoint>) -> Self {
        Self {
            endpoints: Arc::new(std::sync::Mutex::new(endpoints)),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Replace the endpoints returned by subsequent calls
    pub fn set(&self, endpoints: Vec<Endpoint>) {
        *self.endpoints.lock().unwrap() = endpoints;
    }

    /// Get the number of times endpoints() was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Source for StaticSource {
    async fn endpoints(&self) -> Result<Vec<Endpoint>> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        Ok(self.endpoints.lock().unwrap().clone())
    }

    fn source_name(&self) -> &'static str {
        "static"
    }
}

/// A source whose listing always fails
pub struct FailingSource;

#[async_trait::async_trait]
impl Source for FailingSource {
    async fn endpoints(&self) -> Result<Vec<Endpoint>> {
        Err(Error::retrieval("the server is currently unable to handle the request"))
    }

    fn source_name(&self) -> &'static str {
        "failing"
    }
}

/// A source whose first listing takes `first_call_delay`; records when each call starts
#[derive(Clone)]
pub struct SlowSource {
    first_call_delay: std::time::Duration,
    call_starts: Arc<std::sync::Mutex<Vec<tokio::time::Instant>>>,
}

impl SlowSource {
    pub fn new(first_call_delay: std::time::Duration) -> Self {
        Self {
            first_call_delay,
            call_starts: Arc::new(std::sync::Mutex::new(Vec::new())),
        }
    }

    /// Start instants of every endpoints() call so far
    pub fn call_starts(&self) -> Vec<tokio::time::Instant> {
        self.call_starts.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Source for SlowSource {
    async fn endpoints(&self) -> Result<Vec<Endpoint>> {
        let first = {
            let mut starts = self.call_starts.lock().unwrap();
            starts.push(tokio::time::Instant::now());
            starts.len() == 1
        };
        if first {
            tokio::time::sleep(self.first_call_delay).await;
        }
        Ok(Vec::new())
    }

    fn source_name(&self) -> &'static str {
        "slow"
    }
}

/// An in-memory provider that counts calls and can be told to fail
#[derive(Clone)]
pub struct RecordingProvider {
    inner: InMemoryProvider,
    apply_call_count: Arc<AtomicUsize>,
    fail_apply: Arc<AtomicBool>,
}

impl RecordingProvider {
    pub fn new(zone: &str) -> Self {
        Self {
            inner: InMemoryProvider::with_zones([zone]),
            apply_call_count: Arc::new(AtomicUsize::new(0)),
            fail_apply: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Get the number of times apply_changes() was called
    pub fn apply_call_count(&self) -> usize {
        self.apply_call_count.load(Ordering::SeqCst)
    }

    /// Make every following apply_changes() call fail
    pub fn fail_apply(&self, fail: bool) {
        self.fail_apply.store(fail, Ordering::SeqCst);
    }

    /// Access the backing zones directly
    pub fn inner(&self) -> &InMemoryProvider {
        &self.inner
    }
}

#[async_trait::async_trait]
impl DnsProvider for RecordingProvider {
    async fn records(&self, zone: &str) -> Result<Vec<Endpoint>> {
        self.inner.records(zone).await
    }

    async fn apply_changes(&self, zone: &str, changes: &Changes) -> Result<()> {
        self.apply_call_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_apply.load(Ordering::SeqCst) {
            return Err(Error::provider("recording", "backend unavailable"));
        }
        self.inner.apply_changes(zone, changes).await
    }

    fn provider_name(&self) -> &'static str {
        "recording"
    }
}

/// Helper to create a minimal ExtDnsConfig for testing
pub fn minimal_config(zone: &str) -> extdns_core::config::ExtDnsConfig {
    extdns_core::config::ExtDnsConfig {
        source: extdns_core::config::SourceConfig::Ingress { namespace: None },
        provider: extdns_core::config::ProviderConfig::InMemory {
            zones: vec![zone.to_string()],
        },
        zone: zone.to_string(),
        controller: extdns_core::config::ControllerConfig {
            interval_secs: 1,
            dry_run: false,
            event_channel_capacity: 100,
        },
    }
}

/// Shorthand endpoint constructor
pub fn ep(name: &str, target: &str) -> Endpoint {
    Endpoint::new(name, target)
}
