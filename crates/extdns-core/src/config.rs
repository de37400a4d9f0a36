//! Configuration types for the extdns system
//!
//! This module defines all configuration structures used throughout the crate.

use serde::{Deserialize, Serialize};

/// Main extdns configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtDnsConfig {
    /// Endpoint source configuration
    pub source: SourceConfig,

    /// DNS provider configuration
    pub provider: ProviderConfig,

    /// Zone to keep in sync (provider-specific name or ID)
    pub zone: String,

    /// Optional controller settings
    #[serde(default)]
    pub controller: ControllerConfig,
}

impl ExtDnsConfig {
    /// Create a new configuration for a zone with defaults
    pub fn new(zone: impl Into<String>) -> Self {
        Self {
            source: SourceConfig::default(),
            provider: ProviderConfig::default(),
            zone: zone.into(),
            controller: ControllerConfig::default(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.zone.trim().is_empty() {
            return Err(crate::Error::config("No zone configured"));
        }

        self.source.validate()?;
        self.provider.validate()?;
        self.controller.validate()?;

        Ok(())
    }
}

/// Endpoint source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SourceConfig {
    /// Kubernetes Ingress resources
    Ingress {
        /// Namespace to list from (`None` = all namespaces)
        namespace: Option<String>,
    },

    /// Custom source
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl SourceConfig {
    /// Validate the source configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            SourceConfig::Ingress { namespace } => {
                if namespace.as_deref().is_some_and(|ns| ns.trim().is_empty()) {
                    return Err(crate::Error::config(
                        "Ingress namespace cannot be blank (omit it for all namespaces)",
                    ));
                }
                Ok(())
            }
            SourceConfig::Custom { factory, config } => {
                validate_custom("source", factory, config)
            }
        }
    }

    /// Get the source type name
    pub fn type_name(&self) -> &str {
        match self {
            SourceConfig::Ingress { .. } => "ingress",
            SourceConfig::Custom { factory, .. } => factory,
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig::Ingress { namespace: None }
    }
}

/// DNS provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// In-memory provider (not persistent)
    #[serde(rename = "inmemory")]
    InMemory {
        /// Zones to create at startup
        #[serde(default)]
        zones: Vec<String>,
    },

    /// Custom provider
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl ProviderConfig {
    /// Validate the provider configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            ProviderConfig::InMemory { zones } => {
                if zones.iter().any(|z| z.trim().is_empty()) {
                    return Err(crate::Error::config(
                        "In-memory provider zone names cannot be empty",
                    ));
                }
                Ok(())
            }
            ProviderConfig::Custom { factory, config } => {
                validate_custom("provider", factory, config)
            }
        }
    }

    /// Get the provider type name
    pub fn type_name(&self) -> &str {
        match self {
            ProviderConfig::InMemory { .. } => "inmemory",
            ProviderConfig::Custom { factory, .. } => factory,
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig::InMemory { zones: Vec::new() }
    }
}

fn validate_custom(
    kind: &str,
    factory: &str,
    config: &serde_json::Value,
) -> Result<(), crate::Error> {
    if factory.is_empty() {
        return Err(crate::Error::config(format!(
            "Custom {} factory cannot be empty",
            kind
        )));
    }
    if config.is_null() {
        return Err(crate::Error::config(format!(
            "Custom {} config cannot be null",
            kind
        )));
    }
    Ok(())
}

/// Controller configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Interval between synchronization cycles (in seconds)
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Compute changes but never apply them
    #[serde(default)]
    pub dry_run: bool,

    /// Capacity of the controller event channel
    ///
    /// When full, new events are dropped (with a warning log).
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

impl ControllerConfig {
    /// Validate the controller configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.interval_secs == 0 {
            return Err(crate::Error::config("Controller interval must be > 0"));
        }
        if self.event_channel_capacity == 0 {
            return Err(crate::Error::config(
                "Controller event channel capacity must be > 0",
            ));
        }
        Ok(())
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            dry_run: false,
            event_channel_capacity: default_event_channel_capacity(),
        }
    }
}

fn default_interval_secs() -> u64 {
    60
}

fn default_event_channel_capacity() -> usize {
    100
}
