// # extdns-core
//
// Core library for keeping DNS zones in sync with cluster resources.
//
// ## Architecture Overview
//
// This library provides the core functionality for DNS synchronization:
// - **Endpoint**: A normalized (DNS name, target) pair
// - **Source**: Trait for deriving desired endpoints from cluster resources
// - **DnsProvider**: Trait for reading and mutating a DNS backend's zones
// - **Plan**: Diffs current vs. desired endpoints into `Changes`
// - **Controller**: Orchestrates the source → plan → provider cycle
// - **ProviderRegistry**: Plugin-based registry for sources and providers
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Extraction, planning and backends are independent
// 2. **Stateless Plugins**: Sources and providers hold only immutable configuration
// 3. **Plugin-Based**: Implementations are registered dynamically, no hard-coded if-else
// 4. **Library-First**: All core functionality can be used as a library
// 5. **No Hidden Retries**: Every failure is returned to the caller

pub mod config;
pub mod controller;
pub mod endpoint;
pub mod error;
pub mod plan;
pub mod provider;
pub mod registry;
pub mod source;
pub mod traits;

// Re-export core types for convenience
pub use config::{ControllerConfig, ExtDnsConfig, ProviderConfig, SourceConfig};
pub use controller::{Controller, ControllerEvent};
pub use endpoint::{Endpoint, sanitize_hostname};
pub use error::{Error, Result};
pub use plan::{Changes, Plan};
pub use provider::InMemoryProvider;
pub use registry::ProviderRegistry;
pub use source::MultiSource;
pub use traits::{DnsProvider, Source};
