// # DNS Provider Implementations
//
// Providers that ship with the core library. Cloud backends live in their
// own crates and register themselves the same way.

pub mod inmemory;

pub use inmemory::{InMemoryProvider, InMemoryProviderFactory};

use crate::registry::ProviderRegistry;

/// Register the built-in providers with a registry
pub fn register(registry: &ProviderRegistry) {
    registry.register_provider("inmemory", Box::new(InMemoryProviderFactory));
}
