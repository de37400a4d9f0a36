//! Core traits for the extdns system
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`Source`]: Derive desired endpoints from cluster resources
//! - [`DnsProvider`]: Read and mutate DNS zone records

pub mod dns_provider;
pub mod source;

pub use dns_provider::{DnsProvider, DnsProviderFactory};
pub use source::{Source, SourceFactory};
