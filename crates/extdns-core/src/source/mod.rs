// # Source Implementations
//
// Generic sources that ship with the core library. Sources backed by a
// cluster API live in their own crates.

pub mod multi;

pub use multi::MultiSource;
