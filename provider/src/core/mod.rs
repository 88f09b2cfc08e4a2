//! Provider core - adapter registry

mod registry;

pub use registry::{ProviderRegistry, ProviderRegistryBuilder};
