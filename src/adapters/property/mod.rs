//! Property directory adapters.
//!
//! Implementations of the `PropertyDirectory` port:
//!
//! - `http_client` - Production REST client for the property service
//! - `in_memory` - Test implementation backed by fixed maps

mod http_client;
mod in_memory;

pub use http_client::{HttpPropertyDirectory, PropertyDirectoryConfig};
pub use in_memory::InMemoryPropertyDirectory;
