//! Storage layer: the session-scoped response cache.

mod cache;
mod error;

pub use cache::{ResponseCache, cache_key};
pub use error::StoreError;
