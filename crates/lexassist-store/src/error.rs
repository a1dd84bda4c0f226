use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cache capacity must be at least 1 (omit it for an unbounded cache)")]
    ZeroCapacity,
}
