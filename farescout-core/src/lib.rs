pub mod models;
pub mod repository;
pub mod search;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("Store query failed: {0}")]
    StoreError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
