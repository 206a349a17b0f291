//! Error types for the analytics store

use thiserror::Error;

/// Errors raised while constructing a store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Invalid store limit: {0}")]
    InvalidLimit(&'static str),
}
