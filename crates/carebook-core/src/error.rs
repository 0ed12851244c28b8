//! Error types for `carebook-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("{0} does not serialise to a JSON object")]
  NotAnObject(&'static str),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Coarse category of a store failure, as far as callers need to react.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
  /// The targeted row does not exist for this owner.
  NotFound,
  /// A uniqueness or other constraint rejected the write.
  Conflict,
  Internal,
}

/// Implemented by store backend errors so that upper layers can categorise
/// failures without knowing the backend.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn class(&self) -> ErrorClass;
}
