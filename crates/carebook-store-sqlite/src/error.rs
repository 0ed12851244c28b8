//! Error type for `carebook-store-sqlite`.

use carebook_core::{ErrorClass, StoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] carebook_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A value did not match the declared type of its column.
  #[error("column {column}: {message}")]
  Column {
    column:  &'static str,
    message: String,
  },

  /// No row matched the id and owner (or user id) filter.
  #[error("record not found")]
  NotFound,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl StoreError for Error {
  fn class(&self) -> ErrorClass {
    match self {
      Error::NotFound => ErrorClass::NotFound,
      Error::Database(tokio_rusqlite::Error::Rusqlite(e))
        if e.sqlite_error_code() == Some(rusqlite::ErrorCode::ConstraintViolation) =>
      {
        ErrorClass::Conflict
      }
      _ => ErrorClass::Internal,
    }
  }
}
