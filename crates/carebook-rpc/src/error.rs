//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every failure reaching a caller is one of a handful of categories. Store
//! internals are logged, never echoed.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use carebook_core::{ErrorClass, StoreError};
use serde_json::json;
use thiserror::Error;

use crate::validate::Issue;

#[derive(Debug, Error)]
pub enum ApiError {
  /// No identity could be resolved for the request.
  #[error("unauthorized")]
  Unauthorized,

  #[error("invalid input: {} issue(s)", .0.len())]
  Validation(Vec<Issue>),

  /// The record does not exist, or belongs to someone else.
  #[error("not found")]
  NotFound,

  #[error("conflict")]
  Conflict,

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("internal error: {0}")]
  Internal(String),
}

impl ApiError {
  /// Categorise a store failure by its [`ErrorClass`].
  pub fn from_store<E: StoreError>(e: E) -> Self {
    match e.class() {
      ErrorClass::NotFound => ApiError::NotFound,
      ErrorClass::Conflict => ApiError::Conflict,
      ErrorClass::Internal => ApiError::Store(Box::new(e)),
    }
  }

  fn code(&self) -> &'static str {
    match self {
      ApiError::Unauthorized => "UNAUTHORIZED",
      ApiError::Validation(_) => "BAD_REQUEST",
      ApiError::NotFound => "NOT_FOUND",
      ApiError::Conflict => "CONFLICT",
      ApiError::Store(_) | ApiError::Internal(_) => "INTERNAL_SERVER_ERROR",
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let code = self.code();
    let (status, body) = match &self {
      ApiError::Unauthorized => (
        StatusCode::UNAUTHORIZED,
        json!({ "error": { "code": code, "message": "authentication required" } }),
      ),
      ApiError::Validation(issues) => {
        tracing::debug!(?issues, "rejected input");
        (
          StatusCode::BAD_REQUEST,
          json!({ "error": { "code": code, "message": "invalid input", "issues": issues } }),
        )
      }
      ApiError::NotFound => {
        tracing::debug!("record not found or not owned by caller");
        (
          StatusCode::NOT_FOUND,
          json!({ "error": { "code": code, "message": "record not found" } }),
        )
      }
      ApiError::Conflict => (
        StatusCode::CONFLICT,
        json!({ "error": { "code": code, "message": "conflicts with existing data" } }),
      ),
      ApiError::Store(_) | ApiError::Internal(_) => {
        tracing::error!(error = %self, "request failed");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          json!({ "error": { "code": code, "message": "internal server error" } }),
        )
      }
    };

    let mut res = (status, Json(body)).into_response();
    if status == StatusCode::UNAUTHORIZED {
      res
        .headers_mut()
        .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
    }
    res
  }
}
