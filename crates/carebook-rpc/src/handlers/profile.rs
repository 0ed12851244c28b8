//! The caller's own medical profile, stored on their user row.

use axum::{Json, extract::State};
use bytes::Bytes;
use carebook_core::user::{PROFILE_FIELDS, ProfilePatch, User};

use crate::{
  AppState, Backend,
  auth::{Caller, IdentityProvider},
  error::ApiError,
  validate,
};

/// `GET /getMedicalProfile`
pub async fn get<S, I>(
  State(state): State<AppState<S, I>>,
  Caller(user): Caller,
) -> Result<Json<User>, ApiError>
where
  S: Backend,
  I: IdentityProvider,
{
  let user = state
    .store
    .get_profile(user)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(user))
}

/// `POST /updateMedicalProfile`. Absent fields are kept, `null` clears.
pub async fn update<S, I>(
  State(state): State<AppState<S, I>>,
  Caller(user): Caller,
  body: Bytes,
) -> Result<Json<User>, ApiError>
where
  S: Backend,
  I: IdentityProvider,
{
  let patch: ProfilePatch = validate::patch_input(PROFILE_FIELDS, &body)?;
  let user = state
    .store
    .update_profile(user, patch)
    .await
    .map_err(ApiError::from_store)?;
  tracing::debug!(user = %user.id, "profile updated");
  Ok(Json(user))
}
