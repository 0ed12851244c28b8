//! The four owner-scoped verbs, generic over [`RecordKind`].
//!
//! | Method | Path | Input | Output |
//! |--------|------|-------|--------|
//! | `GET`  | `/get{Plural}` | none | records, in the kind's order |
//! | `POST` | `/add{Kind}` | create object | 201 + created record |
//! | `POST` | `/update{Kind}` | `{ "id": ..., ...patch }` | updated record |
//! | `POST` | `/delete{Kind}` | `"<uuid>"` | deleted record |

use axum::{
  Json, Router,
  extract::State,
  http::StatusCode,
  routing::{get, post},
};
use bytes::Bytes;
use carebook_core::{Owned, RecordKind};

use crate::{
  AppState, Backend,
  auth::{Caller, IdentityProvider},
  error::ApiError,
  validate,
};

/// Register the four procedures of `K` on `router`.
pub fn routes<K, S, I>(router: Router<AppState<S, I>>) -> Router<AppState<S, I>>
where
  K: RecordKind,
  S: Backend,
  I: IdentityProvider,
{
  router
    .route(&format!("/get{}", K::PLURAL), get(list::<K, S, I>))
    .route(&format!("/add{}", K::NAME), post(add::<K, S, I>))
    .route(&format!("/update{}", K::NAME), post(update::<K, S, I>))
    .route(&format!("/delete{}", K::NAME), post(delete::<K, S, I>))
}

pub async fn list<K, S, I>(
  State(state): State<AppState<S, I>>,
  Caller(owner): Caller,
) -> Result<Json<Vec<Owned<K>>>, ApiError>
where
  K: RecordKind,
  S: Backend,
  I: IdentityProvider,
{
  let records = state
    .store
    .list::<K>(owner)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(records))
}

pub async fn add<K, S, I>(
  State(state): State<AppState<S, I>>,
  Caller(owner): Caller,
  body: Bytes,
) -> Result<(StatusCode, Json<Owned<K>>), ApiError>
where
  K: RecordKind,
  S: Backend,
  I: IdentityProvider,
{
  let input: K::New = validate::create_input(K::FIELDS, &body)?;
  let record = state
    .store
    .create::<K>(owner, input)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update<K, S, I>(
  State(state): State<AppState<S, I>>,
  Caller(owner): Caller,
  body: Bytes,
) -> Result<Json<Owned<K>>, ApiError>
where
  K: RecordKind,
  S: Backend,
  I: IdentityProvider,
{
  let (id, patch): (_, K::Patch) = validate::update_input(K::FIELDS, &body)?;
  let record = state
    .store
    .update::<K>(owner, id, patch)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(record))
}

pub async fn delete<K, S, I>(
  State(state): State<AppState<S, I>>,
  Caller(owner): Caller,
  body: Bytes,
) -> Result<Json<Owned<K>>, ApiError>
where
  K: RecordKind,
  S: Backend,
  I: IdentityProvider,
{
  let id = validate::id_input(&body)?;
  let record = state
    .store
    .delete::<K>(owner, id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(record))
}
