//! Sign-up, sign-in and sign-out.
//!
//! Sign-in issues an opaque bearer token; only its SHA-256 digest is stored.

use axum::{
  Json,
  extract::State,
  http::{HeaderMap, StatusCode},
};
use bytes::Bytes;
use carebook_core::user::{NewUser, User};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  AppState, Backend,
  auth::{
    Caller, IdentityProvider, bearer_token, generate_token, hash_password, hash_token,
    verify_password,
  },
  error::ApiError,
  validate::{Issue, json_body},
};

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Deserialize)]
pub struct SignUpBody {
  pub email:    String,
  pub name:     String,
  pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SignInBody {
  pub email:    String,
  pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
  pub token:      String,
  pub expires_at: DateTime<Utc>,
  pub user:       User,
}

impl SignUpBody {
  fn issues(&self) -> Vec<Issue> {
    let mut issues = Vec::new();
    if !self.email.trim().contains('@') {
      issues.push(Issue { path: "email".into(), message: "expected an email address".into() });
    }
    if self.name.trim().is_empty() {
      issues.push(Issue { path: "name".into(), message: "required".into() });
    }
    if self.password.chars().count() < MIN_PASSWORD_LEN {
      issues.push(Issue {
        path:    "password".into(),
        message: format!("must be at least {MIN_PASSWORD_LEN} characters"),
      });
    }
    issues
  }
}

/// `POST /auth/sign-up`
pub async fn sign_up<S, I>(
  State(state): State<AppState<S, I>>,
  body: Bytes,
) -> Result<(StatusCode, Json<User>), ApiError>
where
  S: Backend,
  I: IdentityProvider,
{
  let body: SignUpBody = json_body(&body)?;
  let issues = body.issues();
  if !issues.is_empty() {
    return Err(ApiError::Validation(issues));
  }

  let user = state
    .store
    .create_user(NewUser {
      email:         body.email,
      name:          body.name.trim().to_owned(),
      password_hash: hash_password(&body.password)?,
    })
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(user)))
}

/// `POST /auth/sign-in`. An unknown email and a wrong password are
/// indistinguishable.
pub async fn sign_in<S, I>(
  State(state): State<AppState<S, I>>,
  body: Bytes,
) -> Result<Json<SignInResponse>, ApiError>
where
  S: Backend,
  I: IdentityProvider,
{
  let body: SignInBody = json_body(&body)?;

  let creds = state
    .store
    .find_credentials(body.email)
    .await
    .map_err(ApiError::from_store)?
    .ok_or(ApiError::Unauthorized)?;
  if !verify_password(&body.password, &creds.password_hash) {
    return Err(ApiError::Unauthorized);
  }

  let token = generate_token();
  let expires_at = Utc::now()
    .checked_add_signed(Duration::hours(i64::from(state.config.session_ttl_hours)))
    .ok_or_else(|| ApiError::Internal("session expiry out of range".to_owned()))?;
  state
    .store
    .create_session(creds.user.id, hash_token(&token), expires_at)
    .await
    .map_err(ApiError::from_store)?;
  tracing::info!(user = %creds.user.id, "session created");

  Ok(Json(SignInResponse { token, expires_at, user: creds.user }))
}

/// `POST /auth/sign-out`. Revokes the presented token.
pub async fn sign_out<S, I>(
  State(state): State<AppState<S, I>>,
  Caller(user): Caller,
  headers: HeaderMap,
) -> Result<StatusCode, ApiError>
where
  S: Backend,
  I: IdentityProvider,
{
  if let Some(token) = bearer_token(&headers) {
    state
      .store
      .delete_session(hash_token(token))
      .await
      .map_err(ApiError::from_store)?;
    tracing::info!(%user, "session revoked");
  }
  Ok(StatusCode::NO_CONTENT)
}
