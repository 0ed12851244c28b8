//! Caller identity: the injected [`IdentityProvider`] capability, the
//! bearer-session implementation, and the [`Caller`] extractor.

use std::{future::Future, sync::Arc};

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD as B64;
use carebook_core::{UserId, store::AccountStore};
use chrono::Utc;
use rand_core::{OsRng, RngCore};
use sha2::{Digest, Sha256};

use crate::{AppState, Backend, error::ApiError};

// ─── Capability ──────────────────────────────────────────────────────────────

/// Resolves the identity behind a request, if any.
///
/// Resolution must be free of side effects; it runs once per operation and
/// its result is never cached across requests.
pub trait IdentityProvider: Send + Sync + 'static {
  fn resolve<'a>(
    &'a self,
    headers: &'a HeaderMap,
  ) -> impl Future<Output = Result<Option<UserId>, ApiError>> + Send + 'a;
}

/// Resolves `Authorization: Bearer <token>` against stored sessions.
pub struct SessionIdentity<S> {
  store: Arc<S>,
}

impl<S> SessionIdentity<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }
}

impl<S: AccountStore + 'static> IdentityProvider for SessionIdentity<S> {
  async fn resolve(&self, headers: &HeaderMap) -> Result<Option<UserId>, ApiError> {
    let Some(token) = bearer_token(headers) else {
      return Ok(None);
    };
    self
      .store
      .resolve_session(hash_token(token), Utc::now())
      .await
      .map_err(ApiError::from_store)
  }
}

// ─── Extractor ───────────────────────────────────────────────────────────────

/// The authenticated caller. Rejects with [`ApiError::Unauthorized`] before
/// the request body is read.
#[derive(Debug, Clone, Copy)]
pub struct Caller(pub UserId);

impl<S, I> FromRequestParts<AppState<S, I>> for Caller
where
  S: Backend,
  I: IdentityProvider,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S, I>,
  ) -> Result<Self, Self::Rejection> {
    state
      .identity
      .resolve(&parts.headers)
      .await?
      .map(Caller)
      .ok_or(ApiError::Unauthorized)
  }
}

// ─── Tokens ──────────────────────────────────────────────────────────────────

/// The token from an `Authorization: Bearer` header, if present.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
  headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.strip_prefix("Bearer "))
    .map(str::trim)
    .filter(|t| !t.is_empty())
}

/// A fresh 256-bit session token, base64url without padding.
pub fn generate_token() -> String {
  let mut bytes = [0u8; 32];
  OsRng.fill_bytes(&mut bytes);
  B64.encode(bytes)
}

/// Hex SHA-256 digest of a token; the only form in which tokens are stored.
pub fn hash_token(token: &str) -> String { hex::encode(Sha256::digest(token.as_bytes())) }

// ─── Passwords ───────────────────────────────────────────────────────────────

/// Argon2 PHC string for `password`.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|h| h.to_string())
    .map_err(|e| ApiError::Internal(format!("argon2 error: {e}")))
}

/// Whether `password` matches the PHC string `hash`. Malformed hashes never
/// match.
pub fn verify_password(password: &str, hash: &str) -> bool {
  PasswordHash::new(hash)
    .and_then(|parsed| Argon2::default().verify_password(password.as_bytes(), &parsed))
    .is_ok()
}
