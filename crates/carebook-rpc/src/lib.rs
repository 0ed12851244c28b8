//! Authenticated RPC surface for Carebook.
//!
//! Exposes an axum [`Router`] with one procedure per record verb, the
//! caller's medical profile, and the account endpoints, backed by any store
//! implementing both [`RecordStore`] and [`AccountStore`].
//!
//! Queries are `GET /rpc/<procedure>`; mutations are `POST /rpc/<procedure>`
//! with the raw JSON input as the body.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod validate;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use carebook_core::{
  record::{
    Allergy, Appointment, ChronicCondition, CurrentMedication, Insurance, MedicalRecord,
    Prescription,
  },
  store::{AccountStore, RecordStore},
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::IdentityProvider;
use handlers::{account, profile, records};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `carebook.toml` and
/// `CAREBOOK_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:              String,
  pub port:              u16,
  pub store_path:        PathBuf,
  /// Lifetime of a sign-in session, `1..=MAX_SESSION_TTL_HOURS`.
  pub session_ttl_hours: u32,
}

/// Ten years.
pub const MAX_SESSION_TTL_HOURS: u32 = 24 * 365 * 10;

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:              "127.0.0.1".to_string(),
      port:              8080,
      store_path:        PathBuf::from("~/.local/share/carebook/carebook.db"),
      session_ttl_hours: 168,
    }
  }
}

impl ServerConfig {
  /// Reject settings the server cannot run with.
  pub fn validate(&self) -> anyhow::Result<()> {
    anyhow::ensure!(
      (1..=MAX_SESSION_TTL_HOURS).contains(&self.session_ttl_hours),
      "session_ttl_hours must be between 1 and {MAX_SESSION_TTL_HOURS}, got {}",
      self.session_ttl_hours,
    );
    Ok(())
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Everything a storage backend must provide.
pub trait Backend: RecordStore + AccountStore + 'static {}

impl<T: RecordStore + AccountStore + 'static> Backend for T {}

/// Shared state threaded through all axum handlers.
pub struct AppState<S, I> {
  pub store:    Arc<S>,
  pub identity: Arc<I>,
  pub config:   Arc<ServerConfig>,
}

impl<S, I> Clone for AppState<S, I> {
  fn clone(&self) -> Self {
    Self {
      store:    Arc::clone(&self.store),
      identity: Arc::clone(&self.identity),
      config:   Arc::clone(&self.config),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router.
pub fn router<S, I>(state: AppState<S, I>) -> Router
where
  S: Backend,
  I: IdentityProvider,
{
  Router::new()
    .nest("/rpc", rpc_routes::<S, I>())
    .nest("/auth", auth_routes::<S, I>())
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

fn rpc_routes<S, I>() -> Router<AppState<S, I>>
where
  S: Backend,
  I: IdentityProvider,
{
  let router = Router::new()
    .route("/getMedicalProfile", get(profile::get::<S, I>))
    .route("/updateMedicalProfile", post(profile::update::<S, I>));

  let router = records::routes::<ChronicCondition, S, I>(router);
  let router = records::routes::<Allergy, S, I>(router);
  let router = records::routes::<CurrentMedication, S, I>(router);
  let router = records::routes::<Insurance, S, I>(router);
  let router = records::routes::<Appointment, S, I>(router);
  let router = records::routes::<MedicalRecord, S, I>(router);
  records::routes::<Prescription, S, I>(router)
}

fn auth_routes<S, I>() -> Router<AppState<S, I>>
where
  S: Backend,
  I: IdentityProvider,
{
  Router::new()
    .route("/sign-up", post(account::sign_up::<S, I>))
    .route("/sign-in", post(account::sign_in::<S, I>))
    .route("/sign-out", post(account::sign_out::<S, I>))
}

// ─── Integration tests ────────────────────────────────────────────────────────
