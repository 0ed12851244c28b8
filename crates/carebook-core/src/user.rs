//! Users, their embedded medical profile, and login sessions.
//!
//! The profile has no lifecycle of its own: its fields are columns of the
//! user row and are only ever patched in place.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  patch::Patch,
  schema::{Field, FieldType},
};

/// The identity every owned record is scoped to.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl UserId {
  pub fn new() -> Self { Self(Uuid::new_v4()) }
}

impl Default for UserId {
  fn default() -> Self { Self::new() }
}

impl fmt::Display for UserId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

// ─── Profile ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
  pub date_of_birth: Option<NaiveDate>,
  pub gender:        Option<String>,
  pub blood_group:   Option<String>,
  pub phone:         Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
  #[serde(default, skip_serializing_if = "Patch::is_keep")]
  pub date_of_birth: Patch<NaiveDate>,
  #[serde(default, skip_serializing_if = "Patch::is_keep")]
  pub gender:        Patch<String>,
  #[serde(default, skip_serializing_if = "Patch::is_keep")]
  pub blood_group:   Patch<String>,
  #[serde(default, skip_serializing_if = "Patch::is_keep")]
  pub phone:         Patch<String>,
}

pub const PROFILE_FIELDS: &[Field] = &[
  Field::optional("dateOfBirth", "date_of_birth", FieldType::Date),
  Field::optional("gender", "gender", FieldType::Text),
  Field::optional("bloodGroup", "blood_group", FieldType::Text),
  Field::optional("phone", "phone", FieldType::Text),
];

// ─── User ────────────────────────────────────────────────────────────────────

/// The public view of a user. The password hash never leaves the store
/// except inside [`Credentials`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
  pub id:         UserId,
  pub email:      String,
  pub name:       String,
  #[serde(flatten)]
  pub profile:    Profile,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Input to [`crate::store::AccountStore::create_user`].
#[derive(Debug, Clone)]
pub struct NewUser {
  /// Stored lowercased; uniqueness is case-insensitive.
  pub email:         String,
  pub name:          String,
  /// Argon2 PHC string.
  pub password_hash: String,
}

/// A user together with their password hash, for sign-in verification.
#[derive(Debug, Clone)]
pub struct Credentials {
  pub user:          User,
  pub password_hash: String,
}

// ─── Session ─────────────────────────────────────────────────────────────────

/// A bearer-token session. Only the SHA-256 digest of the token is stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
  pub session_id: Uuid,
  pub user_id:    UserId,
  pub created_at: DateTime<Utc>,
  pub expires_at: DateTime<Utc>,
}
