//! The store traits.
//!
//! Implemented by storage backends (e.g. `carebook-store-sqlite`). The RPC
//! layer depends on these abstractions, not on any concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
  error::StoreError,
  schema::{Owned, RecordKind},
  user::{Credentials, NewUser, ProfilePatch, Session, User, UserId},
};

// ─── Records ─────────────────────────────────────────────────────────────────

/// Owner-scoped persistence for every [`RecordKind`].
///
/// Every method takes the owner explicitly and constrains every statement by
/// it. A record owned by someone else is indistinguishable from a record that
/// does not exist: both produce an error whose class is
/// [`ErrorClass::NotFound`](crate::ErrorClass::NotFound).
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait RecordStore: Send + Sync {
  type Error: StoreError;

  /// All records of kind `K` owned by `owner`, in `K::ORDER`.
  fn list<K: RecordKind>(
    &self,
    owner: UserId,
  ) -> impl Future<Output = Result<Vec<Owned<K>>, Self::Error>> + Send + '_;

  /// Persist a new record for `owner`. The id and timestamps are generated
  /// by the store; server-assigned fields take their declared values.
  fn create<K: RecordKind>(
    &self,
    owner: UserId,
    input: K::New,
  ) -> impl Future<Output = Result<Owned<K>, Self::Error>> + Send + '_;

  /// Apply `patch` to the record `id` if and only if it belongs to `owner`.
  fn update<K: RecordKind>(
    &self,
    owner: UserId,
    id: Uuid,
    patch: K::Patch,
  ) -> impl Future<Output = Result<Owned<K>, Self::Error>> + Send + '_;

  /// Permanently remove the record `id` if and only if it belongs to
  /// `owner`, returning it as it was.
  fn delete<K: RecordKind>(
    &self,
    owner: UserId,
    id: Uuid,
  ) -> impl Future<Output = Result<Owned<K>, Self::Error>> + Send + '_;

  // ── Profile ───────────────────────────────────────────────────────────

  fn get_profile(
    &self,
    user: UserId,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Patch the profile columns of `user`'s own row.
  fn update_profile(
    &self,
    user: UserId,
    patch: ProfilePatch,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;
}

// ─── Accounts ────────────────────────────────────────────────────────────────

/// Users and bearer-token sessions.
pub trait AccountStore: Send + Sync {
  type Error: StoreError;

  /// Create a user. Fails with a conflict if the email is taken.
  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Look up a user and their password hash by email (case-insensitive).
  fn find_credentials(
    &self,
    email: String,
  ) -> impl Future<Output = Result<Option<Credentials>, Self::Error>> + Send + '_;

  fn create_session(
    &self,
    user: UserId,
    token_hash: String,
    expires_at: DateTime<Utc>,
  ) -> impl Future<Output = Result<Session, Self::Error>> + Send + '_;

  /// The owner of an unexpired session with this token digest, if any.
  fn resolve_session(
    &self,
    token_hash: String,
    now: DateTime<Utc>,
  ) -> impl Future<Output = Result<Option<UserId>, Self::Error>> + Send + '_;

  /// Remove a session. Returns `false` if none matched.
  fn delete_session(
    &self,
    token_hash: String,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
