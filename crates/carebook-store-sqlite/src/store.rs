//! [`SqliteStore`], the SQLite implementation of [`RecordStore`] and
//! [`AccountStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension as _, params_from_iter, types::Value as SqlValue};
use uuid::Uuid;

use carebook_core::{
  Owned, RecordKind, UserId,
  schema::{Field, Presence, to_object},
  store::{AccountStore, RecordStore},
  user::{Credentials, NewUser, PROFILE_FIELDS, ProfilePatch, Session, User},
};

use crate::{
  Error, Result,
  encode::{
    RawCredentials, RawRecord, RawUser, USER_COLUMNS, encode_dt, encode_field,
    encode_uuid, order_clause, placeholders, select_list,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Carebook store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a statement expected to return at most one owned-record row.
  async fn record_row(
    &self,
    sql: String,
    params: Vec<SqlValue>,
    n_fields: usize,
  ) -> Result<Option<RawRecord>> {
    let raw = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, params_from_iter(params), |row| {
              RawRecord::from_row(row, n_fields)
            })
            .optional()?,
        )
      })
      .await?;
    Ok(raw)
  }

  /// Run a statement expected to return at most one `users` row.
  async fn user_row(&self, sql: String, params: Vec<SqlValue>) -> Result<Option<User>> {
    let raw = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, params_from_iter(params), RawUser::from_row)
            .optional()?,
        )
      })
      .await?;
    raw.map(RawUser::into_user).transpose()
  }
}

/// Build the `SET` assignments for a patch serialised to a JSON object.
///
/// Only keys present in the object are assigned; `updated_at` is always
/// refreshed. Returns the SQL fragment and its parameters in order.
fn set_clause(
  fields: &[Field],
  patch: &serde_json::Map<String, serde_json::Value>,
  now: DateTime<Utc>,
) -> Result<(String, Vec<SqlValue>)> {
  let mut assignments = vec!["updated_at = ?".to_owned()];
  let mut params = vec![SqlValue::Text(encode_dt(now))];

  for field in fields {
    if let Some(value) = patch.get(field.name) {
      assignments.push(format!("{} = ?", field.column));
      params.push(encode_field(field, value)?);
    }
  }

  Ok((assignments.join(", "), params))
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for SqliteStore {
  type Error = Error;

  async fn list<K: RecordKind>(&self, owner: UserId) -> Result<Vec<Owned<K>>> {
    let sql = format!(
      "SELECT {} FROM {} WHERE owner_id = ?1 {}",
      select_list(K::FIELDS),
      K::TABLE,
      order_clause(K::ORDER),
    );
    let owner_str = encode_uuid(owner.0);
    let n_fields = K::FIELDS.len();

    let raws: Vec<RawRecord> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![owner_str], |row| {
            RawRecord::from_row(row, n_fields)
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRecord::into_owned::<K>).collect()
  }

  async fn create<K: RecordKind>(&self, owner: UserId, input: K::New) -> Result<Owned<K>> {
    let values = to_object(&input)?;
    let now = encode_dt(Utc::now());

    let mut params = vec![
      SqlValue::Text(encode_uuid(Uuid::new_v4())),
      SqlValue::Text(encode_uuid(owner.0)),
      SqlValue::Text(now.clone()),
      SqlValue::Text(now),
    ];
    for field in K::FIELDS {
      let value = match field.presence {
        Presence::Assigned(initial) => SqlValue::Text(initial.to_owned()),
        _ => encode_field(field, values.get(field.name).unwrap_or(&serde_json::Value::Null))?,
      };
      params.push(value);
    }

    let columns = select_list(K::FIELDS);
    let sql = format!(
      "INSERT INTO {} ({columns}) VALUES ({}) RETURNING {columns}",
      K::TABLE,
      placeholders(params.len()),
    );

    let raw = self
      .record_row(sql, params, K::FIELDS.len())
      .await?
      .ok_or(Error::NotFound)?;
    let record = raw.into_owned::<K>()?;
    tracing::debug!(kind = K::NAME, id = %record.id, "record created");
    Ok(record)
  }

  async fn update<K: RecordKind>(
    &self,
    owner: UserId,
    id: Uuid,
    patch: K::Patch,
  ) -> Result<Owned<K>> {
    let patch = to_object(&patch)?;
    let (assignments, mut params) = set_clause(K::FIELDS, &patch, Utc::now())?;
    params.push(SqlValue::Text(encode_uuid(id)));
    params.push(SqlValue::Text(encode_uuid(owner.0)));

    let sql = format!(
      "UPDATE {} SET {assignments} WHERE id = ? AND owner_id = ? RETURNING {}",
      K::TABLE,
      select_list(K::FIELDS),
    );

    self
      .record_row(sql, params, K::FIELDS.len())
      .await?
      .ok_or(Error::NotFound)?
      .into_owned::<K>()
  }

  async fn delete<K: RecordKind>(&self, owner: UserId, id: Uuid) -> Result<Owned<K>> {
    let sql = format!(
      "DELETE FROM {} WHERE id = ? AND owner_id = ? RETURNING {}",
      K::TABLE,
      select_list(K::FIELDS),
    );
    let params = vec![
      SqlValue::Text(encode_uuid(id)),
      SqlValue::Text(encode_uuid(owner.0)),
    ];

    let record = self
      .record_row(sql, params, K::FIELDS.len())
      .await?
      .ok_or(Error::NotFound)?
      .into_owned::<K>()?;
    tracing::debug!(kind = K::NAME, %id, "record deleted");
    Ok(record)
  }

  // ── Profile ───────────────────────────────────────────────────────────────

  async fn get_profile(&self, user: UserId) -> Result<User> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
    self
      .user_row(sql, vec![SqlValue::Text(encode_uuid(user.0))])
      .await?
      .ok_or(Error::NotFound)
  }

  async fn update_profile(&self, user: UserId, patch: ProfilePatch) -> Result<User> {
    let patch = to_object(&patch)?;
    let (assignments, mut params) = set_clause(PROFILE_FIELDS, &patch, Utc::now())?;
    params.push(SqlValue::Text(encode_uuid(user.0)));

    let sql =
      format!("UPDATE users SET {assignments} WHERE id = ? RETURNING {USER_COLUMNS}");
    self.user_row(sql, params).await?.ok_or(Error::NotFound)
  }
}

// ─── AccountStore impl ───────────────────────────────────────────────────────

impl AccountStore for SqliteStore {
  type Error = Error;

  async fn create_user(&self, input: NewUser) -> Result<User> {
    let now = encode_dt(Utc::now());
    let sql = format!(
      "INSERT INTO users (id, email, name, password_hash, created_at, updated_at)
       VALUES (?, ?, ?, ?, ?, ?)
       RETURNING {USER_COLUMNS}"
    );
    let params = vec![
      SqlValue::Text(encode_uuid(Uuid::new_v4())),
      SqlValue::Text(input.email.trim().to_lowercase()),
      SqlValue::Text(input.name),
      SqlValue::Text(input.password_hash),
      SqlValue::Text(now.clone()),
      SqlValue::Text(now),
    ];

    let user = self.user_row(sql, params).await?.ok_or(Error::NotFound)?;
    tracing::info!(user = %user.id, "user created");
    Ok(user)
  }

  async fn find_credentials(&self, email: String) -> Result<Option<Credentials>> {
    let email = email.trim().to_lowercase();
    let sql = format!("SELECT {USER_COLUMNS}, password_hash FROM users WHERE email = ?1");

    let raw: Option<RawCredentials> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![email], RawCredentials::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawCredentials::into_credentials).transpose()
  }

  async fn create_session(
    &self,
    user: UserId,
    token_hash: String,
    expires_at: DateTime<Utc>,
  ) -> Result<Session> {
    let session = Session {
      session_id: Uuid::new_v4(),
      user_id: user,
      created_at: Utc::now(),
      expires_at,
    };

    let id_str      = encode_uuid(session.session_id);
    let user_str    = encode_uuid(user.0);
    let created_str = encode_dt(session.created_at);
    let expires_str = encode_dt(expires_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO sessions (id, user_id, token_hash, created_at, expires_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, user_str, token_hash, created_str, expires_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(session)
  }

  async fn resolve_session(
    &self,
    token_hash: String,
    now: DateTime<Utc>,
  ) -> Result<Option<UserId>> {
    let now_str = encode_dt(now);

    let user_str: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT user_id FROM sessions WHERE token_hash = ?1 AND expires_at > ?2",
              rusqlite::params![token_hash, now_str],
              |r| r.get(0),
            )
            .optional()?,
        )
      })
      .await?;

    user_str
      .map(|s| Uuid::parse_str(&s).map(UserId))
      .transpose()
      .map_err(Error::Uuid)
  }

  async fn delete_session(&self, token_hash: String) -> Result<bool> {
    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM sessions WHERE token_hash = ?1",
          rusqlite::params![token_hash],
        )?)
      })
      .await?;
    Ok(removed > 0)
  }
}
