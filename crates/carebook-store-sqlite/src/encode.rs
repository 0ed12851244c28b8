//! Encoding and decoding helpers between Rust domain types and the values
//! stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings with fixed microsecond
//! precision and a `Z` suffix, so that text ordering matches time ordering.
//! Dates are `YYYY-MM-DD`. Booleans are `0`/`1`. UUIDs are hyphenated
//! lowercase strings.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use carebook_core::{
  Owned, RecordKind, UserId,
  schema::{Direction, Field, FieldType, SortKey, parse_date},
  user::{Credentials, Profile, User},
};
use rusqlite::types::Value as SqlValue;
use serde_json::{Map, Number, Value};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  parse_date(s).ok_or_else(|| Error::DateParse(format!("{s:?} is not a YYYY-MM-DD date")))
}

// ─── Field values ────────────────────────────────────────────────────────────

/// Convert a JSON field value into the SQL value for its column.
pub fn encode_field(field: &Field, value: &Value) -> Result<SqlValue> {
  let mismatch = || Error::Column {
    column:  field.column,
    message: format!("cannot store {value} as {:?}", field.ty),
  };

  Ok(match (field.ty, value) {
    (_, Value::Null) => SqlValue::Null,
    (FieldType::Text, Value::String(s)) => SqlValue::Text(s.clone()),
    (FieldType::Date, Value::String(s)) => {
      // Normalise through NaiveDate so only valid dates reach the table.
      SqlValue::Text(decode_date(s)?.format("%Y-%m-%d").to_string())
    }
    (FieldType::Bool, Value::Bool(b)) => SqlValue::Integer(i64::from(*b)),
    (FieldType::Integer, Value::Number(n)) => {
      SqlValue::Integer(n.as_i64().ok_or_else(mismatch)?)
    }
    _ => return Err(mismatch()),
  })
}

/// Convert a stored SQL value back into the JSON value for its field.
pub fn decode_field(field: &Field, value: SqlValue) -> Result<Value> {
  Ok(match (field.ty, value) {
    (_, SqlValue::Null) => Value::Null,
    (FieldType::Text | FieldType::Date, SqlValue::Text(s)) => Value::String(s),
    (FieldType::Bool, SqlValue::Integer(i)) => Value::Bool(i != 0),
    (FieldType::Integer, SqlValue::Integer(i)) => Value::Number(Number::from(i)),
    (ty, other) => {
      return Err(Error::Column {
        column:  field.column,
        message: format!("unexpected {:?} for {ty:?}", other.data_type()),
      });
    }
  })
}

// ─── SQL fragments ───────────────────────────────────────────────────────────

/// Metadata columns shared by every owned-record table, in select order.
const META_COLUMNS: [&str; 4] = ["id", "owner_id", "created_at", "updated_at"];

/// `id, owner_id, created_at, updated_at, <field columns...>`
pub fn select_list(fields: &[Field]) -> String {
  META_COLUMNS
    .iter()
    .copied()
    .chain(fields.iter().map(|f| f.column))
    .collect::<Vec<_>>()
    .join(", ")
}

/// `ORDER BY` clause for `key`; rows with equal keys keep insertion order
/// in the same direction.
pub fn order_clause(key: SortKey) -> String {
  let dir = match key.direction {
    Direction::Ascending => "ASC",
    Direction::Descending => "DESC",
  };
  format!("ORDER BY {} {dir}, rowid {dir}", key.column)
}

/// `?, ?, ?` with `n` placeholders.
pub fn placeholders(n: usize) -> String { vec!["?"; n].join(", ") }

// ─── Row types ───────────────────────────────────────────────────────────────

/// Values read directly from an owned-record row, in [`select_list`] order.
pub struct RawRecord {
  pub id:         String,
  pub owner_id:   String,
  pub created_at: String,
  pub updated_at: String,
  pub values:     Vec<SqlValue>,
}

impl RawRecord {
  /// Row mapper for a select list built from `n_fields` field columns.
  pub fn from_row(row: &rusqlite::Row<'_>, n_fields: usize) -> rusqlite::Result<Self> {
    let values = (0..n_fields)
      .map(|i| row.get::<_, SqlValue>(META_COLUMNS.len() + i))
      .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(Self {
      id: row.get(0)?,
      owner_id: row.get(1)?,
      created_at: row.get(2)?,
      updated_at: row.get(3)?,
      values,
    })
  }

  pub fn into_owned<K: RecordKind>(self) -> Result<Owned<K>> {
    let mut obj = Map::with_capacity(K::FIELDS.len());
    for (field, value) in K::FIELDS.iter().zip(self.values) {
      obj.insert(field.name.to_owned(), decode_field(field, value)?);
    }

    Ok(Owned {
      id:         decode_uuid(&self.id)?,
      owner_id:   UserId(decode_uuid(&self.owner_id)?),
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
      record:     serde_json::from_value(Value::Object(obj))?,
    })
  }
}

/// Columns of the `users` table returned to callers, in [`RawUser`] order.
pub const USER_COLUMNS: &str = "id, email, name, date_of_birth, gender, \
                                blood_group, phone, created_at, updated_at";

/// Values read directly from a `users` row (without the password hash).
pub struct RawUser {
  pub id:            String,
  pub email:         String,
  pub name:          String,
  pub date_of_birth: Option<String>,
  pub gender:        Option<String>,
  pub blood_group:   Option<String>,
  pub phone:         Option<String>,
  pub created_at:    String,
  pub updated_at:    String,
}

impl RawUser {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:            row.get(0)?,
      email:         row.get(1)?,
      name:          row.get(2)?,
      date_of_birth: row.get(3)?,
      gender:        row.get(4)?,
      blood_group:   row.get(5)?,
      phone:         row.get(6)?,
      created_at:    row.get(7)?,
      updated_at:    row.get(8)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      id:         UserId(decode_uuid(&self.id)?),
      email:      self.email,
      name:       self.name,
      profile:    Profile {
        date_of_birth: self.date_of_birth.as_deref().map(decode_date).transpose()?,
        gender:        self.gender,
        blood_group:   self.blood_group,
        phone:         self.phone,
      },
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

/// A `users` row followed by its `password_hash` column.
pub struct RawCredentials {
  pub user:          RawUser,
  pub password_hash: String,
}

impl RawCredentials {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self { user: RawUser::from_row(row)?, password_hash: row.get(9)? })
  }

  pub fn into_credentials(self) -> Result<Credentials> {
    Ok(Credentials {
      user:          self.user.into_user()?,
      password_hash: self.password_hash,
    })
  }
}
