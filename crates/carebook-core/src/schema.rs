//! Field schemas and the [`RecordKind`] trait.
//!
//! Every owner-scoped record kind declares its columns once, as a static
//! slice of [`Field`]s. Input validation, SQL column lists and row decoding
//! are all driven from that one declaration, so the generic CRUD path never
//! needs kind-specific code.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::{Error, Result, user::UserId};

// ─── Fields ──────────────────────────────────────────────────────────────────

/// The storage and wire type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
  Text,
  /// Calendar date, `YYYY-MM-DD` on the wire and in the database.
  Date,
  Bool,
  /// Non-negative integer.
  Integer,
}

/// Parse a [`FieldType::Date`] value. Only `YYYY-MM-DD` with a four-digit
/// year is accepted, so stored dates order correctly as text.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
  let b = s.as_bytes();
  let shaped = b.len() == 10
    && b[4] == b'-'
    && b[7] == b'-'
    && b.iter().enumerate().all(|(i, c)| i == 4 || i == 7 || c.is_ascii_digit());
  if !shaped {
    return None;
  }
  NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// How a field behaves on create and on update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
  /// Must be supplied on create; can be changed but never cleared.
  Required,
  /// May be omitted or `null`; can be cleared on update.
  Optional,
  /// May be omitted on create, in which case the input type's serde default
  /// applies. Never cleared.
  Defaulted,
  /// Not accepted on create: the server writes the given value. Callers may
  /// override it on update.
  Assigned(&'static str),
}

/// One column of a record kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
  /// camelCase key used in JSON.
  pub name:     &'static str,
  /// snake_case column name.
  pub column:   &'static str,
  pub ty:       FieldType,
  pub presence: Presence,
}

impl Field {
  pub const fn required(name: &'static str, column: &'static str, ty: FieldType) -> Self {
    Self { name, column, ty, presence: Presence::Required }
  }

  pub const fn optional(name: &'static str, column: &'static str, ty: FieldType) -> Self {
    Self { name, column, ty, presence: Presence::Optional }
  }

  pub const fn defaulted(name: &'static str, column: &'static str, ty: FieldType) -> Self {
    Self { name, column, ty, presence: Presence::Defaulted }
  }

  pub const fn assigned(name: &'static str, column: &'static str, value: &'static str) -> Self {
    Self { name, column, ty: FieldType::Text, presence: Presence::Assigned(value) }
  }

  /// Whether the column accepts NULL.
  pub fn nullable(&self) -> bool { matches!(self.presence, Presence::Optional) }
}

// ─── Ordering ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
  Ascending,
  Descending,
}

/// Default ordering for a list operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
  pub column:    &'static str,
  pub direction: Direction,
}

impl SortKey {
  pub const fn asc(column: &'static str) -> Self {
    Self { column, direction: Direction::Ascending }
  }

  pub const fn desc(column: &'static str) -> Self {
    Self { column, direction: Direction::Descending }
  }
}

/// Newest first.
pub const NEWEST_FIRST: SortKey = SortKey::desc("created_at");

// ─── RecordKind ──────────────────────────────────────────────────────────────

/// A category of owner-scoped record.
///
/// `Self` is the domain payload as stored and returned; [`Self::New`] is the
/// validated create input and [`Self::Patch`] the validated update input.
/// All three serialise with camelCase keys matching [`Self::FIELDS`].
pub trait RecordKind:
  Serialize + DeserializeOwned + Clone + Send + Sync + 'static
{
  type New: Serialize + DeserializeOwned + Send + Sync + 'static;
  type Patch: Serialize + DeserializeOwned + Default + Send + Sync + 'static;

  /// Singular name used in procedure names, e.g. `Allergy`.
  const NAME: &'static str;
  /// Plural name used by the list procedure, e.g. `Allergies`.
  const PLURAL: &'static str;
  const TABLE: &'static str;
  const FIELDS: &'static [Field];
  const ORDER: SortKey;
}

// ─── Owned envelope ──────────────────────────────────────────────────────────

/// A persisted record together with its identity and ownership metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Owned<T> {
  pub id:         Uuid,
  pub owner_id:   UserId,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
  #[serde(flatten)]
  pub record:     T,
}

/// Serialise `value` and require the result to be a JSON object.
pub fn to_object<T: Serialize>(value: &T) -> Result<Map<String, Value>> {
  match serde_json::to_value(value)? {
    Value::Object(map) => Ok(map),
    _ => Err(Error::NotAnObject(std::any::type_name::<T>())),
  }
}
