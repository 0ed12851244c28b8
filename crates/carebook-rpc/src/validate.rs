//! Input validation against a kind's declared [`Field`] list.
//!
//! Validation runs over the raw JSON before typed deserialisation so that
//! every offending field is reported at once, with its path. Keys not
//! declared for the kind (an `ownerId`, say) are stripped, never rejected.

use carebook_core::schema::{Field, FieldType, Presence, parse_date};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::ApiError;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
  /// The offending key, or `""` for the input as a whole.
  pub path:    String,
  pub message: String,
}

impl Issue {
  fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
    Self { path: path.into(), message: message.into() }
  }
}

// ─── Entry points ────────────────────────────────────────────────────────────

/// Validate a create input and deserialise it.
pub fn create_input<T: DeserializeOwned>(fields: &[Field], body: &[u8]) -> Result<T, ApiError> {
  let obj = parse_object(body)?;
  let kept = check_create(fields, &obj).map_err(ApiError::Validation)?;
  into_typed(kept)
}

/// Validate an update input (`{ id, ...patch }`) and deserialise the patch.
pub fn update_input<P: DeserializeOwned>(
  fields: &[Field],
  body: &[u8],
) -> Result<(Uuid, P), ApiError> {
  let obj = parse_object(body)?;

  let mut issues = Vec::new();
  let id = match obj.get("id") {
    None | Some(Value::Null) => {
      issues.push(Issue::new("id", "required"));
      None
    }
    Some(v) => parse_uuid(v).map_err(|m| issues.push(Issue::new("id", m))).ok(),
  };

  let kept = match check_patch(fields, &obj) {
    Ok(kept) => Some(kept),
    Err(more) => {
      issues.extend(more);
      None
    }
  };

  match (id, kept) {
    (Some(id), Some(kept)) if issues.is_empty() => Ok((id, into_typed(kept)?)),
    _ => Err(ApiError::Validation(issues)),
  }
}

/// Validate a patch that targets an implicit row (the caller's profile).
pub fn patch_input<P: DeserializeOwned>(fields: &[Field], body: &[u8]) -> Result<P, ApiError> {
  let obj = parse_object(body)?;
  let kept = check_patch(fields, &obj).map_err(ApiError::Validation)?;
  into_typed(kept)
}

/// Validate a bare identifier: a JSON string holding a UUID.
pub fn id_input(body: &[u8]) -> Result<Uuid, ApiError> {
  let value = parse_json(body)?;
  parse_uuid(&value).map_err(|m| ApiError::Validation(vec![Issue::new("", m)]))
}

/// Deserialise an arbitrary JSON body, reporting serde's message on failure.
pub fn json_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
  serde_json::from_slice(body)
    .map_err(|e| ApiError::Validation(vec![Issue::new("", e.to_string())]))
}

// ─── Checks ──────────────────────────────────────────────────────────────────

fn check_create(fields: &[Field], obj: &Map<String, Value>) -> Result<Map<String, Value>, Vec<Issue>> {
  let mut kept = Map::new();
  let mut issues = Vec::new();

  for field in fields {
    let value = obj.get(field.name);
    match (field.presence, value) {
      // Written by the server; whatever the caller sent is dropped.
      (Presence::Assigned(_), _) => {}
      (Presence::Required, None | Some(Value::Null)) => {
        issues.push(Issue::new(field.name, "required"));
      }
      (Presence::Optional, None | Some(Value::Null)) | (Presence::Defaulted, None) => {}
      (Presence::Defaulted, Some(Value::Null)) => {
        issues.push(Issue::new(field.name, "cannot be null"));
      }
      (_, Some(v)) => match check_type(field.ty, v) {
        Ok(()) => {
          kept.insert(field.name.to_owned(), v.clone());
        }
        Err(m) => issues.push(Issue::new(field.name, m)),
      },
    }
  }

  if issues.is_empty() { Ok(kept) } else { Err(issues) }
}

fn check_patch(fields: &[Field], obj: &Map<String, Value>) -> Result<Map<String, Value>, Vec<Issue>> {
  let mut kept = Map::new();
  let mut issues = Vec::new();

  for field in fields {
    match obj.get(field.name) {
      None => {}
      Some(Value::Null) if field.nullable() => {
        kept.insert(field.name.to_owned(), Value::Null);
      }
      Some(Value::Null) => issues.push(Issue::new(field.name, "cannot be cleared")),
      Some(v) => match check_type(field.ty, v) {
        Ok(()) => {
          kept.insert(field.name.to_owned(), v.clone());
        }
        Err(m) => issues.push(Issue::new(field.name, m)),
      },
    }
  }

  if issues.is_empty() { Ok(kept) } else { Err(issues) }
}

fn check_type(ty: FieldType, value: &Value) -> Result<(), &'static str> {
  let ok = match ty {
    FieldType::Text => value.is_string(),
    FieldType::Date => value
      .as_str()
      .is_some_and(|s| parse_date(s).is_some()),
    FieldType::Bool => value.is_boolean(),
    FieldType::Integer => value.as_u64().is_some_and(|n| n <= u64::from(u32::MAX)),
  };
  if ok {
    return Ok(());
  }
  Err(match ty {
    FieldType::Text => "expected a string",
    FieldType::Date => "expected a date (YYYY-MM-DD)",
    FieldType::Bool => "expected a boolean",
    FieldType::Integer => "expected a non-negative integer",
  })
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn parse_json(body: &[u8]) -> Result<Value, ApiError> {
  serde_json::from_slice(body).map_err(|e| {
    ApiError::Validation(vec![Issue::new("", format!("invalid JSON: {e}"))])
  })
}

fn parse_object(body: &[u8]) -> Result<Map<String, Value>, ApiError> {
  match parse_json(body)? {
    Value::Object(obj) => Ok(obj),
    _ => Err(ApiError::Validation(vec![Issue::new("", "expected an object")])),
  }
}

fn parse_uuid(value: &Value) -> Result<Uuid, &'static str> {
  value
    .as_str()
    .and_then(|s| Uuid::parse_str(s).ok())
    .ok_or("expected a UUID string")
}

fn into_typed<T: DeserializeOwned>(kept: Map<String, Value>) -> Result<T, ApiError> {
  serde_json::from_value(Value::Object(kept))
    .map_err(|e| ApiError::Validation(vec![Issue::new("", e.to_string())]))
}
