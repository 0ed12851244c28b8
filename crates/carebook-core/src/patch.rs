//! [`Patch`]: a three-state value for partial updates.
//!
//! A plain `Option<T>` cannot tell "the caller did not mention this field"
//! apart from "the caller wants this field emptied". On the wire the two are
//! an absent key and an explicit `null`; `Patch` keeps them distinct.
//!
//! Fields of type `Patch<T>` must be annotated with
//! `#[serde(default, skip_serializing_if = "Patch::is_keep")]` so that an
//! absent key deserialises to [`Patch::Keep`] and serialises back to an
//! absent key.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
  /// Field omitted: leave the stored value untouched.
  Keep,
  /// Field sent as `null`: store NULL.
  Clear,
  /// Field sent with a value: overwrite.
  Set(T),
}

impl<T> Default for Patch<T> {
  fn default() -> Self { Self::Keep }
}

impl<T> Patch<T> {
  pub fn is_keep(&self) -> bool { matches!(self, Self::Keep) }
}

impl<T: Serialize> Serialize for Patch<T> {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    match self {
      // Only reachable when the field is missing `skip_serializing_if`.
      Self::Keep | Self::Clear => serializer.serialize_none(),
      Self::Set(v) => serializer.serialize_some(v),
    }
  }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    Ok(match Option::<T>::deserialize(deserializer)? {
      Some(v) => Self::Set(v),
      None => Self::Clear,
    })
  }
}
