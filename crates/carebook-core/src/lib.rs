//! Core types and trait definitions for Carebook.
//!
//! Free of HTTP and database dependencies; every other crate depends on it.

pub mod error;
pub mod patch;
pub mod record;
pub mod schema;
pub mod store;
pub mod user;

pub use error::{Error, ErrorClass, Result, StoreError};
pub use patch::Patch;
pub use schema::{Owned, RecordKind};
pub use user::UserId;
