//! Error type for `proninos-store-sqlite`.

use proninos_core::entity::{EntityKind, EntityRef};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Core(#[from] proninos_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("sqlite error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A stored column held a value outside its enum.
  #[error("cannot decode {column}: {value:?}")]
  Decode { column: &'static str, value: String },

  #[error("{kind} not found: {id}")]
  NotFound { kind: EntityKind, id: Uuid },

  #[error("{field} {value:?} is already used by another record")]
  DuplicateLabel { field: &'static str, value: String },

  #[error("friend code {0:?} is already taken")]
  DuplicateCode(String),

  #[error("{party} already backs friend {friend}")]
  PartyAlreadyLinked { party: EntityRef, friend: Uuid },

  #[error("attachment target {0} does not exist")]
  DanglingAttachment(EntityRef),
}

impl Error {
  pub(crate) fn not_found(kind: EntityKind, id: Uuid) -> Self { Self::NotFound { kind, id } }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
