//! Error types for `proninos-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  /// A required field is missing or a field has an invalid shape.
  #[error("invalid {field}: {message}")]
  Validation {
    field:   &'static str,
    message: String,
  },

  #[error("invalid RFC {0:?}: expected uppercase letters and digits, e.g. VECJ880326P76")]
  InvalidRfc(String),

  #[error("cannot derive a code seed from {0:?}")]
  CodeSeed(String),

  #[error("every code for seed {0:?} is already taken")]
  CodeSpaceExhausted(String),

  #[error("friend {friend} cannot be promoted by {promoter}: promoter chain would form a cycle")]
  PromoterCycle { friend: Uuid, promoter: Uuid },

  #[error("unknown entity kind: {0:?}")]
  UnknownEntityKind(String),
}

impl Error {
  pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
    Self::Validation { field, message: message.into() }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
