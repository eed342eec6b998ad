//! Typed references used for polymorphic attachment.
//!
//! An address can be attached to any record in the registry. Instead of an
//! untyped `(table, id)` pair, the attachment is an [`EntityRef`]: a closed
//! [`EntityKind`] plus the record's UUID. The kind renders as a stable
//! snake_case discriminator that storage backends persist verbatim.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use uuid::Uuid;

use crate::{Error, Result};

/// Every kind of record in the registry; any of them may carry an address.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
  EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EntityKind {
  AcademicDegree,
  CourtesyTitle,
  Person,
  Institution,
  Friend,
  Contact,
  ContactMethod,
  Address,
  OfficialAddress,
  Contribution,
}

impl EntityKind {
  /// Parse a stored discriminator.
  pub fn parse(s: &str) -> Result<Self> {
    Self::from_str(s).map_err(|_| Error::UnknownEntityKind(s.to_owned()))
  }
}

/// A typed pointer to one record of a given kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
  pub kind: EntityKind,
  pub id:   Uuid,
}

impl EntityRef {
  pub fn new(kind: EntityKind, id: Uuid) -> Self { Self { kind, id } }
}

impl fmt::Display for EntityRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}:{}", self.kind, self.id)
  }
}

#[cfg(test)]
mod tests {
  use strum::IntoEnumIterator;

  use super::*;

  #[test]
  fn discriminators_are_snake_case() {
    assert_eq!(EntityKind::OfficialAddress.to_string(), "official_address");
    assert_eq!(EntityKind::Person.as_ref(), "person");
  }

  #[test]
  fn every_kind_parses_back() {
    for kind in EntityKind::iter() {
      assert_eq!(EntityKind::parse(kind.as_ref()).unwrap(), kind);
    }
  }

  #[test]
  fn unknown_kind_is_an_error() {
    assert!(matches!(
      EntityKind::parse("campaign"),
      Err(Error::UnknownEntityKind(k)) if k == "campaign"
    ));
  }

  #[test]
  fn serde_matches_strum() {
    let json = serde_json::to_string(&EntityKind::OfficialAddress).unwrap();
    assert_eq!(json, "\"official_address\"");
  }
}
