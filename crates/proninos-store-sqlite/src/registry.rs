//! Resolution of [`EntityRef`]s to tables.

use proninos_core::entity::{EntityKind, EntityRef};
use rusqlite::{Connection, OptionalExtension as _};

use crate::{Error, Result, encode::encode_uuid};

/// `(table, primary key column)` holding records of `kind`.
pub fn locate(kind: EntityKind) -> (&'static str, &'static str) {
  match kind {
    EntityKind::AcademicDegree => ("academic_degrees", "degree_id"),
    EntityKind::CourtesyTitle => ("courtesy_titles", "title_id"),
    EntityKind::Person => ("people", "person_id"),
    EntityKind::Institution => ("institutions", "institution_id"),
    EntityKind::Friend => ("friends", "friend_id"),
    EntityKind::Contact => ("contacts", "contact_id"),
    EntityKind::ContactMethod => ("contact_methods", "method_id"),
    EntityKind::Address => ("addresses", "address_id"),
    EntityKind::OfficialAddress => ("official_addresses", "official_address_id"),
    EntityKind::Contribution => ("contributions", "contribution_id"),
  }
}

pub fn exists(conn: &Connection, target: EntityRef) -> Result<bool> {
  let (table, id) = locate(target.kind);
  let found = conn
    .query_row(
      &format!("SELECT 1 FROM {table} WHERE {id} = ?1"),
      rusqlite::params![encode_uuid(target.id)],
      |_| Ok(()),
    )
    .optional()?;
  Ok(found.is_some())
}

/// Fail with `NotFound` unless `target` exists.
pub fn require(conn: &Connection, target: EntityRef) -> Result<()> {
  if exists(conn, target)? {
    Ok(())
  } else {
    Err(Error::not_found(target.kind, target.id))
  }
}

/// Fail with `DanglingAttachment` if an attachment points nowhere.
pub fn ensure_attachable(conn: &Connection, target: Option<EntityRef>) -> Result<()> {
  match target {
    Some(t) if !exists(conn, t)? => Err(Error::DanglingAttachment(t)),
    _ => Ok(()),
  }
}
