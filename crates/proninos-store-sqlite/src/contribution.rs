//! The contribution rows the registry reads.

use proninos_core::{
  contribution::{Contribution, NewContribution},
  entity::{EntityKind, EntityRef},
  validate::required,
};
use rusqlite::{Connection, OptionalExtension as _};
use uuid::Uuid;

use crate::{
  Result,
  encode::{decode_dt, decode_uuid, encode_dt, encode_uuid, now},
  registry,
};

const COLUMNS: &str = "contribution_id, friend_id, amount, success, created_at";

type RawContribution = (String, String, String, bool, String);

fn read(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawContribution> {
  Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
}

fn decode((id, friend_id, amount, success, created_at): RawContribution) -> Result<Contribution> {
  Ok(Contribution {
    contribution_id: decode_uuid(&id)?,
    friend_id: decode_uuid(&friend_id)?,
    amount,
    success,
    created_at: decode_dt(&created_at)?,
  })
}

pub fn insert(conn: &Connection, input: NewContribution) -> Result<Contribution> {
  let amount = required("amount", input.amount)?;
  registry::require(conn, EntityRef::new(EntityKind::Friend, input.friend_id))?;

  let id = Uuid::new_v4();
  // Round-trip through the stored form so the returned value matches a read.
  let created_at = decode_dt(&encode_dt(input.created_at.unwrap_or_else(now)))?;
  conn.execute(
    &format!("INSERT INTO contributions ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5)"),
    rusqlite::params![
      encode_uuid(id),
      encode_uuid(input.friend_id),
      amount,
      input.success,
      encode_dt(created_at),
    ],
  )?;
  Ok(Contribution {
    contribution_id: id,
    friend_id: input.friend_id,
    amount,
    success: input.success,
    created_at,
  })
}

/// The earliest successful contribution of `friend_id`.
pub fn first(conn: &Connection, friend_id: Uuid) -> Result<Option<Contribution>> {
  let raw = conn
    .query_row(
      &format!(
        "SELECT {COLUMNS} FROM contributions
         WHERE friend_id = ?1 AND success = 1
         ORDER BY created_at ASC, contribution_id ASC
         LIMIT 1"
      ),
      rusqlite::params![encode_uuid(friend_id)],
      read,
    )
    .optional()?;
  raw.map(decode).transpose()
}
