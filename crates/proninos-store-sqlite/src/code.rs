//! Friend code synthesis.

use std::collections::HashSet;

use proninos_core::{
  code::{candidates, institution_seed, person_seed},
  friend::FriendParty,
};
use rusqlite::{Connection, OptionalExtension as _};
use tracing::debug;

use crate::{Result, party};

/// The two-letter seed for `party`'s code.
pub fn seed_for(conn: &Connection, party: FriendParty) -> Result<String> {
  let seed = match party {
    FriendParty::Person(id) => {
      let person = party::require_person(conn, id)?;
      person_seed(&person.name, &person.last_name)?
    }
    FriendParty::Institution(id) => {
      let institution = party::require_institution(conn, id)?;
      institution_seed(&institution.name)?
    }
  };
  Ok(seed)
}

pub fn is_taken(conn: &Connection, code: &str) -> Result<bool> {
  let found = conn
    .query_row(
      "SELECT 1 FROM friends WHERE code = ?1",
      rusqlite::params![code],
      |_| Ok(()),
    )
    .optional()?;
  Ok(found.is_some())
}

/// The first free code for `party`.
///
/// Fails with `CodeSpaceExhausted` when every candidate for the seed is
/// taken. The caller still relies on the UNIQUE index on `friends.code` when
/// inserting.
pub fn synthesize(conn: &Connection, party: FriendParty) -> Result<String> {
  let seed = seed_for(conn, party)?;

  // Seeds are ASCII letters and digits, so no LIKE escaping is needed.
  let mut stmt = conn.prepare("SELECT code FROM friends WHERE code LIKE ?1 || '%'")?;
  let taken = stmt
    .query_map(rusqlite::params![seed], |r| r.get::<_, String>(0))?
    .collect::<rusqlite::Result<HashSet<_>>>()?;

  let code = candidates(&seed)
    .find(|c| !taken.contains(c))
    .ok_or_else(|| proninos_core::Error::CodeSpaceExhausted(seed.clone()))?;
  debug!(%seed, %code, taken = taken.len(), "synthesised friend code");
  Ok(code)
}
