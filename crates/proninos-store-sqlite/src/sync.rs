//! Synchronization of denormalized values.
//!
//! Two values are copies of data that lives elsewhere: a person's
//! `search_field` (derived from their name and the catalog labels they
//! reference) and a friend's `name` (the party's display string). The store
//! calls into this module after every write that can change either, inside
//! the same transaction, so a failure here rolls the triggering write back.

use proninos_core::{
  friend::FriendParty,
  party::{Institution, Person},
  text::normalize,
};
use rusqlite::Connection;
use tracing::debug;
use uuid::Uuid;

use crate::{
  Result,
  catalog::CatalogTable,
  encode::{encode_dt, encode_uuid, now},
  party,
};

/// How many denormalized rows a cascade rewrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
  pub people:  usize,
  pub friends: usize,
}

/// Overwrite the cached name of the friend wrapping `party`. Returns whether
/// such a friend exists.
pub fn rename_friend(conn: &Connection, party: FriendParty, name: &str) -> Result<bool> {
  let (column, id) = match party {
    FriendParty::Person(id) => ("person_id", id),
    FriendParty::Institution(id) => ("institution_id", id),
  };
  let changed = conn.execute(
    &format!("UPDATE friends SET name = ?2, modified_at = ?3 WHERE {column} = ?1"),
    rusqlite::params![encode_uuid(id), name, encode_dt(now())],
  )?;
  Ok(changed > 0)
}

/// Bring the friend of a just-saved person in line with their display string.
pub fn person_saved(conn: &Connection, person: &Person) -> Result<bool> {
  let display = party::person_display(conn, person)?;
  rename_friend(conn, FriendParty::Person(person.person_id), &display)
}

/// Bring the friend of a just-saved institution in line with its name.
pub fn institution_saved(conn: &Connection, institution: &Institution) -> Result<bool> {
  rename_friend(
    conn,
    FriendParty::Institution(institution.institution_id),
    institution.display(),
  )
}

/// Recompute the search field and friend name of every person referencing
/// catalog row `id` of `table`.
pub fn catalog_saved(conn: &Connection, table: &CatalogTable, id: Uuid) -> Result<SyncReport> {
  let mut report = SyncReport::default();
  for person_id in party::people_referencing(conn, table.people_ref, id)? {
    let person = party::require_person(conn, person_id)?;
    let display = party::person_display(conn, &person)?;
    party::set_person_search_field(conn, person_id, &normalize(&display))?;
    report.people += 1;
    if rename_friend(conn, FriendParty::Person(person_id), &display)? {
      report.friends += 1;
    }
  }
  debug!(
    table = table.table,
    %id,
    people = report.people,
    friends = report.friends,
    "catalog cascade applied"
  );
  Ok(report)
}
