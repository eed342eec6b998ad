//! Friends: creation with code synthesis, edits, and reads.

use proninos_core::{
  entity::{EntityKind, EntityRef},
  friend::{Friend, FriendParty, FriendUpdate, NewFriend, check_promoter},
  store::FriendQuery,
  text::normalize,
};
use rusqlite::{Connection, OptionalExtension as _};
use tracing::warn;
use uuid::Uuid;

use crate::{
  Error, Result, code,
  encode::{
    contains_pattern, decode_dt, decode_opt_uuid, decode_uuid, encode_dt, encode_opt_uuid,
    encode_uuid, is_unique_violation, now,
  },
  party, registry,
};

const INSERT_COLUMNS: &str = "friend_id, person_id, institution_id, name, code,
  official_address_id, delivery_address_id, notes, promoter_id, temp_key,
  created_at, modified_at";

const COLUMNS: &str = "f.friend_id, f.person_id, f.institution_id, f.name, f.code,
  f.official_address_id, f.delivery_address_id, f.notes, f.promoter_id, f.temp_key,
  f.created_at, f.modified_at";

// ─── Row decoding ────────────────────────────────────────────────────────────

/// Raw values read directly from a `friends` row.
pub struct RawFriend {
  pub friend_id:           String,
  pub person_id:           Option<String>,
  pub institution_id:      Option<String>,
  pub name:                String,
  pub code:                String,
  pub official_address_id: Option<String>,
  pub delivery_address_id: Option<String>,
  pub notes:               Option<String>,
  pub promoter_id:         Option<String>,
  pub temp_key:            Option<String>,
  pub created_at:          String,
  pub modified_at:         String,
}

impl RawFriend {
  fn read(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      friend_id:           row.get(0)?,
      person_id:           row.get(1)?,
      institution_id:      row.get(2)?,
      name:                row.get(3)?,
      code:                row.get(4)?,
      official_address_id: row.get(5)?,
      delivery_address_id: row.get(6)?,
      notes:               row.get(7)?,
      promoter_id:         row.get(8)?,
      temp_key:            row.get(9)?,
      created_at:          row.get(10)?,
      modified_at:         row.get(11)?,
    })
  }

  pub fn into_friend(self) -> Result<Friend> {
    let party = match (self.person_id.as_deref(), self.institution_id.as_deref()) {
      (Some(p), None) => FriendParty::Person(decode_uuid(p)?),
      (None, Some(i)) => FriendParty::Institution(decode_uuid(i)?),
      (p, i) => {
        return Err(Error::Decode {
          column: "person_id/institution_id",
          value:  format!("{p:?}/{i:?}"),
        });
      }
    };
    Ok(Friend {
      friend_id: decode_uuid(&self.friend_id)?,
      party,
      name: self.name,
      code: self.code,
      official_address_id: decode_opt_uuid(self.official_address_id.as_deref())?,
      delivery_address_id: decode_opt_uuid(self.delivery_address_id.as_deref())?,
      notes: self.notes,
      promoter_id: decode_opt_uuid(self.promoter_id.as_deref())?,
      temp_key: self.temp_key,
      created_at: decode_dt(&self.created_at)?,
      modified_at: decode_dt(&self.modified_at)?,
    })
  }
}

fn query_one(conn: &Connection, filter: &str, param: &str) -> Result<Option<Friend>> {
  let raw = conn
    .query_row(
      &format!("SELECT {COLUMNS} FROM friends f WHERE {filter} = ?1"),
      rusqlite::params![param],
      RawFriend::read,
    )
    .optional()?;
  raw.map(RawFriend::into_friend).transpose()
}

fn query_many(conn: &Connection, sql: &str, params: impl rusqlite::Params) -> Result<Vec<Friend>> {
  let mut stmt = conn.prepare(sql)?;
  let raws = stmt
    .query_map(params, RawFriend::read)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(RawFriend::into_friend).collect()
}

// ─── Reads ───────────────────────────────────────────────────────────────────

pub fn get(conn: &Connection, id: Uuid) -> Result<Option<Friend>> {
  query_one(conn, "f.friend_id", &encode_uuid(id))
}

pub fn require(conn: &Connection, id: Uuid) -> Result<Friend> {
  get(conn, id)?.ok_or_else(|| Error::not_found(EntityKind::Friend, id))
}

pub fn get_by_code(conn: &Connection, code: &str) -> Result<Option<Friend>> {
  query_one(conn, "f.code", &code.trim().to_ascii_uppercase())
}

pub fn for_party(conn: &Connection, party: FriendParty) -> Result<Option<Friend>> {
  match party {
    FriendParty::Person(id) => query_one(conn, "f.person_id", &encode_uuid(id)),
    FriendParty::Institution(id) => query_one(conn, "f.institution_id", &encode_uuid(id)),
  }
}

pub fn list(conn: &Connection) -> Result<Vec<Friend>> {
  query_many(
    conn,
    &format!("SELECT {COLUMNS} FROM friends f ORDER BY f.name, f.code"),
    [],
  )
}

pub fn list_promoted(conn: &Connection, promoter: Uuid) -> Result<Vec<Friend>> {
  query_many(
    conn,
    &format!("SELECT {COLUMNS} FROM friends f WHERE f.promoter_id = ?1 ORDER BY f.name, f.code"),
    rusqlite::params![encode_uuid(promoter)],
  )
}

pub fn search(conn: &Connection, query: &FriendQuery) -> Result<Vec<Friend>> {
  let pattern = query
    .text
    .as_deref()
    .map(str::trim)
    .filter(|t| !t.is_empty())
    .map(|t| contains_pattern(&normalize(t)));
  let limit = query.limit.map_or(-1, |l| l as i64);
  let offset = query.offset.unwrap_or(0) as i64;

  query_many(
    conn,
    &format!(
      "SELECT {COLUMNS}
       FROM friends f
       LEFT JOIN people p       ON p.person_id = f.person_id
       LEFT JOIN institutions i ON i.institution_id = f.institution_id
       WHERE (?1 IS NULL
              OR COALESCE(p.search_field, i.search_field) LIKE ?1 ESCAPE '\\'
              OR lower(f.code) LIKE ?1 ESCAPE '\\')
         AND (?2 = 0 OR COALESCE(p.active, i.active) = 1)
       ORDER BY f.name, f.code
       LIMIT ?3 OFFSET ?4"
    ),
    rusqlite::params![pattern, query.active_only, limit, offset],
  )
}

/// The current promoter of `id`; `None` for missing friends too.
fn promoter_of(conn: &Connection, id: Uuid) -> Result<Option<Uuid>> {
  let raw: Option<Option<String>> = conn
    .query_row(
      "SELECT promoter_id FROM friends WHERE friend_id = ?1",
      rusqlite::params![encode_uuid(id)],
      |r| r.get(0),
    )
    .optional()?;
  decode_opt_uuid(raw.flatten().as_deref())
}

// ─── Writes ──────────────────────────────────────────────────────────────────

/// Check that every record the friend points at exists.
fn check_links(
  conn: &Connection,
  official_address_id: Option<Uuid>,
  delivery_address_id: Option<Uuid>,
  promoter_id: Option<Uuid>,
) -> Result<()> {
  let links = [
    official_address_id.map(|id| EntityRef::new(EntityKind::OfficialAddress, id)),
    delivery_address_id.map(|id| EntityRef::new(EntityKind::Address, id)),
    promoter_id.map(|id| EntityRef::new(EntityKind::Friend, id)),
  ];
  for link in links.into_iter().flatten() {
    registry::require(conn, link)?;
  }
  Ok(())
}

fn display_of(conn: &Connection, party: FriendParty) -> Result<String> {
  party::party_display(conn, party)?.ok_or_else(|| {
    let target = party.entity();
    Error::not_found(target.kind, target.id)
  })
}

pub fn insert(conn: &Connection, input: NewFriend) -> Result<Friend> {
  let input = input.validated()?;
  let name = display_of(conn, input.party)?;
  if let Some(existing) = for_party(conn, input.party)? {
    return Err(Error::PartyAlreadyLinked {
      party:  input.party.entity(),
      friend: existing.friend_id,
    });
  }
  check_links(conn, input.official_address_id, input.delivery_address_id, input.promoter_id)?;

  let id = Uuid::new_v4();
  if let Some(promoter) = input.promoter_id {
    check_promoter(id, promoter, |f| promoter_of(conn, f))?;
  }

  if let Some(code) = &input.code
    && code::is_taken(conn, code)?
  {
    return Err(Error::DuplicateCode(code.clone()));
  }

  // The write lock is held from here on, so the synthesized code stays free
  // until the insert below.
  let code = match input.code {
    Some(code) => code,
    None => code::synthesize(conn, input.party)?,
  };

  let inserted = conn.execute(
    &format!(
      "INSERT INTO friends ({INSERT_COLUMNS})
       VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)"
    ),
    rusqlite::params![
      encode_uuid(id),
      encode_opt_uuid(input.party.person_id()),
      encode_opt_uuid(input.party.institution_id()),
      name,
      code,
      encode_opt_uuid(input.official_address_id),
      encode_opt_uuid(input.delivery_address_id),
      input.notes,
      encode_opt_uuid(input.promoter_id),
      input.temp_key,
      encode_dt(now()),
    ],
  );

  match inserted {
    Ok(_) => require(conn, id),
    Err(e) if is_unique_violation(&e, "friends.code") => {
      warn!(%code, "friend code claimed during insert");
      Err(Error::DuplicateCode(code))
    }
    Err(e) => Err(e.into()),
  }
}

/// Apply `input` to friend `id`. The party and code never change; the cached
/// name is refreshed from the party.
pub fn update(conn: &Connection, id: Uuid, input: FriendUpdate) -> Result<Friend> {
  let current = require(conn, id)?;
  let input = input.validated();
  check_links(conn, input.official_address_id, input.delivery_address_id, input.promoter_id)?;
  // Only a new link is walked; an unchanged one was checked when it was set.
  if let Some(promoter) = input.promoter_id
    && current.promoter_id != Some(promoter)
  {
    check_promoter(id, promoter, |f| promoter_of(conn, f))?;
  }
  let name = display_of(conn, current.party)?;

  conn.execute(
    "UPDATE friends SET
       name = ?2, official_address_id = ?3, delivery_address_id = ?4, notes = ?5,
       promoter_id = ?6, temp_key = ?7, modified_at = ?8
     WHERE friend_id = ?1",
    rusqlite::params![
      encode_uuid(id),
      name,
      encode_opt_uuid(input.official_address_id),
      encode_opt_uuid(input.delivery_address_id),
      input.notes,
      encode_opt_uuid(input.promoter_id),
      input.temp_key,
      encode_dt(now()),
    ],
  )?;
  require(conn, id)
}
