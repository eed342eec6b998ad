//! Contacts of a friend and their contact methods.

use proninos_core::{
  contact::{Contact, ContactInput, ContactMethod, ContactMethodInput},
  entity::{EntityKind, EntityRef},
};
use rusqlite::{Connection, OptionalExtension as _};
use uuid::Uuid;

use crate::{
  Error, Result,
  encode::{decode_uuid, encode_uuid},
  registry,
};

const CONTACT_COLUMNS: &str = "contact_id, friend_id, name, position, company, send_correspondence";

struct RawContact {
  contact_id:          String,
  friend_id:           String,
  name:                String,
  position:            Option<String>,
  company:             Option<String>,
  send_correspondence: bool,
}

impl RawContact {
  fn read(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      contact_id:          row.get(0)?,
      friend_id:           row.get(1)?,
      name:                row.get(2)?,
      position:            row.get(3)?,
      company:             row.get(4)?,
      send_correspondence: row.get(5)?,
    })
  }

  fn into_contact(self) -> Result<Contact> {
    Ok(Contact {
      contact_id:          decode_uuid(&self.contact_id)?,
      friend_id:           decode_uuid(&self.friend_id)?,
      name:                self.name,
      position:            self.position,
      company:             self.company,
      send_correspondence: self.send_correspondence,
    })
  }
}

fn require_contact(conn: &Connection, id: Uuid) -> Result<Contact> {
  let raw = conn
    .query_row(
      &format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE contact_id = ?1"),
      rusqlite::params![encode_uuid(id)],
      RawContact::read,
    )
    .optional()?
    .ok_or_else(|| Error::not_found(EntityKind::Contact, id))?;
  raw.into_contact()
}

pub fn insert(conn: &Connection, friend_id: Uuid, input: ContactInput) -> Result<Contact> {
  let input = input.validated()?;
  registry::require(conn, EntityRef::new(EntityKind::Friend, friend_id))?;

  let id = Uuid::new_v4();
  conn.execute(
    &format!("INSERT INTO contacts ({CONTACT_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"),
    rusqlite::params![
      encode_uuid(id),
      encode_uuid(friend_id),
      input.name,
      input.position,
      input.company,
      input.send_correspondence,
    ],
  )?;
  require_contact(conn, id)
}

pub fn update(conn: &Connection, id: Uuid, input: ContactInput) -> Result<Contact> {
  let input = input.validated()?;
  let changed = conn.execute(
    "UPDATE contacts SET name = ?2, position = ?3, company = ?4, send_correspondence = ?5
     WHERE contact_id = ?1",
    rusqlite::params![
      encode_uuid(id),
      input.name,
      input.position,
      input.company,
      input.send_correspondence,
    ],
  )?;
  if changed == 0 {
    return Err(Error::not_found(EntityKind::Contact, id));
  }
  require_contact(conn, id)
}

pub fn list(conn: &Connection, friend_id: Uuid) -> Result<Vec<Contact>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {CONTACT_COLUMNS} FROM contacts WHERE friend_id = ?1 ORDER BY name"
  ))?;
  let raws = stmt
    .query_map(rusqlite::params![encode_uuid(friend_id)], RawContact::read)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(RawContact::into_contact).collect()
}

// ─── Methods ─────────────────────────────────────────────────────────────────

type RawMethod = (String, String, String, String);

fn method_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawMethod> {
  Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

fn into_method((method_id, contact_id, method, information): RawMethod) -> Result<ContactMethod> {
  Ok(ContactMethod {
    method_id: decode_uuid(&method_id)?,
    contact_id: decode_uuid(&contact_id)?,
    method,
    information,
  })
}

pub fn insert_method(
  conn: &Connection,
  contact_id: Uuid,
  input: ContactMethodInput,
) -> Result<ContactMethod> {
  let input = input.validated()?;
  registry::require(conn, EntityRef::new(EntityKind::Contact, contact_id))?;

  let id = Uuid::new_v4();
  conn.execute(
    "INSERT INTO contact_methods (method_id, contact_id, method, information)
     VALUES (?1, ?2, ?3, ?4)",
    rusqlite::params![encode_uuid(id), encode_uuid(contact_id), input.method, input.information],
  )?;
  Ok(ContactMethod {
    method_id: id,
    contact_id,
    method: input.method,
    information: input.information,
  })
}

pub fn list_methods(conn: &Connection, contact_id: Uuid) -> Result<Vec<ContactMethod>> {
  let mut stmt = conn.prepare(
    "SELECT method_id, contact_id, method, information FROM contact_methods
     WHERE contact_id = ?1 ORDER BY method, information",
  )?;
  let raws = stmt
    .query_map(rusqlite::params![encode_uuid(contact_id)], method_from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(into_method).collect()
}
