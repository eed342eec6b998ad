//! Postal and official (fiscal) addresses.
//!
//! Both tables store the same postal columns and a typed attachment
//! (`attached_kind`, `attached_id`). Every value bound here is text, so the
//! statements are fed with [`rusqlite::params_from_iter`].

use proninos_core::{
  address::{Address, AddressInput, OfficialAddress, OfficialAddressInput, PostalFields},
  entity::{EntityKind, EntityRef},
  store::Attachments,
};
use rusqlite::{Connection, OptionalExtension as _, params_from_iter};
use uuid::Uuid;

use crate::{
  Error, Result,
  encode::{
    decode_dt, decode_entity_ref, decode_uuid, encode_dt, encode_entity_ref, encode_uuid, now,
  },
  registry,
};

const POSTAL_COLUMNS: &str = "street, external_number, internal_number, suburb, locality, city,
  reference, state, country, zip_code";

const ADDRESS_COLUMNS: &str = "address_id, street, external_number, internal_number, suburb,
  locality, city, reference, state, country, zip_code, attached_kind, attached_id,
  created_at, modified_at";

const OFFICIAL_COLUMNS: &str = "official_address_id, rfc, name, email, street, external_number,
  internal_number, suburb, locality, city, reference, state, country, zip_code,
  attached_kind, attached_id, created_at, modified_at";

fn postal_values(p: PostalFields) -> [Option<String>; 10] {
  [
    p.street,
    p.external_number,
    p.internal_number,
    p.suburb,
    p.locality,
    p.city,
    p.reference,
    p.state,
    p.country,
    p.zip_code,
  ]
}

fn read_postal(row: &rusqlite::Row<'_>, offset: usize) -> rusqlite::Result<PostalFields> {
  Ok(PostalFields {
    street:          row.get(offset)?,
    external_number: row.get(offset + 1)?,
    internal_number: row.get(offset + 2)?,
    suburb:          row.get(offset + 3)?,
    locality:        row.get(offset + 4)?,
    city:            row.get(offset + 5)?,
    reference:       row.get(offset + 6)?,
    state:           row.get(offset + 7)?,
    country:         row.get(offset + 8)?,
    zip_code:        row.get(offset + 9)?,
  })
}

/// `?1, ?2, …, ?n`
fn placeholders(n: usize) -> String {
  (1..=n).map(|i| format!("?{i}")).collect::<Vec<_>>().join(", ")
}

/// `street = ?2, …` for an UPDATE whose first parameter is the row id.
fn postal_assignments(first: usize) -> String {
  POSTAL_COLUMNS
    .split(',')
    .map(str::trim)
    .enumerate()
    .map(|(i, col)| format!("{col} = ?{}", first + i))
    .collect::<Vec<_>>()
    .join(", ")
}

// ─── Address ─────────────────────────────────────────────────────────────────

/// Raw values read directly from an `addresses` row.
pub struct RawAddress {
  pub address_id:    String,
  pub postal:        PostalFields,
  pub attached_kind: Option<String>,
  pub attached_id:   Option<String>,
  pub created_at:    String,
  pub modified_at:   String,
}

impl RawAddress {
  fn read(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      address_id:    row.get(0)?,
      postal:        read_postal(row, 1)?,
      attached_kind: row.get(11)?,
      attached_id:   row.get(12)?,
      created_at:    row.get(13)?,
      modified_at:   row.get(14)?,
    })
  }

  pub fn into_address(self) -> Result<Address> {
    Ok(Address {
      address_id:  decode_uuid(&self.address_id)?,
      postal:      self.postal,
      attached_to: decode_entity_ref(self.attached_kind.as_deref(), self.attached_id.as_deref())?,
      created_at:  decode_dt(&self.created_at)?,
      modified_at: decode_dt(&self.modified_at)?,
    })
  }
}

pub fn get_address(conn: &Connection, id: Uuid) -> Result<Option<Address>> {
  let raw = conn
    .query_row(
      &format!("SELECT {ADDRESS_COLUMNS} FROM addresses WHERE address_id = ?1"),
      rusqlite::params![encode_uuid(id)],
      RawAddress::read,
    )
    .optional()?;
  raw.map(RawAddress::into_address).transpose()
}

fn require_address(conn: &Connection, id: Uuid) -> Result<Address> {
  get_address(conn, id)?.ok_or_else(|| Error::not_found(EntityKind::Address, id))
}

pub fn insert_address(conn: &Connection, input: AddressInput) -> Result<Address> {
  let input = input.validated();
  registry::ensure_attachable(conn, input.attached_to)?;

  let id = Uuid::new_v4();
  let at = encode_dt(now());
  let (kind, target) = encode_entity_ref(input.attached_to);

  let mut values = vec![Some(encode_uuid(id))];
  values.extend(postal_values(input.postal));
  values.extend([kind, target, Some(at.clone()), Some(at)]);

  conn.execute(
    &format!("INSERT INTO addresses ({ADDRESS_COLUMNS}) VALUES ({})", placeholders(values.len())),
    params_from_iter(values),
  )?;
  require_address(conn, id)
}

pub fn update_address(conn: &Connection, id: Uuid, input: AddressInput) -> Result<Address> {
  let input = input.validated();
  registry::ensure_attachable(conn, input.attached_to)?;
  let (kind, target) = encode_entity_ref(input.attached_to);

  let mut values = vec![Some(encode_uuid(id))];
  values.extend(postal_values(input.postal));
  values.extend([kind, target, Some(encode_dt(now()))]);

  let changed = conn.execute(
    &format!(
      "UPDATE addresses SET {}, attached_kind = ?12, attached_id = ?13, modified_at = ?14
       WHERE address_id = ?1",
      postal_assignments(2)
    ),
    params_from_iter(values),
  )?;
  if changed == 0 {
    return Err(Error::not_found(EntityKind::Address, id));
  }
  require_address(conn, id)
}

// ─── Official address ────────────────────────────────────────────────────────

/// Raw values read directly from an `official_addresses` row.
pub struct RawOfficialAddress {
  pub official_address_id: String,
  pub rfc:                 String,
  pub name:                Option<String>,
  pub email:               Option<String>,
  pub postal:              PostalFields,
  pub attached_kind:       Option<String>,
  pub attached_id:         Option<String>,
  pub created_at:          String,
  pub modified_at:         String,
}

impl RawOfficialAddress {
  fn read(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      official_address_id: row.get(0)?,
      rfc:                 row.get(1)?,
      name:                row.get(2)?,
      email:               row.get(3)?,
      postal:              read_postal(row, 4)?,
      attached_kind:       row.get(14)?,
      attached_id:         row.get(15)?,
      created_at:          row.get(16)?,
      modified_at:         row.get(17)?,
    })
  }

  pub fn into_official(self) -> Result<OfficialAddress> {
    Ok(OfficialAddress {
      official_address_id: decode_uuid(&self.official_address_id)?,
      rfc:                 self.rfc,
      name:                self.name,
      email:               self.email,
      postal:              self.postal,
      attached_to:         decode_entity_ref(
        self.attached_kind.as_deref(),
        self.attached_id.as_deref(),
      )?,
      created_at:          decode_dt(&self.created_at)?,
      modified_at:         decode_dt(&self.modified_at)?,
    })
  }
}

pub fn get_official(conn: &Connection, id: Uuid) -> Result<Option<OfficialAddress>> {
  let raw = conn
    .query_row(
      &format!("SELECT {OFFICIAL_COLUMNS} FROM official_addresses WHERE official_address_id = ?1"),
      rusqlite::params![encode_uuid(id)],
      RawOfficialAddress::read,
    )
    .optional()?;
  raw.map(RawOfficialAddress::into_official).transpose()
}

fn require_official(conn: &Connection, id: Uuid) -> Result<OfficialAddress> {
  get_official(conn, id)?.ok_or_else(|| Error::not_found(EntityKind::OfficialAddress, id))
}

pub fn insert_official(conn: &Connection, input: OfficialAddressInput) -> Result<OfficialAddress> {
  let input = input.validated()?;
  registry::ensure_attachable(conn, input.attached_to)?;

  let id = Uuid::new_v4();
  let at = encode_dt(now());
  let (kind, target) = encode_entity_ref(input.attached_to);

  let mut values = vec![Some(encode_uuid(id)), Some(input.rfc), input.name, input.email];
  values.extend(postal_values(input.postal));
  values.extend([kind, target, Some(at.clone()), Some(at)]);

  conn.execute(
    &format!(
      "INSERT INTO official_addresses ({OFFICIAL_COLUMNS}) VALUES ({})",
      placeholders(values.len())
    ),
    params_from_iter(values),
  )?;
  require_official(conn, id)
}

pub fn update_official(
  conn: &Connection,
  id: Uuid,
  input: OfficialAddressInput,
) -> Result<OfficialAddress> {
  let input = input.validated()?;
  registry::ensure_attachable(conn, input.attached_to)?;
  let (kind, target) = encode_entity_ref(input.attached_to);

  let mut values = vec![Some(encode_uuid(id)), Some(input.rfc), input.name, input.email];
  values.extend(postal_values(input.postal));
  values.extend([kind, target, Some(encode_dt(now()))]);

  let changed = conn.execute(
    &format!(
      "UPDATE official_addresses SET rfc = ?2, name = ?3, email = ?4, {},
         attached_kind = ?15, attached_id = ?16, modified_at = ?17
       WHERE official_address_id = ?1",
      postal_assignments(5)
    ),
    params_from_iter(values),
  )?;
  if changed == 0 {
    return Err(Error::not_found(EntityKind::OfficialAddress, id));
  }
  require_official(conn, id)
}

// ─── Attachments ─────────────────────────────────────────────────────────────

pub fn attached_to(conn: &Connection, target: EntityRef) -> Result<Attachments> {
  let id = encode_uuid(target.id);
  let params = rusqlite::params![target.kind.as_ref(), id];

  let mut stmt = conn.prepare(&format!(
    "SELECT {ADDRESS_COLUMNS} FROM addresses
     WHERE attached_kind = ?1 AND attached_id = ?2 ORDER BY created_at"
  ))?;
  let addresses = stmt
    .query_map(params, RawAddress::read)?
    .collect::<rusqlite::Result<Vec<_>>>()?
    .into_iter()
    .map(RawAddress::into_address)
    .collect::<Result<Vec<_>>>()?;

  let mut stmt = conn.prepare(&format!(
    "SELECT {OFFICIAL_COLUMNS} FROM official_addresses
     WHERE attached_kind = ?1 AND attached_id = ?2 ORDER BY created_at"
  ))?;
  let official = stmt
    .query_map(params, RawOfficialAddress::read)?
    .collect::<rusqlite::Result<Vec<_>>>()?
    .into_iter()
    .map(RawOfficialAddress::into_official)
    .collect::<Result<Vec<_>>>()?;

  Ok(Attachments { addresses, official })
}
