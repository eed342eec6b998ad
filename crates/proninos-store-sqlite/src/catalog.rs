//! Academic degrees and courtesy titles.
//!
//! Both tables have the same shape (id, male label, female label,
//! timestamps), so the SQL is written once against a [`CatalogTable`]
//! descriptor. Updates cascade through [`crate::sync`].

use proninos_core::{
  catalog::{AcademicDegree, CourtesyTitle},
  entity::EntityKind,
};
use rusqlite::{Connection, OptionalExtension as _};
use uuid::Uuid;

use crate::{
  Error, Result,
  encode::{decode_dt, decode_uuid, encode_dt, encode_uuid, now},
};

/// Column names of one catalog table.
pub struct CatalogTable {
  pub kind:       EntityKind,
  pub table:      &'static str,
  pub id:         &'static str,
  pub male:       &'static str,
  pub female:     &'static str,
  /// The `people` column referencing this table.
  pub people_ref: &'static str,
}

pub const DEGREES: CatalogTable = CatalogTable {
  kind:       EntityKind::AcademicDegree,
  table:      "academic_degrees",
  id:         "degree_id",
  male:       "name_male",
  female:     "name_female",
  people_ref: "academic_degree_id",
};

pub const TITLES: CatalogTable = CatalogTable {
  kind:       EntityKind::CourtesyTitle,
  table:      "courtesy_titles",
  id:         "title_id",
  male:       "title_male",
  female:     "title_female",
  people_ref: "courtesy_title_id",
};

/// Raw strings read directly from a catalog row.
pub struct RawCatalogRow {
  pub id:          String,
  pub male:        String,
  pub female:      String,
  pub created_at:  String,
  pub modified_at: String,
}

/// A domain type stored in a catalog table.
pub trait CatalogRecord: Sized {
  const TABLE: &'static CatalogTable;

  fn from_raw(raw: RawCatalogRow) -> Result<Self>;
}

impl CatalogRecord for AcademicDegree {
  const TABLE: &'static CatalogTable = &DEGREES;

  fn from_raw(raw: RawCatalogRow) -> Result<Self> {
    Ok(Self {
      degree_id:   decode_uuid(&raw.id)?,
      name_male:   raw.male,
      name_female: raw.female,
      created_at:  decode_dt(&raw.created_at)?,
      modified_at: decode_dt(&raw.modified_at)?,
    })
  }
}

impl CatalogRecord for CourtesyTitle {
  const TABLE: &'static CatalogTable = &TITLES;

  fn from_raw(raw: RawCatalogRow) -> Result<Self> {
    Ok(Self {
      title_id:     decode_uuid(&raw.id)?,
      title_male:   raw.male,
      title_female: raw.female,
      created_at:   decode_dt(&raw.created_at)?,
      modified_at:  decode_dt(&raw.modified_at)?,
    })
  }
}

fn select_sql(t: &CatalogTable) -> String {
  format!(
    "SELECT {id}, {male}, {female}, created_at, modified_at FROM {table}",
    id = t.id,
    male = t.male,
    female = t.female,
    table = t.table,
  )
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawCatalogRow> {
  Ok(RawCatalogRow {
    id:          row.get(0)?,
    male:        row.get(1)?,
    female:      row.get(2)?,
    created_at:  row.get(3)?,
    modified_at: row.get(4)?,
  })
}

/// Reject a label already used in the same column by another row.
fn ensure_unique(
  conn: &Connection,
  t: &CatalogTable,
  column: &'static str,
  value: &str,
  except: Option<Uuid>,
) -> Result<()> {
  let sql = format!(
    "SELECT {id} FROM {table} WHERE {column} = ?1 AND {id} IS NOT ?2",
    id = t.id,
    table = t.table,
  );
  let taken: Option<String> = conn
    .query_row(&sql, rusqlite::params![value, except.map(encode_uuid)], |r| r.get(0))
    .optional()?;
  match taken {
    Some(_) => Err(Error::DuplicateLabel { field: column, value: value.to_owned() }),
    None => Ok(()),
  }
}

pub fn get<T: CatalogRecord>(conn: &Connection, id: Uuid) -> Result<Option<T>> {
  let sql = format!("{} WHERE {} = ?1", select_sql(T::TABLE), T::TABLE.id);
  let raw = conn
    .query_row(&sql, rusqlite::params![encode_uuid(id)], read_row)
    .optional()?;
  raw.map(T::from_raw).transpose()
}

pub fn require<T: CatalogRecord>(conn: &Connection, id: Uuid) -> Result<T> {
  get(conn, id)?.ok_or_else(|| Error::not_found(T::TABLE.kind, id))
}

pub fn list<T: CatalogRecord>(conn: &Connection) -> Result<Vec<T>> {
  let sql = format!("{} ORDER BY {}", select_sql(T::TABLE), T::TABLE.male);
  let mut stmt = conn.prepare(&sql)?;
  let raws = stmt
    .query_map([], read_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(T::from_raw).collect()
}

pub fn insert<T: CatalogRecord>(conn: &Connection, male: &str, female: &str) -> Result<T> {
  let t = T::TABLE;
  ensure_unique(conn, t, t.male, male, None)?;
  ensure_unique(conn, t, t.female, female, None)?;

  let id = Uuid::new_v4();
  let at = encode_dt(now());
  conn.execute(
    &format!(
      "INSERT INTO {table} ({id}, {male}, {female}, created_at, modified_at)
       VALUES (?1, ?2, ?3, ?4, ?4)",
      table = t.table,
      id = t.id,
      male = t.male,
      female = t.female,
    ),
    rusqlite::params![encode_uuid(id), male, female, at],
  )?;
  require(conn, id)
}

pub fn update<T: CatalogRecord>(
  conn: &Connection,
  id: Uuid,
  male: &str,
  female: &str,
) -> Result<T> {
  let t = T::TABLE;
  ensure_unique(conn, t, t.male, male, Some(id))?;
  ensure_unique(conn, t, t.female, female, Some(id))?;

  let changed = conn.execute(
    &format!(
      "UPDATE {table} SET {male} = ?2, {female} = ?3, modified_at = ?4 WHERE {id} = ?1",
      table = t.table,
      id = t.id,
      male = t.male,
      female = t.female,
    ),
    rusqlite::params![encode_uuid(id), male, female, encode_dt(now())],
  )?;
  if changed == 0 {
    return Err(Error::not_found(t.kind, id));
  }
  require(conn, id)
}
