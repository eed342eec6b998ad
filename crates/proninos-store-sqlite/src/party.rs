//! People and institutions.

use proninos_core::{
  catalog::{AcademicDegree, CourtesyTitle},
  entity::EntityKind,
  friend::FriendParty,
  party::{Institution, InstitutionInput, Person, PersonInput, PersonName},
};
use rusqlite::{Connection, OptionalExtension as _};
use uuid::Uuid;

use crate::{
  Error, Result, catalog,
  encode::{
    decode_date, decode_dt, decode_opt_uuid, decode_sex, decode_uuid, encode_date, encode_dt,
    encode_opt_uuid, encode_sex, encode_uuid, now,
  },
};

// ─── People ──────────────────────────────────────────────────────────────────

const PERSON_COLUMNS: &str = "person_id, name, last_name, courtesy_title_id, academic_degree_id,
  sex, telephone, email, birthdate, company, position, active, search_field,
  created_at, modified_at";

/// Raw values read directly from a `people` row.
pub struct RawPerson {
  pub person_id:          String,
  pub name:               String,
  pub last_name:          String,
  pub courtesy_title_id:  Option<String>,
  pub academic_degree_id: Option<String>,
  pub sex:                String,
  pub telephone:          Option<String>,
  pub email:              Option<String>,
  pub birthdate:          Option<String>,
  pub company:            Option<String>,
  pub position:           Option<String>,
  pub active:             bool,
  pub search_field:       String,
  pub created_at:         String,
  pub modified_at:        String,
}

impl RawPerson {
  fn read(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      person_id:          row.get(0)?,
      name:               row.get(1)?,
      last_name:          row.get(2)?,
      courtesy_title_id:  row.get(3)?,
      academic_degree_id: row.get(4)?,
      sex:                row.get(5)?,
      telephone:          row.get(6)?,
      email:              row.get(7)?,
      birthdate:          row.get(8)?,
      company:            row.get(9)?,
      position:           row.get(10)?,
      active:             row.get(11)?,
      search_field:       row.get(12)?,
      created_at:         row.get(13)?,
      modified_at:        row.get(14)?,
    })
  }

  pub fn into_person(self) -> Result<Person> {
    Ok(Person {
      person_id:          decode_uuid(&self.person_id)?,
      name:               self.name,
      last_name:          self.last_name,
      courtesy_title_id:  decode_opt_uuid(self.courtesy_title_id.as_deref())?,
      academic_degree_id: decode_opt_uuid(self.academic_degree_id.as_deref())?,
      sex:                decode_sex(&self.sex)?,
      telephone:          self.telephone,
      email:              self.email,
      birthdate:          self.birthdate.as_deref().map(decode_date).transpose()?,
      company:            self.company,
      position:           self.position,
      active:             self.active,
      search_field:       self.search_field,
      created_at:         decode_dt(&self.created_at)?,
      modified_at:        decode_dt(&self.modified_at)?,
    })
  }
}

pub fn get_person(conn: &Connection, id: Uuid) -> Result<Option<Person>> {
  let raw = conn
    .query_row(
      &format!("SELECT {PERSON_COLUMNS} FROM people WHERE person_id = ?1"),
      rusqlite::params![encode_uuid(id)],
      RawPerson::read,
    )
    .optional()?;
  raw.map(RawPerson::into_person).transpose()
}

pub fn require_person(conn: &Connection, id: Uuid) -> Result<Person> {
  get_person(conn, id)?.ok_or_else(|| Error::not_found(EntityKind::Person, id))
}

/// Ids of every person referencing a catalog row through `column`.
pub fn people_referencing(conn: &Connection, column: &str, catalog_id: Uuid) -> Result<Vec<Uuid>> {
  let mut stmt = conn.prepare(&format!("SELECT person_id FROM people WHERE {column} = ?1"))?;
  let ids = stmt
    .query_map(rusqlite::params![encode_uuid(catalog_id)], |r| r.get::<_, String>(0))?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  ids.iter().map(String::as_str).map(decode_uuid).collect()
}

/// Look up the catalog rows behind a title id and a degree id.
fn resolve_labels(
  conn: &Connection,
  title_id: Option<Uuid>,
  degree_id: Option<Uuid>,
) -> Result<(Option<CourtesyTitle>, Option<AcademicDegree>)> {
  let title = title_id
    .map(|id| catalog::require::<CourtesyTitle>(conn, id))
    .transpose()?;
  let degree = degree_id
    .map(|id| catalog::require::<AcademicDegree>(conn, id))
    .transpose()?;
  Ok((title, degree))
}

pub fn person_display(conn: &Connection, person: &Person) -> Result<String> {
  let (title, degree) =
    resolve_labels(conn, person.courtesy_title_id, person.academic_degree_id)?;
  Ok(person.display(title.as_ref(), degree.as_ref()))
}

/// The search field for a person as `input` describes them. Fails with
/// `NotFound` if a referenced catalog row is missing.
fn person_search_field(conn: &Connection, input: &PersonInput) -> Result<String> {
  let (title, degree) =
    resolve_labels(conn, input.courtesy_title_id, input.academic_degree_id)?;
  Ok(
    PersonName {
      name:      &input.name,
      last_name: &input.last_name,
      sex:       input.sex,
      title:     title.as_ref(),
      degree:    degree.as_ref(),
    }
    .search_field(),
  )
}

pub fn insert_person(conn: &Connection, input: PersonInput) -> Result<Person> {
  let input = input.validated()?;
  let search_field = person_search_field(conn, &input)?;

  let id = Uuid::new_v4();
  let at = encode_dt(now());
  conn.execute(
    &format!(
      "INSERT INTO people ({PERSON_COLUMNS})
       VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?14)"
    ),
    rusqlite::params![
      encode_uuid(id),
      input.name,
      input.last_name,
      encode_opt_uuid(input.courtesy_title_id),
      encode_opt_uuid(input.academic_degree_id),
      encode_sex(input.sex),
      input.telephone,
      input.email,
      input.birthdate.map(encode_date),
      input.company,
      input.position,
      input.active,
      search_field,
      at,
    ],
  )?;
  require_person(conn, id)
}

/// Write every field of `input` over person `id`. The search field is
/// recomputed here; the caller runs the friend rename.
pub fn update_person(conn: &Connection, id: Uuid, input: PersonInput) -> Result<Person> {
  let input = input.validated()?;
  let search_field = person_search_field(conn, &input)?;

  let changed = conn.execute(
    "UPDATE people SET
       name = ?2, last_name = ?3, courtesy_title_id = ?4, academic_degree_id = ?5,
       sex = ?6, telephone = ?7, email = ?8, birthdate = ?9, company = ?10,
       position = ?11, active = ?12, search_field = ?13, modified_at = ?14
     WHERE person_id = ?1",
    rusqlite::params![
      encode_uuid(id),
      input.name,
      input.last_name,
      encode_opt_uuid(input.courtesy_title_id),
      encode_opt_uuid(input.academic_degree_id),
      encode_sex(input.sex),
      input.telephone,
      input.email,
      input.birthdate.map(encode_date),
      input.company,
      input.position,
      input.active,
      search_field,
      encode_dt(now()),
    ],
  )?;
  if changed == 0 {
    return Err(Error::not_found(EntityKind::Person, id));
  }
  require_person(conn, id)
}

pub fn set_person_search_field(conn: &Connection, id: Uuid, search_field: &str) -> Result<()> {
  conn.execute(
    "UPDATE people SET search_field = ?2 WHERE person_id = ?1",
    rusqlite::params![encode_uuid(id), search_field],
  )?;
  Ok(())
}

// ─── Institutions ────────────────────────────────────────────────────────────

const INSTITUTION_COLUMNS: &str = "institution_id, name, email, telephone, web_page, active,
  search_field, created_at, modified_at";

/// Raw values read directly from an `institutions` row.
pub struct RawInstitution {
  pub institution_id: String,
  pub name:           String,
  pub email:          Option<String>,
  pub telephone:      Option<String>,
  pub web_page:       Option<String>,
  pub active:         bool,
  pub search_field:   String,
  pub created_at:     String,
  pub modified_at:    String,
}

impl RawInstitution {
  fn read(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      institution_id: row.get(0)?,
      name:           row.get(1)?,
      email:          row.get(2)?,
      telephone:      row.get(3)?,
      web_page:       row.get(4)?,
      active:         row.get(5)?,
      search_field:   row.get(6)?,
      created_at:     row.get(7)?,
      modified_at:    row.get(8)?,
    })
  }

  pub fn into_institution(self) -> Result<Institution> {
    Ok(Institution {
      institution_id: decode_uuid(&self.institution_id)?,
      name:           self.name,
      email:          self.email,
      telephone:      self.telephone,
      web_page:       self.web_page,
      active:         self.active,
      search_field:   self.search_field,
      created_at:     decode_dt(&self.created_at)?,
      modified_at:    decode_dt(&self.modified_at)?,
    })
  }
}

pub fn get_institution(conn: &Connection, id: Uuid) -> Result<Option<Institution>> {
  let raw = conn
    .query_row(
      &format!("SELECT {INSTITUTION_COLUMNS} FROM institutions WHERE institution_id = ?1"),
      rusqlite::params![encode_uuid(id)],
      RawInstitution::read,
    )
    .optional()?;
  raw.map(RawInstitution::into_institution).transpose()
}

pub fn require_institution(conn: &Connection, id: Uuid) -> Result<Institution> {
  get_institution(conn, id)?.ok_or_else(|| Error::not_found(EntityKind::Institution, id))
}

pub fn insert_institution(conn: &Connection, input: InstitutionInput) -> Result<Institution> {
  let input = input.validated()?;
  let id = Uuid::new_v4();
  let at = encode_dt(now());
  conn.execute(
    &format!(
      "INSERT INTO institutions ({INSTITUTION_COLUMNS})
       VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)"
    ),
    rusqlite::params![
      encode_uuid(id),
      input.name,
      input.email,
      input.telephone,
      input.web_page,
      input.active,
      input.search_field(),
      at,
    ],
  )?;
  require_institution(conn, id)
}

pub fn update_institution(
  conn: &Connection,
  id: Uuid,
  input: InstitutionInput,
) -> Result<Institution> {
  let input = input.validated()?;
  let changed = conn.execute(
    "UPDATE institutions SET
       name = ?2, email = ?3, telephone = ?4, web_page = ?5, active = ?6,
       search_field = ?7, modified_at = ?8
     WHERE institution_id = ?1",
    rusqlite::params![
      encode_uuid(id),
      input.name,
      input.email,
      input.telephone,
      input.web_page,
      input.active,
      input.search_field(),
      encode_dt(now()),
    ],
  )?;
  if changed == 0 {
    return Err(Error::not_found(EntityKind::Institution, id));
  }
  require_institution(conn, id)
}

// ─── Either party ────────────────────────────────────────────────────────────

/// Current display string of `party`, or `None` if it does not exist.
pub fn party_display(conn: &Connection, party: FriendParty) -> Result<Option<String>> {
  match party {
    FriendParty::Person(id) => get_person(conn, id)?
      .map(|p| person_display(conn, &p))
      .transpose(),
    FriendParty::Institution(id) => Ok(get_institution(conn, id)?.map(|i| i.name)),
  }
}
