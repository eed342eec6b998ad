//! The two concrete parties a [`Friend`](crate::friend::Friend) can wrap.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Result,
  catalog::{AcademicDegree, CourtesyTitle, GenderedLabel, Sex},
  text::{join_collapsed, normalize},
  validate::{optional, optional_email, required},
};

// ─── Person ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
  pub person_id:          Uuid,
  pub name:               String,
  pub last_name:          String,
  pub courtesy_title_id:  Option<Uuid>,
  pub academic_degree_id: Option<Uuid>,
  pub sex:                Sex,
  pub telephone:          Option<String>,
  pub email:              Option<String>,
  pub birthdate:          Option<NaiveDate>,
  pub company:            Option<String>,
  pub position:           Option<String>,
  pub active:             bool,
  /// `normalize(display)`; maintained by the store on every save and on
  /// catalog edits.
  pub search_field:       String,
  pub created_at:         DateTime<Utc>,
  pub modified_at:        DateTime<Utc>,
}

impl Person {
  /// Title, degree, given name and family name. The title and degree are
  /// looked up by the caller; a segment is included only when the person
  /// references it.
  pub fn display(
    &self,
    title: Option<&CourtesyTitle>,
    degree: Option<&AcademicDegree>,
  ) -> String {
    PersonName {
      name:      &self.name,
      last_name: &self.last_name,
      sex:       self.sex,
      title,
      degree,
    }
    .display()
  }
}

/// Borrowed view of everything that feeds a person's display string.
#[derive(Debug, Clone, Copy)]
pub struct PersonName<'a> {
  pub name:      &'a str,
  pub last_name: &'a str,
  pub sex:       Sex,
  pub title:     Option<&'a CourtesyTitle>,
  pub degree:    Option<&'a AcademicDegree>,
}

impl PersonName<'_> {
  pub fn display(&self) -> String {
    join_collapsed([
      self.title.map(|t| t.label(self.sex)).unwrap_or_default(),
      self.degree.map(|d| d.label(self.sex)).unwrap_or_default(),
      self.name,
      self.last_name,
    ])
  }

  pub fn search_field(&self) -> String { normalize(&self.display()) }
}

/// Input for creating or editing a [`Person`]. Edits replace every field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonInput {
  pub name:               String,
  pub last_name:          String,
  pub courtesy_title_id:  Option<Uuid>,
  pub academic_degree_id: Option<Uuid>,
  #[serde(default)]
  pub sex:                Sex,
  pub telephone:          Option<String>,
  pub email:              Option<String>,
  pub birthdate:          Option<NaiveDate>,
  pub company:            Option<String>,
  pub position:           Option<String>,
  #[serde(default = "active_default")]
  pub active:             bool,
}

impl PersonInput {
  /// Convenience constructor with all optional fields unset.
  pub fn new(name: impl Into<String>, last_name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      last_name: last_name.into(),
      active: true,
      ..Self::default()
    }
  }

  pub fn validated(self) -> Result<Self> {
    Ok(Self {
      name:               required("name", self.name)?,
      last_name:          required("last_name", self.last_name)?,
      courtesy_title_id:  self.courtesy_title_id,
      academic_degree_id: self.academic_degree_id,
      sex:                self.sex,
      telephone:          optional(self.telephone),
      email:              optional_email("email", self.email)?,
      birthdate:          self.birthdate,
      company:            optional(self.company),
      position:           optional(self.position),
      active:             self.active,
    })
  }
}

// ─── Institution ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Institution {
  pub institution_id: Uuid,
  pub name:           String,
  pub email:          Option<String>,
  pub telephone:      Option<String>,
  pub web_page:       Option<String>,
  pub active:         bool,
  pub search_field:   String,
  pub created_at:     DateTime<Utc>,
  pub modified_at:    DateTime<Utc>,
}

impl Institution {
  pub fn display(&self) -> &str { &self.name }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstitutionInput {
  pub name:      String,
  pub email:     Option<String>,
  pub telephone: Option<String>,
  pub web_page:  Option<String>,
  #[serde(default = "active_default")]
  pub active:    bool,
}

impl InstitutionInput {
  pub fn new(name: impl Into<String>) -> Self {
    Self { name: name.into(), active: true, ..Self::default() }
  }

  pub fn validated(self) -> Result<Self> {
    Ok(Self {
      name:      required("name", self.name)?,
      email:     optional_email("email", self.email)?,
      telephone: optional(self.telephone),
      web_page:  optional(self.web_page),
      active:    self.active,
    })
  }

  pub fn search_field(&self) -> String { normalize(&self.name) }
}

fn active_default() -> bool { true }
