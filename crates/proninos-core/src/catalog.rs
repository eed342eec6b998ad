//! Catalog entities: small lookup tables with gendered label pairs.
//!
//! A person references at most one academic degree and one courtesy title;
//! the label used in their display string is chosen by their [`Sex`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

use crate::{Result, validate::required};

// ─── Sex ─────────────────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Sex {
  #[default]
  Male,
  Female,
}

/// A catalog row that carries one label per [`Sex`].
pub trait GenderedLabel {
  fn male(&self) -> &str;
  fn female(&self) -> &str;

  fn label(&self, sex: Sex) -> &str {
    match sex {
      Sex::Male => self.male(),
      Sex::Female => self.female(),
    }
  }

  /// `"<male> / <female>"`, the way catalog rows are listed.
  fn display(&self) -> String { format!("{} / {}", self.male(), self.female()) }
}

// ─── Academic degree ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcademicDegree {
  pub degree_id:   Uuid,
  pub name_male:   String,
  pub name_female: String,
  pub created_at:  DateTime<Utc>,
  pub modified_at: DateTime<Utc>,
}

impl GenderedLabel for AcademicDegree {
  fn male(&self) -> &str { &self.name_male }

  fn female(&self) -> &str { &self.name_female }
}

/// Input for creating or editing an [`AcademicDegree`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DegreeInput {
  pub name_male:   String,
  pub name_female: String,
}

impl DegreeInput {
  pub fn new(name_male: impl Into<String>, name_female: impl Into<String>) -> Self {
    Self { name_male: name_male.into(), name_female: name_female.into() }
  }

  /// Trim both labels and reject blanks.
  pub fn validated(self) -> Result<Self> {
    Ok(Self {
      name_male:   required("name_male", self.name_male)?,
      name_female: required("name_female", self.name_female)?,
    })
  }
}

// ─── Courtesy title ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourtesyTitle {
  pub title_id:     Uuid,
  pub title_male:   String,
  pub title_female: String,
  pub created_at:   DateTime<Utc>,
  pub modified_at:  DateTime<Utc>,
}

impl GenderedLabel for CourtesyTitle {
  fn male(&self) -> &str { &self.title_male }

  fn female(&self) -> &str { &self.title_female }
}

/// Input for creating or editing a [`CourtesyTitle`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitleInput {
  pub title_male:   String,
  pub title_female: String,
}

impl TitleInput {
  pub fn new(title_male: impl Into<String>, title_female: impl Into<String>) -> Self {
    Self { title_male: title_male.into(), title_female: title_female.into() }
  }

  pub fn validated(self) -> Result<Self> {
    Ok(Self {
      title_male:   required("title_male", self.title_male)?,
      title_female: required("title_female", self.title_female)?,
    })
  }
}
