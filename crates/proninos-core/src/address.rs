//! Postal and fiscal addresses.
//!
//! Both kinds share [`PostalFields`] and may be attached to any record via an
//! [`EntityRef`]. A friend points at one official (fiscal) address and one
//! delivery address by id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Result,
  entity::EntityRef,
  rfc::validate_rfc,
  text::{join_collapsed, non_blank},
  validate::{optional, optional_email},
};

// ─── Shared fields ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostalFields {
  pub street:          Option<String>,
  pub external_number: Option<String>,
  pub internal_number: Option<String>,
  /// Neighbourhood ("colonia").
  pub suburb:          Option<String>,
  /// Borough or municipality.
  pub locality:        Option<String>,
  pub city:            Option<String>,
  pub reference:       Option<String>,
  pub state:           Option<String>,
  pub country:         Option<String>,
  pub zip_code:        Option<String>,
}

impl PostalFields {
  /// Every populated field in postal order, with the zip code labelled
  /// `cp:`.
  pub fn display(&self) -> String {
    let zip = non_blank(self.zip_code.as_deref()).map(|z| format!("cp: {z}"));
    join_collapsed([
      self.street.as_deref().unwrap_or_default(),
      self.external_number.as_deref().unwrap_or_default(),
      self.internal_number.as_deref().unwrap_or_default(),
      self.suburb.as_deref().unwrap_or_default(),
      self.locality.as_deref().unwrap_or_default(),
      self.reference.as_deref().unwrap_or_default(),
      self.city.as_deref().unwrap_or_default(),
      self.state.as_deref().unwrap_or_default(),
      self.country.as_deref().unwrap_or_default(),
      zip.as_deref().unwrap_or_default(),
    ])
  }

  pub fn normalized(self) -> Self {
    Self {
      street:          optional(self.street),
      external_number: optional(self.external_number),
      internal_number: optional(self.internal_number),
      suburb:          optional(self.suburb),
      locality:        optional(self.locality),
      city:            optional(self.city),
      reference:       optional(self.reference),
      state:           optional(self.state),
      country:         optional(self.country),
      zip_code:        optional(self.zip_code),
    }
  }
}

// ─── Address ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
  pub address_id:  Uuid,
  #[serde(flatten)]
  pub postal:      PostalFields,
  pub attached_to: Option<EntityRef>,
  pub created_at:  DateTime<Utc>,
  pub modified_at: DateTime<Utc>,
}

impl Address {
  pub fn display(&self) -> String { self.postal.display() }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddressInput {
  #[serde(flatten)]
  pub postal:      PostalFields,
  pub attached_to: Option<EntityRef>,
}

impl AddressInput {
  pub fn validated(self) -> Self {
    Self { postal: self.postal.normalized(), attached_to: self.attached_to }
  }
}

// ─── Official address ────────────────────────────────────────────────────────

/// A fiscal address: postal fields plus the RFC and legal name used on
/// receipts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfficialAddress {
  pub official_address_id: Uuid,
  pub rfc:                 String,
  /// Legal name ("razón social").
  pub name:                Option<String>,
  pub email:               Option<String>,
  #[serde(flatten)]
  pub postal:              PostalFields,
  pub attached_to:         Option<EntityRef>,
  pub created_at:          DateTime<Utc>,
  pub modified_at:         DateTime<Utc>,
}

impl OfficialAddress {
  pub fn display(&self) -> String {
    let postal = self.postal.display();
    join_collapsed([
      self.name.as_deref().unwrap_or_default(),
      self.rfc.as_str(),
      postal.as_str(),
    ])
  }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OfficialAddressInput {
  pub rfc:         String,
  pub name:        Option<String>,
  pub email:       Option<String>,
  #[serde(flatten)]
  pub postal:      PostalFields,
  pub attached_to: Option<EntityRef>,
}

impl OfficialAddressInput {
  pub fn new(rfc: impl Into<String>) -> Self {
    Self { rfc: rfc.into(), ..Self::default() }
  }

  pub fn validated(self) -> Result<Self> {
    Ok(Self {
      rfc:         validate_rfc(&self.rfc)?,
      name:        optional(self.name),
      email:       optional_email("email", self.email)?,
      postal:      self.postal.normalized(),
      attached_to: self.attached_to,
    })
  }
}
