//! Contact persons attached to a friend, and their contact methods.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Result,
  text::join_collapsed,
  validate::{optional, required},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
  pub contact_id:          Uuid,
  pub friend_id:           Uuid,
  pub name:                String,
  pub position:            Option<String>,
  pub company:             Option<String>,
  /// Whether correspondence for the friend should also go to this contact.
  pub send_correspondence: bool,
}

impl Contact {
  pub fn display(&self) -> String {
    join_collapsed([
      self.name.as_str(),
      self.position.as_deref().unwrap_or_default(),
      self.company.as_deref().unwrap_or_default(),
    ])
  }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactInput {
  pub name:                String,
  pub position:            Option<String>,
  pub company:             Option<String>,
  #[serde(default)]
  pub send_correspondence: bool,
}

impl ContactInput {
  pub fn new(name: impl Into<String>) -> Self {
    Self { name: name.into(), ..Self::default() }
  }

  pub fn validated(self) -> Result<Self> {
    Ok(Self {
      name:                required("name", self.name)?,
      position:            optional(self.position),
      company:             optional(self.company),
      send_correspondence: self.send_correspondence,
    })
  }
}

/// A single channel for reaching a contact, e.g. `("Celular", "55 1234 5678")`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMethod {
  pub method_id:   Uuid,
  pub contact_id:  Uuid,
  pub method:      String,
  pub information: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactMethodInput {
  pub method:      String,
  pub information: String,
}

impl ContactMethodInput {
  pub fn new(method: impl Into<String>, information: impl Into<String>) -> Self {
    Self { method: method.into(), information: information.into() }
  }

  pub fn validated(self) -> Result<Self> {
    Ok(Self {
      method:      required("method", self.method)?,
      information: required("information", self.information)?,
    })
  }
}
