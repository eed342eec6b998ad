//! Friend, the unified donor/contact record.
//!
//! A friend wraps exactly one party. Its `name` is a cached copy of the
//! party's display string and is refreshed whenever the friend or its party
//! is saved. Its `code` is assigned once, on creation, and never changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  entity::{EntityKind, EntityRef},
  validate::optional,
};

/// Maximum number of promoter links followed when checking for cycles.
pub const PROMOTER_DEPTH_LIMIT: usize = 64;

// ─── Party ───────────────────────────────────────────────────────────────────

/// The party a friend wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum FriendParty {
  Person(Uuid),
  Institution(Uuid),
}

impl FriendParty {
  pub fn person_id(&self) -> Option<Uuid> {
    match self {
      Self::Person(id) => Some(*id),
      Self::Institution(_) => None,
    }
  }

  pub fn institution_id(&self) -> Option<Uuid> {
    match self {
      Self::Institution(id) => Some(*id),
      Self::Person(_) => None,
    }
  }

  pub fn entity(&self) -> EntityRef {
    match *self {
      Self::Person(id) => EntityRef::new(EntityKind::Person, id),
      Self::Institution(id) => EntityRef::new(EntityKind::Institution, id),
    }
  }
}

// ─── Friend ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Friend {
  pub friend_id:           Uuid,
  pub party:               FriendParty,
  /// Cached display string of the party.
  pub name:                String,
  pub code:                String,
  pub official_address_id: Option<Uuid>,
  pub delivery_address_id: Option<Uuid>,
  pub notes:               Option<String>,
  /// The friend who introduced this one.
  pub promoter_id:         Option<Uuid>,
  pub temp_key:            Option<String>,
  pub created_at:          DateTime<Utc>,
  pub modified_at:         DateTime<Utc>,
}

/// Input to [`crate::store::FriendStore::create_friend`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFriend {
  pub party:               FriendParty,
  /// Explicit code; synthesised from the party's name when absent.
  pub code:                Option<String>,
  pub official_address_id: Option<Uuid>,
  pub delivery_address_id: Option<Uuid>,
  pub notes:               Option<String>,
  pub promoter_id:         Option<Uuid>,
  pub temp_key:            Option<String>,
}

impl NewFriend {
  pub fn new(party: FriendParty) -> Self {
    Self {
      party,
      code: None,
      official_address_id: None,
      delivery_address_id: None,
      notes: None,
      promoter_id: None,
      temp_key: None,
    }
  }

  pub fn validated(self) -> Result<Self> {
    let code = optional(self.code).map(|c| c.to_ascii_uppercase());
    if let Some(c) = &code
      && !c.chars().all(|ch| ch.is_ascii_alphanumeric())
    {
      return Err(Error::validation("code", format!("{c:?} must be ASCII letters and digits")));
    }
    Ok(Self {
      code,
      notes: optional(self.notes),
      temp_key: optional(self.temp_key),
      ..self
    })
  }
}

/// Editable fields of a saved friend. The party and the code are fixed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FriendUpdate {
  pub official_address_id: Option<Uuid>,
  pub delivery_address_id: Option<Uuid>,
  pub notes:               Option<String>,
  pub promoter_id:         Option<Uuid>,
  pub temp_key:            Option<String>,
}

impl FriendUpdate {
  /// Start from the current state of `friend`.
  pub fn from_friend(friend: &Friend) -> Self {
    Self {
      official_address_id: friend.official_address_id,
      delivery_address_id: friend.delivery_address_id,
      notes:               friend.notes.clone(),
      promoter_id:         friend.promoter_id,
      temp_key:            friend.temp_key.clone(),
    }
  }

  pub fn validated(self) -> Self {
    Self {
      notes: optional(self.notes),
      temp_key: optional(self.temp_key),
      ..self
    }
  }
}

// ─── Promoter forest ─────────────────────────────────────────────────────────

/// Check that making `promoter_id` the promoter of `friend_id` keeps the
/// promoter links a forest.
///
/// `parent_of` returns the current promoter of a friend. The walk starts at
/// the proposed promoter and follows links upward for at most
/// [`PROMOTER_DEPTH_LIMIT`] hops; reaching `friend_id`, or running out of
/// hops, is a cycle.
pub fn check_promoter<E, F>(friend_id: Uuid, promoter_id: Uuid, mut parent_of: F) -> Result<(), E>
where
  E: From<Error>,
  F: FnMut(Uuid) -> Result<Option<Uuid>, E>,
{
  let cycle = || E::from(Error::PromoterCycle { friend: friend_id, promoter: promoter_id });

  let mut current = promoter_id;
  for _ in 0..PROMOTER_DEPTH_LIMIT {
    if current == friend_id {
      return Err(cycle());
    }
    match parent_of(current)? {
      Some(parent) => current = parent,
      None => return Ok(()),
    }
  }
  Err(cycle())
}
