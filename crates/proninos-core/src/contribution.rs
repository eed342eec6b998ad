//! The slice of the contribution module this crate knows about.
//!
//! Contributions are owned by an external collaborator. The registry only
//! answers one question about them: which successful contribution came first
//! for a given friend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
  pub contribution_id: Uuid,
  pub friend_id:       Uuid,
  /// Decimal amount as entered, e.g. `"1500.00"`.
  pub amount:          String,
  /// Whether the contribution's status counts as received.
  pub success:         bool,
  pub created_at:      DateTime<Utc>,
}

/// Input to [`crate::store::FriendStore::record_contribution`]. `created_at`
/// defaults to now when absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewContribution {
  pub friend_id:  Uuid,
  pub amount:     String,
  pub success:    bool,
  pub created_at: Option<DateTime<Utc>>,
}
