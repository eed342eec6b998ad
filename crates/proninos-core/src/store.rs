//! The `FriendStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `proninos-store-sqlite`).
//! Every write that feeds a denormalized value (a person's `search_field`, a
//! friend's cached `name`) must leave those values consistent before it
//! returns; backends do that inside the transaction of the triggering write.

use std::future::Future;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  address::{Address, AddressInput, OfficialAddress, OfficialAddressInput},
  catalog::{AcademicDegree, CourtesyTitle, DegreeInput, TitleInput},
  contact::{Contact, ContactInput, ContactMethod, ContactMethodInput},
  contribution::{Contribution, NewContribution},
  entity::EntityRef,
  friend::{Friend, FriendParty, FriendUpdate, NewFriend},
  party::{Institution, InstitutionInput, Person, PersonInput},
};

// ─── Query and result types ──────────────────────────────────────────────────

/// Parameters for [`FriendStore::search_friends`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FriendQuery {
  /// Free text, normalized before matching against each party's
  /// `search_field` and the friend's code.
  pub text:        Option<String>,
  /// Skip friends whose party is marked inactive.
  #[serde(default)]
  pub active_only: bool,
  pub limit:       Option<usize>,
  pub offset:      Option<usize>,
}

/// A catalog edit together with the size of the cascade it triggered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cascade<T> {
  pub record:          T,
  /// People whose `search_field` was recomputed.
  pub people_resynced: usize,
  /// Friends whose cached `name` was recomputed.
  pub friends_renamed: usize,
}

/// Every address attached to one record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Attachments {
  pub addresses: Vec<Address>,
  pub official:  Vec<OfficialAddress>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a friend-registry backend.
///
/// All methods return `Send` futures so the trait can be used from
/// multi-threaded async runtimes.
pub trait FriendStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Catalogs ──────────────────────────────────────────────────────────

  fn create_degree(
    &self,
    input: DegreeInput,
  ) -> impl Future<Output = Result<AcademicDegree, Self::Error>> + Send + '_;

  /// Edit a degree's labels and resynchronize every person referencing it
  /// (and their friends) in the same transaction.
  fn update_degree(
    &self,
    id: Uuid,
    input: DegreeInput,
  ) -> impl Future<Output = Result<Cascade<AcademicDegree>, Self::Error>> + Send + '_;

  fn get_degree(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<AcademicDegree>, Self::Error>> + Send + '_;

  fn list_degrees(
    &self,
  ) -> impl Future<Output = Result<Vec<AcademicDegree>, Self::Error>> + Send + '_;

  fn create_title(
    &self,
    input: TitleInput,
  ) -> impl Future<Output = Result<CourtesyTitle, Self::Error>> + Send + '_;

  /// Edit a title's labels; cascades like [`FriendStore::update_degree`].
  fn update_title(
    &self,
    id: Uuid,
    input: TitleInput,
  ) -> impl Future<Output = Result<Cascade<CourtesyTitle>, Self::Error>> + Send + '_;

  fn get_title(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<CourtesyTitle>, Self::Error>> + Send + '_;

  fn list_titles(
    &self,
  ) -> impl Future<Output = Result<Vec<CourtesyTitle>, Self::Error>> + Send + '_;

  // ── Parties ───────────────────────────────────────────────────────────

  fn create_person(
    &self,
    input: PersonInput,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Replace a person's fields, recompute their `search_field`, and rename
  /// their friend (if one exists).
  fn update_person(
    &self,
    id: Uuid,
    input: PersonInput,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  fn get_person(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  fn create_institution(
    &self,
    input: InstitutionInput,
  ) -> impl Future<Output = Result<Institution, Self::Error>> + Send + '_;

  /// Replace an institution's fields and rename its friend (if one exists).
  fn update_institution(
    &self,
    id: Uuid,
    input: InstitutionInput,
  ) -> impl Future<Output = Result<Institution, Self::Error>> + Send + '_;

  fn get_institution(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Institution>, Self::Error>> + Send + '_;

  /// The party's current display string. `None` if the party is missing.
  fn party_display(
    &self,
    party: FriendParty,
  ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send + '_;

  // ── Friends ───────────────────────────────────────────────────────────

  /// Create a friend, synthesising a code when none is given.
  fn create_friend(
    &self,
    input: NewFriend,
  ) -> impl Future<Output = Result<Friend, Self::Error>> + Send + '_;

  /// Edit a friend's addresses, notes and promoter. The code is untouched;
  /// the cached name is recomputed from the party.
  fn update_friend(
    &self,
    id: Uuid,
    input: FriendUpdate,
  ) -> impl Future<Output = Result<Friend, Self::Error>> + Send + '_;

  fn get_friend(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Friend>, Self::Error>> + Send + '_;

  fn get_friend_by_code<'a>(
    &'a self,
    code: &'a str,
  ) -> impl Future<Output = Result<Option<Friend>, Self::Error>> + Send + 'a;

  /// The friend wrapping `party`, if one has been created.
  fn friend_for_party(
    &self,
    party: FriendParty,
  ) -> impl Future<Output = Result<Option<Friend>, Self::Error>> + Send + '_;

  /// All friends, ordered by name.
  fn list_friends(
    &self,
  ) -> impl Future<Output = Result<Vec<Friend>, Self::Error>> + Send + '_;

  /// Friends whose promoter is `id`.
  fn list_promoted(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Vec<Friend>, Self::Error>> + Send + '_;

  fn search_friends<'a>(
    &'a self,
    query: &'a FriendQuery,
  ) -> impl Future<Output = Result<Vec<Friend>, Self::Error>> + Send + 'a;

  // ── Addresses ─────────────────────────────────────────────────────────

  fn create_address(
    &self,
    input: AddressInput,
  ) -> impl Future<Output = Result<Address, Self::Error>> + Send + '_;

  fn update_address(
    &self,
    id: Uuid,
    input: AddressInput,
  ) -> impl Future<Output = Result<Address, Self::Error>> + Send + '_;

  fn get_address(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Address>, Self::Error>> + Send + '_;

  fn create_official_address(
    &self,
    input: OfficialAddressInput,
  ) -> impl Future<Output = Result<OfficialAddress, Self::Error>> + Send + '_;

  fn update_official_address(
    &self,
    id: Uuid,
    input: OfficialAddressInput,
  ) -> impl Future<Output = Result<OfficialAddress, Self::Error>> + Send + '_;

  fn get_official_address(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<OfficialAddress>, Self::Error>> + Send + '_;

  /// Addresses of either kind attached to `target`.
  fn addresses_for(
    &self,
    target: EntityRef,
  ) -> impl Future<Output = Result<Attachments, Self::Error>> + Send + '_;

  /// Whether `target` resolves to an existing record.
  fn entity_exists(
    &self,
    target: EntityRef,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Contacts ──────────────────────────────────────────────────────────

  fn add_contact(
    &self,
    friend_id: Uuid,
    input: ContactInput,
  ) -> impl Future<Output = Result<Contact, Self::Error>> + Send + '_;

  fn update_contact(
    &self,
    id: Uuid,
    input: ContactInput,
  ) -> impl Future<Output = Result<Contact, Self::Error>> + Send + '_;

  fn list_contacts(
    &self,
    friend_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Contact>, Self::Error>> + Send + '_;

  fn add_contact_method(
    &self,
    contact_id: Uuid,
    input: ContactMethodInput,
  ) -> impl Future<Output = Result<ContactMethod, Self::Error>> + Send + '_;

  fn list_contact_methods(
    &self,
    contact_id: Uuid,
  ) -> impl Future<Output = Result<Vec<ContactMethod>, Self::Error>> + Send + '_;

  // ── Contributions ─────────────────────────────────────────────────────

  fn record_contribution(
    &self,
    input: NewContribution,
  ) -> impl Future<Output = Result<Contribution, Self::Error>> + Send + '_;

  /// The chronologically first successful contribution for a friend, or
  /// `None` if there is none.
  fn first_contribution(
    &self,
    friend_id: Uuid,
  ) -> impl Future<Output = Result<Option<Contribution>, Self::Error>> + Send + '_;
}
