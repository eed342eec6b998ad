//! [`SqliteStore`], the SQLite implementation of [`FriendStore`].

use std::path::Path;

use proninos_core::{
  address::{Address, AddressInput, OfficialAddress, OfficialAddressInput},
  catalog::{AcademicDegree, CourtesyTitle, DegreeInput, TitleInput},
  contact::{Contact, ContactInput, ContactMethod, ContactMethodInput},
  contribution::{Contribution, NewContribution},
  entity::EntityRef,
  friend::{Friend, FriendParty, FriendUpdate, NewFriend},
  party::{Institution, InstitutionInput, Person, PersonInput},
  store::{Attachments, Cascade, FriendQuery, FriendStore},
};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
  Result, address,
  catalog::{self, CatalogRecord},
  contact, contribution, friend, party, registry,
  schema::SCHEMA,
  sync,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Proninos registry backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref().to_owned();
    let conn = tokio_rusqlite::Connection::open(&path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    info!(path = %path.display(), "opened registry");
    Ok(store)
  }

  /// Open an in-memory store; useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run `f` inside an immediate transaction, committing only if it succeeds.
  ///
  /// Every write goes through here, so a write and all the denormalized
  /// values it refreshes land together or not at all.
  async fn write<T, F>(&self, f: F) -> Result<T>
  where
    F: FnOnce(&Transaction<'_>) -> Result<T> + Send + 'static,
    T: Send + 'static,
  {
    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let outcome = f(&tx);
        if outcome.is_ok() {
          tx.commit()?;
        }
        Ok(outcome)
      })
      .await?;
    outcome
  }

  async fn read<T, F>(&self, f: F) -> Result<T>
  where
    F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    T: Send + 'static,
  {
    self.conn.call(move |conn| Ok(f(conn))).await?
  }

  /// Run raw SQL outside the domain checks.
  #[cfg(test)]
  pub(crate) async fn execute_raw(&self, sql: &str) -> Result<()> {
    let sql = sql.to_owned();
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(&sql)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── FriendStore impl ────────────────────────────────────────────────────────

impl FriendStore for SqliteStore {
  type Error = crate::Error;

  // ── Catalogs ──────────────────────────────────────────────────────────────

  async fn create_degree(&self, input: DegreeInput) -> Result<AcademicDegree> {
    let input = input.validated()?;
    self
      .write(move |tx| catalog::insert(tx, &input.name_male, &input.name_female))
      .await
  }

  async fn update_degree(&self, id: Uuid, input: DegreeInput) -> Result<Cascade<AcademicDegree>> {
    let input = input.validated()?;
    self
      .write(move |tx| {
        let record: AcademicDegree =
          catalog::update(tx, id, &input.name_male, &input.name_female)?;
        let report = sync::catalog_saved(tx, AcademicDegree::TABLE, id)?;
        Ok(Cascade {
          record,
          people_resynced: report.people,
          friends_renamed: report.friends,
        })
      })
      .await
  }

  async fn get_degree(&self, id: Uuid) -> Result<Option<AcademicDegree>> {
    self.read(move |conn| catalog::get(conn, id)).await
  }

  async fn list_degrees(&self) -> Result<Vec<AcademicDegree>> {
    self.read(|conn| catalog::list(conn)).await
  }

  async fn create_title(&self, input: TitleInput) -> Result<CourtesyTitle> {
    let input = input.validated()?;
    self
      .write(move |tx| catalog::insert(tx, &input.title_male, &input.title_female))
      .await
  }

  async fn update_title(&self, id: Uuid, input: TitleInput) -> Result<Cascade<CourtesyTitle>> {
    let input = input.validated()?;
    self
      .write(move |tx| {
        let record: CourtesyTitle =
          catalog::update(tx, id, &input.title_male, &input.title_female)?;
        let report = sync::catalog_saved(tx, CourtesyTitle::TABLE, id)?;
        Ok(Cascade {
          record,
          people_resynced: report.people,
          friends_renamed: report.friends,
        })
      })
      .await
  }

  async fn get_title(&self, id: Uuid) -> Result<Option<CourtesyTitle>> {
    self.read(move |conn| catalog::get(conn, id)).await
  }

  async fn list_titles(&self) -> Result<Vec<CourtesyTitle>> {
    self.read(|conn| catalog::list(conn)).await
  }

  // ── Parties ───────────────────────────────────────────────────────────────

  async fn create_person(&self, input: PersonInput) -> Result<Person> {
    self.write(move |tx| party::insert_person(tx, input)).await
  }

  async fn update_person(&self, id: Uuid, input: PersonInput) -> Result<Person> {
    self
      .write(move |tx| {
        let person = party::update_person(tx, id, input)?;
        if sync::person_saved(tx, &person)? {
          debug!(person = %id, "renamed friend after person edit");
        }
        Ok(person)
      })
      .await
  }

  async fn get_person(&self, id: Uuid) -> Result<Option<Person>> {
    self.read(move |conn| party::get_person(conn, id)).await
  }

  async fn create_institution(&self, input: InstitutionInput) -> Result<Institution> {
    self.write(move |tx| party::insert_institution(tx, input)).await
  }

  async fn update_institution(&self, id: Uuid, input: InstitutionInput) -> Result<Institution> {
    self
      .write(move |tx| {
        let institution = party::update_institution(tx, id, input)?;
        if sync::institution_saved(tx, &institution)? {
          debug!(institution = %id, "renamed friend after institution edit");
        }
        Ok(institution)
      })
      .await
  }

  async fn get_institution(&self, id: Uuid) -> Result<Option<Institution>> {
    self.read(move |conn| party::get_institution(conn, id)).await
  }

  async fn party_display(&self, party: FriendParty) -> Result<Option<String>> {
    self.read(move |conn| party::party_display(conn, party)).await
  }

  // ── Friends ───────────────────────────────────────────────────────────────

  async fn create_friend(&self, input: NewFriend) -> Result<Friend> {
    let friend = self.write(move |tx| friend::insert(tx, input)).await?;
    info!(friend = %friend.friend_id, code = %friend.code, "created friend");
    Ok(friend)
  }

  async fn update_friend(&self, id: Uuid, input: FriendUpdate) -> Result<Friend> {
    self.write(move |tx| friend::update(tx, id, input)).await
  }

  async fn get_friend(&self, id: Uuid) -> Result<Option<Friend>> {
    self.read(move |conn| friend::get(conn, id)).await
  }

  async fn get_friend_by_code<'a>(&'a self, code: &'a str) -> Result<Option<Friend>> {
    let code = code.to_owned();
    self.read(move |conn| friend::get_by_code(conn, &code)).await
  }

  async fn friend_for_party(&self, party: FriendParty) -> Result<Option<Friend>> {
    self.read(move |conn| friend::for_party(conn, party)).await
  }

  async fn list_friends(&self) -> Result<Vec<Friend>> {
    self.read(|conn| friend::list(conn)).await
  }

  async fn list_promoted(&self, id: Uuid) -> Result<Vec<Friend>> {
    self.read(move |conn| friend::list_promoted(conn, id)).await
  }

  async fn search_friends<'a>(&'a self, query: &'a FriendQuery) -> Result<Vec<Friend>> {
    let query = query.clone();
    self.read(move |conn| friend::search(conn, &query)).await
  }

  // ── Addresses ─────────────────────────────────────────────────────────────

  async fn create_address(&self, input: AddressInput) -> Result<Address> {
    self.write(move |tx| address::insert_address(tx, input)).await
  }

  async fn update_address(&self, id: Uuid, input: AddressInput) -> Result<Address> {
    self.write(move |tx| address::update_address(tx, id, input)).await
  }

  async fn get_address(&self, id: Uuid) -> Result<Option<Address>> {
    self.read(move |conn| address::get_address(conn, id)).await
  }

  async fn create_official_address(&self, input: OfficialAddressInput) -> Result<OfficialAddress> {
    self.write(move |tx| address::insert_official(tx, input)).await
  }

  async fn update_official_address(
    &self,
    id: Uuid,
    input: OfficialAddressInput,
  ) -> Result<OfficialAddress> {
    self.write(move |tx| address::update_official(tx, id, input)).await
  }

  async fn get_official_address(&self, id: Uuid) -> Result<Option<OfficialAddress>> {
    self.read(move |conn| address::get_official(conn, id)).await
  }

  async fn addresses_for(&self, target: EntityRef) -> Result<Attachments> {
    self.read(move |conn| address::attached_to(conn, target)).await
  }

  async fn entity_exists(&self, target: EntityRef) -> Result<bool> {
    self.read(move |conn| registry::exists(conn, target)).await
  }

  // ── Contacts ──────────────────────────────────────────────────────────────

  async fn add_contact(&self, friend_id: Uuid, input: ContactInput) -> Result<Contact> {
    self.write(move |tx| contact::insert(tx, friend_id, input)).await
  }

  async fn update_contact(&self, id: Uuid, input: ContactInput) -> Result<Contact> {
    self.write(move |tx| contact::update(tx, id, input)).await
  }

  async fn list_contacts(&self, friend_id: Uuid) -> Result<Vec<Contact>> {
    self.read(move |conn| contact::list(conn, friend_id)).await
  }

  async fn add_contact_method(
    &self,
    contact_id: Uuid,
    input: ContactMethodInput,
  ) -> Result<ContactMethod> {
    self
      .write(move |tx| contact::insert_method(tx, contact_id, input))
      .await
  }

  async fn list_contact_methods(&self, contact_id: Uuid) -> Result<Vec<ContactMethod>> {
    self.read(move |conn| contact::list_methods(conn, contact_id)).await
  }

  // ── Contributions ─────────────────────────────────────────────────────────

  async fn record_contribution(&self, input: NewContribution) -> Result<Contribution> {
    self.write(move |tx| contribution::insert(tx, input)).await
  }

  async fn first_contribution(&self, friend_id: Uuid) -> Result<Option<Contribution>> {
    self.read(move |conn| contribution::first(conn, friend_id)).await
  }
}
