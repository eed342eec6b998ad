//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{TimeZone as _, Utc};
use proninos_core::{
  address::{AddressInput, OfficialAddressInput, PostalFields},
  catalog::{DegreeInput, Sex, TitleInput},
  contact::{ContactInput, ContactMethodInput},
  contribution::NewContribution,
  entity::{EntityKind, EntityRef},
  friend::{Friend, FriendParty, FriendUpdate, NewFriend, PROMOTER_DEPTH_LIMIT},
  party::{InstitutionInput, Person, PersonInput},
  store::{FriendQuery, FriendStore},
};
use uuid::Uuid;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn person(s: &SqliteStore, name: &str, last_name: &str) -> Person {
  s.create_person(PersonInput::new(name, last_name)).await.unwrap()
}

async fn person_friend(s: &SqliteStore, name: &str, last_name: &str) -> Friend {
  let p = person(s, name, last_name).await;
  s.create_friend(NewFriend::new(FriendParty::Person(p.person_id)))
    .await
    .unwrap()
}

/// A friend with an explicit code, wrapping a throwaway person.
async fn coded_friend(s: &SqliteStore, code: &str) -> Friend {
  let p = person(s, "Otro", code).await;
  let mut input = NewFriend::new(FriendParty::Person(p.person_id));
  input.code = Some(code.into());
  s.create_friend(input).await.unwrap()
}

fn search(text: &str) -> FriendQuery {
  FriendQuery { text: Some(text.into()), ..FriendQuery::default() }
}

// ─── Catalogs ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_list_degrees() {
  let s = store().await;
  s.create_degree(DegreeInput::new("Ingeniero", "Ingeniera"))
    .await
    .unwrap();
  let lic = s
    .create_degree(DegreeInput::new(" Licenciado ", "Licenciada"))
    .await
    .unwrap();
  assert_eq!(lic.name_male, "Licenciado");

  let all = s.list_degrees().await.unwrap();
  let names: Vec<_> = all.iter().map(|d| d.name_male.as_str()).collect();
  assert_eq!(names, ["Ingeniero", "Licenciado"]);

  let fetched = s.get_degree(lic.degree_id).await.unwrap().unwrap();
  assert_eq!(fetched, lic);
}

#[tokio::test]
async fn duplicate_catalog_label_is_rejected() {
  let s = store().await;
  s.create_title(TitleInput::new("Señor", "Señora")).await.unwrap();
  let err = s
    .create_title(TitleInput::new("Señor", "Doña"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::DuplicateLabel { field: "title_male", .. }));
  assert_eq!(s.list_titles().await.unwrap().len(), 1);
}

#[tokio::test]
async fn blank_catalog_label_is_rejected() {
  let s = store().await;
  let err = s
    .create_degree(DegreeInput::new("  ", "Doctora"))
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    Error::Core(proninos_core::Error::Validation { field: "name_male", .. })
  ));
}

// ─── People and institutions ─────────────────────────────────────────────────

#[tokio::test]
async fn person_search_field_includes_gendered_labels() {
  let s = store().await;
  let title = s.create_title(TitleInput::new("Señor", "Señora")).await.unwrap();
  let degree = s
    .create_degree(DegreeInput::new("Ingeniero", "Ingeniera"))
    .await
    .unwrap();

  let mut input = PersonInput::new("María", "Pérez");
  input.sex = Sex::Female;
  input.courtesy_title_id = Some(title.title_id);
  input.academic_degree_id = Some(degree.degree_id);
  let p = s.create_person(input).await.unwrap();

  assert_eq!(p.search_field, "senora ingeniera maria perez");
  let display = s.party_display(FriendParty::Person(p.person_id)).await.unwrap();
  assert_eq!(display.as_deref(), Some("Señora Ingeniera María Pérez"));
}

#[tokio::test]
async fn person_with_unknown_degree_is_rejected() {
  let s = store().await;
  let mut input = PersonInput::new("Juan", "Pérez");
  input.academic_degree_id = Some(Uuid::new_v4());
  let err = s.create_person(input).await.unwrap_err();
  assert!(matches!(err, Error::NotFound { kind: EntityKind::AcademicDegree, .. }));
}

#[tokio::test]
async fn person_edit_recomputes_search_field_and_friend_name() {
  let s = store().await;
  let friend = person_friend(&s, "Juan", "Pérez").await;
  let FriendParty::Person(person_id) = friend.party else { panic!("expected a person") };

  let edited = s
    .update_person(person_id, PersonInput::new("Juan Carlos", "Pérez"))
    .await
    .unwrap();
  assert_eq!(edited.search_field, "juan carlos perez");

  let reloaded = s.get_friend(friend.friend_id).await.unwrap().unwrap();
  assert_eq!(reloaded.name, "Juan Carlos Pérez");
  assert_eq!(reloaded.code, friend.code);
}

#[tokio::test]
async fn institution_edit_renames_friend() {
  let s = store().await;
  let inst = s
    .create_institution(InstitutionInput::new("Árbol de Vida"))
    .await
    .unwrap();
  let friend = s
    .create_friend(NewFriend::new(FriendParty::Institution(inst.institution_id)))
    .await
    .unwrap();
  assert_eq!(friend.name, "Árbol de Vida");

  s.update_institution(inst.institution_id, InstitutionInput::new("Árbol de Vida A.C."))
    .await
    .unwrap();
  let reloaded = s.get_friend(friend.friend_id).await.unwrap().unwrap();
  assert_eq!(reloaded.name, "Árbol de Vida A.C.");
  assert_eq!(reloaded.code, "ARA");
}

// ─── Friend codes ────────────────────────────────────────────────────────────

#[tokio::test]
async fn friend_code_uses_name_initials() {
  let s = store().await;
  let friend = person_friend(&s, "Juan", "Pérez").await;
  assert_eq!(friend.code, "JPA");
  assert_eq!(friend.name, "Juan Pérez");
}

#[tokio::test]
async fn friend_code_skips_taken_suffixes() {
  let s = store().await;
  coded_friend(&s, "JPA").await;
  coded_friend(&s, "JPB").await;

  let friend = person_friend(&s, "Juan", "Pérez").await;
  assert_eq!(friend.code, "JPC");
}

#[tokio::test]
async fn friend_code_moves_to_numbered_suffixes() {
  let s = store().await;
  for letter in 'A'..='Z' {
    coded_friend(&s, &format!("JP{letter}")).await;
  }

  let friend = person_friend(&s, "Juan", "Pérez").await;
  assert_eq!(friend.code, "JPA0");
}

#[tokio::test]
async fn exhausted_code_space_is_an_error() {
  let s = store().await;
  for code in proninos_core::code::candidates("JP") {
    coded_friend(&s, &code).await;
  }

  let p = person(&s, "Juan", "Pérez").await;
  let err = s
    .create_friend(NewFriend::new(FriendParty::Person(p.person_id)))
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    Error::Core(proninos_core::Error::CodeSpaceExhausted(ref seed)) if seed == "JP"
  ));
}

#[tokio::test]
async fn explicit_code_is_uppercased_and_must_be_free() {
  let s = store().await;
  let first = coded_friend(&s, "zz9").await;
  assert_eq!(first.code, "ZZ9");

  let p = person(&s, "Zoe", "Zamora").await;
  let mut input = NewFriend::new(FriendParty::Person(p.person_id));
  input.code = Some("ZZ9".into());
  let err = s.create_friend(input).await.unwrap_err();
  assert!(matches!(err, Error::DuplicateCode(ref c) if c == "ZZ9"));
}

#[tokio::test]
async fn code_claimed_during_insert_is_a_duplicate() {
  let s = store().await;
  person_friend(&s, "Juan", "Pérez").await;
  let rival = s
    .create_institution(InstitutionInput::new("Rival"))
    .await
    .unwrap();
  // Another row takes JPB between synthesis and the insert.
  s.execute_raw(&format!(
    "CREATE TRIGGER claim_jpb BEFORE INSERT ON friends
     WHEN NEW.code = 'JPB' AND NEW.person_id IS NOT NULL
     BEGIN
       INSERT INTO friends (friend_id, institution_id, name, code, created_at, modified_at)
       VALUES ('{}', '{}', 'Rival', 'JPB', 'x', 'x');
     END;",
    Uuid::new_v4(),
    rival.institution_id
  ))
  .await
  .unwrap();

  let p = person(&s, "José", "Paz").await;
  let err = s
    .create_friend(NewFriend::new(FriendParty::Person(p.person_id)))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::DuplicateCode(ref c) if c == "JPB"));
  assert_eq!(s.list_friends().await.unwrap().len(), 1);
}

#[tokio::test]
async fn institution_seed_is_transliterated() {
  let s = store().await;
  let inst = s
    .create_institution(InstitutionInput::new("Árbol de Vida"))
    .await
    .unwrap();
  let friend = s
    .create_friend(NewFriend::new(FriendParty::Institution(inst.institution_id)))
    .await
    .unwrap();
  assert_eq!(friend.code, "ARA");
}

#[tokio::test]
async fn a_party_backs_at_most_one_friend() {
  let s = store().await;
  let friend = person_friend(&s, "Juan", "Pérez").await;
  let err = s
    .create_friend(NewFriend::new(friend.party))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::PartyAlreadyLinked { friend: id, .. } if id == friend.friend_id));
}

#[tokio::test]
async fn friend_for_missing_party_is_not_found() {
  let s = store().await;
  let err = s
    .create_friend(NewFriend::new(FriendParty::Person(Uuid::new_v4())))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::NotFound { kind: EntityKind::Person, .. }));
}

#[tokio::test]
async fn lookup_by_code_ignores_case_and_whitespace() {
  let s = store().await;
  let friend = person_friend(&s, "Juan", "Pérez").await;
  let found = s.get_friend_by_code(" jpa ").await.unwrap().unwrap();
  assert_eq!(found.friend_id, friend.friend_id);
  assert!(s.get_friend_by_code("JPB").await.unwrap().is_none());
}

#[tokio::test]
async fn friend_update_keeps_code() {
  let s = store().await;
  let friend = person_friend(&s, "Juan", "Pérez").await;

  let mut update = FriendUpdate::from_friend(&friend);
  update.notes = Some("  prefiere correo  ".into());
  let updated = s.update_friend(friend.friend_id, update).await.unwrap();

  assert_eq!(updated.code, "JPA");
  assert_eq!(updated.notes.as_deref(), Some("prefiere correo"));
  assert!(updated.modified_at >= friend.modified_at);
}

// ─── Catalog cascade ─────────────────────────────────────────────────────────

#[tokio::test]
async fn degree_edit_cascades_to_people_and_friends() {
  let s = store().await;
  let degree = s
    .create_degree(DegreeInput::new("Ingeniero", "Ingeniera"))
    .await
    .unwrap();

  let mut input = PersonInput::new("Juan", "Pérez");
  input.academic_degree_id = Some(degree.degree_id);
  let juan = s.create_person(input).await.unwrap();
  let friend = s
    .create_friend(NewFriend::new(FriendParty::Person(juan.person_id)))
    .await
    .unwrap();
  assert_eq!(friend.name, "Ingeniero Juan Pérez");

  let mut input = PersonInput::new("Ana", "López");
  input.sex = Sex::Female;
  input.academic_degree_id = Some(degree.degree_id);
  let ana = s.create_person(input).await.unwrap();

  let cascade = s
    .update_degree(degree.degree_id, DegreeInput::new("Ing.", "Inga."))
    .await
    .unwrap();
  assert_eq!(cascade.record.name_male, "Ing.");
  assert_eq!(cascade.people_resynced, 2);
  assert_eq!(cascade.friends_renamed, 1);

  let juan = s.get_person(juan.person_id).await.unwrap().unwrap();
  assert_eq!(juan.search_field, "ing. juan perez");
  let ana = s.get_person(ana.person_id).await.unwrap().unwrap();
  assert_eq!(ana.search_field, "inga. ana lopez");
  let friend = s.get_friend(friend.friend_id).await.unwrap().unwrap();
  assert_eq!(friend.name, "Ing. Juan Pérez");
  assert_eq!(friend.code, "JPA");
}

#[tokio::test]
async fn title_edit_cascades_to_friends() {
  let s = store().await;
  let title = s.create_title(TitleInput::new("Don", "Doña")).await.unwrap();
  let mut input = PersonInput::new("Juan", "Pérez");
  input.courtesy_title_id = Some(title.title_id);
  let juan = s.create_person(input).await.unwrap();
  let friend = s
    .create_friend(NewFriend::new(FriendParty::Person(juan.person_id)))
    .await
    .unwrap();

  let cascade = s
    .update_title(title.title_id, TitleInput::new("Sr.", "Sra."))
    .await
    .unwrap();
  assert_eq!((cascade.people_resynced, cascade.friends_renamed), (1, 1));

  let results = s.search_friends(&search("sr. juan")).await.unwrap();
  assert_eq!(results.len(), 1);
  assert_eq!(results[0].friend_id, friend.friend_id);
  assert_eq!(results[0].name, "Sr. Juan Pérez");
}

#[tokio::test]
async fn failed_cascade_leaves_everything_unchanged() {
  let s = store().await;
  let degree = s
    .create_degree(DegreeInput::new("Ingeniero", "Ingeniera"))
    .await
    .unwrap();

  let mut input = PersonInput::new("Juan", "Pérez");
  input.academic_degree_id = Some(degree.degree_id);
  let juan = s.create_person(input.clone()).await.unwrap();
  let friend = s
    .create_friend(NewFriend::new(FriendParty::Person(juan.person_id)))
    .await
    .unwrap();

  input.name = "Luis".into();
  let luis = s.create_person(input).await.unwrap();
  s.execute_raw(&format!(
    "UPDATE people SET sex = 'unknown' WHERE person_id = '{}'",
    luis.person_id
  ))
  .await
  .unwrap();

  let err = s
    .update_degree(degree.degree_id, DegreeInput::new("Ing.", "Inga."))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Decode { column: "sex", .. }));

  let degree = s.get_degree(degree.degree_id).await.unwrap().unwrap();
  assert_eq!(degree.name_male, "Ingeniero");
  let juan = s.get_person(juan.person_id).await.unwrap().unwrap();
  assert_eq!(juan.search_field, "ingeniero juan perez");
  let friend = s.get_friend(friend.friend_id).await.unwrap().unwrap();
  assert_eq!(friend.name, "Ingeniero Juan Pérez");
}

#[tokio::test]
async fn duplicate_label_on_edit_changes_nothing() {
  let s = store().await;
  s.create_degree(DegreeInput::new("Doctor", "Doctora")).await.unwrap();
  let ing = s
    .create_degree(DegreeInput::new("Ingeniero", "Ingeniera"))
    .await
    .unwrap();

  let err = s
    .update_degree(ing.degree_id, DegreeInput::new("Doctor", "Ingeniera"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::DuplicateLabel { field: "name_male", .. }));
  let reloaded = s.get_degree(ing.degree_id).await.unwrap().unwrap();
  assert_eq!(reloaded, ing);
}

// ─── Promoters ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn promoted_friends_are_listed() {
  let s = store().await;
  let promoter = person_friend(&s, "Juan", "Pérez").await;
  let p = person(&s, "Ana", "López").await;
  let mut input = NewFriend::new(FriendParty::Person(p.person_id));
  input.promoter_id = Some(promoter.friend_id);
  let ana = s.create_friend(input).await.unwrap();

  let promoted = s.list_promoted(promoter.friend_id).await.unwrap();
  assert_eq!(promoted.len(), 1);
  assert_eq!(promoted[0].friend_id, ana.friend_id);
}

#[tokio::test]
async fn promoter_cycle_is_rejected() {
  let s = store().await;
  let a = person_friend(&s, "Juan", "Pérez").await;
  let b = person_friend(&s, "Ana", "López").await;

  let mut update = FriendUpdate::from_friend(&b);
  update.promoter_id = Some(a.friend_id);
  s.update_friend(b.friend_id, update).await.unwrap();

  let mut update = FriendUpdate::from_friend(&a);
  update.promoter_id = Some(b.friend_id);
  let err = s.update_friend(a.friend_id, update).await.unwrap_err();
  assert!(matches!(err, Error::Core(proninos_core::Error::PromoterCycle { .. })));

  let mut update = FriendUpdate::from_friend(&a);
  update.promoter_id = Some(a.friend_id);
  assert!(s.update_friend(a.friend_id, update).await.is_err());

  let a = s.get_friend(a.friend_id).await.unwrap().unwrap();
  assert_eq!(a.promoter_id, None);
}

#[tokio::test]
async fn unknown_promoter_is_not_found() {
  let s = store().await;
  let p = person(&s, "Juan", "Pérez").await;
  let mut input = NewFriend::new(FriendParty::Person(p.person_id));
  input.promoter_id = Some(Uuid::new_v4());
  let err = s.create_friend(input).await.unwrap_err();
  assert!(matches!(err, Error::NotFound { kind: EntityKind::Friend, .. }));
}

/// Friends `0..len`, each promoted by the one before it, linked bottom-up so
/// every individual link is shallow.
async fn promoter_chain(s: &SqliteStore, len: usize) -> Vec<Friend> {
  let mut chain = Vec::with_capacity(len);
  for i in 0..len {
    chain.push(person_friend(s, "Juan", &format!("Pérez {i}")).await);
  }
  for i in (1..len).rev() {
    let mut update = FriendUpdate::from_friend(&chain[i]);
    update.promoter_id = Some(chain[i - 1].friend_id);
    chain[i] = s.update_friend(chain[i].friend_id, update).await.unwrap();
  }
  chain
}

#[tokio::test]
async fn deep_chain_allows_edits_that_keep_the_promoter() {
  let s = store().await;
  let chain = promoter_chain(&s, PROMOTER_DEPTH_LIMIT + 6).await;
  let last = chain.last().unwrap();

  let mut update = FriendUpdate::from_friend(last);
  update.notes = Some("llamar en enero".into());
  let saved = s.update_friend(last.friend_id, update).await.unwrap();
  assert_eq!(saved.notes.as_deref(), Some("llamar en enero"));
  assert_eq!(saved.promoter_id, last.promoter_id);
}

#[tokio::test]
async fn new_promoter_link_is_depth_bounded_on_create_and_update() {
  let s = store().await;
  let chain = promoter_chain(&s, PROMOTER_DEPTH_LIMIT + 6).await;
  let bottom = chain.last().unwrap().friend_id;
  let is_cycle =
    |err: &Error| matches!(err, Error::Core(proninos_core::Error::PromoterCycle { .. }));

  let p = person(&s, "Ana", "López").await;
  let mut input = NewFriend::new(FriendParty::Person(p.person_id));
  input.promoter_id = Some(bottom);
  let err = s.create_friend(input).await.unwrap_err();
  assert!(is_cycle(&err));

  let ana = person_friend(&s, "Ana", "López").await;
  let mut update = FriendUpdate::from_friend(&ana);
  update.promoter_id = Some(bottom);
  let err = s.update_friend(ana.friend_id, update).await.unwrap_err();
  assert!(is_cycle(&err));

  // A shallow promoter is still accepted on create.
  let p = person(&s, "Eva", "Ruiz").await;
  let mut input = NewFriend::new(FriendParty::Person(p.person_id));
  input.promoter_id = Some(chain[0].friend_id);
  s.create_friend(input).await.unwrap();
}

// ─── Search ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn search_ignores_accents_and_case() {
  let s = store().await;
  let juan = person_friend(&s, "Juan", "Pérez").await;
  person_friend(&s, "Ana", "López").await;

  for text in ["perez", "PÉREZ", "juan pé"] {
    let results = s.search_friends(&search(text)).await.unwrap();
    assert_eq!(results.len(), 1, "query {text:?}");
    assert_eq!(results[0].friend_id, juan.friend_id);
  }
}

#[tokio::test]
async fn search_matches_code_and_institutions() {
  let s = store().await;
  let juan = person_friend(&s, "Juan", "Pérez").await;
  let inst = s
    .create_institution(InstitutionInput::new("Fundación Sol"))
    .await
    .unwrap();
  let sol = s
    .create_friend(NewFriend::new(FriendParty::Institution(inst.institution_id)))
    .await
    .unwrap();

  let by_code = s.search_friends(&search("jpa")).await.unwrap();
  assert_eq!(by_code.len(), 1);
  assert_eq!(by_code[0].friend_id, juan.friend_id);

  let by_name = s.search_friends(&search("fundacion")).await.unwrap();
  assert_eq!(by_name.len(), 1);
  assert_eq!(by_name[0].friend_id, sol.friend_id);
}

#[tokio::test]
async fn search_treats_wildcards_literally() {
  let s = store().await;
  person_friend(&s, "Juan", "Pérez").await;
  assert!(s.search_friends(&search("%")).await.unwrap().is_empty());
  assert!(s.search_friends(&search("_")).await.unwrap().is_empty());
}

#[tokio::test]
async fn search_can_skip_inactive_parties() {
  let s = store().await;
  person_friend(&s, "Juan", "Pérez").await;
  let mut input = PersonInput::new("Juana", "Pérez");
  input.active = false;
  let p = s.create_person(input).await.unwrap();
  s.create_friend(NewFriend::new(FriendParty::Person(p.person_id)))
    .await
    .unwrap();

  let all = s.search_friends(&search("perez")).await.unwrap();
  assert_eq!(all.len(), 2);

  let query = FriendQuery { active_only: true, ..search("perez") };
  let active = s.search_friends(&query).await.unwrap();
  assert_eq!(active.len(), 1);
  assert_eq!(active[0].name, "Juan Pérez");
}

#[tokio::test]
async fn search_pages_in_name_order() {
  let s = store().await;
  for name in ["Carla", "Ana", "Beto"] {
    person_friend(&s, name, "Pérez").await;
  }
  let query = FriendQuery { limit: Some(2), offset: Some(1), ..search("perez") };
  let page: Vec<_> = s
    .search_friends(&query)
    .await
    .unwrap()
    .into_iter()
    .map(|f| f.name)
    .collect();
  assert_eq!(page, ["Beto Pérez", "Carla Pérez"]);
}

// ─── Addresses ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn addresses_attach_to_any_record() {
  let s = store().await;
  let friend = person_friend(&s, "Juan", "Pérez").await;
  let target = EntityRef::new(EntityKind::Friend, friend.friend_id);

  let address = s
    .create_address(AddressInput {
      postal:      PostalFields {
        street: Some("Reforma".into()),
        city: Some("CDMX".into()),
        zip_code: Some(" ".into()),
        ..PostalFields::default()
      },
      attached_to: Some(target),
    })
    .await
    .unwrap();
  assert_eq!(address.display(), "Reforma CDMX");
  assert_eq!(address.postal.zip_code, None);

  let official = s
    .create_official_address(OfficialAddressInput {
      attached_to: Some(target),
      ..OfficialAddressInput::new("vecj880326p76")
    })
    .await
    .unwrap();
  assert_eq!(official.rfc, "VECJ880326P76");

  let attachments = s.addresses_for(target).await.unwrap();
  assert_eq!(attachments.addresses, [address]);
  assert_eq!(attachments.official, [official]);
}

#[tokio::test]
async fn dangling_attachment_is_rejected() {
  let s = store().await;
  let target = EntityRef::new(EntityKind::Institution, Uuid::new_v4());
  let err = s
    .create_address(AddressInput { attached_to: Some(target), ..AddressInput::default() })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::DanglingAttachment(t) if t == target));
}

#[tokio::test]
async fn invalid_rfc_is_rejected() {
  let s = store().await;
  let err = s
    .create_official_address(OfficialAddressInput::new("VECJ880230P76"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Core(proninos_core::Error::InvalidRfc(_))));
}

#[tokio::test]
async fn friend_links_delivery_and_official_addresses() {
  let s = store().await;
  let friend = person_friend(&s, "Juan", "Pérez").await;
  let delivery = s.create_address(AddressInput::default()).await.unwrap();
  let official = s
    .create_official_address(OfficialAddressInput::new("PEJ900101AB1"))
    .await
    .unwrap();

  let mut update = FriendUpdate::from_friend(&friend);
  update.delivery_address_id = Some(delivery.address_id);
  update.official_address_id = Some(official.official_address_id);
  let updated = s.update_friend(friend.friend_id, update).await.unwrap();
  assert_eq!(updated.delivery_address_id, Some(delivery.address_id));
  assert_eq!(updated.official_address_id, Some(official.official_address_id));

  let mut update = FriendUpdate::from_friend(&updated);
  update.delivery_address_id = Some(Uuid::new_v4());
  let err = s.update_friend(friend.friend_id, update).await.unwrap_err();
  assert!(matches!(err, Error::NotFound { kind: EntityKind::Address, .. }));
}

#[tokio::test]
async fn entity_exists_resolves_every_kind() {
  let s = store().await;
  let friend = person_friend(&s, "Juan", "Pérez").await;
  assert!(
    s.entity_exists(EntityRef::new(EntityKind::Friend, friend.friend_id))
      .await
      .unwrap()
  );
  assert!(
    !s.entity_exists(EntityRef::new(EntityKind::Contact, friend.friend_id))
      .await
      .unwrap()
  );
}

// ─── Contacts ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn contacts_and_methods() {
  let s = store().await;
  let friend = person_friend(&s, "Juan", "Pérez").await;

  let mut input = ContactInput::new("Marta Ruiz");
  input.send_correspondence = true;
  let marta = s.add_contact(friend.friend_id, input).await.unwrap();
  s.add_contact(friend.friend_id, ContactInput::new("Ana Gil"))
    .await
    .unwrap();

  let names: Vec<_> = s
    .list_contacts(friend.friend_id)
    .await
    .unwrap()
    .into_iter()
    .map(|c| c.name)
    .collect();
  assert_eq!(names, ["Ana Gil", "Marta Ruiz"]);

  let method = s
    .add_contact_method(marta.contact_id, ContactMethodInput::new("Celular", "5512345678"))
    .await
    .unwrap();
  let methods = s.list_contact_methods(marta.contact_id).await.unwrap();
  assert_eq!(methods, [method]);

  let mut edit = ContactInput::new("Marta Ruiz");
  edit.position = Some("Directora".into());
  let edited = s.update_contact(marta.contact_id, edit).await.unwrap();
  assert_eq!(edited.display(), "Marta Ruiz Directora");
  assert!(!edited.send_correspondence);
}

#[tokio::test]
async fn contact_for_missing_friend_is_not_found() {
  let s = store().await;
  let err = s
    .add_contact(Uuid::new_v4(), ContactInput::new("Marta Ruiz"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::NotFound { kind: EntityKind::Friend, .. }));
}

// ─── Contributions ───────────────────────────────────────────────────────────

#[tokio::test]
async fn first_contribution_is_earliest_success() {
  let s = store().await;
  let friend = person_friend(&s, "Juan", "Pérez").await;
  assert!(s.first_contribution(friend.friend_id).await.unwrap().is_none());

  let at = |day| Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap();
  let contribute = |day, success| NewContribution {
    friend_id: friend.friend_id,
    amount: "500.00".into(),
    success,
    created_at: Some(at(day)),
  };

  s.record_contribution(contribute(1, false)).await.unwrap();
  assert!(s.first_contribution(friend.friend_id).await.unwrap().is_none());

  s.record_contribution(contribute(9, true)).await.unwrap();
  let earliest = s.record_contribution(contribute(5, true)).await.unwrap();

  let first = s.first_contribution(friend.friend_id).await.unwrap().unwrap();
  assert_eq!(first, earliest);
  assert_eq!(first.created_at, at(5));
}

#[tokio::test]
async fn contribution_for_missing_friend_is_not_found() {
  let s = store().await;
  let err = s
    .record_contribution(NewContribution {
      friend_id:  Uuid::new_v4(),
      amount:     "100".into(),
      success:    true,
      created_at: None,
    })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::NotFound { kind: EntityKind::Friend, .. }));
}

// ─── Persistence ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn reopening_a_file_keeps_records() {
  let path = std::env::temp_dir().join(format!("proninos-{}.db", Uuid::new_v4()));
  let friend = {
    let s = SqliteStore::open(&path).await.unwrap();
    person_friend(&s, "Juan", "Pérez").await
  };

  let s = SqliteStore::open(&path).await.unwrap();
  let reloaded = s.get_friend(friend.friend_id).await.unwrap().unwrap();
  assert_eq!(reloaded, friend);
  drop(s);
  let _ = std::fs::remove_file(&path);
}
