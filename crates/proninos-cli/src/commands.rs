//! Subcommands and their dispatch onto [`FriendStore`].

use anyhow::{Context as _, bail};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Subcommand};
use proninos_core::{
  address::{AddressInput, OfficialAddressInput, PostalFields},
  catalog::{DegreeInput, Sex, TitleInput},
  contact::{ContactInput, ContactMethodInput},
  contribution::NewContribution,
  entity::{EntityKind, EntityRef},
  friend::{FriendParty, FriendUpdate, NewFriend},
  party::{InstitutionInput, PersonInput},
  store::{FriendQuery, FriendStore},
};
use serde::Serialize;
use uuid::Uuid;

// ─── Command tree ─────────────────────────────────────────────────────────────

#[derive(Subcommand)]
pub enum Command {
  /// Academic degrees (gendered labels shown before a person's name).
  #[command(subcommand)]
  Degree(CatalogCommand),
  /// Courtesy titles (gendered salutations).
  #[command(subcommand)]
  Title(CatalogCommand),
  #[command(subcommand)]
  Person(PersonCommand),
  #[command(subcommand)]
  Institution(InstitutionCommand),
  #[command(subcommand)]
  Friend(FriendCommand),
  #[command(subcommand)]
  Address(AddressCommand),
  #[command(subcommand)]
  Contact(ContactCommand),
  /// Record a contribution received from a friend.
  Contribute {
    friend: Uuid,
    amount: String,
    /// Record the contribution as failed (e.g. a rejected charge).
    #[arg(long)]
    failed: bool,
    /// When the contribution was made (RFC 3339); defaults to now.
    #[arg(long)]
    at:     Option<DateTime<Utc>>,
  },
}

#[derive(Subcommand)]
pub enum CatalogCommand {
  Add {
    male:   String,
    female: String,
  },
  /// Change both labels; every person using the entry is refreshed.
  Edit {
    id:     Uuid,
    male:   String,
    female: String,
  },
  Show {
    id: Uuid,
  },
  List,
}

#[derive(Subcommand)]
pub enum PersonCommand {
  Add(PersonArgs),
  /// Replace every field of a person.
  Edit {
    id:     Uuid,
    #[command(flatten)]
    fields: PersonArgs,
  },
  Show {
    id: Uuid,
  },
}

#[derive(Args)]
pub struct PersonArgs {
  name:      String,
  last_name: String,
  #[arg(long)]
  title:     Option<Uuid>,
  #[arg(long)]
  degree:    Option<Uuid>,
  #[arg(long, default_value = "male")]
  sex:       Sex,
  #[arg(long)]
  telephone: Option<String>,
  #[arg(long)]
  email:     Option<String>,
  /// Date of birth as YYYY-MM-DD.
  #[arg(long)]
  birthdate: Option<NaiveDate>,
  #[arg(long)]
  company:   Option<String>,
  #[arg(long)]
  position:  Option<String>,
  #[arg(long)]
  inactive:  bool,
}

impl From<PersonArgs> for PersonInput {
  fn from(args: PersonArgs) -> Self {
    Self {
      name:               args.name,
      last_name:          args.last_name,
      courtesy_title_id:  args.title,
      academic_degree_id: args.degree,
      sex:                args.sex,
      telephone:          args.telephone,
      email:              args.email,
      birthdate:          args.birthdate,
      company:            args.company,
      position:           args.position,
      active:             !args.inactive,
    }
  }
}

#[derive(Subcommand)]
pub enum InstitutionCommand {
  Add(InstitutionArgs),
  /// Replace every field of an institution.
  Edit {
    id:     Uuid,
    #[command(flatten)]
    fields: InstitutionArgs,
  },
  Show {
    id: Uuid,
  },
}

#[derive(Args)]
pub struct InstitutionArgs {
  name:      String,
  #[arg(long)]
  email:     Option<String>,
  #[arg(long)]
  telephone: Option<String>,
  #[arg(long)]
  web_page:  Option<String>,
  #[arg(long)]
  inactive:  bool,
}

impl From<InstitutionArgs> for InstitutionInput {
  fn from(args: InstitutionArgs) -> Self {
    Self {
      name:      args.name,
      email:     args.email,
      telephone: args.telephone,
      web_page:  args.web_page,
      active:    !args.inactive,
    }
  }
}

#[derive(Subcommand)]
pub enum FriendCommand {
  /// Create a friend for a person or an institution.
  Add {
    #[arg(long, conflicts_with = "institution", required_unless_present = "institution")]
    person:           Option<Uuid>,
    #[arg(long)]
    institution:      Option<Uuid>,
    /// Use this code instead of synthesising one.
    #[arg(long)]
    code:             Option<String>,
    #[arg(long)]
    promoter:         Option<Uuid>,
    #[arg(long)]
    official_address: Option<Uuid>,
    #[arg(long)]
    delivery_address: Option<Uuid>,
    #[arg(long)]
    notes:            Option<String>,
    #[arg(long)]
    temp_key:         Option<String>,
  },
  /// Change the given fields; the code never changes.
  Edit {
    id:      Uuid,
    #[command(flatten)]
    changes: FriendEditArgs,
  },
  /// Show a friend by id or by code.
  Show {
    key: String,
  },
  List,
  Search {
    text:        Option<String>,
    #[arg(long)]
    active_only: bool,
    #[arg(long)]
    limit:       Option<usize>,
    #[arg(long)]
    offset:      Option<usize>,
  },
  /// Friends brought in by the given friend.
  Promoted {
    id: Uuid,
  },
  FirstContribution {
    id: Uuid,
  },
  /// Addresses attached to a friend.
  Addresses {
    id: Uuid,
  },
}

/// Field changes for `friend edit`. Unset flags keep the current value;
/// each `--no-*` flag clears its field.
#[derive(Args)]
pub struct FriendEditArgs {
  #[arg(long, conflicts_with = "no_promoter")]
  promoter:            Option<Uuid>,
  #[arg(long)]
  no_promoter:         bool,
  #[arg(long, conflicts_with = "no_official_address")]
  official_address:    Option<Uuid>,
  #[arg(long)]
  no_official_address: bool,
  #[arg(long, conflicts_with = "no_delivery_address")]
  delivery_address:    Option<Uuid>,
  #[arg(long)]
  no_delivery_address: bool,
  #[arg(long, conflicts_with = "no_notes")]
  notes:               Option<String>,
  #[arg(long)]
  no_notes:            bool,
  #[arg(long, conflicts_with = "no_temp_key")]
  temp_key:            Option<String>,
  #[arg(long)]
  no_temp_key:         bool,
}

impl FriendEditArgs {
  fn apply(self, update: &mut FriendUpdate) {
    change(&mut update.promoter_id, self.promoter, self.no_promoter);
    change(&mut update.official_address_id, self.official_address, self.no_official_address);
    change(&mut update.delivery_address_id, self.delivery_address, self.no_delivery_address);
    change(&mut update.notes, self.notes, self.no_notes);
    change(&mut update.temp_key, self.temp_key, self.no_temp_key);
  }
}

fn change<T>(slot: &mut Option<T>, value: Option<T>, clear: bool) {
  if clear {
    *slot = None;
  } else if value.is_some() {
    *slot = value;
  }
}

#[derive(Subcommand)]
pub enum AddressCommand {
  Add {
    #[command(flatten)]
    postal: PostalArgs,
    #[command(flatten)]
    attach: AttachArgs,
  },
  /// Add an official (fiscal) address.
  AddOfficial {
    rfc:    String,
    #[arg(long)]
    name:   Option<String>,
    #[arg(long)]
    email:  Option<String>,
    #[command(flatten)]
    postal: PostalArgs,
    #[command(flatten)]
    attach: AttachArgs,
  },
  Show {
    id: Uuid,
  },
  ShowOfficial {
    id: Uuid,
  },
  /// Every address attached to a record.
  For {
    kind: EntityKind,
    id:   Uuid,
  },
}

#[derive(Args)]
pub struct PostalArgs {
  #[arg(long)]
  street:          Option<String>,
  #[arg(long)]
  external_number: Option<String>,
  #[arg(long)]
  internal_number: Option<String>,
  #[arg(long)]
  suburb:          Option<String>,
  #[arg(long)]
  locality:        Option<String>,
  #[arg(long)]
  city:            Option<String>,
  #[arg(long)]
  reference:       Option<String>,
  #[arg(long)]
  state:           Option<String>,
  #[arg(long)]
  country:         Option<String>,
  #[arg(long)]
  zip_code:        Option<String>,
}

impl From<PostalArgs> for PostalFields {
  fn from(args: PostalArgs) -> Self {
    Self {
      street:          args.street,
      external_number: args.external_number,
      internal_number: args.internal_number,
      suburb:          args.suburb,
      locality:        args.locality,
      city:            args.city,
      reference:       args.reference,
      state:           args.state,
      country:         args.country,
      zip_code:        args.zip_code,
    }
  }
}

#[derive(Args)]
pub struct AttachArgs {
  /// Kind of record to attach the address to, e.g. `friend`.
  #[arg(long, requires = "attach_id")]
  attach_kind: Option<EntityKind>,
  #[arg(long, requires = "attach_kind")]
  attach_id:   Option<Uuid>,
}

impl AttachArgs {
  fn target(&self) -> Option<EntityRef> {
    Some(EntityRef::new(self.attach_kind?, self.attach_id?))
  }
}

#[derive(Subcommand)]
pub enum ContactCommand {
  Add {
    friend:              Uuid,
    name:                String,
    #[arg(long)]
    position:            Option<String>,
    #[arg(long)]
    company:             Option<String>,
    #[arg(long)]
    send_correspondence: bool,
  },
  Edit {
    id:                  Uuid,
    name:                String,
    #[arg(long)]
    position:            Option<String>,
    #[arg(long)]
    company:             Option<String>,
    #[arg(long)]
    send_correspondence: bool,
  },
  /// Contacts of a friend.
  List {
    friend: Uuid,
  },
  /// Add a way of reaching a contact, e.g. `Celular 5512345678`.
  AddMethod {
    contact:     Uuid,
    method:      String,
    information: String,
  },
  Methods {
    contact: Uuid,
  },
}

// ─── Dispatch ─────────────────────────────────────────────────────────────────

fn print<T: Serialize>(value: &T) -> anyhow::Result<()> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}

/// Print `value`, or fail if the lookup found nothing.
fn print_found<T: Serialize>(value: Option<T>, what: &str) -> anyhow::Result<()> {
  match value {
    Some(v) => print(&v),
    None => bail!("{what} not found"),
  }
}

pub async fn run<S>(store: &S, command: Command) -> anyhow::Result<()>
where
  S: FriendStore,
{
  match command {
    Command::Degree(cmd) => degree(store, cmd).await,
    Command::Title(cmd) => title(store, cmd).await,
    Command::Person(cmd) => person(store, cmd).await,
    Command::Institution(cmd) => institution(store, cmd).await,
    Command::Friend(cmd) => friend(store, cmd).await,
    Command::Address(cmd) => address(store, cmd).await,
    Command::Contact(cmd) => contact(store, cmd).await,
    Command::Contribute { friend, amount, failed, at } => print(
      &store
        .record_contribution(NewContribution {
          friend_id: friend,
          amount,
          success: !failed,
          created_at: at,
        })
        .await?,
    ),
  }
}

async fn degree<S: FriendStore>(store: &S, cmd: CatalogCommand) -> anyhow::Result<()> {
  match cmd {
    CatalogCommand::Add { male, female } => {
      print(&store.create_degree(DegreeInput::new(male, female)).await?)
    }
    CatalogCommand::Edit { id, male, female } => {
      print(&store.update_degree(id, DegreeInput::new(male, female)).await?)
    }
    CatalogCommand::Show { id } => print_found(store.get_degree(id).await?, "degree"),
    CatalogCommand::List => print(&store.list_degrees().await?),
  }
}

async fn title<S: FriendStore>(store: &S, cmd: CatalogCommand) -> anyhow::Result<()> {
  match cmd {
    CatalogCommand::Add { male, female } => {
      print(&store.create_title(TitleInput::new(male, female)).await?)
    }
    CatalogCommand::Edit { id, male, female } => {
      print(&store.update_title(id, TitleInput::new(male, female)).await?)
    }
    CatalogCommand::Show { id } => print_found(store.get_title(id).await?, "title"),
    CatalogCommand::List => print(&store.list_titles().await?),
  }
}

async fn person<S: FriendStore>(store: &S, cmd: PersonCommand) -> anyhow::Result<()> {
  match cmd {
    PersonCommand::Add(args) => print(&store.create_person(args.into()).await?),
    PersonCommand::Edit { id, fields } => print(&store.update_person(id, fields.into()).await?),
    PersonCommand::Show { id } => print_found(store.get_person(id).await?, "person"),
  }
}

async fn institution<S: FriendStore>(store: &S, cmd: InstitutionCommand) -> anyhow::Result<()> {
  match cmd {
    InstitutionCommand::Add(args) => print(&store.create_institution(args.into()).await?),
    InstitutionCommand::Edit { id, fields } => {
      print(&store.update_institution(id, fields.into()).await?)
    }
    InstitutionCommand::Show { id } => {
      print_found(store.get_institution(id).await?, "institution")
    }
  }
}

async fn friend<S: FriendStore>(store: &S, cmd: FriendCommand) -> anyhow::Result<()> {
  match cmd {
    FriendCommand::Add {
      person,
      institution,
      code,
      promoter,
      official_address,
      delivery_address,
      notes,
      temp_key,
    } => {
      let party = match (person, institution) {
        (Some(id), _) => FriendParty::Person(id),
        (None, Some(id)) => FriendParty::Institution(id),
        (None, None) => bail!("either --person or --institution is required"),
      };
      let input = NewFriend {
        code,
        promoter_id: promoter,
        official_address_id: official_address,
        delivery_address_id: delivery_address,
        notes,
        temp_key,
        ..NewFriend::new(party)
      };
      print(&store.create_friend(input).await?)
    }
    FriendCommand::Edit { id, changes } => {
      let current = store
        .get_friend(id)
        .await?
        .with_context(|| format!("friend {id} not found"))?;
      let mut update = FriendUpdate::from_friend(&current);
      changes.apply(&mut update);
      print(&store.update_friend(id, update).await?)
    }
    FriendCommand::Show { key } => {
      let found = match Uuid::parse_str(&key) {
        Ok(id) => store.get_friend(id).await?,
        Err(_) => store.get_friend_by_code(&key).await?,
      };
      print_found(found, "friend")
    }
    FriendCommand::List => print(&store.list_friends().await?),
    FriendCommand::Search { text, active_only, limit, offset } => {
      let query = FriendQuery { text, active_only, limit, offset };
      print(&store.search_friends(&query).await?)
    }
    FriendCommand::Promoted { id } => print(&store.list_promoted(id).await?),
    FriendCommand::FirstContribution { id } => print(&store.first_contribution(id).await?),
    FriendCommand::Addresses { id } => {
      print(&store.addresses_for(EntityRef::new(EntityKind::Friend, id)).await?)
    }
  }
}

async fn address<S: FriendStore>(store: &S, cmd: AddressCommand) -> anyhow::Result<()> {
  match cmd {
    AddressCommand::Add { postal, attach } => {
      let input = AddressInput { postal: postal.into(), attached_to: attach.target() };
      print(&store.create_address(input).await?)
    }
    AddressCommand::AddOfficial { rfc, name, email, postal, attach } => {
      let input = OfficialAddressInput {
        rfc,
        name,
        email,
        postal: postal.into(),
        attached_to: attach.target(),
      };
      print(&store.create_official_address(input).await?)
    }
    AddressCommand::Show { id } => print_found(store.get_address(id).await?, "address"),
    AddressCommand::ShowOfficial { id } => {
      print_found(store.get_official_address(id).await?, "official address")
    }
    AddressCommand::For { kind, id } => {
      print(&store.addresses_for(EntityRef::new(kind, id)).await?)
    }
  }
}

async fn contact<S: FriendStore>(store: &S, cmd: ContactCommand) -> anyhow::Result<()> {
  match cmd {
    ContactCommand::Add { friend, name, position, company, send_correspondence } => {
      let input = ContactInput { name, position, company, send_correspondence };
      print(&store.add_contact(friend, input).await?)
    }
    ContactCommand::Edit { id, name, position, company, send_correspondence } => {
      let input = ContactInput { name, position, company, send_correspondence };
      print(&store.update_contact(id, input).await?)
    }
    ContactCommand::List { friend } => print(&store.list_contacts(friend).await?),
    ContactCommand::AddMethod { contact, method, information } => print(
      &store
        .add_contact_method(contact, ContactMethodInput::new(method, information))
        .await?,
    ),
    ContactCommand::Methods { contact } => print(&store.list_contact_methods(contact).await?),
  }
}

#[cfg(test)]
mod tests {
  use clap::Parser;

  use super::*;

  #[derive(Parser)]
  struct Harness {
    #[command(subcommand)]
    command: Command,
  }

  fn parse(args: &[&str]) -> Command {
    Harness::try_parse_from(std::iter::once("proninos").chain(args.iter().copied()))
      .unwrap()
      .command
  }

  #[test]
  fn person_flags_map_onto_input() {
    let Command::Person(PersonCommand::Add(args)) = parse(&[
      "person", "add", "María", "Pérez", "--sex", "female", "--birthdate", "1988-03-26",
      "--inactive",
    ]) else {
      panic!("expected person add");
    };
    let input = PersonInput::from(args);
    assert_eq!(input.sex, Sex::Female);
    assert_eq!(input.birthdate, NaiveDate::from_ymd_opt(1988, 3, 26));
    assert!(!input.active);
  }

  #[test]
  fn friend_add_needs_a_party() {
    let parsed = Harness::try_parse_from(["proninos", "friend", "add"]);
    assert!(parsed.is_err());
  }

  #[test]
  fn attachment_needs_kind_and_id() {
    let id = Uuid::new_v4().to_string();
    let Command::Address(AddressCommand::Add { attach, .. }) =
      parse(&["address", "add", "--attach-kind", "friend", "--attach-id", &id])
    else {
      panic!("expected address add");
    };
    assert_eq!(attach.target().map(|t| t.kind), Some(EntityKind::Friend));

    let half = Harness::try_parse_from(["proninos", "address", "add", "--attach-kind", "friend"]);
    assert!(half.is_err());
  }

  #[test]
  fn friend_edit_flags_set_keep_or_clear() {
    let promoter = Uuid::new_v4();
    let address = Uuid::new_v4();
    let mut update = FriendUpdate {
      official_address_id: Some(Uuid::new_v4()),
      delivery_address_id: Some(address),
      notes:               Some("viejo".into()),
      promoter_id:         Some(promoter),
      temp_key:            Some("K1".into()),
    };

    let id = Uuid::new_v4().to_string();
    let Command::Friend(FriendCommand::Edit { changes, .. }) = parse(&[
      "friend", "edit", &id, "--no-notes", "--no-official-address", "--temp-key", "K2",
    ]) else {
      panic!("expected friend edit");
    };
    changes.apply(&mut update);

    assert_eq!(update.notes, None);
    assert_eq!(update.official_address_id, None);
    assert_eq!(update.temp_key.as_deref(), Some("K2"));
    assert_eq!(update.delivery_address_id, Some(address));
    assert_eq!(update.promoter_id, Some(promoter));

    let both =
      Harness::try_parse_from(["proninos", "friend", "edit", &id, "--notes", "x", "--no-notes"]);
    assert!(both.is_err());
  }
}
