//! SQL schema for the Proninos SQLite store.
//!
//! Executed once at connection startup. `PRAGMA user_version` records the
//! schema revision so later migrations can be gated on it.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS academic_degrees (
    degree_id    TEXT PRIMARY KEY,
    name_male    TEXT NOT NULL UNIQUE,
    name_female  TEXT NOT NULL UNIQUE,
    created_at   TEXT NOT NULL,
    modified_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS courtesy_titles (
    title_id      TEXT PRIMARY KEY,
    title_male    TEXT NOT NULL UNIQUE,
    title_female  TEXT NOT NULL UNIQUE,
    created_at    TEXT NOT NULL,
    modified_at   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS people (
    person_id           TEXT PRIMARY KEY,
    name                TEXT NOT NULL,
    last_name           TEXT NOT NULL,
    courtesy_title_id   TEXT REFERENCES courtesy_titles(title_id),
    academic_degree_id  TEXT REFERENCES academic_degrees(degree_id),
    sex                 TEXT NOT NULL DEFAULT 'male',   -- 'male' | 'female'
    telephone           TEXT,
    email               TEXT,
    birthdate           TEXT,                          -- YYYY-MM-DD
    company             TEXT,
    position            TEXT,
    active              INTEGER NOT NULL DEFAULT 1,
    search_field        TEXT NOT NULL DEFAULT '',
    created_at          TEXT NOT NULL,
    modified_at         TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS institutions (
    institution_id  TEXT PRIMARY KEY,
    name            TEXT NOT NULL,
    email           TEXT,
    telephone       TEXT,
    web_page        TEXT,
    active          INTEGER NOT NULL DEFAULT 1,
    search_field    TEXT NOT NULL DEFAULT '',
    created_at      TEXT NOT NULL,
    modified_at     TEXT NOT NULL
);

-- attached_kind/attached_id form a typed reference to any record.
CREATE TABLE IF NOT EXISTS addresses (
    address_id       TEXT PRIMARY KEY,
    street           TEXT,
    external_number  TEXT,
    internal_number  TEXT,
    suburb           TEXT,
    locality         TEXT,
    city             TEXT,
    reference        TEXT,
    state            TEXT,
    country          TEXT,
    zip_code         TEXT,
    attached_kind    TEXT,
    attached_id      TEXT,
    created_at       TEXT NOT NULL,
    modified_at      TEXT NOT NULL,
    CHECK ((attached_kind IS NULL) = (attached_id IS NULL))
);

CREATE TABLE IF NOT EXISTS official_addresses (
    official_address_id  TEXT PRIMARY KEY,
    rfc                  TEXT NOT NULL,
    name                 TEXT,
    email                TEXT,
    street               TEXT,
    external_number      TEXT,
    internal_number      TEXT,
    suburb               TEXT,
    locality             TEXT,
    city                 TEXT,
    reference            TEXT,
    state                TEXT,
    country              TEXT,
    zip_code             TEXT,
    attached_kind        TEXT,
    attached_id          TEXT,
    created_at           TEXT NOT NULL,
    modified_at          TEXT NOT NULL,
    CHECK ((attached_kind IS NULL) = (attached_id IS NULL))
);

-- Exactly one of person_id / institution_id is set; each party backs at most
-- one friend. Codes are unique and never rewritten.
CREATE TABLE IF NOT EXISTS friends (
    friend_id            TEXT PRIMARY KEY,
    person_id            TEXT UNIQUE REFERENCES people(person_id),
    institution_id       TEXT UNIQUE REFERENCES institutions(institution_id),
    name                 TEXT NOT NULL,
    code                 TEXT NOT NULL UNIQUE,
    official_address_id  TEXT REFERENCES official_addresses(official_address_id),
    delivery_address_id  TEXT REFERENCES addresses(address_id),
    notes                TEXT,
    promoter_id          TEXT REFERENCES friends(friend_id),
    temp_key             TEXT,
    created_at           TEXT NOT NULL,
    modified_at          TEXT NOT NULL,
    CHECK ((person_id IS NULL) != (institution_id IS NULL))
);

CREATE TABLE IF NOT EXISTS contacts (
    contact_id           TEXT PRIMARY KEY,
    friend_id            TEXT NOT NULL REFERENCES friends(friend_id) ON DELETE CASCADE,
    name                 TEXT NOT NULL,
    position             TEXT,
    company              TEXT,
    send_correspondence  INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS contact_methods (
    method_id    TEXT PRIMARY KEY,
    contact_id   TEXT NOT NULL REFERENCES contacts(contact_id) ON DELETE CASCADE,
    method       TEXT NOT NULL,
    information  TEXT NOT NULL
);

-- Written by the contribution module; read here only for first_contribution.
CREATE TABLE IF NOT EXISTS contributions (
    contribution_id  TEXT PRIMARY KEY,
    friend_id        TEXT NOT NULL REFERENCES friends(friend_id),
    amount           TEXT NOT NULL,
    success          INTEGER NOT NULL,
    created_at       TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS people_degree_idx        ON people(academic_degree_id);
CREATE INDEX IF NOT EXISTS people_title_idx         ON people(courtesy_title_id);
CREATE INDEX IF NOT EXISTS people_search_idx        ON people(search_field);
CREATE INDEX IF NOT EXISTS institutions_search_idx  ON institutions(search_field);
CREATE INDEX IF NOT EXISTS addresses_attached_idx   ON addresses(attached_kind, attached_id);
CREATE INDEX IF NOT EXISTS official_attached_idx    ON official_addresses(attached_kind, attached_id);
CREATE INDEX IF NOT EXISTS friends_promoter_idx     ON friends(promoter_id);
CREATE INDEX IF NOT EXISTS friends_name_idx         ON friends(name);
CREATE INDEX IF NOT EXISTS contacts_friend_idx      ON contacts(friend_id);
CREATE INDEX IF NOT EXISTS methods_contact_idx      ON contact_methods(contact_id);
CREATE INDEX IF NOT EXISTS contributions_first_idx  ON contributions(friend_id, success, created_at);

PRAGMA user_version = 1;
";
