//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 UTC strings with fixed microsecond
//! precision so that they sort lexically. Dates are `YYYY-MM-DD`. UUIDs are
//! hyphenated lowercase strings. Enums use their snake_case discriminator.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use proninos_core::{
  catalog::Sex,
  entity::{EntityKind, EntityRef},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn encode_opt_uuid(id: Option<Uuid>) -> Option<String> { id.map(encode_uuid) }

pub fn decode_opt_uuid(s: Option<&str>) -> Result<Option<Uuid>> {
  s.map(decode_uuid).transpose()
}

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339_opts(SecondsFormat::Micros, true) }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

/// The current time, truncated to what [`encode_dt`] stores so that values
/// returned from writes compare equal to values read back.
pub fn now() -> DateTime<Utc> {
  let now = Utc::now();
  decode_dt(&encode_dt(now)).unwrap_or(now)
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Sex ─────────────────────────────────────────────────────────────────────

pub fn encode_sex(sex: Sex) -> &'static str {
  match sex {
    Sex::Male => "male",
    Sex::Female => "female",
  }
}

pub fn decode_sex(s: &str) -> Result<Sex> {
  s.parse().map_err(|_| Error::Decode { column: "sex", value: s.to_owned() })
}

// ─── EntityRef ───────────────────────────────────────────────────────────────

pub fn encode_entity_ref(target: Option<EntityRef>) -> (Option<String>, Option<String>) {
  match target {
    Some(t) => (Some(t.kind.as_ref().to_owned()), Some(encode_uuid(t.id))),
    None => (None, None),
  }
}

pub fn decode_entity_ref(kind: Option<&str>, id: Option<&str>) -> Result<Option<EntityRef>> {
  match (kind, id) {
    (Some(kind), Some(id)) => Ok(Some(EntityRef::new(EntityKind::parse(kind)?, decode_uuid(id)?))),
    (None, None) => Ok(None),
    _ => Err(Error::Decode {
      column: "attached_kind/attached_id",
      value:  format!("{kind:?}/{id:?}"),
    }),
  }
}

// ─── LIKE patterns ───────────────────────────────────────────────────────────

/// `%text%` with LIKE wildcards in `text` escaped by `\`.
pub fn contains_pattern(text: &str) -> String {
  let mut escaped = String::with_capacity(text.len() + 2);
  escaped.push('%');
  for c in text.chars() {
    if matches!(c, '%' | '_' | '\\') {
      escaped.push('\\');
    }
    escaped.push(c);
  }
  escaped.push('%');
  escaped
}

// ─── Constraint errors ───────────────────────────────────────────────────────

/// Whether `err` is a UNIQUE violation on `table.column`.
pub fn is_unique_violation(err: &rusqlite::Error, table_column: &str) -> bool {
  match err {
    rusqlite::Error::SqliteFailure(e, Some(msg)) => {
      e.code == rusqlite::ErrorCode::ConstraintViolation
        && msg.starts_with("UNIQUE constraint failed")
        && msg.contains(table_column)
    }
    _ => false,
  }
}
