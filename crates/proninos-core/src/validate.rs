//! Field-level validation shared by the input types.

use crate::{Error, Result, text::non_blank};

/// Trim a required field, rejecting blanks.
pub fn required(field: &'static str, value: String) -> Result<String> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    return Err(Error::validation(field, "must not be blank"));
  }
  Ok(trimmed.to_owned())
}

/// Trim an optional field; whitespace-only values become `None`.
pub fn optional(value: Option<String>) -> Option<String> {
  non_blank(value.as_deref()).map(|v| v.trim().to_owned())
}

/// Trim an optional email and check its basic shape.
pub fn optional_email(field: &'static str, value: Option<String>) -> Result<Option<String>> {
  let Some(email) = optional(value) else {
    return Ok(None);
  };
  let valid = match email.split_once('@') {
    Some((local, domain)) => {
      !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace)
    }
    None => false,
  };
  if !valid {
    return Err(Error::validation(field, format!("{email:?} is not an email address")));
  }
  Ok(Some(email))
}
