//! Structural validation of the Mexican fiscal identifier (RFC).
//!
//! An RFC is a 3-letter (legal entity) or 4-letter (individual) prefix, a
//! `YYMMDD` date, and a 3-character homoclave. Only the shape is checked:
//! the date must exist under a fixed month table, with February 29 allowed
//! when `YY` is a multiple of four. No check digit is computed.

use std::sync::LazyLock;

use regex::Regex;

use crate::{Error, Result};

static RFC: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(concat!(
    r"^(?i)[A-ZÑ&]{3,4}",
    r"(?:",
    r"[0-9]{2}(?:0[13-9]|1[0-2])(?:0[1-9]|[12][0-9]|30)",
    r"|[0-9]{2}(?:0[13578]|1[02])31",
    r"|(?:[02468][048]|[13579][26])0229",
    r"|[0-9]{2}02(?:0[1-9]|1[0-9]|2[0-8])",
    r")",
    r"[A-Z0-9]{2}[A0-9]$",
  ))
  .unwrap()
});

/// Trim and uppercase `rfc`, then check its shape.
pub fn validate_rfc(rfc: &str) -> Result<String> {
  let candidate = rfc.trim().to_uppercase();
  if RFC.is_match(&candidate) {
    Ok(candidate)
  } else {
    Err(Error::InvalidRfc(rfc.to_owned()))
  }
}

pub fn is_valid_rfc(rfc: &str) -> bool { validate_rfc(rfc).is_ok() }
