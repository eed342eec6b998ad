//! Friend code seeds and the ordered candidate space built from them.
//!
//! A code is a two-letter seed taken from the party's name followed by a
//! disambiguating suffix. Candidates are tried in order until one is free:
//! first `A`..`Z`, then `A0`..`Z9`. The storage backend owns the
//! "is it free" check and the uniqueness constraint.

use crate::{Error, Result, text::ascii_initial};

/// Number of candidates [`candidates`] yields for any seed.
pub const CANDIDATES_PER_SEED: usize = 26 + 26 * 10;

/// First letter of the given name plus first letter of the family name.
pub fn person_seed(name: &str, last_name: &str) -> Result<String> {
  let first = name.chars().find_map(ascii_initial);
  let last = last_name.chars().find_map(ascii_initial);
  match (first, last) {
    (Some(f), Some(l)) => Ok([f, l].iter().collect::<String>().to_ascii_uppercase()),
    _ => Err(Error::CodeSeed(format!("{name} {last_name}"))),
  }
}

/// The first two letters of an institution's name.
pub fn institution_seed(name: &str) -> Result<String> {
  let seed: String = name.chars().filter_map(ascii_initial).take(2).collect();
  if seed.len() < 2 {
    return Err(Error::CodeSeed(name.to_owned()));
  }
  Ok(seed.to_ascii_uppercase())
}

/// Every code that may be assigned for `seed`, in preference order.
pub fn candidates(seed: &str) -> impl Iterator<Item = String> + '_ {
  let letters = || b'A'..=b'Z';
  let single = letters().map(move |l| format!("{seed}{}", l as char));
  let numbered = letters().flat_map(move |l| {
    (0..10).map(move |d| format!("{seed}{}{d}", l as char))
  });
  single.chain(numbered)
}
