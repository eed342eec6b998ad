//! Text helpers shared by display composition and search.

use deunicode::deunicode;

/// Transliterate `s` to plain ASCII and lowercase it.
///
/// This is the rule behind every `search_field`: diacritics are stripped and
/// non-Latin scripts are approximated, so `"México"` becomes `"mexico"`.
pub fn normalize(s: &str) -> String { deunicode(s).to_lowercase() }

/// Join the non-empty segments with single spaces, collapsing any internal
/// whitespace runs left over from blank optional fields.
pub fn join_collapsed<'a, I>(segments: I) -> String
where
  I: IntoIterator<Item = &'a str>,
{
  segments
    .into_iter()
    .flat_map(str::split_whitespace)
    .collect::<Vec<_>>()
    .join(" ")
}

/// `None` for absent or whitespace-only values.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
  value.filter(|v| !v.trim().is_empty())
}

/// Transliterate a single character and return its first ASCII letter or
/// digit, if any.
pub fn ascii_initial(c: char) -> Option<char> {
  if c.is_ascii_alphanumeric() {
    return Some(c);
  }
  deunicode::deunicode_char(c)?
    .chars()
    .find(char::is_ascii_alphanumeric)
}
