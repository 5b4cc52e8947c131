//! Input rules applied before anything is written.
//!
//! Each `check_*` function either rejects its input with
//! [`Error::InvalidInput`] or returns the normalized values that should be
//! stored.

use std::sync::LazyLock;

use regex::Regex;

use crate::{Error, Result};

static SINGLE_WORD: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^[A-Za-z0-9]+$").expect("single-word pattern is valid")
});

/// `true` when `name` is one word made only of ASCII letters and digits.
pub fn is_single_word(name: &str) -> bool { SINGLE_WORD.is_match(name) }

/// Case-fold an identifying name (topic, tag, email) for storage and lookup.
pub fn normalize_name(name: &str) -> String { name.to_lowercase() }

/// Uppercase the first letter of every word, leaving the rest untouched.
///
/// Among ASCII characters anything but a letter, digit or `_` ends a word.
/// Outside ASCII only whitespace does, so `’` and other punctuation stay
/// inside the word they appear in.
pub fn title_case(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  let mut at_boundary = true;
  for c in s.chars() {
    if at_boundary && c.is_alphabetic() {
      out.extend(c.to_uppercase());
    } else {
      out.push(c);
    }
    at_boundary = is_word_separator(c);
  }
  out
}

fn is_word_separator(c: char) -> bool {
  if c.is_ascii() {
    return !(c.is_ascii_alphanumeric() || c == '_');
  }
  c.is_whitespace()
}

/// Validate a new topic and return its normalized name.
pub fn check_topic(name: &str, title: &str, description: &str) -> Result<String> {
  if title.is_empty() || description.is_empty() || !is_single_word(name) {
    return Err(Error::invalid_input("Invalid name and/or title."));
  }
  Ok(normalize_name(name))
}

/// Validate a new tag and return its normalized name.
pub fn check_tag(name: &str) -> Result<String> {
  if !is_single_word(name) {
    return Err(Error::invalid_input("Invalid name."));
  }
  Ok(normalize_name(name))
}

pub fn check_thread(title: &str, content: &str) -> Result<()> {
  if title.is_empty() || content.is_empty() {
    return Err(Error::invalid_input("Empty title or body not allowed."));
  }
  Ok(())
}

/// Validate a signup and return `(email, name)` ready for storage.
pub fn check_signup(email: &str, name: &str) -> Result<(String, String)> {
  if email.is_empty() || name.is_empty() {
    return Err(Error::invalid_input("Email and name are required."));
  }
  Ok((normalize_name(email), title_case(name)))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn single_word_accepts_letters_and_digits() {
    assert!(is_single_word("Rust2024"));
    assert!(is_single_word("a"));
  }

  #[test]
  fn single_word_rejects_everything_else() {
    for bad in ["", "two words", "dash-ed", "under_score", "ünicode", "slash/"] {
      assert!(!is_single_word(bad), "{bad:?} should be rejected");
    }
  }

  #[test]
  fn title_case_capitalizes_each_word() {
    assert_eq!(title_case("ada lovelace"), "Ada Lovelace");
    assert_eq!(title_case("o'neil mcDonald"), "O'Neil McDonald");
    assert_eq!(title_case("ALREADY Up"), "ALREADY Up");
  }

  #[test]
  fn title_case_splits_non_ascii_only_on_whitespace() {
    assert_eq!(title_case("josé’s o'neil"), "José’s O'Neil");
    assert_eq!(title_case("élan\u{a0}vital"), "Élan\u{a0}Vital");
    assert_eq!(title_case("naïve«quote»x"), "Naïve«quote»x");
    assert_eq!(title_case("snake_case-ish"), "Snake_case-Ish");
  }

  #[test]
  fn check_topic_normalizes_name() {
    assert_eq!(check_topic("Rust", "Rust", "About Rust").unwrap(), "rust");
  }

  #[test]
  fn check_topic_rejects_missing_fields() {
    assert!(matches!(
      check_topic("rust", "", "desc"),
      Err(Error::InvalidInput(_))
    ));
    assert!(matches!(
      check_topic("rust", "Rust", ""),
      Err(Error::InvalidInput(_))
    ));
    assert!(matches!(
      check_topic("rust lang", "Rust", "desc"),
      Err(Error::InvalidInput(_))
    ));
  }

  #[test]
  fn check_signup_folds_email_and_titles_name() {
    let (email, name) = check_signup("A@B.com", "grace hopper").unwrap();
    assert_eq!(email, "a@b.com");
    assert_eq!(name, "Grace Hopper");
  }

  #[test]
  fn check_thread_requires_title_and_content() {
    assert!(check_thread("t", "c").is_ok());
    assert!(check_thread("", "c").is_err());
    assert!(check_thread("t", "").is_err());
  }
}
