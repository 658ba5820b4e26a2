//! Customer names.

use serde::{Deserialize, Serialize};
use std::fmt;

/// First and last name of a person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonName {
    /// Given name.
    pub first: String,
    /// Family name.
    pub last: String,
}

impl PersonName {
    /// Builds a name from its parts, trimming whitespace.
    #[must_use]
    pub fn new(first: impl AsRef<str>, last: impl AsRef<str>) -> Self {
        Self {
            first: first.as_ref().trim().to_string(),
            last: last.as_ref().trim().to_string(),
        }
    }

    /// Splits a full name: the first token is the first name, the rest is
    /// the last name.
    #[must_use]
    pub fn parse(full: &str) -> Self {
        let full = full.trim();
        match full.split_once(char::is_whitespace) {
            Some((first, rest)) => Self::new(first, rest),
            None => Self::new(full, ""),
        }
    }

    /// True when both parts are blank.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.first.is_empty() && self.last.is_empty()
    }

    /// "First Last", skipping an empty part.
    #[must_use]
    pub fn full_name(&self) -> String {
        match (self.first.is_empty(), self.last.is_empty()) {
            (false, false) => format!("{} {}", self.first, self.last),
            (false, true) => self.first.clone(),
            (true, false) => self.last.clone(),
            (true, true) => String::new(),
        }
    }

    /// Upper-cased first letter of each part, e.g. "JD".
    #[must_use]
    pub fn initials(&self) -> String {
        [&self.first, &self.last]
            .iter()
            .filter_map(|part| part.chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }

    /// "Last, First" for sorted listings.
    #[must_use]
    pub fn sortable(&self) -> String {
        match (self.first.is_empty(), self.last.is_empty()) {
            (false, false) => format!("{}, {}", self.last, self.first),
            _ => self.full_name(),
        }
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name_and_initials() {
        let name = PersonName::new("Jane", "Doe");
        assert_eq!(name.full_name(), "Jane Doe");
        assert_eq!(name.initials(), "JD");
        assert_eq!(name.sortable(), "Doe, Jane");
        assert_eq!(name.to_string(), "Jane Doe");
    }

    #[test]
    fn test_parse_keeps_compound_last_name() {
        let name = PersonName::parse("  Ludwig van Beethoven ");
        assert_eq!(name.first, "Ludwig");
        assert_eq!(name.last, "van Beethoven");
    }

    #[test]
    fn test_parse_single_token() {
        let name = PersonName::parse("Cher");
        assert_eq!(name.first, "Cher");
        assert_eq!(name.last, "");
        assert_eq!(name.full_name(), "Cher");
        assert_eq!(name.sortable(), "Cher");
        assert_eq!(name.initials(), "C");
    }

    #[test]
    fn test_blank() {
        assert!(PersonName::new(" ", "").is_blank());
        assert!(!PersonName::new("", "Doe").is_blank());
        assert_eq!(PersonName::new("", "Doe").full_name(), "Doe");
    }

    #[test]
    fn test_initials_lowercase_input() {
        assert_eq!(PersonName::new("élodie", "martin").initials(), "ÉM");
    }
}
