//! Class attribute token set
//!
//! Marker classes are whole tokens. `ClassList` parses a `class` attribute
//! into an ordered set of tokens so that adding or removing one marker can
//! never touch another token, even one that shares a prefix with it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Ordered, duplicate-free set of class tokens
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ClassList {
    tokens: Vec<String>,
}

impl ClassList {
    /// Create an empty class list
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `class` attribute value (tokens separated by ASCII whitespace)
    pub fn parse(value: &str) -> Self {
        let mut list = Self::new();
        for token in value.split_ascii_whitespace() {
            list.add(token);
        }
        list
    }

    /// Whether the exact token is present
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    /// Add a token. Returns `true` if it was not already present.
    pub fn add(&mut self, token: &str) -> bool {
        if token.is_empty() || self.contains(token) {
            return false;
        }
        self.tokens.push(token.to_string());
        true
    }

    /// Remove a token. Returns `true` if it was present.
    pub fn remove(&mut self, token: &str) -> bool {
        let before = self.tokens.len();
        self.tokens.retain(|t| t != token);
        self.tokens.len() != before
    }

    /// Toggle a token, returning whether it is present afterwards
    pub fn toggle(&mut self, token: &str) -> bool {
        if self.remove(token) {
            false
        } else {
            self.add(token)
        }
    }

    /// Add or remove a token depending on `present`.
    /// Returns `true` if the list changed.
    pub fn set(&mut self, token: &str, present: bool) -> bool {
        if present {
            self.add(token)
        } else {
            self.remove(token)
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Iterate over tokens in attribute order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }
}

impl fmt::Display for ClassList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tokens.join(" "))
    }
}

impl FromStr for ClassList {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for ClassList {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<String> for ClassList {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<ClassList> for String {
    fn from(value: ClassList) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_collapses_whitespace_and_duplicates() {
        let list = ClassList::parse("  a\tb  a\nc ");
        assert_eq!(list.iter().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(list.to_string(), "a b c");
    }

    #[test]
    fn test_remove_leaves_prefixed_tokens_alone() {
        let mut list = ClassList::parse("accordeon_zone accordeon_zone_actif hideaway hide");
        assert!(list.remove("accordeon_zone_actif"));
        assert!(list.remove("hide"));
        assert_eq!(list.to_string(), "accordeon_zone hideaway");

        // Removing the shorter marker must not eat the longer one
        let mut list = ClassList::parse("accordeon_zone_item accordeon_zone");
        assert!(list.remove("accordeon_zone"));
        assert!(list.contains("accordeon_zone_item"));
    }

    #[test]
    fn test_contains_is_exact() {
        let list = ClassList::parse("accordeon_zone_actif");
        assert!(!list.contains("accordeon_zone"));
        assert!(!list.contains("actif"));
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut list = ClassList::parse("a");
        assert!(list.add("b"));
        assert!(!list.add("b"));
        assert!(!list.add(""));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_toggle_and_set() {
        let mut list = ClassList::new();
        assert!(list.toggle("hide"));
        assert!(!list.toggle("hide"));
        assert!(list.is_empty());
        assert!(list.set("x", true));
        assert!(!list.set("x", true));
        assert!(list.set("x", false));
    }
}
