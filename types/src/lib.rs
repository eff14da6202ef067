//! Core domain types for Rankwise.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

mod input;
mod sanitize;
mod text;
pub mod ui;

pub use input::{InputError, ItemList};
pub use sanitize::sanitize_item_text;
pub use text::truncate_to_width;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;
use url::Url;

// ============================================================================
// Item
// ============================================================================

/// A single thing the user is ranking.
///
/// Items are compared by identity only. The engine never looks inside the
/// text; the front end uses [`Item::kind`] to decide how to show it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Item(String);

#[derive(Debug, Error)]
#[error("item must not be empty")]
pub struct EmptyItemError;

impl Item {
    pub fn new(value: impl Into<String>) -> Result<Self, EmptyItemError> {
        let value = value.into();
        if value.trim().is_empty() {
            Err(EmptyItemError)
        } else {
            Ok(Self(value))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn kind(&self) -> ItemKind {
        if is_image_url(&self.0) {
            ItemKind::Image
        } else {
            ItemKind::Text
        }
    }
}

impl TryFrom<String> for Item {
    type Error = EmptyItemError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Item {
    type Error = EmptyItemError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Item> for String {
    fn from(value: Item) -> Self {
        value.0
    }
}

impl AsRef<str> for Item {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How an item should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Text,
    /// An absolute URL pointing at a jpeg, gif, png or webp image.
    Image,
}

fn image_suffix() -> &'static Regex {
    static IMAGE_SUFFIX: OnceLock<Regex> = OnceLock::new();
    IMAGE_SUFFIX.get_or_init(|| {
        Regex::new(r"\.(jpeg|jpg|gif|png|webp)$").expect("image suffix pattern is valid")
    })
}

fn is_image_url(raw: &str) -> bool {
    Url::parse(raw).is_ok() && image_suffix().is_match(raw)
}

// ============================================================================
// Comparison Outcome
// ============================================================================

/// Answer to "is the first item superior to the second?".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Superior,
    Equal,
    Inferior,
}

impl Outcome {
    /// The same answer seen from the other side of the pair.
    #[must_use]
    pub const fn negate(self) -> Self {
        match self {
            Self::Superior => Self::Inferior,
            Self::Equal => Self::Equal,
            Self::Inferior => Self::Superior,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Superior => "superior",
            Self::Equal => "equal",
            Self::Inferior => "inferior",
        }
    }
}

impl From<Ordering> for Outcome {
    fn from(ordering: Ordering) -> Self {
        match ordering {
            Ordering::Greater => Self::Superior,
            Ordering::Equal => Self::Equal,
            Ordering::Less => Self::Inferior,
        }
    }
}

impl From<Outcome> for Ordering {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Superior => Ordering::Greater,
            Outcome::Equal => Ordering::Equal,
            Outcome::Inferior => Ordering::Less,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Oracle Reply
// ============================================================================

/// Everything a comparison request can resolve to.
///
/// `Stop` and `Undo` are control signals, not errors: they arrive as the
/// result of the pending request, in place of an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    Answer(Outcome),
    Stop,
    Undo,
}

impl From<Outcome> for Reply {
    fn from(outcome: Outcome) -> Self {
        Self::Answer(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_rejects_blank() {
        assert!(Item::new("").is_err());
        assert!(Item::new("  \t").is_err());
        assert_eq!(Item::new(" pad ").unwrap().as_str(), " pad ");
    }

    #[test]
    fn item_serde_is_transparent() {
        let item = Item::new("apple").unwrap();
        let json = serde_json::to_string(&item).unwrap();
        assert_eq!(json, "\"apple\"");
        assert!(serde_json::from_str::<Item>("\"\"").is_err());
    }

    #[test]
    fn image_urls_are_detected() {
        let cases = [
            ("https://example.com/cat.png", ItemKind::Image),
            ("https://example.com/a/b/dog.webp", ItemKind::Image),
            ("http://host/pic.jpeg", ItemKind::Image),
            ("cat.png", ItemKind::Text),
            ("https://example.com/page.html", ItemKind::Text),
            ("https://example.com/cat.PNG", ItemKind::Text),
            ("just some words", ItemKind::Text),
        ];
        for (raw, expected) in cases {
            assert_eq!(Item::new(raw).unwrap().kind(), expected, "{raw}");
        }
    }

    #[test]
    fn negation_is_an_involution() {
        for outcome in [Outcome::Superior, Outcome::Equal, Outcome::Inferior] {
            assert_eq!(outcome.negate().negate(), outcome);
        }
        assert_eq!(Outcome::Equal.negate(), Outcome::Equal);
    }

    #[test]
    fn ordering_conversion() {
        assert_eq!(Outcome::from(3.cmp(&1)), Outcome::Superior);
        assert_eq!(Ordering::from(Outcome::Inferior), Ordering::Less);
    }
}
