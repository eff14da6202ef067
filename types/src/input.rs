//! Turning raw user text into a list the engine can sort.

use std::collections::HashSet;
use std::slice;

use thiserror::Error;

use crate::Item;

/// Line separators accepted in pasted input.
const BREAK_TAG: &str = "<br>";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("No input detected, please enter some text")]
    Empty,
    #[error("Enter at least two items")]
    TooFew,
    #[error("There are duplicate values, please check again ({item})")]
    Duplicate { item: String },
}

/// An ordered list of at least two distinct, non-empty items.
///
/// Holding an `ItemList` proves the input was validated; the sorting engine
/// only accepts this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemList(Vec<Item>);

impl ItemList {
    pub fn new(items: Vec<Item>) -> Result<Self, InputError> {
        match items.len() {
            0 => return Err(InputError::Empty),
            1 => return Err(InputError::TooFew),
            _ => {}
        }

        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(item.as_str()) {
                return Err(InputError::Duplicate {
                    item: item.as_str().to_string(),
                });
            }
        }

        Ok(Self(items))
    }

    /// Parse newline (or `<br>`) separated text, trimming every entry and
    /// skipping blank ones.
    pub fn parse(raw: &str) -> Result<Self, InputError> {
        let items = raw
            .lines()
            .flat_map(|line| line.split(BREAK_TAG))
            .map(str::trim)
            .filter_map(|value| Item::new(value).ok())
            .collect();
        Self::new(items)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for clippy's `len_without_is_empty`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Item] {
        &self.0
    }

    pub fn iter(&self) -> slice::Iter<'_, Item> {
        self.0.iter()
    }

    /// Same items, opposite order. Still valid by construction.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut items = self.0.clone();
        items.reverse();
        Self(items)
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Item> {
        self.0
    }
}

impl<'a> IntoIterator for &'a ItemList {
    type Item = &'a Item;
    type IntoIter = slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl TryFrom<Vec<Item>> for ItemList {
    type Error = InputError;

    fn try_from(items: Vec<Item>) -> Result<Self, Self::Error> {
        Self::new(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(list: &ItemList) -> Vec<&str> {
        list.iter().map(Item::as_str).collect()
    }

    #[test]
    fn parse_trims_and_skips_blank_lines() {
        let list = ItemList::parse("  apple \n\n banana\r\n\t\ncherry  ").unwrap();
        assert_eq!(strings(&list), ["apple", "banana", "cherry"]);
    }

    #[test]
    fn parse_splits_on_break_tags() {
        let list = ItemList::parse("one<br>two<br> <br>three").unwrap();
        assert_eq!(strings(&list), ["one", "two", "three"]);
    }

    #[test]
    fn parse_rejects_empty_input() {
        assert_eq!(ItemList::parse(""), Err(InputError::Empty));
        assert_eq!(ItemList::parse(" \n \n"), Err(InputError::Empty));
    }

    #[test]
    fn parse_rejects_single_item() {
        assert_eq!(ItemList::parse("lonely\n\n"), Err(InputError::TooFew));
    }

    #[test]
    fn parse_rejects_duplicates_after_trimming() {
        let err = ItemList::parse("a\nb\n a ").unwrap_err();
        assert_eq!(
            err,
            InputError::Duplicate {
                item: "a".to_string()
            }
        );
    }

    #[test]
    fn reversed_keeps_items() {
        let list = ItemList::parse("x\ny\nz").unwrap();
        assert_eq!(strings(&list.reversed()), ["z", "y", "x"]);
        assert_eq!(list.len(), 3);
    }
}
