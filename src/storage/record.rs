//! Parsing of a single feats file record.
//!
//! A record is a block of `KEY: value;` lines:
//!
//! ```text
//! line  := KEY ':' value ';'*
//! list  := item (',' item)*
//! dep   := kind ' ' target
//! ```
//!
//! The key is everything before the first `:` on the line, so values may
//! themselves contain colons (`Feat Weapon Focus: Slashing Weapons`). A
//! dependency's kind is everything before the first space of the item, and
//! its target is the rest. Any run of trailing `;` is dropped from a value.
//! Lines without a `:` are ignored, as are keys this parser has no use for.
//! When a key repeats, the last `FEATNAME` or `PARENTHEADING` wins and
//! dependency lists accumulate.

use crate::domain::{Dependency, Feat};

/// Errors that can occur when parsing a feat record.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    /// A dependency item has no space between its kind and its target.
    #[error("{key} item '{token}' has no space between its kind and its target")]
    MissingSeparator {
        /// The key of the offending line (`NEEDSALL` or `NEEDSONE`).
        key: String,
        /// The offending item.
        token: String,
    },
}

/// The keys of a record this parser understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Key {
    FeatName,
    ParentHeading,
    NeedsAll,
    NeedsOne,
    Acquire,
}

impl Key {
    fn parse(key: &str) -> Option<Self> {
        match key {
            "FEATNAME" => Some(Self::FeatName),
            "PARENTHEADING" => Some(Self::ParentHeading),
            "NEEDSALL" => Some(Self::NeedsAll),
            "NEEDSONE" => Some(Self::NeedsOne),
            "ACQUIRE" => Some(Self::Acquire),
            _ => None,
        }
    }
}

impl Feat {
    /// Parses a feat from the text of one record.
    ///
    /// Parsing is best effort: a record with no recognised keys gives an empty
    /// feat rather than an error.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MissingSeparator`] if a `NEEDSALL` or `NEEDSONE`
    /// item is not of the form `kind target`.
    pub fn from_text(text: &str) -> Result<Self, ParseError> {
        let mut feat = Self::default();

        for line in text.lines() {
            let Some((key, value)) = split_line(line) else {
                continue;
            };

            match Key::parse(key) {
                Some(Key::FeatName) => feat.name = value.to_string(),
                Some(Key::ParentHeading) => feat.parent_heading = Some(value.to_string()),
                Some(Key::NeedsAll) => feat.required_deps.extend(parse_deps(key, value)?),
                Some(Key::NeedsOne) => feat.alternative_deps.extend(parse_deps(key, value)?),
                Some(Key::Acquire) => {
                    if list_items(value).all(|item| item == "Automatic") {
                        feat.automatic = true;
                    }
                }
                None => {}
            }
        }

        Ok(feat)
    }
}

/// Splits a line into its key and cleaned-up value.
///
/// Returns `None` for lines without a `:`.
fn split_line(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.trim().split_once(':')?;
    Some((key, value.trim().trim_end_matches(';')))
}

fn list_items(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim)
}

fn parse_deps(key: &str, value: &str) -> Result<Vec<Dependency>, ParseError> {
    list_items(value)
        .map(|item| {
            item.split_once(' ')
                .map(|(kind, target)| Dependency::new(kind, target))
                .ok_or_else(|| ParseError::MissingSeparator {
                    key: key.to_string(),
                    token: item.to_string(),
                })
        })
        .collect()
}
