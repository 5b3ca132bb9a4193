//! Shared types used across the build: catalog records and fetched passage text.
//!
//! [`ParableRecord`] mirrors the JSON shape of `parables.json`, so field names
//! are camelCase on the wire. [`VerseContent`] is whatever the verse service
//! hands back; only `text` is required.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named scripture passage from the catalog.
///
/// `start_verse <= end_verse` is assumed but never checked. A record whose
/// start and end verse are equal is a single-verse passage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParableRecord {
    /// Display title, also the source of the slug (`"The Lost Sheep"`)
    pub title: String,
    /// Book name as written in the catalog (`"Luke"`)
    pub book: String,
    pub chapter: u32,
    pub start_verse: u32,
    pub end_verse: u32,
}

impl ParableRecord {
    /// Whether the passage covers exactly one verse.
    pub fn is_single_verse(&self) -> bool {
        self.start_verse == self.end_verse
    }

    /// Human-readable passage label, e.g. `Luke 15:4-7` or `Matthew 13:31`.
    pub fn passage_label(&self) -> PassageLabel<'_> {
        PassageLabel(self)
    }
}

/// Display adapter returned by [`ParableRecord::passage_label`].
pub struct PassageLabel<'a>(&'a ParableRecord);

impl fmt::Display for PassageLabel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.0;
        if r.is_single_verse() {
            write!(f, "{} {}:{}", r.book, r.chapter, r.start_verse)
        } else {
            write!(
                f,
                "{} {}:{}-{}",
                r.book, r.chapter, r.start_verse, r.end_verse
            )
        }
    }
}

/// Passage text returned by the verse service.
///
/// The service sends more fields than these (per-verse breakdown, translation
/// id, ...). Everything but `text` is optional and only used for attribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerseContent {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation_name: Option<String>,
}

impl VerseContent {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            reference: None,
            translation_name: None,
        }
    }
}
