//! Shared test utilities for the parable-site test suite.
//!
//! Provides a fixture catalog in a temp directory, a record constructor, an
//! in-memory [`VerseSource`], and lookup helpers that panic with a clear
//! message on miss.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let catalog = load_catalog(tmp.path()).unwrap();
//! let source = FakeVerseSource::for_catalog(&catalog);
//!
//! let sheep = find_record(&catalog, "The Lost Sheep");
//! assert_eq!(sheep.chapter, 15);
//! ```

use reqwest::StatusCode;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use tempfile::TempDir;

use crate::types::{ParableRecord, VerseContent};
use crate::verse::{self, VerseError, VerseSource};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    for entry in std::fs::read_dir(&fixtures).unwrap() {
        let entry = entry.unwrap();
        std::fs::copy(entry.path(), tmp.path().join(entry.file_name())).unwrap();
    }
    tmp
}

/// Build a record without spelling out every field name.
pub fn record(title: &str, book: &str, chapter: u32, start: u32, end: u32) -> ParableRecord {
    ParableRecord {
        title: title.to_string(),
        book: book.to_string(),
        chapter,
        start_verse: start,
        end_verse: end,
    }
}

// =========================================================================
// Fake verse source
// =========================================================================

/// In-memory verse source. Unknown references fail the way the service
/// does, with a 404 [`VerseError::Status`]. Uses Mutex (not RefCell) so it
/// is Sync and works with rayon's par_iter.
#[derive(Default)]
pub struct FakeVerseSource {
    texts: HashMap<String, VerseContent>,
    requests: Mutex<Vec<String>>,
}

impl FakeVerseSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, reference: &str, text: &str) -> Self {
        self.texts
            .insert(reference.to_string(), VerseContent::new(text));
        self
    }

    /// A source that knows every record in `catalog`, with text
    /// `"text of <reference>"`.
    pub fn for_catalog(catalog: &[ParableRecord]) -> Self {
        catalog.iter().fold(Self::new(), |source, r| {
            let reference = verse::reference(r);
            let text = format!("text of {reference}");
            source.with_text(&reference, &text)
        })
    }

    /// References requested so far, in request order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl VerseSource for FakeVerseSource {
    fn fetch(&self, reference: &str) -> Result<VerseContent, VerseError> {
        self.requests.lock().unwrap().push(reference.to_string());
        self.texts
            .get(reference)
            .cloned()
            .ok_or_else(|| VerseError::Status {
                url: verse::verse_url(self.origin(), reference),
                status: StatusCode::NOT_FOUND,
            })
    }

    fn origin(&self) -> &str {
        "fake://verses"
    }
}

// =========================================================================
// Catalog lookups
// =========================================================================

/// Find a record by title. Panics if not found.
pub fn find_record<'a>(catalog: &'a [ParableRecord], title: &str) -> &'a ParableRecord {
    catalog
        .iter()
        .find(|r| r.title == title)
        .unwrap_or_else(|| {
            let titles = catalog_titles(catalog);
            panic!("record '{title}' not found. Available: {titles:?}")
        })
}

/// All titles in catalog order.
pub fn catalog_titles(catalog: &[ParableRecord]) -> Vec<&str> {
    catalog.iter().map(|r| r.title.as_str()).collect()
}
