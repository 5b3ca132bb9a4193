//! Slug derivation and slug → record resolution.
//!
//! Every detail page lives at `/parable/<slug>`, where the slug is derived
//! from the record title. The same function is used to enumerate paths and
//! to resolve them, so a title always round-trips to its own page.
//!
//! ## Slug Rule
//!
//! - lowercase the title
//! - drop `(` and `)`
//! - replace each run of whitespace with a single `-`
//!
//! ```text
//! "The Lost Sheep"                 → "the-lost-sheep"
//! "The Sower (Four Soils)"         → "the-sower-four-soils"
//! "  Leaven   in the Meal "        → "leaven-in-the-meal"
//! ```
//!
//! Applying the rule to its own output is a no-op.
//!
//! ## Resolution
//!
//! [`resolve`] scans the catalog from index 0 and returns the first record
//! whose slug matches. [`SlugIndex`] is the same lookup precomputed once per
//! build; duplicate slugs keep the first record.

use crate::types::ParableRecord;
use std::collections::HashMap;

/// Route segment every detail page is nested under.
pub const ROUTE_SEGMENT: &str = "parable";

/// Derive the URL slug for a title.
pub fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .replace(['(', ')'], "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Site-absolute path of a detail page, e.g. `/parable/the-lost-sheep`.
pub fn detail_path(slug: &str) -> String {
    format!("/{}/{}", ROUTE_SEGMENT, slug)
}

/// One detail path per catalog record, in catalog order.
pub fn enumerate_paths(catalog: &[ParableRecord]) -> Vec<String> {
    catalog
        .iter()
        .map(|record| detail_path(&slugify(&record.title)))
        .collect()
}

/// Whether a slug names a directory of its own under `/parable/`.
///
/// Empty slugs, `.`, `..` and slugs containing a path separator would put the
/// page somewhere else in the output tree.
pub fn is_routable(slug: &str) -> bool {
    !matches!(slug, "" | "." | "..") && !slug.contains(['/', '\\'])
}

/// Extract the slug from a detail path produced by [`detail_path`].
///
/// Returns `None` for paths outside the `/parable/` route and for slugs that
/// are not [routable](is_routable).
pub fn slug_from_path(path: &str) -> Option<&str> {
    path.strip_prefix('/')
        .and_then(|p| p.strip_prefix(ROUTE_SEGMENT))
        .and_then(|p| p.strip_prefix('/'))
        .filter(|s| is_routable(s))
}

/// Find the first record whose slug equals `slug`.
pub fn resolve<'a>(catalog: &'a [ParableRecord], slug: &str) -> Option<&'a ParableRecord> {
    catalog.iter().find(|record| slugify(&record.title) == slug)
}

/// Slug → record lookup built once per build.
#[derive(Debug)]
pub struct SlugIndex<'a> {
    catalog: &'a [ParableRecord],
    positions: HashMap<String, usize>,
}

impl<'a> SlugIndex<'a> {
    pub fn new(catalog: &'a [ParableRecord]) -> Self {
        let mut positions = HashMap::with_capacity(catalog.len());
        for (idx, record) in catalog.iter().enumerate() {
            // First occurrence wins, matching the linear scan
            positions.entry(slugify(&record.title)).or_insert(idx);
        }
        Self { catalog, positions }
    }

    pub fn get(&self, slug: &str) -> Option<&'a ParableRecord> {
        self.positions.get(slug).map(|&idx| &self.catalog[idx])
    }

    /// Number of distinct slugs.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Slugs that more than one record maps to, in catalog order.
    pub fn duplicates(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        let mut dups = Vec::new();
        for record in self.catalog {
            let slug = slugify(&record.title);
            if !seen.insert(slug.clone()) && !dups.contains(&slug) {
                dups.push(slug);
            }
        }
        dups
    }

    /// Records whose slug cannot be routed, in catalog order. The listing
    /// links to them but their pages are never written.
    pub fn unroutable(&self) -> Vec<&'a ParableRecord> {
        self.catalog
            .iter()
            .filter(|record| !is_routable(&slugify(&record.title)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::record;

    #[test]
    fn lowercases_and_hyphenates() {
        assert_eq!(slugify("The Lost Sheep"), "the-lost-sheep");
    }

    #[test]
    fn strips_parentheses() {
        assert_eq!(slugify("The Sower (Four Soils)"), "the-sower-four-soils");
    }

    #[test]
    fn collapses_whitespace_runs() {
        assert_eq!(slugify("Leaven   in\tthe Meal"), "leaven-in-the-meal");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(slugify("  The Pearl  "), "the-pearl");
    }

    #[test]
    fn keeps_other_punctuation() {
        assert_eq!(slugify("The Rich Man's Barns"), "the-rich-man's-barns");
    }

    #[test]
    fn slugify_is_idempotent() {
        for title in [
            "The Lost Sheep",
            "The Sower (Four Soils)",
            "  Leaven   in the Meal ",
            "already-a-slug",
            "",
        ] {
            let once = slugify(title);
            assert_eq!(slugify(&once), once, "not idempotent for {title:?}");
        }
    }

    #[test]
    fn slugify_is_deterministic() {
        assert_eq!(slugify("The Good Samaritan"), slugify("The Good Samaritan"));
    }

    #[test]
    fn detail_path_prefixes_route() {
        assert_eq!(detail_path("the-lost-sheep"), "/parable/the-lost-sheep");
    }

    #[test]
    fn slug_from_path_roundtrip() {
        assert_eq!(
            slug_from_path(&detail_path("the-sower")),
            Some("the-sower")
        );
    }

    #[test]
    fn slug_from_path_rejects_other_routes() {
        assert_eq!(slug_from_path("/about/the-sower"), None);
        assert_eq!(slug_from_path("/parable/"), None);
        assert_eq!(slug_from_path("/parable/a/b"), None);
        assert_eq!(slug_from_path("parable/the-sower"), None);
    }

    #[test]
    fn slug_from_path_rejects_directory_escapes() {
        assert_eq!(slug_from_path("/parable/.."), None);
        assert_eq!(slug_from_path("/parable/."), None);
        assert_eq!(slug_from_path("/parable/..\\index"), None);
        // Dots inside a slug are fine
        assert_eq!(slug_from_path("/parable/st.-john"), Some("st.-john"));
    }

    #[test]
    fn dot_titles_are_not_routable() {
        assert!(!is_routable(&slugify("..")));
        assert!(!is_routable(&slugify(" . ")));
        assert!(!is_routable(&slugify("()")));
        assert!(!is_routable(&slugify("Wheat/Tares")));
        assert!(is_routable(&slugify("The Lost Sheep")));
    }

    #[test]
    fn enumerate_preserves_order_and_cardinality() {
        let catalog = vec![
            record("The Lost Sheep", "Luke", 15, 4, 7),
            record("The Mustard Seed", "Matthew", 13, 31, 31),
            record("The Sower", "Mark", 4, 3, 9),
        ];
        assert_eq!(
            enumerate_paths(&catalog),
            vec![
                "/parable/the-lost-sheep",
                "/parable/the-mustard-seed",
                "/parable/the-sower",
            ]
        );
    }

    #[test]
    fn enumerate_keeps_duplicate_titles() {
        let catalog = vec![
            record("The Sower", "Mark", 4, 3, 9),
            record("The Sower", "Luke", 8, 5, 8),
        ];
        assert_eq!(enumerate_paths(&catalog).len(), 2);
    }

    #[test]
    fn enumerate_empty_catalog() {
        assert!(enumerate_paths(&[]).is_empty());
    }

    #[test]
    fn resolve_finds_matching_record() {
        let catalog = vec![
            record("The Lost Sheep", "Luke", 15, 4, 7),
            record("The Mustard Seed", "Matthew", 13, 31, 31),
        ];
        let found = resolve(&catalog, "the-mustard-seed").unwrap();
        assert_eq!(found.title, "The Mustard Seed");
        assert_eq!(slugify(&found.title), "the-mustard-seed");
    }

    #[test]
    fn resolve_miss_is_none() {
        let catalog = vec![record("The Lost Sheep", "Luke", 15, 4, 7)];
        assert!(resolve(&catalog, "the-lost-coin").is_none());
    }

    #[test]
    fn resolve_title_with_parentheses() {
        let catalog = vec![record("The Sower (Four Soils)", "Mark", 4, 3, 9)];
        let path = &enumerate_paths(&catalog)[0];
        let slug = slug_from_path(path).unwrap();
        assert!(resolve(&catalog, slug).is_some());
    }

    #[test]
    fn resolve_duplicate_first_wins() {
        let catalog = vec![
            record("The Sower", "Mark", 4, 3, 9),
            record("The Sower", "Luke", 8, 5, 8),
        ];
        assert_eq!(resolve(&catalog, "the-sower").unwrap().book, "Mark");
    }

    #[test]
    fn index_agrees_with_linear_scan() {
        let catalog = vec![
            record("The Lost Sheep", "Luke", 15, 4, 7),
            record("The Sower", "Mark", 4, 3, 9),
            record("The Sower", "Luke", 8, 5, 8),
            record("The Sower (Four Soils)", "Matthew", 13, 3, 9),
        ];
        let index = SlugIndex::new(&catalog);
        for slug in ["the-lost-sheep", "the-sower", "the-sower-four-soils", "nope"] {
            assert_eq!(index.get(slug), resolve(&catalog, slug), "slug {slug}");
        }
    }

    #[test]
    fn index_reports_duplicates() {
        let catalog = vec![
            record("The Sower", "Mark", 4, 3, 9),
            record("The Lost Sheep", "Luke", 15, 4, 7),
            record("the  sower", "Luke", 8, 5, 8),
            record("The Sower", "Matthew", 13, 3, 9),
        ];
        let index = SlugIndex::new(&catalog);
        assert_eq!(index.len(), 2);
        assert_eq!(index.duplicates(), vec!["the-sower".to_string()]);
    }

    #[test]
    fn index_reports_unroutable_records() {
        let catalog = vec![
            record("The Lost Sheep", "Luke", 15, 4, 7),
            record("()", "Mark", 4, 3, 9),
            record("..", "Luke", 8, 5, 8),
        ];
        let titles: Vec<&str> = SlugIndex::new(&catalog)
            .unroutable()
            .into_iter()
            .map(|r| r.title.as_str())
            .collect();
        assert_eq!(titles, vec!["()", ".."]);
    }
}
