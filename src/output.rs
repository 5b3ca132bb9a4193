//! CLI output formatting.
//!
//! Output leads with what each entity *is* (positional index, title, passage)
//! and shows derived details (site path, service reference) as indented
//! context lines underneath.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Parables
//! 001 The Lost Sheep (Luke 15:4-7)
//!     Path: /parable/the-lost-sheep
//!     Reference: luke+15:4-7
//! 002 The Mustard Seed (Matthew 13:31)
//!     Path: /parable/the-mustard-seed
//!     Reference: matthew%2013:31
//! ```
//!
//! Duplicate slugs and titles that slugify to nothing usable are listed in
//! trailing sections.
//!
//! ## Build
//!
//! ```text
//! Listing (5 parables) → index.html
//! 001 The Lost Sheep → parable/the-lost-sheep/index.html
//! 003 /parable/the-sower → FAILED
//!     Verse fetch failed: ...
//! Generated 4 of 5 detail pages
//! ```
//!
//! # Architecture
//!
//! Each `format_*` function returns `Vec<String>` and is pure, for
//! testability; `print_*` wrappers write to stdout.

use crate::generate::{GenerateEvent, GenerateReport};
use crate::slug::{self, SlugIndex};
use crate::types::ParableRecord;
use crate::verse;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Output file (relative to the output dir) for a detail page path.
fn page_file(path: &str) -> String {
    format!("{}/index.html", path.trim_start_matches('/'))
}

// ============================================================================
// Check
// ============================================================================

/// Format the catalog as seen by the build: titles, paths, references.
pub fn format_catalog_output(catalog: &[ParableRecord]) -> Vec<String> {
    let mut lines = vec!["Parables".to_string()];

    for (i, record) in catalog.iter().enumerate() {
        lines.push(format!(
            "{} {} ({})",
            format_index(i + 1),
            record.title,
            record.passage_label()
        ));
        lines.push(format!(
            "    Path: {}",
            slug::detail_path(&slug::slugify(&record.title))
        ));
        lines.push(format!("    Reference: {}", verse::reference(record)));
    }

    let index = SlugIndex::new(catalog);
    let duplicates = index.duplicates();
    if !duplicates.is_empty() {
        lines.push(String::new());
        lines.push("Duplicate slugs (first record wins)".to_string());
        for dup in duplicates {
            lines.push(format!("    {}", slug::detail_path(&dup)));
        }
    }

    let unroutable = index.unroutable();
    if !unroutable.is_empty() {
        lines.push(String::new());
        lines.push("Titles without a usable slug (no detail page)".to_string());
        for record in unroutable {
            lines.push(format!("    {:?}", record.title));
        }
    }

    lines
}

/// Print catalog output to stdout.
pub fn print_catalog_output(catalog: &[ParableRecord]) {
    for line in format_catalog_output(catalog) {
        println!("{}", line);
    }
}

// ============================================================================
// Build
// ============================================================================

/// Format a single generate event.
pub fn format_generate_event(event: &GenerateEvent) -> Vec<String> {
    match event {
        GenerateEvent::IndexWritten { count } => {
            vec![format!("Listing ({} parables) \u{2192} index.html", count)]
        }
        GenerateEvent::PageWritten {
            index, title, path, ..
        } => vec![format!(
            "{} {} \u{2192} {}",
            format_index(*index),
            title,
            page_file(path)
        )],
        GenerateEvent::PageFailed { index, path, error } => vec![
            format!("{} {} \u{2192} FAILED", format_index(*index), path),
            format!("    {}", error),
        ],
    }
}

/// Format the end-of-build summary.
pub fn format_generate_summary(report: &GenerateReport) -> Vec<String> {
    let mut lines = Vec::new();
    if report.is_success() {
        lines.push(format!("Generated {} detail pages", report.pages.len()));
    } else {
        lines.push(format!(
            "Generated {} of {} detail pages",
            report.pages.len(),
            report.total()
        ));
        lines.push("Failed".to_string());
        for failure in &report.failures {
            lines.push(format!(
                "    {} {}: {}",
                format_index(failure.index),
                failure.path,
                failure.error
            ));
        }
    }
    lines
}

/// Print the end-of-build summary to stdout.
pub fn print_generate_summary(report: &GenerateReport) {
    for line in format_generate_summary(report) {
        println!("{}", line);
    }
}
