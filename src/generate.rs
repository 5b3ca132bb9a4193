//! HTML site generation.
//!
//! Takes the loaded catalog, fetches each passage through a
//! [`VerseSource`], and writes the static site.
//!
//! ## Generated Pages
//!
//! - **Listing page** (`/index.html`): one card per parable, in catalog order,
//!   each linking to its detail page and showing the passage label
//! - **Detail pages** (`/parable/<slug>/index.html`): title, passage label,
//!   and the passage text fetched at build time
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html
//! ├── .verse-cache.json
//! └── parable/
//!     ├── the-lost-sheep/
//!     │   └── index.html
//!     └── the-mustard-seed/
//!         └── index.html
//! ```
//!
//! ## Per-Page Isolation
//!
//! Detail pages are built in parallel with rayon. Each one runs
//! resolve → fetch → render → write on its own; a failed fetch only loses
//! that page. The listing page is written first and never depends on the
//! verse service. Failures are collected in the [`GenerateReport`].
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! All interpolated titles and passage text are escaped.

use crate::cache::{CacheStats, CachedVerseSource, VerseCache};
use crate::catalog::CatalogError;
use crate::config::SiteConfig;
use crate::slug::{self, SlugIndex};
use crate::types::{ParableRecord, VerseContent};
use crate::verse::{self, HttpVerseSource, VerseError, VerseSource};
use maud::{DOCTYPE, Markup, html};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
    #[error("Verse fetch failed: {0}")]
    Verse(#[from] VerseError),
    #[error("Not a detail page path: {0}")]
    InvalidPath(String),
    #[error("No parable matches slug {0:?}")]
    UnknownSlug(String),
    #[error("{failed} of {total} detail pages failed to build")]
    PageFailures { failed: usize, total: usize },
}

const CSS_STATIC: &str = include_str!("../static/style.css");
const GITHUB_LOGO_SVG: &str = include_str!("../static/github.svg");

/// Footer logo, written next to the listing page.
pub const GITHUB_LOGO_FILE: &str = "github.svg";

/// Progress events emitted while generating, in completion order.
#[derive(Debug, Clone)]
pub enum GenerateEvent {
    IndexWritten {
        count: usize,
    },
    PageWritten {
        index: usize,
        title: String,
        passage: String,
        path: String,
    },
    PageFailed {
        index: usize,
        path: String,
        error: String,
    },
}

/// A detail page that was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSummary {
    /// 1-based position in the catalog
    pub index: usize,
    /// Site path, e.g. `/parable/the-lost-sheep`
    pub path: String,
    pub title: String,
    pub passage: String,
    /// Reference sent to the verse service
    pub reference: String,
}

/// A detail page that could not be built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFailure {
    pub index: usize,
    pub path: String,
    pub error: String,
}

/// Outcome of a generate run. Pages and failures are in catalog order.
#[derive(Debug, Default)]
pub struct GenerateReport {
    pub pages: Vec<PageSummary>,
    pub failures: Vec<PageFailure>,
}

impl GenerateReport {
    pub fn total(&self) -> usize {
        self.pages.len() + self.failures.len()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Turn recorded page failures into an error.
    pub fn into_result(self) -> Result<Self, GenerateError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(GenerateError::PageFailures {
                failed: self.failures.len(),
                total: self.total(),
            })
        }
    }
}

/// Result of a full build: the page report plus cache performance.
#[derive(Debug)]
pub struct BuildResult {
    pub report: GenerateReport,
    pub cache_stats: CacheStats,
}

/// Full build against the configured verse service.
///
/// Loads the catalog from `source_root`, wraps the HTTP source in the verse
/// cache stored in `output_dir` (unless `use_cache` is false), generates the
/// site, and persists the cache. The cache is saved even when some pages
/// failed, so the next run only refetches what is missing.
pub fn build(
    source_root: &Path,
    output_dir: &Path,
    config: &SiteConfig,
    use_cache: bool,
    events: Option<Sender<GenerateEvent>>,
) -> Result<BuildResult, GenerateError> {
    let catalog = crate::catalog::load_catalog(source_root)?;

    let http = HttpVerseSource::new(
        &config.verse_service.base_url,
        config.verse_service.timeout(),
    )?;
    let cache = if use_cache {
        VerseCache::load(output_dir)
    } else {
        VerseCache::empty()
    };
    let source = CachedVerseSource::new(http, cache);

    let report = generate(&catalog, &source, output_dir, config, events)?;

    let cache_stats = source.stats();
    source.into_cache().save(output_dir)?;

    Ok(BuildResult {
        report,
        cache_stats,
    })
}

/// Generate the listing page and every detail page into `output_dir`.
pub fn generate(
    catalog: &[ParableRecord],
    source: &impl VerseSource,
    output_dir: &Path,
    config: &SiteConfig,
    events: Option<Sender<GenerateEvent>>,
) -> Result<GenerateReport, GenerateError> {
    fs::create_dir_all(output_dir)?;
    if config.site.footer_link().is_some() {
        fs::write(output_dir.join(GITHUB_LOGO_FILE), GITHUB_LOGO_SVG)?;
    }

    let index_html = render_index(catalog, config);
    fs::write(output_dir.join("index.html"), index_html.into_string())?;
    emit(
        &events,
        GenerateEvent::IndexWritten {
            count: catalog.len(),
        },
    );

    let index = SlugIndex::new(catalog);
    let paths = slug::enumerate_paths(catalog);

    let outcomes: Vec<(usize, String, Result<PageSummary, GenerateError>)> = paths
        .par_iter()
        .enumerate()
        .map(|(i, path)| {
            let result = build_page(&index, path, i + 1, source, config, output_dir);
            match &result {
                Ok(page) => emit(
                    &events,
                    GenerateEvent::PageWritten {
                        index: page.index,
                        title: page.title.clone(),
                        passage: page.passage.clone(),
                        path: page.path.clone(),
                    },
                ),
                Err(e) => emit(
                    &events,
                    GenerateEvent::PageFailed {
                        index: i + 1,
                        path: path.clone(),
                        error: e.to_string(),
                    },
                ),
            }
            (i + 1, path.clone(), result)
        })
        .collect();

    let mut report = GenerateReport::default();
    for (index, path, result) in outcomes {
        match result {
            Ok(page) => report.pages.push(page),
            Err(e) => report.failures.push(PageFailure {
                index,
                path,
                error: e.to_string(),
            }),
        }
    }
    Ok(report)
}

fn emit(events: &Option<Sender<GenerateEvent>>, event: GenerateEvent) {
    if let Some(tx) = events {
        // Receiver gone means nobody is printing; the build carries on.
        tx.send(event).ok();
    }
}

/// Build one detail page: resolve the path, fetch the passage, write HTML.
pub fn build_page(
    index: &SlugIndex<'_>,
    path: &str,
    position: usize,
    source: &impl VerseSource,
    config: &SiteConfig,
    output_dir: &Path,
) -> Result<PageSummary, GenerateError> {
    let slug = slug::slug_from_path(path)
        .ok_or_else(|| GenerateError::InvalidPath(path.to_string()))?;
    let record = index
        .get(slug)
        .ok_or_else(|| GenerateError::UnknownSlug(slug.to_string()))?;

    let passage_text = verse::fetch_passage(source, record)?;

    let page_dir = detail_dir(output_dir, slug);
    fs::create_dir_all(&page_dir)?;
    let page_html = render_detail(record, &passage_text, config);
    fs::write(page_dir.join("index.html"), page_html.into_string())?;

    Ok(PageSummary {
        index: position,
        path: path.to_string(),
        title: record.title.clone(),
        passage: record.passage_label().to_string(),
        reference: verse::reference(record),
    })
}

/// Directory a detail page is written to.
pub fn detail_dir(output_dir: &Path, slug: &str) -> PathBuf {
    output_dir.join(slug::ROUTE_SEGMENT).join(slug)
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(title: &str, footer_url: Option<&str>, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (CSS_STATIC) }
            }
            body {
                div.container {
                    (content)
                    (site_footer(footer_url))
                }
            }
        }
    }
}

fn site_footer(footer_url: Option<&str>) -> Markup {
    html! {
        footer {
            @if let Some(url) = footer_url {
                a href=(url) target="_blank" rel="noopener noreferrer" {
                    img src={ "/" (GITHUB_LOGO_FILE) } alt="GitHub Logo" width="64";
                }
            }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Renders the listing page: one card per record, in catalog order.
pub fn render_index(catalog: &[ParableRecord], config: &SiteConfig) -> Markup {
    let content = html! {
        main.index-page {
            h1.title { (config.site.title) }
            div.grid {
                @for record in catalog {
                    a.card href=(slug::detail_path(&slug::slugify(&record.title))) {
                        h3 { (record.title) }
                        p.passage { (record.passage_label().to_string()) }
                    }
                }
            }
        }
    };

    base_document(&config.site.title, config.site.footer_link(), content)
}

/// Renders a detail page for one record and its fetched passage.
pub fn render_detail(
    record: &ParableRecord,
    passage: &VerseContent,
    config: &SiteConfig,
) -> Markup {
    let page_title = format!("{} | {}", config.site.title, record.title);

    let content = html! {
        main.detail-page {
            a.back-link href="/" { "Back to Home" }
            h1.title { (record.title) }
            h2.passage { (record.passage_label().to_string()) }
            p.verse-text { (passage.text) }
            @if let Some(name) = &passage.translation_name {
                p.attribution { (name) }
            }
        }
    };

    base_document(&page_title, config.site.footer_link(), content)
}

// ============================================================================
// Tests
// ============================================================================
