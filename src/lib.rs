//! # Parable Site
//!
//! A static site generator for a small catalog of named scripture passages.
//! The catalog is one JSON file; the site is a listing page plus one detail
//! page per parable whose passage text is fetched from a verse service when
//! the site is built, never when it is served.
//!
//! # Pipeline
//!
//! ```text
//! parables.json ─▶ catalog ─▶ slug::enumerate_paths ─┬─▶ /parable/the-lost-sheep
//!                                                    ├─▶ /parable/the-mustard-seed
//!                                                    └─▶ ...
//! per path:  slug resolve ─▶ verse fetch (cached) ─▶ render ─▶ dist/parable/<slug>/index.html
//! ```
//!
//! Each detail path is independent: pages are built in parallel and a failed
//! fetch loses only its own page.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`catalog`] | Loads `parables.json` from the content root |
//! | [`slug`] | Title → slug, path enumeration, slug → record resolution |
//! | [`verse`] | Reference construction and the [`verse::VerseSource`] seam |
//! | [`cache`] | Persisted verse cache keyed by service origin + reference |
//! | [`generate`] | Renders listing and detail pages with Maud |
//! | [`config`] | `config.toml` loading, merging, validation, thread count |
//! | [`types`] | [`types::ParableRecord`] and [`types::VerseContent`] |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## One Slug Rule
//!
//! Paths are enumerated and resolved with the same [`slug::slugify`]. A title
//! with parentheses therefore always resolves to its own page.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/): malformed markup is
//! a compile error, and every interpolated title or passage is escaped. There
//! is no template directory to ship.
//!
//! ## Build-Time Fetching
//!
//! Passage text is baked into the HTML. The generated site is plain files with
//! no JavaScript and no runtime calls to the verse service.

pub mod cache;
pub mod catalog;
pub mod config;
pub mod generate;
pub mod output;
pub mod slug;
pub mod types;
pub mod verse;

#[cfg(test)]
pub(crate) mod test_helpers;
