//! Passage text retrieval from the verse service.
//!
//! Each detail page needs the text of one passage. The record is turned into
//! a reference string the service understands and fetched with a single
//! `GET <base_url>/<reference>`.
//!
//! ## Reference Syntax
//!
//! The service accepts two separator conventions and both are in use:
//!
//! ```text
//! single verse   matthew%2013:31     book, encoded space, chapter:verse
//! verse range    luke+15:4-7         book, plus sign, chapter:start-end
//! ```
//!
//! The book is lowercased in both forms. Numbers are plain decimals.
//!
//! ## Sources
//!
//! [`VerseSource`] is the seam between the build and the network. The
//! production implementation is [`HttpVerseSource`]; the cache layer
//! ([`CachedVerseSource`](crate::cache::CachedVerseSource)) wraps any source,
//! and tests substitute an in-memory one.

use crate::types::{ParableRecord, VerseContent};
use std::time::Duration;
use thiserror::Error;

/// Default verse service endpoint.
pub const DEFAULT_BASE_URL: &str = "https://bible-api.com";

#[derive(Error, Debug)]
pub enum VerseError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("verse service returned {status} for {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("unexpected response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Build the service reference for a record.
pub fn reference(record: &ParableRecord) -> String {
    let book = record.book.to_lowercase();
    if record.is_single_verse() {
        format!("{}%20{}:{}", book, record.chapter, record.start_verse)
    } else {
        format!(
            "{}+{}:{}-{}",
            book, record.chapter, record.start_verse, record.end_verse
        )
    }
}

/// Full request URL for a reference.
pub fn verse_url(base_url: &str, reference: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), reference)
}

/// Anything that can turn a reference into passage text.
///
/// Must be `Sync`: pages are built in parallel and share one source.
pub trait VerseSource: Sync {
    fn fetch(&self, reference: &str) -> Result<VerseContent, VerseError>;

    /// Identifies where passages come from. Part of the cache key, so
    /// switching services never serves text cached from another one.
    fn origin(&self) -> &str;
}

/// Verse source backed by the HTTP service.
pub struct HttpVerseSource {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpVerseSource {
    /// Create a source for `base_url`. A zero `timeout` keeps the client default.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::blocking::Client::builder();
        if !timeout.is_zero() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl VerseSource for HttpVerseSource {
    fn fetch(&self, reference: &str) -> Result<VerseContent, VerseError> {
        let url = verse_url(&self.base_url, reference);
        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|source| VerseError::Http {
                url: url.clone(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(VerseError::Status { url, status });
        }

        let body = resp.text().map_err(|source| VerseError::Http {
            url: url.clone(),
            source,
        })?;
        decode_body(&url, &body)
    }

    fn origin(&self) -> &str {
        &self.base_url
    }
}

/// Parse a service response body. Only `text` is required.
pub fn decode_body(url: &str, body: &str) -> Result<VerseContent, VerseError> {
    serde_json::from_str(body).map_err(|source| VerseError::Decode {
        url: url.to_string(),
        source,
    })
}

/// Resolve a record to its passage text through `source`.
pub fn fetch_passage(
    source: &impl VerseSource,
    record: &ParableRecord,
) -> Result<VerseContent, VerseError> {
    source.fetch(&reference(record))
}
