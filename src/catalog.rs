//! Catalog loading.
//!
//! The catalog is a single JSON array of [`ParableRecord`]s at
//! `<content root>/parables.json`. It is read fresh on every build and never
//! written. Order in the file is the order on the listing page.
//!
//! No validation happens beyond what the JSON shape enforces: verse ranges are
//! taken as-is and duplicate titles are allowed (the first one wins during
//! slug resolution).

use crate::types::ParableRecord;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Catalog file name within the content root.
pub const CATALOG_FILENAME: &str = "parables.json";

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("cannot read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed catalog {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Resolve the catalog path for a content root.
pub fn catalog_path(root: &Path) -> PathBuf {
    root.join(CATALOG_FILENAME)
}

/// Load the catalog from a content root.
pub fn load_catalog(root: &Path) -> Result<Vec<ParableRecord>, CatalogError> {
    load_catalog_file(&catalog_path(root))
}

/// Load the catalog from an explicit file path.
pub fn load_catalog_file(path: &Path) -> Result<Vec<ParableRecord>, CatalogError> {
    let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| CatalogError::Json {
        path: path.to_path_buf(),
        source,
    })
}
