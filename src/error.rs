//! Error taxonomy for catalog interactions.
//!
//! Only `Connectivity` is fatal: it means the catalog client could not be
//! constructed at startup. Everything else is recovered locally - a failed
//! search becomes zero candidates for that variation, a malformed source
//! reference fails that single lookup, and the surrounding batch proceeds.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// Catalog client construction failed. Aborts the whole run.
    #[error("cannot establish catalog connection: {0}")]
    Connectivity(String),

    /// One search call failed. Treated as zero candidates by the caller.
    #[error("catalog search failed: {0}")]
    Search(String),

    /// A playlist-create or membership write call failed.
    #[error("catalog write failed: {0}")]
    Write(String),

    /// Malformed source reference (e.g. missing URL parameter). Surfaced to
    /// the caller of that single lookup only.
    #[error("invalid source reference: {0}")]
    InputFormat(String),
}
