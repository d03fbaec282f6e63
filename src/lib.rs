//! Trackbridge library - shared modules for resolving source-catalog track
//! descriptors against a destination catalog and populating destination
//! playlists in batches.

pub mod error;
pub mod lexicon;
pub mod models;
pub mod normalize;
pub mod progress;
pub mod query;
pub mod resolve;
pub mod review;
pub mod scoring;
pub mod source;
pub mod writer;
