//! Core data models for the resolution pipeline.
//!
//! This module contains the record types flowing through the pipeline
//! (source track, destination candidate, match result) plus the run
//! statistics used for the end-of-run report.

use serde::{Deserialize, Serialize};

// ============================================================================
// Source Records
// ============================================================================

/// Normalized descriptor of one source-catalog song. Immutable once ingested.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrackRecord {
    pub title: String,
    /// Credited artists in source order.
    pub artists: Vec<String>,
    /// Free-text duration as reported by the source (e.g. "3:45").
    pub duration: Option<String>,
    /// Grouping key for the destination playlist this record belongs to.
    pub playlist_title: String,
}

impl TrackRecord {
    /// Comma-serialized artist list, the form scoring and query generation
    /// compare against.
    pub fn artists_joined(&self) -> String {
        self.artists.join(", ")
    }
}

// ============================================================================
// Destination Candidates
// ============================================================================

/// One destination-catalog search hit reduced to the fields matching needs.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CandidateRecord {
    /// Opaque destination-catalog identifier.
    pub id: String,
    pub title: String,
    pub artists: Vec<String>,
    /// Release year, album path only.
    #[serde(default)]
    pub year: Option<String>,
    /// Release type (e.g. "album", "single"), album path only.
    #[serde(default)]
    pub kind: Option<String>,
}

impl CandidateRecord {
    pub fn artists_joined(&self) -> String {
        self.artists.join(", ")
    }
}

// ============================================================================
// Match Results
// ============================================================================

/// Outcome band for one resolved record.
///
/// Tracks are binary (score > 0 is found); albums are three-band with
/// `MIN_ALBUM_SCORE` separating ambiguous from found.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum MatchOutcome {
    Found,
    Ambiguous,
    NotFound,
}

/// Pairing of a source index with its best-scoring candidate and score.
///
/// Invariant: exactly one `MatchResult` per input record, at the same ordinal
/// position. `resolved_id` is `Some` iff the score clears the threshold for
/// the record kind.
#[derive(Clone, Debug)]
pub struct MatchResult {
    pub index: usize,
    pub candidate: Option<CandidateRecord>,
    /// Unbounded additive score; may be negative.
    pub score: i32,
    pub resolved_id: Option<String>,
    pub outcome: MatchOutcome,
}

/// (title, artists, playlist_title) tuple for the end-of-run report.
#[derive(Clone, Debug, Serialize)]
pub struct UnresolvedTrack {
    pub title: String,
    pub artists: String,
    pub playlist_title: String,
}

// ============================================================================
// Playlist Grouping
// ============================================================================

/// Deduplicated, format-valid ordered id set destined for one playlist write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaylistGroup {
    pub title: String,
    pub ids: Vec<String>,
}

// ============================================================================
// Run Statistics
// ============================================================================

/// Per-run resolution statistics for the console report.
#[derive(Default, Debug, Clone, Serialize)]
pub struct ResolutionStats {
    pub found: usize,
    pub ambiguous: usize,
    pub not_found: usize,
    /// Search calls issued, including variation fan-out and fallbacks.
    pub searches: usize,
    /// Search calls that raised and were treated as zero candidates.
    pub search_failures: usize,
    pub elapsed_seconds: f64,
}

impl ResolutionStats {
    pub fn total(&self) -> usize {
        self.found + self.ambiguous + self.not_found
    }

    /// Log stats to stderr in JSON format
    pub fn log_phase(&self, phase: &str) {
        if let Ok(json) = serde_json::to_string_pretty(self) {
            eprintln!("[STATS:{}]\n{}", phase, json);
        }
    }
}

/// Full outcome of one engine invocation: ordered results plus diagnostics.
#[derive(Debug, Clone)]
pub struct ResolutionReport {
    pub stats: ResolutionStats,
    pub unresolved: Vec<UnresolvedTrack>,
}

impl ResolutionReport {
    /// Console summary: found/ambiguous/not-found counts and the unmatched
    /// (title, artists, playlist) tuples.
    pub fn print_summary(&self) {
        println!(
            "Results: {} found, {} ambiguous, {} not found",
            self.stats.found, self.stats.ambiguous, self.stats.not_found
        );
        for song in &self.unresolved {
            println!(
                "Song {}, {} in playlist {} was not found.",
                song.title, song.artists, song.playlist_title
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artists_joined() {
        let record = TrackRecord {
            title: "Song".to_string(),
            artists: vec!["A".to_string(), "B".to_string()],
            duration: None,
            playlist_title: "pl".to_string(),
        };
        assert_eq!(record.artists_joined(), "A, B");
    }

    #[test]
    fn test_stats_total() {
        let stats = ResolutionStats {
            found: 3,
            ambiguous: 1,
            not_found: 2,
            ..Default::default()
        };
        assert_eq!(stats.total(), 6);
    }
}
