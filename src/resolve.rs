//! Match selection and batch resolution.
//!
//! `Resolver` drives the query generator and scorer over an external catalog
//! search: every variation is searched, every candidate scored, and the single
//! highest-scoring pair across all variations wins. A failing search call is
//! zero candidates for that variation; resolution always continues.

use std::time::Instant;

use crate::error::CatalogError;
use crate::lexicon::Lexicon;
use crate::models::{
    CandidateRecord, MatchOutcome, MatchResult, ResolutionReport, ResolutionStats, TrackRecord,
    UnresolvedTrack,
};
use crate::normalize::strip_punctuation;
use crate::progress::create_progress_bar;
use crate::query::{generate_variations, score_views};
use crate::review::{AmbiguityReviewer, ReviewItem};
use crate::scoring::similarity_score;

// ============================================================================
// Search Interface
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchKind {
    Track,
    Album,
}

/// Destination-catalog search endpoint. May raise transiently; callers treat
/// a raise as zero candidates.
pub trait CatalogSearch {
    fn search(
        &self,
        query: &str,
        kind: SearchKind,
        limit: usize,
    ) -> Result<Vec<CandidateRecord>, CatalogError>;
}

// ============================================================================
// Thresholds & Limits
// ============================================================================

/// Result cap for each per-variation track search.
pub const TRACK_RESULT_LIMIT: usize = 20;
/// Broader cap for the title-only fallback search.
pub const FALLBACK_RESULT_LIMIT: usize = 50;
/// Result cap for the single album search.
pub const ALBUM_RESULT_LIMIT: usize = 10;
/// Album score at or above which a match counts as found; positive scores
/// below it are ambiguous and routed to review.
pub const MIN_ALBUM_SCORE: i32 = 2;

// ============================================================================
// Resolver
// ============================================================================

/// Outcome of one album-batch resolution, after disambiguation review.
#[derive(Debug, Clone)]
pub struct AlbumResolution {
    /// One result per input record, same ordinal position.
    pub results: Vec<MatchResult>,
    pub report: ResolutionReport,
    /// Ids confirmed for the library write: found matches plus ambiguous
    /// matches the reviewer did not drop.
    pub confirmed_ids: Vec<String>,
}

pub struct Resolver<'a, S: CatalogSearch + ?Sized> {
    catalog: &'a S,
    lexicon: Lexicon,
}

impl<'a, S: CatalogSearch + ?Sized> Resolver<'a, S> {
    pub fn new(catalog: &'a S) -> Self {
        Self {
            catalog,
            lexicon: Lexicon::default(),
        }
    }

    pub fn with_lexicon(catalog: &'a S, lexicon: Lexicon) -> Self {
        Self { catalog, lexicon }
    }

    /// Score all candidates of one search response against every source
    /// view, keeping the first highest-scoring pair.
    fn select_best_candidate(
        &self,
        views: &[TrackRecord],
        candidates: Vec<CandidateRecord>,
    ) -> Option<(CandidateRecord, i32)> {
        let mut best: Option<(CandidateRecord, i32)> = None;
        for candidate in candidates {
            let score = views
                .iter()
                .map(|view| similarity_score(view, &candidate, &self.lexicon))
                .max()
                .unwrap_or(0);
            match &best {
                Some((_, best_score)) if score <= *best_score => {}
                _ => best = Some((candidate, score)),
            }
        }
        best
    }

    /// Best (candidate, score) for one track record across all query
    /// variations - exhaustive, not first-match. Returns score -1 when no
    /// candidate was seen at all.
    pub fn select_best_track(
        &self,
        record: &TrackRecord,
        stats: &mut ResolutionStats,
    ) -> (Option<CandidateRecord>, i32) {
        let views = score_views(record, &self.lexicon);
        let mut best_candidate: Option<CandidateRecord> = None;
        let mut best_score = -1;

        for query in generate_variations(record, &self.lexicon) {
            stats.searches += 1;
            let candidates = match self.catalog.search(&query, SearchKind::Track, TRACK_RESULT_LIMIT) {
                Ok(candidates) => candidates,
                Err(_) => {
                    stats.search_failures += 1;
                    continue;
                }
            };
            if let Some((candidate, score)) = self.select_best_candidate(&views, candidates) {
                if score > best_score {
                    best_candidate = Some(candidate);
                    best_score = score;
                }
            }
        }

        // Fallback: title-only broader search when nothing scored positive.
        if best_score <= 0 && !record.title.trim().is_empty() {
            let cleaned = strip_punctuation(&record.title);
            if !cleaned.is_empty() {
                stats.searches += 1;
                match self.catalog.search(&cleaned, SearchKind::Track, FALLBACK_RESULT_LIMIT) {
                    Ok(candidates) => {
                        if let Some((candidate, score)) = self.select_best_candidate(&views, candidates)
                        {
                            if score > best_score {
                                best_candidate = Some(candidate);
                                best_score = score;
                            }
                        }
                    }
                    Err(_) => stats.search_failures += 1,
                }
            }
        }

        (best_candidate, best_score)
    }

    /// Best (candidate, score) for one album record: a single search on
    /// "{title} {artists}".
    pub fn select_best_album(
        &self,
        record: &TrackRecord,
        stats: &mut ResolutionStats,
    ) -> (Option<CandidateRecord>, i32) {
        let title = self.lexicon.strip_uploader_suffixes(&record.title);
        let query = format!("{} {}", title.trim(), record.artists_joined());

        stats.searches += 1;
        let candidates = match self.catalog.search(query.trim(), SearchKind::Album, ALBUM_RESULT_LIMIT)
        {
            Ok(candidates) => candidates,
            Err(_) => {
                stats.search_failures += 1;
                return (None, -1);
            }
        };

        match self.select_best_candidate(&score_views(record, &self.lexicon), candidates) {
            Some((candidate, score)) => (Some(candidate), score),
            None => (None, -1),
        }
    }

    /// Resolve an ordered batch of track records. Produces exactly one
    /// `MatchResult` per input, in identical order; unresolved records are
    /// accumulated for the end-of-run report.
    pub fn resolve_tracks(&self, records: &[TrackRecord]) -> (Vec<MatchResult>, ResolutionReport) {
        let start = Instant::now();
        let pb = create_progress_bar(records.len() as u64, "Looking up songs");

        let mut results = Vec::with_capacity(records.len());
        let mut stats = ResolutionStats::default();
        let mut unresolved = Vec::new();

        for (index, record) in records.iter().enumerate() {
            let (candidate, score) = self.select_best_track(record, &mut stats);
            let outcome = if score > 0 {
                MatchOutcome::Found
            } else {
                MatchOutcome::NotFound
            };
            let resolved_id = match outcome {
                MatchOutcome::Found => candidate.as_ref().map(|c| c.id.clone()),
                _ => None,
            };
            match outcome {
                MatchOutcome::Found => stats.found += 1,
                _ => {
                    stats.not_found += 1;
                    unresolved.push(UnresolvedTrack {
                        title: record.title.clone(),
                        artists: record.artists_joined(),
                        playlist_title: record.playlist_title.clone(),
                    });
                }
            }
            results.push(MatchResult {
                index,
                candidate,
                score,
                resolved_id,
                outcome,
            });
            pb.inc(1);
        }

        pb.finish_with_message(format!(
            "Resolved {}/{} tracks",
            stats.found,
            records.len()
        ));
        stats.elapsed_seconds = start.elapsed().as_secs_f64();
        (results, ResolutionReport { stats, unresolved })
    }

    /// Resolve an ordered batch of album records with three-band outcomes.
    /// The ambiguous subset is routed through the reviewer; dropped indices
    /// lose both the tentative match and their place in the confirmed output.
    pub fn resolve_albums(
        &self,
        records: &[TrackRecord],
        reviewer: &mut dyn AmbiguityReviewer,
    ) -> AlbumResolution {
        let start = Instant::now();
        let pb = create_progress_bar(records.len() as u64, "Looking up albums");

        let mut results = Vec::with_capacity(records.len());
        let mut stats = ResolutionStats::default();
        let mut unresolved = Vec::new();
        let mut review_items = Vec::new();

        for (index, record) in records.iter().enumerate() {
            let (candidate, score) = self.select_best_album(record, &mut stats);
            let outcome = if score >= MIN_ALBUM_SCORE {
                MatchOutcome::Found
            } else if score > 0 {
                MatchOutcome::Ambiguous
            } else {
                MatchOutcome::NotFound
            };
            match outcome {
                MatchOutcome::Found => stats.found += 1,
                MatchOutcome::Ambiguous => {
                    stats.ambiguous += 1;
                    if let Some(candidate) = &candidate {
                        review_items.push(ReviewItem {
                            index,
                            source: record.clone(),
                            candidate: candidate.clone(),
                        });
                    }
                }
                MatchOutcome::NotFound => {
                    stats.not_found += 1;
                    unresolved.push(UnresolvedTrack {
                        title: record.title.clone(),
                        artists: record.artists_joined(),
                        playlist_title: record.playlist_title.clone(),
                    });
                }
            }
            let resolved_id = match outcome {
                MatchOutcome::Found => candidate.as_ref().map(|c| c.id.clone()),
                _ => None,
            };
            results.push(MatchResult {
                index,
                candidate,
                score,
                resolved_id,
                outcome,
            });
            pb.inc(1);
        }

        pb.finish_with_message(format!(
            "Resolved {}/{} albums",
            stats.found,
            records.len()
        ));

        let dropped = if review_items.is_empty() {
            Default::default()
        } else {
            reviewer.resolve_ambiguous(&review_items)
        };

        let mut confirmed_ids = Vec::new();
        for result in &results {
            if dropped.contains(&result.index) {
                continue;
            }
            match result.outcome {
                MatchOutcome::Found | MatchOutcome::Ambiguous => {
                    if let Some(candidate) = &result.candidate {
                        confirmed_ids.push(candidate.id.clone());
                    }
                }
                MatchOutcome::NotFound => {}
            }
        }

        stats.elapsed_seconds = start.elapsed().as_secs_f64();
        AlbumResolution {
            results,
            report: ResolutionReport { stats, unresolved },
            confirmed_ids,
        }
    }
}
