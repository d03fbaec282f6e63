//! Batched playlist population.
//!
//! Resolved ids are grouped by destination playlist, validated against the
//! destination's id format, and written in capped-size batches: one playlist
//! create per non-empty group, then ceil(n/limit) membership calls whose
//! concatenation reproduces the ordered id set exactly.

use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::CatalogError;
use crate::models::{MatchResult, PlaylistGroup, TrackRecord};

/// Maximum ids per playlist-membership write call.
pub const PLAYLIST_BATCH_LIMIT: usize = 100;
/// Maximum ids per library-addition write call.
pub const LIBRARY_BATCH_LIMIT: usize = 50;

/// Destination track ids are 22-character base62 tokens.
static TRACK_ID_FORMAT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9]{22}$").unwrap());

pub fn is_valid_track_id(id: &str) -> bool {
    TRACK_ID_FORMAT.is_match(id)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

/// Destination-catalog write endpoint.
pub trait CatalogWriter {
    fn create_playlist(&mut self, title: &str, visibility: Visibility)
        -> Result<String, CatalogError>;
    fn add_items(&mut self, playlist_id: &str, ids: &[String]) -> Result<(), CatalogError>;
    fn add_to_library(&mut self, ids: &[String]) -> Result<(), CatalogError>;
}

/// One resolved record as the writer sees it: the resolved id (if any) and
/// the destination playlist it belongs to.
#[derive(Clone, Debug)]
pub struct ResolvedEntry {
    pub id: Option<String>,
    pub playlist_title: String,
}

/// Align resolution results with their source records. Both slices share
/// ordinal positions by the engine's one-result-per-input invariant.
pub fn resolved_entries(records: &[TrackRecord], results: &[MatchResult]) -> Vec<ResolvedEntry> {
    records
        .iter()
        .zip(results.iter())
        .map(|(record, result)| ResolvedEntry {
            id: result.resolved_id.clone(),
            playlist_title: record.playlist_title.clone(),
        })
        .collect()
}

/// Group resolved ids by playlist title: entries without an id are dropped,
/// group order follows first appearance, ids are deduplicated preserving
/// first-seen order.
pub fn group_by_playlist(entries: &[ResolvedEntry]) -> Vec<PlaylistGroup> {
    let mut groups: Vec<PlaylistGroup> = Vec::new();
    let mut index: FxHashMap<String, usize> = FxHashMap::default();
    let mut seen: FxHashMap<String, FxHashSet<String>> = FxHashMap::default();

    for entry in entries {
        let id = match &entry.id {
            Some(id) => id.clone(),
            None => continue,
        };
        let group_idx = *index.entry(entry.playlist_title.clone()).or_insert_with(|| {
            groups.push(PlaylistGroup {
                title: entry.playlist_title.clone(),
                ids: Vec::new(),
            });
            groups.len() - 1
        });
        if seen.entry(entry.playlist_title.clone()).or_default().insert(id.clone()) {
            groups[group_idx].ids.push(id);
        }
    }
    groups
}

/// Diagnostics for one write run.
#[derive(Debug, Default, Clone)]
pub struct WriteSummary {
    pub playlists_created: usize,
    pub items_added: usize,
    /// Playlists skipped because no id survived format validation.
    pub skipped_playlists: Vec<String>,
    /// Write calls that failed and were dropped with a diagnostic.
    pub failed_writes: usize,
}

/// Create destination playlists and populate them in batches.
///
/// Ids failing format validation are silently excluded from their group; a
/// group left empty is skipped with a diagnostic and no write calls at all.
/// A failing write call loses only its own group or batch: the failure is
/// logged, counted in the summary, and the run proceeds with what remains.
pub fn write_playlists<W: CatalogWriter + ?Sized>(
    writer: &mut W,
    entries: &[ResolvedEntry],
) -> WriteSummary {
    let mut summary = WriteSummary::default();

    for group in group_by_playlist(entries) {
        let valid_ids: Vec<String> = group
            .ids
            .iter()
            .filter(|id| is_valid_track_id(id))
            .cloned()
            .collect();

        if valid_ids.is_empty() {
            eprintln!(
                "Skipping playlist '{}' - 0 valid destination matches",
                group.title
            );
            summary.skipped_playlists.push(group.title);
            continue;
        }

        let playlist_id = match writer.create_playlist(&group.title, Visibility::Private) {
            Ok(id) => id,
            Err(err) => {
                eprintln!("Could not create playlist '{}': {}", group.title, err);
                summary.failed_writes += 1;
                continue;
            }
        };
        summary.playlists_created += 1;

        for batch in valid_ids.chunks(PLAYLIST_BATCH_LIMIT) {
            match writer.add_items(&playlist_id, batch) {
                Ok(()) => summary.items_added += batch.len(),
                Err(err) => {
                    eprintln!(
                        "Dropped a batch of {} tracks for playlist '{}': {}",
                        batch.len(),
                        group.title,
                        err
                    );
                    summary.failed_writes += 1;
                }
            }
        }
    }

    summary
}

/// Add resolved album ids to the user's library in batches. A failing batch
/// is logged and dropped; the remaining batches are still written.
pub fn add_albums_to_library<W: CatalogWriter + ?Sized>(
    writer: &mut W,
    ids: &[String],
) -> usize {
    let mut added = 0;
    for batch in ids.chunks(LIBRARY_BATCH_LIMIT) {
        match writer.add_to_library(batch) {
            Ok(()) => added += batch.len(),
            Err(err) => eprintln!("Dropped a batch of {} albums: {}", batch.len(), err),
        }
    }
    added
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Writer that records every call for assertions. Calls whose ordinal
    /// appears in the corresponding `fail_*` list raise instead.
    #[derive(Default)]
    struct RecordingWriter {
        created: Vec<String>,
        item_batches: Vec<(String, Vec<String>)>,
        library_batches: Vec<Vec<String>>,
        fail_create_for: Vec<String>,
        fail_item_calls: Vec<usize>,
        fail_library_calls: Vec<usize>,
        item_calls: usize,
        library_calls: usize,
    }

    impl CatalogWriter for RecordingWriter {
        fn create_playlist(
            &mut self,
            title: &str,
            _visibility: Visibility,
        ) -> Result<String, CatalogError> {
            if self.fail_create_for.iter().any(|t| t == title) {
                return Err(CatalogError::Write(format!("cannot create '{}'", title)));
            }
            self.created.push(title.to_string());
            Ok(format!("playlist-{}", self.created.len()))
        }

        fn add_items(&mut self, playlist_id: &str, ids: &[String]) -> Result<(), CatalogError> {
            self.item_calls += 1;
            if self.fail_item_calls.contains(&self.item_calls) {
                return Err(CatalogError::Write("membership call failed".to_string()));
            }
            self.item_batches
                .push((playlist_id.to_string(), ids.to_vec()));
            Ok(())
        }

        fn add_to_library(&mut self, ids: &[String]) -> Result<(), CatalogError> {
            self.library_calls += 1;
            if self.fail_library_calls.contains(&self.library_calls) {
                return Err(CatalogError::Write("library call failed".to_string()));
            }
            self.library_batches.push(ids.to_vec());
            Ok(())
        }
    }

    fn valid_id(n: usize) -> String {
        // 22-char base62 token with a distinguishing prefix.
        format!("{:0>22}", format!("id{}", n))
    }

    fn entry(id: Option<String>, playlist: &str) -> ResolvedEntry {
        ResolvedEntry {
            id,
            playlist_title: playlist.to_string(),
        }
    }

    #[test]
    fn test_id_format_validation() {
        assert!(is_valid_track_id("0aBcDeFgHiJkLmNoPqRsT9"));
        assert!(!is_valid_track_id("too-short"));
        assert!(!is_valid_track_id("has!invalid#characters!"));
        assert!(!is_valid_track_id(&"a".repeat(23)));
        assert!(is_valid_track_id(&"a".repeat(22)));
    }

    #[test]
    fn test_group_by_playlist_drops_dedupes_and_preserves_order() {
        let entries = vec![
            entry(Some(valid_id(1)), "A"),
            entry(None, "A"),
            entry(Some(valid_id(2)), "B"),
            entry(Some(valid_id(1)), "A"), // duplicate in A
            entry(Some(valid_id(3)), "A"),
        ];
        let groups = group_by_playlist(&entries);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].title, "A");
        assert_eq!(groups[0].ids, vec![valid_id(1), valid_id(3)]);
        assert_eq!(groups[1].title, "B");
        assert_eq!(groups[1].ids, vec![valid_id(2)]);
    }

    #[test]
    fn test_250_ids_batch_as_100_100_50() {
        let ids: Vec<String> = (0..250).map(valid_id).collect();
        let entries: Vec<ResolvedEntry> = ids
            .iter()
            .map(|id| entry(Some(id.clone()), "Big Playlist"))
            .collect();

        let mut writer = RecordingWriter::default();
        let summary = write_playlists(&mut writer, &entries);

        assert_eq!(writer.created, vec!["Big Playlist".to_string()]);
        assert_eq!(writer.item_batches.len(), 3);
        let sizes: Vec<usize> = writer.item_batches.iter().map(|(_, b)| b.len()).collect();
        assert_eq!(sizes, vec![100, 100, 50]);

        // Concatenating the batches reproduces the original ordered set.
        let written: Vec<String> = writer
            .item_batches
            .iter()
            .flat_map(|(_, b)| b.iter().cloned())
            .collect();
        assert_eq!(written, ids);
        assert_eq!(summary.items_added, 250);
        assert_eq!(summary.playlists_created, 1);
    }

    #[test]
    fn test_all_invalid_ids_skip_playlist_entirely() {
        let entries = vec![
            entry(Some("not-a-valid-id".to_string()), "Broken"),
            entry(Some("also bad".to_string()), "Broken"),
        ];
        let mut writer = RecordingWriter::default();
        let summary = write_playlists(&mut writer, &entries);
        assert!(writer.created.is_empty());
        assert!(writer.item_batches.is_empty());
        assert_eq!(summary.skipped_playlists, vec!["Broken".to_string()]);
        assert_eq!(summary.playlists_created, 0);
    }

    #[test]
    fn test_invalid_ids_excluded_from_surviving_group() {
        let entries = vec![
            entry(Some(valid_id(1)), "Mixed"),
            entry(Some("bogus".to_string()), "Mixed"),
            entry(Some(valid_id(2)), "Mixed"),
        ];
        let mut writer = RecordingWriter::default();
        let summary = write_playlists(&mut writer, &entries);
        assert_eq!(summary.playlists_created, 1);
        assert_eq!(writer.item_batches[0].1, vec![valid_id(1), valid_id(2)]);
    }

    #[test]
    fn test_exact_multiple_of_limit_has_no_empty_batch() {
        let ids: Vec<String> = (0..200).map(valid_id).collect();
        let entries: Vec<ResolvedEntry> = ids
            .iter()
            .map(|id| entry(Some(id.clone()), "Even"))
            .collect();
        let mut writer = RecordingWriter::default();
        write_playlists(&mut writer, &entries);
        let sizes: Vec<usize> = writer.item_batches.iter().map(|(_, b)| b.len()).collect();
        assert_eq!(sizes, vec![100, 100]);
    }

    #[test]
    fn test_failing_batch_loses_only_itself() {
        // Playlist A: 150 ids in two batches, the first membership call
        // fails. Playlist B must still be created and fully written.
        let mut entries: Vec<ResolvedEntry> = (0..150)
            .map(|n| entry(Some(valid_id(n)), "A"))
            .collect();
        entries.push(entry(Some(valid_id(500)), "B"));

        let mut writer = RecordingWriter {
            fail_item_calls: vec![1],
            ..Default::default()
        };
        let summary = write_playlists(&mut writer, &entries);

        assert_eq!(writer.created, vec!["A".to_string(), "B".to_string()]);
        assert_eq!(summary.playlists_created, 2);
        assert_eq!(summary.failed_writes, 1);
        // A's second batch (50) and B's single id still land.
        let sizes: Vec<usize> = writer.item_batches.iter().map(|(_, b)| b.len()).collect();
        assert_eq!(sizes, vec![50, 1]);
        assert_eq!(summary.items_added, 51);
    }

    #[test]
    fn test_failing_create_loses_only_its_group() {
        let entries = vec![
            entry(Some(valid_id(1)), "Broken"),
            entry(Some(valid_id(2)), "Fine"),
        ];
        let mut writer = RecordingWriter {
            fail_create_for: vec!["Broken".to_string()],
            ..Default::default()
        };
        let summary = write_playlists(&mut writer, &entries);

        assert_eq!(writer.created, vec!["Fine".to_string()]);
        assert_eq!(summary.playlists_created, 1);
        assert_eq!(summary.failed_writes, 1);
        assert_eq!(summary.items_added, 1);
        assert_eq!(writer.item_batches[0].1, vec![valid_id(2)]);
    }

    #[test]
    fn test_failing_library_batch_keeps_the_rest() {
        let ids: Vec<String> = (0..120).map(valid_id).collect();
        let mut writer = RecordingWriter {
            fail_library_calls: vec![2],
            ..Default::default()
        };
        let added = add_albums_to_library(&mut writer, &ids);
        assert_eq!(added, 70);
        let sizes: Vec<usize> = writer.library_batches.iter().map(|b| b.len()).collect();
        assert_eq!(sizes, vec![50, 20]);
    }

    #[test]
    fn test_album_library_batches_of_50() {
        let ids: Vec<String> = (0..120).map(valid_id).collect();
        let mut writer = RecordingWriter::default();
        let added = add_albums_to_library(&mut writer, &ids);
        assert_eq!(added, 120);
        let sizes: Vec<usize> = writer.library_batches.iter().map(|b| b.len()).collect();
        assert_eq!(sizes, vec![50, 50, 20]);
        let written: Vec<String> = writer.library_batches.concat();
        assert_eq!(written, ids);
    }
}
