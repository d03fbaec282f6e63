//! Query variation generation.
//!
//! One noisy source record fans out into several candidate search strings.
//! Compilation channels bury the real artist and title inside hyphenated
//! headings, uploader suffixes, and quoted spans, so no single query is
//! assumed sufficient: the selector tries every variation and keeps the best
//! scoring hit across all of them.

use crate::lexicon::Lexicon;
use crate::models::TrackRecord;
use crate::normalize::{quoted_spans, strip_bracketed_spans};
use rustc_hash::FxHashSet;

/// Artist/title candidates recovered from a "channel - artist - title"
/// heading. The second-to-last hyphen segment is only an artist candidate
/// when it does not read like a channel descriptor.
#[derive(Debug, Default)]
struct HyphenSplit {
    title: Option<String>,
    artist: Option<String>,
}

fn split_hyphen_heading(title: &str, lexicon: &Lexicon) -> HyphenSplit {
    if !title.contains(" - ") {
        return HyphenSplit::default();
    }
    let segments: Vec<&str> = title
        .split(" - ")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if segments.len() < 2 {
        return HyphenSplit::default();
    }
    let candidate_artist = segments[segments.len() - 2];
    let artist = if lexicon.is_descriptor_segment(candidate_artist) {
        None
    } else {
        Some(candidate_artist.to_string())
    };
    HyphenSplit {
        title: Some(segments[segments.len() - 1].to_string()),
        artist,
    }
}

/// First comma-delimited artist token.
fn first_artist(artists_str: &str) -> String {
    match artists_str.split_once(',') {
        Some((first, _)) => first.trim().to_string(),
        None => artists_str.to_string(),
    }
}

/// Short digit-bearing artist strings are usually timestamps or upload
/// counters, not artists.
fn looks_like_timestamp_artist(artist: &str) -> bool {
    artist.chars().any(|c| c.is_ascii_digit()) && artist.chars().count() < 10
}

/// Alternate source views candidates are scored against: the record itself,
/// plus the hyphen-derived (artist, title) reading when the title carries a
/// "channel - artist - title" heading. Scoring takes the max across views, so
/// a candidate matching the real artist/title buried in a compilation heading
/// is not punished for the heading noise.
pub fn score_views(record: &TrackRecord, lexicon: &Lexicon) -> Vec<TrackRecord> {
    let mut views = vec![record.clone()];
    let title = lexicon.strip_uploader_suffixes(&record.title);
    let title = strip_bracketed_spans(&title);
    let hyphen = split_hyphen_heading(&title, lexicon);
    if let Some(likely_title) = hyphen.title {
        let artists = match hyphen.artist {
            Some(artist) => vec![artist],
            None => record.artists.clone(),
        };
        views.push(TrackRecord {
            title: likely_title,
            artists,
            duration: record.duration.clone(),
            playlist_title: record.playlist_title.clone(),
        });
    }
    views
}

/// Derive the deduplicated, ordered list of search-query strings for one
/// source record. Deterministic; tolerant of empty or unusual titles; returns
/// a non-empty list whenever the title is non-empty.
pub fn generate_variations(record: &TrackRecord, lexicon: &Lexicon) -> Vec<String> {
    let artists_str = record.artists_joined();

    let title = lexicon.strip_uploader_suffixes(&record.title);
    let title = strip_bracketed_spans(&title);

    let hyphen = split_hyphen_heading(&title, lexicon);
    let first = first_artist(&artists_str);
    let quoted = quoted_spans(&record.title);

    // Artist variations: the raw first token, plus canonical names recovered
    // from the title (when the token is timestamp-like) or the token itself.
    let mut artist_variations: Vec<String> = vec![first.clone()];
    if looks_like_timestamp_artist(&first) {
        if let Some(canonical) = lexicon.known_artist_in(&title) {
            artist_variations.push(canonical.to_string());
        }
    }
    if let Some(canonical) = lexicon.known_artist_in(&first) {
        artist_variations.push(canonical.to_string());
    }

    let mut variations: Vec<String> = Vec::new();
    for artist in &artist_variations {
        variations.push(format!("{} {}", title, artist));
        variations.push(format!("{} {}", artist, title));
    }

    // Drop a leading "X - " segment when something remains after it.
    let mut clean_title = title.clone();
    if let Some((_, rest)) = clean_title.split_once(" - ") {
        if !rest.trim().is_empty() {
            clean_title = rest.trim().to_string();
        }
    }

    variations.push(clean_title.clone());
    variations.push(format!("{} {}", clean_title, first));

    if let Some(likely_title) = &hyphen.title {
        variations.push(likely_title.clone());
        variations.push(format!("{} {}", likely_title, first));
        if let Some(likely_artist) = &hyphen.artist {
            variations.push(format!("{} {}", likely_title, likely_artist));
            variations.push(format!("{} {}", likely_artist, likely_title));
        }
    }

    for qt in &quoted {
        variations.push(qt.clone());
        variations.push(format!("{} {}", qt, first));
    }

    // Extra variant with the first live/official suffix removed.
    let mut no_suffix = clean_title.clone();
    for suffix in &lexicon.live_suffixes {
        if no_suffix.to_lowercase().ends_with(&suffix.to_lowercase()) {
            no_suffix.truncate(no_suffix.len() - suffix.len());
            break;
        }
    }
    if no_suffix != clean_title {
        variations.push(no_suffix.clone());
        variations.push(format!("{} {}", no_suffix, first));
    }

    if looks_like_timestamp_artist(&first) {
        variations.push(clean_title.clone());
    }

    // Guard well-known titles against being displaced by noisier variants.
    if lexicon.is_well_known_title(&clean_title) {
        variations.push(clean_title.clone());
    }

    // Deduplicate preserving first-seen order.
    let mut seen = FxHashSet::default();
    variations
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .filter(|v| seen.insert(v.clone()))
        .collect()
}
