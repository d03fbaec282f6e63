//! Candidate scoring.
//!
//! One destination-catalog candidate is scored against one source record with
//! an additive rule table. Scores are unbounded integers and may go negative;
//! rules for missing attributes are skipped; overlapping rules deliberately
//! stack (the generic artist-substring bonus and the expected-artist bonus can
//! fire on the same pair - the combined total is the contract, not the
//! individual weights).
//!
//! Two normalization levels are in play: most rules compare the *loose* form,
//! the stacking exact-title bonus compares the *strict* form. See `normalize`.

use crate::lexicon::Lexicon;
use crate::models::{CandidateRecord, TrackRecord};
use crate::normalize::{normalize_loose, normalize_strict};

/// Exact loose-title match.
const TITLE_EXACT: i32 = 20;
/// Substantial substring title match (both sides longer than 3 chars).
const TITLE_SUBSTRING: i32 = 5;
/// Minor substring or word-overlap title match.
const TITLE_MINOR: i32 = 1;
/// Strict-normalized titles equal (stacks with the loose rules).
const TITLE_STRICT_EXACT: i32 = 10;
const ARTIST_EXACT: i32 = 3;
const ARTIST_SUBSTRING: i32 = 1;
const ARTIST_TOKEN_HIT: i32 = 1;
const REMIX_PENALTY: i32 = -3;
const FEAT_REMIX_PENALTY: i32 = -2;
const FEAT_PENALTY: i32 = -1;
const EXPECTED_ARTIST_BONUS: i32 = 5;
const TITLE_NO_ARTIST_PENALTY: i32 = -5;
const TITLE_AND_ARTIST_BONUS: i32 = 5;

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Either string contains the other.
fn substring_either(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}

/// True if any comma-delimited token of one artist string is a substring of
/// a token of the other (either direction).
fn artist_tokens_overlap(artists_a: &str, artists_b: &str) -> bool {
    for token_a in artists_a.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        for token_b in artists_b.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            if substring_either(token_a, token_b) {
                return true;
            }
        }
    }
    false
}

/// Loose titles match: equal or substring either way. Both sides must be
/// non-empty for any title rule to apply.
fn titles_matchish(title_a: &str, title_b: &str) -> bool {
    !title_a.is_empty() && !title_b.is_empty() && (title_a == title_b || substring_either(title_a, title_b))
}

/// Score one candidate against one source record. Deterministic, never
/// panics, unbounded.
pub fn similarity_score(source: &TrackRecord, candidate: &CandidateRecord, lexicon: &Lexicon) -> i32 {
    let mut score = 0;

    let title_a = lexicon.strip_version_suffixes(&normalize_loose(&source.title));
    let title_b = lexicon.strip_version_suffixes(&normalize_loose(&candidate.title));
    let artists_a = normalize_loose(&source.artists_joined());
    let artists_b = normalize_loose(&candidate.artists_joined());

    // Title rules (most important).
    if !title_a.is_empty() && !title_b.is_empty() {
        if title_a == title_b {
            score += TITLE_EXACT;
        } else if substring_either(&title_a, &title_b) {
            if char_len(&title_a) > 3 && char_len(&title_b) > 3 {
                score += TITLE_SUBSTRING;
            } else {
                score += TITLE_MINOR;
            }
        } else if title_a
            .split_whitespace()
            .any(|word| char_len(word) > 3 && title_b.contains(word))
        {
            score += TITLE_MINOR;
        }

        // Exact match ignoring punctuation and bracketed spans; stacks with
        // the rules above.
        let strict_a = normalize_strict(&title_a);
        if !strict_a.is_empty() && strict_a == normalize_strict(&title_b) {
            score += TITLE_STRICT_EXACT;
        }
    }

    // Artist rules (less important than title, still significant).
    if !artists_a.is_empty() && !artists_b.is_empty() {
        if artists_a == artists_b {
            score += ARTIST_EXACT;
        } else if substring_either(&artists_a, &artists_b) {
            score += ARTIST_SUBSTRING;
        } else if artist_tokens_overlap(&artists_a, &artists_b) {
            score += ARTIST_TOKEN_HIT;
        }
    }

    // Prefer original versions over remixes/mashups/covers. Featured-artist
    // markers are penalized lightly unless the title is also remix-like.
    let candidate_title_loose = normalize_loose(&candidate.title);
    let remix_like = lexicon
        .remix_markers
        .iter()
        .any(|marker| candidate_title_loose.contains(marker));
    if remix_like {
        score += REMIX_PENALTY;
    }
    if candidate_title_loose.contains("feat") || candidate_title_loose.contains("ft") {
        score += if remix_like { FEAT_REMIX_PENALTY } else { FEAT_PENALTY };
    }

    // Expected-artist bonus: when the source title names a known artist and
    // the candidate's first credited artist matches it.
    if let Some(pattern) = lexicon.known_artist_pattern_in(&normalize_loose(&source.title)) {
        if let Some(first_b) = artists_b.split(',').next().map(str::trim) {
            if first_b.contains(pattern) {
                score += EXPECTED_ARTIST_BONUS;
            }
        }
    }

    // Require title AND artist to agree: titles that line up without any
    // artist-token overlap are suspect, unless the source artist reads like
    // an uploader channel or a timestamp.
    if !artists_a.is_empty() && !artists_b.is_empty() && titles_matchish(&title_a, &title_b) {
        let artist_match_found = artist_tokens_overlap(&artists_a, &artists_b);
        if artist_match_found {
            score += TITLE_AND_ARTIST_BONUS;
        } else if !lexicon.is_channel_like(&artists_a) {
            let timestamp_like =
                artists_a.chars().any(|c| c.is_ascii_digit()) && char_len(&artists_a) <= 10;
            if !timestamp_like {
                score += TITLE_NO_ARTIST_PENALTY;
            }
        }
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(title: &str, artists: &[&str]) -> TrackRecord {
        TrackRecord {
            title: title.to_string(),
            artists: artists.iter().map(|s| s.to_string()).collect(),
            duration: None,
            playlist_title: "pl".to_string(),
        }
    }

    fn candidate(title: &str, artists: &[&str]) -> CandidateRecord {
        CandidateRecord {
            id: "a".repeat(22),
            title: title.to_string(),
            artists: artists.iter().map(|s| s.to_string()).collect(),
            year: None,
            kind: None,
        }
    }

    #[test]
    fn test_exact_title_and_artist_floor() {
        let lex = Lexicon::default();
        let score = similarity_score(
            &source("Deceit and Betrayal", &["Audiomachine"]),
            &candidate("Deceit and Betrayal", &["Audiomachine"]),
            &lex,
        );
        // 20 (exact) + 3 (artist) is the floor; the strict-title and
        // title-and-artist bonuses stack on top.
        assert!(score >= 23, "score was {}", score);
    }

    #[test]
    fn test_remix_scores_strictly_lower() {
        let lex = Lexicon::default();
        let src = source("Song", &["Artist"]);
        let plain = similarity_score(&src, &candidate("Song", &["Artist"]), &lex);
        let remix = similarity_score(&src, &candidate("Song (Remix)", &["Artist"]), &lex);
        assert!(remix < plain, "remix {} vs plain {}", remix, plain);
    }

    #[test]
    fn test_substring_title_bonus() {
        let lex = Lexicon::default();
        let score = similarity_score(
            &source("Elegy", &["Balmorhea"]),
            &candidate("Elegy (Extended)", &["Balmorhea"]),
            &lex,
        );
        // Substring (+5), artist exact (+3), title-and-artist (+5), and the
        // feat penalty does not apply.
        assert!(score >= 13, "score was {}", score);
    }

    #[test]
    fn test_title_match_without_artist_overlap_penalized() {
        let lex = Lexicon::default();
        let with_artist = similarity_score(
            &source("Common Title", &["Real Artistname"]),
            &candidate("Common Title", &["Real Artistname"]),
            &lex,
        );
        let wrong_artist = similarity_score(
            &source("Common Title", &["Real Artistname"]),
            &candidate("Common Title", &["Somebody Unrelated"]),
            &lex,
        );
        assert!(wrong_artist < with_artist);
    }

    #[test]
    fn test_channel_like_source_artist_not_penalized() {
        let lex = Lexicon::default();
        let channel = similarity_score(
            &source("Piece", &["Epic Cinematic Studios"]),
            &candidate("Piece", &["Composer"]),
            &lex,
        );
        let real = similarity_score(
            &source("Piece", &["Unrelated Person"]),
            &candidate("Piece", &["Composer"]),
            &lex,
        );
        assert!(channel > real);
    }

    #[test]
    fn test_expected_artist_bonus() {
        let lex = Lexicon::default();
        let expected = similarity_score(
            &source("I'm God Clams Casino", &["03:45"]),
            &candidate("I'm God", &["Clams Casino"]),
            &lex,
        );
        let other = similarity_score(
            &source("I'm God Clams Casino", &["03:45"]),
            &candidate("I'm God", &["Somebody"]),
            &lex,
        );
        assert!(expected > other);
    }

    #[test]
    fn test_missing_artists_skip_artist_rules() {
        let lex = Lexicon::default();
        let score = similarity_score(
            &source("Song", &[]),
            &candidate("Song", &["Artist"]),
            &lex,
        );
        // Title rules only: 20 + 10, no artist penalty or bonus.
        assert_eq!(score, 30);
    }

    #[test]
    fn test_deterministic() {
        let lex = Lexicon::default();
        let src = source("Song (Remix)", &["A", "B"]);
        let cand = candidate("Song feat. C", &["A"]);
        assert_eq!(
            similarity_score(&src, &cand, &lex),
            similarity_score(&src, &cand, &lex)
        );
    }
}
