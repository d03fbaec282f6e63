//! Album disambiguation review.
//!
//! Ambiguous album matches are presented to an injected reviewer which
//! answers with the set of indices to drop. The console implementation is a
//! blocking read-eval loop; `ScriptedReviewer` supplies canned answers for
//! tests and non-interactive runs.

use std::io::{self, BufRead, Write};

use rustc_hash::FxHashSet;

use crate::models::{CandidateRecord, TrackRecord};

/// One ambiguous pairing presented for review.
#[derive(Clone, Debug)]
pub struct ReviewItem {
    /// Ordinal position of the source record in the resolved batch.
    pub index: usize,
    pub source: TrackRecord,
    pub candidate: CandidateRecord,
}

/// Synchronous disambiguation collaborator. Returns the record indices whose
/// tentative matches should be dropped.
pub trait AmbiguityReviewer {
    fn resolve_ambiguous(&mut self, items: &[ReviewItem]) -> FxHashSet<usize>;
}

// ============================================================================
// Console Implementation
// ============================================================================

/// Blocking console prompt loop. Prints the numbered ambiguous pairings,
/// reads comma-separated indices to drop, and repeats "Continue editing?"
/// until the answer is negative.
#[derive(Default)]
pub struct ConsoleReviewer;

impl ConsoleReviewer {
    fn print_items(items: &[ReviewItem], dropped: &FxHashSet<usize>) {
        for item in items {
            if dropped.contains(&item.index) {
                continue;
            }
            println!(
                "{}\t{}: {}\t to \t{}: {}",
                item.index,
                item.source.artists_joined(),
                item.source.title,
                item.candidate.artists_joined(),
                item.candidate.title
            );
        }
    }

    fn read_line() -> Option<String> {
        let mut buf = String::new();
        io::stdout().flush().ok();
        match io::stdin().lock().read_line(&mut buf) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(buf.trim().to_string()),
        }
    }
}

impl AmbiguityReviewer for ConsoleReviewer {
    fn resolve_ambiguous(&mut self, items: &[ReviewItem]) -> FxHashSet<usize> {
        println!(
            "The following albums could not be matched properly. Please deselect albums \
             you do not want to add by entering their corresponding number (multiple \
             possible, separated by commas)."
        );

        let mut dropped: FxHashSet<usize> = FxHashSet::default();
        loop {
            Self::print_items(items, &dropped);
            println!("If nothing should be edited, please type 'nothing'.");

            let line = match Self::read_line() {
                Some(line) => line,
                None => return dropped,
            };

            if !line.eq_ignore_ascii_case("nothing") {
                let parsed: Result<Vec<usize>, _> = line
                    .replace(' ', "")
                    .split(',')
                    .filter(|s| !s.is_empty())
                    .map(str::parse)
                    .collect();
                match parsed {
                    Ok(indices) => dropped.extend(indices),
                    Err(_) => {
                        println!("Please only type in numbers separated with commas");
                        continue;
                    }
                }
            }

            loop {
                println!("Continue editing? y/n");
                match Self::read_line().as_deref() {
                    Some("n") | None => {
                        println!(
                            "Adding closest matches for the remaining {} candidates...",
                            items.iter().filter(|i| !dropped.contains(&i.index)).count()
                        );
                        return dropped;
                    }
                    Some("y") => break,
                    _ => {}
                }
            }
        }
    }
}

// ============================================================================
// Scripted Implementation
// ============================================================================

/// Reviewer answering from a fixed drop set. Lets tests and non-interactive
/// runs resolve ambiguity without real input.
#[derive(Default)]
pub struct ScriptedReviewer {
    drops: FxHashSet<usize>,
    /// Items seen on the last invocation, for assertions.
    pub presented: Vec<usize>,
}

impl ScriptedReviewer {
    pub fn keeping_all() -> Self {
        Self::default()
    }

    pub fn dropping(indices: &[usize]) -> Self {
        Self {
            drops: indices.iter().copied().collect(),
            presented: Vec::new(),
        }
    }
}

impl AmbiguityReviewer for ScriptedReviewer {
    fn resolve_ambiguous(&mut self, items: &[ReviewItem]) -> FxHashSet<usize> {
        self.presented = items.iter().map(|i| i.index).collect();
        // Only drop indices that were actually presented.
        items
            .iter()
            .map(|i| i.index)
            .filter(|i| self.drops.contains(i))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(index: usize) -> ReviewItem {
        ReviewItem {
            index,
            source: TrackRecord {
                title: format!("Album {}", index),
                artists: vec!["Artist".to_string()],
                duration: None,
                playlist_title: "pl".to_string(),
            },
            candidate: CandidateRecord {
                id: format!("id-{}", index),
                title: format!("Candidate {}", index),
                artists: vec!["Artist".to_string()],
                year: None,
                kind: Some("album".to_string()),
            },
        }
    }

    #[test]
    fn test_scripted_reviewer_drops_only_presented() {
        let mut reviewer = ScriptedReviewer::dropping(&[1, 7]);
        let dropped = reviewer.resolve_ambiguous(&[item(0), item(1), item(2)]);
        assert!(dropped.contains(&1));
        assert!(!dropped.contains(&7));
        assert_eq!(reviewer.presented, vec![0, 1, 2]);
    }

    #[test]
    fn test_scripted_reviewer_keeping_all() {
        let mut reviewer = ScriptedReviewer::keeping_all();
        assert!(reviewer.resolve_ambiguous(&[item(0), item(1)]).is_empty());
    }
}
