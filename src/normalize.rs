//! Shared text normalization for candidate scoring and query generation.
//!
//! Two levels are used by the scorer:
//! - *loose*: lowercase + trim, the form most scoring rules compare on
//! - *strict*: ASCII-folded, bracketed spans removed, punctuation collapsed
//!   to spaces - the form behind the stacking exact-match bonus and the
//!   fallback search query

use any_ascii::any_ascii;
use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

// ============================================================================
// REGEX PATTERNS
// ============================================================================

/// Square-bracketed spans anywhere in a title: "[FREE]", "[Official]"
pub static BRACKETED: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[[^\]]*\]").unwrap());

/// Parenthesized spans anywhere in a title: "(Official Audio)", "(feat. X)"
pub static PARENTHESIZED: Lazy<Regex> = Lazy::new(|| Regex::new(r"\([^\)]*\)").unwrap());

/// Non-word, non-space characters (replaced with a space in strict form)
pub static PUNCTUATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").unwrap());

/// Quoted substrings of length >= 2: `Balmorhea "Elegy"` -> `Elegy`
pub static QUOTED_SPAN: Lazy<Regex> = Lazy::new(|| Regex::new(r#""([^"]{2,})""#).unwrap());

/// Regex to collapse multiple whitespace into single space
pub static MULTI_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Check if a character is a Unicode combining mark (diacritical mark).
/// Used to filter out accents during normalization.
pub fn is_combining_mark(c: char) -> bool {
    matches!(c as u32, 0x0300..=0x036F | 0x1AB0..=0x1AFF | 0x1DC0..=0x1DFF | 0xFE20..=0xFE2F)
}

/// Fold Unicode text to ASCII by applying NFKD decomposition and removing
/// combining marks, then transliterating whatever non-ASCII remains.
/// e.g., "Beyoncé" -> "beyonce", "naïve" -> "naive"
pub fn fold_to_ascii(s: &str) -> String {
    let stripped: String = s.nfkd().filter(|c| !is_combining_mark(*c)).collect();
    any_ascii(&stripped).to_lowercase()
}

// ============================================================================
// NORMALIZATION FUNCTIONS
// ============================================================================

/// Loose form: lowercased and trimmed, nothing else. Most scoring rules
/// compare on this.
pub fn normalize_loose(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Strict form: ASCII-folded, bracketed/parenthesized spans removed,
/// punctuation replaced with spaces, whitespace collapsed.
pub fn normalize_strict(s: &str) -> String {
    let folded = fold_to_ascii(s);
    let no_brackets = BRACKETED.replace_all(&folded, "");
    let no_parens = PARENTHESIZED.replace_all(&no_brackets, "");
    let no_punct = PUNCTUATION.replace_all(&no_parens, " ");
    MULTI_SPACE.replace_all(&no_punct, " ").trim().to_string()
}

/// Strip bracketed and parenthesized spans, preserving the rest verbatim.
/// Used by the query generator after uploader-suffix removal.
pub fn strip_bracketed_spans(s: &str) -> String {
    let no_brackets = BRACKETED.replace_all(s, "");
    PARENTHESIZED.replace_all(&no_brackets, "").trim().to_string()
}

/// Replace punctuation with spaces and collapse whitespace, preserving case.
/// Used for the broader title-only fallback search.
pub fn strip_punctuation(s: &str) -> String {
    let no_punct = PUNCTUATION.replace_all(s, " ");
    MULTI_SPACE.replace_all(&no_punct, " ").trim().to_string()
}

/// Extract quoted substrings (length >= 2) as alternate title candidates.
pub fn quoted_spans(s: &str) -> Vec<String> {
    QUOTED_SPAN
        .captures_iter(s)
        .map(|c| c[1].trim().to_string())
        .filter(|q| !q.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_loose() {
        assert_eq!(normalize_loose("  Deceit and Betrayal "), "deceit and betrayal");
        assert_eq!(normalize_loose("I'm God"), "i'm god");
    }

    #[test]
    fn test_normalize_strict() {
        assert_eq!(normalize_strict("I'm God (Official Audio)"), "i m god");
        assert_eq!(normalize_strict("Song [FREE] - x2"), "song x2");
        assert_eq!(normalize_strict("A$AP Rocky"), "a ap rocky");
    }

    #[test]
    fn test_fold_to_ascii() {
        assert_eq!(fold_to_ascii("Björk"), "bjork");
        assert_eq!(fold_to_ascii("Motörhead"), "motorhead");
        assert_eq!(fold_to_ascii("Beyoncé"), "beyonce");
    }

    #[test]
    fn test_strip_bracketed_spans() {
        assert_eq!(strip_bracketed_spans("Song (Remix) [FREE]"), "Song");
        assert_eq!(strip_bracketed_spans("No brackets here"), "No brackets here");
    }

    #[test]
    fn test_strip_punctuation() {
        assert_eq!(strip_punctuation("Deceit & Betrayal!"), "Deceit Betrayal");
        assert_eq!(strip_punctuation("  spaced   out  "), "spaced out");
    }

    #[test]
    fn test_quoted_spans() {
        assert_eq!(quoted_spans(r#"Balmorhea "Elegy""#), vec!["Elegy".to_string()]);
        assert_eq!(quoted_spans(r#"single "a" char"#), Vec::<String>::new());
        assert!(quoted_spans("no quotes").is_empty());
    }
}
