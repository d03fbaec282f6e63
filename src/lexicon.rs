//! Keyword tables driving query generation and scoring.
//!
//! Everything the matcher knows about uploader naming conventions lives here
//! as one named configuration structure, independently testable and separate
//! from scoring control flow. `Lexicon::default()` carries the production
//! tables; tests can construct trimmed-down variants.

/// Keyword tables used by the query generator and candidate scorer.
#[derive(Clone, Debug)]
pub struct Lexicon {
    /// Uploader/descriptor suffixes stripped from the end of titles
    /// (case-insensitive).
    pub uploader_suffixes: Vec<&'static str>,
    /// Keywords marking a hyphen segment as a channel name rather than an
    /// artist candidate.
    pub descriptor_keywords: Vec<&'static str>,
    /// Keywords marking a source artist string as channel-like, which
    /// suppresses the artist-mismatch penalty.
    pub channel_like_keywords: Vec<&'static str>,
    /// Substrings marking a candidate title as a remix/mashup/cover.
    pub remix_markers: Vec<&'static str>,
    /// Version suffixes stripped from loose titles before comparison.
    pub version_suffixes: Vec<&'static str>,
    /// Known-artist lookup: lowercase pattern -> canonical artist name.
    /// Ordered; the first matching pattern wins.
    pub known_artists: Vec<(&'static str, &'static str)>,
    /// Titles common enough that the bare cleaned title is always worth
    /// searching on its own.
    pub well_known_titles: Vec<&'static str>,
    /// Live/official suffixes stripped for the extra no-suffix variant.
    pub live_suffixes: Vec<&'static str>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            uploader_suffixes: vec![
                " (Official Audio)",
                " (Official Video)",
                " (Official Music Video)",
                " (Lyrics)",
                " (Lyric Video)",
                " (Audio)",
                " (Video)",
                " (Slowed)",
                " (Sped Up)",
                " (Remix)",
                " (Lo-Fi Remix)",
                " (Instrumental)",
                " (Beat)",
                " (Type Beat)",
                " (Free)",
                " [FREE]",
                " (No Copyright Music)",
                " (No Copyright)",
            ],
            descriptor_keywords: vec![
                "music",
                "orchestral",
                "cinematic",
                "epic",
                "drone",
                "instrumental",
                "records",
                "studios",
                "mix",
                "channel",
                "official",
                "masterpiece",
            ],
            channel_like_keywords: vec![
                "records",
                "music only",
                "studios",
                "channel",
                "official",
                "cosmonaut",
                "cercle",
                "mix",
                "cinematic",
            ],
            remix_markers: vec!["remix", "mashup", "cover", "x", "×"],
            version_suffixes: vec![
                " (slowed)",
                " (sped up)",
                " (remix)",
                " (instrumental)",
                " (beat)",
                " (type beat)",
                " (free)",
                " [free]",
            ],
            known_artists: vec![
                ("clams casino", "Clams Casino"),
                ("post malone", "Post Malone"),
                ("kanye west", "Kanye West"),
                ("kendrick lamar", "Kendrick Lamar"),
                ("juice wrld", "Juice WRLD"),
                ("asap rocky", "A$AP Rocky"),
            ],
            well_known_titles: vec![
                "good morning",
                "loyalty",
                "congratulations",
                "too many nights",
                "i'm god",
            ],
            live_suffixes: vec![
                " (Live)",
                " (Official Audio)",
                " (Official Video)",
                " (Official Music Video)",
            ],
        }
    }
}

impl Lexicon {
    /// Strip uploader/descriptor suffixes from the end of a title.
    /// Suffixes are checked in table order; each may strip at most once.
    pub fn strip_uploader_suffixes(&self, title: &str) -> String {
        let mut result = title.to_string();
        for suffix in &self.uploader_suffixes {
            let lower = result.to_lowercase();
            if lower.ends_with(&suffix.to_lowercase()) {
                result.truncate(result.len() - suffix.len());
            }
        }
        result
    }

    /// True if a hyphen segment looks like a channel name, not an artist.
    pub fn is_descriptor_segment(&self, segment: &str) -> bool {
        let lower = segment.to_lowercase();
        self.descriptor_keywords.iter().any(|kw| lower.contains(kw))
    }

    /// True if a source artist string looks like an uploader channel.
    pub fn is_channel_like(&self, artists_loose: &str) -> bool {
        self.channel_like_keywords
            .iter()
            .any(|kw| artists_loose.contains(kw))
    }

    /// First known-artist canonical name whose pattern appears in `text`
    /// (lowercased haystack).
    pub fn known_artist_in(&self, text: &str) -> Option<&'static str> {
        let lower = text.to_lowercase();
        self.known_artists
            .iter()
            .find(|(pattern, _)| lower.contains(pattern))
            .map(|&(_, canonical)| canonical)
    }

    /// Lowercase pattern of the first known artist appearing in `text`.
    /// Used by the scorer's expected-artist bonus.
    pub fn known_artist_pattern_in(&self, text: &str) -> Option<&'static str> {
        let lower = text.to_lowercase();
        self.known_artists
            .iter()
            .find(|(pattern, _)| lower.contains(pattern))
            .map(|&(pattern, _)| pattern)
    }

    /// Strip version suffixes from an already-lowercased title.
    pub fn strip_version_suffixes(&self, title_loose: &str) -> String {
        let mut result = title_loose.to_string();
        for suffix in &self.version_suffixes {
            if result.ends_with(suffix) {
                result.truncate(result.len() - suffix.len());
            }
        }
        result
    }

    /// True if the cleaned title contains a well-known title.
    pub fn is_well_known_title(&self, title: &str) -> bool {
        let lower = title.to_lowercase();
        self.well_known_titles.iter().any(|t| lower.contains(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_uploader_suffixes() {
        let lex = Lexicon::default();
        assert_eq!(lex.strip_uploader_suffixes("Song (Official Audio)"), "Song");
        assert_eq!(lex.strip_uploader_suffixes("Song (official audio)"), "Song");
        assert_eq!(lex.strip_uploader_suffixes("Plain Song"), "Plain Song");
    }

    #[test]
    fn test_descriptor_segment() {
        let lex = Lexicon::default();
        assert!(lex.is_descriptor_segment("Epic Music Channel"));
        assert!(lex.is_descriptor_segment("Cinematic Records"));
        assert!(!lex.is_descriptor_segment("Audiomachine"));
    }

    #[test]
    fn test_known_artist_lookup() {
        let lex = Lexicon::default();
        assert_eq!(lex.known_artist_in("i'm god clams casino"), Some("Clams Casino"));
        assert_eq!(lex.known_artist_in("ASAP Rocky type beat"), Some("A$AP Rocky"));
        assert_eq!(lex.known_artist_in("unrelated"), None);
    }

    #[test]
    fn test_strip_version_suffixes() {
        let lex = Lexicon::default();
        assert_eq!(lex.strip_version_suffixes("song (remix)"), "song");
        assert_eq!(lex.strip_version_suffixes("song (sped up)"), "song");
        assert_eq!(lex.strip_version_suffixes("song"), "song");
    }

    #[test]
    fn test_channel_like() {
        let lex = Lexicon::default();
        assert!(lex.is_channel_like("epic cinematic studios"));
        assert!(!lex.is_channel_like("audiomachine"));
    }
}
