//! Title normalization.
//!
//! Release titles ("The.Office.US.S01E03.1080p.WEB-DL.x264-GRP") and
//! caller-supplied titles ("The Office") are reduced to comparable
//! canonical forms ("the office us grp" / "the office").

use once_cell::sync::Lazy;
use regex_lite::Regex;

/// Resolution, source, codec, audio and streaming-service tokens.
const TECHNICAL_TOKENS: &[&str] = &[
    // Resolution
    "2160p", "1080p", "1080i", "720p", "576p", "480p", "4k", "uhd", "hdr", "hdr10", "dv",
    // Source
    "bluray", "blu-ray", "bdrip", "brrip", "remux", "web-dl", "webdl", "webrip", "web-rip",
    "web", "hdtv", "dvdrip", "dvd", "hdrip", "proper", "repack",
    // Codec
    "x264", "x265", "h264", "h265", "h.264", "h.265", "hevc", "avc", "xvid", "av1", "10bit",
    // Audio
    "aac", "ac3", "dts", "dts-hd", "truehd", "atmos", "ddp5.1", "dd5.1", "ddp", "5.1", "7.1",
    // Streaming services
    "amzn", "nf", "dsnp", "hmax", "atvp", "hulu", "pcok", "pmtp",
];

static TECHNICAL_RE: Lazy<Regex> = Lazy::new(|| {
    let alternation = TECHNICAL_TOKENS
        .iter()
        .map(|t| regex_lite::escape(t))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"\b(?:{})\b", alternation)).expect("technical token pattern")
});

/// `s01e03` / `3x07` style markers.
static EPISODE_MARKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bs\d{1,3}e\d{1,4}(?:e\d{1,4})*\b|\b\d{1,2}x\d{2,3}\b").expect("episode marker pattern")
});

static NON_ALNUM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9\s]").expect("punctuation pattern"));

static MULTI_SPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern"));

/// Canonical form of an indexer result title.
pub fn normalize_result_title(text: &str) -> String {
    // Underscores count as word characters for \b, so split on them first.
    let lower = text.to_lowercase().replace('_', " ");
    let stripped = TECHNICAL_RE.replace_all(&lower, " ");
    let stripped = EPISODE_MARKER_RE.replace_all(&stripped, " ");
    collapse(&stripped)
}

/// Canonical form of a caller-supplied target title.
pub fn normalize_target_title(text: &str) -> String {
    collapse(&text.to_lowercase())
}

/// Exact-match gate: the normalized result title must start with the
/// normalized target title, on a word boundary.
pub fn matches_target(result_title: &str, normalized_target: &str) -> bool {
    if normalized_target.is_empty() {
        return false;
    }
    let normalized = normalize_result_title(result_title);
    match normalized.strip_prefix(normalized_target) {
        Some(rest) => rest.is_empty() || rest.starts_with(' '),
        None => false,
    }
}

/// Lowercased alphanumeric tokens of a title.
pub fn title_tokens(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Whether any token of the title is one of `words`.
pub(crate) fn has_any_token(title: &str, words: &[&str]) -> bool {
    title_tokens(title).iter().any(|t| words.contains(&t.as_str()))
}

fn collapse(text: &str) -> String {
    // Possessives join their word: "grey's" and "greys" compare equal
    let joined = text.replace(['\'', '\u{2019}'], "");
    let spaced = NON_ALNUM_RE.replace_all(&joined, " ");
    MULTI_SPACE_RE.replace_all(&spaced, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_result_title_strips_technical_tokens() {
        assert_eq!(
            normalize_result_title("The.Office.US.S01E03.1080p.WEB-DL.x264-GRP"),
            "the office us grp"
        );
        assert_eq!(
            normalize_result_title("Dune.Part.Two.2024.2160p.AMZN.WEBRip.DDP5.1.x265"),
            "dune part two 2024"
        );
    }

    #[test]
    fn test_normalize_result_title_strips_nxnn_marker() {
        assert_eq!(normalize_result_title("Seinfeld 3x07 HDTV"), "seinfeld");
    }

    #[test]
    fn test_normalize_keeps_words_containing_tokens() {
        // "nf" and "dts" are only removed as whole tokens
        assert_eq!(normalize_result_title("Infinity.Pool.2023"), "infinity pool 2023");
        assert_eq!(normalize_result_title("Webster_1080p"), "webster");
    }

    #[test]
    fn test_normalize_target_title() {
        assert_eq!(normalize_target_title("  The Office: (US) "), "the office us");
        assert_eq!(normalize_target_title("Spider-Man"), "spider man");
    }

    #[test]
    fn test_matches_target_prefix() {
        let target = normalize_target_title("The Office");
        assert!(matches_target("The.Office.US.S01E01.720p", &target));
        assert!(matches_target("The Office", &target));
    }

    #[test]
    fn test_matches_target_rejects_mentions() {
        let target = normalize_target_title("The Office");
        // Mentions the title but does not start with it
        assert!(!matches_target("Best.Of.The.Office.Bloopers.1080p", &target));
        // Shares a prefix but not on a word boundary
        assert!(!matches_target("The.Officers.Club.1080p", &target));
    }

    #[test]
    fn test_apostrophes_join_words() {
        assert_eq!(normalize_target_title("Grey's Anatomy"), "greys anatomy");
        assert_eq!(normalize_target_title("Grey\u{2019}s Anatomy"), "greys anatomy");

        let target = normalize_target_title("Grey's Anatomy");
        assert!(matches_target("Greys.Anatomy.S01E01.720p.HDTV", &target));
        assert!(matches_target("Grey's.Anatomy.S01E01.720p.HDTV", &target));
        assert!(matches_target("Greys Anatomy S02 COMPLETE", &target));
    }

    #[test]
    fn test_matches_target_empty_target() {
        assert!(!matches_target("Anything", ""));
    }

    #[test]
    fn test_has_any_token() {
        assert!(has_any_token("Show.S01.COMPLETE", &["complete"]));
        assert!(!has_any_token("Show.S01.Completed", &["complete"]));
    }

    #[test]
    fn test_title_tokens() {
        assert_eq!(
            title_tokens("Show.Name.S02.Complete-1080p"),
            vec!["show", "name", "s02", "complete", "1080p"]
        );
    }
}
