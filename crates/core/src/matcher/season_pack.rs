//! Season and episode marker classification.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex_lite::Regex;

use super::normalize::{has_any_token, title_tokens};

/// `s02`, `s02e05`, `s02e05e06`
static SEASON_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^s(\d{1,3})((?:e\d{1,4})*)$").expect("season token pattern"));

/// `2x05`
static CROSS_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})x(\d{2,3})$").expect("cross token pattern"));

/// Bare `e05`, left over when a title writes `S02.E05`.
static BARE_EPISODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^e(\d{1,4})$").expect("bare episode pattern"));

static NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{1,4}$").expect("number pattern"));

/// `s01-s09`, `s01-09`, `season 1-9`, `seasons 1 to 9`, matched on the
/// lowercased raw title.
static SEASON_RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:\bs|\bseasons?[\s._-]*)(\d{1,3})[\s._]*(?:-|to)[\s._]*(?:s|season[\s._]*)?(\d{1,3})\b",
    )
    .expect("season range pattern")
});

/// One season/episode marker found in a title.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Marker {
    season: Option<u32>,
    episodes: Vec<u32>,
}

fn parse_markers(title: &str) -> Vec<Marker> {
    let tokens = title_tokens(title);
    let mut markers = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        let token = tokens[i].as_str();
        let next = tokens.get(i + 1).map(String::as_str);

        if let Some(caps) = SEASON_TOKEN_RE.captures(token) {
            let season = caps[1].parse::<u32>().ok();
            let mut episodes: Vec<u32> = caps[2]
                .split('e')
                .filter_map(|e| e.parse::<u32>().ok())
                .collect();
            if episodes.is_empty() {
                if let Some(caps) = next.and_then(|n| BARE_EPISODE_RE.captures(n)) {
                    episodes.extend(caps[1].parse::<u32>().ok());
                    i += 1;
                }
            }
            markers.push(Marker { season, episodes });
        } else if let Some(caps) = CROSS_TOKEN_RE.captures(token) {
            markers.push(Marker {
                season: caps[1].parse::<u32>().ok(),
                episodes: caps[2].parse::<u32>().ok().into_iter().collect(),
            });
        } else if token == "season" && next.is_some_and(|n| NUMBER_RE.is_match(n)) {
            markers.push(Marker {
                season: next.and_then(|n| n.parse::<u32>().ok()),
                episodes: vec![],
            });
            i += 1;
        } else if let Some(caps) = BARE_EPISODE_RE.captures(token) {
            markers.push(Marker {
                season: None,
                episodes: caps[1].parse::<u32>().ok().into_iter().collect(),
            });
        } else if (token == "ep" || token == "episode")
            && next.is_some_and(|n| NUMBER_RE.is_match(n))
        {
            markers.push(Marker {
                season: None,
                episodes: next
                    .and_then(|n| n.parse::<u32>().ok())
                    .into_iter()
                    .collect(),
            });
            i += 1;
        }

        i += 1;
    }

    markers
}

/// Whether the title carries any episode marker at all.
pub fn has_episode_marker(title: &str) -> bool {
    parse_markers(title).iter().any(|m| !m.episodes.is_empty())
}

/// Whether the title carries the marker of this exact episode.
pub fn has_episode(title: &str, season: u32, episode: u32) -> bool {
    parse_markers(title)
        .iter()
        .any(|m| m.season == Some(season) && m.episodes.contains(&episode))
}

/// Whether a result title is a complete-season bundle for `season`.
///
/// The title must name the season, must not name an episode of that
/// season, and must either say "complete"/"season" or carry no episode
/// marker at all.
pub fn is_season_pack(title: &str, season: u32) -> bool {
    let markers = parse_markers(title);

    let names_season = markers.iter().any(|m| m.season == Some(season));
    if !names_season {
        return false;
    }

    let names_episode_of_season = markers
        .iter()
        .any(|m| m.season == Some(season) && !m.episodes.is_empty());
    if names_episode_of_season {
        return false;
    }

    let any_episode = markers.iter().any(|m| !m.episodes.is_empty());
    has_any_token(title, &["complete", "season"]) || !any_episode
}

/// Whether a result title plausibly covers every one of `season_count`
/// seasons.
///
/// A season range must start at 1 and reach the last season. Without a
/// range, the title must say "complete series" or name no season at all;
/// a title naming a single season only passes for a one-season show.
pub fn is_series_pack(title: &str, season_count: u32) -> bool {
    if has_episode_marker(title) {
        return false;
    }

    if let Some(caps) = SEASON_RANGE_RE.captures(&title.to_lowercase()) {
        let first = caps[1].parse::<u32>().unwrap_or(u32::MAX);
        let last = caps[2].parse::<u32>().unwrap_or(0);
        return first <= 1 && last >= season_count;
    }

    let tokens = title_tokens(title);
    if tokens.windows(2).any(|w| w[0] == "complete" && w[1] == "series") {
        return true;
    }

    let seasons: BTreeSet<u32> = parse_markers(title)
        .iter()
        .filter_map(|m| m.season)
        .collect();
    seasons.is_empty() || (season_count <= 1 && seasons.iter().all(|&s| s == 1))
}

/// Whether the title carries an absolute episode number, as anime
/// releases do ("Frieren - 03 [1080p]").
///
/// Titles with a regular `S##E##` marker never match here. Otherwise the
/// last bare number that is not a season number or a year counts.
pub fn has_absolute_episode(title: &str, absolute: u32) -> bool {
    let markers = parse_markers(title);
    if markers
        .iter()
        .any(|m| m.season.is_some() && !m.episodes.is_empty())
    {
        return false;
    }
    if markers
        .iter()
        .any(|m| m.season.is_none() && m.episodes.contains(&absolute))
    {
        return true;
    }

    let tokens = title_tokens(title);
    tokens
        .iter()
        .enumerate()
        .filter(|(i, t)| NUMBER_RE.is_match(t) && (*i == 0 || tokens[i - 1] != "season"))
        .filter_map(|(_, t)| t.parse::<u32>().ok().map(|n| (t.len(), n)))
        .filter(|&(len, n)| !(len == 4 && (1900..=2100).contains(&n)))
        .last()
        .is_some_and(|(_, n)| n == absolute)
}
