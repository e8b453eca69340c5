//! Query text and category selection for each tier.

use crate::indexer::Category;
use crate::matcher::Quality;

pub fn movie_categories(anime: bool) -> Vec<Category> {
    with_anime(Category::Movies, anime)
}

pub fn show_categories(anime: bool) -> Vec<Category> {
    with_anime(Category::Tv, anime)
}

fn with_anime(base: Category, anime: bool) -> Vec<Category> {
    if anime {
        vec![base, Category::Anime]
    } else {
        vec![base]
    }
}

/// `<title> [year] [quality]`
pub fn movie_query(title: &str, year: Option<u32>, quality: Option<Quality>) -> String {
    let mut parts = vec![title.trim().to_string()];
    parts.extend(year.map(|y| y.to_string()));
    parts.extend(quality.map(|q| q.token().to_string()));
    parts.join(" ")
}

/// Variants aimed at a single pack covering every season.
pub fn series_queries(title: &str, season_count: u32, quality: Option<Quality>) -> Vec<String> {
    let mut queries = vec![with_quality(format!("{} complete series", title.trim()), quality)];
    if season_count > 1 {
        queries.push(with_quality(
            format!("{} season 1-{}", title.trim(), season_count),
            quality,
        ));
    }
    queries
}

/// Variants aimed at a bundle of one season.
pub fn season_queries(title: &str, season: u32, quality: Option<Quality>) -> Vec<String> {
    let title = title.trim();
    vec![
        with_quality(format!("{} S{:02}", title, season), quality),
        with_quality(format!("{} season {} complete", title, season), quality),
        format!("{} S{:02} complete", title, season),
    ]
}

/// Quoted exact title plus the episode marker.
pub fn episode_query(title: &str, season: u32, episode: u32, quality: Option<Quality>) -> String {
    with_quality(
        format!("\"{}\" S{:02}E{:02}", title.trim(), season, episode),
        quality,
    )
}

/// Anime releases number episodes across seasons: `<title> <absolute>`.
pub fn anime_episode_query(title: &str, absolute: u32, quality: Option<Quality>) -> String {
    with_quality(format!("{} {}", title.trim(), absolute), quality)
}

fn with_quality(query: String, quality: Option<Quality>) -> String {
    match quality {
        Some(q) => format!("{} {}", query, q.token()),
        None => query,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_query() {
        assert_eq!(movie_query("Dune", Some(2021), Some(Quality::Uhd2160)), "Dune 2021 2160p");
        assert_eq!(movie_query(" Dune ", None, None), "Dune");
    }

    #[test]
    fn test_series_queries() {
        assert_eq!(
            series_queries("The Office", 9, Some(Quality::Hd1080)),
            vec!["The Office complete series 1080p", "The Office season 1-9 1080p"]
        );
        // A range over a single season is just a season query
        assert_eq!(series_queries("Chernobyl", 1, None), vec!["Chernobyl complete series"]);
    }

    #[test]
    fn test_season_queries() {
        assert_eq!(
            season_queries("The Office", 2, Some(Quality::Hd720)),
            vec![
                "The Office S02 720p",
                "The Office season 2 complete 720p",
                "The Office S02 complete",
            ]
        );
    }

    #[test]
    fn test_episode_query() {
        assert_eq!(
            episode_query("The Office", 1, 3, Some(Quality::Hd1080)),
            "\"The Office\" S01E03 1080p"
        );
        assert_eq!(episode_query("Lost", 10, 112, None), "\"Lost\" S10E112");
    }

    #[test]
    fn test_anime_episode_query() {
        assert_eq!(
            anime_episode_query("Frieren", 15, Some(Quality::Hd1080)),
            "Frieren 15 1080p"
        );
        assert_eq!(anime_episode_query("Frieren", 3, None), "Frieren 3");
    }

    #[test]
    fn test_categories() {
        assert_eq!(movie_categories(false), vec![Category::Movies]);
        assert_eq!(show_categories(true), vec![Category::Tv, Category::Anime]);
    }
}
