//! Video quality tiers and their scoring tables.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::normalize::title_tokens;

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Resolution tier requested by the caller or detected in a release title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Quality {
    #[serde(rename = "2160p")]
    Uhd2160,
    #[serde(rename = "1080p")]
    Hd1080,
    #[serde(rename = "720p")]
    Hd720,
    #[serde(rename = "480p")]
    Sd480,
}

/// Acceptable size range for a release of a given quality.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeBand {
    pub min_gb: f64,
    pub max_gb: f64,
    pub ideal_gb: f64,
}

impl Quality {
    /// All tiers, best first.
    pub const ALL: [Quality; 4] = [
        Quality::Uhd2160,
        Quality::Hd1080,
        Quality::Hd720,
        Quality::Sd480,
    ];

    /// Canonical release-title token.
    pub fn token(&self) -> &'static str {
        match self {
            Quality::Uhd2160 => "2160p",
            Quality::Hd1080 => "1080p",
            Quality::Hd720 => "720p",
            Quality::Sd480 => "480p",
        }
    }

    /// Score given to a title carrying this tier when it is not the
    /// requested one.
    pub fn match_score(&self) -> f32 {
        match self {
            Quality::Uhd2160 => 1.0,
            Quality::Hd1080 => 0.8,
            Quality::Hd720 => 0.6,
            Quality::Sd480 => 0.4,
        }
    }

    pub fn size_band(&self) -> SizeBand {
        let (min_gb, max_gb, ideal_gb) = match self {
            Quality::Uhd2160 => (10.0, 80.0, 25.0),
            Quality::Hd1080 => (3.0, 20.0, 8.0),
            Quality::Hd720 => (1.0, 8.0, 4.0),
            Quality::Sd480 => (0.5, 4.0, 1.5),
        };
        SizeBand {
            min_gb,
            max_gb,
            ideal_gb,
        }
    }

    /// Detect the best quality tier named in a release title.
    pub fn detect(title: &str) -> Option<Quality> {
        let tokens = title_tokens(title);
        Quality::ALL.into_iter().find(|q| {
            tokens
                .iter()
                .any(|t| q.aliases().contains(&t.as_str()))
        })
    }

    /// Whether the title names this exact tier token.
    pub fn named_in(&self, title: &str) -> bool {
        title_tokens(title).iter().any(|t| t == self.token())
    }

    fn aliases(&self) -> &'static [&'static str] {
        match self {
            Quality::Uhd2160 => &["2160p", "4k", "uhd"],
            Quality::Hd1080 => &["1080p", "1080i"],
            Quality::Hd720 => &["720p"],
            Quality::Sd480 => &["480p", "576p"],
        }
    }
}

impl SizeBand {
    /// Fitness of a size in bytes against this band (0.0-1.0).
    pub fn fitness(&self, size_bytes: u64) -> f32 {
        let gb = size_bytes as f64 / GIB;
        if gb < self.min_gb {
            // Too small - likely incomplete
            return 0.3;
        }
        if gb > self.max_gb {
            // Too big - likely bundled or misclassified
            return 0.5;
        }
        (1.0 - (gb - self.ideal_gb).abs() / self.ideal_gb).max(0.0) as f32
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown quality: {0}")]
pub struct UnknownQuality(pub String);

impl FromStr for Quality {
    type Err = UnknownQuality;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Quality::ALL
            .into_iter()
            .find(|q| q.aliases().contains(&lower.as_str()))
            .ok_or_else(|| UnknownQuality(s.to_string()))
    }
}

impl TryFrom<String> for Quality {
    type Error = UnknownQuality;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
