//! Show acquisition tiers as an explicit state machine.
//!
//! ```text
//! FullSeries ──acquired──────────────────────────────▶ Done
//!     │ exhausted
//!     ▼
//! SeasonPack(s) ──acquired──▶ SeasonPack(s+1) | Done
//!     │ exhausted
//!     ▼
//! Episodes(s) ──finished────▶ SeasonPack(s+1) | Done
//! ```
//!
//! The transition function is pure; the engine performs the I/O for each
//! tier and reports back whether it acquired something.

use serde::Serialize;

/// One level of the fallback sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "tier", rename_all = "snake_case")]
pub enum Tier {
    FullSeries,
    SeasonPack { season: u32 },
    Episodes { season: u32 },
    Done,
}

/// What running a tier produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierResult {
    /// A submission succeeded.
    Acquired,
    /// No candidate qualified or every submission failed.
    Exhausted,
}

impl Tier {
    /// Entry state for a show with `season_count` seasons.
    pub fn start(season_count: u32) -> Tier {
        if season_count == 0 {
            Tier::Done
        } else {
            Tier::FullSeries
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Tier::Done)
    }

    /// Next tier after this one finished with `result`.
    pub fn next(self, result: TierResult, season_count: u32) -> Tier {
        match (self, result) {
            (Tier::FullSeries, TierResult::Acquired) => Tier::Done,
            (Tier::FullSeries, TierResult::Exhausted) => Tier::SeasonPack { season: 1 },
            (Tier::SeasonPack { season }, TierResult::Acquired) => next_season(season, season_count),
            (Tier::SeasonPack { season }, TierResult::Exhausted) => Tier::Episodes { season },
            // Episodes always run to the end of the season; missing ones
            // never cause a retry.
            (Tier::Episodes { season }, _) => next_season(season, season_count),
            (Tier::Done, _) => Tier::Done,
        }
    }
}

fn next_season(season: u32, season_count: u32) -> Tier {
    if season < season_count {
        Tier::SeasonPack { season: season + 1 }
    } else {
        Tier::Done
    }
}
