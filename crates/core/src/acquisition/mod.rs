//! Movie and show acquisition.
//!
//! The engine queries the indexer, ranks results with the matcher, and
//! hands the winner to the download client. Shows walk the [`Tier`] state
//! machine: full series, then season packs, then single episodes.

mod engine;
mod gateway;
pub mod queries;
mod strategy;
mod types;

pub use engine::AcquisitionEngine;
pub use gateway::SubmissionGateway;
pub use strategy::{Tier, TierResult};
pub use types::*;
