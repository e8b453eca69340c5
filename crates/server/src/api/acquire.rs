//! Acquisition endpoints.
//!
//! Each request runs its acquisition to completion before responding and
//! carries its own `AcquisitionStats`, so concurrent requests never share
//! bookkeeping.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;
use uuid::Uuid;

use seafarer_core::{
    AcquisitionStats, MovieOutcome, MovieRequest, Quality, ShowOutcome, ShowRequest,
};

use crate::metrics::record_acquisition;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AcquireMovieRequest {
    pub query: String,
    /// TMDB id; 0 or absent means unknown.
    #[serde(default)]
    pub tmdb: Option<u64>,
    #[serde(default)]
    pub quality: Option<Quality>,
    #[serde(default)]
    pub year: Option<u32>,
    #[serde(default)]
    pub anime: bool,
}

#[derive(Debug, Deserialize)]
pub struct AcquireShowRequest {
    pub query: String,
    #[serde(default)]
    pub tmdb: Option<u64>,
    #[serde(default)]
    pub quality: Option<Quality>,
    /// Episode count per season, season 1 first.
    pub seasons: Vec<u32>,
    #[serde(default)]
    pub anime: bool,
}

#[derive(Debug, Serialize)]
pub struct AcquireMovieResponse {
    pub id: Uuid,
    pub outcome: MovieOutcome,
    pub stats: AcquisitionStats,
}

#[derive(Debug, Serialize)]
pub struct AcquireShowResponse {
    pub id: Uuid,
    pub outcome: ShowOutcome,
    pub stats: AcquisitionStats,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(message: &str) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}

pub async fn acquire_movie(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AcquireMovieRequest>,
) -> Result<Json<AcquireMovieResponse>, ApiError> {
    let title = body.query.trim();
    if title.is_empty() {
        return Err(bad_request("query must not be empty"));
    }

    let id = Uuid::new_v4();
    let request = MovieRequest {
        title: title.to_string(),
        catalog_id: body.tmdb,
        quality: body.quality,
        year: body.year,
        anime: body.anime,
    };
    info!(%id, title = %request.title, "Movie acquisition requested");

    let started = Instant::now();
    let mut stats = AcquisitionStats::default();
    let outcome = state.engine().acquire_movie(&request, &mut stats).await;
    record_acquisition("movie", outcome.is_success(), &stats, 0, started.elapsed());

    info!(%id, success = outcome.is_success(), "Movie acquisition finished");
    Ok(Json(AcquireMovieResponse { id, outcome, stats }))
}

pub async fn acquire_show(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AcquireShowRequest>,
) -> Result<Json<AcquireShowResponse>, ApiError> {
    let title = body.query.trim();
    if title.is_empty() {
        return Err(bad_request("query must not be empty"));
    }
    if body.seasons.is_empty() {
        return Err(bad_request("seasons must list at least one season"));
    }

    let id = Uuid::new_v4();
    let request = ShowRequest {
        title: title.to_string(),
        catalog_id: body.tmdb,
        quality: body.quality,
        seasons: body.seasons,
        anime: body.anime,
    };
    info!(
        %id,
        title = %request.title,
        seasons = request.season_count(),
        "Show acquisition requested"
    );

    let started = Instant::now();
    let mut stats = AcquisitionStats::default();
    let outcome = state.engine().acquire_show(&request, &mut stats).await;
    record_acquisition(
        "show",
        outcome.is_complete(),
        &stats,
        outcome.missing_episodes.len(),
        started.elapsed(),
    );

    info!(
        %id,
        complete = outcome.is_complete(),
        missing = outcome.missing_episodes.len(),
        "Show acquisition finished"
    );
    Ok(Json(AcquireShowResponse { id, outcome, stats }))
}
