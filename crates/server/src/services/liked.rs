//! Liked jobs listing.

use axum::{Json, extract::State};
use jobswipe_core::{Error, JobCard, SwipeDirection};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::handler::AppState;

/// A liked job card with the time it was liked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikedCard {
    #[serde(flatten)]
    pub card: JobCard,
    /// Epoch milliseconds of the right swipe.
    pub liked_at: i64,
}

/// Response body of `GET /api/jobs/liked`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LikedOutput {
    pub count: usize,
    pub jobs: Vec<LikedCard>,
}

/// Every right-swiped job, newest like first.
pub async fn liked_impl(state: &AppState) -> Result<LikedOutput, Error> {
    let jobs: Vec<LikedCard> = state
        .store
        .liked_jobs()
        .await?
        .into_iter()
        .map(|liked| LikedCard { card: liked.job.to_card(Some(SwipeDirection::Right)), liked_at: liked.liked_at })
        .collect();

    Ok(LikedOutput { count: jobs.len(), jobs })
}

/// `GET /api/jobs/liked`
pub async fn liked(State(state): State<AppState>) -> Result<Json<LikedOutput>, ApiError> {
    Ok(Json(liked_impl(&state).await?))
}
