//! HTTP handlers for referral endpoints.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::state::AppState;
use crate::application::AppError;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferralStatsResponse {
    pub referral_code: Option<String>,
    pub successful_referrals: u64,
}

/// GET /api/referrals/my-stats
pub async fn my_stats(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<ReferralStatsResponse>, AppError> {
    let stats = state.referral_stats_handler().handle(user.id).await?;
    Ok(Json(ReferralStatsResponse {
        referral_code: stats.referral_code,
        successful_referrals: stats.successful_referrals,
    }))
}
