//! Coach rate preview.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use regatta_core::error::CoreError;
use regatta_core::pricing::{parse_rate, rate_breakdown, PricingModel};
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body for `POST /coach/pricing/preview`. The rate is the text the coach
/// typed.
#[derive(Debug, Deserialize)]
pub struct PricingPreviewInput {
    pub pricing_model: String,
    pub rate: String,
    pub currency: Option<String>,
}

/// POST /api/v1/coach/pricing/preview
///
/// What a coach would receive for a rate after the platform fee.
pub async fn preview(
    _auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<PricingPreviewInput>,
) -> AppResult<impl IntoResponse> {
    let model = PricingModel::parse(&input.pricing_model).map_err(CoreError::Validation)?;
    let gross = parse_rate(&input.rate).map_err(CoreError::Validation)?;
    let breakdown = rate_breakdown(
        model,
        gross,
        input.currency.as_deref(),
        state.config.platform_fee_percent,
    )
    .map_err(CoreError::Validation)?;

    Ok(Json(DataResponse { data: breakdown }))
}
