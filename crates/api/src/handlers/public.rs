//! Unauthenticated handlers for public regatta pages and shared strategies.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use regatta_core::aggregate::{load_bundle, PhaseEntry, SailorRef};
use regatta_core::public_link::grants_access;
use regatta_core::strategy::RaceInfo;
use regatta_core::types::{DbId, Timestamp};
use regatta_db::models::regatta::{Regatta, RegattaNotice, ScheduleEntry};
use regatta_db::repositories::{RaceStrategyRepo, RegattaNoticeRepo, RegattaRepo};
use regatta_db::PgStrategySource;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct RegattaSchedule {
    pub regatta: Regatta,
    pub races: Vec<ScheduleEntry>,
}

#[derive(Debug, Serialize)]
pub struct RegattaNotices {
    pub regatta_id: DbId,
    pub notices: Vec<RegattaNotice>,
}

/// A strategy as shown on its public link. Coach and crew lists are never
/// exposed here.
#[derive(Debug, Serialize)]
pub struct PublicStrategy {
    pub race: Option<RaceInfo>,
    pub sailor_name: Option<String>,
    pub phases: Vec<PhaseEntry>,
    pub text: String,
    pub shared_at: Option<Timestamp>,
}

/// Unpublished regattas look the same as missing ones.
async fn ensure_published_regatta(pool: &sqlx::PgPool, id: DbId) -> AppResult<Regatta> {
    RegattaRepo::find_published(pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Regatta {id} not found")))
}

/// GET /api/public/regattas/{id}/schedule
pub async fn regatta_schedule(
    State(state): State<AppState>,
    Path(regatta_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let regatta = ensure_published_regatta(&state.pool, regatta_id).await?;
    let races = RegattaRepo::schedule(&state.pool, regatta_id).await?;

    Ok(Json(DataResponse {
        data: RegattaSchedule { regatta, races },
    }))
}

/// GET /api/public/regattas/{id}/notices
///
/// Published notices, newest first.
pub async fn regatta_notices(
    State(state): State<AppState>,
    Path(regatta_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_published_regatta(&state.pool, regatta_id).await?;
    let notices = RegattaNoticeRepo::list_published(&state.pool, regatta_id).await?;

    Ok(Json(DataResponse {
        data: RegattaNotices {
            regatta_id,
            notices,
        },
    }))
}

/// GET /api/public/strategies/{token}
///
/// 404 for unknown tokens and for links whose sharing is turned off.
pub async fn shared_strategy(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> AppResult<impl IntoResponse> {
    let record = RaceStrategyRepo::find_by_public_token(&state.pool, &token)
        .await?
        .filter(|row| grants_access(&row.public_link(), &token))
        .ok_or_else(|| AppError::NotFound("Shared strategy not found".into()))?;

    let source = PgStrategySource::new(state.pool.clone());
    let bundle = load_bundle(&source, record.race_id, SailorRef::Account(record.user_id)).await?;

    tracing::debug!(race_id = record.race_id, user_id = record.user_id, "Public strategy viewed");

    Ok(Json(DataResponse {
        data: PublicStrategy {
            phases: bundle.phase_overview(),
            text: bundle.compile_text(),
            sailor_name: bundle.sailor.profile.map(|p| p.display_name),
            race: bundle.race,
            shared_at: record.public_shared_at,
        },
    }))
}
