//! Handlers for the GPS race timer.
//!
//! A session belongs to one user on one race. Points are uploaded in
//! batches while it runs; finishing computes and stores the track summary.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use regatta_core::error::CoreError;
use regatta_core::track::{self, TrackSample, TrackSummary};
use regatta_core::types::DbId;
use regatta_db::models::timer::RaceTimerSession;
use regatta_db::repositories::TimerSessionRepo;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::ensure_race_exists;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PointsInput {
    pub points: Vec<TrackSample>,
}

#[derive(Debug, Serialize)]
pub struct PointsAccepted {
    pub session_id: DbId,
    pub accepted: usize,
    pub point_count: i32,
}

#[derive(Debug, Serialize)]
pub struct FinishedSession {
    pub session: RaceTimerSession,
    pub summary: TrackSummary,
}

/// Load a session owned by the caller.
///
/// Another user's session is reported as missing.
async fn ensure_own_session(
    pool: &sqlx::PgPool,
    session_id: DbId,
    user_id: DbId,
) -> AppResult<RaceTimerSession> {
    TimerSessionRepo::find_by_id(pool, session_id)
        .await?
        .filter(|s| s.user_id == user_id)
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "RaceTimerSession",
                id: session_id,
            })
        })
}

fn already_finished(session_id: DbId) -> AppError {
    AppError::Core(CoreError::Conflict(format!(
        "Timer session {session_id} is already finished"
    )))
}

/// POST /api/v1/races/{race_id}/timer/sessions
pub async fn start_session(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(race_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_race_exists(&state.pool, race_id).await?;

    let session = TimerSessionRepo::create(&state.pool, race_id, auth.user_id).await?;
    tracing::info!(user_id = auth.user_id, race_id, session_id = session.id, "Race timer started");

    Ok((StatusCode::CREATED, Json(DataResponse { data: session })))
}

/// POST /api/v1/timer/sessions/{id}/points
pub async fn append_points(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(session_id): Path<DbId>,
    Json(input): Json<PointsInput>,
) -> AppResult<impl IntoResponse> {
    let session = ensure_own_session(&state.pool, session_id, auth.user_id).await?;
    if session.is_finished() {
        return Err(already_finished(session_id));
    }
    track::validate_samples(&input.points).map_err(CoreError::Validation)?;

    // The session may have finished since it was read.
    let point_count = TimerSessionRepo::append_points(&state.pool, session_id, &input.points)
        .await?
        .ok_or_else(|| already_finished(session_id))?;

    Ok(Json(DataResponse {
        data: PointsAccepted {
            session_id,
            accepted: input.points.len(),
            point_count,
        },
    }))
}

/// POST /api/v1/timer/sessions/{id}/finish
///
/// Stop the timer and store the track summary. Finishing twice is a conflict.
pub async fn finish_session(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(session_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let session = ensure_own_session(&state.pool, session_id, auth.user_id).await?;
    if session.is_finished() {
        return Err(already_finished(session_id));
    }

    let (session, summary) = TimerSessionRepo::finish(&state.pool, session_id, |points| {
        let samples: Vec<TrackSample> = points.into_iter().map(TrackSample::from).collect();
        track::summarize(&samples)
    })
    .await?
    .ok_or_else(|| already_finished(session_id))?;

    tracing::info!(
        user_id = auth.user_id,
        session_id,
        points = summary.point_count,
        distance_nm = summary.distance_nm,
        "Race timer finished"
    );

    Ok(Json(DataResponse {
        data: FinishedSession { session, summary },
    }))
}

/// GET /api/v1/timer/sessions/{id}
pub async fn get_session(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(session_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let session = ensure_own_session(&state.pool, session_id, auth.user_id).await?;
    Ok(Json(DataResponse { data: session }))
}
