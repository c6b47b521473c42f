//! GPS race timer models.

use regatta_core::track::{TrackSample, TrackSummary};
use regatta_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `race_timer_sessions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RaceTimerSession {
    pub id: DbId,
    pub race_id: DbId,
    pub user_id: DbId,
    pub started_at: Timestamp,
    pub finished_at: Option<Timestamp>,
    pub point_count: i32,
    pub distance_nm: Option<f64>,
    pub elapsed_secs: Option<i64>,
    pub avg_speed_kts: Option<f64>,
    pub max_speed_kts: Option<f64>,
    pub created_at: Timestamp,
}

impl RaceTimerSession {
    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }
}

/// A row from the `track_points` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TrackPoint {
    pub id: DbId,
    pub session_id: DbId,
    pub lat: f64,
    pub lon: f64,
    pub recorded_at: Timestamp,
    pub speed_kts: Option<f64>,
    pub heading_deg: Option<f64>,
}

impl From<TrackPoint> for TrackSample {
    fn from(row: TrackPoint) -> Self {
        TrackSample {
            lat: row.lat,
            lon: row.lon,
            recorded_at: row.recorded_at,
            speed_kts: row.speed_kts,
            heading_deg: row.heading_deg,
        }
    }
}

/// Stored summary values for a finished session.
#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub point_count: i32,
    pub distance_nm: f64,
    pub elapsed_secs: i64,
    pub avg_speed_kts: Option<f64>,
    pub max_speed_kts: Option<f64>,
}

impl From<&TrackSummary> for SessionSummary {
    fn from(summary: &TrackSummary) -> Self {
        SessionSummary {
            point_count: i32::try_from(summary.point_count).unwrap_or(i32::MAX),
            distance_nm: summary.distance_nm,
            elapsed_secs: summary.elapsed_secs,
            avg_speed_kts: summary.avg_speed_kts,
            max_speed_kts: summary.max_speed_kts,
        }
    }
}
