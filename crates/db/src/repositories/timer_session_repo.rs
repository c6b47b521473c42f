//! Repository for the `race_timer_sessions` and `track_points` tables.

use regatta_core::track::TrackSample;
use regatta_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::timer::{RaceTimerSession, SessionSummary, TrackPoint};

const SESSION_COLUMNS: &str = "id, race_id, user_id, started_at, finished_at, point_count, \
    distance_nm, elapsed_secs, avg_speed_kts, max_speed_kts, created_at";

const POINT_COLUMNS: &str = "id, session_id, lat, lon, recorded_at, speed_kts, heading_deg";

/// Provides data access for GPS race timer sessions.
pub struct TimerSessionRepo;

impl TimerSessionRepo {
    /// Start a session for a user on a race.
    pub async fn create(
        pool: &PgPool,
        race_id: DbId,
        user_id: DbId,
    ) -> Result<RaceTimerSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO race_timer_sessions (race_id, user_id) \
             VALUES ($1, $2) \
             RETURNING {SESSION_COLUMNS}"
        );
        sqlx::query_as::<_, RaceTimerSession>(&query)
            .bind(race_id)
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<RaceTimerSession>, sqlx::Error> {
        let query = format!("SELECT {SESSION_COLUMNS} FROM race_timer_sessions WHERE id = $1");
        sqlx::query_as::<_, RaceTimerSession>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Append a batch of samples in one statement and bump the point count.
    ///
    /// The session row is locked for the duration, so a concurrent finish
    /// either sees all of these points or none. Returns the session's new
    /// total point count, or `None` if the session does not exist or is
    /// already finished.
    pub async fn append_points(
        pool: &PgPool,
        session_id: DbId,
        samples: &[TrackSample],
    ) -> Result<Option<i32>, sqlx::Error> {
        let lats: Vec<f64> = samples.iter().map(|s| s.lat).collect();
        let lons: Vec<f64> = samples.iter().map(|s| s.lon).collect();
        let times: Vec<_> = samples.iter().map(|s| s.recorded_at).collect();
        let speeds: Vec<Option<f64>> = samples.iter().map(|s| s.speed_kts).collect();
        let headings: Vec<Option<f64>> = samples.iter().map(|s| s.heading_deg).collect();

        let mut tx = pool.begin().await?;

        if !Self::lock_running(&mut *tx, session_id).await? {
            return Ok(None);
        }

        sqlx::query(
            "INSERT INTO track_points \
                (session_id, lat, lon, recorded_at, speed_kts, heading_deg) \
             SELECT $1, * FROM UNNEST( \
                $2::DOUBLE PRECISION[], $3::DOUBLE PRECISION[], $4::TIMESTAMPTZ[], \
                $5::DOUBLE PRECISION[], $6::DOUBLE PRECISION[])",
        )
        .bind(session_id)
        .bind(&lats)
        .bind(&lons)
        .bind(&times)
        .bind(&speeds)
        .bind(&headings)
        .execute(&mut *tx)
        .await?;

        let count: i32 = sqlx::query_scalar(
            "UPDATE race_timer_sessions \
             SET point_count = point_count + $2 \
             WHERE id = $1 \
             RETURNING point_count",
        )
        .bind(session_id)
        .bind(i32::try_from(samples.len()).unwrap_or(i32::MAX))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::debug!(
            session_id,
            appended = samples.len(),
            total = count,
            "Track points stored"
        );
        Ok(Some(count))
    }

    /// Stamp the finish time and store the summary of every stored point.
    ///
    /// The session row is locked, its points are read in time order and
    /// handed to `summarize`, and the summary is written back, all in one
    /// transaction. Returns `None` if the session does not exist or is
    /// already finished.
    pub async fn finish<F, S>(
        pool: &PgPool,
        session_id: DbId,
        summarize: F,
    ) -> Result<Option<(RaceTimerSession, S)>, sqlx::Error>
    where
        F: FnOnce(Vec<TrackPoint>) -> S + Send,
        S: Send,
        SessionSummary: for<'a> From<&'a S>,
    {
        let mut tx = pool.begin().await?;

        if !Self::lock_running(&mut *tx, session_id).await? {
            return Ok(None);
        }

        let select = format!(
            "SELECT {POINT_COLUMNS} FROM track_points \
             WHERE session_id = $1 \
             ORDER BY recorded_at, id"
        );
        let points = sqlx::query_as::<_, TrackPoint>(&select)
            .bind(session_id)
            .fetch_all(&mut *tx)
            .await?;

        let summary = summarize(points);
        let stored = SessionSummary::from(&summary);

        let update = format!(
            "UPDATE race_timer_sessions SET \
                finished_at = NOW(), point_count = $2, distance_nm = $3, elapsed_secs = $4, \
                avg_speed_kts = $5, max_speed_kts = $6 \
             WHERE id = $1 \
             RETURNING {SESSION_COLUMNS}"
        );
        let session = sqlx::query_as::<_, RaceTimerSession>(&update)
            .bind(session_id)
            .bind(stored.point_count)
            .bind(stored.distance_nm)
            .bind(stored.elapsed_secs)
            .bind(stored.avg_speed_kts)
            .bind(stored.max_speed_kts)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some((session, summary)))
    }

    /// Lock a session row that has not finished yet.
    async fn lock_running(
        conn: &mut PgConnection,
        session_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let locked: Option<DbId> = sqlx::query_scalar(
            "SELECT id FROM race_timer_sessions \
             WHERE id = $1 AND finished_at IS NULL \
             FOR UPDATE",
        )
        .bind(session_id)
        .fetch_optional(conn)
        .await?;
        Ok(locked.is_some())
    }
}
