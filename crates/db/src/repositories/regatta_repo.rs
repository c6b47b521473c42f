//! Repository for the `regattas` table and its public schedule.

use regatta_core::types::DbId;
use sqlx::PgPool;

use crate::models::regatta::{CreateRegatta, Regatta, ScheduleEntry};

const COLUMNS: &str =
    "id, name, venue, starts_on, ends_on, is_published, created_by, created_at, updated_at";

/// Provides data access for regattas.
pub struct RegattaRepo;

impl RegattaRepo {
    pub async fn create(pool: &PgPool, input: &CreateRegatta) -> Result<Regatta, sqlx::Error> {
        let query = format!(
            "INSERT INTO regattas (name, venue, starts_on, ends_on, is_published, created_by) \
             VALUES ($1, $2, $3, $4, COALESCE($5, false), $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Regatta>(&query)
            .bind(&input.name)
            .bind(&input.venue)
            .bind(input.starts_on)
            .bind(input.ends_on)
            .bind(input.is_published)
            .bind(input.created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a regatta visible to the public.
    pub async fn find_published(pool: &PgPool, id: DbId) -> Result<Option<Regatta>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM regattas WHERE id = $1 AND is_published = true");
        sqlx::query_as::<_, Regatta>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Races of a regatta in start order. Unscheduled races sort last.
    pub async fn schedule(
        pool: &PgPool,
        regatta_id: DbId,
    ) -> Result<Vec<ScheduleEntry>, sqlx::Error> {
        sqlx::query_as::<_, ScheduleEntry>(
            "SELECT id AS race_id, race_number, name, race_type, scheduled_start, status, venue \
             FROM races \
             WHERE regatta_id = $1 \
             ORDER BY scheduled_start ASC NULLS LAST, race_number ASC NULLS LAST, id",
        )
        .bind(regatta_id)
        .fetch_all(pool)
        .await
    }
}
