//! Repository for the `race_preparations` table.

use regatta_core::types::DbId;
use sqlx::PgPool;

use crate::models::race_preparation::{RacePreparation, UpsertPreparation};

const COLUMNS: &str = "id, race_id, sailor_user_id, start_strategy, upwind_strategy, \
    mark_rounding_strategy, downwind_strategy, finish_strategy, navigation_strategy, \
    weather_routing_strategy, rig_notes, ai_insights, created_at, updated_at";

/// Provides data access for per-sailor race preparations.
pub struct RacePreparationRepo;

impl RacePreparationRepo {
    pub async fn find(
        pool: &PgPool,
        race_id: DbId,
        sailor_user_id: DbId,
    ) -> Result<Option<RacePreparation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM race_preparations \
             WHERE race_id = $1 AND sailor_user_id = $2"
        );
        sqlx::query_as::<_, RacePreparation>(&query)
            .bind(race_id)
            .bind(sailor_user_id)
            .fetch_optional(pool)
            .await
    }

    /// Create the preparation on first save, otherwise update the fields
    /// present in `input`.
    pub async fn upsert(
        pool: &PgPool,
        race_id: DbId,
        sailor_user_id: DbId,
        input: &UpsertPreparation,
    ) -> Result<RacePreparation, sqlx::Error> {
        let query = format!(
            "INSERT INTO race_preparations \
                (race_id, sailor_user_id, start_strategy, upwind_strategy, \
                 mark_rounding_strategy, downwind_strategy, finish_strategy, \
                 navigation_strategy, weather_routing_strategy, rig_notes, ai_insights) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, COALESCE($11, '[]'::jsonb)) \
             ON CONFLICT (race_id, sailor_user_id) DO UPDATE SET \
                start_strategy = COALESCE($3, race_preparations.start_strategy), \
                upwind_strategy = COALESCE($4, race_preparations.upwind_strategy), \
                mark_rounding_strategy = COALESCE($5, race_preparations.mark_rounding_strategy), \
                downwind_strategy = COALESCE($6, race_preparations.downwind_strategy), \
                finish_strategy = COALESCE($7, race_preparations.finish_strategy), \
                navigation_strategy = COALESCE($8, race_preparations.navigation_strategy), \
                weather_routing_strategy = \
                    COALESCE($9, race_preparations.weather_routing_strategy), \
                rig_notes = COALESCE($10, race_preparations.rig_notes), \
                ai_insights = COALESCE($11, race_preparations.ai_insights), \
                updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RacePreparation>(&query)
            .bind(race_id)
            .bind(sailor_user_id)
            .bind(&input.start_strategy)
            .bind(&input.upwind_strategy)
            .bind(&input.mark_rounding_strategy)
            .bind(&input.downwind_strategy)
            .bind(&input.finish_strategy)
            .bind(&input.navigation_strategy)
            .bind(&input.weather_routing_strategy)
            .bind(&input.rig_notes)
            .bind(&input.ai_insights)
            .fetch_one(pool)
            .await
    }
}
