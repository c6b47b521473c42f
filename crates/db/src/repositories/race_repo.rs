//! Repository for the `races` table.

use regatta_core::types::DbId;
use sqlx::PgPool;

use crate::models::race::{CreateRace, Race};

const COLUMNS: &str = "id, regatta_id, race_number, name, race_type, scheduled_start, status, \
    venue, distance_nm, entry_fee, currency, wind_speed_kts, wind_gust_kts, wind_direction, \
    wave_height_m, tide_summary, forecast_summary, rig_tuning, created_at, updated_at";

/// Provides data access for races.
pub struct RaceRepo;

impl RaceRepo {
    pub async fn create(pool: &PgPool, input: &CreateRace) -> Result<Race, sqlx::Error> {
        let query = format!(
            "INSERT INTO races \
                (regatta_id, race_number, name, race_type, scheduled_start, venue, \
                 distance_nm, entry_fee, currency, wind_speed_kts, wind_gust_kts, \
                 wind_direction, wave_height_m, tide_summary, forecast_summary, rig_tuning) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, \
                     COALESCE($16, '{{}}'::jsonb)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Race>(&query)
            .bind(input.regatta_id)
            .bind(input.race_number)
            .bind(&input.name)
            .bind(&input.race_type)
            .bind(input.scheduled_start)
            .bind(&input.venue)
            .bind(input.distance_nm)
            .bind(input.entry_fee)
            .bind(&input.currency)
            .bind(input.wind_speed_kts)
            .bind(input.wind_gust_kts)
            .bind(&input.wind_direction)
            .bind(input.wave_height_m)
            .bind(&input.tide_summary)
            .bind(&input.forecast_summary)
            .bind(&input.rig_tuning)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Race>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM races WHERE id = $1");
        sqlx::query_as::<_, Race>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM races WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }
}
