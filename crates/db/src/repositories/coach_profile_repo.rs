//! Repository for the `coach_profiles` and `sailor_coaches` tables.

use regatta_core::types::DbId;
use sqlx::PgPool;

use crate::models::coach_profile::{CoachProfile, CreateCoachProfile};

const COLUMNS: &str = "id, user_id, display_name, pricing_model, hourly_rate, session_rate, \
    currency, is_active, created_at, updated_at";

/// Provides data access for coach profiles and the sailors they work with.
pub struct CoachProfileRepo;

impl CoachProfileRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateCoachProfile,
    ) -> Result<CoachProfile, sqlx::Error> {
        let query = format!(
            "INSERT INTO coach_profiles \
                (user_id, display_name, pricing_model, hourly_rate, session_rate, currency) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CoachProfile>(&query)
            .bind(input.user_id)
            .bind(&input.display_name)
            .bind(&input.pricing_model)
            .bind(input.hourly_rate)
            .bind(input.session_rate)
            .bind(&input.currency)
            .fetch_one(pool)
            .await
    }

    /// Record that a sailor works with a coach. Linking twice is a no-op.
    pub async fn link_sailor(
        pool: &PgPool,
        sailor_user_id: DbId,
        coach_profile_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO sailor_coaches (sailor_user_id, coach_profile_id) \
             VALUES ($1, $2) \
             ON CONFLICT (sailor_user_id, coach_profile_id) DO NOTHING",
        )
        .bind(sailor_user_id)
        .bind(coach_profile_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Active coaches linked to a sailor, by display name.
    pub async fn list_for_sailor(
        pool: &PgPool,
        sailor_user_id: DbId,
    ) -> Result<Vec<CoachProfile>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM coach_profiles cp \
             JOIN sailor_coaches sc ON sc.coach_profile_id = cp.id \
             WHERE sc.sailor_user_id = $1 AND cp.is_active = true \
             ORDER BY cp.display_name, cp.id",
            prefixed("cp")
        );
        sqlx::query_as::<_, CoachProfile>(&query)
            .bind(sailor_user_id)
            .fetch_all(pool)
            .await
    }
}

/// `COLUMNS` qualified with a table alias, for joins.
fn prefixed(alias: &str) -> String {
    COLUMNS
        .split(',')
        .map(|c| format!("{alias}.{}", c.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}
