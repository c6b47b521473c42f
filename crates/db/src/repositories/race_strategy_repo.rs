//! Repository for the `race_strategies` table.
//!
//! One row per (race, user) holding the AI recommendations, the user's
//! notes and the public-sharing state. Rows are created on first write.

use regatta_core::public_link::PublicLinkState;
use regatta_core::types::DbId;
use sqlx::PgPool;

use crate::models::race_strategy::{RaceStrategy, UpsertAiStrategy};

const COLUMNS: &str = "id, race_id, user_id, wind_strategy, tide_strategy, current_strategy, \
    favored_end, tactics, notes, public_sharing_enabled, public_token, public_shared_at, \
    created_at, updated_at";

/// Provides data access for race strategies.
pub struct RaceStrategyRepo;

impl RaceStrategyRepo {
    pub async fn find(
        pool: &PgPool,
        race_id: DbId,
        user_id: DbId,
    ) -> Result<Option<RaceStrategy>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM race_strategies WHERE race_id = $1 AND user_id = $2"
        );
        sqlx::query_as::<_, RaceStrategy>(&query)
            .bind(race_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Save the user's notes. The last write wins.
    pub async fn upsert_notes(
        pool: &PgPool,
        race_id: DbId,
        user_id: DbId,
        notes: Option<&str>,
    ) -> Result<RaceStrategy, sqlx::Error> {
        let query = format!(
            "INSERT INTO race_strategies (race_id, user_id, notes) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (race_id, user_id) \
             DO UPDATE SET notes = EXCLUDED.notes, updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RaceStrategy>(&query)
            .bind(race_id)
            .bind(user_id)
            .bind(notes)
            .fetch_one(pool)
            .await
    }

    /// Store AI recommendations, replacing the previous run's fields.
    pub async fn upsert_ai(
        pool: &PgPool,
        race_id: DbId,
        user_id: DbId,
        input: &UpsertAiStrategy,
    ) -> Result<RaceStrategy, sqlx::Error> {
        let query = format!(
            "INSERT INTO race_strategies \
                (race_id, user_id, wind_strategy, tide_strategy, current_strategy, \
                 favored_end, tactics) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT (race_id, user_id) DO UPDATE SET \
                wind_strategy = EXCLUDED.wind_strategy, \
                tide_strategy = EXCLUDED.tide_strategy, \
                current_strategy = EXCLUDED.current_strategy, \
                favored_end = EXCLUDED.favored_end, \
                tactics = EXCLUDED.tactics, \
                updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RaceStrategy>(&query)
            .bind(race_id)
            .bind(user_id)
            .bind(&input.wind_strategy)
            .bind(&input.tide_strategy)
            .bind(&input.current_strategy)
            .bind(&input.favored_end)
            .bind(&input.tactics)
            .fetch_one(pool)
            .await
    }

    /// Read-modify-write of the public-sharing fields under a row lock.
    ///
    /// The row is created if missing, `change` computes the new state from
    /// the stored one, and the result is written back in the same
    /// transaction.
    pub async fn update_public_link<F>(
        pool: &PgPool,
        race_id: DbId,
        user_id: DbId,
        change: F,
    ) -> Result<RaceStrategy, sqlx::Error>
    where
        F: FnOnce(&PublicLinkState) -> PublicLinkState + Send,
    {
        let mut tx = pool.begin().await?;

        sqlx::query(
            "INSERT INTO race_strategies (race_id, user_id) VALUES ($1, $2) \
             ON CONFLICT (race_id, user_id) DO NOTHING",
        )
        .bind(race_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        let select = format!(
            "SELECT {COLUMNS} FROM race_strategies \
             WHERE race_id = $1 AND user_id = $2 \
             FOR UPDATE"
        );
        let current = sqlx::query_as::<_, RaceStrategy>(&select)
            .bind(race_id)
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;

        let next = change(&current.public_link());

        let update = format!(
            "UPDATE race_strategies SET \
                public_sharing_enabled = $2, public_token = $3, public_shared_at = $4, \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, RaceStrategy>(&update)
            .bind(current.id)
            .bind(next.enabled)
            .bind(&next.token)
            .bind(next.shared_at)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Find a strategy by its public token, whether or not sharing is on.
    pub async fn find_by_public_token(
        pool: &PgPool,
        token: &str,
    ) -> Result<Option<RaceStrategy>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM race_strategies WHERE public_token = $1");
        sqlx::query_as::<_, RaceStrategy>(&query)
            .bind(token)
            .fetch_optional(pool)
            .await
    }
}
