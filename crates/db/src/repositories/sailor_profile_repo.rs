//! Repository for the `sailor_profiles` table.

use regatta_core::types::DbId;
use sqlx::PgPool;

use crate::models::sailor_profile::{CreateSailorProfile, SailorProfile};

const COLUMNS: &str =
    "id, user_id, display_name, sail_number, boat_class, created_at, updated_at";

/// Provides data access for sailor profiles.
pub struct SailorProfileRepo;

impl SailorProfileRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateSailorProfile,
    ) -> Result<SailorProfile, sqlx::Error> {
        let query = format!(
            "INSERT INTO sailor_profiles (user_id, display_name, sail_number, boat_class) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SailorProfile>(&query)
            .bind(input.user_id)
            .bind(&input.display_name)
            .bind(&input.sail_number)
            .bind(&input.boat_class)
            .fetch_one(pool)
            .await
    }

    /// Look up a profile by its own id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<SailorProfile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sailor_profiles WHERE id = $1");
        sqlx::query_as::<_, SailorProfile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Look up the profile owned by an account.
    pub async fn find_by_user_id(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<SailorProfile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sailor_profiles WHERE user_id = $1");
        sqlx::query_as::<_, SailorProfile>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }
}
