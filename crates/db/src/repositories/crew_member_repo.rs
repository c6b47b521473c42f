//! Repository for the `crew_members` table.

use regatta_core::types::DbId;
use sqlx::PgPool;

use crate::models::crew_member::{CreateCrewMember, CrewMember};

const COLUMNS: &str = "id, sailor_user_id, member_user_id, name, role, email, created_at";

/// Provides data access for a sailor's crew list.
pub struct CrewMemberRepo;

impl CrewMemberRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateCrewMember,
    ) -> Result<CrewMember, sqlx::Error> {
        let query = format!(
            "INSERT INTO crew_members (sailor_user_id, member_user_id, name, role, email) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CrewMember>(&query)
            .bind(input.sailor_user_id)
            .bind(input.member_user_id)
            .bind(&input.name)
            .bind(&input.role)
            .bind(&input.email)
            .fetch_one(pool)
            .await
    }

    pub async fn list_for_sailor(
        pool: &PgPool,
        sailor_user_id: DbId,
    ) -> Result<Vec<CrewMember>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM crew_members \
             WHERE sailor_user_id = $1 \
             ORDER BY name, id"
        );
        sqlx::query_as::<_, CrewMember>(&query)
            .bind(sailor_user_id)
            .fetch_all(pool)
            .await
    }

    /// The subset of `ids` that belong to the sailor's crew.
    pub async fn find_selected(
        pool: &PgPool,
        sailor_user_id: DbId,
        ids: &[DbId],
    ) -> Result<Vec<CrewMember>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM crew_members \
             WHERE sailor_user_id = $1 AND id = ANY($2) \
             ORDER BY id"
        );
        sqlx::query_as::<_, CrewMember>(&query)
            .bind(sailor_user_id)
            .bind(ids)
            .fetch_all(pool)
            .await
    }
}
