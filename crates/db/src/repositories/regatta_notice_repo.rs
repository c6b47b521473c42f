//! Repository for the `regatta_notices` table.

use regatta_core::types::DbId;
use sqlx::PgPool;

use crate::models::regatta::{CreateRegattaNotice, RegattaNotice};

const COLUMNS: &str =
    "id, regatta_id, title, body, category, is_published, published_at, created_at";

/// Provides data access for the regatta notice board.
pub struct RegattaNoticeRepo;

impl RegattaNoticeRepo {
    /// Create a notice. Published notices are stamped with the current time.
    pub async fn create(
        pool: &PgPool,
        input: &CreateRegattaNotice,
    ) -> Result<RegattaNotice, sqlx::Error> {
        let query = format!(
            "INSERT INTO regatta_notices \
                (regatta_id, title, body, category, is_published, published_at) \
             VALUES ($1, $2, $3, COALESCE($4, 'general'), COALESCE($5, false), \
                     CASE WHEN COALESCE($5, false) THEN NOW() END) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RegattaNotice>(&query)
            .bind(input.regatta_id)
            .bind(&input.title)
            .bind(&input.body)
            .bind(&input.category)
            .bind(input.is_published)
            .fetch_one(pool)
            .await
    }

    /// Published notices, newest first.
    pub async fn list_published(
        pool: &PgPool,
        regatta_id: DbId,
    ) -> Result<Vec<RegattaNotice>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM regatta_notices \
             WHERE regatta_id = $1 AND is_published = true \
             ORDER BY published_at DESC, id DESC"
        );
        sqlx::query_as::<_, RegattaNotice>(&query)
            .bind(regatta_id)
            .fetch_all(pool)
            .await
    }
}
