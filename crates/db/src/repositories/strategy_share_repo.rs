//! Repository for the `strategy_shares` table.

use regatta_core::types::DbId;
use sqlx::PgPool;

use crate::models::notification::NotificationContent;
use crate::models::strategy_share::StrategyShare;

const COLUMNS: &str = "id, sender_user_id, coach_profile_id, race_id, content, created_at";

/// Provides data access for strategies shared with coaches.
pub struct StrategyShareRepo;

impl StrategyShareRepo {
    /// Record a share with one of the sender's coaches and notify the coach,
    /// in a single statement.
    ///
    /// Returns `None` when the coach is not an active coach of the sender;
    /// nothing is written in that case.
    pub async fn share_with_coach(
        pool: &PgPool,
        coach_profile_id: DbId,
        content: &NotificationContent<'_>,
    ) -> Result<Option<StrategyShare>, sqlx::Error> {
        let query = format!(
            "WITH coach AS ( \
                SELECT cp.id, cp.user_id FROM coach_profiles cp \
                JOIN sailor_coaches sc ON sc.coach_profile_id = cp.id \
                WHERE cp.id = $1 AND sc.sailor_user_id = $2 AND cp.is_active = true \
             ), new_share AS ( \
                INSERT INTO strategy_shares (sender_user_id, coach_profile_id, race_id, content) \
                SELECT $2, coach.id, $3, $6 FROM coach \
                RETURNING {COLUMNS} \
             ), notified AS ( \
                INSERT INTO notifications (user_id, sender_user_id, kind, race_id, title, body) \
                SELECT coach.user_id, $2, $4, $3, $5, $6 FROM coach, new_share \
             ) \
             SELECT {COLUMNS} FROM new_share"
        );
        sqlx::query_as::<_, StrategyShare>(&query)
            .bind(coach_profile_id)
            .bind(content.sender_user_id)
            .bind(content.race_id)
            .bind(content.kind)
            .bind(content.title)
            .bind(content.body)
            .fetch_optional(pool)
            .await
    }

    /// Whether `sender_user_id` has shared their strategy for `race_id` with
    /// the coach owned by `coach_user_id`.
    pub async fn exists_for_coach(
        pool: &PgPool,
        coach_user_id: DbId,
        sender_user_id: DbId,
        race_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS( \
                SELECT 1 FROM strategy_shares s \
                JOIN coach_profiles cp ON cp.id = s.coach_profile_id \
                WHERE cp.user_id = $1 AND s.sender_user_id = $2 AND s.race_id = $3 \
             )",
        )
        .bind(coach_user_id)
        .bind(sender_user_id)
        .bind(race_id)
        .fetch_one(pool)
        .await
    }
}
