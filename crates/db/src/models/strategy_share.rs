//! Coach strategy share models.

use regatta_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `strategy_shares` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StrategyShare {
    pub id: DbId,
    pub sender_user_id: DbId,
    pub coach_profile_id: DbId,
    pub race_id: DbId,
    pub content: String,
    pub created_at: Timestamp,
}
