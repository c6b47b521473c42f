//! In-app notification models.

use regatta_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `notifications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub user_id: DbId,
    pub sender_user_id: Option<DbId>,
    pub kind: String,
    pub race_id: Option<DbId>,
    pub title: String,
    pub body: String,
    pub is_read: bool,
    pub read_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// Fields shared by every notification in one fan-out.
#[derive(Debug, Clone)]
pub struct NotificationContent<'a> {
    pub sender_user_id: DbId,
    pub kind: &'a str,
    pub race_id: DbId,
    pub title: &'a str,
    pub body: &'a str,
}
