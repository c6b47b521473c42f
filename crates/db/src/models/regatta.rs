//! Regatta and notice-board models.

use chrono::NaiveDate;
use regatta_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `regattas` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Regatta {
    pub id: DbId,
    pub name: String,
    pub venue: Option<String>,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
    pub is_published: bool,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a regatta.
#[derive(Debug, Deserialize)]
pub struct CreateRegatta {
    pub name: String,
    pub venue: Option<String>,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
    pub is_published: Option<bool>,
    pub created_by: Option<DbId>,
}

/// A row from the `regatta_notices` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RegattaNotice {
    pub id: DbId,
    pub regatta_id: DbId,
    pub title: String,
    pub body: String,
    pub category: String,
    pub is_published: bool,
    pub published_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// DTO for posting a notice. Unpublished notices are drafts.
#[derive(Debug, Deserialize)]
pub struct CreateRegattaNotice {
    pub regatta_id: DbId,
    pub title: String,
    pub body: String,
    pub category: Option<String>,
    pub is_published: Option<bool>,
}

/// One race on a public regatta schedule.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ScheduleEntry {
    pub race_id: DbId,
    pub race_number: Option<i32>,
    pub name: String,
    pub race_type: Option<String>,
    pub scheduled_start: Option<Timestamp>,
    pub status: String,
    pub venue: Option<String>,
}
