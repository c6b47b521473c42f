//! Crew member models.

use regatta_core::strategy::CrewTarget;
use regatta_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `crew_members` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CrewMember {
    pub id: DbId,
    pub sailor_user_id: DbId,
    /// `None` for crew without an account.
    pub member_user_id: Option<DbId>,
    pub name: String,
    pub role: Option<String>,
    pub email: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for adding a crew member.
#[derive(Debug, Deserialize)]
pub struct CreateCrewMember {
    pub sailor_user_id: DbId,
    pub member_user_id: Option<DbId>,
    pub name: String,
    pub role: Option<String>,
    pub email: Option<String>,
}

impl From<CrewMember> for CrewTarget {
    fn from(row: CrewMember) -> Self {
        CrewTarget {
            crew_member_id: row.id,
            member_user_id: row.member_user_id,
            name: row.name,
            role: row.role,
        }
    }
}
