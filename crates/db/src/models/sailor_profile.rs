//! Sailor profile models.

use regatta_core::strategy::SailorProfile as SailorProfileRecord;
use regatta_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `sailor_profiles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SailorProfile {
    pub id: DbId,
    pub user_id: DbId,
    pub display_name: String,
    pub sail_number: Option<String>,
    pub boat_class: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a sailor profile.
#[derive(Debug, Deserialize)]
pub struct CreateSailorProfile {
    pub user_id: DbId,
    pub display_name: String,
    pub sail_number: Option<String>,
    pub boat_class: Option<String>,
}

impl From<SailorProfile> for SailorProfileRecord {
    fn from(row: SailorProfile) -> Self {
        SailorProfileRecord {
            profile_id: row.id,
            user_id: row.user_id,
            display_name: row.display_name,
        }
    }
}
