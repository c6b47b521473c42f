//! Coach profile models.

use regatta_core::strategy::CoachTarget;
use regatta_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `coach_profiles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CoachProfile {
    pub id: DbId,
    pub user_id: DbId,
    pub display_name: String,
    pub pricing_model: Option<String>,
    pub hourly_rate: Option<f64>,
    pub session_rate: Option<f64>,
    pub currency: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a coach profile.
#[derive(Debug, Deserialize)]
pub struct CreateCoachProfile {
    pub user_id: DbId,
    pub display_name: String,
    pub pricing_model: Option<String>,
    pub hourly_rate: Option<f64>,
    pub session_rate: Option<f64>,
    pub currency: Option<String>,
}

impl From<CoachProfile> for CoachTarget {
    fn from(row: CoachProfile) -> Self {
        CoachTarget {
            coach_profile_id: row.id,
            user_id: row.user_id,
            display_name: row.display_name,
            pricing_model: row.pricing_model,
            hourly_rate: row.hourly_rate,
            session_rate: row.session_rate,
            currency: row.currency,
        }
    }
}
