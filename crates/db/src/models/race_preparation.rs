//! Race preparation models.

use regatta_core::strategy::{insights_from_json, Preparation};
use regatta_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `race_preparations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RacePreparation {
    pub id: DbId,
    pub race_id: DbId,
    pub sailor_user_id: DbId,
    pub start_strategy: Option<String>,
    pub upwind_strategy: Option<String>,
    pub mark_rounding_strategy: Option<String>,
    pub downwind_strategy: Option<String>,
    pub finish_strategy: Option<String>,
    pub navigation_strategy: Option<String>,
    pub weather_routing_strategy: Option<String>,
    pub rig_notes: Option<String>,
    pub ai_insights: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for saving a preparation. Absent fields keep their stored value.
#[derive(Debug, Default, Deserialize)]
pub struct UpsertPreparation {
    pub start_strategy: Option<String>,
    pub upwind_strategy: Option<String>,
    pub mark_rounding_strategy: Option<String>,
    pub downwind_strategy: Option<String>,
    pub finish_strategy: Option<String>,
    pub navigation_strategy: Option<String>,
    pub weather_routing_strategy: Option<String>,
    pub rig_notes: Option<String>,
    pub ai_insights: Option<serde_json::Value>,
}

impl From<RacePreparation> for Preparation {
    fn from(row: RacePreparation) -> Self {
        Preparation {
            ai_insights: insights_from_json(&row.ai_insights),
            start_strategy: row.start_strategy,
            upwind_strategy: row.upwind_strategy,
            mark_rounding_strategy: row.mark_rounding_strategy,
            downwind_strategy: row.downwind_strategy,
            finish_strategy: row.finish_strategy,
            navigation_strategy: row.navigation_strategy,
            weather_routing_strategy: row.weather_routing_strategy,
            rig_notes: row.rig_notes,
            updated_at: Some(row.updated_at),
        }
    }
}
