//! Race strategy models: AI recommendations, notes and public sharing.

use regatta_core::public_link::PublicLinkState;
use regatta_core::strategy::AiStrategy;
use regatta_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `race_strategies` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RaceStrategy {
    pub id: DbId,
    pub race_id: DbId,
    pub user_id: DbId,
    pub wind_strategy: Option<String>,
    pub tide_strategy: Option<String>,
    pub current_strategy: Option<String>,
    pub favored_end: Option<String>,
    pub tactics: Option<String>,
    pub notes: Option<String>,
    pub public_sharing_enabled: bool,
    pub public_token: Option<String>,
    pub public_shared_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for storing AI-generated recommendations.
#[derive(Debug, Default, Deserialize)]
pub struct UpsertAiStrategy {
    pub wind_strategy: Option<String>,
    pub tide_strategy: Option<String>,
    pub current_strategy: Option<String>,
    pub favored_end: Option<String>,
    pub tactics: Option<String>,
}

impl RaceStrategy {
    pub fn public_link(&self) -> PublicLinkState {
        PublicLinkState {
            enabled: self.public_sharing_enabled,
            token: self.public_token.clone(),
            shared_at: self.public_shared_at,
        }
    }
}

impl From<RaceStrategy> for AiStrategy {
    fn from(row: RaceStrategy) -> Self {
        AiStrategy {
            wind_strategy: row.wind_strategy,
            tide_strategy: row.tide_strategy,
            current_strategy: row.current_strategy,
            favored_end: row.favored_end,
            tactics: row.tactics,
            notes: row.notes,
            public_sharing_enabled: row.public_sharing_enabled,
            public_token: row.public_token,
            public_shared_at: row.public_shared_at,
        }
    }
}
