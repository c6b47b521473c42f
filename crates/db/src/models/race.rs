//! Race models.

use regatta_core::strategy::{tuning_from_json, Forecast, RaceInfo, RaceType};
use regatta_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `races` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Race {
    pub id: DbId,
    pub regatta_id: Option<DbId>,
    pub race_number: Option<i32>,
    pub name: String,
    pub race_type: Option<String>,
    pub scheduled_start: Option<Timestamp>,
    pub status: String,
    pub venue: Option<String>,
    pub distance_nm: Option<f64>,
    pub entry_fee: Option<f64>,
    pub currency: Option<String>,
    pub wind_speed_kts: Option<f64>,
    pub wind_gust_kts: Option<f64>,
    pub wind_direction: Option<String>,
    pub wave_height_m: Option<f64>,
    pub tide_summary: Option<String>,
    pub forecast_summary: Option<String>,
    pub rig_tuning: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a race.
#[derive(Debug, Default, Deserialize)]
pub struct CreateRace {
    pub regatta_id: Option<DbId>,
    pub race_number: Option<i32>,
    pub name: String,
    pub race_type: Option<String>,
    pub scheduled_start: Option<Timestamp>,
    pub venue: Option<String>,
    pub distance_nm: Option<f64>,
    pub entry_fee: Option<f64>,
    pub currency: Option<String>,
    pub wind_speed_kts: Option<f64>,
    pub wind_gust_kts: Option<f64>,
    pub wind_direction: Option<String>,
    pub wave_height_m: Option<f64>,
    pub tide_summary: Option<String>,
    pub forecast_summary: Option<String>,
    pub rig_tuning: Option<serde_json::Value>,
}

impl From<Race> for RaceInfo {
    fn from(row: Race) -> Self {
        RaceInfo {
            id: row.id,
            race_type: RaceType::from_db(row.race_type.as_deref()),
            rig_tuning: tuning_from_json(&row.rig_tuning),
            name: row.name,
            scheduled_start: row.scheduled_start,
            venue: row.venue,
            distance_nm: row.distance_nm,
            entry_fee: row.entry_fee,
            currency: row.currency,
            forecast: Forecast {
                wind_speed_kts: row.wind_speed_kts,
                wind_gust_kts: row.wind_gust_kts,
                wind_direction: row.wind_direction,
                wave_height_m: row.wave_height_m,
                tide_summary: row.tide_summary,
                forecast_summary: row.forecast_summary,
            },
        }
    }
}
