//! Domain records for race strategy assembly.
//!
//! These are the database-independent shapes the aggregator, text compiler
//! and public pages work with. The `db` crate converts its row models into
//! them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Race type and phases
// ---------------------------------------------------------------------------

/// Race category. Governs which phase labels appear in the race plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RaceType {
    #[default]
    Fleet,
    Distance,
}

impl RaceType {
    /// Parse the stored column value. Missing or unknown values fall back to
    /// [`RaceType::Fleet`].
    pub fn from_db(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("distance") => RaceType::Distance,
            _ => RaceType::Fleet,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RaceType::Fleet => "fleet",
            RaceType::Distance => "distance",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RaceType::Fleet => "Fleet race",
            RaceType::Distance => "Distance race",
        }
    }

    /// Ordered race phases for this race type.
    pub fn phases(self) -> &'static [Phase] {
        match self {
            RaceType::Fleet => FLEET_PHASES,
            RaceType::Distance => DISTANCE_PHASES,
        }
    }
}

/// A race phase: the key of its preparation field and its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Phase {
    pub key: PhaseKey,
    pub label: &'static str,
}

/// Identifies which preparation field holds a phase's plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKey {
    Start,
    Upwind,
    MarkRoundings,
    Downwind,
    Finish,
    Navigation,
    WeatherRouting,
}

pub const FLEET_PHASES: &[Phase] = &[
    Phase { key: PhaseKey::Start, label: "Start" },
    Phase { key: PhaseKey::Upwind, label: "Upwind" },
    Phase { key: PhaseKey::MarkRoundings, label: "Mark Roundings" },
    Phase { key: PhaseKey::Downwind, label: "Downwind" },
    Phase { key: PhaseKey::Finish, label: "Finish" },
];

pub const DISTANCE_PHASES: &[Phase] = &[
    Phase { key: PhaseKey::Start, label: "Start" },
    Phase { key: PhaseKey::Navigation, label: "Navigation" },
    Phase { key: PhaseKey::WeatherRouting, label: "Weather Routing" },
    Phase { key: PhaseKey::MarkRoundings, label: "Mark Roundings" },
    Phase { key: PhaseKey::Finish, label: "Finish" },
];

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A sailor profile as seen by identity resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SailorProfile {
    pub profile_id: DbId,
    /// The account (user) id that owns this profile.
    pub user_id: DbId,
    pub display_name: String,
}

/// Weather snapshot attached to a race.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub wind_speed_kts: Option<f64>,
    pub wind_gust_kts: Option<f64>,
    pub wind_direction: Option<String>,
    pub wave_height_m: Option<f64>,
    pub tide_summary: Option<String>,
    pub forecast_summary: Option<String>,
}

/// Race metadata needed for strategy assembly.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RaceInfo {
    pub id: DbId,
    pub name: String,
    pub race_type: RaceType,
    pub scheduled_start: Option<Timestamp>,
    pub venue: Option<String>,
    pub distance_nm: Option<f64>,
    pub entry_fee: Option<f64>,
    pub currency: Option<String>,
    pub forecast: Forecast,
    /// Rig tuning settings, setting name to display value.
    pub rig_tuning: BTreeMap<String, String>,
}

/// Per-sailor, per-race free-text plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Preparation {
    pub start_strategy: Option<String>,
    pub upwind_strategy: Option<String>,
    pub mark_rounding_strategy: Option<String>,
    pub downwind_strategy: Option<String>,
    pub finish_strategy: Option<String>,
    pub navigation_strategy: Option<String>,
    pub weather_routing_strategy: Option<String>,
    pub rig_notes: Option<String>,
    pub ai_insights: Vec<String>,
    pub updated_at: Option<Timestamp>,
}

impl Preparation {
    /// The plan text recorded for a phase, if any.
    pub fn phase_text(&self, key: PhaseKey) -> Option<&str> {
        let value = match key {
            PhaseKey::Start => &self.start_strategy,
            PhaseKey::Upwind => &self.upwind_strategy,
            PhaseKey::MarkRoundings => &self.mark_rounding_strategy,
            PhaseKey::Downwind => &self.downwind_strategy,
            PhaseKey::Finish => &self.finish_strategy,
            PhaseKey::Navigation => &self.navigation_strategy,
            PhaseKey::WeatherRouting => &self.weather_routing_strategy,
        };
        non_empty(value.as_deref())
    }
}

/// Per-user, per-race AI strategy fields plus the user's free-text notes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AiStrategy {
    pub wind_strategy: Option<String>,
    pub tide_strategy: Option<String>,
    pub current_strategy: Option<String>,
    pub favored_end: Option<String>,
    pub tactics: Option<String>,
    pub notes: Option<String>,
    pub public_sharing_enabled: bool,
    pub public_token: Option<String>,
    pub public_shared_at: Option<Timestamp>,
}

/// A coach the sailor can share with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoachTarget {
    pub coach_profile_id: DbId,
    pub user_id: DbId,
    pub display_name: String,
    pub pricing_model: Option<String>,
    pub hourly_rate: Option<f64>,
    pub session_rate: Option<f64>,
    pub currency: Option<String>,
}

/// A crew member the sailor can share with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrewTarget {
    pub crew_member_id: DbId,
    /// `None` when the crew member has no account.
    pub member_user_id: Option<DbId>,
    pub name: String,
    pub role: Option<String>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Treat whitespace-only strings as absent.
pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Convert a JSON object of tuning settings into display strings.
///
/// Non-object values yield an empty map; `null` and empty-string entries are
/// dropped.
pub fn tuning_from_json(value: &serde_json::Value) -> BTreeMap<String, String> {
    let Some(obj) = value.as_object() else {
        return BTreeMap::new();
    };
    obj.iter()
        .filter_map(|(key, v)| {
            let text = match v {
                serde_json::Value::Null => return None,
                serde_json::Value::String(s) => s.trim().to_string(),
                other => other.to_string(),
            };
            (!text.is_empty()).then(|| (key.clone(), text))
        })
        .collect()
}

/// Extract insight strings from the stored AI insights blob.
///
/// Accepts an array of strings, or an array of objects carrying the text in a
/// `text`, `insight` or `title` field. A bare string is a single insight.
pub fn insights_from_json(value: &serde_json::Value) -> Vec<String> {
    let items: Vec<&serde_json::Value> = match value {
        serde_json::Value::Array(items) => items.iter().collect(),
        serde_json::Value::String(_) => vec![value],
        serde_json::Value::Object(obj) => match obj.get("insights") {
            Some(serde_json::Value::Array(items)) => items.iter().collect(),
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };

    items
        .into_iter()
        .filter_map(|item| match item {
            serde_json::Value::String(s) => Some(s.as_str()),
            serde_json::Value::Object(obj) => ["text", "insight", "title"]
                .iter()
                .find_map(|k| obj.get(*k).and_then(|v| v.as_str())),
            _ => None,
        })
        .filter_map(|s| non_empty(Some(s)).map(str::to_string))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_race_type_defaults_to_fleet() {
        assert_eq!(RaceType::from_db(None), RaceType::Fleet);
        assert_eq!(RaceType::from_db(Some("")), RaceType::Fleet);
        assert_eq!(RaceType::from_db(Some("match")), RaceType::Fleet);
        assert_eq!(RaceType::from_db(Some("Distance")), RaceType::Distance);
    }

    #[test]
    fn fleet_and_distance_phase_lists_differ() {
        let fleet: Vec<_> = RaceType::Fleet.phases().iter().map(|p| p.label).collect();
        let distance: Vec<_> = RaceType::Distance.phases().iter().map(|p| p.label).collect();
        assert_eq!(
            fleet,
            vec!["Start", "Upwind", "Mark Roundings", "Downwind", "Finish"]
        );
        assert!(distance.contains(&"Navigation"));
        assert!(!distance.contains(&"Upwind"));
    }

    #[test]
    fn whitespace_phase_text_is_absent() {
        let prep = Preparation {
            start_strategy: Some("   ".into()),
            upwind_strategy: Some(" go left ".into()),
            ..Default::default()
        };
        assert_eq!(prep.phase_text(PhaseKey::Start), None);
        assert_eq!(prep.phase_text(PhaseKey::Upwind), Some("go left"));
    }

    #[test]
    fn tuning_values_are_stringified() {
        let map = tuning_from_json(&json!({
            "upper_shrouds": 28,
            "mast_rake": "1250 mm",
            "jib_halyard": null,
            "vang": ""
        }));
        assert_eq!(map.len(), 2);
        assert_eq!(map["upper_shrouds"], "28");
        assert_eq!(map["mast_rake"], "1250 mm");
    }

    #[test]
    fn tuning_from_non_object_is_empty() {
        assert!(tuning_from_json(&json!([1, 2])).is_empty());
        assert!(tuning_from_json(&serde_json::Value::Null).is_empty());
    }

    #[test]
    fn insights_accept_strings_and_objects() {
        let insights = insights_from_json(&json!([
            "Port end favored early",
            {"text": "Expect a left shift"},
            {"insight": "Current strongest mid-course"},
            {"other": "ignored"},
            "  "
        ]));
        assert_eq!(
            insights,
            vec![
                "Port end favored early",
                "Expect a left shift",
                "Current strongest mid-course"
            ]
        );
    }

    #[test]
    fn insights_wrapped_in_object() {
        let insights = insights_from_json(&json!({"insights": ["one", "two"]}));
        assert_eq!(insights, vec!["one", "two"]);
    }
}
