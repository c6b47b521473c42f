//! Strategy data aggregation.
//!
//! Resolves who the sailor is, then loads everything the strategy view and
//! text compiler need. Missing records are normal (new race, no AI run yet)
//! and individual read failures are logged and skipped, so a load always
//! produces a bundle.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::strategy::{
    AiStrategy, CoachTarget, CrewTarget, PhaseKey, Preparation, RaceInfo, SailorProfile,
};
use crate::strategy_text::{compile_strategy_text, StrategyInput};
use crate::types::DbId;

/// Placeholder shown for a phase with no plan yet.
pub const NOT_SET: &str = "Not set";

// ---------------------------------------------------------------------------
// Sailor identity
// ---------------------------------------------------------------------------

/// A sailor identifier tagged with what kind of id it is.
///
/// Clients that know which id they hold send `Profile` or `Account`.
/// `Unknown` keeps older clients working: it is tried as a profile id, then
/// as an account id owning a profile, then used as the account id as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum SailorRef {
    Profile(DbId),
    Account(DbId),
    Unknown(DbId),
}

impl SailorRef {
    /// Build from a query-string pair (`sailor_id`, `sailor_id_kind`).
    pub fn from_parts(id: DbId, kind: Option<&str>) -> Result<Self, String> {
        match kind.map(str::trim) {
            Some("profile") => Ok(SailorRef::Profile(id)),
            Some("account") => Ok(SailorRef::Account(id)),
            None | Some("") | Some("auto") => Ok(SailorRef::Unknown(id)),
            Some(other) => Err(format!(
                "Invalid sailor id kind '{other}'. Must be one of: profile, account, auto"
            )),
        }
    }
}

/// Which lookup produced the account id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    ProfileId,
    AccountId,
    Passthrough,
}

/// Outcome of identity resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedSailor {
    /// Canonical account id.
    pub user_id: DbId,
    pub profile: Option<SailorProfile>,
    pub resolution: Resolution,
}

// ---------------------------------------------------------------------------
// Source trait
// ---------------------------------------------------------------------------

/// Read access to everything a strategy bundle is built from.
#[async_trait]
pub trait StrategySource: Send + Sync {
    type Error: std::fmt::Display + Send;

    async fn profile_by_id(&self, profile_id: DbId) -> Result<Option<SailorProfile>, Self::Error>;

    async fn profile_by_user_id(&self, user_id: DbId)
        -> Result<Option<SailorProfile>, Self::Error>;

    async fn race(&self, race_id: DbId) -> Result<Option<RaceInfo>, Self::Error>;

    async fn preparation(
        &self,
        race_id: DbId,
        user_id: DbId,
    ) -> Result<Option<Preparation>, Self::Error>;

    async fn strategy(&self, race_id: DbId, user_id: DbId)
        -> Result<Option<AiStrategy>, Self::Error>;

    async fn coaches(&self, user_id: DbId) -> Result<Vec<CoachTarget>, Self::Error>;

    async fn crew(&self, user_id: DbId) -> Result<Vec<CrewTarget>, Self::Error>;
}

/// Resolve a sailor reference to an account id.
///
/// An explicit profile id that matches no profile is an error. Lookup
/// failures inside the `Unknown` heuristic are logged and treated as misses.
pub async fn resolve_sailor<S: StrategySource>(
    source: &S,
    sailor: SailorRef,
) -> Result<ResolvedSailor, CoreError> {
    match sailor {
        SailorRef::Profile(profile_id) => match source.profile_by_id(profile_id).await {
            Ok(Some(profile)) => Ok(ResolvedSailor {
                user_id: profile.user_id,
                profile: Some(profile),
                resolution: Resolution::ProfileId,
            }),
            Ok(None) => Err(CoreError::NotFound {
                entity: "SailorProfile",
                id: profile_id,
            }),
            Err(e) => Err(CoreError::Internal(format!(
                "Failed to look up sailor profile {profile_id}: {e}"
            ))),
        },
        SailorRef::Account(user_id) => {
            let profile = soften(
                source.profile_by_user_id(user_id).await,
                "profile_by_user_id",
                user_id,
            );
            Ok(ResolvedSailor {
                user_id,
                profile,
                resolution: Resolution::AccountId,
            })
        }
        SailorRef::Unknown(id) => {
            if let Some(profile) = soften(source.profile_by_id(id).await, "profile_by_id", id) {
                return Ok(ResolvedSailor {
                    user_id: profile.user_id,
                    profile: Some(profile),
                    resolution: Resolution::ProfileId,
                });
            }
            if let Some(profile) =
                soften(source.profile_by_user_id(id).await, "profile_by_user_id", id)
            {
                return Ok(ResolvedSailor {
                    user_id: profile.user_id,
                    profile: Some(profile),
                    resolution: Resolution::AccountId,
                });
            }
            tracing::debug!(sailor_id = id, "No profile matched, using id as account id");
            Ok(ResolvedSailor {
                user_id: id,
                profile: None,
                resolution: Resolution::Passthrough,
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Bundle
// ---------------------------------------------------------------------------

/// Everything loaded for one sailor's strategy on one race.
#[derive(Debug, Clone, Serialize)]
pub struct StrategyBundle {
    pub race_id: DbId,
    pub sailor: ResolvedSailor,
    pub race: Option<RaceInfo>,
    pub preparation: Option<Preparation>,
    pub strategy: Option<AiStrategy>,
    pub coaches: Vec<CoachTarget>,
    pub crew: Vec<CrewTarget>,
}

/// One row of the phase overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseEntry {
    pub key: PhaseKey,
    pub label: &'static str,
    pub value: Option<String>,
    /// `value`, or [`NOT_SET`].
    pub display: String,
}

impl StrategyBundle {
    pub fn text_input(&self) -> StrategyInput<'_> {
        StrategyInput {
            race: self.race.as_ref(),
            preparation: self.preparation.as_ref(),
            strategy: self.strategy.as_ref(),
        }
    }

    pub fn compile_text(&self) -> String {
        compile_strategy_text(&self.text_input())
    }

    /// The race plan with an explicit placeholder for each empty phase.
    pub fn phase_overview(&self) -> Vec<PhaseEntry> {
        let race_type = self.race.as_ref().map(|r| r.race_type).unwrap_or_default();
        race_type
            .phases()
            .iter()
            .map(|phase| {
                let value = self
                    .preparation
                    .as_ref()
                    .and_then(|p| p.phase_text(phase.key))
                    .map(str::to_string);
                PhaseEntry {
                    key: phase.key,
                    label: phase.label,
                    display: value.clone().unwrap_or_else(|| NOT_SET.to_string()),
                    value,
                }
            })
            .collect()
    }

    pub fn race_name(&self) -> &str {
        self.race
            .as_ref()
            .map(|r| r.name.as_str())
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(crate::strategy_text::UNTITLED_RACE)
    }
}

/// Resolve the sailor and load all strategy data for a race.
///
/// The five reads run concurrently. Each failed read is logged and replaced
/// by its empty value; there is no retry.
pub async fn load_bundle<S: StrategySource>(
    source: &S,
    race_id: DbId,
    sailor: SailorRef,
) -> Result<StrategyBundle, CoreError> {
    let sailor = resolve_sailor(source, sailor).await?;
    let user_id = sailor.user_id;

    let (race, preparation, strategy, coaches, crew) = tokio::join!(
        source.race(race_id),
        source.preparation(race_id, user_id),
        source.strategy(race_id, user_id),
        source.coaches(user_id),
        source.crew(user_id),
    );

    Ok(StrategyBundle {
        race_id,
        race: soften(race, "race", race_id),
        preparation: soften(preparation, "preparation", race_id),
        strategy: soften(strategy, "strategy", race_id),
        coaches: soften(coaches.map(Some), "coaches", user_id).unwrap_or_default(),
        crew: soften(crew.map(Some), "crew", user_id).unwrap_or_default(),
        sailor,
    })
}

/// Log a failed read and carry on without it.
fn soften<T, E: std::fmt::Display>(
    result: Result<Option<T>, E>,
    what: &'static str,
    id: DbId,
) -> Option<T> {
    match result {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(
                error = %e,
                read = what,
                id,
                "Strategy read failed, continuing without it"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeSource {
        profiles: Vec<SailorProfile>,
        races: HashMap<DbId, RaceInfo>,
        preparations: HashMap<(DbId, DbId), Preparation>,
        strategies: HashMap<(DbId, DbId), AiStrategy>,
        crew: HashMap<DbId, Vec<CrewTarget>>,
        failing: HashSet<&'static str>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeSource {
        fn log(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }

        fn check(&self, what: &'static str) -> Result<(), String> {
            if self.failing.contains(what) {
                Err(format!("{what} unavailable"))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl StrategySource for FakeSource {
        type Error = String;

        async fn profile_by_id(&self, id: DbId) -> Result<Option<SailorProfile>, String> {
            self.log(format!("profile_by_id:{id}"));
            self.check("profile_by_id")?;
            Ok(self.profiles.iter().find(|p| p.profile_id == id).cloned())
        }

        async fn profile_by_user_id(&self, id: DbId) -> Result<Option<SailorProfile>, String> {
            self.log(format!("profile_by_user_id:{id}"));
            self.check("profile_by_user_id")?;
            Ok(self.profiles.iter().find(|p| p.user_id == id).cloned())
        }

        async fn race(&self, race_id: DbId) -> Result<Option<RaceInfo>, String> {
            self.check("race")?;
            Ok(self.races.get(&race_id).cloned())
        }

        async fn preparation(
            &self,
            race_id: DbId,
            user_id: DbId,
        ) -> Result<Option<Preparation>, String> {
            self.check("preparation")?;
            Ok(self.preparations.get(&(race_id, user_id)).cloned())
        }

        async fn strategy(
            &self,
            race_id: DbId,
            user_id: DbId,
        ) -> Result<Option<AiStrategy>, String> {
            self.check("strategy")?;
            Ok(self.strategies.get(&(race_id, user_id)).cloned())
        }

        async fn coaches(&self, _user_id: DbId) -> Result<Vec<CoachTarget>, String> {
            self.check("coaches")?;
            Ok(Vec::new())
        }

        async fn crew(&self, user_id: DbId) -> Result<Vec<CrewTarget>, String> {
            self.check("crew")?;
            Ok(self.crew.get(&user_id).cloned().unwrap_or_default())
        }
    }

    fn profile(profile_id: DbId, user_id: DbId) -> SailorProfile {
        SailorProfile {
            profile_id,
            user_id,
            display_name: format!("Sailor {profile_id}"),
        }
    }

    #[tokio::test]
    async fn profile_id_resolves_to_account_id() {
        let source = FakeSource {
            profiles: vec![profile(10, 500)],
            ..Default::default()
        };
        let resolved = resolve_sailor(&source, SailorRef::Unknown(10)).await.unwrap();
        assert_eq!(resolved.user_id, 500);
        assert_eq!(resolved.resolution, Resolution::ProfileId);
        assert_eq!(*source.calls.lock().unwrap(), vec!["profile_by_id:10"]);
    }

    #[tokio::test]
    async fn account_id_found_on_second_lookup() {
        let source = FakeSource {
            profiles: vec![profile(10, 500)],
            ..Default::default()
        };
        let resolved = resolve_sailor(&source, SailorRef::Unknown(500)).await.unwrap();
        assert_eq!(resolved.user_id, 500);
        assert_eq!(resolved.resolution, Resolution::AccountId);
        assert_eq!(
            *source.calls.lock().unwrap(),
            vec!["profile_by_id:500", "profile_by_user_id:500"]
        );
    }

    #[tokio::test]
    async fn unmatched_id_passes_through() {
        let source = FakeSource::default();
        let resolved = resolve_sailor(&source, SailorRef::Unknown(42)).await.unwrap();
        assert_eq!(resolved.user_id, 42);
        assert_eq!(resolved.resolution, Resolution::Passthrough);
        assert!(resolved.profile.is_none());
    }

    #[tokio::test]
    async fn profile_lookup_wins_over_account_lookup() {
        // id 7 is both a profile id (owned by account 900) and an account id.
        let source = FakeSource {
            profiles: vec![profile(7, 900), profile(8, 7)],
            ..Default::default()
        };
        let resolved = resolve_sailor(&source, SailorRef::Unknown(7)).await.unwrap();
        assert_eq!(resolved.user_id, 900);
    }

    #[tokio::test]
    async fn failing_profile_lookup_falls_through() {
        let source = FakeSource {
            profiles: vec![profile(10, 500)],
            failing: HashSet::from(["profile_by_id"]),
            ..Default::default()
        };
        let resolved = resolve_sailor(&source, SailorRef::Unknown(500)).await.unwrap();
        assert_eq!(resolved.resolution, Resolution::AccountId);
    }

    #[tokio::test]
    async fn explicit_profile_must_exist() {
        let source = FakeSource::default();
        let result = resolve_sailor(&source, SailorRef::Profile(3)).await;
        assert_matches!(result, Err(CoreError::NotFound { entity: "SailorProfile", id: 3 }));
    }

    #[tokio::test]
    async fn explicit_account_skips_profile_id_lookup() {
        let source = FakeSource {
            profiles: vec![profile(500, 1), profile(10, 500)],
            ..Default::default()
        };
        let resolved = resolve_sailor(&source, SailorRef::Account(500)).await.unwrap();
        assert_eq!(resolved.user_id, 500);
        assert_eq!(*source.calls.lock().unwrap(), vec!["profile_by_user_id:500"]);
    }

    #[tokio::test]
    async fn bundle_loads_records_for_resolved_account() {
        let mut source = FakeSource {
            profiles: vec![profile(10, 500)],
            ..Default::default()
        };
        source.races.insert(
            1,
            RaceInfo {
                id: 1,
                name: "Harbour Cup".into(),
                ..Default::default()
            },
        );
        source.preparations.insert(
            (1, 500),
            Preparation {
                start_strategy: Some("Pin end".into()),
                ..Default::default()
            },
        );
        source.crew.insert(
            500,
            vec![CrewTarget {
                crew_member_id: 3,
                member_user_id: Some(600),
                name: "Bow".into(),
                role: None,
            }],
        );

        let bundle = load_bundle(&source, 1, SailorRef::Profile(10)).await.unwrap();
        assert_eq!(bundle.sailor.user_id, 500);
        assert_eq!(bundle.race_name(), "Harbour Cup");
        assert!(bundle.preparation.is_some());
        assert!(bundle.strategy.is_none());
        assert_eq!(bundle.crew.len(), 1);
        assert!(bundle.compile_text().contains("Start: Pin end"));
    }

    #[tokio::test]
    async fn failed_reads_degrade_to_empty() {
        let mut source = FakeSource {
            failing: HashSet::from(["preparation", "crew", "strategy"]),
            ..Default::default()
        };
        source.races.insert(
            1,
            RaceInfo {
                id: 1,
                name: "Harbour Cup".into(),
                ..Default::default()
            },
        );
        let bundle = load_bundle(&source, 1, SailorRef::Account(500)).await.unwrap();
        assert!(bundle.race.is_some());
        assert!(bundle.preparation.is_none());
        assert!(bundle.strategy.is_none());
        assert!(bundle.crew.is_empty());
    }

    #[tokio::test]
    async fn phase_overview_uses_placeholder() {
        let mut source = FakeSource::default();
        source.preparations.insert(
            (1, 5),
            Preparation {
                upwind_strategy: Some("Right side".into()),
                ..Default::default()
            },
        );
        let bundle = load_bundle(&source, 1, SailorRef::Account(5)).await.unwrap();
        let overview = bundle.phase_overview();
        assert_eq!(overview.len(), 5);
        assert_eq!(overview[0].display, NOT_SET);
        assert_eq!(overview[1].label, "Upwind");
        assert_eq!(overview[1].display, "Right side");
        assert_eq!(bundle.race_name(), "Untitled race");
    }

    #[test]
    fn sailor_ref_from_query_parts() {
        assert_eq!(SailorRef::from_parts(4, None).unwrap(), SailorRef::Unknown(4));
        assert_eq!(SailorRef::from_parts(4, Some("auto")).unwrap(), SailorRef::Unknown(4));
        assert_eq!(SailorRef::from_parts(4, Some("profile")).unwrap(), SailorRef::Profile(4));
        assert_eq!(SailorRef::from_parts(4, Some("account")).unwrap(), SailorRef::Account(4));
        assert!(SailorRef::from_parts(4, Some("crew")).is_err());
    }
}
