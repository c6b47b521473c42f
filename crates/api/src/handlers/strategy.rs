//! Handlers for a sailor's race strategy: the aggregated view, the shareable
//! text, notes (immediate and debounced) and sharing.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use regatta_core::aggregate::{
    load_bundle, PhaseEntry, ResolvedSailor, SailorRef, StrategyBundle,
};
use regatta_core::error::CoreError;
use regatta_core::pricing::{rate_breakdown, PricingModel, RateBreakdown};
use regatta_core::public_link::{PublicLinkState, PublicLinkView};
use regatta_core::sharing::{dispatch, ShareContext, ShareRequest};
use regatta_core::strategy::{
    AiStrategy, CoachTarget, CrewTarget, Preparation, RaceInfo,
};
use regatta_core::types::{DbId, Timestamp};
use regatta_db::repositories::{
    CoachProfileRepo, CrewMemberRepo, RaceStrategyRepo, StrategyShareRepo,
};
use regatta_db::PgStrategySource;
use serde::{Deserialize, Serialize};

use crate::autosave::{normalize_notes, NotesKey};
use crate::error::{AppError, AppResult};
use crate::handlers::ensure_race_exists;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::sharing::{rotate_public_link, toggle_public_link, PgShareSink};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query parameters selecting whose strategy to load.
///
/// Without `sailor_id` the caller's own strategy is loaded.
#[derive(Debug, Default, Deserialize)]
pub struct SailorQuery {
    pub sailor_id: Option<DbId>,
    /// `profile`, `account` or `auto` (default).
    pub sailor_id_kind: Option<String>,
}

impl SailorQuery {
    fn sailor_ref(&self, auth: &AuthUser) -> AppResult<SailorRef> {
        match self.sailor_id {
            Some(id) => SailorRef::from_parts(id, self.sailor_id_kind.as_deref())
                .map_err(|msg| AppError::Core(CoreError::Validation(msg))),
            None => Ok(SailorRef::Account(auth.user_id)),
        }
    }
}

/// Body for `PUT .../strategy/notes` and `PUT .../strategy/notes/draft`.
#[derive(Debug, Deserialize)]
pub struct NotesInput {
    pub notes: Option<String>,
}

/// Query for `DELETE .../strategy/notes/draft`.
#[derive(Debug, Default, Deserialize)]
pub struct CloseDraftQuery {
    /// Write the pending draft before clearing it. Defaults to `true`.
    pub flush: Option<bool>,
}

/// Body for `POST .../strategy/public-link`.
#[derive(Debug, Deserialize)]
pub struct PublicLinkInput {
    pub enabled: bool,
}

/// The strategy view for one sailor on one race.
#[derive(Debug, Serialize)]
pub struct StrategyView {
    pub race_id: DbId,
    pub sailor: ResolvedSailor,
    pub race: Option<RaceInfo>,
    pub preparation: Option<Preparation>,
    pub strategy: Option<AiStrategy>,
    pub phases: Vec<PhaseEntry>,
    pub text: String,
    /// Only present for the strategy owner.
    pub public_link: Option<PublicLinkView>,
    /// Empty unless the viewer owns the strategy.
    pub coaches: Vec<CoachTarget>,
    /// Empty unless the viewer owns the strategy.
    pub crew: Vec<CrewTarget>,
}

#[derive(Debug, Serialize)]
pub struct StrategyText {
    pub title: String,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct NotesSaved {
    pub race_id: DbId,
    pub notes: Option<String>,
    pub updated_at: Timestamp,
}

#[derive(Debug, Serialize)]
pub struct DraftScheduled {
    pub debounce_ms: u64,
}

#[derive(Debug, Serialize)]
pub struct DraftClosed {
    pub flushed: bool,
}

/// A coach the caller can share with, with their rate as the coach sees it.
#[derive(Debug, Serialize)]
pub struct CoachShareTarget {
    pub coach_profile_id: DbId,
    pub display_name: String,
    pub rate: Option<RateBreakdown>,
}

#[derive(Debug, Serialize)]
pub struct CrewShareTarget {
    pub crew_member_id: DbId,
    pub name: String,
    pub role: Option<String>,
    /// Crew without an account cannot receive in-app notifications.
    pub can_notify: bool,
}

#[derive(Debug, Serialize)]
pub struct ShareTargets {
    pub coaches: Vec<CoachShareTarget>,
    pub crew: Vec<CrewShareTarget>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load a bundle and check the caller may read it.
///
/// The owner always may; a coach may once the owner has shared this race's
/// strategy with them.
async fn load_authorized_bundle(
    state: &AppState,
    auth: &AuthUser,
    race_id: DbId,
    query: &SailorQuery,
) -> AppResult<StrategyBundle> {
    let sailor = query.sailor_ref(auth)?;
    ensure_race_exists(&state.pool, race_id).await?;

    let source = PgStrategySource::new(state.pool.clone());
    let bundle = load_bundle(&source, race_id, sailor).await?;

    let owner = bundle.sailor.user_id;
    if owner != auth.user_id
        && !StrategyShareRepo::exists_for_coach(&state.pool, auth.user_id, owner, race_id).await?
    {
        return Err(AppError::Core(CoreError::Forbidden(
            "This strategy has not been shared with you".into(),
        )));
    }
    Ok(bundle)
}

fn public_link_view(strategy: Option<&AiStrategy>, base_url: &str) -> PublicLinkView {
    let link = strategy
        .map(|s| PublicLinkState {
            enabled: s.public_sharing_enabled,
            token: s.public_token.clone(),
            shared_at: s.public_shared_at,
        })
        .unwrap_or_default();
    link.view(base_url)
}

/// The coach's advertised rate for their pricing model, net of the platform fee.
///
/// Coaches with no pricing model, no matching rate, or a rate that cannot be
/// displayed are listed without one.
fn coach_rate(coach: &CoachTarget, fee_percent: f64) -> Option<RateBreakdown> {
    let model = PricingModel::parse(coach.pricing_model.as_deref()?).ok()?;
    let gross = match model {
        PricingModel::Hourly => coach.hourly_rate,
        PricingModel::Session | PricingModel::Package => coach.session_rate,
    }?;
    match rate_breakdown(model, gross, coach.currency.as_deref(), fee_percent) {
        Ok(breakdown) => Some(breakdown),
        Err(msg) => {
            tracing::warn!(
                coach_id = coach.coach_profile_id,
                error = %msg,
                "Skipping invalid coach rate"
            );
            None
        }
    }
}

/// Build the strategy view for `viewer_id`.
///
/// Viewers other than the owner (a coach the strategy was shared with) get
/// no public-link token and no coach or crew lists.
fn strategy_view(bundle: StrategyBundle, viewer_id: DbId, public_web_url: &str) -> StrategyView {
    let is_owner = bundle.sailor.user_id == viewer_id;
    let phases = bundle.phase_overview();
    let text = bundle.compile_text();
    let public_link =
        is_owner.then(|| public_link_view(bundle.strategy.as_ref(), public_web_url));

    let mut strategy = bundle.strategy;
    let (mut coaches, mut crew) = (bundle.coaches, bundle.crew);
    if !is_owner {
        if let Some(s) = strategy.as_mut() {
            s.public_sharing_enabled = false;
            s.public_token = None;
            s.public_shared_at = None;
        }
        coaches.clear();
        crew.clear();
    }

    StrategyView {
        race_id: bundle.race_id,
        sailor: bundle.sailor,
        race: bundle.race,
        preparation: bundle.preparation,
        strategy,
        phases,
        text,
        public_link,
        coaches,
        crew,
    }
}

// ---------------------------------------------------------------------------
// Strategy view
// ---------------------------------------------------------------------------

/// GET /api/v1/races/{race_id}/strategy/bundle
///
/// Everything the strategy screen shows, plus the compiled share text.
pub async fn get_bundle(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(race_id): Path<DbId>,
    Query(query): Query<SailorQuery>,
) -> AppResult<impl IntoResponse> {
    let bundle = load_authorized_bundle(&state, &auth, race_id, &query).await?;

    let view = strategy_view(bundle, auth.user_id, &state.config.public_web_url);
    Ok(Json(DataResponse { data: view }))
}

/// GET /api/v1/races/{race_id}/strategy/text
pub async fn get_text(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(race_id): Path<DbId>,
    Query(query): Query<SailorQuery>,
) -> AppResult<impl IntoResponse> {
    let bundle = load_authorized_bundle(&state, &auth, race_id, &query).await?;
    let text = bundle.compile_text();
    let title = ShareContext {
        race_id,
        sender_user_id: bundle.sailor.user_id,
        race_name: bundle.race_name(),
        text: &text,
    }
    .title();

    Ok(Json(DataResponse {
        data: StrategyText { title, text },
    }))
}

// ---------------------------------------------------------------------------
// Notes
// ---------------------------------------------------------------------------

/// PUT /api/v1/races/{race_id}/strategy/notes
///
/// Save notes now. Any pending draft for the same race is dropped, and a
/// draft already being written lands first.
pub async fn save_notes(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(race_id): Path<DbId>,
    Json(input): Json<NotesInput>,
) -> AppResult<impl IntoResponse> {
    ensure_race_exists(&state.pool, race_id).await?;

    let key = NotesKey {
        race_id,
        user_id: auth.user_id,
    };
    let notes = normalize_notes(input.notes.as_deref());
    let row = state
        .autosave
        .save_now(key, || {
            RaceStrategyRepo::upsert_notes(&state.pool, race_id, auth.user_id, notes)
        })
        .await?;

    tracing::info!(user_id = auth.user_id, race_id, "Strategy notes saved");

    Ok(Json(DataResponse {
        data: NotesSaved {
            race_id,
            notes: row.notes,
            updated_at: row.updated_at,
        },
    }))
}

/// PUT /api/v1/races/{race_id}/strategy/notes/draft
///
/// Queue a notes draft for debounced saving. Returns 202 Accepted.
pub async fn save_draft(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(race_id): Path<DbId>,
    Json(input): Json<NotesInput>,
) -> AppResult<impl IntoResponse> {
    ensure_race_exists(&state.pool, race_id).await?;

    state.autosave.schedule(
        NotesKey {
            race_id,
            user_id: auth.user_id,
        },
        input.notes,
    );

    let debounce_ms = u64::try_from(state.autosave.delay().as_millis()).unwrap_or(u64::MAX);
    Ok((
        StatusCode::ACCEPTED,
        Json(DataResponse {
            data: DraftScheduled { debounce_ms },
        }),
    ))
}

/// DELETE /api/v1/races/{race_id}/strategy/notes/draft
///
/// End the editing session. The pending timer is always cleared; with
/// `flush=true` (the default) the pending draft is written first.
pub async fn close_draft(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(race_id): Path<DbId>,
    Query(query): Query<CloseDraftQuery>,
) -> AppResult<impl IntoResponse> {
    let key = NotesKey {
        race_id,
        user_id: auth.user_id,
    };
    let flushed = state
        .autosave
        .close(key, query.flush.unwrap_or(true))
        .await?;

    Ok(Json(DataResponse {
        data: DraftClosed { flushed },
    }))
}

// ---------------------------------------------------------------------------
// Sharing
// ---------------------------------------------------------------------------

/// GET /api/v1/races/{race_id}/strategy/share-targets
///
/// The caller's active coaches (with rates) and crew.
pub async fn share_targets(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(race_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_race_exists(&state.pool, race_id).await?;

    let (coaches, crew) = tokio::try_join!(
        CoachProfileRepo::list_for_sailor(&state.pool, auth.user_id),
        CrewMemberRepo::list_for_sailor(&state.pool, auth.user_id),
    )?;

    let fee = state.config.platform_fee_percent;
    let coaches = coaches
        .into_iter()
        .map(CoachTarget::from)
        .map(|coach| CoachShareTarget {
            rate: coach_rate(&coach, fee),
            coach_profile_id: coach.coach_profile_id,
            display_name: coach.display_name,
        })
        .collect();
    let crew = crew
        .into_iter()
        .map(|m| CrewShareTarget {
            crew_member_id: m.id,
            can_notify: m.member_user_id.is_some(),
            name: m.name,
            role: m.role,
        })
        .collect();

    Ok(Json(DataResponse {
        data: ShareTargets { coaches, crew },
    }))
}

/// POST /api/v1/races/{race_id}/strategy/share
///
/// Share the caller's strategy to one destination.
pub async fn share(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(race_id): Path<DbId>,
    Json(request): Json<ShareRequest>,
) -> AppResult<impl IntoResponse> {
    ensure_race_exists(&state.pool, race_id).await?;

    let source = PgStrategySource::new(state.pool.clone());
    let bundle = load_bundle(&source, race_id, SailorRef::Account(auth.user_id)).await?;
    let text = bundle.compile_text();

    let ctx = ShareContext {
        race_id,
        sender_user_id: auth.user_id,
        race_name: bundle.race_name(),
        text: &text,
    };
    let sink = PgShareSink {
        pool: &state.pool,
        public_web_url: &state.config.public_web_url,
    };

    let channel = request.channel_name();
    let outcome = dispatch(&sink, &ctx, request).await.inspect_err(|e| {
        tracing::warn!(
            user_id = auth.user_id,
            race_id,
            channel,
            error = %e,
            "Strategy share failed"
        );
    })?;

    tracing::debug!(user_id = auth.user_id, race_id, channel, "Strategy share dispatched");
    Ok(Json(DataResponse { data: outcome }))
}

/// POST /api/v1/races/{race_id}/strategy/public-link
///
/// Enable or disable the public link. Disabling keeps the token so
/// re-enabling restores the same URL.
pub async fn set_public_link(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(race_id): Path<DbId>,
    Json(input): Json<PublicLinkInput>,
) -> AppResult<impl IntoResponse> {
    ensure_race_exists(&state.pool, race_id).await?;

    let view = toggle_public_link(
        &state.pool,
        &state.config.public_web_url,
        race_id,
        auth.user_id,
        input.enabled,
    )
    .await?;

    Ok(Json(DataResponse { data: view }))
}

/// POST /api/v1/races/{race_id}/strategy/public-link/rotate
///
/// Issue a new token. Old links stop working.
pub async fn rotate_link(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(race_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_race_exists(&state.pool, race_id).await?;

    let view =
        rotate_public_link(&state.pool, &state.config.public_web_url, race_id, auth.user_id)
            .await?;

    Ok(Json(DataResponse { data: view }))
}

#[cfg(test)]
mod tests {
    use regatta_core::aggregate::Resolution;

    use super::*;

    fn coach(model: Option<&str>, hourly: Option<f64>, session: Option<f64>) -> CoachTarget {
        CoachTarget {
            coach_profile_id: 1,
            user_id: 2,
            display_name: "Coach".into(),
            pricing_model: model.map(str::to_string),
            hourly_rate: hourly,
            session_rate: session,
            currency: Some("USD".into()),
        }
    }

    #[test]
    fn hourly_coach_rate_uses_hourly_field() {
        let rate = coach_rate(&coach(Some("hourly"), Some(100.0), Some(300.0)), 15.0).unwrap();
        assert_eq!(rate.net_rate, 85);
        assert_eq!(rate.net_display, "$85/hr");
    }

    #[test]
    fn session_coach_rate_uses_session_field() {
        let rate = coach_rate(&coach(Some("session"), Some(100.0), Some(200.0)), 15.0).unwrap();
        assert_eq!(rate.net_rate, 170);
    }

    #[test]
    fn coach_without_pricing_has_no_rate() {
        assert!(coach_rate(&coach(None, Some(100.0), None), 15.0).is_none());
        assert!(coach_rate(&coach(Some("hourly"), None, Some(50.0)), 15.0).is_none());
        assert!(coach_rate(&coach(Some("daily"), Some(100.0), None), 15.0).is_none());
    }

    #[test]
    fn missing_sailor_defaults_to_caller() {
        let auth = AuthUser {
            user_id: 42,
            role: "sailor".into(),
        };
        let query = SailorQuery::default();
        assert_eq!(query.sailor_ref(&auth).unwrap(), SailorRef::Account(42));
    }

    #[test]
    fn invalid_sailor_kind_is_rejected() {
        let auth = AuthUser {
            user_id: 42,
            role: "sailor".into(),
        };
        let query = SailorQuery {
            sailor_id: Some(7),
            sailor_id_kind: Some("boat".into()),
        };
        assert!(matches!(
            query.sailor_ref(&auth),
            Err(AppError::Core(CoreError::Validation(_)))
        ));
    }

    fn shared_bundle() -> StrategyBundle {
        StrategyBundle {
            race_id: 5,
            sailor: ResolvedSailor {
                user_id: 10,
                profile: None,
                resolution: Resolution::AccountId,
            },
            race: None,
            preparation: None,
            strategy: Some(AiStrategy {
                wind_strategy: Some("Go left".into()),
                public_sharing_enabled: true,
                public_token: Some("secret-token".into()),
                public_shared_at: Some(chrono::Utc::now()),
                ..Default::default()
            }),
            coaches: vec![coach(Some("hourly"), Some(100.0), None)],
            crew: vec![CrewTarget {
                crew_member_id: 1,
                member_user_id: Some(11),
                name: "Bow".into(),
                role: None,
            }],
        }
    }

    #[test]
    fn owner_view_keeps_link_and_targets() {
        let view = strategy_view(shared_bundle(), 10, "https://regatta.test");
        assert!(view.public_link.is_some_and(|l| l.enabled));
        assert_eq!(
            view.strategy.unwrap().public_token.as_deref(),
            Some("secret-token")
        );
        assert_eq!(view.coaches.len(), 1);
        assert_eq!(view.crew.len(), 1);
    }

    #[test]
    fn coach_view_hides_link_and_targets() {
        let view = strategy_view(shared_bundle(), 99, "https://regatta.test");
        assert!(view.public_link.is_none());
        let strategy = view.strategy.unwrap();
        assert_eq!(strategy.public_token, None);
        assert!(!strategy.public_sharing_enabled);
        assert_eq!(strategy.wind_strategy.as_deref(), Some("Go left"));
        assert!(view.coaches.is_empty());
        assert!(view.crew.is_empty());
        assert!(view.text.contains("Go left"));
    }
}
