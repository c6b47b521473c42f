//! Route definitions nested under `/races/{race_id}`.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{strategy, timer};
use crate::state::AppState;

/// Routes mounted at `/races`.
///
/// ```text
/// GET    /{race_id}/strategy/bundle               -> get_bundle
/// GET    /{race_id}/strategy/text                 -> get_text
/// PUT    /{race_id}/strategy/notes                -> save_notes
/// PUT    /{race_id}/strategy/notes/draft          -> save_draft
/// DELETE /{race_id}/strategy/notes/draft          -> close_draft
/// GET    /{race_id}/strategy/share-targets        -> share_targets
/// POST   /{race_id}/strategy/share                -> share
/// POST   /{race_id}/strategy/public-link          -> set_public_link
/// POST   /{race_id}/strategy/public-link/rotate   -> rotate_link
///
/// POST   /{race_id}/timer/sessions                -> start_session
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{race_id}/strategy/bundle", get(strategy::get_bundle))
        .route("/{race_id}/strategy/text", get(strategy::get_text))
        .route("/{race_id}/strategy/notes", put(strategy::save_notes))
        .route(
            "/{race_id}/strategy/notes/draft",
            put(strategy::save_draft).delete(strategy::close_draft),
        )
        .route(
            "/{race_id}/strategy/share-targets",
            get(strategy::share_targets),
        )
        .route("/{race_id}/strategy/share", post(strategy::share))
        .route(
            "/{race_id}/strategy/public-link",
            post(strategy::set_public_link),
        )
        .route(
            "/{race_id}/strategy/public-link/rotate",
            post(strategy::rotate_link),
        )
        .route("/{race_id}/timer/sessions", post(timer::start_session))
}
