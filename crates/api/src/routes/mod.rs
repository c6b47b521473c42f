pub mod health;
pub mod notification;
pub mod public;
pub mod races;
pub mod timer;

use axum::routing::post;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree. Every route requires a Bearer token.
///
/// Route hierarchy:
///
/// ```text
/// /races/{race_id}/strategy/bundle                 aggregated strategy view (GET)
/// /races/{race_id}/strategy/text                   compiled share text (GET)
/// /races/{race_id}/strategy/notes                  save notes now (PUT)
/// /races/{race_id}/strategy/notes/draft            debounced save (PUT), close (DELETE)
/// /races/{race_id}/strategy/share-targets          coaches and crew (GET)
/// /races/{race_id}/strategy/share                  share to one channel (POST)
/// /races/{race_id}/strategy/public-link            enable/disable (POST)
/// /races/{race_id}/strategy/public-link/rotate     new token (POST)
/// /races/{race_id}/timer/sessions                  start timer (POST)
///
/// /timer/sessions/{id}                             get session
/// /timer/sessions/{id}/points                      upload samples (POST)
/// /timer/sessions/{id}/finish                      stop and summarize (POST)
///
/// /coach/pricing/preview                           net rate preview (POST)
///
/// /notifications                                   list
/// /notifications/unread-count                      unread count
/// /notifications/read-all                          mark all read (POST)
/// /notifications/{id}/read                         mark read (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/races", races::router())
        .nest("/timer", timer::router())
        .route("/coach/pricing/preview", post(handlers::pricing::preview))
        .nest("/notifications", notification::router())
}
