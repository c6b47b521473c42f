//! Unauthenticated routes mounted at `/api/public`.

use axum::routing::get;
use axum::Router;

use crate::handlers::public;
use crate::state::AppState;

/// ```text
/// GET    /regattas/{id}/schedule    -> regatta_schedule
/// GET    /regattas/{id}/notices     -> regatta_notices
/// GET    /strategies/{token}        -> shared_strategy
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/regattas/{id}/schedule", get(public::regatta_schedule))
        .route("/regattas/{id}/notices", get(public::regatta_notices))
        .route("/strategies/{token}", get(public::shared_strategy))
}
