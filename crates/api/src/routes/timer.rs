use axum::routing::{get, post};
use axum::Router;

use crate::handlers::timer;
use crate::state::AppState;

/// Routes mounted at `/timer`.
///
/// ```text
/// GET    /sessions/{id}              -> get_session
/// POST   /sessions/{id}/points       -> append_points
/// POST   /sessions/{id}/finish       -> finish_session
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sessions/{id}", get(timer::get_session))
        .route("/sessions/{id}/points", post(timer::append_points))
        .route("/sessions/{id}/finish", post(timer::finish_session))
}
