#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use regatta_api::auth::jwt::{generate_access_token, JwtConfig};
use regatta_api::config::ServerConfig;
use regatta_api::router::build_app_router;
use regatta_api::state::AppState;
use regatta_db::models::coach_profile::CreateCoachProfile;
use regatta_db::models::crew_member::CreateCrewMember;
use regatta_db::models::race::CreateRace;
use regatta_db::models::user::CreateUser;
use regatta_db::repositories::{CoachProfileRepo, CrewMemberRepo, RaceRepo, UserRepo};

pub const PUBLIC_WEB_URL: &str = "https://regatta.test";

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin and a short autosave delay.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        public_web_url: PUBLIC_WEB_URL.to_string(),
        notes_autosave_debounce_ms: 200,
        platform_fee_percent: 15.0,
        jwt: JwtConfig {
            secret: "test-secret-for-integration-tests".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Build the full application router with the production middleware stack.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState::new(pool, config.clone());
    build_app_router(state, &config)
}

/// Like [`build_test_app`], also returning the state so tests can inspect
/// the autosave timers.
pub fn build_test_app_with_state(pool: PgPool) -> (Router, AppState) {
    let config = test_config();
    let state = AppState::new(pool, config.clone());
    (build_app_router(state.clone(), &config), state)
}

pub fn token_for(user_id: i64) -> String {
    generate_access_token(user_id, "sailor", &test_config().jwt).unwrap()
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    user_id: Option<i64>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(id) = user_id {
        builder = builder.header("Authorization", format!("Bearer {}", token_for(id)));
    }
    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, user_id: i64) -> Response<Body> {
    send(app, Method::GET, uri, Some(user_id), None).await
}

pub async fn post_auth(app: Router, uri: &str, user_id: i64) -> Response<Body> {
    send(app, Method::POST, uri, Some(user_id), None).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    user_id: i64,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(user_id), Some(body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    user_id: i64,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(user_id), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, user_id: i64) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(user_id), None).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Seed helpers
// ---------------------------------------------------------------------------

pub async fn seed_user(pool: &PgPool, name: &str) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            email: format!("{name}@example.com"),
            display_name: name.to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

pub async fn seed_race(pool: &PgPool, input: CreateRace) -> i64 {
    RaceRepo::create(pool, &input).await.unwrap().id
}

pub async fn seed_named_race(pool: &PgPool, name: &str) -> i64 {
    seed_race(
        pool,
        CreateRace {
            name: name.to_string(),
            ..Default::default()
        },
    )
    .await
}

/// Create a coach account with an hourly rate and link it to `sailor`.
/// Returns `(coach_user_id, coach_profile_id)`.
pub async fn seed_linked_coach(pool: &PgPool, sailor: i64, name: &str) -> (i64, i64) {
    let coach_user = seed_user(pool, name).await;
    let profile = CoachProfileRepo::create(
        pool,
        &CreateCoachProfile {
            user_id: coach_user,
            display_name: name.to_string(),
            pricing_model: Some("hourly".to_string()),
            hourly_rate: Some(100.0),
            session_rate: None,
            currency: Some("USD".to_string()),
        },
    )
    .await
    .unwrap();
    CoachProfileRepo::link_sailor(pool, sailor, profile.id)
        .await
        .unwrap();
    (coach_user, profile.id)
}

pub async fn seed_crew(pool: &PgPool, sailor: i64, name: &str, member_user_id: Option<i64>) -> i64 {
    CrewMemberRepo::create(
        pool,
        &CreateCrewMember {
            sailor_user_id: sailor,
            member_user_id,
            name: name.to_string(),
            role: Some("trimmer".to_string()),
            email: None,
        },
    )
    .await
    .unwrap()
    .id
}
