//! HTTP-level tests for the unauthenticated public pages.

mod common;

use axum::http::StatusCode;
use chrono::{TimeZone, Utc};
use common::{body_json, get, post_json_auth, seed_race, seed_user};
use regatta_db::models::race::CreateRace;
use regatta_db::models::race_preparation::UpsertPreparation;
use regatta_db::models::regatta::{CreateRegatta, CreateRegattaNotice};
use regatta_db::models::sailor_profile::CreateSailorProfile;
use regatta_db::repositories::{
    RacePreparationRepo, RegattaNoticeRepo, RegattaRepo, SailorProfileRepo,
};
use serde_json::json;
use sqlx::PgPool;

async fn regatta(pool: &PgPool, published: bool) -> i64 {
    RegattaRepo::create(
        pool,
        &CreateRegatta {
            name: "Harbour Week".to_string(),
            venue: Some("Outer Harbour".to_string()),
            starts_on: None,
            ends_on: None,
            is_published: Some(published),
            created_by: None,
        },
    )
    .await
    .unwrap()
    .id
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn schedule_lists_races_in_start_order(pool: PgPool) {
    let regatta_id = regatta(&pool, true).await;
    for (name, hour) in [("Race 2", 14), ("Race 1", 10)] {
        seed_race(
            &pool,
            CreateRace {
                regatta_id: Some(regatta_id),
                name: name.to_string(),
                scheduled_start: Some(Utc.with_ymd_and_hms(2025, 6, 14, hour, 0, 0).unwrap()),
                ..Default::default()
            },
        )
        .await;
    }

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/public/regattas/{regatta_id}/schedule")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["regatta"]["name"], "Harbour Week");
    let races = json["data"]["races"].as_array().unwrap();
    assert_eq!(races.len(), 2);
    assert_eq!(races[0]["name"], "Race 1");
    assert_eq!(races[1]["name"], "Race 2");
    assert_eq!(races[0]["status"], "scheduled");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unpublished_regatta_is_not_found(pool: PgPool) {
    let regatta_id = regatta(&pool, false).await;

    let app = common::build_test_app(pool);
    let response = get(app.clone(), &format!("/api/public/regattas/{regatta_id}/schedule")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(app, &format!("/api/public/regattas/{regatta_id}/notices")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn notices_exclude_unpublished(pool: PgPool) {
    let regatta_id = regatta(&pool, true).await;
    for (title, published) in [("Course change", true), ("Draft protest list", false)] {
        RegattaNoticeRepo::create(
            &pool,
            &CreateRegattaNotice {
                regatta_id,
                title: title.to_string(),
                body: "Details".to_string(),
                category: None,
                is_published: Some(published),
            },
        )
        .await
        .unwrap();
    }

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/public/regattas/{regatta_id}/notices")).await;
    let json = body_json(response).await;

    let notices = json["data"]["notices"].as_array().unwrap();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0]["title"], "Course change");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn shared_strategy_hides_coaches_and_crew(pool: PgPool) {
    let sailor = seed_user(&pool, "sam").await;
    SailorProfileRepo::create(
        &pool,
        &CreateSailorProfile {
            user_id: sailor,
            display_name: "Sam Taylor".to_string(),
            sail_number: Some("GBR 123".to_string()),
            boat_class: None,
        },
    )
    .await
    .unwrap();
    let race_id = seed_race(
        &pool,
        CreateRace {
            name: "Race 1".to_string(),
            ..Default::default()
        },
    )
    .await;
    RacePreparationRepo::upsert(
        &pool,
        race_id,
        sailor,
        &UpsertPreparation {
            upwind_strategy: Some("Tack on the headers".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let app = common::build_test_app(pool);
    let json = body_json(
        post_json_auth(
            app.clone(),
            &format!("/api/v1/races/{race_id}/strategy/public-link"),
            sailor,
            json!({ "enabled": true }),
        )
        .await,
    )
    .await;
    let token = json["data"]["token"].as_str().unwrap().to_string();

    let response = get(app, &format!("/api/public/strategies/{token}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["sailor_name"], "Sam Taylor");
    assert_eq!(data["race"]["name"], "Race 1");
    assert!(data["text"].as_str().unwrap().contains("Upwind: Tack on the headers"));
    assert!(!data["shared_at"].is_null());
    assert!(data.get("coaches").is_none());
    assert!(data.get("crew").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_token_is_not_found(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/public/strategies/not-a-real-token").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}
