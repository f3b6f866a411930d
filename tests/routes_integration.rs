//! HTTP surface tests: routing, status codes, and JSON bodies for the main
//! endpoints, driven through the router with an in-memory repository.

mod support;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use support::*;
use tower::ServiceExt;

use tavola::db::repository::FullRepository;
use tavola::http::{create_router, AppState};

fn router_for(fixture: &Fixture) -> axum::Router {
    let repo = fixture.repo.clone() as std::sync::Arc<dyn FullRepository>;
    create_router(AppState::new(repo))
}

/// A Monday at least a year out, so "today" checks never interfere.
fn future_monday() -> NaiveDate {
    let mut date = chrono::Utc::now().date_naive() + Duration::days(365);
    while date.weekday() != Weekday::Mon {
        date += Duration::days(1);
    }
    date
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_endpoint_reports_connected() {
    let fixture = evening_service().await;
    let app = router_for(&fixture);

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["database"], "connected");
}

#[tokio::test]
async fn weekly_template_endpoint_returns_seven_days() {
    let fixture = evening_service().await;
    let app = router_for(&fixture);

    let uri = format!(
        "/v1/service-versions/{}/weekly-template",
        fixture.version.id
    );
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["days"].as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn slots_endpoint_returns_computed_slots() {
    let fixture = evening_service().await;
    let app = router_for(&fixture);

    let uri = format!(
        "/v1/service-versions/{}/slots?date={}",
        fixture.version.id,
        monday()
    );
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["total"], 2);
    assert_eq!(json["slots"][0]["start"], "2026-08-10T18:00:00");
    assert_eq!(json["slots"][0]["available"], 20);
}

#[tokio::test]
async fn unknown_service_version_maps_to_404() {
    let fixture = evening_service().await;
    let app = router_for(&fixture);

    let uri = format!("/v1/service-versions/404/slots?date={}", monday());
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn validate_reservation_endpoint_round_trips() {
    let fixture = evening_service().await;
    let app = router_for(&fixture);

    let body = serde_json::json!({
        "date": future_monday(),
        "time": "18:30:00",
        "party_size": 4,
    });
    let uri = format!(
        "/v1/service-versions/{}/validate-reservation",
        fixture.version.id
    );
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["valid"], true);
}

#[tokio::test]
async fn booking_endpoint_books_and_decrements_capacity() {
    let fixture = evening_service().await;
    let app = router_for(&fixture);

    let date = future_monday();
    let body = serde_json::json!({
        "date": date,
        "time": "18:30:00",
        "party_size": 4,
    });
    let uri = format!("/v1/service-versions/{}/reservations", fixture.version.id);
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["outcome"], "booked");

    let uri = format!(
        "/v1/service-versions/{}/slots?date={}",
        fixture.version.id, date
    );
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["slots"][0]["available"], 16);
}

#[tokio::test]
async fn invalid_slot_policy_maps_to_400() {
    let fixture = evening_service().await;
    let app = router_for(&fixture);

    let body = serde_json::json!({
        "actor_id": 99,
        "slot_duration_minutes": 0,
        "buffer_minutes": 0,
        "capacity_per_slot": 10,
        "daily_start": null,
        "daily_end": null,
    });
    let uri = format!("/v1/service-versions/{}/slot-policy", fixture.version.id);
    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn template_day_update_accepts_weekday_names() {
    let fixture = evening_service().await;
    let app = router_for(&fixture);

    let body = serde_json::json!({
        "actor_id": 99,
        "closed": false,
        "opening_time": "12:00:00",
        "closing_time": "15:00:00",
        "break_start": null,
        "break_end": null,
    });
    let uri = format!(
        "/v1/service-versions/{}/weekly-template/wednesday",
        fixture.version.id
    );
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let uri = format!(
        "/v1/service-versions/{}/weekly-template/someday",
        fixture.version.id
    );
    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "actor_id": 99,
                        "closed": true,
                        "opening_time": null,
                        "closing_time": null,
                        "break_start": null,
                        "break_end": null,
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deleting_unknown_exception_maps_to_404() {
    let fixture = evening_service().await;
    let app = router_for(&fixture);

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/v1/exceptions/404?actor_id=99")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
