//! Integration tests for the web service

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use knowlift_domain::{Interval, RawAnswer};
use knowlift_web::{
    app_state, init_database,
    config::WebConfig,
    handlers::{create_router, ErrorResponse, HealthCheckResponse, PlayResponse},
};
use serde_json::Value;
use tower::ServiceExt; // for oneshot

fn create_test_app() -> Router {
    create_router(app_state(&WebConfig::default_test_config()).unwrap())
}

fn form_encode(value: &str) -> String {
    let mut encoded = String::new();
    for byte in value.bytes() {
        if byte.is_ascii_alphanumeric() || b"-_.~".contains(&byte) {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{:02X}", byte));
        }
    }
    encoded
}

fn form_post(uri: &str, fields: &[(&str, &str)]) -> Request<Body> {
    let body = fields
        .iter()
        .map(|(k, v)| format!("{}={}", k, form_encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

async fn play(app: &Router, level: &str) -> PlayResponse {
    let response = app
        .clone()
        .oneshot(form_post("/play", &[("level", level)]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

fn answer_data(interval: &Interval, correct: bool) -> String {
    let count = interval.count().unwrap();
    let answer = if correct { count } else { count + 1 };
    let payload = interval.clone().into_payload(RawAnswer::Integer(answer));
    serde_json::to_string(&payload).unwrap()
}

async fn submit(app: &Router, data: &str, session: Option<&str>) -> (StatusCode, Value) {
    let mut fields = vec![("data", data)];
    if let Some(token) = session {
        fields.push(("session", token));
    }

    let response = app
        .clone()
        .oneshot(form_post("/result", &fields))
        .await
        .unwrap();
    let status = response.status();
    (status, serde_json::from_slice(&body_bytes(response).await).unwrap())
}

#[tokio::test]
async fn test_static_pages() {
    let app = create_test_app();

    for (uri, marker) in [
        ("/", "Knowlift"),
        ("/about", "About"),
        ("/grade", "Choose a grade"),
        ("/ladder", "Coming soon"),
        ("/legal", "Legal"),
    ] {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{}", uri);

        let page = String::from_utf8(body_bytes(response).await).unwrap();
        assert!(page.contains(marker), "{} should contain {}", uri, marker);
    }
}

#[tokio::test]
async fn test_health_check_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = WebConfig::default_test_config();
    config.database = dir.path().join("knowlift.db");
    init_database(&config).unwrap();
    let app = create_router(app_state(&config).unwrap());

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let health: HealthCheckResponse =
        serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(health.status, "healthy");
    assert!(health.database);
    assert_eq!(health.tier_count, 11);
}

#[tokio::test]
async fn test_health_check_unreachable_database() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = WebConfig::default_test_config();
    config.database = dir.path().join("missing").join("knowlift.db");
    let app = create_router(app_state(&config).unwrap());

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let health: HealthCheckResponse =
        serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(health.status, "degraded");
    assert!(!health.database);
}

#[tokio::test]
async fn test_health_check_does_not_recreate_deleted_database() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = WebConfig::default_test_config();
    config.database = dir.path().join("knowlift.db");
    init_database(&config).unwrap();
    std::fs::remove_file(&config.database).unwrap();
    let app = create_router(app_state(&config).unwrap());

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();

    let health: HealthCheckResponse =
        serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(health.status, "degraded");
    assert!(!config.database.exists());
}

#[tokio::test]
async fn test_play_returns_round_for_level() {
    let app = create_test_app();

    let round = play(&app, "4").await;
    assert_eq!(round.level, 4);
    assert_eq!(round.label, "normal");
    assert_eq!(round.interval.game_level, 4);
    assert!(round.interval.start_internal < round.interval.stop_internal);
    assert!(round.interval.start_internal >= 0);
    assert!(round.interval.stop_internal <= 99_999);
}

#[tokio::test]
async fn test_play_accepts_padded_level() {
    let app = create_test_app();
    let round = play(&app, " 10 ").await;
    assert_eq!(round.label, "impossible");
}

#[tokio::test]
async fn test_play_missing_level_redirects() {
    let app = create_test_app();

    let response = app.oneshot(form_post("/play", &[])).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()["location"], "/grade");
}

#[tokio::test]
async fn test_play_invalid_level() {
    let app = create_test_app();

    for level in ["11", "-1", "easy", "1.5"] {
        let response = app
            .clone()
            .oneshot(form_post("/play", &[("level", level)]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let error: ErrorResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(error.error, format!("Unable to use: {} as a game level.", level));
    }
}

#[tokio::test]
async fn test_result_correct_answer() {
    let app = create_test_app();
    let round = play(&app, "0").await;

    let (status, body) = submit(&app, &answer_data(&round.interval, true), None).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(body["result"]["outcome"], true);
    assert_eq!(
        body["result"]["cpu_internal"].as_i64(),
        round.interval.count()
    );
    assert_eq!(body["statistics"]["correct_percentage"], 100.0);
    assert_eq!(body["statistics"]["incorrect_percentage"], 0.0);
    assert_eq!(body["next_level"], 0);
    assert_eq!(body["answers"]["total_correct"], 1);
    assert!(body["session"].as_str().is_some_and(|t| !t.is_empty()));
}

#[tokio::test]
async fn test_result_wrong_answer() {
    let app = create_test_app();
    let round = play(&app, "3").await;

    let (status, body) = submit(&app, &answer_data(&round.interval, false), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["outcome"], false);
    assert_eq!(body["statistics"]["incorrect_percentage"], 100.0);
    assert_eq!(body["answers"]["total_incorrect"], 1);
}

#[tokio::test]
async fn test_session_window_raises_level() {
    let app = create_test_app();
    let mut token: Option<String> = None;
    let mut level = "2".to_string();

    for answered in 1..=10 {
        let round = play(&app, &level).await;
        let (status, body) =
            submit(&app, &answer_data(&round.interval, true), token.as_deref()).await;
        assert_eq!(status, StatusCode::OK);

        let next = body["next_level"].as_u64().unwrap();
        if answered < 10 {
            assert_eq!(next, 2);
        } else {
            assert_eq!(next, 3);
            assert_eq!(body["answers"]["correct_answers"], 0);
        }
        assert_eq!(body["answers"]["total_correct"], answered);

        level = next.to_string();
        token = body["session"].as_str().map(str::to_string);
    }
}

#[tokio::test]
async fn test_session_accumulates_statistics() {
    let app = create_test_app();
    let mut token: Option<String> = None;

    for correct in [true, true, true, false] {
        let round = play(&app, "1").await;
        let data = answer_data(&round.interval, correct);
        let (_, body) = submit(&app, &data, token.as_deref()).await;
        token = body["session"].as_str().map(str::to_string);

        if !correct {
            assert_eq!(body["statistics"]["incorrect_percentage"], 25.0);
            assert_eq!(body["statistics"]["correct_percentage"], 75.0);
        }
    }
}

#[tokio::test]
async fn test_tampered_session_starts_fresh() {
    let app = create_test_app();
    let round = play(&app, "0").await;

    let (status, body) = submit(
        &app,
        &answer_data(&round.interval, true),
        Some("not.a.token"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["answers"]["total_correct"], 1);
    assert_eq!(body["answers"]["total_incorrect"], 0);
}

#[tokio::test]
async fn test_result_rejects_bad_data() {
    let app = create_test_app();
    let round = play(&app, "0").await;

    let mut tampered: Value = serde_json::from_str(&answer_data(&round.interval, true)).unwrap();
    tampered["start_representation"] = Value::from("banana");
    let tampered = tampered.to_string();

    let mut missing_answer: Value =
        serde_json::from_str(&answer_data(&round.interval, true)).unwrap();
    missing_answer.as_object_mut().unwrap().remove("answer");
    let missing_answer = missing_answer.to_string();

    for data in ["", "not json", "{}", tampered.as_str(), missing_answer.as_str()] {
        let (status, body) = submit(&app, data, None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{}", data);
        assert_eq!(
            body["error"],
            format!("Unable to generate results from {}.", data)
        );
    }
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = create_test_app();

    let request = Request::builder()
        .uri("/does/not/exist")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let error: ErrorResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert!(error.error.contains("/does/not/exist"));
}
