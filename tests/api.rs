//! End-to-end tests running real requests through the full router against an
//! in-memory database.
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use gives_back_backend::config::Config;
use gives_back_backend::db::DbConnection;
use gives_back_backend::rest::{self, AppState};

async fn test_app() -> Router {
    let connection = DbConnection::init_test().await.expect("init test db");
    let config = Config {
        database_url: String::new(),
        bind_addr: "127.0.0.1:0".parse().expect("bind addr"),
        allowed_origin: "http://localhost:8080".to_string(),
        session_secret: "test-session-secret".to_string(),
    };
    rest::router(AppState::new(connection, &config))
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("build request")
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("build request")
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("send request");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

async fn create_charity(app: &Router, name: &str) -> String {
    let (status, body) = send(
        app,
        json_request("POST", "/charities", json!({ "name": name })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().expect("charity id").to_string()
}

async fn create_donation(app: &Router, charity_id: &str, amount: Value) -> (StatusCode, Value) {
    send(
        app,
        json_request(
            "POST",
            "/donations",
            json!({
                "donor_name": "John Smith",
                "donor_email": "john@example.com",
                "amount": amount,
                "message": "Congratulations!",
                "charity": charity_id,
            }),
        ),
    )
    .await
}

#[tokio::test]
async fn health_endpoint_responds() {
    let app = test_app().await;
    let response = app
        .oneshot(get_request("/health"))
        .await
        .expect("send request");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn donation_is_created_pending() {
    let app = test_app().await;
    let charity_id = create_charity(&app, "Water Aid").await;

    let (status, body) = create_donation(&app, &charity_id, json!(50)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "pending");
    assert_eq!(body["amount"], "50");
    assert_eq!(body["donor_name"], "John Smith");
    assert_eq!(body["charity"], charity_id);
    assert!(body["user"].is_null());
    assert!(body["id"].as_str().is_some());
}

#[tokio::test]
async fn zero_amount_is_rejected() {
    let app = test_app().await;
    let charity_id = create_charity(&app, "Water Aid").await;

    let (status, body) = create_donation(&app, &charity_id, json!(0)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().is_some());
}

#[tokio::test]
async fn unknown_charity_is_rejected() {
    let app = test_app().await;

    let (status, body) = create_donation(&app, "no-such-charity", json!(10)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().is_some());
}

#[tokio::test]
async fn missing_donation_is_404() {
    let app = test_app().await;
    let (status, body) = send(&app, get_request("/donations/nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().is_some());
}

#[tokio::test]
async fn put_replaces_donation_fields() {
    let app = test_app().await;
    let charity_id = create_charity(&app, "Water Aid").await;
    let (_, created) = create_donation(&app, &charity_id, json!(50)).await;
    let id = created["id"].as_str().expect("id");

    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            &format!("/donations/{id}"),
            json!({
                "donor_name": "Jane Doe",
                "donor_email": "jane@example.com",
                "amount": "75.50",
                "message": "Best wishes",
                "charity": charity_id,
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["donor_name"], "Jane Doe");
    assert_eq!(body["amount"], "75.50");
    assert_eq!(body["status"], "pending");
}

#[tokio::test]
async fn patch_updates_only_given_fields() {
    let app = test_app().await;
    let charity_id = create_charity(&app, "Water Aid").await;
    let (_, created) = create_donation(&app, &charity_id, json!(50)).await;
    let id = created["id"].as_str().expect("id");

    let (status, body) = send(
        &app,
        json_request(
            "PATCH",
            &format!("/donations/{id}"),
            json!({ "message": "Updated note" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Updated note");
    assert_eq!(body["donor_name"], "John Smith");
}

#[tokio::test]
async fn delete_donation_then_404() {
    let app = test_app().await;
    let charity_id = create_charity(&app, "Water Aid").await;
    let (_, created) = create_donation(&app, &charity_id, json!(50)).await;
    let id = created["id"].as_str().expect("id");

    let (status, _) = send(
        &app,
        Request::builder()
            .method("DELETE")
            .uri(format!("/donations/{id}"))
            .body(Body::empty())
            .expect("build request"),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, get_request(&format!("/donations/{id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn confirm_then_fail_is_permitted() {
    let app = test_app().await;
    let charity_id = create_charity(&app, "Water Aid").await;
    let (_, created) = create_donation(&app, &charity_id, json!(50)).await;
    let id = created["id"].as_str().expect("id");

    let (status, body) = send(
        &app,
        json_request("PATCH", &format!("/donations/{id}/confirm"), json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "confirmed");

    // The admin can still flip a confirmed donation to failed.
    let (status, body) = send(
        &app,
        json_request("PATCH", &format!("/donations/{id}/fail"), json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "failed");
}

#[tokio::test]
async fn analytics_splits_confirmed_total() {
    let app = test_app().await;
    let charity_id = create_charity(&app, "Test Charity").await;

    for amount in [json!(30), json!(20)] {
        let (_, created) = create_donation(&app, &charity_id, amount).await;
        let id = created["id"].as_str().expect("id");
        let (status, _) = send(
            &app,
            json_request("PATCH", &format!("/donations/{id}/confirm"), json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    // A pending donation must not show up in the totals.
    create_donation(&app, &charity_id, json!(999)).await;

    let (status, body) = send(&app, get_request("/analytics")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_amount"], "50");
    assert_eq!(body["charity_amount"], "25.0");
    assert_eq!(body["couple_amount"], "25.0");
    assert_eq!(body["donations_count"], 2);

    let per_charity = body["count_per_charity"].as_array().expect("breakdown");
    assert_eq!(per_charity.len(), 1);
    assert_eq!(per_charity[0]["charity_name"], "Test Charity");
    assert_eq!(per_charity[0]["count"], 2);
    assert_eq!(per_charity[0]["total_allocated"], "25.0");
}

#[tokio::test]
async fn charts_endpoint_returns_png() {
    let app = test_app().await;

    let response = app
        .oneshot(get_request("/charts"))
        .await
        .expect("send request");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok()),
        Some("image/png")
    );
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    assert_eq!(&bytes[..4], &[0x89, b'P', b'N', b'G']);
}

#[tokio::test]
async fn register_then_login() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/register",
            json!({ "username": "admin", "password": "hunter2hunter2" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["username"], "admin");

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/login",
            json!({ "username": "admin", "password": "hunter2hunter2" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successful");
}

#[tokio::test]
async fn login_sets_session_cookie() {
    let app = test_app().await;
    send(
        &app,
        json_request(
            "POST",
            "/register",
            json!({ "username": "admin", "password": "hunter2hunter2" }),
        ),
    )
    .await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/login",
            json!({ "username": "admin", "password": "hunter2hunter2" }),
        ))
        .await
        .expect("send request");

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .expect("set-cookie header");
    assert!(cookie.starts_with("session_token="));
    assert!(cookie.contains("HttpOnly"));
}

#[tokio::test]
async fn bad_credentials_are_rejected() {
    let app = test_app().await;
    send(
        &app,
        json_request(
            "POST",
            "/register",
            json!({ "username": "admin", "password": "hunter2hunter2" }),
        ),
    )
    .await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/login",
            json!({ "username": "admin", "password": "wrong-password" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().is_some());
}

#[tokio::test]
async fn get_login_is_method_not_allowed() {
    let app = test_app().await;
    let (status, _) = send(&app, get_request("/login")).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn authenticated_donation_records_user() {
    let app = test_app().await;
    let charity_id = create_charity(&app, "Water Aid").await;

    let (_, admin) = send(
        &app,
        json_request(
            "POST",
            "/register",
            json!({ "username": "admin", "password": "hunter2hunter2" }),
        ),
    )
    .await;
    let admin_id = admin["id"].as_str().expect("admin id");

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/login",
            json!({ "username": "admin", "password": "hunter2hunter2" }),
        ))
        .await
        .expect("send request");
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .expect("set-cookie header");
    let token = cookie
        .trim_start_matches("session_token=")
        .split(';')
        .next()
        .expect("token");

    let (status, body) = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/donations")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::from(
                json!({
                    "donor_name": "John Smith",
                    "donor_email": "john@example.com",
                    "amount": 50,
                    "charity": charity_id,
                })
                .to_string(),
            ))
            .expect("build request"),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"], admin_id);
}
