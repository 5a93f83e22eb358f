use super::common::*;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::portal::router::portal_router;
use crate::portal::service::AuthService;

fn post_json(uri: &str, body: &Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::post(uri).header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(serde_json::to_vec(body).expect("encode")))
        .expect("request")
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::get(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).expect("request")
}

async fn signed_in() -> (Router, String) {
    let service = instant_service();
    let grant = service.login(&demo_credentials()).await.expect("login");
    (portal_router(service), grant.token)
}

#[tokio::test]
async fn login_route_distinguishes_schema_and_credential_failures() {
    let router = portal_router(instant_service());

    let response = router
        .clone()
        .oneshot(post_json(
            "/api/auth/login",
            &json!({ "email": "user@example.com", "password": "password" }),
            None,
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["user"]["firstName"], "John");

    let response = router
        .clone()
        .oneshot(post_json(
            "/api/auth/login",
            &json!({ "email": "user@example.com", "password": "wrongpass" }),
            None,
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        read_json_body(response).await["error"],
        "Invalid email or password"
    );

    let response = router
        .oneshot(post_json(
            "/api/auth/login",
            &json!({ "email": "nope", "password": "123" }),
            None,
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert_eq!(body["fields"]["email"], "Please enter a valid email address");
    assert_eq!(body["fields"]["password"], "Password must be at least 6 characters");
}

#[tokio::test]
async fn register_route_reports_password_mismatch() {
    let router = portal_router(instant_service());
    let mut data = json!({
        "firstName": "Grace",
        "lastName": "Hopper",
        "email": "grace@example.com",
        "password": "cobol59",
        "confirmPassword": "cobol60",
    });

    let response = router
        .clone()
        .oneshot(post_json("/api/auth/register", &data, None))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        read_json_body(response).await["fields"]["confirmPassword"],
        "Passwords don't match"
    );

    data["confirmPassword"] = json!("cobol59");
    let response = router
        .oneshot(post_json("/api/auth/register", &data, None))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(read_json_body(response).await["token"]
        .as_str()
        .is_some_and(|token| token.starts_with("mock-jwt-token-")));
}

#[tokio::test]
async fn me_route_requires_a_known_bearer_token() {
    let (router, token) = signed_in().await;

    let response = router
        .clone()
        .oneshot(get("/api/auth/me", Some(&token)))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json_body(response).await["email"], "user@example.com");

    let response = router
        .clone()
        .oneshot(get("/api/auth/me", None))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = router
        .oneshot(get("/api/auth/me", Some("forged")))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn authorization_scheme_is_case_insensitive() {
    let (router, token) = signed_in().await;

    for scheme in ["bearer", "BEARER", "BeArEr"] {
        let request = Request::get("/api/auth/me")
            .header(header::AUTHORIZATION, format!("{scheme} {token}"))
            .body(Body::empty())
            .expect("request");
        let response = router.clone().oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK, "scheme {scheme}");
    }

    let request = Request::get("/api/auth/me")
        .header(header::AUTHORIZATION, format!("Basic {token}"))
        .body(Body::empty())
        .expect("request");
    let response = router.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn catalog_routes_apply_filters() {
    let router = portal_router(instant_service());

    let response = router
        .clone()
        .oneshot(get("/api/roles?search=design", None))
        .await
        .expect("response");
    let roles = read_json_body(response).await;
    assert_eq!(roles.as_array().map(Vec::len), Some(1));
    assert_eq!(roles[0]["id"], "ui-ux-design");

    let response = router
        .clone()
        .oneshot(get(
            "/api/internships?role=software-development&location_type=remote",
            None,
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let listings = read_json_body(response).await;
    let listings = listings.as_array().expect("array");
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0]["company"], "CloudScale Systems");

    let response = router
        .clone()
        .oneshot(get("/api/internships?search=figma", None))
        .await
        .expect("response");
    let listings = read_json_body(response).await;
    assert_eq!(listings[0]["id"], "4");

    let response = router
        .oneshot(get("/api/internships?location_type=orbital", None))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn internship_detail_route_returns_not_found() {
    let router = portal_router(instant_service());

    let response = router
        .clone()
        .oneshot(get("/api/internships/5", None))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json_body(response).await["locationType"], "Remote");

    let response = router
        .oneshot(get("/api/internships/404", None))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn application_route_requires_auth_and_valid_payload() {
    let (router, token) = signed_in().await;
    let payload = serde_json::to_value(linked_submission("2")).expect("encode");

    let response = router
        .clone()
        .oneshot(post_json("/api/applications", &payload, None))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let mut unaccepted = payload.clone();
    unaccepted["termsAccepted"] = json!(false);
    let response = router
        .clone()
        .oneshot(post_json("/api/applications", &unaccepted, Some(&token)))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        read_json_body(response).await["fields"]["termsAccepted"],
        "You must accept the terms and conditions"
    );

    let mut broken_link = payload.clone();
    broken_link["resume"] = json!({ "kind": "link", "url": "not a url" });
    let response = router
        .clone()
        .oneshot(post_json("/api/applications", &broken_link, Some(&token)))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = router
        .oneshot(post_json("/api/applications", &payload, Some(&token)))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json_body(response).await;
    assert_eq!(body["success"], true);
    assert!(body["data"]["applicationId"]
        .as_str()
        .is_some_and(|id| id.starts_with("app-")));
}
