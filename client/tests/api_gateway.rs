//! API gateway tests against a stubbed HTTP server.
//!
//! Exercises the request pipeline end to end: header merging, bearer
//! injection, query serialization, envelope unwrapping, and error
//! normalization for each failure class.

#![allow(clippy::unwrap_used)]

use skillsphere_client::api::{ApiClient, ApiError, CourseQuery, LoginRequest, StorefrontApi};
use skillsphere_client::config::ApiConfig;
use skillsphere_client::session::SessionStore;
use skillsphere_client::types::{Session, User};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, sessions: Arc<SessionStore>) -> ApiClient {
    let config = ApiConfig {
        base_url: server.uri(),
        request_timeout: 5,
    };
    ApiClient::new(&config, sessions).unwrap()
}

fn signed_in_sessions(token: &str) -> Arc<SessionStore> {
    let sessions = SessionStore::in_memory();
    sessions.save(Session {
        user: User {
            id: "u1".to_string(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            role: "student".to_string(),
            last_login_at: "2025-01-01T00:00:00Z".to_string(),
        },
        token: token.to_string(),
    });
    Arc::new(sessions)
}

fn user_json() -> serde_json::Value {
    json!({
        "id": "u1",
        "name": "Ada",
        "email": "ada@example.com",
        "role": "student",
        "lastLoginAt": "2025-01-01T00:00:00Z"
    })
}

#[tokio::test]
async fn bearer_token_is_attached_when_session_held() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("Authorization", "Bearer tok-123"))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "ok",
            "data": user_json()
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, signed_in_sessions("tok-123"));
    let user = client.me().await.unwrap();
    assert_eq!(user.email, "ada@example.com");
}

#[tokio::test]
async fn no_authorization_header_without_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/courses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "ok",
            "data": {
                "courses": [],
                "pagination": {
                    "currentPage": 1,
                    "totalPages": 1,
                    "totalCourses": 0,
                    "hasNext": false,
                    "hasPrev": false
                }
            }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(SessionStore::in_memory()));
    client.courses(CourseQuery::new()).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("authorization"));
}

#[tokio::test]
async fn paging_query_serializes_exactly_page_and_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/courses"))
        .and(query_param("page", "2"))
        .and(query_param("limit", "12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "ok",
            "data": {
                "courses": [],
                "pagination": {
                    "currentPage": 2,
                    "totalPages": 2,
                    "totalCourses": 13,
                    "hasNext": false,
                    "hasPrev": true
                }
            }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(SessionStore::in_memory()));
    let page = client
        .courses(CourseQuery::new().page(2).limit(12))
        .await
        .unwrap();
    assert_eq!(page.pagination.current_page, 2);

    // No other parameters when no filters are set
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), Some("page=2&limit=12"));
}

#[tokio::test]
async fn purchased_courses_carry_paging_and_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/courses/purchased/all"))
        .and(query_param("page", "1"))
        .and(query_param("limit", "12"))
        .and(header("Authorization", "Bearer tok-9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "ok",
            "data": {
                "courses": [],
                "pagination": {
                    "currentPage": 1,
                    "totalPages": 1,
                    "totalCourses": 0,
                    "hasNext": false,
                    "hasPrev": false
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, signed_in_sessions("tok-9"));
    client.purchased_courses(1, 12).await.unwrap();
}

#[tokio::test]
async fn failed_envelope_surfaces_its_message_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "Invalid credentials",
            "data": null
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(SessionStore::in_memory()));
    let error = client
        .login(LoginRequest {
            email: "ada@example.com".to_string(),
            password: "nope-nope".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(error.to_string(), "Invalid credentials");
}

#[tokio::test]
async fn non_2xx_with_envelope_uses_envelope_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "success": false,
            "message": "Token expired",
            "data": null
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, signed_in_sessions("stale"));
    let error = client.me().await.unwrap_err();

    assert_eq!(error.to_string(), "Token expired");
    assert!(matches!(error, ApiError::Api { status: Some(401), .. }));
}

#[tokio::test]
async fn non_2xx_without_envelope_falls_back_to_status_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/public/courses/c-404"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(SessionStore::in_memory()));
    let error = client.course_detail("c-404".into()).await.unwrap_err();

    assert_eq!(error.to_string(), "HTTP error! status: 503");
}

#[tokio::test]
async fn malformed_success_body_is_a_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = client_for(&server, signed_in_sessions("tok"));
    let error = client.me().await.unwrap_err();
    assert!(matches!(error, ApiError::Parse(_)));
    assert!(error.to_string().starts_with("Response parsing failed:"));
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let sessions = Arc::new(SessionStore::in_memory());
    let config = ApiConfig {
        // Nothing listens here; connection is refused immediately
        base_url: "http://127.0.0.1:1".to_string(),
        request_timeout: 2,
    };
    let client = ApiClient::new(&config, sessions).unwrap();

    let error = client.me().await.unwrap_err();
    assert!(matches!(error, ApiError::Transport(_)));
    assert!(error.to_string().starts_with("Request failed:"));
}

#[tokio::test]
async fn register_acknowledges_success_envelope() {
    use skillsphere_client::api::RegisterRequest;

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "message": "Account created",
            "timestamp": "2025-06-01T00:00:00Z"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(SessionStore::in_memory()));
    let result = client
        .register(RegisterRequest {
            name: "Grace".to_string(),
            email: "grace@example.com".to_string(),
            password: "hunter22".to_string(),
            role: "professor".to_string(),
        })
        .await;
    assert!(result.is_ok());
}
