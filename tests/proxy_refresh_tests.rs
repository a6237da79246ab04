// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Refresh-and-retry tests for the proxy route.
//!
//! A 401 from the backend triggers at most one refresh and one retry;
//! a failed or impossible refresh clears the session.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{body_json, header as header_eq, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

const OLD_SESSION: &str =
    "access_token=old-access; refresh_token=old-refresh; token_type=Bearer; token_exp=1; refresh_exp=2";

#[tokio::test]
async fn test_refresh_then_retry_with_new_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orders"))
        .and(header_eq("authorization", "Bearer old-access"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "expired" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .and(header_eq("version", "1"))
        .and(header_eq("branch", "ISFAHAN"))
        .and(body_json(json!({ "refresh_token": "old-refresh" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(common::token_payload("new-access", "new-refresh")),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/orders"))
        .and(header_eq("authorization", "Bearer new-access"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": ["o-1"] })))
        .expect(1)
        .mount(&server)
        .await;

    let (app, _) = common::create_test_app(&server.uri());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/proxy/orders")
                .header(header::COOKIE, OLD_SESSION)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let set_cookies = common::set_cookie_headers(&response);
    let expected = [
        ("access_token", "new-access"),
        ("refresh_token", "new-refresh"),
        ("token_type", "Bearer"),
        ("token_exp", "1767225600"),
        ("refresh_exp", "1767830400"),
    ];
    for (name, value) in expected {
        let cookie = common::find_cookie(&set_cookies, name);
        assert_eq!(common::cookie_value(&cookie), value);
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Path=/"));
    }

    assert_eq!(common::body_json(response).await, json!({ "data": ["o-1"] }));
    // Call counts are verified by the mock expectations when `server` drops.
}

#[tokio::test]
async fn test_retry_replays_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/orders"))
        .and(header_eq("authorization", "Bearer old-access"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": common::token_payload("new-access", "new-refresh")
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/orders"))
        .and(header_eq("authorization", "Bearer new-access"))
        .and(body_json(json!({ "customer_id": 5, "items": [1, 2] })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 99 })))
        .expect(1)
        .mount(&server)
        .await;

    let (app, _) = common::create_test_app(&server.uri());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/proxy/orders")
                .header(header::COOKIE, OLD_SESSION)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"customer_id":5,"items":[1,2]}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(common::body_json(response).await, json!({ "id": 99 }));
}

#[tokio::test]
async fn test_retry_replays_multipart_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/invoices/upload"))
        .and(header_eq("authorization", "Bearer old-access"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(common::token_payload("new-access", "new-refresh")),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/invoices/upload"))
        .and(header_eq("authorization", "Bearer new-access"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "uploaded": 1 })))
        .expect(1)
        .mount(&server)
        .await;

    let (app, _) = common::create_test_app(&server.uri());

    let body = "--XBOUNDARY\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"receipt.txt\"\r\n\
         Content-Type: text/plain\r\n\r\n\
         HELLO\r\n\
         --XBOUNDARY--\r\n";

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/proxy/invoices/upload")
                .header(header::COOKIE, OLD_SESSION)
                .header(header::CONTENT_TYPE, "multipart/form-data; boundary=XBOUNDARY")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(common::body_json(response).await, json!({ "uploaded": 1 }));

    let uploads: Vec<_> = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.url.path() == "/invoices/upload")
        .collect();
    assert_eq!(uploads.len(), 2);
    for upload in &uploads {
        let forwarded = String::from_utf8_lossy(&upload.body).to_string();
        assert!(forwarded.contains("filename=\"receipt.txt\""));
        assert!(forwarded.contains("HELLO"));
    }
}

#[tokio::test]
async fn test_failed_refresh_clears_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wallets"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({ "message": "revoked" })))
        .expect(1)
        .mount(&server)
        .await;

    let (app, _) = common::create_test_app(&server.uri());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/proxy/wallets")
                .header(header::COOKIE, OLD_SESSION)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let set_cookies = common::set_cookie_headers(&response);
    for name in common::SESSION_COOKIES {
        let cookie = common::find_cookie(&set_cookies, name);
        assert_eq!(common::cookie_value(&cookie), "");
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Path=/"));
    }

    assert_eq!(
        common::body_json(response).await,
        json!({ "message": "احراز هویت نامعتبر است" })
    );
}

#[tokio::test]
async fn test_no_refresh_token_clears_session_without_refresh_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/customers"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (app, _) = common::create_test_app(&server.uri());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/proxy/customers")
                .header(header::COOKIE, "access_token=stale")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let set_cookies = common::set_cookie_headers(&response);
    for name in common::SESSION_COOKIES {
        assert!(common::find_cookie(&set_cookies, name).contains("Max-Age=0"));
    }

    assert_eq!(
        common::body_json(response).await,
        json!({ "message": "احراز هویت نامعتبر است" })
    );
}

#[tokio::test]
async fn test_second_401_is_not_retried_again() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/invoices"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "denied" })))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(common::token_payload("new-access", "new-refresh")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (app, _) = common::create_test_app(&server.uri());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/proxy/invoices")
                .header(header::COOKIE, OLD_SESSION)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // The refreshed tokens are still stored.
    let set_cookies = common::set_cookie_headers(&response);
    assert_eq!(
        common::cookie_value(&common::find_cookie(&set_cookies, "access_token")),
        "new-access"
    );

    assert_eq!(
        common::body_json(response).await,
        json!({ "message": "denied" })
    );
}

#[tokio::test]
async fn test_unreadable_refresh_payload_clears_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    let (app, _) = common::create_test_app(&server.uri());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/proxy/orders")
                .header(header::COOKIE, OLD_SESSION)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let set_cookies = common::set_cookie_headers(&response);
    assert!(common::find_cookie(&set_cookies, "refresh_token").contains("Max-Age=0"));
}
