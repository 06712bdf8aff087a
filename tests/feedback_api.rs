//! End-to-end tests for the feedback endpoints.

use feedback_sdk::{FeedbackClient, FeedbackEntry, NewFeedback, SubmitOutcome};
use reqwest::StatusCode;
use serde_json::{json, Value};

mod common;

fn created(outcome: SubmitOutcome) -> feedback_sdk::SubmittedFeedback {
    match outcome {
        SubmitOutcome::Created(body) => body,
        other => panic!("expected 201, got {:?}", other),
    }
}

#[tokio::test]
async fn created_feedback_can_be_read_back() {
    let server = common::spawn_server(|_| {}).await;
    let client = FeedbackClient::new(&server.base_url());

    let body = created(
        client
            .submit(&NewFeedback::new("a@b.com", 5, "Great!", "bot-1"))
            .await
            .unwrap(),
    );
    assert_eq!(body.email, "a@b.com");
    assert_eq!(body.rating, 5);
    assert_eq!(body.message, "Great!");
    assert_eq!(body.agent, "bot-1");

    let fetched = client.get(body.id).await.unwrap().unwrap();
    assert_eq!(
        fetched,
        FeedbackEntry {
            email: "a@b.com".into(),
            rating: 5,
            message: "Great!".into(),
            agent: "bot-1".into(),
        }
    );
}

#[tokio::test]
async fn submissions_are_normalized_before_storage() {
    let server = common::spawn_server(|_| {}).await;
    let client = FeedbackClient::new(&server.base_url());

    let mut submission = NewFeedback::new("Jane.Doe+promo@GMail.com", 0, "  slow checkout \n", " web ");
    submission.rating = json!("4");

    let body = created(client.submit(&submission).await.unwrap());
    assert_eq!(body.email, "janedoe@gmail.com");
    assert_eq!(body.rating, 4);
    assert_eq!(body.message, "slow checkout");
    assert_eq!(body.agent, "web");

    let stored = client.get(body.id).await.unwrap().unwrap();
    assert_eq!(stored.email, body.email);
    assert_eq!(stored.message, body.message);
}

#[tokio::test]
async fn invalid_submissions_are_rejected_without_writing() {
    let server = common::spawn_server(|_| {}).await;
    let client = FeedbackClient::new(&server.base_url());

    created(client.submit(&NewFeedback::new("ok@example.com", 3, "fine", "a")).await.unwrap());

    let cases = [
        (NewFeedback::new("ok@example.com", 0, "m", "a"), vec!["rating"]),
        (NewFeedback::new("ok@example.com", 6, "m", "a"), vec!["rating"]),
        (NewFeedback::new("not-an-email", 3, "m", "a"), vec!["email"]),
        (NewFeedback::new("bad", 42, &"x".repeat(1001), "a"), vec!["email", "rating", "message"]),
    ];

    for (submission, expected) in cases {
        match client.submit(&submission).await.unwrap() {
            SubmitOutcome::Invalid(errors) => {
                let paths: Vec<_> = errors.iter().map(|e| e["path"].as_str().unwrap()).collect();
                assert_eq!(paths, expected);
                assert!(errors.iter().all(|e| e["location"] == "body"));
            }
            other => panic!("expected 400, got {:?}", other),
        }
    }

    assert_eq!(client.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn missing_agent_is_a_validation_error() {
    let server = common::spawn_server(|_| {}).await;
    let http = common::http_client();

    let res = http
        .post(server.url("/feedback"))
        .json(&json!({ "email": "a@b.com", "rating": 5, "message": "hi", "agent": null }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["errors"][0]["path"], "agent");
    assert_eq!(body["errors"][0]["type"], "field");
}

#[tokio::test]
async fn repeated_reads_are_identical() {
    let server = common::spawn_server(|_| {}).await;
    let client = FeedbackClient::new(&server.base_url());

    let id = created(client.submit(&NewFeedback::new("r@e.ad", 2, "again", "x")).await.unwrap()).id;

    let first = client.get(id).await.unwrap();
    let second = client.get(id).await.unwrap();
    assert!(first.is_some());
    assert_eq!(first, second);
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let server = common::spawn_server(|_| {}).await;
    let http = common::http_client();

    for path in ["/feedback/1", "/feedback/999999", "/feedback/-1", "/feedback/abc"] {
        let res = http.get(server.url(path)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "{path}");
        let body: Value = res.json().await.unwrap();
        assert_eq!(body, json!({ "error": "Feedback not found" }));
    }
}

#[tokio::test]
async fn list_returns_rows_in_order_without_ids() {
    let server = common::spawn_server(|_| {}).await;
    let client = FeedbackClient::new(&server.base_url());
    let http = common::http_client();

    for rating in 1..=3 {
        created(client.submit(&NewFeedback::new("l@ist.io", rating, "m", "a")).await.unwrap());
    }

    let body: Value = http.get(server.url("/feedback")).send().await.unwrap().json().await.unwrap();
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 3);
    for (i, row) in rows.iter().enumerate() {
        assert_eq!(row["rating"], json!(i + 1));
        let mut keys: Vec<_> = row.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["agent", "email", "message", "rating"]);
    }
}

#[tokio::test]
async fn urlencoded_forms_are_accepted() {
    let server = common::spawn_server(|_| {}).await;
    let http = common::http_client();

    let res = http
        .post(server.url("/feedback"))
        .form(&[("email", "form@post.org"), ("rating", "2"), ("message", "via form"), ("agent", "html")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["rating"], 2);
    assert!(body["id"].is_i64());
}

#[tokio::test]
async fn malformed_and_oversized_bodies_are_refused() {
    let server = common::spawn_server(|config| config.security.max_body_size = 256).await;
    let http = common::http_client();

    let res = http
        .post(server.url("/feedback"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await.unwrap(), json!({ "error": "Malformed payload" }));

    let res = http
        .post(server.url("/feedback"))
        .json(&json!([1, 2, 3]))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = http
        .post(server.url("/feedback"))
        .json(&json!({ "email": "a@b.com", "rating": 1, "message": "x".repeat(1024), "agent": "a" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(res.json::<Value>().await.unwrap(), json!({ "error": "Payload too large" }));

    let long = "y".repeat(1024);
    let res = http
        .post(server.url("/feedback"))
        .form(&[("email", "a@b.com"), ("rating", "1"), ("message", long.as_str()), ("agent", "a")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(res.json::<Value>().await.unwrap(), json!({ "error": "Payload too large" }));
}

#[tokio::test]
async fn cross_origin_requests_are_allowed() {
    let server = common::spawn_server(|_| {}).await;
    let http = common::http_client();

    let res = http
        .request(reqwest::Method::OPTIONS, server.url("/feedback"))
        .header("origin", "https://elsewhere.example")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["access-control-allow-origin"], "*");
    let methods = res.headers()["access-control-allow-methods"].to_str().unwrap();
    assert!(methods.contains("POST"), "{methods}");

    let res = http
        .post(server.url("/feedback"))
        .header("origin", "https://elsewhere.example")
        .json(&json!({ "email": "c@ors.io", "rating": 4, "message": "hi", "agent": "x" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(res.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn responses_carry_request_id_and_security_headers() {
    let server = common::spawn_server(|_| {}).await;
    let http = common::http_client();

    let res = http.get(server.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));
    assert_eq!(res.headers()["x-content-type-options"], "nosniff");
    assert_eq!(res.headers()["x-frame-options"], "SAMEORIGIN");

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ok");

    let res = http
        .get(server.url("/health"))
        .header("x-request-id", "trace-me")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["x-request-id"], "trace-me");
}

#[tokio::test]
async fn security_headers_can_be_disabled() {
    let server = common::spawn_server(|config| config.security.enable_headers = false).await;
    let res = common::http_client().get(server.url("/health")).send().await.unwrap();
    assert!(!res.headers().contains_key("x-content-type-options"));
}

#[tokio::test]
async fn feedback_form_is_served_from_static_dir() {
    let server = common::spawn_server(|_| {}).await;
    let http = common::http_client();

    let res = http.get(server.url("/?agent=bot-1&rating=4")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.text().await.unwrap().contains("feedbackForm"));

    let res = http.get(server.url("/script.js")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn unknown_paths_are_json_404_without_static_dir() {
    let server = common::spawn_server(|config| config.static_dir = None).await;
    let res = common::http_client().get(server.url("/nope")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.json::<Value>().await.unwrap(), json!({ "error": "Not Found" }));
}
