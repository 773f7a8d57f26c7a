mod common;

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use common::test_app;

#[tokio::test]
async fn list_is_empty_for_a_fresh_user() {
    let app = test_app();
    let (_, token) = app.sign_up("fresh@example.com").await;

    let response = app.query(Some(&token), "/api/rpc/note.list").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!([]));
}

#[tokio::test]
async fn create_defaults_content_to_empty() {
    let app = test_app();
    let (user, token) = app.sign_up("ada@example.com").await;

    let created = app
        .mutate(Some(&token), "/api/rpc/note.create", json!({ "title": "t" }))
        .await;
    assert_eq!(created.status, StatusCode::OK);
    assert_eq!(created.body["user_id"], json!(user.id));

    let id = created.body["id"].as_str().unwrap();
    let fetched = app
        .query(Some(&token), &format!("/api/rpc/note.get?id={id}"))
        .await;

    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["title"], "t");
    assert_eq!(fetched.body["content"], "");
}

#[tokio::test]
async fn list_returns_newest_first() {
    let app = test_app();
    let (_, token) = app.sign_up("ada@example.com").await;

    for title in ["first", "second", "third"] {
        app.mutate(Some(&token), "/api/rpc/note.create", json!({ "title": title }))
            .await;
    }

    let response = app.query(Some(&token), "/api/rpc/note.list").await;
    let titles: Vec<&str> = response
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|note| note["title"].as_str().unwrap())
        .collect();

    assert_eq!(titles, ["third", "second", "first"]);
}

#[tokio::test]
async fn update_is_partial() {
    let app = test_app();
    let (_, token) = app.sign_up("ada@example.com").await;

    let created = app
        .mutate(
            Some(&token),
            "/api/rpc/note.create",
            json!({ "title": "original", "content": "body" }),
        )
        .await;
    let id = created.body["id"].as_str().unwrap().to_string();

    let retitled = app
        .mutate(
            Some(&token),
            "/api/rpc/note.update",
            json!({ "id": id, "title": "x" }),
        )
        .await;
    assert_eq!(retitled.status, StatusCode::OK);
    assert_eq!(retitled.body["title"], "x");
    assert_eq!(retitled.body["content"], "body");

    let rewritten = app
        .mutate(
            Some(&token),
            "/api/rpc/note.update",
            json!({ "id": id, "content": "y" }),
        )
        .await;
    assert_eq!(rewritten.body["title"], "x");
    assert_eq!(rewritten.body["content"], "y");
    assert_eq!(rewritten.body["id"], created.body["id"]);
    assert_eq!(rewritten.body["created_at"], created.body["created_at"]);
}

#[tokio::test]
async fn delete_twice_succeeds_both_times() {
    let app = test_app();
    let (_, token) = app.sign_up("ada@example.com").await;

    let created = app
        .mutate(Some(&token), "/api/rpc/note.create", json!({ "title": "gone" }))
        .await;
    let id = created.body["id"].as_str().unwrap().to_string();

    for _ in 0..2 {
        let deleted = app
            .mutate(Some(&token), "/api/rpc/note.delete", json!({ "id": id }))
            .await;
        assert_eq!(deleted.status, StatusCode::OK);
        assert_eq!(deleted.body, json!({ "success": true }));
    }

    let fetched = app
        .query(Some(&token), &format!("/api/rpc/note.get?id={id}"))
        .await;
    assert_eq!(fetched.status, StatusCode::NOT_FOUND);
    assert_eq!(fetched.error_code(), Some("NOT_FOUND"));
}

#[tokio::test]
async fn notes_are_invisible_to_other_users() {
    let app = test_app();
    let (_, alice) = app.sign_up("alice@example.com").await;
    let (_, bob) = app.sign_up("bob@example.com").await;

    let created = app
        .mutate(
            Some(&alice),
            "/api/rpc/note.create",
            json!({ "title": "private", "content": "secret" }),
        )
        .await;
    let id = created.body["id"].as_str().unwrap().to_string();

    let listed = app.query(Some(&bob), "/api/rpc/note.list").await;
    assert_eq!(listed.body, json!([]));

    let fetched = app
        .query(Some(&bob), &format!("/api/rpc/note.get?id={id}"))
        .await;
    assert_eq!(fetched.status, StatusCode::NOT_FOUND);

    let updated = app
        .mutate(
            Some(&bob),
            "/api/rpc/note.update",
            json!({ "id": id, "title": "hijacked" }),
        )
        .await;
    assert_eq!(updated.status, StatusCode::NOT_FOUND);

    // Idempotent delete reports success, but must not touch Alice's row
    app.mutate(Some(&bob), "/api/rpc/note.delete", json!({ "id": id }))
        .await;

    let still_there = app
        .query(Some(&alice), &format!("/api/rpc/note.get?id={id}"))
        .await;
    assert_eq!(still_there.status, StatusCode::OK);
    assert_eq!(still_there.body["title"], "private");
    assert_eq!(still_there.body["content"], "secret");
}

#[tokio::test]
async fn missing_and_foreign_notes_look_the_same() {
    let app = test_app();
    let (_, alice) = app.sign_up("alice@example.com").await;
    let (_, bob) = app.sign_up("bob@example.com").await;

    let created = app
        .mutate(Some(&alice), "/api/rpc/note.create", json!({ "title": "a" }))
        .await;
    let foreign = created.body["id"].as_str().unwrap().to_string();
    let missing = Uuid::new_v4().to_string();

    let foreign = app
        .query(Some(&bob), &format!("/api/rpc/note.get?id={foreign}"))
        .await;
    let missing = app
        .query(Some(&bob), &format!("/api/rpc/note.get?id={missing}"))
        .await;

    assert_eq!(foreign.status, missing.status);
    assert_eq!(foreign.body, missing.body);
}

#[tokio::test]
async fn payload_cannot_choose_the_owner() {
    let app = test_app();
    let (alice, _) = app.sign_up("alice@example.com").await;
    let (bob, bob_token) = app.sign_up("bob@example.com").await;

    let created = app
        .mutate(
            Some(&bob_token),
            "/api/rpc/note.create",
            json!({ "title": "mine", "user_id": alice.id }),
        )
        .await;

    assert_eq!(created.status, StatusCode::OK);
    assert_eq!(created.body["user_id"], json!(bob.id));
}

#[tokio::test]
async fn procedures_require_a_session() {
    let app = test_app();

    let listed = app.query(None, "/api/rpc/note.list").await;
    assert_eq!(listed.status, StatusCode::UNAUTHORIZED);
    assert_eq!(listed.error_code(), Some("UNAUTHORIZED"));

    // Authentication is checked before the input
    let created = app
        .mutate(None, "/api/rpc/note.create", json!({ "title": "" }))
        .await;
    assert_eq!(created.status, StatusCode::UNAUTHORIZED);

    let unknown = app
        .query(Some("not-a-real-token"), "/api/rpc/note.list")
        .await;
    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn invalid_input_is_rejected_with_field_messages() {
    let app = test_app();
    let (_, token) = app.sign_up("ada@example.com").await;

    let long_title = "a".repeat(201);
    let created = app
        .mutate(
            Some(&token),
            "/api/rpc/note.create",
            json!({ "title": long_title }),
        )
        .await;
    assert_eq!(created.status, StatusCode::BAD_REQUEST);
    assert_eq!(created.error_code(), Some("BAD_REQUEST"));
    assert_eq!(
        created.body["error"]["fieldErrors"]["title"],
        json!(["Title is too long"])
    );

    let fetched = app
        .query(Some(&token), "/api/rpc/note.get?id=42")
        .await;
    assert_eq!(fetched.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        fetched.body["error"]["fieldErrors"]["id"],
        json!(["Invalid uuid"])
    );

    let listed = app.query(Some(&token), "/api/rpc/note.list").await;
    assert_eq!(listed.body, json!([]));
}

#[tokio::test]
async fn malformed_body_is_a_bad_request() {
    let app = test_app();
    let (_, token) = app.sign_up("ada@example.com").await;

    let response = app
        .send(common::request(
            axum::http::Method::POST,
            "/api/rpc/note.create",
            Some(&token),
            None,
        ))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), Some("BAD_REQUEST"));
}
