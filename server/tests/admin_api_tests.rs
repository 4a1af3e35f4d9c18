mod common;

use common::{spawn_test_server, t0, ADMIN_KEY};
use pretty_assertions::assert_eq;
use seatlock_server::api::{
    AccountDurationResponse, AccountView, DeletedResponse, ErrorBody, ADMIN_KEY_HEADER,
};
use serde_json::json;

// ── Admin key ───────────────────────────────────────────────────

#[tokio::test]
async fn missing_admin_key_is_forbidden() {
    let server = spawn_test_server().await;
    let resp = server
        .http
        .get(server.url("/admin/accounts"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 403);
    let err: ErrorBody = resp.json().await.unwrap();
    assert_eq!(err.error, "forbidden");
}

#[tokio::test]
async fn wrong_admin_key_is_forbidden_before_body_parsing() {
    let server = spawn_test_server().await;
    let resp = server
        .http
        .post(server.url("/admin/accounts"))
        .header(ADMIN_KEY_HEADER, "not-the-key")
        .body("not json")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 403);
}

// ── CRUD ────────────────────────────────────────────────────────

#[tokio::test]
async fn create_list_extend_delete() {
    let server = spawn_test_server().await;
    let admin = |req: reqwest::RequestBuilder| req.header(ADMIN_KEY_HEADER, ADMIN_KEY);

    let resp = admin(server.http.post(server.url("/admin/accounts")))
        .json(&json!({ "account_id": "ana", "password": "pw", "duration_seconds": 3600 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let created: AccountDurationResponse = resp.json().await.unwrap();
    assert_eq!(created.duration_seconds, 3600);

    server.login_ok("ana", "laptop").await;

    let accounts: Vec<AccountView> = admin(server.http.get(server.url("/admin/accounts")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        accounts,
        vec![AccountView {
            account_id: "ana".to_string(),
            duration_seconds: 3600,
            activated_at: Some(t0()),
        }]
    );

    let resp = admin(server.http.post(server.url("/admin/accounts/ana/extend")))
        .json(&json!({ "extra_seconds": 600 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let extended: AccountDurationResponse = resp.json().await.unwrap();
    assert_eq!(extended.duration_seconds, 4200);

    let resp = admin(server.http.delete(server.url("/admin/accounts/ana")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let deleted: DeletedResponse = resp.json().await.unwrap();
    assert_eq!(deleted.account_id, "ana");

    let resp = admin(server.http.delete(server.url("/admin/accounts/ana")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn duplicate_account_is_409() {
    let server = spawn_test_server().await;
    server.create_account("ana", 60).await;

    let resp = server
        .http
        .post(server.url("/admin/accounts"))
        .header(ADMIN_KEY_HEADER, ADMIN_KEY)
        .json(&json!({ "account_id": "ana", "password": "pw", "duration_seconds": 60 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);
    let err: ErrorBody = resp.json().await.unwrap();
    assert_eq!(err.error, "conflict");
}

#[tokio::test]
async fn negative_duration_is_400() {
    let server = spawn_test_server().await;
    let resp = server
        .http
        .post(server.url("/admin/accounts"))
        .header(ADMIN_KEY_HEADER, ADMIN_KEY)
        .json(&json!({ "account_id": "ana", "password": "pw", "duration_seconds": -5 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn extend_validation() {
    let server = spawn_test_server().await;
    server.create_account("ana", 60).await;

    let resp = server
        .http
        .post(server.url("/admin/accounts/ana/extend"))
        .header(ADMIN_KEY_HEADER, ADMIN_KEY)
        .json(&json!({ "extra_seconds": 0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let resp = server
        .http
        .post(server.url("/admin/accounts/ghost/extend"))
        .header(ADMIN_KEY_HEADER, ADMIN_KEY)
        .json(&json!({ "extra_seconds": 60 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let err: ErrorBody = resp.json().await.unwrap();
    assert_eq!(err.error, "not_found");
}

#[tokio::test]
async fn extension_after_expiry_allows_login_again() {
    let server = spawn_test_server().await;
    server.create_account("ana", 60).await;
    server.login_ok("ana", "laptop").await;

    server.clock.advance_secs(120);
    assert_eq!(server.login("ana", "laptop").await.status(), 403);

    let resp = server
        .http
        .post(server.url("/admin/accounts/ana/extend"))
        .header(ADMIN_KEY_HEADER, ADMIN_KEY)
        .json(&json!({ "extra_seconds": 600 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let grant = server.login_ok("ana", "laptop").await;
    assert_eq!(grant.remaining_seconds, 540);
}
