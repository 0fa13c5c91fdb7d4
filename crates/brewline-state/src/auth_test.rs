use super::*;
use crate::persistence::{save_json, MemoryStorage};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Harness {
    store: AuthStore,
    storage: Arc<MemoryStorage>,
}

fn harness(server: &MockServer, storage: Arc<MemoryStorage>) -> Harness {
    let session = Arc::new(AuthSession::restore(storage.clone()));
    let api = ApiClient::new(&format!("{}/api/v1", server.uri()), 5, "brewline-test")
        .unwrap()
        .with_auth_hook(session.clone());
    Harness {
        store: AuthStore::new(api, session),
        storage,
    }
}

fn signed_in_storage(token: &str) -> Arc<MemoryStorage> {
    let storage = Arc::new(MemoryStorage::new());
    save_json(storage.as_ref(), keys::TOKEN, token).unwrap();
    save_json(
        storage.as_ref(),
        keys::USER,
        &json!({ "id": 3, "name": "Ana", "points": 40, "memberLevelId": 1 }),
    )
    .unwrap();
    storage
}

fn login_ok() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "code": 200,
        "message": "success",
        "data": {
            "token": "tok-1",
            "user": { "id": 3, "name": "Ana", "phone": "13800138000", "points": 40, "memberLevelId": 1 }
        }
    }))
}

#[tokio::test]
async fn login_success_authenticates_and_persists() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(login_ok())
        .mount(&server)
        .await;

    let h = harness(&server, Arc::new(MemoryStorage::new()));
    let user = h.store.login("13800138000", "secret1").await.unwrap();

    assert_eq!(user.id, 3);
    let state = h.store.snapshot();
    assert!(state.is_authenticated());
    assert!(!state.loading);
    assert!(state.error.is_none());
    assert_eq!(h.store.user_points(), 40);
    assert_eq!(h.store.user_level(), 1);
    assert_eq!(h.storage.get(keys::TOKEN).unwrap().as_deref(), Some("\"tok-1\""));
    assert!(h.storage.get(keys::USER).unwrap().is_some());
}

#[tokio::test]
async fn login_failure_leaves_session_anonymous_with_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 401,
            "message": "wrong phone or password",
            "data": null
        })))
        .mount(&server)
        .await;

    let h = harness(&server, Arc::new(MemoryStorage::new()));
    let err = h.store.login("13800138000", "nope").await.unwrap_err();

    assert_eq!(err.user_message(), "wrong phone or password");
    let state = h.store.snapshot();
    assert!(!state.is_authenticated());
    assert!(state.user.is_none());
    assert!(!state.loading);
    assert_eq!(state.error.as_deref(), Some("wrong phone or password"));
    assert!(h.storage.get(keys::TOKEN).unwrap().is_none());
}

#[tokio::test]
async fn session_is_restored_from_storage() {
    let server = MockServer::start().await;
    let h = harness(&server, signed_in_storage("tok-saved"));

    assert!(h.store.is_authenticated());
    assert_eq!(h.store.session().token().as_deref(), Some("tok-saved"));
    assert_eq!(h.store.snapshot().user.as_ref().map(|u| u.id), Some(3));
}

#[tokio::test]
async fn logout_sends_bearer_and_clears_everything() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/logout"))
        .and(header("authorization", "Bearer tok-saved"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "code": 200, "message": "ok" })))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, signed_in_storage("tok-saved"));
    h.store.logout().await;

    assert!(!h.store.is_authenticated());
    assert!(h.store.snapshot().user.is_none());
    assert!(h.storage.get(keys::TOKEN).unwrap().is_none());
    assert!(h.storage.get(keys::USER).unwrap().is_none());
}

#[tokio::test]
async fn logout_clears_locally_when_server_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/logout"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let h = harness(&server, signed_in_storage("tok-saved"));
    h.store.logout().await;

    let state = h.store.snapshot();
    assert!(!state.is_authenticated());
    assert!(state.user.is_none());
    assert!(!state.loading);
    assert!(h.storage.get(keys::TOKEN).unwrap().is_none());
}

#[tokio::test]
async fn fetch_profile_without_token_is_a_no_op() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/auth/profile"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let h = harness(&server, Arc::new(MemoryStorage::new()));
    assert!(h.store.fetch_profile().await.unwrap().is_none());
}

#[tokio::test]
async fn fetch_profile_updates_user() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/auth/profile"))
        .and(header("authorization", "Bearer tok-saved"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "message": "success",
            "data": { "id": 3, "name": "Ana", "points": 95, "memberLevelId": 2 }
        })))
        .mount(&server)
        .await;

    let h = harness(&server, signed_in_storage("tok-saved"));
    let user = h.store.fetch_profile().await.unwrap().unwrap();

    assert_eq!(user.points, 95);
    assert_eq!(h.store.user_points(), 95);
    assert_eq!(h.store.user_level(), 2);
}

#[tokio::test]
async fn fetch_profile_unauthorized_signs_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/auth/profile"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "token expired" })))
        .mount(&server)
        .await;

    let h = harness(&server, signed_in_storage("tok-stale"));
    let err = h.store.fetch_profile().await.unwrap_err();

    assert!(err.is_unauthorized());
    let state = h.store.snapshot();
    assert!(!state.is_authenticated());
    assert!(state.user.is_none());
    assert_eq!(state.error.as_deref(), Some("token expired"));
    assert!(h.storage.get(keys::TOKEN).unwrap().is_none());
}

#[tokio::test]
async fn reset_password_requires_session() {
    let server = MockServer::start().await;
    let h = harness(&server, Arc::new(MemoryStorage::new()));

    let err = h.store.reset_password("old", "new").await.unwrap_err();
    assert!(matches!(err, StoreError::NotAuthenticated));
    assert_eq!(h.store.snapshot().error.as_deref(), Some("not signed in"));

    h.store.clear_error();
    assert!(h.store.snapshot().error.is_none());
}

#[tokio::test]
async fn sms_login_establishes_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/send-sms"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "code": 200, "message": "sent" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/sms-login"))
        .respond_with(login_ok())
        .mount(&server)
        .await;

    let h = harness(&server, Arc::new(MemoryStorage::new()));
    h.store.send_sms_code("13800138000", 1).await.unwrap();
    h.store.sms_login("13800138000", "123456").await.unwrap();
    assert!(h.store.is_authenticated());
}

#[test]
fn unauthorized_hook_clears_session() {
    let session = AuthSession::restore(signed_in_storage("tok"));
    assert_eq!(session.bearer_token().as_deref(), Some("tok"));
    session.on_unauthorized();
    assert!(session.bearer_token().is_none());
    assert!(!session.is_authenticated());
}
