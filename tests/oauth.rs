//! OAuth session tests: token lifecycle, envelope decoding, and error
//! surfacing, all against a local mock server.

use wiremock::matchers::{basic_auth, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use snoo::{Endpoints, Error, OAuthSession};

const USER_AGENT: &str = "snoo-tests/0.1 by alice";

fn builder_for(server: &MockServer) -> snoo::OAuthSessionBuilder {
    OAuthSession::builder()
        .username("alice")
        .password("hunter2")
        .client_id("cid")
        .client_secret("sec")
        .user_agent(USER_AGENT)
        .endpoints(Endpoints::new(server.uri(), server.uri()).unwrap())
}

async fn mount_token_endpoint(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .and(basic_auth("cid", "sec"))
        .and(body_string_contains("grant_type=password"))
        .and(body_string_contains("username=alice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "abc",
            "token_type": "bearer",
            "expires_in": 3600,
            "scope": "identity",
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn token_exchange_stores_all_token_fields() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server).await;

    let session = builder_for(&server).connect().await.unwrap();

    assert_eq!(session.access_token(), "abc");
    assert_eq!(session.token_type(), "bearer");
    assert_eq!(session.scope(), "identity");
    assert_eq!(session.expires_in().as_secs(), 3600);
    assert!(!session.token_expired());
}

#[tokio::test]
async fn rejected_exchange_yields_no_session() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = builder_for(&server).connect().await.unwrap_err();
    assert!(err.to_string().contains("401 Unauthorized"));
    assert!(err.is_auth_error());
}

#[tokio::test]
async fn malformed_token_body_yields_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = builder_for(&server).connect().await.unwrap_err();
    assert!(matches!(err, Error::Json(_)));
}

#[tokio::test]
async fn revoke_succeeds_on_204_and_keeps_token_state() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server).await;

    // 204 even for a token the provider no longer recognizes.
    Mock::given(method("POST"))
        .and(path("/api/v1/revoke_token"))
        .and(basic_auth("cid", "sec"))
        .and(body_string_contains("token=abc"))
        .and(body_string_contains("token_type_hint=bearer"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let session = builder_for(&server).connect().await.unwrap();
    session.revoke_token().await.unwrap();

    assert_eq!(session.access_token(), "abc");
    assert_eq!(session.token_type(), "bearer");
}

#[tokio::test]
async fn revoke_fails_when_client_credentials_rejected() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/v1/revoke_token"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let session = builder_for(&server).connect().await.unwrap();
    let err = session.revoke_token().await.unwrap_err();
    assert!(err.to_string().contains("401 Unauthorized"));
}

#[tokio::test]
async fn me_decodes_the_bare_profile() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/v1/me"))
        .and(header("authorization", "bearer abc"))
        .and(header("user-agent", USER_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "1abcd",
            "name": "alice",
            "link_karma": 5,
            "comment_karma": 10,
            "created_utc": 1335020000.0,
            "is_gold": true,
            "has_mail": true,
            "inbox_count": 2,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = builder_for(&server).connect().await.unwrap();
    let me = session.me().await.unwrap();

    assert_eq!(me.name, "alice");
    assert_eq!(me.link_karma, 5);
    assert!(me.is_gold);
    assert_eq!(me.has_mail, Some(true));
    assert_eq!(me.inbox_count, 2);
}

#[tokio::test]
async fn user_decodes_the_wrapped_profile_with_absent_mail() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server).await;

    Mock::given(method("GET"))
        .and(path("/user/bob/about"))
        .and(header("authorization", "bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"kind":"t2","data":{"name":"bob","link_karma":5,"comment_karma":10,"has_mail":null}}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let session = builder_for(&server).connect().await.unwrap();
    let user = session.user("bob").await.unwrap();

    assert_eq!(user.name, "bob");
    assert_eq!(user.link_karma, 5);
    assert_eq!(user.comment_karma, 10);
    assert_eq!(user.has_mail, None);
}

#[tokio::test]
async fn submitted_preserves_listing_order() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server).await;

    Mock::given(method("GET"))
        .and(path("/user/bob/about"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "kind": "t2",
            "data": {"name": "bob"},
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/user/bob/submitted"))
        .and(query_param("sort", "new"))
        .and(query_param("t", "all"))
        .and(query_param("username", "bob"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": {"children": [
                {"kind": "t3", "data": {"title": "newest", "score": 3}},
                {"kind": "t3", "data": {"title": "middle", "score": 2}},
                {"kind": "t3", "data": {"title": "oldest", "score": 1}},
            ]},
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = builder_for(&server).connect().await.unwrap();
    let user = session.user("bob").await.unwrap();
    let posts = user.submitted(&Default::default()).await.unwrap();

    assert_eq!(posts.len(), 3);
    let titles: Vec<&str> = posts.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, ["newest", "middle", "oldest"]);
}

#[tokio::test]
async fn non_success_resource_status_carries_status_text() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/v1/me"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let session = builder_for(&server).connect().await.unwrap();
    let err = session.me().await.unwrap_err();

    assert!(err.to_string().contains("403 Forbidden"));
    assert!(err.is_auth_error());
}

#[tokio::test]
async fn reauthorize_replaces_the_stored_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "first",
            "token_type": "bearer",
            "expires_in": 3600,
            "scope": "identity",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = builder_for(&server).connect().await.unwrap();
    assert_eq!(session.access_token(), "first");

    server.reset().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "second",
            "token_type": "bearer",
            "expires_in": 3600,
            "scope": "identity",
        })))
        .expect(1)
        .mount(&server)
        .await;

    session.reauthorize().await.unwrap();
    assert_eq!(session.access_token(), "second");
}

#[tokio::test]
async fn missing_builder_fields_fail_before_any_request() {
    let err = OAuthSession::builder()
        .username("alice")
        .password("hunter2")
        .client_id("cid")
        .client_secret("sec")
        // no user_agent: the provider rejects defaults, so we refuse to invent one
        .connect()
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Config(_)));
    assert!(err.to_string().contains("user_agent"));
}
