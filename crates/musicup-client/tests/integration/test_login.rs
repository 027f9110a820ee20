//! Login against the music service

use musicup_client::client::MusicManagerClient;
use musicup_core::ports::UploadClient;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common;

#[tokio::test]
async fn test_login_registers_uploader() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/uploaders"))
        .and(body_json(serde_json::json!({
            "uploader_id": common::UPLOADER_ID,
            "uploader_name": "music-upload"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let credentials = common::write_valid_credentials(dir.path());

    let mut client = MusicManagerClient::with_base_url(server.uri());
    assert!(client.login(&credentials, &common::uploader_id()).await);
    assert!(client.is_authenticated());
}

#[tokio::test]
async fn test_login_rejected_by_service() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/uploaders"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid_token"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let credentials = common::write_valid_credentials(dir.path());

    let mut client = MusicManagerClient::with_base_url(server.uri());
    assert!(!client.login(&credentials, &common::uploader_id()).await);
    assert!(!client.is_authenticated());
}

#[tokio::test]
async fn test_login_with_malformed_credentials_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let credentials = dir.path().join("oauth");
    std::fs::write(&credentials, "this is not json").unwrap();

    let mut client = MusicManagerClient::with_base_url(server.uri());
    assert!(!client.login(&credentials, &common::uploader_id()).await);
}

#[tokio::test]
async fn test_login_refreshes_expired_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/refresh"))
        .and(body_json(serde_json::json!({ "refresh_token": "r1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": common::ACCESS_TOKEN,
            "expires_at": "2099-01-01T00:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;
    common::mount_register(&server).await;

    let dir = tempfile::tempdir().unwrap();
    let credentials = common::write_credentials(
        dir.path(),
        serde_json::json!({
            "access_token": "stale",
            "refresh_token": "r1",
            "expires_at": "2000-01-01T00:00:00Z"
        }),
    );

    let mut client = MusicManagerClient::with_base_url(server.uri());
    assert!(client.login(&credentials, &common::uploader_id()).await);
}

#[tokio::test]
async fn test_login_expired_without_refresh_token_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let credentials = common::write_credentials(
        dir.path(),
        serde_json::json!({
            "access_token": "stale",
            "expires_at": "2000-01-01T00:00:00Z"
        }),
    );

    let mut client = MusicManagerClient::with_base_url(server.uri());
    assert!(!client.login(&credentials, &common::uploader_id()).await);
}
