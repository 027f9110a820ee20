//! Shared helpers for music service integration tests

use std::path::{Path, PathBuf};

use musicup_client::client::MusicManagerClient;
use musicup_core::{domain::UploaderId, ports::UploadClient};
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const ACCESS_TOKEN: &str = "test-access-token";
pub const UPLOADER_ID: &str = "00:1A:2B:3C:4D:5E";

pub fn uploader_id() -> UploaderId {
    UploaderId::new(UPLOADER_ID).unwrap()
}

/// Writes a credential file into `dir` and returns its path
pub fn write_credentials(dir: &Path, json: serde_json::Value) -> PathBuf {
    let path = dir.join("oauth");
    std::fs::write(&path, json.to_string()).unwrap();
    path
}

/// Writes a credential file holding a non-expiring access token
pub fn write_valid_credentials(dir: &Path) -> PathBuf {
    write_credentials(dir, serde_json::json!({ "access_token": ACCESS_TOKEN }))
}

/// Mounts `POST /uploaders` accepting the test bearer token
pub async fn mount_register(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/uploaders"))
        .and(header("authorization", format!("Bearer {ACCESS_TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(201))
        .mount(server)
        .await;
}

/// Mounts `POST /tracks` answering with the given JSON body
pub async fn mount_tracks(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/tracks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Starts a mock server and returns a client already logged in to it
pub async fn setup_logged_in() -> (MockServer, MusicManagerClient, TempDir) {
    let server = MockServer::start().await;
    mount_register(&server).await;

    let dir = tempfile::tempdir().unwrap();
    let credentials = write_valid_credentials(dir.path());

    let mut client = MusicManagerClient::with_base_url(server.uri());
    assert!(client.login(&credentials, &uploader_id()).await);

    (server, client, dir)
}
