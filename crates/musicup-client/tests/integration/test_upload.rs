//! Uploading tracks through the music service

use musicup_client::client::MusicManagerClient;
use musicup_core::domain::{UploadOutcome, UploadStatus};
use musicup_core::ports::UploadClient;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common;

#[tokio::test]
async fn test_upload_new_track() {
    let (server, client, dir) = common::setup_logged_in().await;
    common::mount_tracks(&server, serde_json::json!({ "status": "uploaded" })).await;

    let track = dir.path().join("song.mp3");
    std::fs::write(&track, b"ID3 fake audio").unwrap();

    let outcome = client.upload(&track, true).await;
    assert_eq!(outcome.status(), UploadStatus::Uploaded);
    assert!(outcome.permits_deletion(true));
}

#[tokio::test]
async fn test_upload_matched_track() {
    let (server, client, dir) = common::setup_logged_in().await;
    common::mount_tracks(&server, serde_json::json!({ "status": "matched" })).await;

    let track = dir.path().join("song.flac");
    std::fs::write(&track, b"fLaC").unwrap();

    let outcome = client.upload(&track, false).await;
    assert_eq!(outcome, UploadOutcome::matched());
}

#[tokio::test]
async fn test_upload_rejected_track_carries_reason() {
    let (server, client, dir) = common::setup_logged_in().await;
    common::mount_tracks(
        &server,
        serde_json::json!({ "status": "rejected", "reason": "ALREADY_EXISTS" }),
    )
    .await;

    let track = dir.path().join("dup.mp3");
    std::fs::write(&track, b"ID3").unwrap();

    let outcome = client.upload(&track, true).await;
    assert_eq!(outcome, UploadOutcome::not_uploaded("ALREADY_EXISTS"));
    assert!(!outcome.permits_deletion(true));
}

#[tokio::test]
async fn test_upload_sends_bearer_token_and_multipart() {
    let (server, client, dir) = common::setup_logged_in().await;
    Mock::given(method("POST"))
        .and(path("/tracks"))
        .and(header(
            "authorization",
            format!("Bearer {}", common::ACCESS_TOKEN).as_str(),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "uploaded"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let track = dir.path().join("song.ogg");
    std::fs::write(&track, b"OggS").unwrap();
    client.upload(&track, true).await;

    let requests = server.received_requests().await.unwrap();
    let upload = requests
        .iter()
        .find(|r| r.url.path() == "/tracks")
        .expect("no upload request recorded");
    let content_type = upload
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(content_type.starts_with("multipart/form-data"));

    let body = String::from_utf8_lossy(&upload.body);
    assert!(body.contains("name=\"uploader_id\""));
    assert!(body.contains(common::UPLOADER_ID));
    assert!(body.contains("name=\"transcode\""));
    assert!(body.contains("filename=\"song.ogg\""));
    assert!(body.contains("OggS"));
}

#[tokio::test]
async fn test_upload_server_error_is_not_uploaded() {
    let (server, client, dir) = common::setup_logged_in().await;
    Mock::given(method("POST"))
        .and(path("/tracks"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let track = dir.path().join("song.mp3");
    std::fs::write(&track, b"ID3").unwrap();

    let outcome = client.upload(&track, true).await;
    assert_eq!(outcome.status(), UploadStatus::NotUploaded);
    assert!(outcome.reason().contains("503"));
}

#[tokio::test]
async fn test_upload_missing_file_is_not_uploaded() {
    let (_server, client, dir) = common::setup_logged_in().await;

    let outcome = client.upload(&dir.path().join("gone.mp3"), true).await;
    assert_eq!(outcome.status(), UploadStatus::NotUploaded);
    assert!(outcome.reason().starts_with("IO error"));
}

#[tokio::test]
async fn test_upload_refreshes_token_that_expired_after_login() {
    let server = MockServer::start().await;
    common::mount_register(&server).await;
    Mock::given(method("POST"))
        .and(path("/oauth/refresh"))
        .and(body_json(serde_json::json!({ "refresh_token": "r1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "renewed-token",
            "expires_at": "2099-01-01T00:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/tracks"))
        .and(header("authorization", "Bearer renewed-token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "status": "uploaded" })),
        )
        .expect(2)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let expires_at = chrono::Utc::now() + chrono::Duration::seconds(1);
    let credentials = common::write_credentials(
        dir.path(),
        serde_json::json!({
            "access_token": common::ACCESS_TOKEN,
            "refresh_token": "r1",
            "expires_at": expires_at.to_rfc3339()
        }),
    );

    let mut client = MusicManagerClient::with_base_url(server.uri());
    assert!(client.login(&credentials, &common::uploader_id()).await);

    tokio::time::sleep(std::time::Duration::from_millis(1500)).await;

    let track = dir.path().join("song.mp3");
    std::fs::write(&track, b"ID3 fake audio").unwrap();

    // The second upload reuses the refreshed token
    assert_eq!(client.upload(&track, true).await, UploadOutcome::uploaded());
    assert_eq!(client.upload(&track, true).await, UploadOutcome::uploaded());
}

#[tokio::test]
async fn test_upload_with_expired_unrefreshable_token_is_not_uploaded() {
    let server = MockServer::start().await;
    common::mount_register(&server).await;
    Mock::given(method("POST"))
        .and(path("/tracks"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let expires_at = chrono::Utc::now() + chrono::Duration::seconds(1);
    let credentials = common::write_credentials(
        dir.path(),
        serde_json::json!({
            "access_token": common::ACCESS_TOKEN,
            "expires_at": expires_at.to_rfc3339()
        }),
    );

    let mut client = MusicManagerClient::with_base_url(server.uri());
    assert!(client.login(&credentials, &common::uploader_id()).await);

    tokio::time::sleep(std::time::Duration::from_millis(1500)).await;

    let track = dir.path().join("song.mp3");
    std::fs::write(&track, b"ID3 fake audio").unwrap();

    let outcome = client.upload(&track, true).await;
    assert_eq!(outcome.status(), UploadStatus::NotUploaded);
    assert!(outcome.reason().contains("expired"));
}
