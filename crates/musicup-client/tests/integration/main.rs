//! Integration tests for musicup-client
//!
//! Uses wiremock to stand in for the music library API and drives
//! `MusicManagerClient` through the `UploadClient` port.

mod common;

mod test_login;
mod test_upload;
