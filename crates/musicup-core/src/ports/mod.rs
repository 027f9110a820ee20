//! Port definitions
//!
//! Ports are the interfaces the core depends on; their implementations
//! live in adapter crates.
//!
//! - [`UploadClient`] - authentication and track upload against the music service

pub mod upload_client;

pub use upload_client::UploadClient;
