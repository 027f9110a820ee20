//! music-upload core - domain types and ports
//!
//! This crate contains the pieces shared by every other crate:
//! - **Domain types** - `UploadTarget`, `UploadOutcome`, `UploaderId`
//! - **Port definitions** - the `UploadClient` trait implemented by adapters
//! - **Configuration** - YAML-backed settings, validation and a builder
//! - **Identity resolution** - default uploader id from the host's MAC address
//!
//! # Architecture
//!
//! Like a ports & adapters core, nothing here talks to the network. The
//! HTTP adapter lives in `musicup-client`; the watcher, scanner and event
//! handler live in `musicup-sync`.

pub mod config;
pub mod domain;
pub mod identity;
pub mod ports;
