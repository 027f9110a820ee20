//! Default uploader identity
//!
//! Derives an [`UploaderId`] from the hardware address of the interface that
//! carries the host's default IPv4 route. Only consulted when the caller did
//! not supply an id, so hosts without networking can still run with `-u`.
//!
//! Reads the same kernel tables `ip route` does:
//! - `/proc/net/route` to find the default-route interface
//! - `/sys/class/net/<iface>/address` for its link-layer address
//!
//! Both roots are injectable for tests.

use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

use crate::domain::UploaderId;

const PROC_NET_ROUTE: &str = "/proc/net/route";
const SYS_CLASS_NET: &str = "/sys/class/net";

/// Route flag: route is usable
const RTF_UP: u32 = 0x0001;

/// Errors raised while resolving the default uploader id
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// The host has no usable default route, or the route table is unreadable
    #[error("No default network interface: {0}")]
    NoNetworkInterface(String),

    /// The default interface exists but has no usable link-layer address
    #[error("Interface {interface} has no hardware address")]
    NoHardwareAddress {
        /// Name of the default-route interface
        interface: String,
    },
}

/// Looks up the default uploader id from host network state
///
/// Read-only; nothing is cached, each call re-reads the kernel tables.
#[derive(Debug, Clone)]
pub struct IdentityResolver {
    route_table: PathBuf,
    net_class_dir: PathBuf,
}

impl Default for IdentityResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityResolver {
    /// Resolver reading the live kernel tables
    #[must_use]
    pub fn new() -> Self {
        Self::with_roots(PROC_NET_ROUTE, SYS_CLASS_NET)
    }

    /// Resolver reading an alternate route table and `net` class directory
    pub fn with_roots(route_table: impl Into<PathBuf>, net_class_dir: impl Into<PathBuf>) -> Self {
        Self {
            route_table: route_table.into(),
            net_class_dir: net_class_dir.into(),
        }
    }

    /// Resolves the default uploader id
    ///
    /// # Errors
    /// [`IdentityError::NoNetworkInterface`] without a default route,
    /// [`IdentityError::NoHardwareAddress`] when that interface has no MAC
    pub fn resolve(&self) -> Result<UploaderId, IdentityError> {
        let interface = self.default_interface()?;
        let id = self.hardware_address(&interface)?;
        debug!(%interface, uploader_id = %id, "Resolved default uploader id");
        Ok(id)
    }

    /// Name of the interface carrying the default route
    ///
    /// When several default routes exist, the one with the lowest metric wins.
    ///
    /// # Errors
    /// Returns [`IdentityError::NoNetworkInterface`] if the table cannot be
    /// read or holds no usable default route
    pub fn default_interface(&self) -> Result<String, IdentityError> {
        let table = std::fs::read_to_string(&self.route_table).map_err(|e| {
            IdentityError::NoNetworkInterface(format!(
                "cannot read {}: {e}",
                self.route_table.display()
            ))
        })?;

        parse_default_route(&table).ok_or_else(|| {
            IdentityError::NoNetworkInterface("no default route configured".to_string())
        })
    }

    fn hardware_address(&self, interface: &str) -> Result<UploaderId, IdentityError> {
        let no_address = || IdentityError::NoHardwareAddress {
            interface: interface.to_string(),
        };

        let address_file = self.net_class_dir.join(interface).join("address");
        let raw = std::fs::read_to_string(&address_file).map_err(|_| no_address())?;

        UploaderId::from_hardware_str(&raw).map_err(|_| no_address())
    }
}

/// Picks the default-route interface out of a `/proc/net/route` dump
fn parse_default_route(table: &str) -> Option<String> {
    table
        .lines()
        .skip(1)
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 8 {
                return None;
            }
            let (iface, destination, flags, metric, mask) =
                (fields[0], fields[1], fields[3], fields[6], fields[7]);

            let flags = u32::from_str_radix(flags, 16).ok()?;
            let is_default = destination == "00000000" && mask == "00000000";
            if !is_default || flags & RTF_UP == 0 {
                return None;
            }

            let metric: u32 = metric.parse().ok()?;
            Some((metric, iface.to_string()))
        })
        .min_by_key(|(metric, _)| *metric)
        .map(|(_, iface)| iface)
}
