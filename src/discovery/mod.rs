// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! mDNS discovery of TiVo boxes on the local network.
//!
//! TiVo boxes announce their remote-control service as
//! `_tivo-remote._tcp.local.`. Discovery browses for that service for a
//! bounded window and returns one [`DiscoveredTivo`] per distinct address,
//! carrying everything setup needs to configure the box.
//!
//! # Examples
//!
//! ```no_run
//! use vmtivo::discovery::{discover, DEFAULT_DISCOVERY_WINDOW};
//!
//! # async fn example() -> Result<(), vmtivo::error::DiscoveryError> {
//! let found = discover(DEFAULT_DISCOVERY_WINDOW).await?;
//! for tivo in &found {
//!     println!("{} at {}:{}", tivo.name, tivo.address, tivo.port);
//! }
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use mdns_sd::{ServiceDaemon, ServiceEvent, ServiceInfo};
use tokio::time::{Instant, timeout};
use tracing::{debug, info, trace};

use crate::error::DiscoveryError;
use crate::transport::TcpConfig;

/// The mDNS service type TiVo boxes advertise.
pub const SERVICE_TYPE: &str = "_tivo-remote._tcp.local.";

/// Default browse window.
pub const DEFAULT_DISCOVERY_WINDOW: Duration = Duration::from_secs(10);

/// TXT record key carrying the TiVo service number.
const TSN_PROPERTY: &str = "TSN";

/// A box found by an mDNS browse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredTivo {
    /// IP address the service resolved to.
    pub address: String,

    /// Instance name from the service announcement, e.g. `Living Room`.
    pub name: String,

    /// Port the remote-control service listens on.
    pub port: u16,

    /// TiVo service number from the TXT record, if announced.
    pub serial: Option<String>,
}

/// Browses for TiVo boxes for the given window.
///
/// The browse runs for the full window so late announcements are not
/// missed; results are deduplicated by address. An empty result is not an
/// error, it simply means no box announced itself in time.
///
/// # Errors
///
/// Fails with [`DiscoveryError::Browse`] if the mDNS daemon cannot be
/// started or the browse cannot be registered.
pub async fn discover(window: Duration) -> Result<Vec<DiscoveredTivo>, DiscoveryError> {
    let daemon = ServiceDaemon::new().map_err(|e| DiscoveryError::Browse(e.to_string()))?;
    let receiver = daemon
        .browse(SERVICE_TYPE)
        .map_err(|e| DiscoveryError::Browse(e.to_string()))?;

    info!(window_secs = window.as_secs(), "starting mDNS browse");

    let deadline = Instant::now() + window;
    let mut found: Vec<DiscoveredTivo> = Vec::new();

    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }
        match timeout(remaining, receiver.recv_async()).await {
            Ok(Ok(ServiceEvent::ServiceResolved(resolved))) => {
                if let Some(tivo) = record_from(&resolved) {
                    if found.iter().any(|t| t.address == tivo.address) {
                        trace!(address = %tivo.address, "duplicate announcement");
                    } else {
                        debug!(
                            name = %tivo.name,
                            address = %tivo.address,
                            port = tivo.port,
                            "resolved TiVo service"
                        );
                        found.push(tivo);
                    }
                }
            }
            Ok(Ok(event)) => trace!(?event, "ignoring mDNS event"),
            // Daemon channel closed; nothing more will arrive.
            Ok(Err(_)) => break,
            // Window elapsed.
            Err(_) => break,
        }
    }

    let _ = daemon.stop_browse(SERVICE_TYPE);
    let _ = daemon.shutdown();

    info!(count = found.len(), "mDNS browse finished");
    Ok(found)
}

/// Builds a discovery record from a resolved service.
///
/// Returns `None` when the announcement carried no usable address.
fn record_from(info: &ServiceInfo) -> Option<DiscoveredTivo> {
    let addresses = info.get_addresses();
    let address = addresses
        .iter()
        .find(|a| a.is_ipv4())
        .or_else(|| addresses.iter().next())?
        .to_string();

    let port = match info.get_port() {
        0 => TcpConfig::DEFAULT_PORT,
        port => port,
    };

    Some(DiscoveredTivo {
        address,
        name: instance_name(info.get_fullname()).to_string(),
        port,
        serial: info.get_property_val_str(TSN_PROPERTY).map(str::to_string),
    })
}

/// Extracts the instance name from an mDNS fullname.
///
/// # Examples
///
/// - `Living Room._tivo-remote._tcp.local.` → `Living Room`
fn instance_name(fullname: &str) -> &str {
    fullname.split('.').next().unwrap_or(fullname)
}
