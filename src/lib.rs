// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `vmtivo` - A Rust library to control Virgin Media TiVo set-top boxes.
//!
//! The boxes speak a small line-based TCP protocol on port 31339. This
//! library wraps that protocol in a driver suitable for a remote-control
//! hub: commands dispatch through per-device handles, a background poller
//! infers power state, and attribute changes flow out over a broadcast
//! event bus.
//!
//! # Supported Features
//!
//! - **Command dispatch**: IR codes and teleports, raw sends, sequences,
//!   repeats and delays
//! - **State tracking**: power and playback-mode inference, channel number
//! - **Background polling**: cancellable per-device poll loops
//! - **Discovery**: mDNS browse for boxes on the local network
//! - **Setup flow**: manual entry or discovery, probe before persist
//!
//! # Quick Start
//!
//! ```no_run
//! use vmtivo::codes::cmd;
//! use vmtivo::dispatch::{DispatchParams, EntityFlavour};
//! use vmtivo::driver::TivoDriver;
//! use vmtivo::transport::TcpTransportFactory;
//!
//! #[tokio::main]
//! async fn main() -> vmtivo::Result<()> {
//!     let mut driver = TivoDriver::new(
//!         TcpTransportFactory::default(),
//!         EntityFlavour::Remote,
//!         "/var/lib/vmtivo",
//!     )?;
//!
//!     // React to lifecycle and attribute events.
//!     let mut events = driver.subscribe();
//!
//!     // Poll every configured box while the hub is connected.
//!     driver.start_polling();
//!
//!     for id in driver.device_ids() {
//!         driver.dispatch(id, cmd::GUIDE, &DispatchParams::new()).await?;
//!     }
//!
//!     if let Ok(event) = events.recv().await {
//!         println!("{event:?}");
//!     }
//!
//!     driver.stop_polling().await;
//!     Ok(())
//! }
//! ```
//!
//! # Setup
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use vmtivo::config::DeviceRegistry;
//! use vmtivo::setup::SetupFlow;
//! use vmtivo::transport::TcpTransportFactory;
//!
//! #[tokio::main]
//! async fn main() -> vmtivo::Result<()> {
//!     let mut registry = DeviceRegistry::new("/var/lib/vmtivo");
//!     registry.load().map_err(vmtivo::Error::Config)?;
//!
//!     let mut flow = SetupFlow::new(TcpTransportFactory::default());
//!     flow.discover(Duration::from_secs(10)).await?;
//!     if let Some(first) = flow.candidates().first() {
//!         let address = first.address.clone();
//!         flow.select(&address).map_err(vmtivo::Error::Setup)?;
//!     }
//!     let entry = flow.connect_and_persist(&mut registry).await?;
//!     println!("configured {}", entry.name);
//!     Ok(())
//! }
//! ```

pub mod codes;
pub mod config;
pub mod discovery;
pub mod dispatch;
pub mod driver;
pub mod entity;
pub mod error;
pub mod event;
pub mod poller;
pub mod setup;
pub mod state;
pub mod transport;

pub use codes::{CodeDefinition, CodeKind, CommandTable};
pub use config::{DeviceEntry, DeviceRegistry};
pub use discovery::DiscoveredTivo;
pub use dispatch::{DispatchOutcome, DispatchParams, EntityFlavour, TivoHandle};
pub use driver::TivoDriver;
pub use entity::{MediaPlayerEntity, RemoteEntity, StatusCode};
pub use error::{
    ConfigError, DiscoveryError, DispatchError, Error, Result, SetupError, TransportError,
};
pub use event::{DeviceEvent, DeviceId, EventBus};
pub use poller::StatePoller;
pub use setup::{SetupFlow, SetupStep};
pub use state::{PlaybackMode, PowerState};
pub use transport::{TcpConfig, TcpTransport, TcpTransportFactory, Transport, TransportFactory};
