// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transport implementations for talking to a TiVo box.
//!
//! The box speaks a small line-based TCP protocol on port 31339: the hub
//! writes `IRCODE <code>\r` and `TELEPORT <code>\r` frames, and the box
//! pushes `CH_STATUS <channel> <reason>` frames whenever the channel
//! changes. [`TcpTransport`] is the production implementation; the
//! [`Transport`] trait is the seam the dispatcher and poller are written
//! against.
//!
//! Connections are scoped: callers acquire one for a single dispatch or
//! poll cycle and close it on every exit path.

mod tcp;

pub use tcp::{TcpConfig, TcpTransport, TcpTransportFactory};

use std::future::Future;
use std::time::Duration;

use crate::error::TransportError;

/// The protocol client seam.
///
/// All waits are bounded by timeouts supplied by the implementation; no
/// method may block indefinitely. Methods are declared as `Send` futures so
/// the poller can run them from a spawned task; implementations write plain
/// `async fn`s.
pub trait Transport {
    /// Opens the connection to the box.
    ///
    /// Fails with a `TransportError` if the box cannot be reached within
    /// the configured timeout.
    fn connect(&mut self) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Closes the connection. Safe to call when already closed.
    fn disconnect(&mut self) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Sends an IR code, optionally blocking for the reply frame.
    ///
    /// Fails with a `TransportError` if the write fails or, with
    /// `wait_for_reply`, no reply arrives in time.
    fn send_ircode(
        &mut self,
        code: &str,
        wait_for_reply: bool,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Sends a teleport. Teleports are fire-and-forget.
    fn send_teleport(
        &mut self,
        code: &str,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Blocks until the box pushes any data frame, or the timeout elapses.
    ///
    /// Fails with `TransportError::Timeout` if nothing arrives, or
    /// `TransportError::ConnectionReset` if the box drops the connection.
    fn wait_for_data(
        &mut self,
        timeout: Duration,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// The last channel number observed in a `CH_STATUS` frame, if any.
    fn channel_number(&self) -> Option<u32>;
}

/// Creates transports for configured devices.
///
/// The driver holds one factory and calls it once per configured device;
/// tests substitute their own implementation.
pub trait TransportFactory: Send + Sync {
    /// The transport type this factory produces.
    type Transport: Transport + Send;

    /// Creates a transport for a device at the given address and port.
    fn create(&self, address: &str, port: u16) -> Self::Transport;
}
