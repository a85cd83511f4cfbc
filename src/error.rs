// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `vmtivo` library.
//!
//! This module provides the error hierarchy for failures across the library:
//! transport communication, command dispatch, device registry persistence,
//! and network discovery.

use thiserror::Error;

/// The main error type for this library.
///
/// This enum encompasses all possible errors that can occur when interacting
/// with Virgin Media TiVo devices.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred while talking to the device over the network.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Error occurred while dispatching a command.
    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    /// Error occurred while loading or saving the device registry.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Error occurred during network discovery.
    #[error("discovery error: {0}")]
    Discovery(#[from] DiscoveryError),

    /// Error occurred during the setup flow.
    #[error("setup error: {0}")]
    Setup(#[from] SetupError),

    /// Device was not found in the driver.
    #[error("device not found")]
    DeviceNotFound,
}

/// Errors raised by the device transport.
///
/// The dispatcher and the poller rely on `ConnectionReset` and `Timeout`
/// being distinguishable from the generic categories; both carry their own
/// meaning in the state-inference rules.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The device reset the connection.
    #[error("connection reset by device")]
    ConnectionReset,

    /// No reply or data arrived within the bounded wait.
    #[error("timed out after {waited_ms} ms")]
    Timeout {
        /// How long was waited before giving up.
        waited_ms: u64,
    },

    /// The device sent something the protocol does not allow.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Underlying socket failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An operation required an open connection.
    #[error("not connected")]
    NotConnected,

    /// The configured address could not be used.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

impl TransportError {
    /// Returns `true` if this error is a reply/data timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Returns `true` if the device reset the connection.
    #[must_use]
    pub fn is_connection_reset(&self) -> bool {
        matches!(self, Self::ConnectionReset)
    }
}

/// Errors surfaced by the command dispatcher.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The logical command id has no entry in the command table.
    #[error("unsupported command: {0}")]
    UnsupportedCommand(String),

    /// A command sequence was dispatched with no elements.
    #[error("command sequence is empty")]
    EmptySequence,

    /// A raw-send dispatch did not carry the nested command parameter.
    #[error("send_cmd requires a command parameter")]
    MissingCommand,

    /// The transport failed; the tracked state was left unchanged.
    #[error("device unavailable: {0}")]
    ServiceUnavailable(#[source] TransportError),
}

/// Errors related to the persisted device registry.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading or writing the registry file failed.
    #[error("registry I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The registry file is not valid JSON.
    #[error("malformed registry: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors related to mDNS discovery.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The browse could not be started.
    #[error("failed to start mDNS browse: {0}")]
    Browse(String),
}

/// Errors raised by the interactive setup flow.
#[derive(Debug, Error)]
pub enum SetupError {
    /// No device was found, or the selected device could not be reached.
    #[error("no device found")]
    NotFound,

    /// The flow was driven out of order.
    #[error("invalid setup step: {0}")]
    InvalidStep(&'static str),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
