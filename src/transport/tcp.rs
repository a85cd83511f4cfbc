// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! TCP transport for the box's line-based remote protocol.

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::debug;

use super::{Transport, TransportFactory};
use crate::error::TransportError;

/// Configuration for a [`TcpTransport`].
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use vmtivo::transport::TcpConfig;
///
/// let config = TcpConfig::new("192.168.1.40")
///     .with_timeout(Duration::from_secs(2));
///
/// assert_eq!(config.port(), TcpConfig::DEFAULT_PORT);
/// assert_eq!(config.timeout(), Duration::from_secs(2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TcpConfig {
    address: String,
    port: u16,
    timeout: Duration,
}

impl TcpConfig {
    /// The port the box listens on.
    pub const DEFAULT_PORT: u16 = 31339;

    /// Default bound for connects and reply waits.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(1500);

    /// Creates a configuration for a box at the given address.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            port: Self::DEFAULT_PORT,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Sets the TCP port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the bound for connects and reply waits.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The configured address.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// The configured port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// The configured timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// A [`Transport`] over a plain TCP connection.
///
/// Holds at most one connection at a time. Frames pushed by the box while a
/// reply is awaited still update the tracked channel number.
#[derive(Debug)]
pub struct TcpTransport {
    config: TcpConfig,
    stream: Option<BufReader<TcpStream>>,
    channel_number: Option<u32>,
}

impl TcpTransport {
    /// Creates a disconnected transport.
    #[must_use]
    pub fn new(config: TcpConfig) -> Self {
        Self {
            config,
            stream: None,
            channel_number: None,
        }
    }

    /// The configuration this transport was created with.
    #[must_use]
    pub fn config(&self) -> &TcpConfig {
        &self.config
    }

    async fn write_frame(&mut self, frame: &str) -> Result<(), TransportError> {
        let stream = self.stream.as_mut().ok_or(TransportError::NotConnected)?;
        debug!(frame, "sending frame");
        stream
            .write_all(frame.as_bytes())
            .await
            .map_err(map_io_error)?;
        stream.flush().await.map_err(map_io_error)?;
        Ok(())
    }

    /// Reads one `\r`-terminated frame, updating the tracked channel number.
    async fn read_frame(&mut self, wait: Duration) -> Result<String, TransportError> {
        let stream = self.stream.as_mut().ok_or(TransportError::NotConnected)?;
        let mut buf = Vec::new();
        let read = timeout(wait, stream.read_until(b'\r', &mut buf))
            .await
            .map_err(|_| TransportError::Timeout {
                waited_ms: u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
            })?
            .map_err(map_io_error)?;
        if read == 0 {
            return Err(TransportError::ConnectionReset);
        }

        let line = String::from_utf8_lossy(&buf).trim().to_string();
        debug!(frame = %line, "received frame");

        if let Some(channel) = parse_ch_status(&line) {
            self.channel_number = Some(channel);
        }
        if line.starts_with("INVALID") {
            return Err(TransportError::Protocol(line));
        }
        Ok(line)
    }
}

impl Transport for TcpTransport {
    async fn connect(&mut self) -> Result<(), TransportError> {
        if self.config.address().is_empty() {
            return Err(TransportError::InvalidAddress(String::from("empty")));
        }

        let wait = self.config.timeout();
        let stream = timeout(
            wait,
            TcpStream::connect((self.config.address(), self.config.port())),
        )
        .await
        .map_err(|_| TransportError::Timeout {
            waited_ms: u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
        })?
        .map_err(map_io_error)?;

        debug!(
            address = self.config.address(),
            port = self.config.port(),
            "connected"
        );
        self.stream = Some(BufReader::new(stream));
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<(), TransportError> {
        if let Some(mut stream) = self.stream.take() {
            if let Err(err) = stream.shutdown().await {
                debug!(error = %err, "socket shutdown failed");
            }
        }
        Ok(())
    }

    async fn send_ircode(
        &mut self,
        code: &str,
        wait_for_reply: bool,
    ) -> Result<(), TransportError> {
        self.write_frame(&format!("IRCODE {code}\r")).await?;
        if wait_for_reply {
            self.read_frame(self.config.timeout()).await?;
        }
        Ok(())
    }

    async fn send_teleport(&mut self, code: &str) -> Result<(), TransportError> {
        self.write_frame(&format!("TELEPORT {code}\r")).await
    }

    async fn wait_for_data(&mut self, wait: Duration) -> Result<(), TransportError> {
        self.read_frame(wait).await.map(|_| ())
    }

    fn channel_number(&self) -> Option<u32> {
        self.channel_number
    }
}

/// Extracts the channel number from a `CH_STATUS <channel> <reason>` frame.
fn parse_ch_status(line: &str) -> Option<u32> {
    let mut parts = line.split_ascii_whitespace();
    if parts.next() != Some("CH_STATUS") {
        return None;
    }
    parts.next()?.parse().ok()
}

fn map_io_error(err: std::io::Error) -> TransportError {
    match err.kind() {
        std::io::ErrorKind::ConnectionReset
        | std::io::ErrorKind::ConnectionAborted
        | std::io::ErrorKind::BrokenPipe => TransportError::ConnectionReset,
        _ => TransportError::Io(err),
    }
}

/// The production [`TransportFactory`]: one [`TcpTransport`] per device.
#[derive(Debug, Clone)]
pub struct TcpTransportFactory {
    timeout: Duration,
}

impl TcpTransportFactory {
    /// Creates a factory producing transports with the given timeout bound.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for TcpTransportFactory {
    fn default() -> Self {
        Self::new(TcpConfig::DEFAULT_TIMEOUT)
    }
}

impl TransportFactory for TcpTransportFactory {
    type Transport = TcpTransport;

    fn create(&self, address: &str, port: u16) -> TcpTransport {
        TcpTransport::new(
            TcpConfig::new(address)
                .with_port(port)
                .with_timeout(self.timeout),
        )
    }
}
