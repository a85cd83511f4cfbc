// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The setup wizard flow.
//!
//! A linear state machine keyed by the current step. Manual address entry
//! jumps straight to the connect step; otherwise discovery runs and either
//! fails, selects the single result, or asks the caller to pick one. The
//! connect step probes the box before anything is persisted, so a typo'd
//! address never lands in the registry.
//!
//! ```text
//! Init ──────────────► Connect ──► Complete
//!   │                    ▲  │
//!   └──► Discovery ──────┤  └────► Failed
//!           │  │         │
//!           │  └► SelectDevice
//!           └───► NoDevices
//! ```

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::{DeviceEntry, DeviceRegistry};
use crate::discovery::{self, DiscoveredTivo};
use crate::error::{Error, SetupError};
use crate::transport::{Transport, TransportFactory};

/// Steps of the setup flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupStep {
    /// Waiting for the first input (manual address or a discovery request).
    Init,
    /// Discovery is the next action.
    Discovery,
    /// Discovery found several boxes; one must be selected.
    SelectDevice,
    /// A candidate is chosen; probe and persist next.
    Connect,
    /// The device is configured.
    Complete,
    /// Discovery found nothing.
    NoDevices,
    /// The probe or persistence failed.
    Failed,
}

impl SetupStep {
    /// The step key, as exchanged with the hub.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Discovery => "discovery",
            Self::SelectDevice => "select_device",
            Self::Connect => "connect",
            Self::Complete => "complete",
            Self::NoDevices => "no_devices",
            Self::Failed => "failed",
        }
    }
}

/// Drives one pass through the setup wizard.
///
/// The flow holds no registry of its own; the caller passes one into
/// [`SetupFlow::connect_and_persist`] so setup and driver share the same
/// persisted state.
#[derive(Debug)]
pub struct SetupFlow<F> {
    factory: F,
    step: SetupStep,
    candidates: Vec<DiscoveredTivo>,
    selected: Option<DiscoveredTivo>,
}

impl<F: TransportFactory> SetupFlow<F> {
    /// Starts a fresh flow at the init step.
    #[must_use]
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            step: SetupStep::Init,
            candidates: Vec::new(),
            selected: None,
        }
    }

    /// The current step.
    #[must_use]
    pub fn step(&self) -> SetupStep {
        self.step
    }

    /// Resets the flow to the init step, discarding any candidates.
    pub fn rewind(&mut self) {
        self.step = SetupStep::Init;
        self.candidates.clear();
        self.selected = None;
    }

    /// Candidates offered for selection, in discovery order.
    #[must_use]
    pub fn candidates(&self) -> &[DiscoveredTivo] {
        &self.candidates
    }

    /// Accepts a manually entered address, skipping discovery.
    ///
    /// # Errors
    ///
    /// Fails with `SetupError::InvalidStep` outside the init step.
    pub fn enter_address(&mut self, address: &str, port: u16) -> Result<(), SetupError> {
        if self.step != SetupStep::Init {
            return Err(SetupError::InvalidStep(self.step.as_str()));
        }
        debug!(%address, port, "manual address entered");
        self.selected = Some(DiscoveredTivo {
            address: address.to_string(),
            name: address.to_string(),
            port,
            serial: None,
        });
        self.step = SetupStep::Connect;
        Ok(())
    }

    /// Runs discovery and advances according to what was found.
    ///
    /// # Errors
    ///
    /// Fails with `SetupError::InvalidStep` outside the init or discovery
    /// steps, and `SetupError::NotFound` when nothing answers; discovery
    /// startup failures surface as [`Error::Discovery`].
    pub async fn discover(&mut self, window: Duration) -> Result<(), Error> {
        if !matches!(self.step, SetupStep::Init | SetupStep::Discovery) {
            return Err(SetupError::InvalidStep(self.step.as_str()).into());
        }
        self.step = SetupStep::Discovery;
        let found = discovery::discover(window).await?;
        Ok(self.ingest_discovery(found)?)
    }

    /// Advances the flow with a finished discovery result.
    ///
    /// # Errors
    ///
    /// Fails with `SetupError::NotFound` when the result is empty.
    pub fn ingest_discovery(&mut self, found: Vec<DiscoveredTivo>) -> Result<(), SetupError> {
        match found.len() {
            0 => {
                self.step = SetupStep::NoDevices;
                Err(SetupError::NotFound)
            }
            1 => {
                self.selected = found.into_iter().next();
                self.step = SetupStep::Connect;
                Ok(())
            }
            _ => {
                self.candidates = found;
                self.step = SetupStep::SelectDevice;
                Ok(())
            }
        }
    }

    /// Selects one of the offered candidates by address.
    ///
    /// The flow stays at the selection step when the address does not match
    /// a candidate, so the caller can retry.
    ///
    /// # Errors
    ///
    /// Fails with `SetupError::InvalidStep` outside the selection step and
    /// `SetupError::NotFound` for an unknown address.
    pub fn select(&mut self, address: &str) -> Result<(), SetupError> {
        if self.step != SetupStep::SelectDevice {
            return Err(SetupError::InvalidStep(self.step.as_str()));
        }
        let Some(candidate) = self.candidates.iter().find(|c| c.address == address) else {
            warn!(%address, "selected address is not a candidate");
            return Err(SetupError::NotFound);
        };
        self.selected = Some(candidate.clone());
        self.step = SetupStep::Connect;
        Ok(())
    }

    /// Probes the selected box and persists it to the registry.
    ///
    /// A box already present in the registry is still probed but not
    /// duplicated. Returns the persisted entry.
    ///
    /// # Errors
    ///
    /// Fails with `SetupError::InvalidStep` outside the connect step,
    /// `SetupError::NotFound` when the probe fails, and [`Error::Config`]
    /// when the registry cannot be written.
    pub async fn connect_and_persist(
        &mut self,
        registry: &mut DeviceRegistry,
    ) -> Result<DeviceEntry, Error> {
        if self.step != SetupStep::Connect {
            return Err(SetupError::InvalidStep(self.step.as_str()).into());
        }
        let Some(candidate) = self.selected.clone() else {
            return Err(SetupError::InvalidStep(self.step.as_str()).into());
        };

        let mut transport = self.factory.create(&candidate.address, candidate.port);
        if let Err(err) = transport.connect().await {
            warn!(address = %candidate.address, port = candidate.port, error = %err, "probe failed");
            self.step = SetupStep::Failed;
            return Err(SetupError::NotFound.into());
        }
        let _ = transport.disconnect().await;

        let mut entry = DeviceEntry::new(&candidate.address, format!("{} TiVo", candidate.name))
            .with_port(candidate.port);
        if let Some(serial) = &candidate.serial {
            entry = entry.with_serial(serial);
        }
        registry.add(entry.clone()).map_err(Error::from)?;

        info!(
            address = %candidate.address,
            port = candidate.port,
            "successfully configured device"
        );
        self.step = SetupStep::Complete;
        Ok(entry)
    }
}
