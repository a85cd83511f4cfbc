// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The per-device dispatch handle.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::codes::{CodeDefinition, CodeKind, CommandTable, cmd};
use crate::error::DispatchError;
use crate::event::{DeviceEvent, DeviceId, EventBus};
use crate::state::{DeviceRuntimeState, PlaybackMode, PowerState};
use crate::transport::Transport;

use super::{DispatchParams, EntityFlavour};

/// How long a state probe blocks waiting for a push frame.
const STATE_PROBE_WAIT: Duration = Duration::from_millis(1500);

/// How a successful dispatch completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The code went out and, where required, was acknowledged.
    Sent,
    /// A reply timeout on a digit command was swallowed; the box holds
    /// acknowledgements while a channel number is half-entered.
    SuppressedTimeout,
}

impl DispatchOutcome {
    /// Returns `true` if a reply timeout was suppressed.
    #[must_use]
    pub fn is_suppressed(&self) -> bool {
        matches!(self, Self::SuppressedTimeout)
    }
}

#[derive(Debug)]
struct Inner<T> {
    transport: T,
    state: DeviceRuntimeState,
    channel: Option<u32>,
}

/// One configured box: its transport, tracked state, and command table.
///
/// The transport and the runtime state live behind a single mutex, so a
/// dispatch and a poll cycle for the same box never interleave
/// mid-transaction. Across different handles everything runs in parallel.
///
/// Attribute changes (power, mode, channel) publish on the shared
/// [`EventBus`] as they happen.
#[derive(Debug)]
pub struct TivoHandle<T> {
    device_id: DeviceId,
    flavour: EntityFlavour,
    table: CommandTable,
    bus: EventBus,
    inner: Mutex<Inner<T>>,
}

impl<T: Transport> TivoHandle<T> {
    /// Creates a handle for one configured box.
    #[must_use]
    pub fn new(device_id: DeviceId, flavour: EntityFlavour, transport: T, bus: EventBus) -> Self {
        Self {
            device_id,
            flavour,
            table: flavour.command_table(),
            bus,
            inner: Mutex::new(Inner {
                transport,
                state: DeviceRuntimeState::new(),
                channel: None,
            }),
        }
    }

    /// The device this handle drives.
    #[must_use]
    pub fn device_id(&self) -> DeviceId {
        self.device_id
    }

    /// The entity flavour this handle serves.
    #[must_use]
    pub fn flavour(&self) -> EntityFlavour {
        self.flavour
    }

    /// The command table in force.
    #[must_use]
    pub fn table(&self) -> &CommandTable {
        &self.table
    }

    /// The last published power attribute.
    pub async fn power(&self) -> PowerState {
        self.inner.lock().await.state.power()
    }

    /// The tracked playback mode.
    pub async fn mode(&self) -> PlaybackMode {
        self.inner.lock().await.state.mode()
    }

    /// The last surfaced channel number, if any.
    pub async fn channel_number(&self) -> Option<u32> {
        self.inner.lock().await.channel
    }

    /// Dispatches a logical command.
    ///
    /// `params.repeat` repeats the whole dispatch; the returned outcome is
    /// the last round's. Sequence dispatches run their elements strictly in
    /// order and stop at the first failure, so the prefix before a failing
    /// element has already taken effect.
    ///
    /// # Errors
    ///
    /// `DispatchError::UnsupportedCommand` for ids outside the table,
    /// `MissingCommand`/`EmptySequence` for malformed raw-send parameters,
    /// and `ServiceUnavailable` when the transport fails. Tracked state is
    /// left unchanged on every error path.
    pub async fn dispatch(
        &self,
        cmd_id: &str,
        params: &DispatchParams,
    ) -> Result<DispatchOutcome, DispatchError> {
        let mut outcome = DispatchOutcome::Sent;
        for _ in 0..params.repeat() {
            outcome = self.dispatch_once(cmd_id, params).await?;
        }
        Ok(outcome)
    }

    async fn dispatch_once(
        &self,
        cmd_id: &str,
        params: &DispatchParams,
    ) -> Result<DispatchOutcome, DispatchError> {
        if cmd_id == cmd::SEND_CMD_SEQUENCE {
            if params.sequence().is_empty() {
                return Err(DispatchError::EmptySequence);
            }
            let mut outcome = DispatchOutcome::Sent;
            for target in params.sequence() {
                outcome = self
                    .dispatch_leaf(cmd::SEND_CMD, &params.sequence_element(target))
                    .await?;
            }
            return Ok(outcome);
        }
        self.dispatch_leaf(cmd_id, params).await
    }

    async fn dispatch_leaf(
        &self,
        cmd_id: &str,
        params: &DispatchParams,
    ) -> Result<DispatchOutcome, DispatchError> {
        let result = self.execute(cmd_id, params).await;
        // Rate-limiting courtesy to the box; applies on failure too.
        if let Some(delay) = params.delay() {
            sleep(delay).await;
        }
        result
    }

    async fn execute(
        &self,
        cmd_id: &str,
        params: &DispatchParams,
    ) -> Result<DispatchOutcome, DispatchError> {
        let target = if cmd_id == cmd::SEND_CMD {
            params.command().ok_or(DispatchError::MissingCommand)?
        } else {
            cmd_id
        };

        let mut inner = self.inner.lock().await;

        let mut effective = target;
        let mut definition = *self
            .table
            .lookup(target)
            .ok_or_else(|| DispatchError::UnsupportedCommand(target.to_string()))?;

        // Pausing only makes sense at the live baseline; off baseline the
        // toggle resumes instead.
        if target == cmd::PLAY_PAUSE && !inner.state.mode().is_live() {
            if let Some(play) = self.table.lookup(cmd::PLAY) {
                effective = cmd::PLAY;
                definition = *play;
            }
        }

        // IR acknowledgement is only reliable at the live baseline.
        let wait_for_reply = match definition.kind() {
            CodeKind::IrCode => definition.wait() && inner.state.mode().is_live(),
            CodeKind::Teleport => false,
        };

        let outcome = self
            .run_scoped(&mut inner, effective, &definition, wait_for_reply)
            .await?;

        let mode_before = inner.state.mode();
        let mut changed = false;
        if let Some(power) = definition.resulting_power() {
            changed |= inner.state.set_power(power);
        }
        inner.state.apply_command(effective);
        changed |= inner.state.mode() != mode_before;

        if self.flavour.surfaces_channel() {
            let channel = inner.transport.channel_number();
            if channel != inner.channel {
                inner.channel = channel;
                changed = true;
            }
        }

        if changed {
            self.publish(&inner);
        }
        Ok(outcome)
    }

    /// Runs the definition's repeats under one scoped connection.
    async fn run_scoped(
        &self,
        inner: &mut Inner<T>,
        target: &str,
        definition: &CodeDefinition,
        wait_for_reply: bool,
    ) -> Result<DispatchOutcome, DispatchError> {
        if let Err(err) = inner.transport.connect().await {
            let _ = inner.transport.disconnect().await;
            return Err(DispatchError::ServiceUnavailable(err));
        }

        let mut outcome = DispatchOutcome::Sent;
        for round in 0..definition.repeat() {
            if round > 0 {
                if let Some(pause) = definition.wait_repeat() {
                    sleep(pause).await;
                }
            }

            let sent = match definition.kind() {
                CodeKind::IrCode => {
                    inner
                        .transport
                        .send_ircode(definition.code(), wait_for_reply)
                        .await
                }
                CodeKind::Teleport => inner.transport.send_teleport(definition.code()).await,
            };

            match sent {
                Ok(()) => {}
                Err(err) if wait_for_reply && err.is_timeout() && cmd::is_digit(target) => {
                    // Mid channel entry the box holds replies back.
                    debug!(
                        device_id = %self.device_id,
                        command = target,
                        "digit reply timeout suppressed"
                    );
                    outcome = DispatchOutcome::SuppressedTimeout;
                    break;
                }
                Err(err) => {
                    let _ = inner.transport.disconnect().await;
                    return Err(DispatchError::ServiceUnavailable(err));
                }
            }
        }

        let _ = inner.transport.disconnect().await;
        Ok(outcome)
    }

    /// Queries the box for its power state and republishes changed
    /// attributes.
    ///
    /// A box that pushes data within the probe window is active. A
    /// connection reset from a box previously seen on means it is parked on
    /// a DVR screen that suppresses pushes; a reset from a box previously
    /// off, or a silent probe, means standby. Every other failure reports
    /// `Unknown` and is logged, never propagated.
    pub async fn query_state(&self) -> PowerState {
        let mut inner = self.inner.lock().await;

        let probed = match inner.transport.connect().await {
            Ok(()) => inner.transport.wait_for_data(STATE_PROBE_WAIT).await,
            Err(err) => Err(err),
        };
        let _ = inner.transport.disconnect().await;

        let mode_before = inner.state.mode();
        let power = match probed {
            Ok(()) => self.flavour.active_power(),
            Err(err) if err.is_connection_reset() => {
                if inner.state.power() == PowerState::Off {
                    PowerState::Off
                } else {
                    inner.state.set_mode(PlaybackMode::Dvr);
                    PowerState::On
                }
            }
            Err(err) if err.is_timeout() => PowerState::Off,
            Err(err) => {
                warn!(device_id = %self.device_id, error = %err, "state query failed");
                PowerState::Unknown
            }
        };

        let mut changed = inner.state.set_power(power);
        changed |= inner.state.mode() != mode_before;

        if self.flavour.surfaces_channel() {
            let channel = inner.transport.channel_number();
            if channel != inner.channel {
                inner.channel = channel;
                changed = true;
            }
        }

        if changed {
            self.publish(&inner);
        }
        power
    }

    fn publish(&self, inner: &Inner<T>) {
        self.bus.publish(DeviceEvent::attributes_changed(
            self.device_id,
            inner.state.power(),
            inner.state.mode(),
            if self.flavour.surfaces_channel() {
                inner.channel
            } else {
                None
            },
        ));
    }
}
