// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mutable per-device runtime state.

use super::{PlaybackMode, PowerState};

/// The mutable runtime state of one configured device.
///
/// Created when the device is added, destroyed when it is removed, and owned
/// behind that device's mutex. It is never shared across devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceRuntimeState {
    power: PowerState,
    mode: PlaybackMode,
}

impl DeviceRuntimeState {
    /// Creates fresh runtime state: power unknown, mode at the live baseline.
    #[must_use]
    pub fn new() -> Self {
        Self {
            power: PowerState::Unknown,
            mode: PlaybackMode::Live,
        }
    }

    /// The last published power attribute.
    #[must_use]
    pub fn power(&self) -> PowerState {
        self.power
    }

    /// The tracked playback mode.
    #[must_use]
    pub fn mode(&self) -> PlaybackMode {
        self.mode
    }

    /// Records a new power attribute, returning `true` if it changed.
    pub fn set_power(&mut self, power: PowerState) -> bool {
        let changed = self.power != power;
        self.power = power;
        changed
    }

    /// Forces the tracked mode.
    pub fn set_mode(&mut self, mode: PlaybackMode) {
        self.mode = mode;
    }

    /// Applies the command-triggered transition for a successfully
    /// dispatched command, if the transition table lists one.
    pub fn apply_command(&mut self, cmd_id: &str) {
        if let Some(mode) = PlaybackMode::after_command(cmd_id) {
            self.mode = mode;
        }
    }
}

impl Default for DeviceRuntimeState {
    fn default() -> Self {
        Self::new()
    }
}
