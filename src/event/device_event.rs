// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device event types.

use crate::state::{PlaybackMode, PowerState};

use super::DeviceId;

/// Events emitted by the driver and its per-device workers.
///
/// Lifecycle events track the configured-device set; attribute events carry
/// the tracked state after a dispatch or poll changed it. The host layer
/// subscribes and forwards attribute changes to the hub.
///
/// # Examples
///
/// ```
/// use vmtivo::event::{DeviceEvent, DeviceId};
/// use vmtivo::state::{PlaybackMode, PowerState};
///
/// let device_id = DeviceId::new();
///
/// let added = DeviceEvent::DeviceAdded { device_id };
/// let update = DeviceEvent::AttributesChanged {
///     device_id,
///     power: PowerState::On,
///     mode: PlaybackMode::Live,
///     channel: Some(105),
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceEvent {
    /// A device was added to the driver.
    DeviceAdded {
        /// The ID of the added device.
        device_id: DeviceId,
    },

    /// A device was removed from the driver.
    DeviceRemoved {
        /// The ID of the removed device.
        device_id: DeviceId,
    },

    /// The tracked attributes of a device changed.
    ///
    /// Emitted whenever a dispatch or a poll cycle moves the tracked power
    /// state, playback mode, or channel number.
    AttributesChanged {
        /// The ID of the device.
        device_id: DeviceId,
        /// The tracked power state.
        power: PowerState,
        /// The tracked playback mode.
        mode: PlaybackMode,
        /// The last observed channel number, if any.
        channel: Option<u32>,
    },
}

impl DeviceEvent {
    /// Returns the device ID associated with this event.
    #[must_use]
    pub fn device_id(&self) -> DeviceId {
        match self {
            Self::DeviceAdded { device_id }
            | Self::DeviceRemoved { device_id }
            | Self::AttributesChanged { device_id, .. } => *device_id,
        }
    }

    /// Returns `true` if this is a device lifecycle event (added/removed).
    #[must_use]
    pub fn is_lifecycle(&self) -> bool {
        matches!(self, Self::DeviceAdded { .. } | Self::DeviceRemoved { .. })
    }

    /// Returns `true` if this is an attribute change event.
    #[must_use]
    pub fn is_attribute_change(&self) -> bool {
        matches!(self, Self::AttributesChanged { .. })
    }

    /// Creates a device added event.
    #[must_use]
    pub fn device_added(device_id: DeviceId) -> Self {
        Self::DeviceAdded { device_id }
    }

    /// Creates a device removed event.
    #[must_use]
    pub fn device_removed(device_id: DeviceId) -> Self {
        Self::DeviceRemoved { device_id }
    }

    /// Creates an attribute change event.
    #[must_use]
    pub fn attributes_changed(
        device_id: DeviceId,
        power: PowerState,
        mode: PlaybackMode,
        channel: Option<u32>,
    ) -> Self {
        Self::AttributesChanged {
            device_id,
            power,
            mode,
            channel,
        }
    }
}
