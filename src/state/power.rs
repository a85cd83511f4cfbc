// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Published power attribute for a TiVo box.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The published power attribute of a device.
///
/// This is the coarse state the hub sees. The box offers no reliable state
/// query, so every value here is a best-effort inference from protocol
/// behaviour.
///
/// # Examples
///
/// ```
/// use vmtivo::state::PowerState;
///
/// assert_eq!(PowerState::On.as_str(), "ON");
/// assert!(PowerState::Playing.is_active());
/// assert!(!PowerState::Off.is_active());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PowerState {
    /// No inference could be made.
    #[default]
    Unknown,
    /// The box is in standby.
    Off,
    /// The box is on.
    On,
    /// The box is on and pushing channel data.
    Playing,
}

impl PowerState {
    /// Returns the attribute string published to the hub.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::Off => "OFF",
            Self::On => "ON",
            Self::Playing => "PLAYING",
        }
    }

    /// Returns `true` if the box is believed to be powered up.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::On | Self::Playing)
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn as_str_values() {
        assert_eq!(PowerState::Unknown.as_str(), "UNKNOWN");
        assert_eq!(PowerState::Off.as_str(), "OFF");
        assert_eq!(PowerState::On.as_str(), "ON");
        assert_eq!(PowerState::Playing.as_str(), "PLAYING");
    }

    #[test]
    fn default_is_unknown() {
        assert_eq!(PowerState::default(), PowerState::Unknown);
    }

    #[test]
    fn active_states() {
        assert!(PowerState::On.is_active());
        assert!(PowerState::Playing.is_active());
        assert!(!PowerState::Off.is_active());
        assert!(!PowerState::Unknown.is_active());
    }

    #[test]
    fn serializes_as_screaming_snake_case() {
        let json = serde_json::to_string(&PowerState::Playing).unwrap();
        assert_eq!(json, "\"PLAYING\"");
    }
}
