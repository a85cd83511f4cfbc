// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tracked playback mode for a TiVo box.

use std::fmt;

use crate::codes::cmd;

/// The tracked playback mode of a device.
///
/// This is internal bookkeeping, distinct from the published
/// [`PowerState`](super::PowerState) attribute. It decides whether a
/// play/pause toggle should resume instead of pause, and whether IR
/// acknowledgements are considered reliable.
///
/// There are exactly two writers: the dispatcher after a successful command,
/// via [`PlaybackMode::after_command`], and the poller's connection-reset
/// inference. There is no terminal mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlaybackMode {
    /// Watching live TV. The baseline mode.
    #[default]
    Live,
    /// Playback is paused.
    Paused,
    /// Fast-forwarding or rewinding.
    Speeding,
    /// Parked on a DVR screen that suppresses data pushes.
    Dvr,
}

impl PlaybackMode {
    /// Returns the mode a successfully dispatched command forces, if any.
    ///
    /// This is the full transition table. Commands not listed here leave the
    /// mode untouched.
    #[must_use]
    pub fn after_command(cmd_id: &str) -> Option<Self> {
        match cmd_id {
            cmd::LIVE | cmd::PLAY | cmd::STOP => Some(Self::Live),
            cmd::FAST_FORWARD | cmd::REWIND => Some(Self::Speeding),
            cmd::PLAY_PAUSE => Some(Self::Paused),
            _ => None,
        }
    }

    /// Returns `true` if this is the live-TV baseline mode.
    #[must_use]
    pub const fn is_live(&self) -> bool {
        matches!(self, Self::Live)
    }

    /// Returns a short lowercase name for logging.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Paused => "paused",
            Self::Speeding => "speeding",
            Self::Dvr => "dvr",
        }
    }
}

impl fmt::Display for PlaybackMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
