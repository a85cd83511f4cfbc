// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Command dispatch against a single box.
//!
//! [`TivoHandle`] owns one device's transport and tracked state behind a
//! mutex, so dispatch and poll cycles for the same box never interleave.
//! Commands resolve through the flavour's [`CommandTable`]
//! (crate::codes::CommandTable) and run under a scoped connection: connect,
//! send, disconnect on every exit path.

mod handle;
mod params;

pub use handle::{DispatchOutcome, TivoHandle};
pub use params::DispatchParams;

use crate::codes::CommandTable;
use crate::state::PowerState;

/// The two entity flavours the hub can expose for a box.
///
/// The flavour selects the command-table preset, how an active box is
/// reported, and whether the channel number is surfaced as an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityFlavour {
    /// Remote entity: permissive table, simple-command vocabulary.
    Remote,
    /// Media-player entity: conservative table, channel attribute.
    MediaPlayer,
}

impl EntityFlavour {
    /// The command-table preset for this flavour.
    #[must_use]
    pub fn command_table(self) -> CommandTable {
        match self {
            Self::Remote => CommandTable::remote(),
            Self::MediaPlayer => CommandTable::media_player(),
        }
    }

    /// How an actively pushing box is reported by a state query.
    pub(crate) fn active_power(self) -> PowerState {
        match self {
            Self::Remote => PowerState::On,
            Self::MediaPlayer => PowerState::Playing,
        }
    }

    /// Whether the channel number is surfaced as an attribute.
    pub(crate) fn surfaces_channel(self) -> bool {
        matches!(self, Self::MediaPlayer)
    }
}
