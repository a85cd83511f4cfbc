// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The logical-command to wire-code table.

use std::collections::HashMap;
use std::time::Duration;

use super::{CodeDefinition, cmd};
use crate::state::PowerState;

/// Maps logical command ids to wire-level code definitions.
///
/// Built once from a preset, immutable afterwards. The two presets mirror
/// the two entity flavours: [`CommandTable::remote`] carries the full
/// vocabulary and mostly fires without waiting for replies, while
/// [`CommandTable::media_player`] is the conservative subset that blocks for
/// acknowledgements by default.
///
/// # Examples
///
/// ```
/// use vmtivo::codes::{CommandTable, cmd};
///
/// let table = CommandTable::remote();
/// let def = table.lookup(cmd::CHANNEL_UP).unwrap();
/// assert_eq!(def.code(), "ChannelUp");
/// assert!(table.lookup("warp_speed").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct CommandTable {
    entries: HashMap<&'static str, CodeDefinition>,
}

impl CommandTable {
    /// The permissive preset used by the remote entity flavour.
    ///
    /// Most entries skip the reply wait; digit entry, channel switching and
    /// select keep it because their acknowledgements are the only feedback
    /// the box gives.
    #[must_use]
    pub fn remote() -> Self {
        let entries = HashMap::from([
            (cmd::CLEAR, CodeDefinition::ircode("clear").no_wait()),
            (cmd::PAUSE, CodeDefinition::ircode("pause").no_wait()),
            (cmd::PLAY, CodeDefinition::ircode("play").no_wait()),
            (
                cmd::THUMBSDOWN,
                CodeDefinition::ircode("thumbsdown").no_wait(),
            ),
            (cmd::THUMBSUP, CodeDefinition::ircode("thumbsup").no_wait()),
            (cmd::BACK, CodeDefinition::ircode("Exit")),
            (cmd::CHANNEL_DOWN, CodeDefinition::ircode("ChannelDown")),
            (cmd::CHANNEL_UP, CodeDefinition::ircode("ChannelUp")),
            (cmd::CURSOR_DOWN, CodeDefinition::ircode("Down").no_wait()),
            (cmd::CURSOR_ENTER, CodeDefinition::ircode("Select")),
            (cmd::CURSOR_LEFT, CodeDefinition::ircode("Left").no_wait()),
            (cmd::CURSOR_RIGHT, CodeDefinition::ircode("Right").no_wait()),
            (cmd::CURSOR_UP, CodeDefinition::ircode("Up").no_wait()),
            (cmd::DIGIT_0, CodeDefinition::ircode("num0")),
            (cmd::DIGIT_1, CodeDefinition::ircode("num1")),
            (cmd::DIGIT_2, CodeDefinition::ircode("num2")),
            (cmd::DIGIT_3, CodeDefinition::ircode("num3")),
            (cmd::DIGIT_4, CodeDefinition::ircode("num4")),
            (cmd::DIGIT_5, CodeDefinition::ircode("num5")),
            (cmd::DIGIT_6, CodeDefinition::ircode("num6")),
            (cmd::DIGIT_7, CodeDefinition::ircode("num7")),
            (cmd::DIGIT_8, CodeDefinition::ircode("num8")),
            (cmd::DIGIT_9, CodeDefinition::ircode("num9")),
            (
                cmd::FAST_FORWARD,
                CodeDefinition::ircode("Forward").no_wait(),
            ),
            (
                cmd::FUNCTION_BLUE,
                CodeDefinition::ircode("Action_D").no_wait(),
            ),
            (
                cmd::FUNCTION_GREEN,
                CodeDefinition::ircode("Action_B").no_wait(),
            ),
            (
                cmd::FUNCTION_RED,
                CodeDefinition::ircode("Action_A").no_wait(),
            ),
            (
                cmd::FUNCTION_YELLOW,
                CodeDefinition::ircode("Action_C").no_wait(),
            ),
            (cmd::GUIDE, CodeDefinition::ircode("Guide").no_wait()),
            (cmd::HOME, CodeDefinition::teleport("TIVO")),
            (cmd::INFO, CodeDefinition::ircode("Info").no_wait()),
            (cmd::LIVE, CodeDefinition::teleport("LIVETV")),
            (cmd::MY_RECORDINGS, CodeDefinition::teleport("NOWPLAYING")),
            (
                cmd::OFF,
                CodeDefinition::ircode("Standby")
                    .no_wait()
                    .with_repeat(2)
                    .with_wait_repeat(Duration::from_millis(300))
                    .with_power(PowerState::Off),
            ),
            (
                cmd::ON,
                CodeDefinition::ircode("Standby")
                    .no_wait()
                    .with_power(PowerState::On),
            ),
            (cmd::PLAY_PAUSE, CodeDefinition::ircode("Pause").no_wait()),
            (cmd::PREVIOUS, CodeDefinition::ircode("Enter").no_wait()),
            (cmd::RECORD, CodeDefinition::ircode("record").no_wait()),
            (cmd::REWIND, CodeDefinition::ircode("Reverse").no_wait()),
            (cmd::STOP, CodeDefinition::ircode("Stop").no_wait()),
        ]);
        Self { entries }
    }

    /// The conservative preset used by the media-player entity flavour.
    ///
    /// A smaller vocabulary; entries block for a reply unless the code is a
    /// standby toggle.
    #[must_use]
    pub fn media_player() -> Self {
        let entries = HashMap::from([
            (
                cmd::GUIDE,
                CodeDefinition::ircode("Guide").with_display_name("Guide"),
            ),
            (
                cmd::INFO,
                CodeDefinition::ircode("info").with_display_name("Info"),
            ),
            ("num0", CodeDefinition::ircode("num0").with_display_name("0")),
            ("num1", CodeDefinition::ircode("num1").with_display_name("1")),
            ("num2", CodeDefinition::ircode("num2").with_display_name("2")),
            ("num3", CodeDefinition::ircode("num3").with_display_name("3")),
            ("num4", CodeDefinition::ircode("num4").with_display_name("4")),
            ("num5", CodeDefinition::ircode("num5").with_display_name("5")),
            ("num6", CodeDefinition::ircode("num6").with_display_name("6")),
            ("num7", CodeDefinition::ircode("num7").with_display_name("7")),
            ("num8", CodeDefinition::ircode("num8").with_display_name("8")),
            ("num9", CodeDefinition::ircode("num9").with_display_name("9")),
            (
                cmd::RECORD,
                CodeDefinition::ircode("record").with_display_name("Record"),
            ),
            (
                "thumbsdown",
                CodeDefinition::ircode("thumbsdown").with_display_name("Thumbs Down"),
            ),
            (
                "thumbsup",
                CodeDefinition::ircode("thumbsup").with_display_name("Thumbs Up"),
            ),
            (cmd::CHANNEL_DOWN, CodeDefinition::ircode("ChannelDown")),
            (cmd::CHANNEL_UP, CodeDefinition::ircode("ChannelUp")),
            (cmd::CURSOR_DOWN, CodeDefinition::ircode("Down")),
            (cmd::CURSOR_ENTER, CodeDefinition::ircode("Select")),
            (cmd::CURSOR_LEFT, CodeDefinition::ircode("Left")),
            (cmd::CURSOR_RIGHT, CodeDefinition::ircode("Right")),
            (cmd::CURSOR_UP, CodeDefinition::ircode("Up")),
            (cmd::FAST_FORWARD, CodeDefinition::ircode("Forward")),
            (cmd::FUNCTION_BLUE, CodeDefinition::ircode("Action_D")),
            (cmd::FUNCTION_GREEN, CodeDefinition::ircode("Action_B")),
            (cmd::FUNCTION_RED, CodeDefinition::ircode("Action_A")),
            (cmd::FUNCTION_YELLOW, CodeDefinition::ircode("Action_C")),
            (cmd::HOME, CodeDefinition::teleport("TIVO")),
            (cmd::MENU, CodeDefinition::teleport("NOWPLAYING")),
            (
                cmd::OFF,
                CodeDefinition::ircode("Standby")
                    .no_wait()
                    .with_repeat(2)
                    .with_power(PowerState::Off),
            ),
            (
                cmd::ON,
                CodeDefinition::ircode("Standby")
                    .no_wait()
                    .with_power(PowerState::On),
            ),
            (cmd::PLAY_PAUSE, CodeDefinition::ircode("Pause")),
            (cmd::PREVIOUS, CodeDefinition::ircode("Enter")),
            (cmd::REWIND, CodeDefinition::ircode("Reverse")),
            (
                cmd::STOP,
                CodeDefinition::ircode("Stop").with_power(PowerState::Playing),
            ),
        ]);
        Self { entries }
    }

    /// Looks up a logical command id.
    #[must_use]
    pub fn lookup(&self, cmd_id: &str) -> Option<&CodeDefinition> {
        self.entries.get(cmd_id)
    }

    /// Returns `true` if the table maps the given id.
    #[must_use]
    pub fn contains(&self, cmd_id: &str) -> bool {
        self.entries.contains_key(cmd_id)
    }

    /// Iterates over all mapped ids.
    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }

    /// Iterates over the vendor-defined simple command ids.
    ///
    /// These are the mapped ids outside the hub's standard remote
    /// vocabulary; the entity layer registers them separately.
    pub fn simple_commands(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries
            .keys()
            .copied()
            .filter(|id| !cmd::STANDARD.contains(id))
    }

    /// Number of mapped ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table maps nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
