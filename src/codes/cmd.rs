// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Logical command identifiers.
//!
//! The hub addresses commands by string id. The standard vocabulary follows
//! the hub's remote/media-player naming; everything else is a vendor-defined
//! simple command.

/// Power on.
pub const ON: &str = "on";
/// Power off (standby).
pub const OFF: &str = "off";
/// Send a single raw command; the target id rides in the parameters.
pub const SEND_CMD: &str = "send_cmd";
/// Send an ordered list of raw commands.
pub const SEND_CMD_SEQUENCE: &str = "send_cmd_sequence";

/// Back/exit.
pub const BACK: &str = "back";
/// Channel down.
pub const CHANNEL_DOWN: &str = "channel_down";
/// Channel up.
pub const CHANNEL_UP: &str = "channel_up";
/// D-pad down.
pub const CURSOR_DOWN: &str = "cursor_down";
/// D-pad select.
pub const CURSOR_ENTER: &str = "cursor_enter";
/// D-pad left.
pub const CURSOR_LEFT: &str = "cursor_left";
/// D-pad right.
pub const CURSOR_RIGHT: &str = "cursor_right";
/// D-pad up.
pub const CURSOR_UP: &str = "cursor_up";
/// Digit 0.
pub const DIGIT_0: &str = "digit_0";
/// Digit 1.
pub const DIGIT_1: &str = "digit_1";
/// Digit 2.
pub const DIGIT_2: &str = "digit_2";
/// Digit 3.
pub const DIGIT_3: &str = "digit_3";
/// Digit 4.
pub const DIGIT_4: &str = "digit_4";
/// Digit 5.
pub const DIGIT_5: &str = "digit_5";
/// Digit 6.
pub const DIGIT_6: &str = "digit_6";
/// Digit 7.
pub const DIGIT_7: &str = "digit_7";
/// Digit 8.
pub const DIGIT_8: &str = "digit_8";
/// Digit 9.
pub const DIGIT_9: &str = "digit_9";
/// Fast-forward.
pub const FAST_FORWARD: &str = "fast_forward";
/// Blue function key.
pub const FUNCTION_BLUE: &str = "function_blue";
/// Green function key.
pub const FUNCTION_GREEN: &str = "function_green";
/// Red function key.
pub const FUNCTION_RED: &str = "function_red";
/// Yellow function key.
pub const FUNCTION_YELLOW: &str = "function_yellow";
/// Programme guide.
pub const GUIDE: &str = "guide";
/// Home screen.
pub const HOME: &str = "home";
/// Programme info.
pub const INFO: &str = "info";
/// Jump to live TV.
pub const LIVE: &str = "live";
/// Menu (recordings screen on this box).
pub const MENU: &str = "menu";
/// Recordings list.
pub const MY_RECORDINGS: &str = "my_recordings";
/// Toggle play/pause.
pub const PLAY_PAUSE: &str = "play_pause";
/// Previous (enter key on this box).
pub const PREVIOUS: &str = "previous";
/// Record the current programme.
pub const RECORD: &str = "record";
/// Rewind.
pub const REWIND: &str = "rewind";
/// Stop playback.
pub const STOP: &str = "stop";

/// Vendor simple command: clear on-screen banners.
pub const CLEAR: &str = "CLEAR";
/// Vendor simple command: pause without toggling.
pub const PAUSE: &str = "PAUSE";
/// Vendor simple command: resume without toggling.
pub const PLAY: &str = "PLAY";
/// Vendor simple command: thumbs down rating.
pub const THUMBSDOWN: &str = "THUMBSDOWN";
/// Vendor simple command: thumbs up rating.
pub const THUMBSUP: &str = "THUMBSUP";

/// The hub's standard remote vocabulary. Table ids outside this list are
/// registered with the hub as simple commands.
pub const STANDARD: &[&str] = &[
    ON,
    OFF,
    BACK,
    CHANNEL_DOWN,
    CHANNEL_UP,
    CURSOR_DOWN,
    CURSOR_ENTER,
    CURSOR_LEFT,
    CURSOR_RIGHT,
    CURSOR_UP,
    DIGIT_0,
    DIGIT_1,
    DIGIT_2,
    DIGIT_3,
    DIGIT_4,
    DIGIT_5,
    DIGIT_6,
    DIGIT_7,
    DIGIT_8,
    DIGIT_9,
    FAST_FORWARD,
    FUNCTION_BLUE,
    FUNCTION_GREEN,
    FUNCTION_RED,
    FUNCTION_YELLOW,
    GUIDE,
    HOME,
    INFO,
    LIVE,
    MENU,
    MY_RECORDINGS,
    PLAY_PAUSE,
    PREVIOUS,
    RECORD,
    REWIND,
    STOP,
];

/// Returns `true` if the id is a digit-entry command.
///
/// Reply timeouts on these are expected while the box is mid channel entry,
/// so the dispatcher treats them as ignorable.
#[must_use]
pub fn is_digit(cmd_id: &str) -> bool {
    let digit = cmd_id
        .strip_prefix("digit_")
        .or_else(|| cmd_id.strip_prefix("num"));
    digit.is_some_and(|d| d.len() == 1 && d.as_bytes()[0].is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digit_ids() {
        assert!(is_digit(DIGIT_0));
        assert!(is_digit(DIGIT_9));
        assert!(is_digit("num5"));
        assert!(!is_digit("digit_x"));
        assert!(!is_digit("digit_10"));
        assert!(!is_digit(CHANNEL_UP));
        assert!(!is_digit("number"));
    }

    #[test]
    fn standard_vocabulary_has_no_duplicates() {
        let mut seen = std::collections::HashSet::new();
        for id in STANDARD {
            assert!(seen.insert(*id), "duplicate standard id: {id}");
        }
    }
}
