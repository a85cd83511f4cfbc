// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Dispatch parameters.

use std::time::Duration;

/// Optional parameters riding alongside a dispatched command.
///
/// The hub passes these with every command invocation. `delay` is a
/// post-command pause applied after the transport work, success or failure.
/// `command` carries the target id for a raw send; `sequence` the ordered
/// ids for a sequence send. `repeat` repeats the whole dispatch.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use vmtivo::dispatch::DispatchParams;
///
/// let params = DispatchParams::new()
///     .with_delay(Duration::from_millis(200))
///     .with_repeat(3);
///
/// assert_eq!(params.repeat(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchParams {
    delay: Option<Duration>,
    hold: Option<Duration>,
    command: Option<String>,
    sequence: Vec<String>,
    repeat: u32,
}

impl DispatchParams {
    /// Creates empty parameters: no delay, no hold, single dispatch.
    #[must_use]
    pub fn new() -> Self {
        Self {
            delay: None,
            hold: None,
            command: None,
            sequence: Vec::new(),
            repeat: 1,
        }
    }

    /// Sets the post-command delay.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Sets the hold duration. Carried for sequence inheritance; the box
    /// protocol has no press-and-hold concept.
    #[must_use]
    pub fn with_hold(mut self, hold: Duration) -> Self {
        self.hold = Some(hold);
        self
    }

    /// Sets the target id for a raw send.
    #[must_use]
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    /// Sets the ordered target ids for a sequence send.
    #[must_use]
    pub fn with_sequence(mut self, sequence: Vec<String>) -> Self {
        self.sequence = sequence;
        self
    }

    /// Sets how many times the whole dispatch runs. Zero is treated as 1.
    #[must_use]
    pub fn with_repeat(mut self, repeat: u32) -> Self {
        self.repeat = repeat;
        self
    }

    /// The post-command delay, if any.
    #[must_use]
    pub fn delay(&self) -> Option<Duration> {
        self.delay
    }

    /// The hold duration, if any.
    #[must_use]
    pub fn hold(&self) -> Option<Duration> {
        self.hold
    }

    /// The raw-send target id, if any.
    #[must_use]
    pub fn command(&self) -> Option<&str> {
        self.command.as_deref()
    }

    /// The sequence target ids.
    #[must_use]
    pub fn sequence(&self) -> &[String] {
        &self.sequence
    }

    /// How many times the whole dispatch runs, at least 1.
    #[must_use]
    pub fn repeat(&self) -> u32 {
        self.repeat.max(1)
    }

    /// Derives the parameters for one element of a sequence dispatch.
    ///
    /// The element inherits delay and hold; repeat and the sequence itself
    /// do not carry over.
    #[must_use]
    pub fn sequence_element(&self, command: &str) -> Self {
        Self {
            delay: self.delay,
            hold: self.hold,
            command: Some(command.to_string()),
            sequence: Vec::new(),
            repeat: 1,
        }
    }
}

impl Default for DispatchParams {
    fn default() -> Self {
        Self::new()
    }
}
