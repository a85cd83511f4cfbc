// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wire-level code definitions.

use std::time::Duration;

use crate::state::PowerState;

/// How a code travels on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodeKind {
    /// An infrared-remote-equivalent key press, addressed symbolically.
    IrCode,
    /// A jump straight to a named screen or application.
    Teleport,
}

/// An immutable description of one wire-level code.
///
/// A definition carries everything the dispatcher needs: the symbolic code,
/// its transport kind, how often to repeat it, whether to block for a reply,
/// the pause between repeats, and the power attribute a successful send
/// implies.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use vmtivo::codes::{CodeDefinition, CodeKind};
/// use vmtivo::state::PowerState;
///
/// let off = CodeDefinition::ircode("Standby")
///     .no_wait()
///     .with_repeat(2)
///     .with_wait_repeat(Duration::from_millis(300))
///     .with_power(PowerState::Off);
///
/// assert_eq!(off.code(), "Standby");
/// assert_eq!(off.kind(), CodeKind::IrCode);
/// assert_eq!(off.repeat(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeDefinition {
    code: &'static str,
    kind: CodeKind,
    display_name: &'static str,
    repeat: u32,
    resulting_power: Option<PowerState>,
    wait: bool,
    wait_repeat: Option<Duration>,
}

impl CodeDefinition {
    /// Creates an IR code definition. Waits for a reply by default.
    #[must_use]
    pub const fn ircode(code: &'static str) -> Self {
        Self {
            code,
            kind: CodeKind::IrCode,
            display_name: "",
            repeat: 1,
            resulting_power: None,
            wait: true,
            wait_repeat: None,
        }
    }

    /// Creates a teleport definition. Teleports never wait for a reply.
    #[must_use]
    pub const fn teleport(code: &'static str) -> Self {
        Self {
            code,
            kind: CodeKind::Teleport,
            display_name: "",
            repeat: 1,
            resulting_power: None,
            wait: false,
            wait_repeat: None,
        }
    }

    /// Disables waiting for a protocol reply.
    #[must_use]
    pub const fn no_wait(mut self) -> Self {
        self.wait = false;
        self
    }

    /// Sets how many times the code is sent per dispatch. Must be at least 1.
    #[must_use]
    pub const fn with_repeat(mut self, repeat: u32) -> Self {
        self.repeat = repeat;
        self
    }

    /// Sets the pause between repeated sends.
    #[must_use]
    pub const fn with_wait_repeat(mut self, delay: Duration) -> Self {
        self.wait_repeat = Some(delay);
        self
    }

    /// Declares the power attribute a successful send implies.
    #[must_use]
    pub const fn with_power(mut self, power: PowerState) -> Self {
        self.resulting_power = Some(power);
        self
    }

    /// Sets the human-readable name shown by the hub.
    #[must_use]
    pub const fn with_display_name(mut self, name: &'static str) -> Self {
        self.display_name = name;
        self
    }

    /// The symbolic wire code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }

    /// The transport kind.
    #[must_use]
    pub const fn kind(&self) -> CodeKind {
        self.kind
    }

    /// The human-readable name, empty if none was set.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        self.display_name
    }

    /// How many times the code is sent per dispatch.
    #[must_use]
    pub const fn repeat(&self) -> u32 {
        self.repeat
    }

    /// The power attribute a successful send implies, if any.
    #[must_use]
    pub const fn resulting_power(&self) -> Option<PowerState> {
        self.resulting_power
    }

    /// Whether the sender should block for a protocol reply.
    #[must_use]
    pub const fn wait(&self) -> bool {
        self.wait
    }

    /// The pause between repeated sends, if any.
    #[must_use]
    pub const fn wait_repeat(&self) -> Option<Duration> {
        self.wait_repeat
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ircode_defaults() {
        let def = CodeDefinition::ircode("Select");
        assert_eq!(def.code(), "Select");
        assert_eq!(def.kind(), CodeKind::IrCode);
        assert_eq!(def.repeat(), 1);
        assert!(def.wait());
        assert!(def.wait_repeat().is_none());
        assert!(def.resulting_power().is_none());
        assert_eq!(def.display_name(), "");
    }

    #[test]
    fn teleport_never_waits() {
        let def = CodeDefinition::teleport("LIVETV");
        assert_eq!(def.kind(), CodeKind::Teleport);
        assert!(!def.wait());
    }

    #[test]
    fn builder_chain() {
        let def = CodeDefinition::ircode("Standby")
            .no_wait()
            .with_repeat(2)
            .with_wait_repeat(Duration::from_millis(300))
            .with_power(PowerState::Off)
            .with_display_name("Power Off");

        assert!(!def.wait());
        assert_eq!(def.repeat(), 2);
        assert_eq!(def.wait_repeat(), Some(Duration::from_millis(300)));
        assert_eq!(def.resulting_power(), Some(PowerState::Off));
        assert_eq!(def.display_name(), "Power Off");
    }
}
