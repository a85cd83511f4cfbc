// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! UI descriptors for the remote entity.
//!
//! Pure data. The hub consumes these at registration time to lay out the
//! on-screen remote and to bind the physical buttons of its own handset;
//! nothing here touches the device.

use crate::codes::cmd;

/// Physical buttons on the hub's handset that can be bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhysicalButton {
    Back,
    Blue,
    ChannelDown,
    ChannelUp,
    DpadDown,
    DpadLeft,
    DpadMiddle,
    DpadRight,
    DpadUp,
    Green,
    Home,
    Next,
    Play,
    Prev,
    Red,
    Yellow,
}

impl PhysicalButton {
    /// Identifier the hub uses for this button.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Back => "BACK",
            Self::Blue => "BLUE",
            Self::ChannelDown => "CHANNEL_DOWN",
            Self::ChannelUp => "CHANNEL_UP",
            Self::DpadDown => "DPAD_DOWN",
            Self::DpadLeft => "DPAD_LEFT",
            Self::DpadMiddle => "DPAD_MIDDLE",
            Self::DpadRight => "DPAD_RIGHT",
            Self::DpadUp => "DPAD_UP",
            Self::Green => "GREEN",
            Self::Home => "HOME",
            Self::Next => "NEXT",
            Self::Play => "PLAY",
            Self::Prev => "PREV",
            Self::Red => "RED",
            Self::Yellow => "YELLOW",
        }
    }
}

/// A command reference inside a button mapping or UI item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityCommand {
    /// Logical command id to dispatch.
    pub cmd_id: &'static str,
    /// Nested command, for raw sends through `send_cmd`.
    pub command: Option<&'static str>,
}

impl EntityCommand {
    /// References a logical command directly.
    #[must_use]
    pub const fn simple(cmd_id: &'static str) -> Self {
        Self {
            cmd_id,
            command: None,
        }
    }

    /// References a vendor command routed through the raw-send path.
    #[must_use]
    pub const fn raw(command: &'static str) -> Self {
        Self {
            cmd_id: cmd::SEND_CMD,
            command: Some(command),
        }
    }
}

/// Binds one physical button to commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonMapping {
    pub button: PhysicalButton,
    pub short_press: EntityCommand,
    pub long_press: Option<EntityCommand>,
}

impl ButtonMapping {
    const fn short(button: PhysicalButton, short_press: EntityCommand) -> Self {
        Self {
            button,
            short_press,
            long_press: None,
        }
    }

    const fn with_long(
        button: PhysicalButton,
        short_press: EntityCommand,
        long_press: EntityCommand,
    ) -> Self {
        Self {
            button,
            short_press,
            long_press: Some(long_press),
        }
    }
}

/// Grid position of a UI item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub x: u8,
    pub y: u8,
}

/// Grid dimensions, for both pages and items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSize {
    pub width: u8,
    pub height: u8,
}

/// How a UI item is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiItemKind {
    /// A text label.
    Text(&'static str),
    /// A named icon from the hub's icon set.
    Icon(&'static str),
}

/// One cell on a UI page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiItem {
    pub command: Option<EntityCommand>,
    pub location: Location,
    pub size: GridSize,
    pub kind: UiItemKind,
}

impl UiItem {
    const fn text(command: EntityCommand, x: u8, y: u8, width: u8, label: &'static str) -> Self {
        Self {
            command: Some(command),
            location: Location { x, y },
            size: GridSize { width, height: 1 },
            kind: UiItemKind::Text(label),
        }
    }

    const fn icon(command: EntityCommand, x: u8, y: u8, width: u8, icon: &'static str) -> Self {
        Self {
            command: Some(command),
            location: Location { x, y },
            size: GridSize { width, height: 1 },
            kind: UiItemKind::Icon(icon),
        }
    }

    const fn spacer(y: u8, width: u8) -> Self {
        Self {
            command: None,
            location: Location { x: 0, y },
            size: GridSize { width, height: 1 },
            kind: UiItemKind::Text(""),
        }
    }
}

/// One page of the on-screen remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiPage {
    pub page_id: &'static str,
    pub name: &'static str,
    pub grid: GridSize,
    pub items: Vec<UiItem>,
}

/// The handset button bindings for a TiVo box.
#[must_use]
pub fn button_mappings() -> Vec<ButtonMapping> {
    vec![
        ButtonMapping::with_long(
            PhysicalButton::Back,
            EntityCommand::simple(cmd::PREVIOUS),
            EntityCommand::raw(cmd::CLEAR),
        ),
        ButtonMapping::short(
            PhysicalButton::Blue,
            EntityCommand::simple(cmd::FUNCTION_BLUE),
        ),
        ButtonMapping::short(
            PhysicalButton::ChannelDown,
            EntityCommand::simple(cmd::CHANNEL_DOWN),
        ),
        ButtonMapping::short(
            PhysicalButton::ChannelUp,
            EntityCommand::simple(cmd::CHANNEL_UP),
        ),
        ButtonMapping::short(
            PhysicalButton::DpadDown,
            EntityCommand::simple(cmd::CURSOR_DOWN),
        ),
        ButtonMapping::short(
            PhysicalButton::DpadLeft,
            EntityCommand::simple(cmd::CURSOR_LEFT),
        ),
        ButtonMapping::short(
            PhysicalButton::DpadMiddle,
            EntityCommand::simple(cmd::CURSOR_ENTER),
        ),
        ButtonMapping::short(
            PhysicalButton::DpadRight,
            EntityCommand::simple(cmd::CURSOR_RIGHT),
        ),
        ButtonMapping::short(
            PhysicalButton::DpadUp,
            EntityCommand::simple(cmd::CURSOR_UP),
        ),
        ButtonMapping::short(
            PhysicalButton::Green,
            EntityCommand::simple(cmd::FUNCTION_GREEN),
        ),
        ButtonMapping::short(PhysicalButton::Home, EntityCommand::simple(cmd::HOME)),
        ButtonMapping::short(
            PhysicalButton::Next,
            EntityCommand::simple(cmd::FAST_FORWARD),
        ),
        ButtonMapping::with_long(
            PhysicalButton::Play,
            EntityCommand::simple(cmd::PLAY_PAUSE),
            EntityCommand::simple(cmd::STOP),
        ),
        ButtonMapping::short(PhysicalButton::Prev, EntityCommand::simple(cmd::REWIND)),
        ButtonMapping::short(PhysicalButton::Red, EntityCommand::simple(cmd::FUNCTION_RED)),
        ButtonMapping::short(
            PhysicalButton::Yellow,
            EntityCommand::simple(cmd::FUNCTION_YELLOW),
        ),
    ]
}

/// The on-screen pages for a TiVo box.
#[must_use]
pub fn ui_pages() -> Vec<UiPage> {
    vec![digits_page(), misc_page()]
}

fn digits_page() -> UiPage {
    const DIGITS: [(&str, &str); 9] = [
        (cmd::DIGIT_1, "1"),
        (cmd::DIGIT_2, "2"),
        (cmd::DIGIT_3, "3"),
        (cmd::DIGIT_4, "4"),
        (cmd::DIGIT_5, "5"),
        (cmd::DIGIT_6, "6"),
        (cmd::DIGIT_7, "7"),
        (cmd::DIGIT_8, "8"),
        (cmd::DIGIT_9, "9"),
    ];

    let mut items: Vec<UiItem> = DIGITS
        .iter()
        .enumerate()
        .map(|(i, (cmd_id, label))| {
            let i = u8::try_from(i).unwrap_or(0);
            UiItem::text(EntityCommand::simple(cmd_id), i % 3, i / 3, 1, label)
        })
        .collect();
    items.push(UiItem::text(
        EntityCommand::simple(cmd::RECORD),
        0,
        3,
        1,
        "REC",
    ));
    items.push(UiItem::text(
        EntityCommand::simple(cmd::DIGIT_0),
        1,
        3,
        1,
        "0",
    ));
    items.push(UiItem::text(
        EntityCommand::simple(cmd::INFO),
        2,
        3,
        1,
        "INFO",
    ));

    UiPage {
        page_id: "digits",
        name: "Numbers",
        grid: GridSize {
            width: 3,
            height: 4,
        },
        items,
    }
}

fn misc_page() -> UiPage {
    UiPage {
        page_id: "misc",
        name: "Misc.",
        grid: GridSize {
            width: 6,
            height: 9,
        },
        items: vec![
            UiItem::text(EntityCommand::simple(cmd::MY_RECORDINGS), 0, 0, 1, "DVR"),
            UiItem::text(EntityCommand::simple(cmd::LIVE), 1, 0, 2, "LIVE"),
            UiItem::text(EntityCommand::simple(cmd::GUIDE), 3, 0, 2, "GUIDE"),
            UiItem::text(EntityCommand::simple(cmd::INFO), 5, 0, 1, "INFO"),
            UiItem::spacer(1, 6),
            UiItem::icon(EntityCommand::simple(cmd::REWIND), 0, 2, 2, "uc:bw"),
            UiItem::icon(EntityCommand::raw(cmd::PLAY), 2, 2, 2, "uc:play"),
            UiItem::icon(EntityCommand::simple(cmd::FAST_FORWARD), 4, 2, 2, "uc:ff"),
            UiItem::icon(EntityCommand::simple(cmd::RECORD), 0, 3, 2, "uc:rec"),
            UiItem::icon(EntityCommand::raw(cmd::PAUSE), 2, 3, 2, "uc:pause"),
            UiItem::icon(EntityCommand::simple(cmd::STOP), 4, 3, 2, "uc:stop"),
            UiItem::spacer(4, 6),
            UiItem::text(EntityCommand::raw(cmd::CLEAR), 0, 5, 1, "CLEAR"),
            UiItem::text(EntityCommand::raw(cmd::THUMBSDOWN), 1, 5, 2, "ThDown"),
            UiItem::text(EntityCommand::raw(cmd::THUMBSUP), 3, 5, 2, "ThUp"),
            UiItem::text(EntityCommand::simple(cmd::HOME), 5, 5, 1, "HOME"),
            UiItem::spacer(6, 6),
            UiItem::text(EntityCommand::simple(cmd::OFF), 0, 7, 1, "OFF"),
            UiItem::text(EntityCommand::simple(cmd::ON), 5, 7, 1, "ON"),
        ],
    }
}
