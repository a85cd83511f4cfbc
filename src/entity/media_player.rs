// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The media-player entity flavour.

use std::sync::Arc;

use tracing::warn;

use super::StatusCode;
use crate::dispatch::{DispatchParams, TivoHandle};
use crate::state::PowerState;
use crate::transport::Transport;

/// Device class declared for the media-player entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    SetTopBox,
}

impl DeviceClass {
    /// Identifier the hub uses for this device class.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SetTopBox => "set_top_box",
        }
    }
}

/// Features the media-player entity declares to the hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaPlayerFeature {
    ChannelSwitcher,
    ColorButtons,
    Dpad,
    FastForward,
    Home,
    Menu,
    OnOff,
    PlayPause,
    Previous,
    Rewind,
    Stop,
}

impl MediaPlayerFeature {
    /// Identifier the hub uses for this feature.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ChannelSwitcher => "channel_switcher",
            Self::ColorButtons => "color_buttons",
            Self::Dpad => "dpad",
            Self::FastForward => "fast_forward",
            Self::Home => "home",
            Self::Menu => "menu",
            Self::OnOff => "on_off",
            Self::PlayPause => "play_pause",
            Self::Previous => "previous",
            Self::Rewind => "rewind",
            Self::Stop => "stop",
        }
    }
}

/// A box exposed to the hub as a set-top-box media player.
///
/// Commands arrive as logical ids from the feature vocabulary and resolve
/// directly against the conservative table; there is no raw-send path. The
/// channel number is surfaced as an attribute alongside the power state.
#[derive(Debug)]
pub struct MediaPlayerEntity<T> {
    handle: Arc<TivoHandle<T>>,
    name: String,
}

impl<T: Transport> MediaPlayerEntity<T> {
    /// Wraps a dispatch handle as a media-player entity.
    #[must_use]
    pub fn new(handle: Arc<TivoHandle<T>>, name: impl Into<String>) -> Self {
        Self {
            handle,
            name: name.into(),
        }
    }

    /// The entity identifier registered with the hub.
    #[must_use]
    pub fn identifier(&self) -> String {
        format!("media_player.{}", self.handle.device_id())
    }

    /// The display name registered with the hub.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared device class.
    #[must_use]
    pub fn device_class() -> DeviceClass {
        DeviceClass::SetTopBox
    }

    /// Declared feature set.
    #[must_use]
    pub fn features() -> &'static [MediaPlayerFeature] {
        &[
            MediaPlayerFeature::ChannelSwitcher,
            MediaPlayerFeature::ColorButtons,
            MediaPlayerFeature::Dpad,
            MediaPlayerFeature::FastForward,
            MediaPlayerFeature::Home,
            MediaPlayerFeature::Menu,
            MediaPlayerFeature::OnOff,
            MediaPlayerFeature::PlayPause,
            MediaPlayerFeature::Previous,
            MediaPlayerFeature::Rewind,
            MediaPlayerFeature::Stop,
        ]
    }

    /// Last published power state.
    pub async fn power(&self) -> PowerState {
        self.handle.power().await
    }

    /// Last observed channel number.
    pub async fn channel(&self) -> Option<u32> {
        self.handle.channel_number().await
    }

    /// Handles a command from the hub.
    ///
    /// The id must resolve in the conservative table; there is no nested
    /// raw-send vocabulary on this flavour.
    pub async fn handle_command(&self, cmd_id: &str, params: &DispatchParams) -> StatusCode {
        if !self.handle.table().contains(cmd_id) {
            return StatusCode::NotImplemented;
        }
        match self.handle.dispatch(cmd_id, params).await {
            Ok(_) => StatusCode::Ok,
            Err(err) => {
                warn!(device_id = %self.handle.device_id(), %cmd_id, error = %err, "command failed");
                StatusCode::from(&err)
            }
        }
    }
}
