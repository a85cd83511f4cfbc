// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The remote entity flavour.

use std::sync::Arc;

use tracing::warn;

use super::StatusCode;
use super::ui::{self, ButtonMapping, UiPage};
use crate::codes::cmd;
use crate::dispatch::{DispatchParams, TivoHandle};
use crate::state::PowerState;
use crate::transport::Transport;

/// Features the remote entity declares to the hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteFeature {
    OnOff,
    SendCmd,
}

impl RemoteFeature {
    /// Identifier the hub uses for this feature.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OnOff => "on_off",
            Self::SendCmd => "send_cmd",
        }
    }
}

/// A box exposed to the hub as a programmable remote.
///
/// The hub-facing vocabulary is the four remote commands (`on`, `off`,
/// `send_cmd`, `send_cmd_sequence`); everything else is routed as a nested
/// command through the raw-send path. Simple commands, button mappings and
/// UI pages are registration data only.
#[derive(Debug)]
pub struct RemoteEntity<T> {
    handle: Arc<TivoHandle<T>>,
    name: String,
}

impl<T: Transport> RemoteEntity<T> {
    /// Wraps a dispatch handle as a remote entity.
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
        format!("remote.{}", self.handle.device_id())
    }

    /// The display name registered with the hub.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared feature set.
    #[must_use]
    pub fn features() -> &'static [RemoteFeature] {
        &[RemoteFeature::OnOff, RemoteFeature::SendCmd]
    }

    /// Vendor commands outside the standard vocabulary, for the hub's
    /// simple-command list.
    #[must_use]
    pub fn simple_commands(&self) -> Vec<&'static str> {
        let mut commands: Vec<&'static str> = self.handle.table().simple_commands().collect();
        commands.sort_unstable();
        commands
    }

    /// Handset button bindings.
    #[must_use]
    pub fn button_mappings() -> Vec<ButtonMapping> {
        ui::button_mappings()
    }

    /// On-screen remote pages.
    #[must_use]
    pub fn ui_pages() -> Vec<UiPage> {
        ui::ui_pages()
    }

    /// Last published power state.
    pub async fn power(&self) -> PowerState {
        self.handle.power().await
    }

    /// Handles a command from the hub.
    ///
    /// Only the remote vocabulary is accepted here; dispatch outcomes map
    /// onto the status codes the hub understands.
    pub async fn handle_command(&self, cmd_id: &str, params: &DispatchParams) -> StatusCode {
        if !matches!(
            cmd_id,
            cmd::ON | cmd::OFF | cmd::SEND_CMD | cmd::SEND_CMD_SEQUENCE
        ) {
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
