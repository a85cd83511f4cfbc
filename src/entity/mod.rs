// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Hub-facing entity surfaces.
//!
//! A configured box is exposed to the hub as either a [`RemoteEntity`] or a
//! [`MediaPlayerEntity`] over the same dispatcher core. Entities translate
//! the hub's command vocabulary into dispatches and report the outcome as a
//! [`StatusCode`]; declared features, button mappings and UI pages are
//! plain data the hub consumes at registration time.

mod media_player;
mod remote;
pub mod ui;

pub use media_player::{DeviceClass, MediaPlayerEntity, MediaPlayerFeature};
pub use remote::{RemoteEntity, RemoteFeature};

use crate::error::{DispatchError, Error};

/// Status reported back to the hub for a handled command.
///
/// Mirrors the HTTP-style vocabulary the hub expects. Dispatch failures map
/// onto it: an unknown command is the caller's problem, a transport failure
/// is the service's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// The command was carried out.
    Ok,
    /// The request was malformed (missing or empty parameters).
    BadRequest,
    /// The command is not part of this entity's vocabulary.
    NotImplemented,
    /// The box could not be reached or dropped the connection.
    ServiceUnavailable,
    /// An unexpected internal failure.
    ServerError,
}

impl StatusCode {
    /// The numeric wire value of this status.
    #[must_use]
    pub fn as_u16(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::BadRequest => 400,
            Self::ServerError => 500,
            Self::NotImplemented => 501,
            Self::ServiceUnavailable => 503,
        }
    }

    /// Returns `true` for [`StatusCode::Ok`].
    #[must_use]
    pub fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl From<&DispatchError> for StatusCode {
    fn from(err: &DispatchError) -> Self {
        match err {
            DispatchError::UnsupportedCommand(_) => Self::NotImplemented,
            DispatchError::EmptySequence | DispatchError::MissingCommand => Self::BadRequest,
            DispatchError::ServiceUnavailable(_) => Self::ServiceUnavailable,
        }
    }
}

impl From<&Error> for StatusCode {
    fn from(err: &Error) -> Self {
        match err {
            Error::Dispatch(e) => Self::from(e),
            Error::DeviceNotFound => Self::BadRequest,
            _ => Self::ServerError,
        }
    }
}
