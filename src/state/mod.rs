// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state tracking types.
//!
//! The TiVo protocol offers no reliable state query, so state here is a
//! best-effort inference with two layers: the [`PowerState`] attribute
//! published to the hub, and the internal [`PlaybackMode`] the dispatcher
//! uses to adjust its own behaviour. [`DeviceRuntimeState`] holds both for
//! one configured device.
//!
//! # Examples
//!
//! ```
//! use vmtivo::state::{DeviceRuntimeState, PlaybackMode, PowerState};
//!
//! let mut state = DeviceRuntimeState::new();
//! assert_eq!(state.mode(), PlaybackMode::Live);
//!
//! state.set_power(PowerState::On);
//! assert_eq!(state.power(), PowerState::On);
//! ```

mod playback;
mod power;
mod runtime;

pub use playback::PlaybackMode;
pub use power::PowerState;
pub use runtime::DeviceRuntimeState;
