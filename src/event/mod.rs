// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event system for device state changes.
//!
//! A pub/sub layer over tokio's broadcast channel. The dispatcher and the
//! poller publish [`DeviceEvent`]s on the shared [`EventBus`]; the host
//! layer subscribes and forwards attribute changes to the hub.
//!
//! # Examples
//!
//! ```
//! use vmtivo::event::{DeviceEvent, DeviceId, EventBus};
//!
//! let bus = EventBus::new();
//! let mut rx = bus.subscribe();
//!
//! let device_id = DeviceId::new();
//! bus.publish(DeviceEvent::DeviceAdded { device_id });
//! ```

mod device_event;
mod device_id;
mod event_bus;

pub use device_event::DeviceEvent;
pub use device_id::DeviceId;
pub use event_bus::EventBus;
