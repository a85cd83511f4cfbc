// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The command table: logical command ids mapped to wire-level codes.
//!
//! The mapping and its per-entry repeat/timing/state metadata are data, not
//! logic. Two presets exist, one per entity flavour; see
//! [`CommandTable::remote`] and [`CommandTable::media_player`].
//!
//! # Examples
//!
//! ```
//! use vmtivo::codes::{CodeKind, CommandTable, cmd};
//!
//! let table = CommandTable::remote();
//! let home = table.lookup(cmd::HOME).unwrap();
//! assert_eq!(home.kind(), CodeKind::Teleport);
//! assert_eq!(home.code(), "TIVO");
//! ```

pub mod cmd;
mod definition;
mod table;

pub use definition::{CodeDefinition, CodeKind};
pub use table::CommandTable;
