// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Persisted device registry.
//!
//! Configured boxes are stored as a JSON array in `config.json` under the
//! driver's configuration directory. The registry is the source of truth
//! for which devices exist across restarts; the driver rebuilds its
//! handles from it on startup.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ConfigError;
use crate::event::DeviceId;
use crate::transport::TcpConfig;

/// One configured box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceEntry {
    /// IP address or hostname of the box.
    pub address: String,

    /// Stable identifier assigned at setup time.
    pub id: DeviceId,

    /// Human-readable name shown in entity identifiers and logs.
    pub name: String,

    /// TCP port the box listens on.
    pub port: u16,

    /// TiVo service number, when discovery reported one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial: Option<String>,
}

impl DeviceEntry {
    /// Creates an entry with a fresh identifier and the default port.
    #[must_use]
    pub fn new(address: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            id: DeviceId::new(),
            name: name.into(),
            port: TcpConfig::DEFAULT_PORT,
            serial: None,
        }
    }

    /// Sets the TCP port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the TiVo service number.
    #[must_use]
    pub fn with_serial(mut self, serial: impl Into<String>) -> Self {
        self.serial = Some(serial.into());
        self
    }
}

/// File name of the registry inside the configuration directory.
const REGISTRY_FILE: &str = "config.json";

/// Loads, mutates and saves the set of configured boxes.
///
/// Mutating operations persist immediately; a successful return means the
/// change is on disk. A malformed entry in the file is skipped with a
/// warning rather than failing the whole load, so one corrupt record
/// cannot take every box offline.
#[derive(Debug)]
pub struct DeviceRegistry {
    path: PathBuf,
    entries: Vec<DeviceEntry>,
}

impl DeviceRegistry {
    /// Creates an empty registry stored under the given directory.
    #[must_use]
    pub fn new(config_dir: impl AsRef<Path>) -> Self {
        Self {
            path: config_dir.as_ref().join(REGISTRY_FILE),
            entries: Vec::new(),
        }
    }

    /// Loads entries from disk, replacing any in-memory state.
    ///
    /// A missing file is treated as an empty registry. Returns the number
    /// of entries loaded.
    ///
    /// # Errors
    ///
    /// Fails with `ConfigError::Io` if the file exists but cannot be read,
    /// or `ConfigError::Json` if it is not a JSON array.
    pub fn load(&mut self) -> Result<usize, ConfigError> {
        self.entries.clear();
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no registry file, starting empty");
                return Ok(0);
            }
            Err(err) => return Err(ConfigError::Io(err)),
        };

        let records: Vec<serde_json::Value> = serde_json::from_str(&raw)?;
        for record in records {
            match serde_json::from_value::<DeviceEntry>(record) {
                Ok(entry) => self.entries.push(entry),
                Err(err) => {
                    warn!(error = %err, "skipping malformed registry entry");
                }
            }
        }
        debug!(
            path = %self.path.display(),
            count = self.entries.len(),
            "registry loaded"
        );
        Ok(self.entries.len())
    }

    /// Writes the current entries to disk.
    ///
    /// # Errors
    ///
    /// Fails with `ConfigError::Io` if the directory cannot be created or
    /// the file cannot be written.
    pub fn save(&self) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, json)?;
        debug!(
            path = %self.path.display(),
            count = self.entries.len(),
            "registry saved"
        );
        Ok(())
    }

    /// Adds an entry and persists the registry.
    ///
    /// Entries are deduplicated by address: adding a second entry for an
    /// address already present is a no-op that returns `false`.
    ///
    /// # Errors
    ///
    /// Fails if the registry cannot be written to disk.
    pub fn add(&mut self, entry: DeviceEntry) -> Result<bool, ConfigError> {
        if self.contains_address(&entry.address) {
            debug!(address = %entry.address, "device already configured");
            return Ok(false);
        }
        self.entries.push(entry);
        self.save()?;
        Ok(true)
    }

    /// Removes the entry with the given id and persists the registry.
    ///
    /// Returns the removed entry, or `None` if the id is not configured.
    ///
    /// # Errors
    ///
    /// Fails if the registry cannot be written to disk.
    pub fn remove(&mut self, id: DeviceId) -> Result<Option<DeviceEntry>, ConfigError> {
        let Some(index) = self.entries.iter().position(|e| e.id == id) else {
            return Ok(None);
        };
        let removed = self.entries.remove(index);
        self.save()?;
        Ok(Some(removed))
    }

    /// Removes every entry and persists the empty registry.
    ///
    /// # Errors
    ///
    /// Fails if the registry cannot be written to disk.
    pub fn clear(&mut self) -> Result<(), ConfigError> {
        self.entries.clear();
        self.save()
    }

    /// Returns the entry with the given id.
    #[must_use]
    pub fn get(&self, id: DeviceId) -> Option<&DeviceEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Returns `true` if an entry with the given id exists.
    #[must_use]
    pub fn contains(&self, id: DeviceId) -> bool {
        self.get(id).is_some()
    }

    /// Returns `true` if an entry with the given address exists.
    #[must_use]
    pub fn contains_address(&self, address: &str) -> bool {
        self.entries.iter().any(|e| e.address == address)
    }

    /// All configured entries, in insertion order.
    #[must_use]
    pub fn all(&self) -> &[DeviceEntry] {
        &self.entries
    }

    /// Number of configured entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no devices are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(address: &str, name: &str) -> DeviceEntry {
        DeviceEntry::new(address, name)
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = DeviceRegistry::new(dir.path());
        assert_eq!(registry.load().unwrap(), 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn add_persists_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = DeviceRegistry::new(dir.path());
        let added = entry("192.168.1.40", "Lounge")
            .with_port(31339)
            .with_serial("8460001902A74F1");
        let id = added.id;
        assert!(registry.add(added).unwrap());

        let mut reloaded = DeviceRegistry::new(dir.path());
        assert_eq!(reloaded.load().unwrap(), 1);
        let stored = reloaded.get(id).unwrap();
        assert_eq!(stored.address, "192.168.1.40");
        assert_eq!(stored.name, "Lounge");
        assert_eq!(stored.serial.as_deref(), Some("8460001902A74F1"));
    }

    #[test]
    fn add_dedupes_by_address() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = DeviceRegistry::new(dir.path());
        assert!(registry.add(entry("192.168.1.40", "Lounge")).unwrap());
        assert!(!registry.add(entry("192.168.1.40", "Lounge again")).unwrap());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn remove_returns_entry_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = DeviceRegistry::new(dir.path());
        let added = entry("192.168.1.40", "Lounge");
        let id = added.id;
        registry.add(added).unwrap();
        registry.add(entry("192.168.1.41", "Bedroom")).unwrap();

        let removed = registry.remove(id).unwrap().unwrap();
        assert_eq!(removed.name, "Lounge");

        let mut reloaded = DeviceRegistry::new(dir.path());
        assert_eq!(reloaded.load().unwrap(), 1);
        assert!(!reloaded.contains(id));
    }

    #[test]
    fn remove_unknown_id_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = DeviceRegistry::new(dir.path());
        assert!(registry.remove(DeviceId::new()).unwrap().is_none());
    }

    #[test]
    fn clear_empties_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = DeviceRegistry::new(dir.path());
        registry.add(entry("192.168.1.40", "Lounge")).unwrap();
        registry.clear().unwrap();

        let mut reloaded = DeviceRegistry::new(dir.path());
        assert_eq!(reloaded.load().unwrap(), 0);
    }

    #[test]
    fn malformed_entry_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"[
                {"address": "192.168.1.40", "id": "8c3f1a5e-0b6d-4a2f-9c47-3d1e5b7a9f02", "name": "Lounge", "port": 31339},
                {"address": 12}
            ]"#,
        )
        .unwrap();

        let mut registry = DeviceRegistry::new(dir.path());
        assert_eq!(registry.load().unwrap(), 1);
        assert!(registry.contains_address("192.168.1.40"));
    }

    #[test]
    fn top_level_garbage_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.json"), "not json").unwrap();

        let mut registry = DeviceRegistry::new(dir.path());
        assert!(matches!(registry.load(), Err(ConfigError::Json(_))));
    }

    #[test]
    fn serial_is_omitted_when_absent() {
        let entry = entry("192.168.1.40", "Lounge");
        let json = serde_json::to_string(&entry).unwrap();
        assert!(!json.contains("serial"));
    }
}
