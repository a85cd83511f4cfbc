// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The top-level driver.
//!
//! [`TivoDriver`] owns the persisted registry, one dispatch handle per
//! configured box and the poller bookkeeping. Lifecycle notifications from
//! the hub map onto it directly: connect and standby-exit start polling,
//! disconnect and standby-entry stop it, and configuration changes add or
//! remove devices.
//!
//! Dispatch and polling for the same box serialise on the handle's internal
//! mutex; different boxes are fully independent.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::config::{DeviceEntry, DeviceRegistry};
use crate::dispatch::{DispatchOutcome, DispatchParams, EntityFlavour, TivoHandle};
use crate::error::{Error, Result};
use crate::event::{DeviceEvent, DeviceId, EventBus};
use crate::poller::{DEFAULT_POLL_INTERVAL, StatePoller};
use crate::state::PowerState;
use crate::transport::TransportFactory;

/// Owns every configured box and its background machinery.
pub struct TivoDriver<F: TransportFactory> {
    factory: F,
    flavour: EntityFlavour,
    bus: EventBus,
    registry: DeviceRegistry,
    handles: HashMap<DeviceId, Arc<TivoHandle<F::Transport>>>,
    pollers: HashMap<DeviceId, StatePoller>,
    poll_interval: Duration,
    polling: bool,
}

impl<F> TivoDriver<F>
where
    F: TransportFactory,
    F::Transport: 'static,
{
    /// Loads the registry from `config_dir` and builds a handle per entry.
    ///
    /// Polling starts stopped; call [`TivoDriver::start_polling`] once the
    /// hub connection is up.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Config`] when the registry cannot be read.
    pub fn new(
        factory: F,
        flavour: EntityFlavour,
        config_dir: impl AsRef<std::path::Path>,
    ) -> Result<Self> {
        let mut registry = DeviceRegistry::new(config_dir);
        let loaded = registry.load()?;

        let bus = EventBus::new();
        let mut driver = Self {
            factory,
            flavour,
            bus,
            registry,
            handles: HashMap::new(),
            pollers: HashMap::new(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            polling: false,
        };
        for entry in driver.registry.all().to_vec() {
            driver.install_handle(&entry);
        }
        info!(devices = loaded, "driver initialised");
        Ok(driver)
    }

    /// Overrides the poll interval.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// The event bus carrying lifecycle and attribute events.
    #[must_use]
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Subscribes to driver events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DeviceEvent> {
        self.bus.subscribe()
    }

    /// The persisted registry.
    #[must_use]
    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }

    /// Ids of every configured box.
    #[must_use]
    pub fn device_ids(&self) -> Vec<DeviceId> {
        self.handles.keys().copied().collect()
    }

    /// The dispatch handle for a box.
    #[must_use]
    pub fn handle(&self, id: DeviceId) -> Option<Arc<TivoHandle<F::Transport>>> {
        self.handles.get(&id).cloned()
    }

    /// Returns `true` while background polling is running.
    #[must_use]
    pub fn is_polling(&self) -> bool {
        self.polling
    }

    /// Adds a box, persists it and publishes [`DeviceEvent::DeviceAdded`].
    ///
    /// Adding an address that is already configured returns the existing id
    /// without touching anything. A poller is started immediately when
    /// polling is active.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Config`] when the registry cannot be written.
    pub fn add_device(&mut self, entry: DeviceEntry) -> Result<DeviceId> {
        if let Some(existing) = self
            .registry
            .all()
            .iter()
            .find(|e| e.address == entry.address)
        {
            debug!(address = %entry.address, "device already configured");
            return Ok(existing.id);
        }

        let id = entry.id;
        self.registry.add(entry.clone())?;
        self.install_handle(&entry);
        self.bus.publish(DeviceEvent::device_added(id));

        if self.polling {
            self.start_poller(id);
        }
        info!(device_id = %id, address = %entry.address, "device added");
        Ok(id)
    }

    /// Removes a box, its poller and its registry entry, then publishes
    /// [`DeviceEvent::DeviceRemoved`].
    ///
    /// # Errors
    ///
    /// Fails with [`Error::DeviceNotFound`] for an unknown id and
    /// [`Error::Config`] when the registry cannot be written.
    pub async fn remove_device(&mut self, id: DeviceId) -> Result<()> {
        if !self.handles.contains_key(&id) {
            return Err(Error::DeviceNotFound);
        }
        if let Some(poller) = self.pollers.remove(&id) {
            poller.cancel().await;
        }
        self.handles.remove(&id);
        self.registry.remove(id)?;
        self.bus.publish(DeviceEvent::device_removed(id));
        info!(device_id = %id, "device removed");
        Ok(())
    }

    /// Starts a poller for every configured box.
    ///
    /// Idempotent; boxes that already have a poller keep it.
    pub fn start_polling(&mut self) {
        self.polling = true;
        let ids: Vec<DeviceId> = self.handles.keys().copied().collect();
        for id in ids {
            self.start_poller(id);
        }
        debug!(pollers = self.pollers.len(), "polling started");
    }

    /// Cancels every poller and waits for the tasks to wind down.
    pub async fn stop_polling(&mut self) {
        self.polling = false;
        for (_, poller) in self.pollers.drain() {
            poller.cancel().await;
        }
        debug!("polling stopped");
    }

    /// Dispatches a command against one box.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::DeviceNotFound`] for an unknown id; dispatch
    /// failures surface as [`Error::Dispatch`].
    pub async fn dispatch(
        &self,
        id: DeviceId,
        cmd_id: &str,
        params: &DispatchParams,
    ) -> Result<DispatchOutcome> {
        let handle = self.handles.get(&id).ok_or(Error::DeviceNotFound)?;
        Ok(handle.dispatch(cmd_id, params).await?)
    }

    /// Probes one box's state on demand.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::DeviceNotFound`] for an unknown id. Probe
    /// failures are absorbed into the returned state, never surfaced.
    pub async fn query_state(&self, id: DeviceId) -> Result<PowerState> {
        let handle = self.handles.get(&id).ok_or(Error::DeviceNotFound)?;
        Ok(handle.query_state().await)
    }

    fn install_handle(&mut self, entry: &DeviceEntry) {
        let transport = self.factory.create(&entry.address, entry.port);
        let handle = Arc::new(TivoHandle::new(
            entry.id,
            self.flavour,
            transport,
            self.bus.clone(),
        ));
        self.handles.insert(entry.id, handle);
    }

    fn start_poller(&mut self, id: DeviceId) {
        if self.pollers.contains_key(&id) {
            return;
        }
        let Some(handle) = self.handles.get(&id) else {
            return;
        };
        self.pollers
            .insert(id, StatePoller::spawn(Arc::clone(handle), self.poll_interval));
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use tokio::task::yield_now;

    use std::result::Result;

    use super::*;
    use crate::codes::cmd;
    use crate::error::TransportError;
    use crate::transport::Transport;

    #[derive(Debug)]
    struct CountingTransport {
        connects: Arc<AtomicUsize>,
    }

    impl Transport for CountingTransport {
        async fn connect(&mut self) -> Result<(), TransportError> {
            self.connects.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn disconnect(&mut self) -> Result<(), TransportError> {
            Ok(())
        }

        async fn send_ircode(&mut self, _: &str, _: bool) -> Result<(), TransportError> {
            Ok(())
        }

        async fn send_teleport(&mut self, _: &str) -> Result<(), TransportError> {
            Ok(())
        }

        async fn wait_for_data(&mut self, _: Duration) -> Result<(), TransportError> {
            Ok(())
        }

        fn channel_number(&self) -> Option<u32> {
            None
        }
    }

    struct CountingFactory {
        connects: Arc<AtomicUsize>,
    }

    impl CountingFactory {
        fn new() -> (Self, Arc<AtomicUsize>) {
            let connects = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    connects: Arc::clone(&connects),
                },
                connects,
            )
        }
    }

    impl TransportFactory for CountingFactory {
        type Transport = CountingTransport;

        fn create(&self, _: &str, _: u16) -> Self::Transport {
            CountingTransport {
                connects: Arc::clone(&self.connects),
            }
        }
    }

    async fn settle() {
        for _ in 0..8 {
            yield_now().await;
        }
    }

    #[tokio::test]
    async fn loads_handles_from_the_registry() {
        let dir = tempfile::tempdir().unwrap();
        let mut seed = DeviceRegistry::new(dir.path());
        seed.add(DeviceEntry::new("192.168.1.40", "Lounge")).unwrap();
        seed.add(DeviceEntry::new("192.168.1.41", "Bedroom"))
            .unwrap();

        let (factory, _) = CountingFactory::new();
        let driver = TivoDriver::new(factory, EntityFlavour::Remote, dir.path()).unwrap();
        assert_eq!(driver.device_ids().len(), 2);
    }

    #[tokio::test]
    async fn add_device_publishes_and_dedupes() {
        let dir = tempfile::tempdir().unwrap();
        let (factory, _) = CountingFactory::new();
        let mut driver = TivoDriver::new(factory, EntityFlavour::Remote, dir.path()).unwrap();
        let mut events = driver.subscribe();

        let id = driver
            .add_device(DeviceEntry::new("192.168.1.40", "Lounge"))
            .unwrap();
        assert_eq!(events.try_recv().unwrap(), DeviceEvent::device_added(id));

        let again = driver
            .add_device(DeviceEntry::new("192.168.1.40", "Lounge again"))
            .unwrap();
        assert_eq!(again, id);
        assert_eq!(driver.device_ids().len(), 1);
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn remove_device_publishes_and_forgets() {
        let dir = tempfile::tempdir().unwrap();
        let (factory, _) = CountingFactory::new();
        let mut driver = TivoDriver::new(factory, EntityFlavour::Remote, dir.path()).unwrap();

        let id = driver
            .add_device(DeviceEntry::new("192.168.1.40", "Lounge"))
            .unwrap();
        let mut events = driver.subscribe();

        driver.remove_device(id).await.unwrap();
        assert_eq!(events.try_recv().unwrap(), DeviceEvent::device_removed(id));
        assert!(driver.handle(id).is_none());
        assert!(!driver.registry().contains(id));
    }

    #[tokio::test]
    async fn remove_unknown_device_fails() {
        let dir = tempfile::tempdir().unwrap();
        let (factory, _) = CountingFactory::new();
        let mut driver = TivoDriver::new(factory, EntityFlavour::Remote, dir.path()).unwrap();

        let err = driver.remove_device(DeviceId::new()).await.unwrap_err();
        assert!(matches!(err, Error::DeviceNotFound));
    }

    #[tokio::test]
    async fn polling_lifecycle_follows_the_hub() {
        let dir = tempfile::tempdir().unwrap();
        let (factory, connects) = CountingFactory::new();
        let mut driver = TivoDriver::new(factory, EntityFlavour::Remote, dir.path())
            .unwrap()
            .with_poll_interval(Duration::from_secs(3600));

        driver
            .add_device(DeviceEntry::new("192.168.1.40", "Lounge"))
            .unwrap();
        assert!(!driver.is_polling());

        driver.start_polling();
        assert!(driver.is_polling());
        settle().await;
        assert!(connects.load(Ordering::SeqCst) >= 1);

        driver.stop_polling().await;
        assert!(!driver.is_polling());
        assert!(driver.pollers.is_empty());
    }

    #[tokio::test]
    async fn device_added_while_polling_gets_a_poller() {
        let dir = tempfile::tempdir().unwrap();
        let (factory, _) = CountingFactory::new();
        let mut driver = TivoDriver::new(factory, EntityFlavour::Remote, dir.path())
            .unwrap()
            .with_poll_interval(Duration::from_secs(3600));

        driver.start_polling();
        let id = driver
            .add_device(DeviceEntry::new("192.168.1.40", "Lounge"))
            .unwrap();
        assert!(driver.pollers.contains_key(&id));

        driver.stop_polling().await;
    }

    #[tokio::test]
    async fn dispatch_routes_to_the_handle() {
        let dir = tempfile::tempdir().unwrap();
        let (factory, connects) = CountingFactory::new();
        let mut driver = TivoDriver::new(factory, EntityFlavour::Remote, dir.path()).unwrap();

        let id = driver
            .add_device(DeviceEntry::new("192.168.1.40", "Lounge"))
            .unwrap();
        let outcome = driver
            .dispatch(id, cmd::GUIDE, &DispatchParams::new())
            .await
            .unwrap();
        assert!(!outcome.is_suppressed());
        assert_eq!(connects.load(Ordering::SeqCst), 1);

        let err = driver
            .dispatch(DeviceId::new(), cmd::GUIDE, &DispatchParams::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DeviceNotFound));
    }

    #[tokio::test]
    async fn query_state_routes_to_the_handle() {
        let dir = tempfile::tempdir().unwrap();
        let (factory, _) = CountingFactory::new();
        let mut driver = TivoDriver::new(factory, EntityFlavour::MediaPlayer, dir.path()).unwrap();

        let id = driver
            .add_device(DeviceEntry::new("192.168.1.40", "Lounge"))
            .unwrap();
        assert_eq!(driver.query_state(id).await.unwrap(), PowerState::Playing);

        let err = driver.query_state(DeviceId::new()).await.unwrap_err();
        assert!(matches!(err, Error::DeviceNotFound));
    }
}
