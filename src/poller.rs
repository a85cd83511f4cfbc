// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Background state polling.
//!
//! One [`StatePoller`] per configured box: a spawned loop that calls
//! [`TivoHandle::query_state`] immediately and then on every interval.
//! `query_state` absorbs every failure class itself, so nothing but
//! explicit cancellation stops the loop.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::debug;

use crate::dispatch::TivoHandle;
use crate::transport::Transport;

/// Default pause between poll cycles.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// A cancellable background poll loop for one device.
///
/// Cancellation is observed within one sleep interval; the owning driver
/// drops the poller from its bookkeeping once [`StatePoller::cancel`]
/// returns.
#[derive(Debug)]
pub struct StatePoller {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl StatePoller {
    /// Spawns the poll loop for the given handle.
    #[must_use]
    pub fn spawn<T>(handle: Arc<TivoHandle<T>>, interval: Duration) -> Self
    where
        T: Transport + Send + 'static,
    {
        let (shutdown, mut cancelled) = watch::channel(false);
        let task = tokio::spawn(async move {
            debug!(device_id = %handle.device_id(), "poller started");
            loop {
                let _ = handle.query_state().await;
                tokio::select! {
                    _ = cancelled.changed() => break,
                    () = sleep(interval) => {}
                }
            }
            debug!(device_id = %handle.device_id(), "poller stopped");
        });
        Self { shutdown, task }
    }

    /// Cancels the loop and waits for the task to wind down.
    pub async fn cancel(self) {
        let _ = self.shutdown.send(true);
        let _ = self.task.await;
    }

    /// Returns `true` once the task has wound down.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::task::yield_now;
    use tokio::time::advance;

    use super::*;
    use crate::dispatch::EntityFlavour;
    use crate::error::TransportError;
    use crate::event::{DeviceId, EventBus};

    /// A transport whose probes always fail with a non-timeout error, to
    /// prove the loop survives every error class.
    #[derive(Debug)]
    struct FlakyTransport {
        cycles: Arc<AtomicUsize>,
    }

    impl Transport for FlakyTransport {
        async fn connect(&mut self) -> Result<(), TransportError> {
            self.cycles.fetch_add(1, Ordering::SeqCst);
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
            Err(TransportError::Io(std::io::Error::other("probe failed")))
        }

        fn channel_number(&self) -> Option<u32> {
            None
        }
    }

    fn flaky_handle() -> (Arc<TivoHandle<FlakyTransport>>, Arc<AtomicUsize>) {
        let cycles = Arc::new(AtomicUsize::new(0));
        let transport = FlakyTransport {
            cycles: Arc::clone(&cycles),
        };
        let handle = Arc::new(TivoHandle::new(
            DeviceId::new(),
            EntityFlavour::Remote,
            transport,
            EventBus::new(),
        ));
        (handle, cycles)
    }

    async fn settle() {
        for _ in 0..8 {
            yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn polls_immediately_then_on_interval() {
        let (handle, cycles) = flaky_handle();
        let poller = StatePoller::spawn(handle, Duration::from_secs(10));

        settle().await;
        assert_eq!(cycles.load(Ordering::SeqCst), 1);

        advance(Duration::from_secs(10)).await;
        settle().await;
        assert_eq!(cycles.load(Ordering::SeqCst), 2);

        advance(Duration::from_secs(10)).await;
        settle().await;
        assert_eq!(cycles.load(Ordering::SeqCst), 3);

        poller.cancel().await;
    }

    #[tokio::test(start_paused = true)]
    async fn survives_probe_errors() {
        let (handle, cycles) = flaky_handle();
        // Each cycle hits the io error inside query_state; the loop keeps
        // going regardless.
        let poller = StatePoller::spawn(Arc::clone(&handle), Duration::from_secs(10));

        settle().await;
        advance(Duration::from_secs(10)).await;
        settle().await;
        assert!(cycles.load(Ordering::SeqCst) >= 2);

        poller.cancel().await;
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_within_one_interval() {
        let (handle, cycles) = flaky_handle();
        let poller = StatePoller::spawn(handle, Duration::from_secs(3600));

        settle().await;
        assert_eq!(cycles.load(Ordering::SeqCst), 1);

        poller.cancel().await;

        // No further cycles after cancellation.
        advance(Duration::from_secs(7200)).await;
        settle().await;
        assert_eq!(cycles.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn is_finished_tracks_task_lifetime() {
        let (handle, _cycles) = flaky_handle();
        let poller = StatePoller::spawn(handle, Duration::from_secs(10));

        settle().await;
        assert!(!poller.is_finished());

        let _ = poller.shutdown.send(true);
        settle().await;
        assert!(poller.is_finished());
    }
}
