// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests against an emulated TiVo box.
//!
//! The emulator speaks the real wire protocol over a loopback TCP listener:
//! `IRCODE`/`TELEPORT` frames in, `CH_STATUS` frames out. Each mode models
//! one box behaviour the driver has to cope with.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::sleep;

use vmtivo::codes::cmd;
use vmtivo::config::DeviceEntry;
use vmtivo::dispatch::{DispatchParams, EntityFlavour, TivoHandle};
use vmtivo::driver::TivoDriver;
use vmtivo::error::TransportError;
use vmtivo::event::{DeviceEvent, DeviceId, EventBus};
use vmtivo::state::{PlaybackMode, PowerState};
use vmtivo::transport::{TcpConfig, TcpTransport, TcpTransportFactory, Transport, TransportFactory};

// ============================================================================
// Emulated TiVo box
// ============================================================================

/// How the emulated box behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Pushes a `CH_STATUS` frame on connect and acknowledges every frame.
    Live,
    /// Accepts the connection but never writes anything.
    Silent,
    /// Closes every connection as soon as it is accepted.
    Reset,
    /// Rejects every frame with an `INVALID_COMMAND` reply.
    Invalid,
}

struct Emulator {
    addr: SocketAddr,
    frames: Arc<Mutex<Vec<String>>>,
}

impl Emulator {
    async fn spawn(mode: Mode) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let frames = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&frames);

        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(serve_connection(stream, mode, Arc::clone(&recorded)));
            }
        });

        Self { addr, frames }
    }

    fn address(&self) -> String {
        self.addr.ip().to_string()
    }

    fn port(&self) -> u16 {
        self.addr.port()
    }

    fn frames(&self) -> Vec<String> {
        self.frames.lock().unwrap().clone()
    }

    /// Waits until the box has seen at least `count` frames.
    async fn wait_for_frames(&self, count: usize) {
        for _ in 0..200 {
            if self.frames().len() >= count {
                return;
            }
            sleep(Duration::from_millis(10)).await;
        }
        panic!("emulator never received {count} frames, got {:?}", self.frames());
    }
}

async fn serve_connection(stream: TcpStream, mode: Mode, recorded: Arc<Mutex<Vec<String>>>) {
    if mode == Mode::Reset {
        return;
    }

    let (read_half, mut write_half) = stream.into_split();
    if mode == Mode::Live {
        let _ = write_half.write_all(b"CH_STATUS 0231 LOCAL\r").await;
    }

    let mut reader = BufReader::new(read_half);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\r', &mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf).trim_end_matches('\r').to_string();
                recorded.lock().unwrap().push(line);
                let reply: &[u8] = match mode {
                    Mode::Live => b"CH_STATUS 0231 LOCAL\r",
                    Mode::Invalid => b"INVALID_COMMAND\r",
                    Mode::Silent | Mode::Reset => continue,
                };
                let _ = write_half.write_all(reply).await;
            }
        }
    }
}

fn transport_for(emulator: &Emulator) -> TcpTransport {
    TcpTransportFactory::default().create(&emulator.address(), emulator.port())
}

fn short_transport_for(emulator: &Emulator) -> TcpTransport {
    TcpTransportFactory::new(Duration::from_millis(100)).create(&emulator.address(), emulator.port())
}

// ============================================================================
// Transport-level tests
// ============================================================================

mod transport {
    use super::*;

    #[tokio::test]
    async fn ircode_frames_reach_the_box() {
        let emulator = Emulator::spawn(Mode::Live).await;
        let mut transport = transport_for(&emulator);

        transport.connect().await.unwrap();
        transport.send_ircode("Guide", false).await.unwrap();
        transport.disconnect().await.unwrap();

        emulator.wait_for_frames(1).await;
        assert_eq!(emulator.frames(), vec!["IRCODE Guide"]);
    }

    #[tokio::test]
    async fn teleport_frames_reach_the_box() {
        let emulator = Emulator::spawn(Mode::Live).await;
        let mut transport = transport_for(&emulator);

        transport.connect().await.unwrap();
        transport.send_teleport("TIVO").await.unwrap();
        transport.disconnect().await.unwrap();

        emulator.wait_for_frames(1).await;
        assert_eq!(emulator.frames(), vec!["TELEPORT TIVO"]);
    }

    #[tokio::test]
    async fn reply_wait_consumes_a_status_frame() {
        let emulator = Emulator::spawn(Mode::Live).await;
        let mut transport = transport_for(&emulator);

        transport.connect().await.unwrap();
        transport.send_ircode("num5", true).await.unwrap();
        assert_eq!(transport.channel_number(), Some(231));
        transport.disconnect().await.unwrap();
    }

    #[tokio::test]
    async fn silent_box_times_out() {
        let emulator = Emulator::spawn(Mode::Silent).await;
        let mut transport = short_transport_for(&emulator);

        transport.connect().await.unwrap();
        let err = transport
            .wait_for_data(Duration::from_millis(100))
            .await
            .unwrap_err();
        assert!(err.is_timeout());
        transport.disconnect().await.unwrap();
    }

    #[tokio::test]
    async fn dropped_connection_is_a_reset() {
        let emulator = Emulator::spawn(Mode::Reset).await;
        let mut transport = transport_for(&emulator);

        transport.connect().await.unwrap();
        let err = transport
            .wait_for_data(Duration::from_millis(500))
            .await
            .unwrap_err();
        assert!(err.is_connection_reset());
    }

    #[tokio::test]
    async fn invalid_reply_is_a_protocol_error() {
        let emulator = Emulator::spawn(Mode::Invalid).await;
        let mut transport = transport_for(&emulator);

        transport.connect().await.unwrap();
        let err = transport.send_ircode("num5", true).await.unwrap_err();
        assert!(matches!(err, TransportError::Protocol(_)));
        transport.disconnect().await.unwrap();
    }

    #[tokio::test]
    async fn unreachable_box_fails_to_connect() {
        // Bind then drop, so nothing listens on the port.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mut transport = TcpTransportFactory::new(Duration::from_millis(200))
            .create(&addr.ip().to_string(), addr.port());
        assert!(transport.connect().await.is_err());
    }
}

// ============================================================================
// Dispatch tests
// ============================================================================

mod dispatch {
    use super::*;

    fn handle(emulator: &Emulator, flavour: EntityFlavour) -> TivoHandle<TcpTransport> {
        TivoHandle::new(
            DeviceId::new(),
            flavour,
            transport_for(emulator),
            EventBus::new(),
        )
    }

    #[tokio::test]
    async fn commands_use_a_scoped_connection() {
        let emulator = Emulator::spawn(Mode::Live).await;
        let handle = handle(&emulator, EntityFlavour::Remote);

        handle
            .dispatch(cmd::GUIDE, &DispatchParams::new())
            .await
            .unwrap();
        handle
            .dispatch(cmd::HOME, &DispatchParams::new())
            .await
            .unwrap();

        emulator.wait_for_frames(2).await;
        assert_eq!(emulator.frames(), vec!["IRCODE Guide", "TELEPORT TIVO"]);
    }

    #[tokio::test]
    async fn sequences_run_in_order() {
        let emulator = Emulator::spawn(Mode::Live).await;
        let handle = handle(&emulator, EntityFlavour::Remote);

        let params = DispatchParams::new().with_sequence(vec![
            cmd::DIGIT_2.to_string(),
            cmd::DIGIT_3.to_string(),
            cmd::DIGIT_1.to_string(),
        ]);
        handle
            .dispatch(cmd::SEND_CMD_SEQUENCE, &params)
            .await
            .unwrap();

        emulator.wait_for_frames(3).await;
        assert_eq!(
            emulator.frames(),
            vec!["IRCODE num2", "IRCODE num3", "IRCODE num1"]
        );
    }

    #[tokio::test]
    async fn standby_toggle_tracks_power() {
        let emulator = Emulator::spawn(Mode::Live).await;
        let handle = handle(&emulator, EntityFlavour::Remote);

        handle.dispatch(cmd::OFF, &DispatchParams::new()).await.unwrap();
        assert_eq!(handle.power().await, PowerState::Off);

        // The off definition double-taps standby.
        emulator.wait_for_frames(2).await;
        assert_eq!(
            emulator.frames(),
            vec!["IRCODE Standby", "IRCODE Standby"]
        );

        handle.dispatch(cmd::ON, &DispatchParams::new()).await.unwrap();
        assert_eq!(handle.power().await, PowerState::On);
    }

    #[tokio::test]
    async fn unreachable_box_is_service_unavailable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport = TcpTransportFactory::new(Duration::from_millis(200))
            .create(&addr.ip().to_string(), addr.port());
        let handle = TivoHandle::new(
            DeviceId::new(),
            EntityFlavour::Remote,
            transport,
            EventBus::new(),
        );

        let err = handle
            .dispatch(cmd::GUIDE, &DispatchParams::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            vmtivo::error::DispatchError::ServiceUnavailable(_)
        ));
    }
}

// ============================================================================
// State inference tests
// ============================================================================

mod state {
    use super::*;

    fn handle(emulator: &Emulator, flavour: EntityFlavour) -> TivoHandle<TcpTransport> {
        TivoHandle::new(
            DeviceId::new(),
            flavour,
            short_transport_for(emulator),
            EventBus::new(),
        )
    }

    #[tokio::test]
    async fn pushing_box_is_on() {
        let emulator = Emulator::spawn(Mode::Live).await;
        let handle = handle(&emulator, EntityFlavour::Remote);
        assert_eq!(handle.query_state().await, PowerState::On);
    }

    #[tokio::test]
    async fn silent_box_is_off() {
        let emulator = Emulator::spawn(Mode::Silent).await;
        let handle = handle(&emulator, EntityFlavour::Remote);
        assert_eq!(handle.query_state().await, PowerState::Off);
    }

    #[tokio::test]
    async fn resetting_box_is_parked_in_the_dvr() {
        let emulator = Emulator::spawn(Mode::Reset).await;
        let handle = handle(&emulator, EntityFlavour::Remote);

        assert_eq!(handle.query_state().await, PowerState::On);
        assert_eq!(handle.mode().await, PlaybackMode::Dvr);
    }
}

// ============================================================================
// Driver end-to-end tests
// ============================================================================

mod driver {
    use super::*;

    #[tokio::test]
    async fn media_player_driver_surfaces_the_channel() {
        let emulator = Emulator::spawn(Mode::Live).await;
        let dir = tempfile::tempdir().unwrap();

        let mut driver = TivoDriver::new(
            TcpTransportFactory::default(),
            EntityFlavour::MediaPlayer,
            dir.path(),
        )
        .unwrap();
        let mut events = driver.subscribe();

        let entry =
            DeviceEntry::new(emulator.address(), "Lounge").with_port(emulator.port());
        let id = driver.add_device(entry).unwrap();
        assert_eq!(events.recv().await.unwrap(), DeviceEvent::device_added(id));

        assert_eq!(driver.query_state(id).await.unwrap(), PowerState::Playing);
        assert_eq!(
            events.recv().await.unwrap(),
            DeviceEvent::attributes_changed(
                id,
                PowerState::Playing,
                PlaybackMode::Live,
                Some(231)
            )
        );
    }

    #[tokio::test]
    async fn polling_driver_publishes_state_changes() {
        let emulator = Emulator::spawn(Mode::Live).await;
        let dir = tempfile::tempdir().unwrap();

        let mut driver = TivoDriver::new(
            TcpTransportFactory::default(),
            EntityFlavour::Remote,
            dir.path(),
        )
        .unwrap()
        .with_poll_interval(Duration::from_secs(3600));

        let entry =
            DeviceEntry::new(emulator.address(), "Lounge").with_port(emulator.port());
        let id = driver.add_device(entry).unwrap();
        let mut events = driver.subscribe();

        driver.start_polling();
        // The first poll cycle runs immediately after spawn.
        let event = events.recv().await.unwrap();
        assert_eq!(
            event,
            DeviceEvent::attributes_changed(id, PowerState::On, PlaybackMode::Live, None)
        );

        driver.stop_polling().await;
    }

    #[tokio::test]
    async fn dispatch_after_removal_is_rejected() {
        let emulator = Emulator::spawn(Mode::Live).await;
        let dir = tempfile::tempdir().unwrap();

        let mut driver = TivoDriver::new(
            TcpTransportFactory::default(),
            EntityFlavour::Remote,
            dir.path(),
        )
        .unwrap();

        let entry =
            DeviceEntry::new(emulator.address(), "Lounge").with_port(emulator.port());
        let id = driver.add_device(entry).unwrap();
        driver.remove_device(id).await.unwrap();

        let err = driver
            .dispatch(id, cmd::GUIDE, &DispatchParams::new())
            .await
            .unwrap_err();
        assert!(matches!(err, vmtivo::error::Error::DeviceNotFound));
    }
}
