//! HoppyShare client: entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                   Adapters (outer ring)                  │
//! │                                                          │
//! │  OsKeychain        NativeBle / NullRadio   LogEventSink  │
//! │  (SecretStore)     (RadioTransport)        (Inbound)     │
//! │                                                          │
//! │  ─────────────── Port Trait Boundary ───────────────     │
//! │                                                          │
//! │  Provisioner (keychain | embedded | dev)                 │
//! │        │ IdentityBundle                                  │
//! │        ▼                                                 │
//! │  RadioBridge ◀──── EventChannel ◀──── native callbacks   │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Configuration comes from `HOPPYSHARE_*` environment variables; see
//! [`ProvisionConfig`].

#![deny(unused_must_use)]

use anyhow::{Context, Result};
use log::info;

use hoppyshare::adapters::keychain::OsKeychain;
use hoppyshare::adapters::log_sink::{self, LogEventSink};
use hoppyshare::app::ports::InboundHandler;
use hoppyshare::bridge::{BridgeEvent, RadioBridge, RadioTransport};
use hoppyshare::config::ProvisionConfig;
use hoppyshare::provision::Provisioner;

fn main() -> Result<()> {
    let config = ProvisionConfig::from_env().context("reading HOPPYSHARE_* configuration")?;
    log_sink::init(&config.log_level).context("installing logger")?;

    info!(
        "HoppyShare v{} starting (mode={})",
        env!("CARGO_PKG_VERSION"),
        config.mode
    );

    let provisioner = Provisioner::from_config(&config, OsKeychain::new());
    let identity = provisioner
        .resolve()
        .with_context(|| format!("loading device identity ({} mode)", config.mode))?;
    info!("Identity: {}", identity);

    let Some(peer) = config.ble_peer.as_deref() else {
        info!("No BLE peer configured (HOPPYSHARE_BLE_PEER), exiting");
        return Ok(());
    };

    run_bridge(identity.device_id(), peer)
}

#[cfg(feature = "native-ble")]
fn run_bridge(client_id: &str, peer: &str) -> Result<()> {
    use hoppyshare::adapters::native_ble::NativeBle;

    let bridge = RadioBridge::new(NativeBle::new(), NativeBle::events());
    serve(bridge, client_id, peer)
}

#[cfg(not(feature = "native-ble"))]
fn run_bridge(client_id: &str, peer: &str) -> Result<()> {
    use hoppyshare::bridge::{EventChannel, NullRadio, TransportStatus, report_status};

    static EVENTS: EventChannel = EventChannel::new();

    log::warn!("Built without native-ble; the bridge runs on NullRadio");
    report_status(&EVENTS, TransportStatus::RadioUnavailable);
    serve(RadioBridge::new(NullRadio, &EVENTS), client_id, peer)
}

/// Run one bridge session, logging events until the radio goes away.
fn serve<T: RadioTransport>(
    mut bridge: RadioBridge<'_, T>,
    client_id: &str,
    peer: &str,
) -> Result<()> {
    bridge
        .start(client_id, peer)
        .with_context(|| format!("starting BLE session with {}", peer))?;

    let inbox = bridge.inbox();
    let mut sink = LogEventSink::new();
    loop {
        match inbox.next_blocking() {
            BridgeEvent::Message(msg) => sink.on_message(&msg.device_id, &msg.payload),
            BridgeEvent::Status(status) => {
                sink.on_status(&status);
                if status.is_fatal() {
                    break;
                }
            }
        }
    }

    bridge.stop();
    info!("Bridge closed after {} message(s)", sink.received());
    Ok(())
}
