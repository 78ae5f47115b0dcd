//! HoppyShare desktop client core.
//!
//! Loads the device identity (device id, mTLS certificate chain and group
//! key) from one of three deployment sources, and ferries payloads between
//! this device and a nearby peer over the platform BLE bridge.
//!
//! Native code is confined to `adapters::native_ble`, behind the
//! `native-ble` feature; everything else builds and tests on any host.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod bridge;
pub mod config;
pub mod error;
pub mod identity;
pub mod provision;

pub use bridge::{BridgeEvent, RadioBridge, RadioTransport, TransportStatus};
pub use config::{DeploymentMode, ProvisionConfig};
pub use error::{ProvisionError, Result};
pub use identity::{Field, IdentityBundle};
pub use provision::Provisioner;
