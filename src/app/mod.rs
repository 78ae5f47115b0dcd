//! Application boundary: the port traits the identity and radio
//! subsystems consume.
//!
//! Concrete adapters (OS keychain, in-memory store, native BLE library)
//! live in [`crate::adapters`]; everything above them is testable
//! against mocks.

pub mod ports;
