//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter      | Implements      | Connects to                          |
//! |--------------|-----------------|--------------------------------------|
//! | `keychain`   | SecretStore     | OS keychain / in-memory map          |
//! | `log_sink`   | InboundHandler  | `log` facade, stderr                 |
//! | `native_ble` | RadioTransport  | platform BLEBridge library (FFI)     |

pub mod keychain;
pub mod log_sink;
pub mod native_ble;
