//! Native BLE bridge adapter.
//!
//! Implements [`RadioTransport`] on top of the platform BLEBridge library
//! (WinRT on Windows, CoreBluetooth on macOS) and exports the C entry
//! points that library calls back into.
//!
//! ## cfg gating
//!
//! - **`feature = "native-ble"`**: links `BLEBridge` and exports
//!   `hoppy_ble_on_message` / `hoppy_ble_on_status`.
//! - **always**: the marshaling helpers below, so host tests can exercise
//!   them without the native library.
//!
//! ## C interface
//!
//! | Direction | Symbol                                                   |
//! |-----------|----------------------------------------------------------|
//! | out       | `void BLEBridgeStart(const char*, const char*)`          |
//! | out       | `void BLEBridgeStop(void)`                               |
//! | out       | `void BLEBridgeSend(const void*, int)`                   |
//! | in        | `void hoppy_ble_on_message(const char*, const uint8_t*, int)` |
//! | in        | `void hoppy_ble_on_status(int, const char*)`             |
//!
//! Inbound calls arrive on a native thread and only touch the event
//! channel.

use core::ffi::{CStr, c_char, c_int};
use core::fmt;
use std::ffi::CString;

use log::{debug, warn};

use crate::bridge::channels::{EventChannel, TransportStatus, deliver_message, report_status};
use crate::bridge::transport::BridgeError;

#[cfg(feature = "native-ble")]
use crate::bridge::transport::RadioTransport;

/// Status code attached to deliveries the bridge could not accept.
pub const MALFORMED_DELIVERY: i32 = -1;

// ── Marshaling helpers ───────────────────────────────────────

/// Convert a text argument for the native side.
pub fn to_c_string(field: &'static str, value: &str) -> Result<CString, BridgeError> {
    CString::new(value).map_err(|_| BridgeError::InteriorNul { field })
}

/// Native length of `payload`.
pub fn payload_len(payload: &[u8]) -> Result<c_int, BridgeError> {
    c_int::try_from(payload.len()).map_err(|_| BridgeError::PayloadTooLarge {
        len: payload.len(),
    })
}

/// Why an inbound native delivery was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundRejected {
    NullDeviceId,
    /// Device ids are passed through unmodified, so they must be UTF-8.
    InvalidDeviceId,
    NegativeLength(c_int),
    NullData { len: usize },
}

impl fmt::Display for InboundRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NullDeviceId => write!(f, "null device id"),
            Self::InvalidDeviceId => write!(f, "device id is not valid UTF-8"),
            Self::NegativeLength(len) => write!(f, "negative payload length {}", len),
            Self::NullData { len } => write!(f, "null payload pointer with length {}", len),
        }
    }
}

/// Copy a native delivery into owned values.
///
/// # Safety
///
/// `device_id`, when non-null, must point to a NUL-terminated string and
/// `data`, when non-null, to at least `len` readable bytes, both valid for
/// the duration of the call.
pub unsafe fn inbound_from_raw(
    device_id: *const c_char,
    data: *const u8,
    len: c_int,
) -> Result<(String, Vec<u8>), InboundRejected> {
    if device_id.is_null() {
        return Err(InboundRejected::NullDeviceId);
    }
    let len = usize::try_from(len).map_err(|_| InboundRejected::NegativeLength(len))?;
    let payload = if len == 0 {
        Vec::new()
    } else if data.is_null() {
        return Err(InboundRejected::NullData { len });
    } else {
        // SAFETY: non-null and `len` readable bytes per the caller contract.
        unsafe { core::slice::from_raw_parts(data, len) }.to_vec()
    };
    // SAFETY: non-null and NUL-terminated per the caller contract.
    let id = unsafe { CStr::from_ptr(device_id) }
        .to_str()
        .map_err(|_| InboundRejected::InvalidDeviceId)?
        .to_owned();
    Ok((id, payload))
}

/// Queue a native message delivery on `channel`. Malformed deliveries are
/// reported as a status event instead.
///
/// # Safety
///
/// Same contract as [`inbound_from_raw`].
pub unsafe fn accept_inbound(
    channel: &EventChannel,
    device_id: *const c_char,
    data: *const u8,
    len: c_int,
) {
    // SAFETY: forwarded caller contract.
    match unsafe { inbound_from_raw(device_id, data, len) } {
        Ok((id, payload)) => {
            deliver_message(channel, id, payload);
        }
        Err(reason) => {
            warn!("NativeBle: rejected inbound delivery: {}", reason);
            report_status(
                channel,
                TransportStatus::Unknown {
                    code: MALFORMED_DELIVERY,
                    detail: Some(reason.to_string()),
                },
            );
        }
    }
}

/// Queue a native status report on `channel`.
///
/// # Safety
///
/// `detail`, when non-null, must point to a NUL-terminated string valid
/// for the duration of the call.
pub unsafe fn accept_status(channel: &EventChannel, code: c_int, detail: *const c_char) {
    let detail = if detail.is_null() {
        None
    } else {
        // SAFETY: non-null and NUL-terminated per the caller contract.
        Some(
            unsafe { CStr::from_ptr(detail) }
                .to_string_lossy()
                .into_owned(),
        )
    };
    let status = TransportStatus::from_code(code, detail);
    if status.is_fatal() {
        warn!("NativeBle: {:?}", status);
    } else {
        debug!("NativeBle: {:?}", status);
    }
    report_status(channel, status);
}

// ── Native library binding ───────────────────────────────────

#[cfg(feature = "native-ble")]
mod ffi {
    use core::ffi::{c_char, c_int, c_void};

    unsafe extern "C" {
        pub fn BLEBridgeStart(client_id: *const c_char, device_id: *const c_char);
        pub fn BLEBridgeStop();
        pub fn BLEBridgeSend(data: *const c_void, len: c_int);
    }
}

/// Channel fed by the exported native callbacks.
#[cfg(feature = "native-ble")]
pub static NATIVE_EVENTS: EventChannel = EventChannel::new();

#[cfg(feature = "native-ble")]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn hoppy_ble_on_message(
    device_id: *const c_char,
    data: *const u8,
    len: c_int,
) {
    // SAFETY: the native bridge passes a NUL-terminated id and `len` bytes,
    // both owned by the caller until this returns.
    unsafe { accept_inbound(&NATIVE_EVENTS, device_id, data, len) }
}

#[cfg(feature = "native-ble")]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn hoppy_ble_on_status(code: c_int, detail: *const c_char) {
    // SAFETY: `detail` is null or a NUL-terminated string owned by the caller.
    unsafe { accept_status(&NATIVE_EVENTS, code, detail) }
}

/// [`RadioTransport`] backed by the platform BLEBridge library.
#[cfg(feature = "native-ble")]
#[derive(Debug, Default)]
pub struct NativeBle;

#[cfg(feature = "native-ble")]
impl NativeBle {
    pub fn new() -> Self {
        Self
    }

    /// The channel this transport's callbacks deliver into.
    pub fn events() -> &'static EventChannel {
        &NATIVE_EVENTS
    }
}

#[cfg(feature = "native-ble")]
impl RadioTransport for NativeBle {
    fn begin_session(&mut self, client_id: &str, device_id: &str) -> Result<(), BridgeError> {
        let client = to_c_string("client_id", client_id)?;
        let device = to_c_string("device_id", device_id)?;
        // SAFETY: both strings outlive the call; the library copies them.
        unsafe { ffi::BLEBridgeStart(client.as_ptr(), device.as_ptr()) };
        Ok(())
    }

    fn end_session(&mut self) {
        // SAFETY: no arguments; the library tolerates stop without start.
        unsafe { ffi::BLEBridgeStop() };
    }

    fn send(&mut self, payload: &[u8]) -> Result<(), BridgeError> {
        let len = payload_len(payload)?;
        // SAFETY: `payload` is valid for `len` bytes for the duration of the
        // call; the library copies it before returning.
        unsafe { ffi::BLEBridgeSend(payload.as_ptr().cast(), len) };
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────
