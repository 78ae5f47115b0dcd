//! Log-based sinks.
//!
//! - [`init`] installs a `tracing-subscriber` formatter on stderr as the
//!   process-wide backend. `log` records reach it through the subscriber's
//!   `tracing-log` bridge.
//! - [`LogEventSink`] implements [`InboundHandler`] by logging every bridge
//!   event. A clipboard or file-drop consumer would implement the same
//!   trait.

use log::{Level, info, warn};
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt};

use crate::app::ports::InboundHandler;
use crate::bridge::channels::TransportStatus;

// ── Backend ──────────────────────────────────────────────────

/// Filter used when the configured directive does not parse.
const FALLBACK_DIRECTIVE: &str = "info";

/// Build the filter for an `EnvFilter` directive such as `debug` or
/// `warn,hoppyshare::bridge=trace`.
pub fn filter_from(directive: &str) -> EnvFilter {
    EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(FALLBACK_DIRECTIVE))
}

/// Install the stderr formatter as the global subscriber and route `log`
/// records into it. `directive` is usually `HOPPYSHARE_LOG`.
pub fn init(directive: &str) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(filter_from(directive))
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .try_init()
}

// ── Bridge event sink ────────────────────────────────────────

/// Logs every inbound message and transport status.
#[derive(Debug, Default)]
pub struct LogEventSink {
    received: usize,
}

impl LogEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages seen so far.
    pub fn received(&self) -> usize {
        self.received
    }
}

impl InboundHandler for LogEventSink {
    fn on_message(&mut self, device_id: &str, payload: &[u8]) {
        self.received += 1;
        info!("RECV  | from={} | {}B", device_id, payload.len());
    }

    fn on_status(&mut self, status: &TransportStatus) {
        let level = if status.is_fatal() {
            Level::Warn
        } else {
            Level::Info
        };
        match status {
            TransportStatus::Connected { peer } => info!("LINK  | connected peer={}", peer),
            TransportStatus::Unknown { code, detail } => warn!(
                "LINK  | status code={} detail={}",
                code,
                detail.as_deref().unwrap_or("-")
            ),
            other => log::log!(level, "LINK  | {:?}", other),
        }
    }
}

// ── Tests ────────────────────────────────────────────────────
