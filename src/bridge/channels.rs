//! Bridge event channel.
//!
//! The native radio stack calls back on its own thread. Those callbacks
//! only push onto a bounded `embassy-sync` channel; the application drains
//! it on its own schedule through an [`Inbox`].
//!
//! ```text
//! ┌──────────────────┐  BridgeEvent  ┌──────────────┐
//! │  native BLE      │──────────────▶│  Inbox       │──▶ InboundHandler
//! │  (radio thread)  │  (bounded)    │  (app thread)│
//! └──────────────────┘               └──────────────┘
//! ```
//!
//! Messages are not dropped while the channel is open: a full channel
//! blocks the delivering thread until the consumer catches up. Closing the
//! channel (on bridge `stop`) releases a blocked delivery, discards queued
//! events, and drops later deliveries until it is reopened. Status events
//! are advisory and are dropped (with a warning) instead of blocking.

use core::sync::atomic::{AtomicBool, Ordering};
use core::task::Poll;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, TrySendError};
use embassy_sync::waitqueue::AtomicWaker;
use futures_lite::future::{block_on, poll_fn};
use log::{debug, warn};

use crate::app::ports::InboundHandler;

/// Channel depth for bridge events.
pub const EVENT_DEPTH: usize = 32;

/// Native → application event channel with an open/closed gate.
pub struct EventChannel {
    queue: Channel<CriticalSectionRawMutex, BridgeEvent, EVENT_DEPTH>,
    closed: AtomicBool,
    close_waker: AtomicWaker,
}

impl EventChannel {
    /// An open, empty channel.
    pub const fn new() -> Self {
        Self {
            queue: Channel::new(),
            closed: AtomicBool::new(false),
            close_waker: AtomicWaker::new(),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Accept deliveries again.
    pub fn reopen(&self) {
        self.closed.store(false, Ordering::SeqCst);
    }

    /// Events currently queued.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Stop accepting deliveries, release any blocked producer and discard
    /// queued events. Returns the number of events discarded.
    pub fn close(&self) -> usize {
        self.closed.store(true, Ordering::SeqCst);
        self.close_waker.wake();
        let mut discarded = 0;
        while self.queue.try_receive().is_ok() {
            discarded += 1;
        }
        if discarded > 0 {
            debug!("RadioBridge: discarded {} queued event(s) on close", discarded);
        }
        discarded
    }
}

impl Default for EventChannel {
    fn default() -> Self {
        Self::new()
    }
}

/// One payload received from a peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Sending peer's device id.
    pub device_id: String,
    pub payload: Vec<u8>,
}

/// Link-level condition reported by the native layer after `start`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportStatus {
    Connected { peer: String },
    Disconnected,
    RadioUnavailable,
    PeerUnreachable,
    SendFailed,
    Unknown { code: i32, detail: Option<String> },
}

impl TransportStatus {
    /// Map a native status code. `detail` carries the peer id for
    /// `Connected` and free text otherwise.
    pub fn from_code(code: i32, detail: Option<String>) -> Self {
        match code {
            0 => Self::Connected {
                peer: detail.unwrap_or_default(),
            },
            1 => Self::Disconnected,
            2 => Self::RadioUnavailable,
            3 => Self::PeerUnreachable,
            4 => Self::SendFailed,
            code => Self::Unknown { code, detail },
        }
    }

    /// The radio cannot be used at all for this session.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::RadioUnavailable)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeEvent {
    Message(InboundMessage),
    Status(TransportStatus),
}

/// Queue one inbound payload. Blocks while the channel is full and open.
///
/// Returns `false` if the message was dropped because the channel is, or
/// became, closed.
pub fn deliver_message(channel: &EventChannel, device_id: String, payload: Vec<u8>) -> bool {
    if channel.is_closed() {
        warn!(
            "RadioBridge: channel closed, dropping {}B from {}",
            payload.len(),
            device_id
        );
        return false;
    }
    let mut pending = Some(BridgeEvent::Message(InboundMessage { device_id, payload }));
    let delivered = block_on(poll_fn(|cx| {
        loop {
            if channel.is_closed() {
                return Poll::Ready(false);
            }
            let Some(event) = pending.take() else {
                return Poll::Ready(true);
            };
            match channel.queue.try_send(event) {
                Ok(()) => return Poll::Ready(true),
                Err(TrySendError::Full(event)) => {
                    pending = Some(event);
                    channel.close_waker.register(cx.waker());
                    if channel.is_closed() {
                        continue;
                    }
                    if channel.queue.poll_ready_to_send(cx).is_pending() {
                        debug!("RadioBridge: event channel full, waiting for consumer");
                        return Poll::Pending;
                    }
                }
            }
        }
    }));
    if !delivered {
        warn!("RadioBridge: channel closed while waiting, message dropped");
    }
    delivered
}

/// Queue a status event. Dropped if the channel is full or closed.
pub fn report_status(channel: &EventChannel, status: TransportStatus) {
    if channel.is_closed() {
        debug!("RadioBridge: channel closed, dropping status {:?}", status);
        return;
    }
    if let Err(TrySendError::Full(BridgeEvent::Status(status))) =
        channel.queue.try_send(BridgeEvent::Status(status))
    {
        warn!("RadioBridge: event channel full, dropping status {:?}", status);
    }
}

/// Application-side reader of an [`EventChannel`].
#[derive(Clone, Copy)]
pub struct Inbox<'a> {
    channel: &'a EventChannel,
}

impl<'a> Inbox<'a> {
    pub fn new(channel: &'a EventChannel) -> Self {
        Self { channel }
    }

    /// Next event if one is queued.
    pub fn try_next(&self) -> Option<BridgeEvent> {
        self.channel.queue.try_receive().ok()
    }

    /// Wait for the next event.
    pub async fn next(&self) -> BridgeEvent {
        self.channel.queue.receive().await
    }

    /// Block the calling thread until the next event.
    pub fn next_blocking(&self) -> BridgeEvent {
        block_on(self.next())
    }

    pub fn pending(&self) -> usize {
        self.channel.pending()
    }

    /// Hand every queued event to `handler` in arrival order.
    /// Returns the number of events processed.
    pub fn drain(&self, mut handler: impl FnMut(BridgeEvent)) -> usize {
        let mut n = 0;
        while let Some(event) = self.try_next() {
            handler(event);
            n += 1;
        }
        n
    }

    /// Drain queued events into an [`InboundHandler`].
    pub fn dispatch<H: InboundHandler + ?Sized>(&self, handler: &mut H) -> usize {
        self.drain(|event| match event {
            BridgeEvent::Message(msg) => handler.on_message(&msg.device_id, &msg.payload),
            BridgeEvent::Status(status) => handler.on_status(&status),
        })
    }
}

// ── Tests ────────────────────────────────────────────────────
