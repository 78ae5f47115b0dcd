//! Integration tests: RadioBridge lifecycle and event delivery through the
//! public API, with a recording transport standing in for native BLE.

use std::thread;

use hoppyshare::bridge::{
    BridgeEvent, BridgeState, EventChannel, RadioBridge, TransportStatus, deliver_message,
    report_status,
};
use hoppyshare::bridge::channels::EVENT_DEPTH;

use crate::mock_radio::{RadioCall, RecordingHandler, RecordingRadio};

#[test]
fn session_lifecycle_reaches_native_layer_in_order() {
    let ch = EventChannel::new();
    let mut bridge = RadioBridge::new(RecordingRadio::new(), &ch);

    bridge.start("dev-1", "peer-9").unwrap();
    bridge.publish(b"hello").unwrap();
    bridge.stop();

    assert_eq!(
        bridge.transport().calls,
        vec![
            RadioCall::Begin {
                client_id: "dev-1".into(),
                device_id: "peer-9".into(),
            },
            RadioCall::Send(b"hello".to_vec()),
            RadioCall::End,
        ]
    );
    assert_eq!(bridge.state(), BridgeState::Idle);
}

#[test]
fn empty_publish_never_reaches_native_layer() {
    let ch = EventChannel::new();
    let mut bridge = RadioBridge::new(RecordingRadio::new(), &ch);
    bridge.start("dev-1", "peer-9").unwrap();

    bridge.publish(&[]).unwrap();
    assert_eq!(
        bridge
            .transport()
            .count(|c| matches!(c, RadioCall::Send(_))),
        0
    );
}

#[test]
fn second_start_is_forwarded() {
    let ch = EventChannel::new();
    let mut bridge = RadioBridge::new(RecordingRadio::new(), &ch);
    bridge.start("dev-1", "peer-9").unwrap();
    bridge.start("dev-1", "peer-10").unwrap();

    assert_eq!(
        bridge
            .transport()
            .count(|c| matches!(c, RadioCall::Begin { .. })),
        2
    );
    assert!(bridge.is_started());
}

#[test]
fn publish_while_idle_is_forwarded() {
    let ch = EventChannel::new();
    let mut bridge = RadioBridge::new(RecordingRadio::new(), &ch);
    bridge.publish(&[0x42]).unwrap();
    assert_eq!(bridge.transport().sends(), vec![&[0x42][..]]);
}

#[test]
fn inbound_message_handled_exactly_once() {
    let ch = EventChannel::new();
    let bridge = RadioBridge::new(RecordingRadio::new(), &ch);
    deliver_message(&ch, "peer-9".into(), vec![0x01, 0x02]);

    let mut handler = RecordingHandler::default();
    assert_eq!(bridge.inbox().dispatch(&mut handler), 1);
    assert_eq!(bridge.inbox().dispatch(&mut handler), 0);
    assert_eq!(
        handler.messages,
        vec![("peer-9".to_owned(), vec![0x01, 0x02])]
    );
}

#[test]
fn status_events_reach_handler_after_messages_queued_before_them() {
    let ch = EventChannel::new();
    let bridge = RadioBridge::new(RecordingRadio::new(), &ch);
    deliver_message(&ch, "peer-9".into(), vec![7]);
    report_status(&ch, TransportStatus::PeerUnreachable);

    let mut order = Vec::new();
    bridge.inbox().drain(|e| {
        order.push(match e {
            BridgeEvent::Message(_) => "message",
            BridgeEvent::Status(_) => "status",
        })
    });
    assert_eq!(order, vec!["message", "status"]);
}

#[test]
fn deliveries_from_radio_thread_arrive_in_order() {
    static CH: EventChannel = EventChannel::new();
    let bridge = RadioBridge::new(RecordingRadio::new(), &CH);

    // More than the channel depth, so the producer has to wait on us.
    let producer = thread::spawn(|| {
        for i in 0u8..100 {
            deliver_message(&CH, "peer-9".into(), vec![i]);
        }
    });

    let inbox = bridge.inbox();
    let mut handler = RecordingHandler::default();
    while handler.messages.len() < 100 {
        if let BridgeEvent::Message(m) = inbox.next_blocking() {
            handler.messages.push((m.device_id, m.payload));
        }
    }
    producer.join().unwrap();

    let payloads: Vec<u8> = handler.messages.iter().map(|(_, p)| p[0]).collect();
    assert_eq!(payloads, (0u8..100).collect::<Vec<_>>());
    assert!(inbox.try_next().is_none());
}

#[test]
fn dispatch_routes_statuses_to_handler() {
    let ch = EventChannel::new();
    let bridge = RadioBridge::new(RecordingRadio::new(), &ch);
    report_status(
        &ch,
        TransportStatus::Connected {
            peer: "peer-9".into(),
        },
    );
    report_status(&ch, TransportStatus::Disconnected);

    let mut handler = RecordingHandler::default();
    bridge.inbox().dispatch(&mut handler);
    assert!(handler.messages.is_empty());
    assert_eq!(
        handler.statuses,
        vec![
            TransportStatus::Connected {
                peer: "peer-9".into()
            },
            TransportStatus::Disconnected,
        ]
    );
}

#[test]
fn native_thread_never_blocks_after_stop() {
    static CH: EventChannel = EventChannel::new();
    let mut bridge = RadioBridge::new(RecordingRadio::new(), &CH);
    bridge.start("dev-1", "peer-9").unwrap();
    bridge.stop();

    let (done_tx, done_rx) = std::sync::mpsc::channel();
    thread::spawn(move || {
        let delivered = (0..=EVENT_DEPTH)
            .filter(|&i| deliver_message(&CH, "peer-9".into(), vec![i as u8]))
            .count();
        let _ = done_tx.send(delivered);
    });

    let delivered = done_rx
        .recv_timeout(std::time::Duration::from_secs(5))
        .expect("native thread blocked after stop");
    assert_eq!(delivered, 0);
    assert_eq!(bridge.inbox().pending(), 0);
}

#[test]
fn stop_releases_native_thread_blocked_on_full_channel() {
    static CH: EventChannel = EventChannel::new();
    let mut bridge = RadioBridge::new(RecordingRadio::new(), &CH);
    bridge.start("dev-1", "peer-9").unwrap();

    let (done_tx, done_rx) = std::sync::mpsc::channel();
    thread::spawn(move || {
        for i in 0..=EVENT_DEPTH {
            deliver_message(&CH, "peer-9".into(), vec![i as u8]);
        }
        let _ = done_tx.send(());
    });
    while bridge.inbox().pending() < EVENT_DEPTH {
        thread::yield_now();
    }

    // Consumer gives up without draining, as after a fatal status.
    bridge.stop();
    done_rx
        .recv_timeout(std::time::Duration::from_secs(5))
        .expect("native thread still blocked after stop");
    assert_eq!(
        bridge
            .transport()
            .count(|c| matches!(c, RadioCall::End)),
        1
    );
}
