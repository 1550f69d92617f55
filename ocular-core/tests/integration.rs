//! Integration tests — full connection lifecycle, message round-trips
//! and failure scenarios over a real TCP connection on localhost.

use std::time::Duration;

use ocular_core::{
    CaptureMessage, CompressionMethod, CompressorConfigurationMessage, Connection,
    ConnectionEvent, DisconnectReason, HelloMessage, Message, MouseControlMessage,
    message::MouseButton,
};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;

// ── Helpers ──────────────────────────────────────────────────────

/// Spin up a listener on an OS-assigned port. The listener is
/// returned so the caller can accept on it.
async fn ephemeral_listener() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    (listener, addr)
}

/// Connect a viewer-side and a host-side `Connection` to each other.
async fn connected_pair() -> (Connection, Connection) {
    let (listener, addr) = ephemeral_listener().await;

    let connect_handle = tokio::spawn(async move { Connection::connect(&addr).await.unwrap() });

    let (stream, _) = listener.accept().await.unwrap();
    let host = Connection::new(stream);
    let viewer = connect_handle.await.unwrap();
    (viewer, host)
}

/// Receive the next inbound message, failing on disconnect or timeout.
async fn recv_message(conn: &mut Connection) -> Message {
    let event = tokio::time::timeout(Duration::from_secs(5), conn.recv())
        .await
        .expect("timeout")
        .expect("event channel closed");
    match event {
        ConnectionEvent::Message(msg) => msg,
        ConnectionEvent::Disconnected(reason) => panic!("unexpected disconnect: {reason}"),
    }
}

/// Receive the disconnect event, skipping any messages before it.
async fn recv_disconnect(conn: &mut Connection) -> DisconnectReason {
    loop {
        let event = tokio::time::timeout(Duration::from_secs(5), conn.recv())
            .await
            .expect("timeout")
            .expect("event channel closed");
        if let ConnectionEvent::Disconnected(reason) = event {
            return reason;
        }
    }
}

// ── Lifecycle ────────────────────────────────────────────────────

#[tokio::test]
async fn hello_then_capture_exchange() {
    let (viewer, mut host) = connected_pair().await;

    viewer.send(Message::Hello(HelloMessage::current())).await.unwrap();

    let frame =
        CaptureMessage::new(1, CompressionMethod::None, None, b"frame-bytes".to_vec()).unwrap();
    viewer.send(Message::Capture(frame.clone())).await.unwrap();

    match recv_message(&mut host).await {
        Message::Hello(h) => assert_eq!(h, HelloMessage::current()),
        other => panic!("expected Hello, got {other:?}"),
    }
    match recv_message(&mut host).await {
        Message::Capture(c) => assert_eq!(c, frame),
        other => panic!("expected Capture, got {other:?}"),
    }
}

#[tokio::test]
async fn messages_arrive_in_send_order() {
    let (viewer, mut host) = connected_pair().await;

    for id in 1..=5 {
        let frame =
            CaptureMessage::new(id, CompressionMethod::None, None, vec![id as u8; 64]).unwrap();
        viewer.send(Message::Capture(frame)).await.unwrap();
    }

    for id in 1..=5 {
        match recv_message(&mut host).await {
            Message::Capture(c) => {
                assert_eq!(c.id(), id);
                assert_eq!(c.payload(), &vec![id as u8; 64][..]);
            }
            other => panic!("expected Capture, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn embedded_configuration_survives_the_wire() {
    let (viewer, mut host) = connected_pair().await;

    let cfg = CompressorConfigurationMessage::new(CompressionMethod::Zstd, 3);
    let frame =
        CaptureMessage::new(7, CompressionMethod::Zstd, Some(cfg), vec![0xCD; 2048]).unwrap();
    viewer.send(Message::Capture(frame.clone())).await.unwrap();

    match recv_message(&mut host).await {
        Message::Capture(c) => {
            assert_eq!(c.configuration(), Some(&cfg));
            assert_eq!(c, frame);
        }
        other => panic!("expected Capture, got {other:?}"),
    }
}

#[tokio::test]
async fn large_payload_transfer() {
    let (viewer, mut host) = connected_pair().await;

    let payload = vec![0xABu8; 2 * 1024 * 1024];
    let frame = CaptureMessage::new(9, CompressionMethod::Zstd, None, payload.clone()).unwrap();
    viewer.send(Message::Capture(frame)).await.unwrap();

    match recv_message(&mut host).await {
        Message::Capture(c) => {
            assert_eq!(c.payload().len(), payload.len());
            assert_eq!(c.payload(), &payload[..]);
        }
        other => panic!("expected Capture, got {other:?}"),
    }
}

#[tokio::test]
async fn control_events_flow_viewer_to_host() {
    let (viewer, mut host) = connected_pair().await;

    let event = MouseControlMessage::pressed(100, 200, MouseButton::Left);
    viewer.send(Message::MouseControl(event)).await.unwrap();
    viewer.send(Message::Goodbye).await.unwrap();

    match recv_message(&mut host).await {
        Message::MouseControl(e) => assert_eq!(e, event),
        other => panic!("expected MouseControl, got {other:?}"),
    }
    assert_eq!(recv_message(&mut host).await, Message::Goodbye);
}

// ── Failure scenarios ────────────────────────────────────────────

#[tokio::test]
async fn peer_drop_is_a_clean_disconnect() {
    let (viewer, mut host) = connected_pair().await;

    drop(viewer);

    match recv_disconnect(&mut host).await {
        DisconnectReason::PeerClosed | DisconnectReason::Transport(_) => {}
        DisconnectReason::Protocol(detail) => panic!("unexpected protocol fault: {detail}"),
    }
}

#[tokio::test]
async fn garbage_tag_tears_down_the_connection() {
    let (listener, addr) = ephemeral_listener().await;

    let connect_handle = tokio::spawn(async move { Connection::connect(&addr).await.unwrap() });

    // The "host" side stays a raw socket and poisons the stream with
    // an unregistered type tag.
    let (mut raw, _) = listener.accept().await.unwrap();
    let mut viewer = connect_handle.await.unwrap();

    raw.write_all(&[0xFF, 1, 2, 3]).await.unwrap();
    raw.flush().await.unwrap();

    match recv_disconnect(&mut viewer).await {
        DisconnectReason::Protocol(detail) => assert!(detail.contains("MessageType")),
        other => panic!("expected protocol violation, got {other}"),
    }
}

#[tokio::test]
async fn truncated_frame_tears_down_the_connection() {
    let (listener, addr) = ephemeral_listener().await;

    let connect_handle = tokio::spawn(async move { Connection::connect(&addr).await.unwrap() });

    let (mut raw, _) = listener.accept().await.unwrap();
    let mut viewer = connect_handle.await.unwrap();

    // A capture frame that declares 100 payload bytes and delivers 10,
    // then closes.
    let frame = CaptureMessage::new(3, CompressionMethod::None, None, vec![0u8; 100]).unwrap();
    let mut encoded = Vec::new();
    Message::Capture(frame).encode(&mut encoded).await.unwrap();
    raw.write_all(&encoded[..21]).await.unwrap();
    raw.shutdown().await.unwrap();
    drop(raw);

    match recv_disconnect(&mut viewer).await {
        DisconnectReason::Protocol(detail) => assert!(detail.contains("truncated")),
        other => panic!("expected truncation, got {other}"),
    }
}
