//! Bridge event deserialization and listener tests.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use pantrybot::whatsapp::events::{spawn_event_listener, WhatsAppEvent};

/// Serve exactly one canned HTTP response and return the server URL.
async fn serve_once(body: &str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let addr = listener
        .local_addr()
        .expect("listener should expose local addr");

    let body_owned = body.to_owned();
    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            let mut read_buf = [0_u8; 1024];
            let _ = socket.read(&mut read_buf).await;

            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body_owned}",
                body_owned.len()
            );
            let _ = socket.write_all(response.as_bytes()).await;
        }
    });

    format!("http://{addr}")
}

#[test]
fn message_event_deserializes() {
    let event: WhatsAppEvent = serde_json::from_str(
        r#"{"type":"message","jid":"5511999@s.whatsapp.net","text":"oi","from_me":false}"#,
    )
    .expect("event should parse");

    match event {
        WhatsAppEvent::Message { jid, text, from_me } => {
            assert_eq!(jid, "5511999@s.whatsapp.net");
            assert_eq!(text, "oi");
            assert!(!from_me);
        }
        other => panic!("expected Message, got {other:?}"),
    }
}

#[test]
fn extra_bridge_fields_are_tolerated() {
    // The bridge sends fields this bot has no use for, such as message
    // identifiers and timestamps; they must not break parsing.
    let event: WhatsAppEvent = serde_json::from_str(
        r#"{"type":"message","jid":"j@s.whatsapp.net","text":"oi","from_me":true,"message_id":"ABCD","timestamp":"2026-08-30T12:00:00Z"}"#,
    )
    .expect("event with extra fields should parse");
    assert!(matches!(event, WhatsAppEvent::Message { from_me: true, .. }));
}

#[test]
fn connection_events_deserialize() {
    let connected: WhatsAppEvent =
        serde_json::from_str(r#"{"type":"connected"}"#).expect("connected should parse");
    assert!(matches!(connected, WhatsAppEvent::Connected));

    let disconnected: WhatsAppEvent =
        serde_json::from_str(r#"{"type":"disconnected","reason":"logged out"}"#)
            .expect("disconnected should parse");
    match disconnected {
        WhatsAppEvent::Disconnected { reason } => {
            assert_eq!(reason.as_deref(), Some("logged out"));
        }
        other => panic!("expected Disconnected, got {other:?}"),
    }
}

#[tokio::test]
async fn listener_delivers_polled_events_to_the_channel() {
    let batch = r#"[{"type":"message","jid":"j@s.whatsapp.net","text":"adicione arroz","from_me":false}]"#;
    let url = serve_once(batch).await;

    let (event_tx, mut event_rx) = mpsc::channel(8);
    let listener = spawn_event_listener(url, event_tx);

    let event = tokio::time::timeout(std::time::Duration::from_secs(5), event_rx.recv())
        .await
        .expect("listener should deliver within the timeout")
        .expect("channel should be open");

    match event {
        WhatsAppEvent::Message { text, .. } => assert_eq!(text, "adicione arroz"),
        other => panic!("expected Message, got {other:?}"),
    }

    listener.abort();
}
