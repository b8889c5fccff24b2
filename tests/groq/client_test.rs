//! Transport client tests against a local one-shot HTTP server.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use pantrybot::groq::completions::{GroqClient, GROQ_API_BASE};
use pantrybot::groq::{ActionExtractor, GroqError};
use pantrybot::inventory::{Action, Quantity};

/// Serve exactly one canned HTTP response and return the server URL.
async fn serve_once(status_line: &str, body: &str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let addr = listener
        .local_addr()
        .expect("listener should expose local addr");

    let status_line_owned = status_line.to_owned();
    let body_owned = body.to_owned();
    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            let mut read_buf = [0_u8; 8192];
            let _ = socket.read(&mut read_buf).await;

            let response = format!(
                "HTTP/1.1 {status_line_owned}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body_owned}",
                body_owned.len()
            );
            let _ = socket.write_all(response.as_bytes()).await;
        }
    });

    format!("http://{addr}/")
}

fn client_for(url: String) -> GroqClient {
    GroqClient::with_base_url(
        "openai/gpt-oss-120b".to_owned(),
        Some("gsk_test".to_owned()),
        url,
    )
}

#[test]
fn default_client_targets_groq() {
    let client = GroqClient::new(Some("gsk_test".to_owned()));
    assert_eq!(client.base_url(), GROQ_API_BASE);
    assert_eq!(client.model(), "openai/gpt-oss-120b");
    assert!(client.has_api_key());
}

#[tokio::test]
async fn missing_api_key_fails_before_any_network_io() {
    // No server is listening here: if the client attempted I/O the error
    // would be a Request variant, not MissingApiKey.
    let client = GroqClient::with_base_url(
        "openai/gpt-oss-120b".to_owned(),
        None,
        "http://127.0.0.1:9/never".to_owned(),
    );

    let result = client.extract("adicione arroz").await;
    assert!(matches!(result, Err(GroqError::MissingApiKey)));
}

#[tokio::test]
async fn non_success_status_carries_status_and_raw_body() {
    let url = serve_once("429 Too Many Requests", r#"{"error":"rate limited"}"#).await;

    let result = client_for(url).extract("adicione arroz").await;
    match result {
        Err(GroqError::HttpStatus { status, body }) => {
            assert_eq!(status, 429);
            assert_eq!(body, r#"{"error":"rate limited"}"#);
        }
        other => panic!("expected HttpStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_envelope_is_a_decode_error_with_body() {
    let url = serve_once("200 OK", "definitely not json").await;

    let result = client_for(url).extract("adicione arroz").await;
    match result {
        Err(GroqError::Decode { body, .. }) => assert_eq!(body, "definitely not json"),
        other => panic!("expected Decode, got {other:?}"),
    }
}

#[tokio::test]
async fn connection_failure_is_a_request_error() {
    // Port 9 (discard) with nothing listening: connection refused.
    let client = client_for("http://127.0.0.1:9/".to_owned());
    let result = client.extract("adicione arroz").await;
    assert!(matches!(result, Err(GroqError::Request(_))));
}

#[tokio::test]
async fn full_round_trip_extracts_the_inventory_action() {
    let envelope = serde_json::json!({
        "id": "chatcmpl-123",
        "choices": [{
            "message": {
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": "call_1",
                    "type": "function",
                    "function": {
                        "name": "update_inventory",
                        "arguments": "{\"action\":\"subtract\",\"item_name\":\"arroz\",\"quantity\":1,\"unit\":\"kilograms\",\"category\":\"geral\",\"location\":null,\"description\":null}"
                    }
                }]
            }
        }],
        "usage": {"total_tokens": 321}
    });
    let url = serve_once("200 OK", &envelope.to_string()).await;

    let action = client_for(url)
        .extract("subtraia 1 kilograma de arroz")
        .await
        .expect("round trip should extract");

    assert_eq!(action.action, Some(Action::Subtract));
    assert_eq!(action.item_name, "arroz");
    assert_eq!(action.quantity, Quantity::Count(1));
    assert_eq!(action.unit, "kilograms");
    assert_eq!(action.category, "geral");
}
