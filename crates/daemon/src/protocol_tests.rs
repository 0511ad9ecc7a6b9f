// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn requests_are_tagged_json() {
    let request = Request::Invoke {
        urn: "urn:ccnet:local:core".to_string(),
        action: "force".to_string(),
    };

    let encoded = encode(&request).expect("encode failed");
    let json: serde_json::Value = serde_json::from_slice(&encoded).unwrap();

    assert_eq!(json["type"], "Invoke");
    assert_eq!(json["urn"], "urn:ccnet:local:core");
    assert_eq!(json["action"], "force");
}

#[test]
fn decode_action_list_response() {
    let json = br#"{"type":"Actions","actions":[{"name":"force","description":"Force a build"}]}"#;

    let decoded: Response = decode(json).expect("decode failed");

    assert_eq!(
        decoded,
        Response::Actions {
            actions: vec![ActionDefinition::new("force", "Force a build")]
        }
    );
}

#[test]
fn decode_rejects_unknown_request() {
    let result: Result<Request, _> = decode(br#"{"type":"Shutdown"}"#);
    assert!(matches!(result, Err(ProtocolError::Json(_))));
}

#[tokio::test]
async fn write_message_adds_length_prefix() {
    let data = b"test data";

    let mut buffer = Vec::new();
    write_message(&mut buffer, data).await.expect("write failed");

    let len = u32::from_be_bytes([buffer[0], buffer[1], buffer[2], buffer[3]]) as usize;
    assert_eq!(len, data.len());
    assert_eq!(&buffer[4..], data);
}

#[tokio::test]
async fn read_message_on_empty_stream_is_connection_closed() {
    let mut cursor = std::io::Cursor::new(Vec::<u8>::new());

    let result = read_message(&mut cursor).await;

    assert!(matches!(result, Err(ProtocolError::ConnectionClosed)));
}

#[tokio::test]
async fn read_message_rejects_oversized_prefix() {
    let mut buffer = ((MAX_MESSAGE_SIZE + 1) as u32).to_be_bytes().to_vec();
    buffer.extend_from_slice(b"ignored");
    let mut cursor = std::io::Cursor::new(buffer);

    let result = read_message(&mut cursor).await;

    assert!(matches!(result, Err(ProtocolError::MessageTooLarge(_))));
}

#[tokio::test]
async fn request_survives_the_wire() {
    let (mut client, mut server) = tokio::io::duplex(1024);
    let request = Request::List {
        urn: "urn:ccnet:local".to_string(),
    };

    write_request(&mut client, &request, DEFAULT_TIMEOUT)
        .await
        .expect("write failed");
    let received = read_request(&mut server, DEFAULT_TIMEOUT)
        .await
        .expect("read failed");

    assert_eq!(received, request);
}

#[tokio::test]
async fn read_request_times_out_on_silent_peer() {
    let (_client, mut server) = tokio::io::duplex(64);

    let result = read_request(&mut server, Duration::from_millis(20)).await;

    assert!(matches!(result, Err(ProtocolError::Timeout)));
}
