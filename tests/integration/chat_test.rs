//! Chat transport integration tests against a local websocket server

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;

use feedchat::client::{ChatStatus, ChatTransport, TransportEvent};
use feedchat::shared::{ClientError, Sender};

use crate::common::*;

async fn open_echo(server: &WsServer) -> ChatTransport {
    let mut chat = ChatTransport::new(server.url.clone());
    chat.open();
    assert_eq!(chat.status(), ChatStatus::Connecting);
    assert_eq!(next_event(&mut chat).await, TransportEvent::Opened);
    assert_eq!(chat.status(), ChatStatus::Open);
    chat
}

#[tokio::test]
async fn test_send_and_receive_echo() {
    let server = spawn_ws_server(WsMode::Echo).await;
    let mut chat = open_echo(&server).await;

    let sent = chat.send("hello").unwrap().unwrap();
    assert_eq!(chat.log().len(), 1);
    assert_eq!(chat.log()[0], sent);

    assert_eq!(
        next_event(&mut chat).await,
        TransportEvent::Received("hello".to_string())
    );

    let log = chat.log();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].sender, Sender::Local);
    assert_eq!(log[1].sender, Sender::Remote);
    assert_eq!(log[1].text, "hello");
    assert_ne!(log[0].id, log[1].id);
    assert!(log[1].timestamp >= log[0].timestamp);

    chat.close();
}

#[tokio::test]
async fn test_blank_messages_are_not_sent() {
    let server = spawn_ws_server(WsMode::Echo).await;
    let mut chat = open_echo(&server).await;

    assert_eq!(chat.send("").unwrap(), None);
    assert_eq!(chat.send("   ").unwrap(), None);
    assert!(chat.log().is_empty());
}

#[tokio::test]
async fn test_failed_handshake_returns_to_closed() {
    let mut chat = ChatTransport::new(unreachable_ws_url().await);
    chat.open();

    assert_matches!(next_event(&mut chat).await, TransportEvent::Failed(_));
    assert_eq!(chat.status(), ChatStatus::Closed);
    assert_eq!(chat.send("hi"), Err(ClientError::ChatNotOpen));
}

#[tokio::test]
async fn test_remote_close() {
    let server = spawn_ws_server(WsMode::CloseImmediately).await;
    let mut chat = ChatTransport::new(server.url.clone());
    chat.open();

    assert_eq!(next_event(&mut chat).await, TransportEvent::Opened);
    assert_matches!(next_event(&mut chat).await, TransportEvent::Closed { .. });
    assert_eq!(chat.status(), ChatStatus::Closed);
}

#[tokio::test]
async fn test_reopen_keeps_log_and_replaces_connection() {
    let server = spawn_ws_server(WsMode::Echo).await;
    let mut chat = open_echo(&server).await;
    chat.send("first").unwrap();
    next_event(&mut chat).await;

    chat.open();
    assert_eq!(chat.status(), ChatStatus::Connecting);
    assert_eq!(next_event(&mut chat).await, TransportEvent::Opened);

    chat.send("second").unwrap();
    assert_eq!(
        next_event(&mut chat).await,
        TransportEvent::Received("second".to_string())
    );

    let texts: Vec<&str> = chat.log().iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, vec!["first", "first", "second", "second"]);
}

#[tokio::test]
async fn test_close_is_idempotent() {
    let server = spawn_ws_server(WsMode::Echo).await;
    let mut chat = open_echo(&server).await;

    chat.close();
    chat.close();

    assert_eq!(chat.status(), ChatStatus::Closed);
    assert!(chat.poll_events().is_empty());
}
