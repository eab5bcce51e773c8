//! Integration tests against mocked HTTP endpoints and a local websocket

pub mod chat_test;
pub mod feed_test;
