//! Shared helpers for integration tests

#![allow(dead_code)]

use jsonarena::{Arena, ErrorCode, JsonValue, Node, ParseError, parse};

/// Install a fmt subscriber once so `RUST_LOG=jsonarena=trace` shows parser logs
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Parse into a fresh arena
pub fn parse_fresh(input: &str) -> (Arena, Result<JsonValue, ParseError>) {
    let mut arena = Arena::new();
    let result = parse(input.as_bytes(), &mut arena);
    (arena, result)
}

/// Error code of parsing `input`
pub fn code_of(input: &str) -> ErrorCode {
    ErrorCode::of(&parse_fresh(input).1)
}

/// Convert a node into a `serde_json::Value` through its `Serialize` impl
pub fn to_serde(node: Node<'_>) -> serde_json::Value {
    serde_json::to_value(node).unwrap()
}
