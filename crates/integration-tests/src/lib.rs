//! Shared helpers for MediCart integration tests.
//!
//! The live tests in `tests/` require a running API gateway (and its
//! microservices) and are `#[ignore]`d by default. Point them at an
//! environment with `MEDICART_GATEWAY_URL`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use medicart_client::{
    GatewayClient, GatewayConfig, MemorySessionStore, RequestLog, SessionStore,
};

/// Base URL for the gateway (configurable via environment).
#[must_use]
pub fn gateway_base_url() -> String {
    std::env::var("MEDICART_GATEWAY_URL")
        .unwrap_or_else(|_| "http://localhost:8080".to_string())
}

/// Build a client with an ephemeral in-memory session so tests never touch a
/// developer's real session file.
///
/// # Panics
///
/// Panics if the configured base URL is invalid.
#[must_use]
pub fn test_client() -> (GatewayClient, Arc<dyn SessionStore>, RequestLog) {
    let config = GatewayConfig::for_base_url(&gateway_base_url())
        .expect("invalid MEDICART_GATEWAY_URL");
    let session: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
    let log = RequestLog::new();
    let client = GatewayClient::new(&config, Arc::clone(&session), log.clone());
    (client, session, log)
}

/// Demo credentials seeded by the gateway's data initializer (configurable).
#[must_use]
pub fn test_credentials() -> (String, String) {
    let email = std::env::var("MEDICART_TEST_EMAIL")
        .unwrap_or_else(|_| "user@medicart.test".to_string());
    let password =
        std::env::var("MEDICART_TEST_PASSWORD").unwrap_or_else(|_| "password123".to_string());
    (email, password)
}
