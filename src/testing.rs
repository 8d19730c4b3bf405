// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared fixtures for unit tests.

use std::sync::Arc;
use std::time::Duration;

use crate::auth::AuthService;
use crate::challenge::OsNonceSource;
use crate::config::AnchorConfig;
use crate::state::AppState;
use crate::stellar::{Keypair, Network};

/// Config with a fresh anchor key on the test network.
pub fn test_config() -> AnchorConfig {
    AnchorConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        signing_key: Keypair::random(),
        network: Network::testnet(),
        jwt_secret: "test-jwt-secret".to_string(),
        jwt_issuer: String::new(),
        challenge_ttl: Duration::from_secs(300),
        token_ttl: Duration::from_secs(86_400),
        replay_cache_capacity: 100,
    }
}

pub fn test_service() -> AuthService {
    AuthService::new(&test_config(), Arc::new(OsNonceSource))
}

pub fn test_state() -> AppState {
    AppState::new(test_service())
}
