// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! once at startup and is read-only afterwards. Rotating the signing key
//! requires a restart.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `ANCHOR_SIGNING_SEED` | Anchor secret seed (`S...`) | Required |
//! | `NETWORK_PASSPHRASE` | Network the signatures are scoped to | Test network |
//! | `JWT_SECRET` | HS256 key for issued tokens | Required |
//! | `JWT_ISSUER` | `iss` claim of issued tokens | empty |
//! | `CHALLENGE_TTL_SECS` | Challenge validity window | `300` |
//! | `TOKEN_TTL_SECS` | Token lifetime | `86400` |
//! | `REPLAY_CACHE_CAPACITY` | Consumed challenges remembered (0 disables) | `10000` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::str::FromStr;
use std::time::Duration;

use crate::stellar::{network::TEST_NETWORK_PASSPHRASE, AccountId, Keypair, Network};

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";

/// Anchor secret seed. Never logged.
pub const SIGNING_SEED_ENV: &str = "ANCHOR_SIGNING_SEED";

pub const NETWORK_PASSPHRASE_ENV: &str = "NETWORK_PASSPHRASE";
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
pub const JWT_ISSUER_ENV: &str = "JWT_ISSUER";
pub const CHALLENGE_TTL_ENV: &str = "CHALLENGE_TTL_SECS";
pub const TOKEN_TTL_ENV: &str = "TOKEN_TTL_SECS";
pub const REPLAY_CACHE_CAPACITY_ENV: &str = "REPLAY_CACHE_CAPACITY";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_CHALLENGE_TTL_SECS: u64 = 300;
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 86_400;
pub const DEFAULT_REPLAY_CACHE_CAPACITY: usize = 10_000;
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Configuration errors (fatal at startup).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    pub fn from_env() -> Self {
        std::env::var(LOG_FORMAT_ENV)
            .map(|v| Self::parse(&v))
            .unwrap_or_default()
    }

    fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        }
    }
}

/// Process-wide anchor configuration.
#[derive(Clone)]
pub struct AnchorConfig {
    pub host: String,
    pub port: u16,
    pub signing_key: Keypair,
    pub network: Network,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub challenge_ttl: Duration,
    pub token_ttl: Duration,
    pub replay_cache_capacity: usize,
}

impl AnchorConfig {
    /// Load from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let seed = lookup(SIGNING_SEED_ENV).ok_or(ConfigError::Missing(SIGNING_SEED_ENV))?;
        let signing_key =
            Keypair::from_secret_seed(seed.trim()).map_err(|e| ConfigError::Invalid {
                name: SIGNING_SEED_ENV,
                reason: e.to_string(),
            })?;

        let jwt_secret = lookup(JWT_SECRET_ENV)
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing(JWT_SECRET_ENV))?;

        let network = Network::new(
            lookup(NETWORK_PASSPHRASE_ENV).unwrap_or_else(|| TEST_NETWORK_PASSPHRASE.to_string()),
        );

        Ok(Self {
            host: lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_or(&lookup, PORT_ENV, DEFAULT_PORT)?,
            signing_key,
            network,
            jwt_secret,
            jwt_issuer: lookup(JWT_ISSUER_ENV).unwrap_or_default(),
            challenge_ttl: Duration::from_secs(parse_or(
                &lookup,
                CHALLENGE_TTL_ENV,
                DEFAULT_CHALLENGE_TTL_SECS,
            )?),
            token_ttl: Duration::from_secs(parse_or(
                &lookup,
                TOKEN_TTL_ENV,
                DEFAULT_TOKEN_TTL_SECS,
            )?),
            replay_cache_capacity: parse_or(
                &lookup,
                REPLAY_CACHE_CAPACITY_ENV,
                DEFAULT_REPLAY_CACHE_CAPACITY,
            )?,
        })
    }

    /// The anchor account, derived from the signing key.
    pub fn server_account(&self) -> AccountId {
        self.signing_key.account_id()
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
    }
}
