// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Anchor Auth Server - challenge/response account authentication
//!
//! An account proves control of its signing key by co-signing a short-lived,
//! anchor-signed challenge transaction. A valid challenge is exchanged for a
//! bearer token.
//!
//! ## Modules
//!
//! - `stellar` - Account IDs, keys, and the canonical envelope encoding
//! - `challenge` - Challenge construction, validation, and replay tracking
//! - `auth` - Token issuance and the bearer token extractor
//! - `api` - HTTP API handlers (Axum)

pub mod api;
pub mod auth;
pub mod challenge;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod stellar;

#[cfg(test)]
pub(crate) mod testing;
