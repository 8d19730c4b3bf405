// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Challenge Protocol
//!
//! ## Flow
//!
//! 1. Client asks for a challenge for its account
//! 2. [`ChallengeFactory`] builds a transaction sourced by the anchor with one
//!    data write sourced by the client, carrying a random nonce
//! 3. The anchor signs it and hands it out via the [`codec`]
//! 4. The client co-signs and posts it back
//! 5. [`ChallengeValidator`] checks structure, window and both signatures
//!
//! Challenges are valid for 5 minutes by default.

pub mod codec;
pub mod error;
pub mod factory;
pub mod nonce;
pub mod replay;
pub mod validator;

pub use error::{ChallengeError, DecodeError, NonceError, ValidationFailure, ValidatorError};
pub use factory::ChallengeFactory;
pub use nonce::{FixedNonceSource, NonceSource, OsNonceSource};
pub use replay::ReplayGuard;
pub use validator::ChallengeValidator;

/// Current unix time in seconds.
pub(crate) fn unix_now() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0)
}
