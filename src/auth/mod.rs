// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Challenge/response account authentication and the bearer tokens it mints.
//!
//! ## Auth Flow
//!
//! 1. Client requests a challenge for its account (`GET /auth`)
//! 2. Anchor returns a challenge transaction signed with the anchor key
//! 3. Client co-signs with the account key and posts it back (`POST /auth`)
//! 4. Anchor validates the challenge and returns a JWT:
//!    - `sub` → authenticated account ID
//!    - `jti` → hex hash of the challenge
//! 5. Client sends `Authorization: Bearer <token>` on later requests
//!
//! ## Security
//!
//! - Challenges expire after 5 minutes and are single-use
//! - Signatures are scoped to the configured network passphrase
//! - Tokens expire after 24 hours; clock skew tolerance is 60 seconds

pub mod claims;
pub mod error;
pub mod extractor;
pub mod service;
pub mod token;

pub use claims::AuthenticatedAccount;
pub use error::AuthError;
pub use extractor::Auth;
pub use service::{AuthService, AuthenticateError};
pub use token::{IssuedToken, TokenClaims, TokenError, TokenIssuer};
