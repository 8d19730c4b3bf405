// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authenticated account representation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::token::TokenClaims;

/// Account information extracted from a verified anchor token.
///
/// This is the type handlers receive for callers that completed the
/// challenge flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedAccount {
    /// Account ID (`sub` claim)
    pub account_id: String,

    /// Token ID (`jti` claim, hex challenge hash)
    pub token_id: String,

    /// Token expiration (Unix timestamp)
    pub expires_at: i64,

    /// Original issuer (used for validation, not serialized)
    #[serde(skip)]
    pub issuer: String,
}

impl AuthenticatedAccount {
    pub fn from_claims(claims: TokenClaims) -> Self {
        Self {
            account_id: claims.sub,
            token_id: claims.jti,
            expires_at: claims.exp,
            issuer: claims.iss,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_claims() -> TokenClaims {
        TokenClaims {
            iss: "https://anchor.example.com".to_string(),
            sub: "GABC".to_string(),
            iat: 1700000000,
            exp: 1700086400,
            jti: "deadbeef".to_string(),
        }
    }

    #[test]
    fn from_claims_extracts_account() {
        let account = AuthenticatedAccount::from_claims(sample_claims());
        assert_eq!(account.account_id, "GABC");
        assert_eq!(account.token_id, "deadbeef");
        assert_eq!(account.expires_at, 1700086400);
        assert_eq!(account.issuer, "https://anchor.example.com");
    }

    #[test]
    fn issuer_is_not_serialized() {
        let account = AuthenticatedAccount::from_claims(sample_claims());
        let json = serde_json::to_value(&account).unwrap();
        assert!(json.get("issuer").is_none());
        assert_eq!(json["account_id"], "GABC");
    }
}
