// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer token issuance and verification.
//!
//! Tokens are HS256 JWTs. The `jti` is the hex challenge hash, so each token
//! traces back to exactly one challenge.

use std::time::Duration;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::AuthError;
use crate::stellar::{Network, TransactionEnvelope, XdrError};

/// Clock skew tolerance (60 seconds).
const CLOCK_SKEW_LEEWAY: u64 = 60;

/// Default token lifetime (24 hours).
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Claims carried by issued tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Issuer (may be empty)
    pub iss: String,
    /// Authenticated account ID
    pub sub: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
    /// Hex-encoded challenge hash
    pub jti: String,
}

/// An encoded token plus the claims it carries.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: TokenClaims,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("validated challenge has no operation source account")]
    MissingSubject,

    #[error("failed to hash challenge: {0}")]
    Hash(#[source] XdrError),

    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// Mints and checks tokens with a process-wide secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    ttl: Duration,
    network: Network,
}

impl TokenIssuer {
    pub fn new(secret: &[u8], issuer: impl Into<String>, network: Network) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            issuer: issuer.into(),
            ttl: DEFAULT_TOKEN_TTL,
            network,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Issue a token for a challenge that has already passed validation.
    pub fn issue(&self, envelope: &TransactionEnvelope) -> Result<IssuedToken, TokenError> {
        self.issue_at(envelope, chrono::Utc::now().timestamp())
    }

    pub fn issue_at(
        &self,
        envelope: &TransactionEnvelope,
        now: i64,
    ) -> Result<IssuedToken, TokenError> {
        let subject = envelope
            .tx
            .operations
            .first()
            .and_then(|op| op.source_account)
            .ok_or(TokenError::MissingSubject)?;
        let hash = envelope
            .tx
            .hash(&self.network)
            .map_err(TokenError::Hash)?;

        let ttl = i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX);
        let claims = TokenClaims {
            iss: self.issuer.clone(),
            sub: subject.to_string(),
            iat: now,
            exp: now.saturating_add(ttl),
            jti: hex::encode(hash),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(TokenError::Signing)?;

        Ok(IssuedToken { token, claims })
    }

    /// Verify a token previously issued by this anchor.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = CLOCK_SKEW_LEEWAY;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        // Validate issuer if configured
        if !self.issuer.is_empty() {
            validation.set_issuer(&[&self.issuer]);
        }

        let token_data = decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                jsonwebtoken::errors::ErrorKind::InvalidIssuer => AuthError::InvalidIssuer,
                jsonwebtoken::errors::ErrorKind::ImmatureSignature => AuthError::TokenNotYetValid,
                _ => AuthError::MalformedToken,
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stellar::{Keypair, Memo, Operation, OperationBody, TimeBounds, Transaction};

    fn envelope_for(client: &Keypair) -> TransactionEnvelope {
        TransactionEnvelope::new(Transaction {
            source_account: Keypair::from_seed_bytes(&[1u8; 32]).account_id(),
            fee: 100,
            sequence: 0,
            time_bounds: Some(TimeBounds {
                min_time: 1,
                max_time: 301,
            }),
            memo: Memo::None,
            operations: vec![Operation {
                source_account: Some(client.account_id()),
                body: OperationBody::ManageData {
                    name: "anchor auth".to_string(),
                    value: Some(b"nonce".to_vec()),
                },
            }],
        })
    }

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(b"test-secret", "", Network::testnet())
    }

    #[test]
    fn claims_are_bound_to_challenge() {
        let client = Keypair::random();
        let env = envelope_for(&client);
        let now = chrono::Utc::now().timestamp();
        let issued = issuer().issue_at(&env, now).unwrap();

        assert_eq!(issued.claims.sub, client.account_id().to_string());
        assert_eq!(issued.claims.iss, "");
        assert_eq!(issued.claims.exp - issued.claims.iat, 86_400);
        assert_eq!(
            issued.claims.jti,
            hex::encode(env.tx.hash(&Network::testnet()).unwrap())
        );
    }

    #[test]
    fn distinct_challenges_get_distinct_ids() {
        let client = Keypair::random();
        let a = envelope_for(&client);
        let mut b = envelope_for(&client);
        b.tx.time_bounds = Some(TimeBounds {
            min_time: 2,
            max_time: 302,
        });
        let issuer = issuer();
        assert_ne!(
            issuer.issue_at(&a, 0).unwrap().claims.jti,
            issuer.issue_at(&b, 0).unwrap().claims.jti
        );
    }

    #[test]
    fn issued_token_verifies() {
        let env = envelope_for(&Keypair::random());
        let issuer = issuer();
        let issued = issuer.issue(&env).unwrap();
        assert_eq!(issuer.verify(&issued.token).unwrap(), issued.claims);
    }

    #[test]
    fn expired_token_rejected() {
        let env = envelope_for(&Keypair::random());
        let issuer = issuer().with_ttl(Duration::from_secs(10));
        let issued = issuer
            .issue_at(&env, chrono::Utc::now().timestamp() - 3_600)
            .unwrap();
        assert!(matches!(
            issuer.verify(&issued.token),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn token_from_other_secret_rejected() {
        let env = envelope_for(&Keypair::random());
        let issued = issuer().issue(&env).unwrap();
        let other = TokenIssuer::new(b"other-secret", "", Network::testnet());
        assert!(matches!(
            other.verify(&issued.token),
            Err(AuthError::InvalidSignature)
        ));
    }

    #[test]
    fn issuer_is_enforced_when_configured() {
        let env = envelope_for(&Keypair::random());
        let issued = issuer().issue(&env).unwrap();
        let strict = TokenIssuer::new(b"test-secret", "https://anchor.example.com", Network::testnet());
        assert!(matches!(
            strict.verify(&issued.token),
            Err(AuthError::InvalidIssuer)
        ));
    }

    #[test]
    fn envelope_without_operations_has_no_subject() {
        let mut env = envelope_for(&Keypair::random());
        env.tx.operations.clear();
        assert!(matches!(
            issuer().issue(&env),
            Err(TokenError::MissingSubject)
        ));
    }

    #[test]
    fn garbage_token_is_malformed() {
        assert!(matches!(
            issuer().verify("not.a.jwt"),
            Err(AuthError::MalformedToken)
        ));
    }
}
