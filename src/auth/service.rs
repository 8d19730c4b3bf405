// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Anchor authentication service.
//!
//! Owns the anchor key and wires the challenge pieces together:
//!
//! - `issue_challenge`: parse account → build → anchor-sign → encode
//! - `authenticate`: decode → validate → single-use check → mint token

use std::num::NonZeroUsize;
use std::sync::Arc;

use tracing::{info, warn};

use super::token::{IssuedToken, TokenError, TokenIssuer};
use crate::challenge::{
    codec, ChallengeError, ChallengeFactory, ChallengeValidator, DecodeError, NonceSource,
    ReplayGuard, ValidationFailure, ValidatorError,
};
use crate::config::AnchorConfig;
use crate::stellar::{AccountId, Keypair, Network, TransactionEnvelope};

/// Why a returned challenge did not produce a token.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticateError {
    #[error("the transaction cannot be decoded or parsed")]
    Decode(#[from] DecodeError),

    #[error("challenge validation failed")]
    Rejected(Vec<ValidationFailure>),

    #[error("challenge has already been used")]
    Replayed,

    #[error(transparent)]
    Validator(#[from] ValidatorError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl AuthenticateError {
    /// True for faults of this process rather than of the caller's input.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            AuthenticateError::Validator(_) | AuthenticateError::Token(_)
        )
    }
}

pub struct AuthService {
    signing_key: Keypair,
    network: Network,
    factory: ChallengeFactory,
    validator: ChallengeValidator,
    tokens: TokenIssuer,
    replay: Option<ReplayGuard>,
}

impl AuthService {
    pub fn new(config: &AnchorConfig, nonce_source: Arc<dyn NonceSource>) -> Self {
        let replay = NonZeroUsize::new(config.replay_cache_capacity)
            .map(|capacity| ReplayGuard::new(capacity, config.challenge_ttl));

        Self {
            signing_key: config.signing_key.clone(),
            network: config.network.clone(),
            factory: ChallengeFactory::new(nonce_source).with_validity(config.challenge_ttl),
            validator: ChallengeValidator::new(config.network.clone()),
            tokens: TokenIssuer::new(
                config.jwt_secret.as_bytes(),
                config.jwt_issuer.clone(),
                config.network.clone(),
            )
            .with_ttl(config.token_ttl),
            replay,
        }
    }

    pub fn server_account(&self) -> AccountId {
        self.signing_key.account_id()
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    /// Build, sign and encode a challenge for `account_id`.
    pub fn issue_challenge(&self, account_id: &str) -> Result<String, ChallengeError> {
        let client: AccountId = account_id
            .parse()
            .map_err(ChallengeError::InvalidAccountId)?;
        let envelope = self.signed_challenge(&client)?;
        let encoded = codec::encode(&envelope).map_err(ChallengeError::Encode)?;

        info!(account = %client, "Issued challenge");
        Ok(encoded)
    }

    /// Build a challenge and append the anchor signature.
    pub fn signed_challenge(
        &self,
        client: &AccountId,
    ) -> Result<TransactionEnvelope, ChallengeError> {
        let mut envelope = self.factory.build(&self.server_account(), client)?;
        envelope
            .sign(&self.signing_key, &self.network)
            .map_err(ChallengeError::Sign)?;
        Ok(envelope)
    }

    /// Run the protocol checks against this anchor's account and key.
    pub fn validate_challenge(
        &self,
        envelope: &TransactionEnvelope,
    ) -> Result<Vec<ValidationFailure>, ValidatorError> {
        let server = self.server_account();
        self.validator.validate(envelope, &server, &server)
    }

    /// Exchange a co-signed transport-encoded challenge for a token.
    pub fn authenticate(&self, transaction: &str) -> Result<IssuedToken, AuthenticateError> {
        let envelope = codec::decode(transaction)?;

        let failures = self.validate_challenge(&envelope)?;
        if !failures.is_empty() {
            warn!(
                failures = ?failures.iter().map(ValidationFailure::code).collect::<Vec<_>>(),
                "Challenge rejected"
            );
            return Err(AuthenticateError::Rejected(failures));
        }

        if let Some(replay) = &self.replay {
            let hash = envelope
                .tx
                .hash(&self.network)
                .map_err(ValidatorError::Hash)?;
            if !replay.check_and_insert(&hash) {
                warn!(challenge = %hex::encode(hash), "Challenge replay rejected");
                return Err(AuthenticateError::Replayed);
            }
        }

        let issued = self.tokens.issue(&envelope)?;
        info!(account = %issued.claims.sub, token_id = %issued.claims.jti, "Issued token");
        Ok(issued)
    }
}
