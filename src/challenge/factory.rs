// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Challenge construction.
//!
//! A challenge is a transaction sourced by the anchor account with a single
//! data write sourced by the client account. The data value is the nonce.
//! The factory never signs: key material stays with the caller.

use std::sync::Arc;
use std::time::Duration;

use super::error::ChallengeError;
use super::nonce::NonceSource;
use super::unix_now;
use crate::stellar::{
    AccountId, Memo, Operation, OperationBody, TimeBounds, Transaction, TransactionEnvelope,
};

/// Data entry name carried by every challenge.
pub const CHALLENGE_DATA_KEY: &str = "anchor auth";

/// Sequence number carried by challenges. No live account can be at this
/// sequence, so a challenge can never be submitted.
pub const CHALLENGE_SEQUENCE: i64 = 0;

/// Per-operation fee written into the challenge.
const BASE_FEE: u32 = 100;

/// Default challenge validity (5 minutes).
pub const DEFAULT_CHALLENGE_TTL: Duration = Duration::from_secs(5 * 60);

/// Builds unsigned challenge envelopes.
#[derive(Clone)]
pub struct ChallengeFactory {
    nonce_source: Arc<dyn NonceSource>,
    validity: Duration,
}

impl ChallengeFactory {
    pub fn new(nonce_source: Arc<dyn NonceSource>) -> Self {
        Self {
            nonce_source,
            validity: DEFAULT_CHALLENGE_TTL,
        }
    }

    /// Override the validity window length.
    pub fn with_validity(mut self, validity: Duration) -> Self {
        self.validity = validity;
        self
    }

    /// Build an unsigned challenge valid from now.
    pub fn build(
        &self,
        server: &AccountId,
        client: &AccountId,
    ) -> Result<TransactionEnvelope, ChallengeError> {
        self.build_at(server, client, unix_now())
    }

    /// Build an unsigned challenge valid for `[now, now + validity]`.
    pub fn build_at(
        &self,
        server: &AccountId,
        client: &AccountId,
        now: u64,
    ) -> Result<TransactionEnvelope, ChallengeError> {
        if server == client {
            return Err(ChallengeError::ClientIsAnchor);
        }
        let nonce = self.nonce_source.next().map_err(ChallengeError::Nonce)?;

        let tx = Transaction {
            source_account: *server,
            fee: BASE_FEE,
            sequence: CHALLENGE_SEQUENCE,
            time_bounds: Some(TimeBounds {
                min_time: now,
                max_time: now.saturating_add(self.validity.as_secs()),
            }),
            memo: Memo::None,
            operations: vec![Operation {
                source_account: Some(*client),
                body: OperationBody::ManageData {
                    name: CHALLENGE_DATA_KEY.to_string(),
                    value: Some(nonce),
                },
            }],
        };

        // Reject anything that has no canonical form before it gets signed.
        tx.to_bytes().map_err(ChallengeError::Build)?;

        Ok(TransactionEnvelope::new(tx))
    }
}
