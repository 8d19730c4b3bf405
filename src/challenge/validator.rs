// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Validation of client co-signed challenges.
//!
//! ## Checks
//!
//! | # | Rule                                             | Failure                                   |
//! |---|--------------------------------------------------|-------------------------------------------|
//! | 1 | operations present                               | `OperationsIsNil`                         |
//! | 2 | exactly one operation                            | `DoesNotHaveOnlyOneOperation`             |
//! | 3 | operation is a data write                        | `NotAManageDataOperation`                 |
//! | 4 | operation has a source account                   | `OperationSourceAccountIsEmpty`           |
//! | 5 | tx source is the anchor account                  | `SourceAccountDoesntMatchAnchorPublicKey` |
//! | 6 | time bounds present, both sides non-zero         | `MissingTimeBounds`                       |
//! | 7 | now within time bounds (inclusive)               | `ChallengeExpired`                        |
//! | 8 | valid signature by the anchor key                | `NotSignedByAnchor`                       |
//! | 9 | valid signature by the operation source account  | `NotSignedByClient`                       |
//!
//! An operation sourced by the anchor account fails check 9 regardless of
//! signatures.
//!
//! Every applicable check runs and failures accumulate. Checks 3, 4 and 9
//! only run when there is exactly one operation, 9 additionally needs a
//! source account, and 7 needs usable time bounds.

use super::error::{ValidationFailure, ValidatorError};
use super::unix_now;
use crate::stellar::{AccountId, KeyError, Network, OperationBody, TransactionEnvelope};

/// Stateless challenge validator scoped to one network.
#[derive(Debug, Clone)]
pub struct ChallengeValidator {
    network: Network,
}

impl ChallengeValidator {
    pub fn new(network: Network) -> Self {
        Self { network }
    }

    /// Validate against the current time.
    ///
    /// An empty list means the challenge is accepted.
    pub fn validate(
        &self,
        envelope: &TransactionEnvelope,
        expected_server: &AccountId,
        anchor_key: &AccountId,
    ) -> Result<Vec<ValidationFailure>, ValidatorError> {
        self.validate_at(envelope, expected_server, anchor_key, unix_now())
    }

    /// Validate as if the current unix time were `now`.
    pub fn validate_at(
        &self,
        envelope: &TransactionEnvelope,
        expected_server: &AccountId,
        anchor_key: &AccountId,
        now: u64,
    ) -> Result<Vec<ValidationFailure>, ValidatorError> {
        let tx = &envelope.tx;
        let mut failures = Vec::new();

        if tx.operations.is_empty() {
            failures.push(ValidationFailure::OperationsIsNil);
        }

        let operation = match tx.operations.as_slice() {
            [op] => Some(op),
            _ => {
                failures.push(ValidationFailure::DoesNotHaveOnlyOneOperation);
                None
            }
        };

        let mut client_account = None;
        if let Some(op) = operation {
            if !matches!(op.body, OperationBody::ManageData { .. }) {
                failures.push(ValidationFailure::NotAManageDataOperation);
            }
            match op.source_account {
                Some(account) => client_account = Some(account),
                None => failures.push(ValidationFailure::OperationSourceAccountIsEmpty),
            }
        }

        if tx.source_account != *expected_server {
            failures.push(ValidationFailure::SourceAccountDoesntMatchAnchorPublicKey);
        }

        match tx.time_bounds {
            Some(bounds) if bounds.min_time != 0 && bounds.max_time != 0 => {
                if now < bounds.min_time || now > bounds.max_time {
                    failures.push(ValidationFailure::ChallengeExpired);
                }
            }
            _ => failures.push(ValidationFailure::MissingTimeBounds),
        }

        let hash = tx.hash(&self.network).map_err(ValidatorError::Hash)?;

        let signed_by_anchor =
            is_signed_by(envelope, anchor_key, &hash).map_err(ValidatorError::AnchorKey)?;
        if !signed_by_anchor {
            failures.push(ValidationFailure::NotSignedByAnchor);
        }

        if let Some(client) = client_account {
            let signed_by_client = if client == *anchor_key || client == *expected_server {
                // The anchor's own signature never stands in for the client's.
                tracing::debug!(account = %client, "operation source is the anchor account");
                false
            } else {
                // The client account comes from the request; an unusable key
                // is the client's problem, not an integration fault.
                is_signed_by(envelope, &client, &hash).unwrap_or_else(|e| {
                    tracing::debug!(error = %e, "client account key is not a valid point");
                    false
                })
            };
            if !signed_by_client {
                failures.push(ValidationFailure::NotSignedByClient);
            }
        }

        Ok(failures)
    }
}

/// True if any signature hinted for `account` verifies over `hash`.
fn is_signed_by(
    envelope: &TransactionEnvelope,
    account: &AccountId,
    hash: &[u8; 32],
) -> Result<bool, KeyError> {
    let hint = account.hint();
    for sig in envelope.signatures.iter().filter(|s| s.hint == hint) {
        if account.verify(hash, &sig.signature)? {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::challenge::factory::ChallengeFactory;
    use crate::challenge::nonce::{FixedNonceSource, OsNonceSource};
    use crate::stellar::{Keypair, Operation, TimeBounds};

    const NOW: u64 = 1_700_000_000;

    struct Fixture {
        network: Network,
        anchor: Keypair,
        client: Keypair,
        validator: ChallengeValidator,
    }

    impl Fixture {
        fn new() -> Self {
            let network = Network::testnet();
            Self {
                validator: ChallengeValidator::new(network.clone()),
                network,
                anchor: Keypair::random(),
                client: Keypair::random(),
            }
        }

        fn unsigned(&self) -> TransactionEnvelope {
            ChallengeFactory::new(Arc::new(OsNonceSource))
                .build_at(&self.anchor.account_id(), &self.client.account_id(), NOW)
                .unwrap()
        }

        fn sign_both(&self, env: &mut TransactionEnvelope) {
            env.sign(&self.anchor, &self.network).unwrap();
            env.sign(&self.client, &self.network).unwrap();
        }

        fn signed(&self) -> TransactionEnvelope {
            let mut env = self.unsigned();
            self.sign_both(&mut env);
            env
        }

        fn check(&self, env: &TransactionEnvelope, now: u64) -> Vec<ValidationFailure> {
            let anchor = self.anchor.account_id();
            self.validator
                .validate_at(env, &anchor, &anchor, now)
                .unwrap()
        }
    }

    #[test]
    fn fully_signed_challenge_is_accepted() {
        let f = Fixture::new();
        assert!(f.check(&f.signed(), NOW + 10).is_empty());
    }

    #[test]
    fn window_edges_are_inclusive() {
        let f = Fixture::new();
        let env = f.signed();
        assert!(f.check(&env, NOW).is_empty());
        assert!(f.check(&env, NOW + 300).is_empty());
    }

    #[test]
    fn one_second_past_window_is_only_expired() {
        let f = Fixture::new();
        assert_eq!(
            f.check(&f.signed(), NOW + 301),
            vec![ValidationFailure::ChallengeExpired]
        );
    }

    #[test]
    fn before_window_is_expired() {
        let f = Fixture::new();
        assert_eq!(
            f.check(&f.signed(), NOW - 1),
            vec![ValidationFailure::ChallengeExpired]
        );
    }

    #[test]
    fn tampered_nonce_breaks_signatures() {
        let f = Fixture::new();
        let mut env = f.signed();
        if let OperationBody::ManageData {
            value: Some(value), ..
        } = &mut env.tx.operations[0].body
        {
            value[0] ^= 0x01;
        }
        let failures = f.check(&env, NOW + 1);
        assert!(failures.contains(&ValidationFailure::NotSignedByClient));
        assert!(failures.contains(&ValidationFailure::NotSignedByAnchor));
    }

    #[test]
    fn missing_client_signature() {
        let f = Fixture::new();
        let mut env = f.unsigned();
        env.sign(&f.anchor, &f.network).unwrap();
        assert_eq!(
            f.check(&env, NOW + 1),
            vec![ValidationFailure::NotSignedByClient]
        );
    }

    #[test]
    fn missing_anchor_signature() {
        let f = Fixture::new();
        let mut env = f.unsigned();
        env.sign(&f.client, &f.network).unwrap();
        assert_eq!(
            f.check(&env, NOW + 1),
            vec![ValidationFailure::NotSignedByAnchor]
        );
    }

    #[test]
    fn signature_for_another_network_rejected() {
        let f = Fixture::new();
        let mut env = f.unsigned();
        let other = Network::new("some other network");
        env.sign(&f.anchor, &other).unwrap();
        env.sign(&f.client, &other).unwrap();
        assert_eq!(
            f.check(&env, NOW + 1),
            vec![
                ValidationFailure::NotSignedByAnchor,
                ValidationFailure::NotSignedByClient
            ]
        );
    }

    #[test]
    fn zero_operations() {
        let f = Fixture::new();
        let mut env = f.unsigned();
        env.tx.operations.clear();
        f.sign_both(&mut env);
        assert_eq!(
            f.check(&env, NOW + 1),
            vec![
                ValidationFailure::OperationsIsNil,
                ValidationFailure::DoesNotHaveOnlyOneOperation
            ]
        );
    }

    #[test]
    fn two_operations_skip_operation_checks() {
        let f = Fixture::new();
        let mut env = f.unsigned();
        env.tx.operations.push(Operation {
            source_account: None,
            body: OperationBody::BumpSequence { bump_to: 1 },
        });
        f.sign_both(&mut env);
        assert_eq!(
            f.check(&env, NOW + 1),
            vec![ValidationFailure::DoesNotHaveOnlyOneOperation]
        );
    }

    #[test]
    fn wrong_operation_kind() {
        let f = Fixture::new();
        let mut env = f.unsigned();
        env.tx.operations[0].body = OperationBody::BumpSequence { bump_to: 7 };
        f.sign_both(&mut env);
        assert_eq!(
            f.check(&env, NOW + 1),
            vec![ValidationFailure::NotAManageDataOperation]
        );
    }

    #[test]
    fn empty_operation_source_skips_client_check() {
        let f = Fixture::new();
        let mut env = f.unsigned();
        env.tx.operations[0].source_account = None;
        env.sign(&f.anchor, &f.network).unwrap();
        assert_eq!(
            f.check(&env, NOW + 1),
            vec![ValidationFailure::OperationSourceAccountIsEmpty]
        );
    }

    #[test]
    fn anchor_signature_does_not_cover_anchor_sourced_operation() {
        let f = Fixture::new();
        let mut env = f.unsigned();
        env.tx.operations[0].source_account = Some(f.anchor.account_id());
        env.sign(&f.anchor, &f.network).unwrap();
        assert_eq!(
            f.check(&env, NOW + 1),
            vec![ValidationFailure::NotSignedByClient]
        );
    }

    #[test]
    fn foreign_source_account_rejected() {
        let f = Fixture::new();
        let impostor = Keypair::random();
        let mut env = ChallengeFactory::new(Arc::new(FixedNonceSource(b"n".to_vec())))
            .build_at(&impostor.account_id(), &f.client.account_id(), NOW)
            .unwrap();
        f.sign_both(&mut env);
        assert_eq!(
            f.check(&env, NOW + 1),
            vec![ValidationFailure::SourceAccountDoesntMatchAnchorPublicKey]
        );
    }

    #[test]
    fn missing_or_zero_time_bounds() {
        let f = Fixture::new();

        let mut env = f.unsigned();
        env.tx.time_bounds = None;
        f.sign_both(&mut env);
        assert_eq!(
            f.check(&env, NOW),
            vec![ValidationFailure::MissingTimeBounds]
        );

        let mut env = f.unsigned();
        env.tx.time_bounds = Some(TimeBounds {
            min_time: NOW,
            max_time: 0,
        });
        f.sign_both(&mut env);
        assert_eq!(
            f.check(&env, NOW),
            vec![ValidationFailure::MissingTimeBounds]
        );
    }

    #[test]
    fn failures_accumulate() {
        let f = Fixture::new();
        let mut env = f.unsigned();
        env.tx.time_bounds = None;
        env.tx.source_account = Keypair::random().account_id();
        let failures = f.check(&env, NOW);
        assert_eq!(
            failures,
            vec![
                ValidationFailure::SourceAccountDoesntMatchAnchorPublicKey,
                ValidationFailure::MissingTimeBounds,
                ValidationFailure::NotSignedByAnchor,
                ValidationFailure::NotSignedByClient,
            ]
        );
    }

    #[test]
    fn unencodable_envelope_is_an_integration_error() {
        let f = Fixture::new();
        let mut env = f.signed();
        env.tx.operations[0].body = OperationBody::ManageData {
            name: "x".repeat(200),
            value: None,
        };
        let anchor = f.anchor.account_id();
        assert!(matches!(
            f.validator.validate_at(&env, &anchor, &anchor, NOW),
            Err(ValidatorError::Hash(_))
        ));
    }
}
