// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Challenge protocol errors.
//!
//! Two families:
//! - [`ValidationFailure`] is data: a rejected credential, reported to the
//!   caller as a list.
//! - Everything else is a fault in this process (entropy, encoding, key
//!   material) and must never be confused with a rejected credential.

use crate::stellar::{KeyError, StrKeyError, XdrError};

/// The transport string could not be turned into an envelope.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("transaction is not valid base64")]
    InvalidBase64,

    #[error("transaction bytes are malformed: {0}")]
    Malformed(#[from] XdrError),
}

/// The nonce source could not produce a value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("nonce generation failed: {0}")]
pub struct NonceError(pub String);

/// Errors while issuing a challenge.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChallengeError {
    /// The requested client account is not a valid account ID.
    #[error("account id is invalid: {0}")]
    InvalidAccountId(#[source] StrKeyError),

    /// The client account is the anchor account itself.
    #[error("account id is the anchor account")]
    ClientIsAnchor,

    #[error("failed to generate random nonce for challenge")]
    Nonce(#[source] NonceError),

    #[error("cannot build challenge transaction")]
    Build(#[source] XdrError),

    #[error("cannot sign challenge transaction")]
    Sign(#[source] XdrError),

    #[error("cannot encode challenge transaction")]
    Encode(#[source] XdrError),
}

/// A protocol-level reason for rejecting a returned challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum ValidationFailure {
    #[error("transaction has no operations")]
    OperationsIsNil,

    #[error("transaction must contain exactly one operation")]
    DoesNotHaveOnlyOneOperation,

    #[error("operation is not a manage data operation")]
    NotAManageDataOperation,

    #[error("operation source account is empty")]
    OperationSourceAccountIsEmpty,

    #[error("transaction source account does not match the anchor account")]
    SourceAccountDoesntMatchAnchorPublicKey,

    #[error("transaction is missing time bounds")]
    MissingTimeBounds,

    #[error("challenge has expired")]
    ChallengeExpired,

    #[error("transaction is not signed by the anchor")]
    NotSignedByAnchor,

    #[error("transaction is not signed by the client")]
    NotSignedByClient,
}

impl ValidationFailure {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationFailure::OperationsIsNil => "operations_is_nil",
            ValidationFailure::DoesNotHaveOnlyOneOperation => "does_not_have_only_one_operation",
            ValidationFailure::NotAManageDataOperation => "not_a_manage_data_operation",
            ValidationFailure::OperationSourceAccountIsEmpty => {
                "operation_source_account_is_empty"
            }
            ValidationFailure::SourceAccountDoesntMatchAnchorPublicKey => {
                "source_account_doesnt_match_anchor_public_key"
            }
            ValidationFailure::MissingTimeBounds => "missing_time_bounds",
            ValidationFailure::ChallengeExpired => "challenge_expired",
            ValidationFailure::NotSignedByAnchor => "not_signed_by_anchor",
            ValidationFailure::NotSignedByClient => "not_signed_by_client",
        }
    }
}

/// Integration faults raised while validating.
///
/// These are never reported as `NotSignedByAnchor`/`NotSignedByClient`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidatorError {
    #[error("failed to compute challenge hash: {0}")]
    Hash(#[source] XdrError),

    #[error("anchor signing key is unusable: {0}")]
    AnchorKey(#[source] KeyError),
}
