// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ledger transaction primitives used by the challenge protocol.
//!
//! This module provides:
//! - StrKey account IDs and secret seeds
//! - Ed25519 keypairs, signature hints and verification
//! - The transaction envelope model, its canonical binary layout and hash
//!
//! Nothing here submits to a ledger; the envelope only exists to carry a
//! signed challenge.

pub mod envelope;
pub mod keys;
pub mod network;
pub mod strkey;
pub mod xdr;

pub use envelope::{
    DecoratedSignature, Memo, Operation, OperationBody, SignatureHint, TimeBounds, Transaction,
    TransactionEnvelope,
};
pub use keys::{AccountId, KeyError, Keypair};
pub use network::Network;
pub use strkey::StrKeyError;
pub use xdr::XdrError;
