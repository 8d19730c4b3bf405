// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transport encoding for challenge envelopes: canonical bytes, then base64.
//!
//! Decoding only checks the wire format. Protocol rules live in the validator.

use base64ct::{Base64, Encoding};

use super::error::DecodeError;
use crate::stellar::{TransactionEnvelope, XdrError};

pub fn encode(envelope: &TransactionEnvelope) -> Result<String, XdrError> {
    Ok(Base64::encode_string(&envelope.to_bytes()?))
}

pub fn decode(transport: &str) -> Result<TransactionEnvelope, DecodeError> {
    let bytes = Base64::decode_vec(transport.trim()).map_err(|_| DecodeError::InvalidBase64)?;
    Ok(TransactionEnvelope::from_bytes(&bytes)?)
}
