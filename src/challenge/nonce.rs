// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Nonce sources for challenge construction.

use base64ct::{Base64, Encoding};
use rand::RngCore;

use super::error::NonceError;

/// Random bytes drawn per nonce.
pub const NONCE_ENTROPY_BYTES: usize = 48;

/// Supplies a fresh opaque value for each challenge.
///
/// Implementations must be `Send + Sync`; the same source is shared by every
/// request handler.
pub trait NonceSource: Send + Sync {
    fn next(&self) -> Result<Vec<u8>, NonceError>;
}

/// OS CSPRNG nonce source.
///
/// Produces 48 random bytes, base64-encoded to 64 printable bytes so the
/// value fits the 64-byte data entry limit.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsNonceSource;

impl NonceSource for OsNonceSource {
    fn next(&self) -> Result<Vec<u8>, NonceError> {
        let mut raw = [0u8; NONCE_ENTROPY_BYTES];
        rand::rngs::OsRng
            .try_fill_bytes(&mut raw)
            .map_err(|e| NonceError(e.to_string()))?;
        Ok(Base64::encode_string(&raw).into_bytes())
    }
}

/// Always returns the same value. For deterministic tests and fixtures.
#[derive(Debug, Clone)]
pub struct FixedNonceSource(pub Vec<u8>);

impl NonceSource for FixedNonceSource {
    fn next(&self) -> Result<Vec<u8>, NonceError> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn os_nonce_is_64_printable_bytes() {
        let nonce = OsNonceSource.next().unwrap();
        assert_eq!(nonce.len(), 64);
        assert!(nonce.iter().all(|b| b.is_ascii_graphic()));
    }

    #[test]
    fn os_nonces_differ() {
        assert_ne!(OsNonceSource.next().unwrap(), OsNonceSource.next().unwrap());
    }

    #[test]
    fn fixed_nonce_repeats() {
        let source = FixedNonceSource(b"abc".to_vec());
        assert_eq!(source.next().unwrap(), b"abc");
        assert_eq!(source.next().unwrap(), b"abc");
    }
}
