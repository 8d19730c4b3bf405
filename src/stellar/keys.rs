// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ed25519 account keys.
//!
//! - `AccountId` is the public half, rendered as a `G...` StrKey
//! - `Keypair` holds the signing key; no `Debug` so it never ends up in logs
//! - Signature hints are the last 4 bytes of the public key

use std::fmt;
use std::str::FromStr;

use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};

use super::envelope::{DecoratedSignature, SignatureHint};
use super::strkey::{self, StrKeyError, VersionByte};

/// Errors raised by the signature scheme itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    /// The 32 bytes do not decode to a valid ed25519 point.
    #[error("account {0} is not a valid ed25519 public key")]
    InvalidPublicKey(String),
}

/// An account identifier (ed25519 public key).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountId([u8; 32]);

impl AccountId {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Hint used to match decorated signatures to this key.
    pub fn hint(&self) -> SignatureHint {
        let mut hint = [0u8; 4];
        hint.copy_from_slice(&self.0[28..]);
        SignatureHint(hint)
    }

    /// Verify an ed25519 signature over `message`.
    ///
    /// Returns `Ok(false)` for a well-formed key with a wrong or malformed
    /// signature. `Err` is reserved for keys that are not valid curve points.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> Result<bool, KeyError> {
        let verifying_key = VerifyingKey::from_bytes(&self.0)
            .map_err(|_| KeyError::InvalidPublicKey(self.to_string()))?;
        let Ok(signature) = ed25519_dalek::Signature::from_slice(signature) else {
            return Ok(false);
        };
        Ok(verifying_key.verify(message, &signature).is_ok())
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&strkey::encode(VersionByte::AccountId, &self.0))
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({self})")
    }
}

impl FromStr for AccountId {
    type Err = StrKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        strkey::decode(VersionByte::AccountId, s).map(Self)
    }
}

/// An ed25519 signing keypair.
#[derive(Clone)]
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generate a fresh keypair from the OS RNG.
    pub fn random() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut rand::rngs::OsRng),
        }
    }

    /// Load a keypair from an `S...` secret seed.
    pub fn from_secret_seed(seed: &str) -> Result<Self, StrKeyError> {
        let bytes = strkey::decode(VersionByte::SecretSeed, seed)?;
        Ok(Self::from_seed_bytes(&bytes))
    }

    pub fn from_seed_bytes(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Export the `S...` secret seed.
    pub fn secret_seed(&self) -> String {
        strkey::encode(VersionByte::SecretSeed, &self.signing_key.to_bytes())
    }

    pub fn account_id(&self) -> AccountId {
        AccountId(self.signing_key.verifying_key().to_bytes())
    }

    /// Sign `message` and tag the signature with this key's hint.
    pub fn sign_decorated(&self, message: &[u8]) -> DecoratedSignature {
        DecoratedSignature {
            hint: self.account_id().hint(),
            signature: self.signing_key.sign(message).to_bytes().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_roundtrip_preserves_account() {
        let kp = Keypair::random();
        let restored = Keypair::from_secret_seed(&kp.secret_seed()).unwrap();
        assert_eq!(kp.account_id(), restored.account_id());
    }

    #[test]
    fn account_id_parses_its_display_form() {
        let kp = Keypair::from_seed_bytes(&[5u8; 32]);
        let account = kp.account_id();
        let parsed: AccountId = account.to_string().parse().unwrap();
        assert_eq!(parsed, account);
        assert!(account.to_string().starts_with('G'));
    }

    #[test]
    fn seed_is_not_an_account_id() {
        let kp = Keypair::random();
        assert!(kp.secret_seed().parse::<AccountId>().is_err());
    }

    #[test]
    fn hint_is_last_four_key_bytes() {
        let kp = Keypair::random();
        let account = kp.account_id();
        assert_eq!(account.hint().0, account.as_bytes()[28..]);
    }

    #[test]
    fn decorated_signature_verifies() {
        let kp = Keypair::random();
        let sig = kp.sign_decorated(b"challenge hash");
        assert_eq!(sig.hint, kp.account_id().hint());
        assert_eq!(kp.account_id().verify(b"challenge hash", &sig.signature), Ok(true));
        assert_eq!(kp.account_id().verify(b"other hash", &sig.signature), Ok(false));
    }

    #[test]
    fn malformed_signature_is_not_valid() {
        let kp = Keypair::random();
        assert_eq!(kp.account_id().verify(b"msg", &[0u8; 12]), Ok(false));
    }
}
