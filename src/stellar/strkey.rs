// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! StrKey encoding for account IDs and secret seeds.
//!
//! Format: base32(version_byte || payload[32] || crc16_xmodem_le[2])
//!
//! Base32 is RFC 4648 without padding. A 35-byte input encodes to exactly
//! 56 characters, so there are never leftover bits to validate.

/// RFC 4648 base32 alphabet.
const BASE32_ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

/// Reverse lookup table: ASCII byte → 5-bit value (0xFF = invalid).
const BASE32_DECODE: [u8; 128] = {
    let mut table = [0xFFu8; 128];
    let alpha = BASE32_ALPHABET;
    let mut i = 0;
    while i < 32 {
        table[alpha[i] as usize] = i as u8;
        i += 1;
    }
    table
};

/// Payload length for ed25519 keys and seeds.
const PAYLOAD_LEN: usize = 32;
/// version (1) + payload (32) + checksum (2).
const RAW_LEN: usize = 1 + PAYLOAD_LEN + 2;
/// Encoded length of a StrKey.
pub const ENCODED_LEN: usize = 56;

/// StrKey version bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionByte {
    /// Ed25519 public key (`G...`).
    AccountId,
    /// Ed25519 secret seed (`S...`).
    SecretSeed,
}

impl VersionByte {
    fn as_byte(self) -> u8 {
        match self {
            VersionByte::AccountId => 6 << 3,
            VersionByte::SecretSeed => 18 << 3,
        }
    }
}

/// StrKey parsing errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StrKeyError {
    #[error("invalid strkey length: expected {ENCODED_LEN}, got {0}")]
    InvalidLength(usize),

    #[error("invalid base32 character")]
    InvalidCharacter,

    #[error("unexpected strkey version byte")]
    InvalidVersion,

    #[error("strkey checksum mismatch")]
    InvalidChecksum,
}

/// CRC16-XModem (poly 0x1021, init 0).
fn crc16_xmodem(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;
    for &byte in data {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ 0x1021;
            } else {
                crc <<= 1;
            }
        }
    }
    crc
}

fn encode_base32(bytes: &[u8]) -> String {
    let mut result = String::with_capacity((bytes.len() * 8).div_ceil(5));
    let mut buffer: u64 = 0;
    let mut bits_in_buffer = 0;

    for &byte in bytes {
        buffer = (buffer << 8) | byte as u64;
        bits_in_buffer += 8;
        while bits_in_buffer >= 5 {
            bits_in_buffer -= 5;
            let idx = ((buffer >> bits_in_buffer) & 0x1F) as usize;
            result.push(BASE32_ALPHABET[idx] as char);
        }
    }
    if bits_in_buffer > 0 {
        let idx = ((buffer << (5 - bits_in_buffer)) & 0x1F) as usize;
        result.push(BASE32_ALPHABET[idx] as char);
    }

    result
}

fn decode_base32_fixed<const N: usize>(s: &str) -> Result<[u8; N], StrKeyError> {
    let mut buffer: u64 = 0;
    let mut bits_in_buffer = 0;
    let mut result = [0u8; N];
    let mut pos = 0;

    for c in s.bytes() {
        let val = BASE32_DECODE
            .get(c as usize)
            .copied()
            .filter(|v| *v != 0xFF)
            .ok_or(StrKeyError::InvalidCharacter)?;
        buffer = (buffer << 5) | val as u64;
        bits_in_buffer += 5;
        if bits_in_buffer >= 8 {
            bits_in_buffer -= 8;
            if pos == N {
                return Err(StrKeyError::InvalidLength(s.len()));
            }
            result[pos] = (buffer >> bits_in_buffer) as u8;
            pos += 1;
        }
    }

    if pos < N {
        return Err(StrKeyError::InvalidLength(s.len()));
    }
    Ok(result)
}

/// Encode a 32-byte payload under the given version byte.
pub fn encode(version: VersionByte, payload: &[u8; PAYLOAD_LEN]) -> String {
    let mut raw = [0u8; RAW_LEN];
    raw[0] = version.as_byte();
    raw[1..1 + PAYLOAD_LEN].copy_from_slice(payload);
    let crc = crc16_xmodem(&raw[..1 + PAYLOAD_LEN]);
    raw[1 + PAYLOAD_LEN..].copy_from_slice(&crc.to_le_bytes());
    encode_base32(&raw)
}

/// Decode a StrKey, checking version byte and checksum.
pub fn decode(version: VersionByte, encoded: &str) -> Result<[u8; PAYLOAD_LEN], StrKeyError> {
    if encoded.len() != ENCODED_LEN {
        return Err(StrKeyError::InvalidLength(encoded.len()));
    }
    let raw: [u8; RAW_LEN] = decode_base32_fixed(encoded)?;

    if raw[0] != version.as_byte() {
        return Err(StrKeyError::InvalidVersion);
    }

    let expected = crc16_xmodem(&raw[..1 + PAYLOAD_LEN]).to_le_bytes();
    if raw[1 + PAYLOAD_LEN..] != expected {
        return Err(StrKeyError::InvalidChecksum);
    }

    let mut payload = [0u8; PAYLOAD_LEN];
    payload.copy_from_slice(&raw[1..1 + PAYLOAD_LEN]);
    Ok(payload)
}
