// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transaction envelope model and its canonical binary layout.
//!
//! ## Layout
//!
//! Stellar `TransactionEnvelope` XDR, restricted to what a challenge needs:
//!
//! | Field          | Encoding                                              |
//! |----------------|-------------------------------------------------------|
//! | envelope type  | u32, always 2 (`ENVELOPE_TYPE_TX`)                    |
//! | source_account | u32 key type (0 = ed25519) + 32 bytes                 |
//! | fee            | u32                                                   |
//! | sequence       | i64                                                   |
//! | cond           | u32 0 (none) or 1 + u64 min_time + u64 max_time       |
//! | memo           | u32 memo type + memo body                             |
//! | operations     | u32 count (<= 100) + operations                       |
//! | ext            | u32, always 0                                         |
//! | signatures     | u32 count (<= 20) + (hint[4], sig<64>) pairs          |
//!
//! An operation is an optional source account followed by a u32 body type
//! and the body fields. Muxed accounts, v2 preconditions and the v0 and
//! fee-bump envelopes are rejected on decode.

use sha2::{Digest, Sha256};

use super::keys::{AccountId, Keypair};
use super::network::Network;
use super::xdr::{XdrError, XdrReader, XdrWriter};

const KEY_TYPE_ED25519: u32 = 0;
const ENVELOPE_TYPE_TX: u32 = 2;

const PRECOND_NONE: u32 = 0;
const PRECOND_TIME: u32 = 1;

const MEMO_NONE: u32 = 0;
const MEMO_TEXT: u32 = 1;
const MEMO_ID: u32 = 2;
const MEMO_HASH: u32 = 3;
const MEMO_RETURN: u32 = 4;
const MAX_MEMO_TEXT_LEN: usize = 28;

const OP_MANAGE_DATA: u32 = 10;
const OP_BUMP_SEQUENCE: u32 = 11;

pub const MAX_OPERATIONS: usize = 100;
pub const MAX_SIGNATURES: usize = 20;
pub const MAX_DATA_NAME_LEN: usize = 64;
pub const MAX_DATA_VALUE_LEN: usize = 64;
const MAX_SIGNATURE_LEN: usize = 64;

/// Validity window in unix seconds. Zero means "unbounded" on that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeBounds {
    pub min_time: u64,
    pub max_time: u64,
}

/// Transaction memo. Challenges always carry `Memo::None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Memo {
    #[default]
    None,
    Text(Vec<u8>),
    Id(u64),
    Hash([u8; 32]),
    Return([u8; 32]),
}

impl Memo {
    fn write(&self, w: &mut XdrWriter) -> Result<(), XdrError> {
        match self {
            Memo::None => w.write_u32(MEMO_NONE),
            Memo::Text(text) => {
                w.write_u32(MEMO_TEXT);
                w.write_var(text, MAX_MEMO_TEXT_LEN)?;
            }
            Memo::Id(id) => {
                w.write_u32(MEMO_ID);
                w.write_u64(*id);
            }
            Memo::Hash(hash) => {
                w.write_u32(MEMO_HASH);
                w.write_fixed(hash);
            }
            Memo::Return(hash) => {
                w.write_u32(MEMO_RETURN);
                w.write_fixed(hash);
            }
        }
        Ok(())
    }

    fn read(r: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        Ok(match r.read_u32()? {
            MEMO_NONE => Memo::None,
            MEMO_TEXT => Memo::Text(r.read_var(MAX_MEMO_TEXT_LEN)?),
            MEMO_ID => Memo::Id(r.read_u64()?),
            MEMO_HASH => Memo::Hash(r.read_fixed::<32>()?),
            MEMO_RETURN => Memo::Return(r.read_fixed::<32>()?),
            value => {
                return Err(XdrError::InvalidDiscriminant {
                    ty: "MemoType",
                    value,
                })
            }
        })
    }
}

/// Operation payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationBody {
    /// Opaque key/value data write.
    ManageData { name: String, value: Option<Vec<u8>> },
    BumpSequence { bump_to: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub source_account: Option<AccountId>,
    pub body: OperationBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub source_account: AccountId,
    pub fee: u32,
    pub sequence: i64,
    pub time_bounds: Option<TimeBounds>,
    pub memo: Memo,
    pub operations: Vec<Operation>,
}

/// Last 4 bytes of the signer's public key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SignatureHint(pub [u8; 4]);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoratedSignature {
    pub hint: SignatureHint,
    pub signature: Vec<u8>,
}

/// A transaction plus the signatures collected over its hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionEnvelope {
    pub tx: Transaction,
    pub signatures: Vec<DecoratedSignature>,
}

fn write_account(w: &mut XdrWriter, account: &AccountId) {
    w.write_u32(KEY_TYPE_ED25519);
    w.write_fixed(account.as_bytes());
}

fn read_account(r: &mut XdrReader<'_>) -> Result<AccountId, XdrError> {
    match r.read_u32()? {
        KEY_TYPE_ED25519 => Ok(AccountId::from_bytes(r.read_fixed::<32>()?)),
        value => Err(XdrError::InvalidDiscriminant {
            ty: "PublicKeyType",
            value,
        }),
    }
}

impl Operation {
    fn write(&self, w: &mut XdrWriter) -> Result<(), XdrError> {
        w.write_bool(self.source_account.is_some());
        if let Some(source) = &self.source_account {
            write_account(w, source);
        }
        match &self.body {
            OperationBody::ManageData { name, value } => {
                w.write_u32(OP_MANAGE_DATA);
                w.write_var(name.as_bytes(), MAX_DATA_NAME_LEN)?;
                w.write_bool(value.is_some());
                if let Some(value) = value {
                    w.write_var(value, MAX_DATA_VALUE_LEN)?;
                }
            }
            OperationBody::BumpSequence { bump_to } => {
                w.write_u32(OP_BUMP_SEQUENCE);
                w.write_i64(*bump_to);
            }
        }
        Ok(())
    }

    fn read(r: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        let source_account = if r.read_bool()? {
            Some(read_account(r)?)
        } else {
            None
        };
        let body = match r.read_u32()? {
            OP_MANAGE_DATA => {
                let name = String::from_utf8(r.read_var(MAX_DATA_NAME_LEN)?)
                    .map_err(|_| XdrError::InvalidUtf8)?;
                let value = if r.read_bool()? {
                    Some(r.read_var(MAX_DATA_VALUE_LEN)?)
                } else {
                    None
                };
                OperationBody::ManageData { name, value }
            }
            OP_BUMP_SEQUENCE => OperationBody::BumpSequence {
                bump_to: r.read_i64()?,
            },
            value => {
                return Err(XdrError::InvalidDiscriminant {
                    ty: "OperationType",
                    value,
                })
            }
        };
        Ok(Self {
            source_account,
            body,
        })
    }
}

impl Transaction {
    fn write(&self, w: &mut XdrWriter) -> Result<(), XdrError> {
        write_account(w, &self.source_account);
        w.write_u32(self.fee);
        w.write_i64(self.sequence);
        match &self.time_bounds {
            None => w.write_u32(PRECOND_NONE),
            Some(bounds) => {
                w.write_u32(PRECOND_TIME);
                w.write_u64(bounds.min_time);
                w.write_u64(bounds.max_time);
            }
        }
        self.memo.write(w)?;
        if self.operations.len() > MAX_OPERATIONS {
            return Err(XdrError::LengthExceeded {
                len: self.operations.len(),
                max: MAX_OPERATIONS,
            });
        }
        w.write_len(self.operations.len())?;
        for op in &self.operations {
            op.write(w)?;
        }
        // ext
        w.write_u32(0);
        Ok(())
    }

    fn read(r: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        let source_account = read_account(r)?;
        let fee = r.read_u32()?;
        let sequence = r.read_i64()?;
        let time_bounds = match r.read_u32()? {
            PRECOND_NONE => None,
            PRECOND_TIME => Some(TimeBounds {
                min_time: r.read_u64()?,
                max_time: r.read_u64()?,
            }),
            value => {
                return Err(XdrError::InvalidDiscriminant {
                    ty: "PreconditionType",
                    value,
                })
            }
        };
        let memo = Memo::read(r)?;
        let count = r.read_len(MAX_OPERATIONS)?;
        let operations = (0..count)
            .map(|_| Operation::read(r))
            .collect::<Result<Vec<_>, _>>()?;
        match r.read_u32()? {
            0 => {}
            value => {
                return Err(XdrError::InvalidDiscriminant {
                    ty: "TransactionExt",
                    value,
                })
            }
        }
        Ok(Self {
            source_account,
            fee,
            sequence,
            time_bounds,
            memo,
            operations,
        })
    }

    /// Canonical binary form of the transaction alone.
    pub fn to_bytes(&self) -> Result<Vec<u8>, XdrError> {
        let mut w = XdrWriter::new();
        self.write(&mut w)?;
        Ok(w.into_bytes())
    }

    /// Canonical hash of the `TransactionSignaturePayload`:
    /// SHA-256(network_id || ENVELOPE_TYPE_TX || tx).
    pub fn hash(&self, network: &Network) -> Result<[u8; 32], XdrError> {
        let mut hasher = Sha256::new();
        hasher.update(network.id());
        hasher.update(ENVELOPE_TYPE_TX.to_be_bytes());
        hasher.update(self.to_bytes()?);
        Ok(hasher.finalize().into())
    }
}

impl TransactionEnvelope {
    pub fn new(tx: Transaction) -> Self {
        Self {
            tx,
            signatures: Vec::new(),
        }
    }

    /// Append a signature by `keypair` over the canonical hash.
    pub fn sign(&mut self, keypair: &Keypair, network: &Network) -> Result<(), XdrError> {
        let hash = self.tx.hash(network)?;
        self.signatures.push(keypair.sign_decorated(&hash));
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, XdrError> {
        let mut w = XdrWriter::new();
        w.write_u32(ENVELOPE_TYPE_TX);
        self.tx.write(&mut w)?;
        if self.signatures.len() > MAX_SIGNATURES {
            return Err(XdrError::LengthExceeded {
                len: self.signatures.len(),
                max: MAX_SIGNATURES,
            });
        }
        w.write_len(self.signatures.len())?;
        for sig in &self.signatures {
            w.write_fixed(&sig.hint.0);
            w.write_var(&sig.signature, MAX_SIGNATURE_LEN)?;
        }
        Ok(w.into_bytes())
    }

    /// Parse an envelope; any non-conforming input is an error.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, XdrError> {
        let mut r = XdrReader::new(bytes);
        match r.read_u32()? {
            ENVELOPE_TYPE_TX => {}
            value => {
                return Err(XdrError::InvalidDiscriminant {
                    ty: "EnvelopeType",
                    value,
                })
            }
        }
        let tx = Transaction::read(&mut r)?;
        let count = r.read_len(MAX_SIGNATURES)?;
        let signatures = (0..count)
            .map(|_| {
                Ok(DecoratedSignature {
                    hint: SignatureHint(r.read_fixed::<4>()?),
                    signature: r.read_var(MAX_SIGNATURE_LEN)?,
                })
            })
            .collect::<Result<Vec<_>, XdrError>>()?;
        r.finish()?;
        Ok(Self { tx, signatures })
    }
}
