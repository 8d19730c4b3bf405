// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Minimal XDR primitives.
//!
//! All integers are big-endian. Variable-length data is prefixed with a u32
//! length and zero-padded to a 4-byte boundary. The reader is strict:
//! non-zero padding, over-limit lengths and trailing bytes are errors.

/// Errors from encoding or decoding the binary layout.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum XdrError {
    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("{0} trailing bytes after value")]
    TrailingBytes(usize),

    #[error("length {len} exceeds limit {max}")]
    LengthExceeded { len: usize, max: usize },

    #[error("non-zero padding")]
    NonZeroPadding,

    #[error("invalid discriminant {value} for {ty}")]
    InvalidDiscriminant { ty: &'static str, value: u32 },

    #[error("string is not valid UTF-8")]
    InvalidUtf8,
}

fn padding(len: usize) -> usize {
    (4 - len % 4) % 4
}

/// Append-only XDR writer.
#[derive(Default)]
pub struct XdrWriter {
    buf: Vec<u8>,
}

impl XdrWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn write_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_i64(&mut self, value: i64) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_u64(&mut self, value: u64) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_bool(&mut self, value: bool) {
        self.write_u32(u32::from(value));
    }

    /// Fixed-length opaque data (length is implied by the type).
    pub fn write_fixed(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
        self.buf.resize(self.buf.len() + padding(bytes.len()), 0);
    }

    /// Variable-length opaque data with an upper bound.
    pub fn write_var(&mut self, bytes: &[u8], max: usize) -> Result<(), XdrError> {
        if bytes.len() > max {
            return Err(XdrError::LengthExceeded {
                len: bytes.len(),
                max,
            });
        }
        self.write_len(bytes.len())?;
        self.write_fixed(bytes);
        Ok(())
    }

    /// Array/opaque length prefix.
    pub fn write_len(&mut self, len: usize) -> Result<(), XdrError> {
        let len = u32::try_from(len).map_err(|_| XdrError::LengthExceeded {
            len,
            max: u32::MAX as usize,
        })?;
        self.write_u32(len);
        Ok(())
    }
}

/// Strict XDR reader over a borrowed buffer.
pub struct XdrReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> XdrReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], XdrError> {
        let end = self.pos.checked_add(n).ok_or(XdrError::UnexpectedEof)?;
        let slice = self.buf.get(self.pos..end).ok_or(XdrError::UnexpectedEof)?;
        self.pos = end;
        Ok(slice)
    }

    pub fn read_u32(&mut self) -> Result<u32, XdrError> {
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(self.take(4)?);
        Ok(u32::from_be_bytes(bytes))
    }

    pub fn read_i64(&mut self) -> Result<i64, XdrError> {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(self.take(8)?);
        Ok(i64::from_be_bytes(bytes))
    }

    pub fn read_u64(&mut self) -> Result<u64, XdrError> {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(self.take(8)?);
        Ok(u64::from_be_bytes(bytes))
    }

    pub fn read_bool(&mut self) -> Result<bool, XdrError> {
        match self.read_u32()? {
            0 => Ok(false),
            1 => Ok(true),
            value => Err(XdrError::InvalidDiscriminant { ty: "bool", value }),
        }
    }

    pub fn read_fixed<const N: usize>(&mut self) -> Result<[u8; N], XdrError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        self.skip_padding(N)?;
        Ok(out)
    }

    pub fn read_var(&mut self, max: usize) -> Result<Vec<u8>, XdrError> {
        let len = self.read_len(max)?;
        let bytes = self.take(len)?.to_vec();
        self.skip_padding(len)?;
        Ok(bytes)
    }

    /// Read a length prefix and enforce its upper bound.
    pub fn read_len(&mut self, max: usize) -> Result<usize, XdrError> {
        let len = self.read_u32()? as usize;
        if len > max {
            return Err(XdrError::LengthExceeded { len, max });
        }
        Ok(len)
    }

    fn skip_padding(&mut self, len: usize) -> Result<(), XdrError> {
        if self.take(padding(len))?.iter().any(|b| *b != 0) {
            return Err(XdrError::NonZeroPadding);
        }
        Ok(())
    }

    /// Fail unless every byte has been consumed.
    pub fn finish(self) -> Result<(), XdrError> {
        let remaining = self.buf.len() - self.pos;
        if remaining != 0 {
            return Err(XdrError::TrailingBytes(remaining));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn var_opaque_is_length_prefixed_and_padded() {
        let mut w = XdrWriter::new();
        w.write_var(b"abcde", 64).unwrap();
        assert_eq!(
            w.into_bytes(),
            vec![0, 0, 0, 5, b'a', b'b', b'c', b'd', b'e', 0, 0, 0]
        );
    }

    #[test]
    fn var_opaque_over_limit_rejected_on_write() {
        let mut w = XdrWriter::new();
        assert_eq!(
            w.write_var(&[0u8; 65], 64),
            Err(XdrError::LengthExceeded { len: 65, max: 64 })
        );
    }

    #[test]
    fn reader_rejects_nonzero_padding() {
        let bytes = [0, 0, 0, 1, b'x', 0, 1, 0];
        let mut r = XdrReader::new(&bytes);
        assert_eq!(r.read_var(64), Err(XdrError::NonZeroPadding));
    }

    #[test]
    fn reader_rejects_truncation() {
        let bytes = [0, 0, 0, 8, 1, 2, 3];
        let mut r = XdrReader::new(&bytes);
        assert_eq!(r.read_var(64), Err(XdrError::UnexpectedEof));
    }

    #[test]
    fn reader_rejects_bad_bool() {
        let bytes = [0, 0, 0, 2];
        let mut r = XdrReader::new(&bytes);
        assert!(matches!(
            r.read_bool(),
            Err(XdrError::InvalidDiscriminant { ty: "bool", value: 2 })
        ));
    }

    #[test]
    fn finish_reports_trailing_bytes() {
        let bytes = [0, 0, 0, 7, 9];
        let mut r = XdrReader::new(&bytes);
        assert_eq!(r.read_u32().unwrap(), 7);
        assert_eq!(r.finish(), Err(XdrError::TrailingBytes(1)));
    }
}
