//! Minimal BCS (Binary Canonical Serialization) writer
//!
//! Covers what transfer transactions need: fixed-width little-endian
//! integers, ULEB128 lengths and enum tags, byte vectors and sequences.

use crate::wallet::SuiAddress;

#[derive(Debug, Default, Clone)]
pub struct BcsWriter {
    buf: Vec<u8>,
}

impl BcsWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_u16(&mut self, value: u16) -> &mut Self {
        self.buf.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn write_u64(&mut self, value: u64) -> &mut Self {
        self.buf.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn write_uleb128(&mut self, mut value: u64) -> &mut Self {
        loop {
            let byte = (value & 0x7f) as u8;
            value >>= 7;
            if value == 0 {
                self.buf.push(byte);
                return self;
            }
            self.buf.push(byte | 0x80);
        }
    }

    /// Enum variant index
    pub fn write_variant(&mut self, index: u32) -> &mut Self {
        self.write_uleb128(u64::from(index))
    }

    /// Sequence length prefix
    pub fn write_len(&mut self, len: usize) -> &mut Self {
        self.write_uleb128(len as u64)
    }

    /// Raw bytes without a length prefix (fixed-size arrays)
    pub fn write_fixed(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    /// `vector<u8>`: length prefix then bytes
    pub fn write_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.write_len(bytes.len());
        self.write_fixed(bytes)
    }

    pub fn write_seq<T: BcsEncode>(&mut self, items: &[T]) -> &mut Self {
        self.write_len(items.len());
        for item in items {
            item.encode(self);
        }
        self
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Types with a BCS encoding
pub trait BcsEncode {
    fn encode(&self, writer: &mut BcsWriter);

    fn to_bcs(&self) -> Vec<u8> {
        let mut writer = BcsWriter::new();
        self.encode(&mut writer);
        writer.into_bytes()
    }
}

impl BcsEncode for u64 {
    fn encode(&self, writer: &mut BcsWriter) {
        writer.write_u64(*self);
    }
}

impl BcsEncode for SuiAddress {
    fn encode(&self, writer: &mut BcsWriter) {
        writer.write_fixed(self.as_bytes());
    }
}
