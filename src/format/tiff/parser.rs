//! Byte order handling and IFD entry records.
//!
//! # EXIF TIFF Layout
//!
//! ```text
//! Exif\0\0              EXIF identifier (6 bytes)
//! II | MM               Byte order marker (2 bytes)
//! 00 2A | 2A 00         TIFF version 42
//! 00 00 00 08           Offset of IFD0 (the "header tail")
//! N                     IFD0 entry count (2 bytes)
//! N x 12 bytes          IFD0 entries
//! O                     Offset of IFD1 (4 bytes)
//! ...                   (anything up to offset O)
//! M                     IFD1 entry count (2 bytes)
//! M x 12 bytes          IFD1 entries describing the thumbnail
//! ```
//!
//! Each IFD entry is 12 bytes:
//!
//! ```text
//! Bytes 0-1:  Tag ID
//! Bytes 2-3:  Field type
//! Bytes 4-7:  Value count
//! Bytes 8-11: Value (inline) or offset
//! ```

use serde::Serialize;

use super::tags::{FieldType, TiffTag};

// =============================================================================
// Constants
// =============================================================================

/// Size of a classic TIFF IFD entry in bytes.
pub const IFD_ENTRY_SIZE: usize = 12;

/// Size of the entry count field at the start of an IFD.
pub const IFD_COUNT_SIZE: usize = 2;

/// Size of the next-IFD offset field at the end of an IFD.
pub const IFD_NEXT_OFFSET_SIZE: usize = 4;

/// Widest integer the evaluator produces (32 bits).
const MAX_EVAL_BYTES: usize = 4;

// =============================================================================
// ByteOrder
// =============================================================================

/// Byte order (endianness) declared by the EXIF TIFF header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ByteOrder {
    /// Little-endian ("II" = Intel)
    LittleEndian,
    /// Big-endian ("MM" = Motorola)
    BigEndian,
}

impl ByteOrder {
    /// Interpret up to four bytes as an unsigned integer.
    ///
    /// Returns `None` for an empty slice or one longer than four bytes.
    pub fn evaluate(self, bytes: &[u8]) -> Option<u32> {
        if bytes.is_empty() || bytes.len() > MAX_EVAL_BYTES {
            return None;
        }
        Some(self.fold(bytes))
    }

    /// Read a u16 using this byte order.
    #[inline]
    pub fn read_u16(self, bytes: [u8; 2]) -> u16 {
        self.fold(&bytes) as u16
    }

    /// Read a u32 using this byte order.
    #[inline]
    pub fn read_u32(self, bytes: [u8; 4]) -> u32 {
        self.fold(&bytes)
    }

    /// Accumulate at most four bytes, most significant first.
    fn fold(self, bytes: &[u8]) -> u32 {
        let acc = |acc: u32, &b: &u8| (acc << 8) | b as u32;
        match self {
            ByteOrder::BigEndian => bytes.iter().fold(0, acc),
            ByteOrder::LittleEndian => bytes.iter().rev().fold(0, acc),
        }
    }

    /// Compare `window` against `pattern` the way multi-byte markers are
    /// laid out under this byte order: forward for big-endian, reversed for
    /// little-endian.
    pub fn matches(self, window: &[u8], pattern: &[u8]) -> bool {
        if window.len() != pattern.len() {
            return false;
        }
        match self {
            ByteOrder::BigEndian => window == pattern,
            ByteOrder::LittleEndian => window.iter().eq(pattern.iter().rev()),
        }
    }

    /// Short human-readable name.
    pub const fn name(self) -> &'static str {
        match self {
            ByteOrder::LittleEndian => "little-endian (Intel)",
            ByteOrder::BigEndian => "big-endian (Motorola)",
        }
    }
}

// =============================================================================
// IfdEntry
// =============================================================================

/// A raw 12-byte IFD entry read under a known byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IfdEntry {
    raw: [u8; IFD_ENTRY_SIZE],
    byte_order: ByteOrder,
}

impl IfdEntry {
    pub fn new(raw: [u8; IFD_ENTRY_SIZE], byte_order: ByteOrder) -> Self {
        Self { raw, byte_order }
    }

    /// Raw tag bytes as stored on disk.
    #[inline]
    pub fn tag_bytes(&self) -> [u8; 2] {
        [self.raw[0], self.raw[1]]
    }

    /// Numeric tag ID.
    #[inline]
    pub fn tag_id(&self) -> u16 {
        self.byte_order.read_u16(self.tag_bytes())
    }

    /// Recognized tag, if any.
    pub fn tag(&self) -> Option<TiffTag> {
        TiffTag::from_u16(self.tag_id())
    }

    /// Whether this entry carries `tag`.
    pub fn is_tag(&self, tag: TiffTag) -> bool {
        self.byte_order.matches(&self.tag_bytes(), &tag.to_be_bytes())
    }

    /// Field type of the value, if it is one a thumbnail attribute uses.
    pub fn field_type(&self) -> Option<FieldType> {
        FieldType::from_u16(self.byte_order.read_u16([self.raw[2], self.raw[3]]))
    }

    /// Number of values.
    pub fn count(&self) -> u32 {
        self.byte_order
            .read_u32([self.raw[4], self.raw[5], self.raw[6], self.raw[7]])
    }

    /// The 4-byte value/offset field.
    #[inline]
    pub fn value_bytes(&self) -> [u8; 4] {
        [self.raw[8], self.raw[9], self.raw[10], self.raw[11]]
    }

    /// First SHORT stored in the value field.
    pub fn short_value(&self) -> u16 {
        self.byte_order.read_u16([self.raw[8], self.raw[9]])
    }

    /// The value field read as a LONG.
    pub fn long_value(&self) -> u32 {
        self.byte_order.read_u32(self.value_bytes())
    }

    /// First inline value as an integer.
    ///
    /// Entries with an unknown field type are read as SHORT, the type every
    /// thumbnail attribute except offsets and lengths uses.
    pub fn inline_value(&self) -> u32 {
        match self.field_type() {
            Some(FieldType::Byte) => self.raw[8] as u32,
            Some(FieldType::Long) => self.long_value(),
            Some(FieldType::Short) | None => self.short_value() as u32,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
