//! TIFF tag and field type definitions.
//!
//! Only the vocabulary needed to describe an EXIF thumbnail (IFD1) is defined
//! here. Everything else in a directory is read and skipped.

use serde::Serialize;

// =============================================================================
// TIFF Field Types
// =============================================================================

/// TIFF field types that can carry an inline thumbnail attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum FieldType {
    /// Unsigned 8-bit integer (1 byte)
    Byte = 1,

    /// Unsigned 16-bit integer (2 bytes)
    Short = 3,

    /// Unsigned 32-bit integer (4 bytes)
    Long = 4,
}

impl FieldType {
    /// Create a FieldType from its numeric value.
    ///
    /// Returns `None` for types that never hold a thumbnail attribute.
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            1 => Some(FieldType::Byte),
            3 => Some(FieldType::Short),
            4 => Some(FieldType::Long),
            _ => None,
        }
    }
}

// =============================================================================
// TIFF Tags
// =============================================================================

/// Tag IDs found in the thumbnail directory (IFD1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum TiffTag {
    /// Thumbnail width in pixels
    ImageWidth = 0x0100,

    /// Thumbnail height in pixels
    ImageLength = 0x0101,

    /// Bits per sample
    BitsPerSample = 0x0102,

    /// Compression scheme of the thumbnail
    Compression = 0x0103,

    /// Components per pixel, meaningful for uncompressed thumbnails
    SamplesPerPixel = 0x0115,

    /// Offset of the JPEG thumbnail from the TIFF header
    JpegInterchangeFormat = 0x0201,

    /// Byte length of the JPEG thumbnail
    JpegInterchangeFormatLength = 0x0202,
}

impl TiffTag {
    /// Create a TiffTag from its numeric value.
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            0x0100 => Some(TiffTag::ImageWidth),
            0x0101 => Some(TiffTag::ImageLength),
            0x0102 => Some(TiffTag::BitsPerSample),
            0x0103 => Some(TiffTag::Compression),
            0x0115 => Some(TiffTag::SamplesPerPixel),
            0x0201 => Some(TiffTag::JpegInterchangeFormat),
            0x0202 => Some(TiffTag::JpegInterchangeFormatLength),
            _ => None,
        }
    }

    /// Get the numeric tag ID.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Tag ID as it appears on disk in big-endian order.
    #[inline]
    pub const fn to_be_bytes(self) -> [u8; 2] {
        (self as u16).to_be_bytes()
    }
}

// =============================================================================
// Compression Values
// =============================================================================

/// Thumbnail compression schemes that can be extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(u16)]
pub enum Compression {
    /// Uncompressed strips
    Uncompressed = 1,

    /// JPEG stream ("old-style" JPEG code, as EXIF uses it)
    Jpeg = 6,
}

impl Compression {
    /// Create a Compression from its numeric value.
    ///
    /// Returns `None` for every code other than 1 and 6.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            1 => Some(Compression::Uncompressed),
            6 => Some(Compression::Jpeg),
            _ => None,
        }
    }

    /// Numeric compression code.
    #[inline]
    pub const fn code(self) -> u32 {
        self as u32
    }

    /// Get a human-readable name for the compression scheme.
    pub const fn name(self) -> &'static str {
        match self {
            Compression::Uncompressed => "Uncompressed",
            Compression::Jpeg => "JPEG",
        }
    }
}
