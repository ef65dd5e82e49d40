//! Marker search over a forward-only byte stream.
//!
//! All markers the parser looks for are defined here. TIFF-level markers are
//! compared under the file's byte order; JPEG markers are always big-endian.

use std::collections::VecDeque;
use std::io::Read;

use crate::error::IoError;
use crate::format::tiff::ByteOrder;
use crate::io::ByteCursor;

// =============================================================================
// Markers
// =============================================================================

/// Start Of Image marker
pub const JPEG_SOI: [u8; 2] = [0xFF, 0xD8];

/// End Of Image marker
pub const JPEG_EOI: [u8; 2] = [0xFF, 0xD9];

/// APP1 segment marker, where EXIF lives
pub const JPEG_APP1: [u8; 2] = [0xFF, 0xE1];

/// EXIF identifier code "Exif\0\0"
pub const EXIF_HEADER: [u8; 6] = [0x45, 0x78, 0x69, 0x66, 0x00, 0x00];

/// Big-endian byte order marker ("MM")
pub const MOTOROLA_ALIGN: [u8; 2] = [0x4D, 0x4D];

/// Little-endian byte order marker ("II")
pub const INTEL_ALIGN: [u8; 2] = [0x49, 0x49];

/// Offset of IFD0 at the end of the TIFF header, written big-endian
pub const TIFF_HEADER_TAIL: [u8; 4] = [0x00, 0x00, 0x00, 0x08];

// =============================================================================
// Search
// =============================================================================

/// Consume bytes until the most recently read ones equal `pattern`.
///
/// The comparison runs forward for big-endian and reversed for
/// little-endian (see [`ByteOrder::matches`]). Returns the cursor offset
/// right after the match, or `None` if the stream ended first. Bytes read
/// while searching are gone either way.
pub fn find_bytes<R: Read>(
    cursor: &mut ByteCursor<R>,
    pattern: &[u8],
    byte_order: ByteOrder,
) -> Result<Option<i64>, IoError> {
    if pattern.is_empty() {
        return Ok(Some(cursor.offset()));
    }

    let mut window: VecDeque<u8> = VecDeque::with_capacity(pattern.len());
    while let Some(b) = cursor.read_byte()? {
        if window.len() == pattern.len() {
            window.pop_front();
        }
        window.push_back(b);

        if window.len() == pattern.len() && byte_order.matches(window.make_contiguous(), pattern)
        {
            return Ok(Some(cursor.offset()));
        }
    }

    Ok(None)
}
