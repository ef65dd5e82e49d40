//! EXIF directory walk from the byte order marker to the thumbnail IFD.
//!
//! The walk is a strict sequence over a forward-only cursor:
//!
//! 1. Detect byte order (`Exif\0\0` then `II` or `MM`)
//! 2. Locate IFD0 (TIFF header tail) and read its entry count
//! 3. Skip IFD0 entries and read the IFD1 offset
//! 4. Advance to IFD1 and read its entry count
//! 5. Scan IFD1 entries for the thumbnail attributes
//!
//! A missing header tail or a non-positive IFD1 offset ends the walk early
//! with "no thumbnail"; only a malformed EXIF header is fatal.

use std::io::Read;

use tracing::{debug, warn};

use crate::error::ExifError;
use crate::format::scanner::{
    find_bytes, EXIF_HEADER, INTEL_ALIGN, JPEG_APP1, JPEG_SOI, MOTOROLA_ALIGN, TIFF_HEADER_TAIL,
};
use crate::format::thumbnail::ThumbnailInfo;
use crate::io::ByteCursor;

use super::parser::{ByteOrder, IfdEntry, IFD_COUNT_SIZE, IFD_ENTRY_SIZE, IFD_NEXT_OFFSET_SIZE};
use super::tags::TiffTag;

/// Length of the `II`/`MM` marker that starts the TIFF header.
const BYTE_ORDER_MARKER_SIZE: usize = 2;

// =============================================================================
// Options and Outcome
// =============================================================================

/// Knobs for a single parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Require the file to start with SOI immediately followed by APP1.
    ///
    /// Without it any byte stream containing the EXIF identifier is
    /// accepted.
    pub require_jpeg_header: bool,
}

impl ParseOptions {
    pub fn strict() -> Self {
        Self {
            require_jpeg_header: true,
        }
    }
}

/// Where the walk stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkOutcome {
    /// Every stage ran; the cursor sits right after the IFD1 entries.
    Complete,

    /// No TIFF header tail was found after the byte order marker.
    NoTiffHeader,

    /// IFD1 offset was not strictly positive.
    NoIfd1,

    /// IFD1 offset points behind the cursor and cannot be reached.
    UnreachableIfd1,
}

impl WalkOutcome {
    /// Whether thumbnail extraction may follow.
    #[inline]
    pub const fn is_complete(self) -> bool {
        matches!(self, WalkOutcome::Complete)
    }
}

/// Result of a finished walk.
#[derive(Debug, Clone)]
pub struct Walk {
    pub info: ThumbnailInfo,
    pub outcome: WalkOutcome,
}

// =============================================================================
// IfdWalker
// =============================================================================

/// Drives the directory walk over a borrowed cursor.
pub struct IfdWalker<'a, R> {
    cursor: &'a mut ByteCursor<R>,
    options: ParseOptions,
    info: ThumbnailInfo,
}

impl<'a, R: Read> IfdWalker<'a, R> {
    pub fn new(cursor: &'a mut ByteCursor<R>, options: ParseOptions) -> Self {
        Self {
            cursor,
            options,
            info: ThumbnailInfo::default(),
        }
    }

    /// Run every stage in order.
    pub fn run(mut self) -> Result<Walk, ExifError> {
        if self.options.require_jpeg_header {
            self.check_jpeg_header()?;
        }

        let byte_order = self.detect_byte_order()?;
        self.info.byte_order = Some(byte_order);

        let Some(ifd0_entries) = self.locate_ifd0(byte_order)? else {
            debug!("No TIFF header tail found, no thumbnail");
            return Ok(self.finish(WalkOutcome::NoTiffHeader));
        };
        self.info.ifd0_entries = Some(ifd0_entries);

        let ifd1_offset = self.locate_ifd1(byte_order, ifd0_entries)?;
        self.info.ifd1_offset = Some(ifd1_offset);

        // Offsets are signed 32-bit values; the high bit set means negative.
        let signed_offset = ifd1_offset as i32;
        if signed_offset <= 0 {
            debug!(ifd1_offset = signed_offset, "IFD1 offset not positive, no thumbnail");
            return Ok(self.finish(WalkOutcome::NoIfd1));
        }

        let target = signed_offset as i64;
        if target < self.cursor.offset() {
            warn!(
                ifd1_offset = target,
                cursor = self.cursor.offset(),
                "IFD1 offset points backwards, skipping thumbnail"
            );
            return Ok(self.finish(WalkOutcome::UnreachableIfd1));
        }
        self.info.has_thumbnail = true;

        let ifd1_entries = self.count_ifd1_entries(byte_order, target)?;
        self.info.ifd1_entries = Some(ifd1_entries);

        self.scan_ifd1_entries(byte_order, ifd1_entries)?;

        debug!(
            compression = ?self.info.compression_code,
            offset = self.cursor.offset(),
            "IFD walk complete"
        );
        Ok(self.finish(WalkOutcome::Complete))
    }

    fn finish(self, outcome: WalkOutcome) -> Walk {
        Walk {
            info: self.info,
            outcome,
        }
    }

    fn check_jpeg_header(&mut self) -> Result<(), ExifError> {
        let prefix = self.cursor.read_array::<4>()?;
        match prefix {
            Some([a, b, c, d]) if [a, b] == JPEG_SOI && [c, d] == JPEG_APP1 => Ok(()),
            _ => Err(ExifError::NotJpeg),
        }
    }

    fn detect_byte_order(&mut self) -> Result<ByteOrder, ExifError> {
        // The identifier is ASCII, so it is searched in file order.
        if find_bytes(self.cursor, &EXIF_HEADER, ByteOrder::BigEndian)?.is_none() {
            return Err(ExifError::MissingExifIdentifier);
        }

        let marker = self
            .cursor
            .read_array::<BYTE_ORDER_MARKER_SIZE>()?
            .ok_or(ExifError::TruncatedHeader)?;
        // Offsets in the directories count from the byte order marker,
        // wherever APP1 sits in the file.
        self.cursor.rebase(BYTE_ORDER_MARKER_SIZE as i64);

        let byte_order = if marker == MOTOROLA_ALIGN {
            ByteOrder::BigEndian
        } else if marker == INTEL_ALIGN {
            ByteOrder::LittleEndian
        } else {
            return Err(ExifError::InvalidByteOrder(u16::from_be_bytes(marker)));
        };

        debug!(byte_order = byte_order.name(), "Detected byte order");
        Ok(byte_order)
    }

    fn locate_ifd0(&mut self, byte_order: ByteOrder) -> Result<Option<u16>, ExifError> {
        if find_bytes(self.cursor, &TIFF_HEADER_TAIL, byte_order)?.is_none() {
            return Ok(None);
        }

        let count = self.read_count(byte_order, "IFD0 entry count")?;
        debug!(entries = count, offset = self.cursor.offset(), "Found IFD0");
        Ok(Some(count))
    }

    fn locate_ifd1(&mut self, byte_order: ByteOrder, ifd0_entries: u16) -> Result<u32, ExifError> {
        let table_size = ifd0_entries as u64 * IFD_ENTRY_SIZE as u64;
        if !self.cursor.skip(table_size)? {
            return Err(self.eof("IFD0 entries"));
        }

        let raw = self
            .cursor
            .read_array::<IFD_NEXT_OFFSET_SIZE>()?
            .ok_or_else(|| self.eof("IFD1 offset"))?;
        let offset = byte_order.read_u32(raw);
        debug!(ifd1_offset = offset, "Read IFD1 offset");
        Ok(offset)
    }

    fn count_ifd1_entries(&mut self, byte_order: ByteOrder, target: i64) -> Result<u16, ExifError> {
        if !self.cursor.skip_to(target)? {
            return Err(self.eof("data before IFD1"));
        }
        debug_assert_eq!(self.cursor.offset(), target);

        let count = self.read_count(byte_order, "IFD1 entry count")?;
        debug!(entries = count, offset = target, "Found IFD1");
        Ok(count)
    }

    fn scan_ifd1_entries(&mut self, byte_order: ByteOrder, entries: u16) -> Result<(), ExifError> {
        for _ in 0..entries {
            let raw = self
                .cursor
                .read_array::<IFD_ENTRY_SIZE>()?
                .ok_or_else(|| self.eof("IFD1 entry"))?;
            let entry = IfdEntry::new(raw, byte_order);

            let Some(tag) = entry.tag() else {
                continue;
            };
            let value = entry.inline_value();
            match tag {
                // Later entries overwrite earlier ones
                TiffTag::Compression => self.info.compression_code = Some(value),
                TiffTag::SamplesPerPixel => self.info.samples_per_pixel = Some(value),
                TiffTag::ImageWidth => self.info.width = Some(value),
                TiffTag::ImageLength => self.info.height = Some(value),
                TiffTag::JpegInterchangeFormat => self.info.jpeg_offset = Some(value),
                TiffTag::JpegInterchangeFormatLength => self.info.jpeg_length = Some(value),
                TiffTag::BitsPerSample => {}
            }
        }
        Ok(())
    }

    fn read_count(&mut self, byte_order: ByteOrder, stage: &'static str) -> Result<u16, ExifError> {
        let raw = self
            .cursor
            .read_array::<IFD_COUNT_SIZE>()?
            .ok_or_else(|| self.eof(stage))?;
        Ok(byte_order.read_u16(raw))
    }

    fn eof(&self, stage: &'static str) -> ExifError {
        ExifError::UnexpectedEof {
            stage,
            offset: self.cursor.offset(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
