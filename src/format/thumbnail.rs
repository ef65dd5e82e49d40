//! Thumbnail descriptor, extractor and extraction session.
//!
//! A [`ThumbnailStream`] owns the byte source for one parse. Opening it runs
//! the IFD walk eagerly; the thumbnail bytes are then pulled lazily through
//! [`std::io::Read`], from the SOI marker through the EOI marker inclusive.
//!
//! ```no_run
//! use std::fs::File;
//! use std::path::Path;
//! use exif_thumb::ThumbnailStream;
//!
//! let mut stream = ThumbnailStream::open(Path::new("photo.jpg"))?;
//! if stream.info().is_extractable() {
//!     let mut out = File::create("photo-thumb.jpg")?;
//!     std::io::copy(&mut stream, &mut out)?;
//! }
//! stream.close();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use bytes::Bytes;
use serde::Serialize;
use tracing::debug;

use crate::error::{ExifError, IoError};
use crate::io::ByteCursor;

use super::scanner::{find_bytes, JPEG_EOI, JPEG_SOI};
use super::tiff::{ByteOrder, Compression, IfdWalker, ParseOptions, WalkOutcome};

/// Chunk size used when draining a stream into memory.
const READ_CHUNK: usize = 8 * 1024;

// =============================================================================
// ThumbnailInfo
// =============================================================================

/// What the IFD walk learned about the embedded thumbnail.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ThumbnailInfo {
    /// Whether IFD1 exists (positive, reachable offset)
    pub has_thumbnail: bool,

    /// Byte order declared by the EXIF header
    pub byte_order: Option<ByteOrder>,

    /// Number of IFD0 entries
    pub ifd0_entries: Option<u16>,

    /// Raw IFD1 offset, relative to the TIFF header
    pub ifd1_offset: Option<u32>,

    /// Number of IFD1 entries
    pub ifd1_entries: Option<u16>,

    /// Compression code from IFD1 (6 = JPEG, 1 = uncompressed)
    pub compression_code: Option<u32>,

    /// Samples per pixel; only meaningful for uncompressed thumbnails
    pub samples_per_pixel: Option<u32>,

    pub width: Option<u32>,
    pub height: Option<u32>,

    /// JPEGInterchangeFormat: thumbnail offset relative to the TIFF header
    pub jpeg_offset: Option<u32>,

    /// JPEGInterchangeFormatLength: thumbnail size in bytes
    pub jpeg_length: Option<u32>,
}

impl ThumbnailInfo {
    /// Recognized compression scheme, if the code is one we can extract.
    pub fn compression(&self) -> Option<Compression> {
        self.compression_code.and_then(Compression::from_code)
    }

    /// Compression code with -1 standing in for "unknown".
    pub fn compression_type(&self) -> i64 {
        self.compression_code.map_or(-1, i64::from)
    }

    /// Whether reading the stream can yield any bytes.
    pub fn is_extractable(&self) -> bool {
        self.has_thumbnail && self.compression().is_some()
    }
}

// =============================================================================
// ThumbnailExtractor
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExtractState {
    SeekingSoi,
    Streaming { eoi_matched: usize },
    Done,
}

/// Copies the thumbnail's JPEG stream out of a cursor, SOI to EOI.
///
/// JPEG markers are big-endian regardless of the EXIF byte order, so the
/// SOI search does not depend on it. A source that ends before EOI yields
/// a short stream rather than an error.
#[derive(Debug)]
pub struct ThumbnailExtractor {
    state: ExtractState,
    pending: VecDeque<u8>,
    emitted: u64,
}

impl ThumbnailExtractor {
    /// Extractor that will search for SOI on first read.
    pub fn new() -> Self {
        Self {
            state: ExtractState::SeekingSoi,
            pending: VecDeque::with_capacity(JPEG_SOI.len()),
            emitted: 0,
        }
    }

    /// Extractor that never produces bytes.
    pub fn disabled() -> Self {
        Self {
            state: ExtractState::Done,
            pending: VecDeque::new(),
            emitted: 0,
        }
    }

    /// Whether no further bytes will be produced.
    pub fn is_done(&self) -> bool {
        self.state == ExtractState::Done && self.pending.is_empty()
    }

    /// Total bytes handed out so far.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    /// Fill `buf` with the next thumbnail bytes. Returns 0 at the end.
    pub fn read<R: Read>(
        &mut self,
        cursor: &mut ByteCursor<R>,
        buf: &mut [u8],
    ) -> Result<usize, IoError> {
        let mut n = 0;
        while n < buf.len() {
            if let Some(b) = self.pending.pop_front() {
                buf[n] = b;
                n += 1;
                continue;
            }

            match self.state {
                ExtractState::Done => break,
                ExtractState::SeekingSoi => {
                    if find_bytes(cursor, &JPEG_SOI, ByteOrder::BigEndian)?.is_some() {
                        debug!(offset = cursor.offset(), "Found thumbnail SOI");
                        self.pending.extend(JPEG_SOI);
                        self.state = ExtractState::Streaming { eoi_matched: 0 };
                    } else {
                        debug!("No SOI marker after IFD1");
                        self.state = ExtractState::Done;
                    }
                }
                ExtractState::Streaming { eoi_matched } => match cursor.read_byte()? {
                    None => {
                        debug!(
                            bytes = self.emitted + n as u64,
                            "Source ended before EOI, thumbnail truncated"
                        );
                        self.state = ExtractState::Done;
                    }
                    Some(b) => {
                        buf[n] = b;
                        n += 1;

                        let matched = if b == JPEG_EOI[eoi_matched] {
                            eoi_matched + 1
                        } else if b == JPEG_EOI[0] {
                            1
                        } else {
                            0
                        };

                        self.state = if matched == JPEG_EOI.len() {
                            debug!(bytes = self.emitted + n as u64, "Found thumbnail EOI");
                            ExtractState::Done
                        } else {
                            ExtractState::Streaming {
                                eoi_matched: matched,
                            }
                        };
                    }
                },
            }
        }

        self.emitted += n as u64;
        Ok(n)
    }
}

impl Default for ThumbnailExtractor {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// ThumbnailStream
// =============================================================================

/// One extraction session over a byte source.
///
/// The session owns the source until [`close`](Self::close) (or drop), so
/// the handle is released exactly once on every path.
pub struct ThumbnailStream<R> {
    cursor: ByteCursor<R>,
    info: ThumbnailInfo,
    outcome: WalkOutcome,
    extractor: ThumbnailExtractor,
}

impl ThumbnailStream<File> {
    /// Open a JPEG file and parse its EXIF directories.
    pub fn open(path: &Path) -> Result<Self, ExifError> {
        Self::open_with(path, ParseOptions::default())
    }

    /// Like [`open`](Self::open) with explicit options.
    pub fn open_with(path: &Path, options: ParseOptions) -> Result<Self, ExifError> {
        let cursor = ByteCursor::open(path)?;
        debug!(path = %path.display(), "Opened source");
        Self::from_cursor(cursor, options)
    }
}

impl<R: Read> ThumbnailStream<R> {
    /// Parse from any byte source positioned at the start of the file.
    pub fn from_reader(reader: R) -> Result<Self, ExifError> {
        Self::from_reader_with(reader, ParseOptions::default())
    }

    /// Like [`from_reader`](Self::from_reader) with explicit options.
    pub fn from_reader_with(reader: R, options: ParseOptions) -> Result<Self, ExifError> {
        Self::from_cursor(ByteCursor::new(reader), options)
    }

    fn from_cursor(mut cursor: ByteCursor<R>, options: ParseOptions) -> Result<Self, ExifError> {
        let walk = IfdWalker::new(&mut cursor, options).run()?;

        let extractor = if walk.outcome.is_complete() && walk.info.is_extractable() {
            ThumbnailExtractor::new()
        } else {
            debug!(
                outcome = ?walk.outcome,
                compression = walk.info.compression_type(),
                "Thumbnail not extractable"
            );
            ThumbnailExtractor::disabled()
        };

        Ok(Self {
            cursor,
            info: walk.info,
            outcome: walk.outcome,
            extractor,
        })
    }

    /// Descriptor produced by the IFD walk.
    pub fn info(&self) -> &ThumbnailInfo {
        &self.info
    }

    /// Whether the file has an IFD1 thumbnail directory.
    pub fn has_thumbnail(&self) -> bool {
        self.info.has_thumbnail
    }

    /// Where the IFD walk stopped.
    pub fn outcome(&self) -> WalkOutcome {
        self.outcome
    }

    /// Thumbnail bytes produced so far.
    pub fn bytes_read(&self) -> u64 {
        self.extractor.emitted()
    }

    /// Drain the remaining thumbnail bytes into memory.
    pub fn read_all(&mut self) -> Result<Bytes, IoError> {
        let mut out = Vec::new();
        let mut chunk = [0u8; READ_CHUNK];
        loop {
            let n = self.extractor.read(&mut self.cursor, &mut chunk)?;
            if n == 0 {
                break;
            }
            out.extend_from_slice(&chunk[..n]);
        }
        Ok(Bytes::from(out))
    }

    /// End the session and hand back the underlying source.
    pub fn close(self) -> R {
        self.cursor.into_inner()
    }
}

impl<R: Read> Read for ThumbnailStream<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.extractor
            .read(&mut self.cursor, buf)
            .map_err(io::Error::other)
    }
}

/// Extract the thumbnail of a file into memory.
///
/// Returns `Ok(None)` when the file has no extractable thumbnail.
pub fn read_thumbnail(path: &Path) -> Result<Option<Bytes>, ExifError> {
    let mut stream = ThumbnailStream::open(path)?;
    let bytes = stream.read_all()?;
    stream.close();

    if bytes.is_empty() {
        Ok(None)
    } else {
        Ok(Some(bytes))
    }
}

// =============================================================================
// Tests
// =============================================================================
