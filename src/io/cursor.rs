use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

use crate::error::IoError;
use crate::format::tiff::IFD_ENTRY_SIZE;

/// Offset a fresh cursor starts at.
///
/// A JPEG whose APP1 segment directly follows SOI puts the TIFF header at
/// file byte 12 (`FF D8`, `FF E1`, 2 length bytes, `Exif\0\0`), so starting
/// at -12 makes offset 0 the first byte of the TIFF header. Other layouts
/// are corrected with [`ByteCursor::rebase`] once the header is found.
pub const INITIAL_OFFSET: i64 = -(IFD_ENTRY_SIZE as i64);

/// Forward-only byte reader over a buffered source.
///
/// The cursor counts every byte it hands out, including bytes read only to
/// be compared or discarded, so `offset()` always names the position of the
/// next unread byte in TIFF header coordinates. There is no way to seek or
/// rewind.
pub struct ByteCursor<R> {
    inner: BufReader<R>,
    offset: i64,
    eof: bool,
}

impl ByteCursor<File> {
    /// Open a file for sequential reading.
    pub fn open(path: &Path) -> Result<Self, IoError> {
        let file = File::open(path).map_err(|e| IoError::Open {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Ok(Self::new(file))
    }
}

impl<R: Read> ByteCursor<R> {
    /// Wrap a byte source positioned at the start of the file.
    pub fn new(reader: R) -> Self {
        Self {
            inner: BufReader::new(reader),
            offset: INITIAL_OFFSET,
            eof: false,
        }
    }

    /// Offset of the next unread byte.
    #[inline]
    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// Whether the source has been exhausted.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.eof
    }

    /// Read the next byte, or `None` once the source is exhausted.
    pub fn read_byte(&mut self) -> Result<Option<u8>, IoError> {
        if self.eof {
            return Ok(None);
        }

        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => {
                    self.eof = true;
                    return Ok(None);
                }
                Ok(_) => {
                    self.offset += 1;
                    return Ok(Some(byte[0]));
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Read a fixed-size record.
    ///
    /// Returns `None` if the source ends before all `N` bytes are read; the
    /// bytes that were read are still consumed.
    pub fn read_array<const N: usize>(&mut self) -> Result<Option<[u8; N]>, IoError> {
        let mut out = [0u8; N];
        for slot in out.iter_mut() {
            match self.read_byte()? {
                Some(b) => *slot = b,
                None => return Ok(None),
            }
        }
        Ok(Some(out))
    }

    /// Discard `count` bytes. Returns `false` if the source ended first.
    pub fn skip(&mut self, count: u64) -> Result<bool, IoError> {
        for _ in 0..count {
            if self.read_byte()?.is_none() {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Discard bytes until `offset()` equals `target`.
    ///
    /// A target behind the cursor is left alone. Returns `false` if the
    /// source ended before the target was reached.
    pub fn skip_to(&mut self, target: i64) -> Result<bool, IoError> {
        while self.offset < target {
            if self.read_byte()?.is_none() {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Renumber the next unread byte as `offset`.
    ///
    /// Used once the TIFF header has been located, so that offsets count from
    /// its first byte whatever segments precede APP1. No bytes are read.
    pub fn rebase(&mut self, offset: i64) {
        self.offset = offset;
    }

    /// Release the cursor and hand back the underlying source.
    pub fn into_inner(self) -> R {
        self.inner.into_inner()
    }
}
