use thiserror::Error;

/// I/O errors that can occur when reading the source file or writing output
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IoError {
    /// The source file could not be opened
    #[error("Failed to open {path}: {message}")]
    Open { path: String, message: String },

    /// A read from the byte source failed for a reason other than end of stream
    #[error("Read error: {0}")]
    Read(String),

    /// Writing the extracted thumbnail failed
    #[error("Write error: {0}")]
    Write(String),
}

impl From<std::io::Error> for IoError {
    fn from(err: std::io::Error) -> Self {
        IoError::Read(err.to_string())
    }
}

/// Errors that abort an EXIF thumbnail parse.
///
/// Files without a thumbnail, or with a thumbnail in an unsupported
/// compression, are not errors: they are reported through
/// [`ThumbnailInfo`](crate::ThumbnailInfo).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExifError {
    /// I/O error while reading the file
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// The `Exif\0\0` identifier never appeared in the stream
    #[error("Malformed EXIF header: no Exif identifier found")]
    MissingExifIdentifier,

    /// The stream ended right after the EXIF identifier
    #[error("Malformed EXIF header: stream ended before the byte order marker")]
    TruncatedHeader,

    /// The two bytes after the EXIF identifier are neither II nor MM
    #[error("Malformed EXIF header: expected byte order 0x4949 (II) or 0x4D4D (MM), got 0x{0:04X}")]
    InvalidByteOrder(u16),

    /// The stream ended in the middle of a fixed-size directory read
    #[error("Unexpected end of stream while reading {stage} at offset {offset}")]
    UnexpectedEof { stage: &'static str, offset: i64 },

    /// Strict mode: the file does not start with SOI followed by APP1
    #[error("Not a JPEG with a leading APP1 segment")]
    NotJpeg,
}

impl ExifError {
    /// Whether this error means the EXIF header itself could not be read.
    pub fn is_malformed_header(&self) -> bool {
        matches!(
            self,
            ExifError::MissingExifIdentifier
                | ExifError::TruncatedHeader
                | ExifError::InvalidByteOrder(_)
        )
    }

    /// Whether the source ended before the directories were fully parsed.
    pub fn is_truncated(&self) -> bool {
        matches!(self, ExifError::UnexpectedEof { .. })
    }
}
