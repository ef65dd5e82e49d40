//! # exif-thumb
//!
//! Extracts the embedded thumbnail from a JPEG file's EXIF metadata.
//!
//! EXIF metadata is a TIFF-structured directory chain inside the JPEG's APP1
//! segment. When a second directory (IFD1) is present it describes a
//! thumbnail, normally a small JPEG stream stored in the same file. This crate
//! finds it with a single forward pass over the file: no seeking, no
//! buffering of the whole image.
//!
//! ## Architecture
//!
//! - [`io`] - Forward-only byte cursor over a buffered source
//! - [`mod@format`] - Marker scanner, TIFF directory walk, thumbnail extraction
//! - [`config`] - CLI configuration
//! - [`error`] - Error types
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use exif_thumb::read_thumbnail;
//!
//! match read_thumbnail(Path::new("photo.jpg"))? {
//!     Some(bytes) => std::fs::write("photo-thumb.jpg", &bytes)?,
//!     None => println!("no thumbnail"),
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod error;
pub mod format;
pub mod io;

// Re-export commonly used types
pub use config::{Cli, Command, ExtractConfig, InfoConfig, OutputFormat};
pub use error::{ExifError, IoError};
pub use format::scanner::{
    find_bytes, EXIF_HEADER, INTEL_ALIGN, JPEG_APP1, JPEG_EOI, JPEG_SOI, MOTOROLA_ALIGN,
    TIFF_HEADER_TAIL,
};
pub use format::thumbnail::{read_thumbnail, ThumbnailExtractor, ThumbnailInfo, ThumbnailStream};
pub use format::tiff::{
    ByteOrder, Compression, FieldType, IfdEntry, IfdWalker, ParseOptions, TiffTag, Walk,
    WalkOutcome, IFD_ENTRY_SIZE,
};
pub use io::{ByteCursor, INITIAL_OFFSET};
