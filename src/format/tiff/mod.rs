//! TIFF structures inside the EXIF APP1 segment.
//!
//! # Key Concepts
//!
//! - **Byte order**: EXIF declares its endianness (II = little-endian, MM = big-endian)
//!   right after the `Exif\0\0` identifier. Every multi-byte value and every
//!   TIFF-level marker comparison after that respects this order.
//!
//! - **IFD (Image File Directory)**: an entry count followed by 12-byte entries
//!   and the offset of the next directory. IFD0 describes the main image, IFD1
//!   (when present) the embedded thumbnail.
//!
//! - **Forward-only walk**: the parser never seeks. IFD1 is reached by
//!   discarding bytes until the cursor offset equals the IFD1 offset.

mod parser;
mod tags;
mod walker;

pub use parser::{ByteOrder, IfdEntry, IFD_COUNT_SIZE, IFD_ENTRY_SIZE, IFD_NEXT_OFFSET_SIZE};
pub use tags::{Compression, FieldType, TiffTag};
pub use walker::{IfdWalker, ParseOptions, Walk, WalkOutcome};
