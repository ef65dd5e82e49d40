//! EXIF thumbnail parsing.
//!
//! - [`scanner`]: marker constants and forward marker search
//! - [`tiff`]: byte order, IFD entries and the directory walk
//! - [`thumbnail`]: thumbnail descriptor, extractor and the extraction session

pub mod scanner;
pub mod thumbnail;
pub mod tiff;

pub use scanner::find_bytes;
pub use thumbnail::{read_thumbnail, ThumbnailExtractor, ThumbnailInfo, ThumbnailStream};
