//! Thumbnail extraction integration tests.
//!
//! Tests verify:
//! - Extracted bytes are the embedded JPEG verbatim, SOI through EOI
//! - Both byte orders produce identical thumbnails
//! - Unsupported or missing compression yields an empty stream
//! - `read_thumbnail` and `io::copy` paths agree

use std::fs::{self, File};
use std::io::{self, BufWriter, Cursor, Read, Write};

use exif_thumb::{read_thumbnail, Compression, ThumbnailStream, WalkOutcome};

use super::test_utils::{
    create_exif_jpeg_with_thumbnail, create_test_jpeg, create_test_rgb_jpeg, is_valid_jpeg,
    write_temp_file, ByteOrderType, ExifJpegBuilder,
};

// =============================================================================
// Verbatim Extraction
// =============================================================================

#[test]
fn test_big_endian_thumbnail_extraction() {
    let (data, thumbnail) = create_exif_jpeg_with_thumbnail(ByteOrderType::BigEndian);
    let file = write_temp_file(&data);

    let mut stream = ThumbnailStream::open(file.path()).unwrap();
    assert!(stream.has_thumbnail());
    assert_eq!(stream.info().compression(), Some(Compression::Jpeg));

    let bytes = stream.read_all().unwrap();
    assert_eq!(&bytes[..], &thumbnail[..]);
    assert!(is_valid_jpeg(&bytes), "Extracted thumbnail should decode");
}

#[test]
fn test_little_endian_thumbnail_extraction() {
    let (data, thumbnail) = create_exif_jpeg_with_thumbnail(ByteOrderType::LittleEndian);
    let file = write_temp_file(&data);

    let mut stream = ThumbnailStream::open(file.path()).unwrap();
    assert_eq!(stream.info().compression_type(), 6);
    assert_eq!(stream.info().width, Some(32));
    assert_eq!(stream.info().height, Some(24));

    let bytes = stream.read_all().unwrap();
    assert_eq!(&bytes[..], &thumbnail[..]);
    assert!(is_valid_jpeg(&bytes));
}

#[test]
fn test_both_byte_orders_produce_equivalent_results() {
    let (be_data, _) = create_exif_jpeg_with_thumbnail(ByteOrderType::BigEndian);
    let (le_data, _) = create_exif_jpeg_with_thumbnail(ByteOrderType::LittleEndian);

    let mut be = ThumbnailStream::from_reader(Cursor::new(be_data)).unwrap();
    let mut le = ThumbnailStream::from_reader(Cursor::new(le_data)).unwrap();

    assert_eq!(be.info().ifd1_offset, le.info().ifd1_offset);
    assert_eq!(be.info().jpeg_length, le.info().jpeg_length);
    assert_eq!(be.read_all().unwrap(), le.read_all().unwrap());
}

#[test]
fn test_extraction_stops_at_first_eoi() {
    let (data, thumbnail) = create_exif_jpeg_with_thumbnail(ByteOrderType::BigEndian);
    // The main image follows the thumbnail and has its own EOI
    assert!(data.len() > thumbnail.len() + 100);

    let mut stream = ThumbnailStream::from_reader(Cursor::new(data)).unwrap();
    let bytes = stream.read_all().unwrap();
    assert_eq!(bytes.len(), thumbnail.len());
    assert_eq!(stream.bytes_read(), thumbnail.len() as u64);
    assert_eq!(&bytes[bytes.len() - 2..], &[0xFF, 0xD9]);

    // Further reads stay at end of stream
    let mut buf = [0u8; 16];
    assert_eq!(stream.read(&mut buf).unwrap(), 0);
}

#[test]
fn test_extraction_matches_declared_length() {
    let thumbnail = create_test_rgb_jpeg(20, 10, 60);
    let data = ExifJpegBuilder::new()
        .with_ifd0_entries(11)
        .with_gap(64)
        .with_thumbnail(thumbnail.clone())
        .with_main_image(create_test_jpeg(64, 64, 85))
        .build();

    let mut stream = ThumbnailStream::from_reader(Cursor::new(data)).unwrap();
    assert_eq!(stream.info().jpeg_length, Some(thumbnail.len() as u32));
    let bytes = stream.read_all().unwrap();
    assert_eq!(bytes.len() as u32, stream.info().jpeg_length.unwrap());
}

#[test]
fn test_small_reads_match_bulk_read() {
    let (data, thumbnail) = create_exif_jpeg_with_thumbnail(ByteOrderType::LittleEndian);
    let mut stream = ThumbnailStream::from_reader(Cursor::new(data)).unwrap();

    let mut out = Vec::new();
    let mut buf = [0u8; 7];
    loop {
        let n = stream.read(&mut buf).unwrap();
        if n == 0 {
            break;
        }
        out.extend_from_slice(&buf[..n]);
    }
    assert_eq!(out, thumbnail);
}

#[test]
fn test_copy_to_file() {
    let (data, thumbnail) = create_exif_jpeg_with_thumbnail(ByteOrderType::BigEndian);
    let input = write_temp_file(&data);
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("thumb.jpg");

    let mut stream = ThumbnailStream::open(input.path()).unwrap();
    let mut writer = BufWriter::new(File::create(&output).unwrap());
    let written = io::copy(&mut stream, &mut writer).unwrap();
    writer.flush().unwrap();
    drop(writer);
    stream.close();

    assert_eq!(written, thumbnail.len() as u64);
    assert_eq!(fs::read(&output).unwrap(), thumbnail);
}

#[test]
fn test_truncated_thumbnail_yields_prefix() {
    let (data, thumbnail) = create_exif_jpeg_with_thumbnail(ByteOrderType::BigEndian);
    let start = data
        .windows(thumbnail.len())
        .position(|w| w == &thumbnail[..])
        .unwrap();
    let cut = thumbnail.len() - 10;
    let truncated = data[..start + cut].to_vec();

    let mut stream = ThumbnailStream::from_reader(Cursor::new(truncated)).unwrap();
    let bytes = stream.read_all().unwrap();
    assert_eq!(&bytes[..], &thumbnail[..cut]);
    assert!(!is_valid_jpeg(&bytes));
}

// =============================================================================
// Compression Gating
// =============================================================================

#[test]
fn test_uncompressed_code_is_extracted() {
    let data = ExifJpegBuilder::new().with_compression(Some(1)).build();
    let mut stream = ThumbnailStream::from_reader(Cursor::new(data)).unwrap();

    assert_eq!(stream.info().compression(), Some(Compression::Uncompressed));
    let bytes = stream.read_all().unwrap();
    assert_eq!(&bytes[..], &[0xFF, 0xD8, 0x01, 0x02, 0x03, 0xFF, 0xD9]);
}

#[test]
fn test_unsupported_compression_yields_nothing() {
    for order in [ByteOrderType::BigEndian, ByteOrderType::LittleEndian] {
        let data = ExifJpegBuilder::new()
            .with_byte_order(order)
            .with_compression(Some(3))
            .build();
        let mut stream = ThumbnailStream::from_reader(Cursor::new(data)).unwrap();

        assert_eq!(stream.outcome(), WalkOutcome::Complete);
        assert!(stream.has_thumbnail());
        assert_eq!(stream.info().compression_type(), 3);
        assert!(!stream.info().is_extractable());

        let mut buf = [0u8; 32];
        assert_eq!(stream.read(&mut buf).unwrap(), 0, "{:?}", order);
        assert_eq!(stream.bytes_read(), 0);
    }
}

#[test]
fn test_missing_compression_tag() {
    let data = ExifJpegBuilder::new().with_compression(None).build();
    let mut stream = ThumbnailStream::from_reader(Cursor::new(data)).unwrap();

    assert!(stream.has_thumbnail());
    assert_eq!(stream.info().compression_type(), -1);
    assert!(stream.read_all().unwrap().is_empty());
}

#[test]
fn test_uncompressed_samples_per_pixel() {
    let data = ExifJpegBuilder::new()
        .with_byte_order(ByteOrderType::LittleEndian)
        .with_compression(Some(1))
        .with_samples_per_pixel(3)
        .build();
    let stream = ThumbnailStream::from_reader(Cursor::new(data)).unwrap();
    assert_eq!(stream.info().samples_per_pixel, Some(3));
    assert_eq!(stream.info().compression_code, Some(1));
}

// =============================================================================
// read_thumbnail
// =============================================================================

#[test]
fn test_read_thumbnail() {
    let (data, thumbnail) = create_exif_jpeg_with_thumbnail(ByteOrderType::LittleEndian);
    let file = write_temp_file(&data);

    let bytes = read_thumbnail(file.path()).unwrap().unwrap();
    assert_eq!(&bytes[..], &thumbnail[..]);
}

#[test]
fn test_read_thumbnail_without_ifd1() {
    let data = ExifJpegBuilder::new().with_ifd1_offset(0).build();
    let file = write_temp_file(&data);
    assert_eq!(read_thumbnail(file.path()).unwrap(), None);
}

#[test]
fn test_read_thumbnail_malformed() {
    let file = write_temp_file(&create_test_jpeg(8, 8, 90));
    let err = read_thumbnail(file.path()).unwrap_err();
    assert!(err.is_malformed_header());
}
