//! exif-thumb - Extract embedded EXIF thumbnails from JPEG files.
//!
//! This binary parses the command line, sets up logging and copies the
//! thumbnail stream to its destination.

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use exif_thumb::{
    config::{Cli, Command, ExtractConfig, InfoConfig, OutputFormat},
    IoError, ParseOptions, ThumbnailInfo, ThumbnailStream, WalkOutcome,
};

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.into_command() {
        Command::Extract(config) => run_extract(config),
        Command::Info(config) => run_info(config),
    }
}

// =============================================================================
// Extract Command
// =============================================================================

fn run_extract(config: ExtractConfig) -> ExitCode {
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let output = config.output_path();
    let mut stream = match open_stream(&config.input, config.parse_options()) {
        Some(stream) => stream,
        None => return ExitCode::FAILURE,
    };

    let info = stream.info().clone();
    if !info.has_thumbnail {
        warn!("{}: no embedded thumbnail", config.input.display());
        return ExitCode::FAILURE;
    }
    if !info.is_extractable() {
        warn!(
            "{}: thumbnail compression {} is not supported",
            config.input.display(),
            info.compression_type()
        );
        return ExitCode::FAILURE;
    }

    let written = match copy_to_file(&mut stream, &output) {
        Ok(n) => n,
        Err(e) => {
            error!("Failed to write {}: {}", output.display(), e);
            return ExitCode::FAILURE;
        }
    };
    stream.close();

    if written == 0 {
        // Nothing after IFD1 looked like a JPEG stream
        warn!("{}: thumbnail data not found", config.input.display());
        remove_output(&output);
        return ExitCode::FAILURE;
    }

    if let Some(expected) = info.jpeg_length {
        if written != expected as u64 {
            warn!(
                "Wrote {} bytes but IFD1 declares {}; thumbnail may be truncated",
                written, expected
            );
        }
    }

    info!("Wrote {} byte thumbnail to {}", written, output.display());
    ExitCode::SUCCESS
}

/// Copy the thumbnail stream to a new file.
///
/// A failed copy leaves no partial file behind.
fn copy_to_file<R: Read>(stream: &mut ThumbnailStream<R>, output: &Path) -> Result<u64, IoError> {
    let file = File::create(output).map_err(|e| IoError::Write(e.to_string()))?;
    let result = write_stream(stream, file);
    if result.is_err() {
        remove_output(output);
    }
    result
}

fn write_stream<R: Read>(stream: &mut ThumbnailStream<R>, file: File) -> Result<u64, IoError> {
    let mut writer = BufWriter::new(file);
    let written = io::copy(stream, &mut writer).map_err(|e| IoError::Write(e.to_string()))?;
    writer.flush().map_err(|e| IoError::Write(e.to_string()))?;
    Ok(written)
}

fn remove_output(output: &Path) {
    if let Err(e) = std::fs::remove_file(output) {
        debug!("Could not remove output {}: {}", output.display(), e);
    }
}

// =============================================================================
// Info Command
// =============================================================================

fn run_info(config: InfoConfig) -> ExitCode {
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let stream = match open_stream(&config.input, config.parse_options()) {
        Some(stream) => stream,
        None => return ExitCode::FAILURE,
    };
    let outcome = stream.outcome();
    let info = stream.info().clone();
    stream.close();

    match config.format {
        OutputFormat::Text => print_info_text(&config.input, &info, outcome),
        OutputFormat::Json => {
            let json = serde_json::json!({
                "path": config.input.display().to_string(),
                "outcome": format!("{:?}", outcome),
                "compression_type": info.compression_type(),
                "extractable": info.is_extractable(),
                "thumbnail": info,
            });
            match serde_json::to_string_pretty(&json) {
                Ok(text) => println!("{}", text),
                Err(e) => {
                    error!("Failed to serialize thumbnail info: {}", e);
                    return ExitCode::FAILURE;
                }
            }
        }
    }

    ExitCode::SUCCESS
}

fn print_info_text(path: &Path, info: &ThumbnailInfo, outcome: WalkOutcome) {
    println!("File: {}", path.display());
    if let Some(order) = info.byte_order {
        println!("  Byte order:     {}", order.name());
    }
    if let Some(n) = info.ifd0_entries {
        println!("  IFD0 entries:   {}", n);
    }
    println!("  Thumbnail:      {}", if info.has_thumbnail { "yes" } else { "no" });
    if !outcome.is_complete() {
        println!("  Stopped at:     {:?}", outcome);
    }
    if let Some(offset) = info.ifd1_offset {
        println!("  IFD1 offset:    {}", offset);
    }
    if let Some(n) = info.ifd1_entries {
        println!("  IFD1 entries:   {}", n);
    }
    match info.compression() {
        Some(c) => println!("  Compression:    {} ({})", c.name(), c.code()),
        None => println!("  Compression:    unknown ({})", info.compression_type()),
    }
    if let (Some(w), Some(h)) = (info.width, info.height) {
        println!("  Dimensions:     {}x{}", w, h);
    }
    if let Some(spp) = info.samples_per_pixel {
        println!("  Samples/pixel:  {}", spp);
    }
    if let Some(offset) = info.jpeg_offset {
        println!("  JPEG offset:    {}", offset);
    }
    if let Some(len) = info.jpeg_length {
        println!("  JPEG length:    {}", len);
    }
}

// =============================================================================
// Shared
// =============================================================================

/// Open an extraction session, logging the reason on failure.
fn open_stream(input: &Path, options: ParseOptions) -> Option<ThumbnailStream<File>> {
    match ThumbnailStream::open_with(input, options) {
        Ok(stream) => Some(stream),
        Err(e) if e.is_truncated() => {
            error!("{}: file truncated. {}", input.display(), e);
            None
        }
        Err(e) => {
            error!("{}: {}", input.display(), e);
            None
        }
    }
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "exif_thumb=debug"
    } else {
        "exif_thumb=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

// =============================================================================
// Tests
// =============================================================================
