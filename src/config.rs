//! Command-line configuration for exif-thumb.
//!
//! Options come from command-line arguments via clap, with environment
//! variable fallbacks using the `EXIF_THUMB_` prefix:
//!
//! - `EXIF_THUMB_OUTPUT` - Output path for `extract`
//! - `EXIF_THUMB_FORCE` - Overwrite an existing output file
//! - `EXIF_THUMB_STRICT` - Require SOI followed by APP1 at the start of the file
//! - `EXIF_THUMB_FORMAT` - Output format for `info` (text or json)
//!
//! # Example
//!
//! ```ignore
//! use clap::Parser;
//! use exif_thumb::config::{Cli, Command};
//!
//! match Cli::parse().into_command() {
//!     Command::Extract(config) => println!("extracting {}", config.input.display()),
//!     Command::Info(config) => println!("inspecting {}", config.input.display()),
//! }
//! ```

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::format::tiff::ParseOptions;

/// Suffix appended to the input file stem for the default output path.
pub const DEFAULT_OUTPUT_SUFFIX: &str = "-thumb";

/// Extension of the default output path.
pub const DEFAULT_OUTPUT_EXTENSION: &str = "jpg";

// =============================================================================
// CLI
// =============================================================================

/// exif-thumb - Extract embedded EXIF thumbnails from JPEG files.
#[derive(Parser, Debug, Clone)]
#[command(name = "exif-thumb")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn into_command(self) -> Command {
        self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Write the embedded thumbnail to a file.
    Extract(ExtractConfig),

    /// Print what the EXIF directories say about the thumbnail.
    Info(InfoConfig),
}

// =============================================================================
// Extract
// =============================================================================

#[derive(Args, Debug, Clone)]
pub struct ExtractConfig {
    /// JPEG file to read.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Where to write the thumbnail (default: `<stem>-thumb.jpg` beside the input).
    #[arg(short, long, value_name = "FILE", env = "EXIF_THUMB_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Overwrite the output file if it exists.
    #[arg(short, long, default_value_t = false, env = "EXIF_THUMB_FORCE")]
    pub force: bool,

    /// Only accept files starting with SOI followed by an APP1 segment.
    #[arg(long, default_value_t = false, env = "EXIF_THUMB_STRICT")]
    pub strict: bool,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl ExtractConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        validate_input(&self.input)?;

        let output = self.output_path();
        if output == self.input {
            return Err("Output path must differ from the input path".to_string());
        }
        if output.is_dir() {
            return Err(format!("Output path {} is a directory", output.display()));
        }
        if output.exists() && !self.force {
            return Err(format!(
                "Output file {} already exists. Use --force to overwrite",
                output.display()
            ));
        }

        Ok(())
    }

    /// Resolved output path.
    pub fn output_path(&self) -> PathBuf {
        match self.output {
            Some(ref path) => path.clone(),
            None => default_output_path(&self.input),
        }
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            require_jpeg_header: self.strict,
        }
    }
}

// =============================================================================
// Info
// =============================================================================

/// Output format for the `info` command.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

#[derive(Args, Debug, Clone)]
pub struct InfoConfig {
    /// JPEG file to inspect.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, env = "EXIF_THUMB_FORMAT")]
    pub format: OutputFormat,

    /// Only accept files starting with SOI followed by an APP1 segment.
    #[arg(long, default_value_t = false, env = "EXIF_THUMB_STRICT")]
    pub strict: bool,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl InfoConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        validate_input(&self.input)
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            require_jpeg_header: self.strict,
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn validate_input(input: &Path) -> Result<(), String> {
    if input.as_os_str().is_empty() {
        return Err("Input path is required".to_string());
    }
    if !input.is_file() {
        return Err(format!("Input file {} does not exist", input.display()));
    }
    Ok(())
}

/// `photo.jpg` becomes `photo-thumb.jpg` in the same directory.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!(
        "{}{}.{}",
        stem, DEFAULT_OUTPUT_SUFFIX, DEFAULT_OUTPUT_EXTENSION
    ))
}

// =============================================================================
// Tests
// =============================================================================
