//! Web font container encoding for subset fonts.
//!
//! Subsetting produces a plain sfnt (TrueType or CFF flavored). This crate
//! wraps that sfnt into the container a stylesheet asks for:
//!
//! - [`FontFormat::Ttf`] / [`FontFormat::Otf`]: the sfnt bytes unchanged
//! - [`FontFormat::Woff`]: WOFF 1.0, per-table zlib compression
//! - [`FontFormat::Woff2`]: WOFF 2.0, one Brotli stream, null table transforms
//!
//! # Example
//!
//! ```no_run
//! use fontsieve_font_woff::{FontFormat, encode};
//!
//! let sfnt: &[u8] = &[];
//! let woff2 = encode(sfnt, FontFormat::Woff2).unwrap();
//! ```

mod sfnt;
mod woff;
mod woff2;

use std::{fmt, result, str::FromStr};

use read_fonts::ReadError;

/// Errors that can occur while encoding a web font container.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to parse font: {0}")]
    Parse(#[from] ReadError),

    #[error("table {0} is listed but its data is out of bounds")]
    MissingTableData(String),

    #[error("unknown font format '{name}' (expected one of: {})", FontFormat::NAMES.join(", "))]
    UnknownFormat { name: String },

    #[error("compression failed: {0}")]
    Compress(#[from] std::io::Error),
}

pub type Result<T> = result::Result<T, Error>;

/// Target format of an encoded font.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontFormat {
    Ttf,
    Otf,
    Woff,
    #[default]
    Woff2,
}

impl FontFormat {
    /// Accepted format names, in declaration order.
    pub const NAMES: &[&str] = &["ttf", "otf", "woff", "woff2"];

    /// File extension (without the dot) for fonts in this format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Ttf => "ttf",
            Self::Otf => "otf",
            Self::Woff => "woff",
            Self::Woff2 => "woff2",
        }
    }

    /// Value for the CSS `format()` hint of an `@font-face` `src`.
    pub fn css_format(self) -> &'static str {
        match self {
            Self::Ttf => "truetype",
            Self::Otf => "opentype",
            Self::Woff => "woff",
            Self::Woff2 => "woff2",
        }
    }
}

impl fmt::Display for FontFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for FontFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ttf" | "truetype" => Ok(Self::Ttf),
            "otf" | "opentype" => Ok(Self::Otf),
            "woff" => Ok(Self::Woff),
            "woff2" => Ok(Self::Woff2),
            _ => Err(Error::UnknownFormat { name: s.to_string() }),
        }
    }
}

/// Encodes sfnt font data into the requested container format.
///
/// # Arguments
///
/// * `sfnt` - Raw TrueType or OpenType (CFF) font data
/// * `format` - Target container
///
/// # Returns
///
/// The encoded font, or an error if the sfnt table directory cannot be read.
pub fn encode(sfnt: &[u8], format: FontFormat) -> Result<Vec<u8>> {
    match format {
        FontFormat::Ttf | FontFormat::Otf => Ok(sfnt.to_vec()),
        FontFormat::Woff => woff::encode(&sfnt::SfntTables::parse(sfnt)?),
        FontFormat::Woff2 => woff2::encode(&sfnt::SfntTables::parse(sfnt)?),
    }
}
