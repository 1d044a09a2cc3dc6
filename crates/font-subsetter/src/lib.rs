//! Font subsetting wrapper around hb-subset with builder pattern.
//!
//! This crate provides a high-level interface for subsetting fonts using HarfBuzz's
//! hb-subset library. It operates purely on byte slices with no file I/O dependencies.
//!
//! # Example
//!
//! ```no_run
//! use fontsieve_font_subsetter::{Subsetter, PROBLEMATIC_CODEPOINTS};
//!
//! let font_data: &[u8] = &[];
//!
//! // Keep only the characters of a piece of text
//! let subset = Subsetter::new().with_text("Hello, 世界").subset(font_data);
//!
//! // Keep a whole block, minus code points that break WOFF2 validation
//! let subset = Subsetter::new()
//!     .with_unicode_ranges([(0x3000, 0x303F)])
//!     .exclude_codepoints(PROBLEMATIC_CODEPOINTS.iter().copied())
//!     .subset(font_data);
//! ```

use std::collections::BTreeSet;

use anyhow::Result;
use hb_subset::{Blob, FontFace, SubsetInput, Tag};

/// Codepoints known to cause WOFF2 OTS validation errors.
///
/// U+F8FF (Apple logo) references `.notdef` as a composite component,
/// which Chrome's OTS parser rejects during WOFF2 decompression.
pub const PROBLEMATIC_CODEPOINTS: &[u32] = &[0xF8FF];

/// Layout features to retain during subsetting.
///
/// These OpenType features are commonly used for proper text rendering
/// and should be preserved in the subset font.
pub const LAYOUT_FEATURES: &[&[u8; 4]] = &[
    b"aalt", b"ccmp", b"dlig", b"fwid", b"hwid", b"jp78", b"jp83", b"jp90", b"liga", b"locl",
    b"nlck", b"pwid", b"vert", b"vjmo", b"vrt2", b"halt", b"vhal", b"kern", b"mark", b"mkmk",
    b"calt", b"case", b"frac", b"zero",
];

/// Font subsetter with builder pattern.
///
/// Provides a flexible way to configure font subsetting options before
/// performing the subset operation.
#[derive(Debug, Clone, Default)]
pub struct Subsetter {
    chars: BTreeSet<char>,
    excluded: BTreeSet<u32>,
}

impl Subsetter {
    /// Creates a subsetter that retains nothing but `.notdef` and keeps the
    /// [`LAYOUT_FEATURES`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds individual characters to include in the subset.
    pub fn with_chars(mut self, chars: impl IntoIterator<Item = char>) -> Self {
        self.chars.extend(chars);
        self
    }

    /// Adds every character of `text` to the subset.
    pub fn with_text(self, text: &str) -> Self {
        self.with_chars(text.chars())
    }

    /// Adds Unicode ranges to include in the subset.
    ///
    /// Each range is a tuple of (start, end) Unicode code points, inclusive.
    /// Values that are not Unicode scalar values (surrogates) are ignored.
    pub fn with_unicode_ranges(mut self, ranges: impl IntoIterator<Item = (u32, u32)>) -> Self {
        for (start, end) in ranges {
            self.chars.extend((start..=end).filter_map(char::from_u32));
        }
        self
    }

    /// Removes code points from the subset, regardless of how they were added.
    pub fn exclude_codepoints(mut self, codepoints: impl IntoIterator<Item = u32>) -> Self {
        self.excluded.extend(codepoints);
        self
    }

    /// Characters that will be retained, in code point order.
    pub fn retained_chars(&self) -> impl Iterator<Item = char> + '_ {
        self.chars.iter().copied().filter(|c| !self.excluded.contains(&u32::from(*c)))
    }

    /// Subsets the font data and returns the result.
    ///
    /// The output keeps the flavor of the input (TrueType or CFF outlines).
    pub fn subset(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut input = SubsetInput::new()?;

        {
            let mut feature_set = input.layout_feature_tag_set();
            for tag in LAYOUT_FEATURES {
                feature_set.insert(Tag::new(*tag));
            }
        }

        {
            let mut unicode_set = input.unicode_set();
            for c in self.retained_chars() {
                unicode_set.insert(c);
            }
        }

        let font = FontFace::new(Blob::from_bytes(data)?)?;
        let subset_font = input.subset_font(&font)?;
        Ok(subset_font.underlying_blob().to_vec())
    }
}
