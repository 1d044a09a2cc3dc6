//! Named character presets defined as Unicode range expansions.

use crate::error::{Error, Result};

/// CJK Unified Ideographs block; ideograph-only presets keep nothing else.
pub const IDEOGRAPH_RANGE: (u32, u32) = (0x4E00, 0x9FFF);

/// A named, predefined Unicode range expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub name: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub estimated_size: &'static str,
    /// Inclusive code point ranges, expanded in order.
    pub ranges: &'static [(u32, u32)],
    /// Keep only code points inside [`IDEOGRAPH_RANGE`].
    pub ideographs_only: bool,
    /// Maximum number of characters kept after filtering.
    pub budget: Option<usize>,
}

/// 128-code-point blocks covering U+4E00..=U+9FFF.
const COMMON_3500_RANGES: &[(u32, u32)] = &{
    let mut ranges = [(0, 0); 164];
    let mut i = 0;
    while i < ranges.len() {
        let start = 0x4E00 + (i as u32) * 0x80;
        ranges[i] = (start, start + 0x7F);
        i += 1;
    }
    ranges
};

pub const PRESETS: &[Preset] = &[
    Preset {
        name: "gb2312-basic",
        label: "GB2312 basic hanzi",
        description: "Basic simplified Chinese character set of the GB2312 standard",
        estimated_size: "~500KB",
        ranges: &[(0x4E00, 0x9FA5)],
        ideographs_only: true,
        budget: Some(6763),
    },
    Preset {
        name: "common-3500",
        label: "Common 3500 hanzi",
        description: "Everyday Chinese characters, first 3500 ideographs",
        estimated_size: "~300KB",
        ranges: COMMON_3500_RANGES,
        ideographs_only: true,
        budget: Some(3500),
    },
    Preset {
        name: "punctuation",
        label: "CJK punctuation",
        description: "CJK symbols and punctuation, fullwidth forms",
        estimated_size: "~10KB",
        ranges: &[(0x3000, 0x303F), (0xFF00, 0xFFEF)],
        ideographs_only: false,
        budget: None,
    },
];

/// Names of all presets, in catalogue order.
pub fn names() -> Vec<&'static str> {
    PRESETS.iter().map(|p| p.name).collect()
}

/// Looks up a preset by name.
pub fn find(name: &str) -> Result<&'static Preset> {
    PRESETS
        .iter()
        .find(|p| p.name == name)
        .ok_or_else(|| Error::UnknownPreset { name: name.to_string(), available: names() })
}

impl Preset {
    /// Expands the preset into characters, in range order.
    ///
    /// Surrogates are skipped, ideograph-only presets drop everything outside
    /// the ideograph block, and the result is truncated to the budget.
    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        let (ideo_start, ideo_end) = IDEOGRAPH_RANGE;
        self.ranges
            .iter()
            .flat_map(|&(start, end)| start..=end)
            .filter(|cp| !(0xD800..=0xDFFF).contains(cp))
            .filter(move |cp| !self.ideographs_only || (ideo_start..=ideo_end).contains(cp))
            .filter_map(char::from_u32)
            .take(self.budget.unwrap_or(usize::MAX))
    }
}
