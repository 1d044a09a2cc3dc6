//! Character collection.
//!
//! The character set for a run is the union of a fixed baseline, an optional
//! preset, caller-supplied extra characters, and every character found in the
//! scanned source files. It is built once per run and frozen before any font
//! is subsetted, so every font in a run sees the same set.

pub mod presets;

use std::{
    collections::BTreeSet,
    fs::read,
    path::{Path, PathBuf},
};

use log::{debug, info};
use rayon::prelude::*;

use crate::{error::Result, io::glob_files};

pub use presets::{PRESETS, Preset};

/// Characters every subset keeps: ASCII letters, digits and punctuation,
/// common CJK punctuation, and whitespace.
pub const BASELINE_CHARS: &[&str] = &[
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789",
    "!@#$%^&*()_+-=[]{}|;:'\",.<>?/~`",
    "，。！？；：“”‘’（）【】《》、·—…",
    " \n\t",
];

/// An immutable, de-duplicated set of Unicode scalar values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterSet(BTreeSet<char>);

impl CharacterSet {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, c: char) -> bool {
        self.0.contains(&c)
    }

    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.0.iter().copied()
    }

    /// All characters concatenated in code point order.
    pub fn text(&self) -> String {
        self.0.iter().collect()
    }

    /// Whether every character of `chars` is in the set.
    pub fn is_superset_of(&self, chars: impl IntoIterator<Item = char>) -> bool {
        chars.into_iter().all(|c| self.contains(c))
    }
}

impl FromIterator<char> for CharacterSet {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// What happened to one matched scan target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// The file was read; `chars` is the number of distinct characters it contributed.
    Read { path: PathBuf, chars: usize },
    /// The file could not be read and was left out of the set.
    Skipped { path: PathBuf, reason: String },
}

/// Per-file results of the source scan, in path order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub outcomes: Vec<ScanOutcome>,
}

impl ScanReport {
    pub fn read_count(&self) -> usize {
        self.outcomes.iter().filter(|o| matches!(o, ScanOutcome::Read { .. })).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes.len() - self.read_count()
    }

    pub fn skipped(&self) -> impl Iterator<Item = (&Path, &str)> {
        self.outcomes.iter().filter_map(|o| match o {
            ScanOutcome::Skipped { path, reason } => Some((path.as_path(), reason.as_str())),
            ScanOutcome::Read { .. } => None,
        })
    }
}

/// The frozen character set of a run and how the scan went.
#[derive(Debug, Clone)]
pub struct Collection {
    pub charset: CharacterSet,
    pub scan: ScanReport,
}

/// Builds the character set for a run.
///
/// Fails only on an unknown preset or an invalid glob pattern; unreadable
/// scan targets are recorded in the [`ScanReport`] and skipped.
pub fn collect(
    scan_globs: &[String],
    extra_chars: &str,
    preset: Option<&str>,
    root: &Path,
) -> Result<Collection> {
    let mut chars: BTreeSet<char> = BASELINE_CHARS.iter().flat_map(|s| s.chars()).collect();

    if let Some(name) = preset {
        let preset = presets::find(name)?;
        let before = chars.len();
        chars.extend(preset.chars());
        info!(
            "Using preset {} ({}, {}): +{} characters",
            preset.name,
            preset.label,
            preset.estimated_size,
            chars.len() - before
        );
    }

    chars.extend(extra_chars.chars());

    let files = glob_files(root, scan_globs)?;
    let scanned: Vec<(ScanOutcome, BTreeSet<char>)> = files.into_par_iter().map(scan_file).collect();

    let mut scan = ScanReport::default();
    for (outcome, file_chars) in scanned {
        if let ScanOutcome::Skipped { path, reason } = &outcome {
            debug!("Skipped {}: {reason}", path.display());
        }
        chars.extend(file_chars);
        scan.outcomes.push(outcome);
    }

    info!(
        "Collected {} unique characters ({} files read, {} skipped)",
        chars.len(),
        scan.read_count(),
        scan.skipped_count()
    );

    Ok(Collection { charset: CharacterSet(chars), scan })
}

fn scan_file(path: PathBuf) -> (ScanOutcome, BTreeSet<char>) {
    match read(&path) {
        Ok(bytes) => {
            let chars: BTreeSet<char> = String::from_utf8_lossy(&bytes).chars().collect();
            (ScanOutcome::Read { path, chars: chars.len() }, chars)
        }
        Err(e) => (ScanOutcome::Skipped { path, reason: e.to_string() }, BTreeSet::new()),
    }
}
