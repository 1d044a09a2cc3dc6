//! Error types for the subset pipeline.

use std::{io, path::PathBuf, result};

use crate::pipeline::Phase;

/// Errors that abort a pipeline run.
///
/// Scan targets that cannot be read are not errors; they are reported as
/// [`ScanOutcome::Skipped`](crate::charset::ScanOutcome::Skipped).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("unknown preset '{name}' (available presets: {})", available.join(", "))]
    UnknownPreset { name: String, available: Vec<&'static str> },

    #[error("font file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to subset {}: {source:#}", font.display())]
    Transform {
        font: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid glob pattern: {0}")]
    Glob(String),

    #[error("pipeline step requires phase {expected:?}, but the pipeline is in {found:?}")]
    OutOfOrder { expected: Phase, found: Phase },

    #[error("host rejected pipeline output: {0:#}")]
    Emit(#[source] anyhow::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}

pub type Result<T> = result::Result<T, Error>;
