//! Font transform invocation: one source font in, one subset buffer out.
//!
//! Nothing is written here. The pipeline writes subset files with
//! [`SubsetResult::write`] once every font of a run has been transformed.

use std::path::{Path, PathBuf};

use anyhow::Context;
use fontsieve_font_subsetter::{PROBLEMATIC_CODEPOINTS, Subsetter};
use fontsieve_font_woff::{FontFormat, encode};
use log::info;

use crate::{
    charset::CharacterSet,
    config::FontDescriptor,
    error::{Error, Result},
    io::{FontFile, resolve},
};

/// The binary subsetting primitive.
///
/// Implementations must be pure: the same font bytes, text and format always
/// produce the same output.
pub trait FontTransform {
    fn transform(&self, font: &[u8], text: &str, format: FontFormat) -> anyhow::Result<Vec<u8>>;
}

/// HarfBuzz subsetting followed by web font encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct HarfBuzz;

impl FontTransform for HarfBuzz {
    fn transform(&self, font: &[u8], text: &str, format: FontFormat) -> anyhow::Result<Vec<u8>> {
        let mut subsetter = Subsetter::new().with_text(text);
        if format == FontFormat::Woff2 {
            subsetter = subsetter.exclude_codepoints(PROBLEMATIC_CODEPOINTS.iter().copied());
        }
        let sfnt = subsetter.subset(font).context("hb-subset failed")?;
        encode(&sfnt, format).with_context(|| format!("failed to encode {format}"))
    }
}

/// Outcome of subsetting one font.
#[derive(Debug, Clone)]
pub struct SubsetResult {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub original_size: usize,
    pub subset_size: usize,
    /// `1 - subset_size / original_size`, or 0 for an empty source.
    pub compression_ratio: f64,
    pub charset: String,
    pub buffer: Vec<u8>,
}

impl SubsetResult {
    /// Writes the subset buffer to [`output_path`](Self::output_path).
    pub fn write(&self) -> Result<()> {
        FontFile::new(&self.output_path).write(&self.buffer)
    }
}

pub fn compression_ratio(original_size: usize, subset_size: usize) -> f64 {
    if original_size == 0 {
        0.0
    } else {
        1.0 - subset_size as f64 / original_size as f64
    }
}

/// Where the subset of `src_path` is written: `<src dir>/<output_dir>/<stem>.<ext>`.
pub fn output_path(src_path: &Path, output_dir: &str, format: FontFormat) -> PathBuf {
    let src_dir = src_path.parent().unwrap_or(Path::new(""));
    let stem = src_path.file_stem().unwrap_or_default();
    let mut file_name = stem.to_os_string();
    file_name.push(".");
    file_name.push(format.extension());
    resolve(src_dir, output_dir).join(file_name)
}

/// Subsets one font against the run's character set.
pub fn subset(
    transform: &dyn FontTransform,
    descriptor: &FontDescriptor,
    charset: &CharacterSet,
    root: &Path,
    output_dir: &str,
    format: FontFormat,
) -> Result<SubsetResult> {
    let (src, _) = descriptor.required()?;

    let input_path = resolve(root, src);
    let source = FontFile::new(&input_path);
    if !source.exists() {
        return Err(Error::NotFound(input_path));
    }

    let output_path = output_path(&input_path, output_dir, format);
    let font_data = source.read()?;
    let text = charset.text();
    let buffer = transform
        .transform(&font_data, &text, format)
        .map_err(|source| Error::Transform { font: input_path.clone(), source })?;

    let original_size = font_data.len();
    let subset_size = buffer.len();
    let ratio = compression_ratio(original_size, subset_size);

    info!(
        "Subset {} -> {} ({:.2} KB -> {:.2} KB, {:.1}% reduction)",
        input_path.file_name().unwrap_or_default().to_string_lossy(),
        output_path.file_name().unwrap_or_default().to_string_lossy(),
        original_size as f64 / 1024.0,
        subset_size as f64 / 1024.0,
        ratio * 100.0
    );

    Ok(SubsetResult {
        input_path,
        output_path,
        original_size,
        subset_size,
        compression_ratio: ratio,
        charset: text,
        buffer,
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use anyhow::bail;

    use super::*;

    /// Keeps the first half of the font and appends the text, so outputs are
    /// deterministic and visibly depend on the character set.
    struct Halve;

    impl FontTransform for Halve {
        fn transform(&self, font: &[u8], text: &str, _: FontFormat) -> anyhow::Result<Vec<u8>> {
            let mut out = font[..font.len() / 2].to_vec();
            out.extend_from_slice(text.as_bytes());
            Ok(out)
        }
    }

    struct Broken;

    impl FontTransform for Broken {
        fn transform(&self, _: &[u8], _: &str, _: FontFormat) -> anyhow::Result<Vec<u8>> {
            bail!("corrupt glyf table")
        }
    }

    fn charset(text: &str) -> CharacterSet {
        text.chars().collect()
    }

    #[test]
    fn test_compression_ratio() {
        assert_eq!(compression_ratio(0, 10), 0.0);
        assert_eq!(compression_ratio(100, 25), 0.75);
        assert_eq!(compression_ratio(100, 100), 0.0);
    }

    #[test]
    fn test_output_path() {
        assert_eq!(
            output_path(Path::new("/p/fonts/Han-Bold.otf"), "subset", FontFormat::Woff2),
            PathBuf::from("/p/fonts/subset/Han-Bold.woff2")
        );
        assert_eq!(
            output_path(Path::new("/p/fonts/Han.ttf"), "/out", FontFormat::Woff),
            PathBuf::from("/out/Han.woff")
        );
    }

    #[test]
    fn test_subset_reports_output_and_metrics() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("fonts")).unwrap();
        fs::write(dir.path().join("fonts/A.otf"), vec![7u8; 100]).unwrap();

        let result = subset(
            &Halve,
            &FontDescriptor::new("fonts/A.otf", "A"),
            &charset("ab"),
            dir.path(),
            "subset/nested",
            FontFormat::Woff2,
        )
        .unwrap();

        assert_eq!(result.input_path, dir.path().join("fonts/A.otf"));
        assert_eq!(result.output_path, dir.path().join("fonts/subset/nested/A.woff2"));
        assert_eq!(result.original_size, 100);
        assert_eq!(result.subset_size, 52);
        assert!((result.compression_ratio - 0.48).abs() < 1e-9);
        assert_eq!(result.charset, "ab");
        assert!(!result.output_path.exists());

        result.write().unwrap();
        assert_eq!(fs::read(&result.output_path).unwrap(), result.buffer);
    }

    #[test]
    fn test_missing_font_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = subset(
            &Halve,
            &FontDescriptor::new("fonts/missing.otf", "A"),
            &charset("a"),
            dir.path(),
            "subset",
            FontFormat::Woff2,
        )
        .unwrap_err();
        assert!(matches!(err, Error::NotFound(path) if path.ends_with("fonts/missing.otf")));
    }

    #[test]
    fn test_missing_family_is_config_error_before_io() {
        let descriptor = FontDescriptor { family: None, ..FontDescriptor::new("missing.otf", "") };
        let err = subset(
            &Halve,
            &descriptor,
            &charset("a"),
            Path::new("/nonexistent"),
            "subset",
            FontFormat::Woff2,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_transform_failure_is_reported_with_font() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("A.ttf"), b"font").unwrap();

        let err = subset(
            &Broken,
            &FontDescriptor::new("A.ttf", "A"),
            &charset("a"),
            dir.path(),
            "subset",
            FontFormat::Ttf,
        )
        .unwrap_err();

        assert!(matches!(&err, Error::Transform { font, .. } if font.ends_with("A.ttf")));
        assert!(err.to_string().contains("corrupt glyf table"));
        assert!(!dir.path().join("subset/A.ttf").exists());
    }
}
