//! One-off font subsetting outside the pipeline.

use std::path::Path;

use anyhow::{Context, Result};
use fontsieve_core::{FontFormat, FontTransform, io::FontFile, transform::compression_ratio};
use log::info;

/// Subset a font file to `text` and write it to `output` in `format`.
pub fn subset_file(
    transform: &dyn FontTransform,
    input: &Path,
    output: &Path,
    text: &str,
    format: FontFormat,
) -> Result<()> {
    let data = FontFile::new(input).read()?;
    let subset_data = transform
        .transform(&data, text, format)
        .with_context(|| format!("Failed to subset {}", input.display()))?;
    FontFile::new(output).write(&subset_data)?;

    let input_size = data.len() as f64 / 1024.0;
    let output_size = subset_data.len() as f64 / 1024.0;

    info!(
        "Subset {} -> {} ({input_size:.2} KB -> {output_size:.2} KB, {:.1}% reduction)",
        input.file_name().unwrap_or_default().to_string_lossy(),
        output.file_name().unwrap_or_default().to_string_lossy(),
        compression_ratio(data.len(), subset_data.len()) * 100.0
    );

    Ok(())
}
