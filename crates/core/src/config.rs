//! Pipeline configuration.
//!
//! Options are usually read from a `fontsieve.toml` file next to the project:
//!
//! ```toml
//! scan_globs = ["src/**/*.{html,js,ts}"]
//! extra_chars = "①②③"
//! preset = "punctuation"
//!
//! [[fonts]]
//! src = "src/fonts/SourceHanSansCN-Medium.otf"
//! family = "Source Han Sans CN"
//! weight = 500
//! ```

use std::{
    collections::HashMap,
    fs::read_to_string,
    path::{Path, PathBuf},
};

use fontsieve_font_woff::FontFormat;
use serde::{Deserialize, Deserializer};

use crate::{
    charset::presets,
    error::{Error, Result},
    io::normalize,
    transform::output_path,
};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "fontsieve.toml";

/// Default scan pattern, relative to the project root.
pub const DEFAULT_SCAN_GLOB: &str = "src/**/*.{vue,js,ts,jsx,tsx,json,scss,less,css}";

/// Default subset directory, relative to each source font's directory.
pub const DEFAULT_OUTPUT_DIR: &str = "subset";

/// Default development stylesheet name.
pub const DEFAULT_CSS_FILE_NAME: &str = "font.css";

pub const DEFAULT_WEIGHT: u16 = 400;
pub const DEFAULT_STYLE: &str = "normal";

/// One font to subset.
///
/// `src` and `family` are optional here so that a missing value is reported
/// by [`Options::validate`] rather than as a parse error.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FontDescriptor {
    pub src: Option<String>,
    pub family: Option<String>,
    #[serde(default = "default_weight")]
    pub weight: u16,
    #[serde(default = "default_style")]
    pub style: String,
}

impl FontDescriptor {
    pub fn new(src: impl Into<String>, family: impl Into<String>) -> Self {
        Self {
            src: Some(src.into()),
            family: Some(family.into()),
            weight: DEFAULT_WEIGHT,
            style: DEFAULT_STYLE.to_string(),
        }
    }

    pub fn with_weight(mut self, weight: u16) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }

    /// Returns `(src, family)`, or a configuration error naming what is missing.
    pub fn required(&self) -> Result<(&str, &str)> {
        match (non_empty(&self.src), non_empty(&self.family)) {
            (Some(src), Some(family)) => Ok((src, family)),
            (None, _) => Err(Error::Config(format!(
                "font descriptor {} is missing `src`",
                self.label()
            ))),
            (_, None) => Err(Error::Config(format!(
                "font descriptor {} is missing `family`",
                self.label()
            ))),
        }
    }

    fn label(&self) -> String {
        match (non_empty(&self.family), non_empty(&self.src)) {
            (Some(family), _) => format!("'{family}'"),
            (None, Some(src)) => format!("'{src}'"),
            (None, None) => "(unnamed)".to_string(),
        }
    }
}

/// Options for one pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    pub fonts: Vec<FontDescriptor>,
    pub scan_globs: Vec<String>,
    pub output_dir: String,
    pub generate_css: bool,
    pub inject_css: bool,
    pub extra_chars: String,
    pub preset: Option<String>,
    pub enabled: bool,
    #[serde(deserialize_with = "deserialize_format")]
    pub format: FontFormat,
    pub css_file_name: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            fonts: Vec::new(),
            scan_globs: vec![DEFAULT_SCAN_GLOB.to_string()],
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
            generate_css: true,
            inject_css: true,
            extra_chars: String::new(),
            preset: None,
            enabled: true,
            format: FontFormat::default(),
            css_file_name: DEFAULT_CSS_FILE_NAME.to_string(),
        }
    }
}

impl Options {
    /// Parses options from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }

    /// Reads options from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_toml_str(&text)
    }

    /// Checks everything that can be checked without touching the file system.
    pub fn validate(&self) -> Result<()> {
        for (index, font) in self.fonts.iter().enumerate() {
            font.required()
                .map_err(|e| Error::Config(format!("fonts[{index}]: {}", message(&e))))?;
        }
        if let Some(name) = &self.preset {
            presets::find(name)?;
        }
        if self.output_dir.trim().is_empty() {
            return Err(Error::Config("`output_dir` must not be empty".to_string()));
        }
        if self.css_file_name.trim().is_empty() || self.css_file_name.contains(['/', '\\']) {
            return Err(Error::Config(format!(
                "`css_file_name` must be a plain file name, got '{}'",
                self.css_file_name
            )));
        }
        self.check_output_collisions()
    }

    /// Fails when two different sources would be subset into the same file.
    fn check_output_collisions(&self) -> Result<()> {
        let mut outputs: HashMap<PathBuf, (usize, PathBuf)> = HashMap::new();
        for (index, font) in self.fonts.iter().enumerate() {
            let Some(src) = non_empty(&font.src) else {
                continue;
            };
            let src = normalize(Path::new(src));
            let output = normalize(&output_path(&src, &self.output_dir, self.format));
            match outputs.get(&output) {
                Some((first, first_src)) if *first_src != src => {
                    return Err(Error::Config(format!(
                        "fonts[{first}] ('{}') and fonts[{index}] ('{}') would both be written to '{}'",
                        first_src.display(),
                        src.display(),
                        output.display()
                    )));
                }
                Some(_) => {}
                None => {
                    outputs.insert(output, (index, src));
                }
            }
        }
        Ok(())
    }
}

fn message(error: &Error) -> String {
    match error {
        Error::Config(msg) => msg.clone(),
        other => other.to_string(),
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn default_weight() -> u16 {
    DEFAULT_WEIGHT
}

fn default_style() -> String {
    DEFAULT_STYLE.to_string()
}

fn deserialize_format<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<FontFormat, D::Error> {
    let name = String::deserialize(deserializer)?;
    name.parse().map_err(serde::de::Error::custom)
}
