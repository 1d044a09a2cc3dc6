//! Grouping of subset fonts and `@font-face` stylesheet rendering.
//!
//! Fonts are grouped by the directory of their *source* file, so all weights
//! and styles living next to each other share one stylesheet. Entries are
//! always rendered in (family, weight, style) order, which keeps generated
//! stylesheets, and therefore their hashes, stable across runs.

use std::{
    cmp::Ordering,
    collections::HashMap,
    path::{Path, PathBuf},
};

use fontsieve_font_woff::FontFormat;
use indexmap::IndexMap;

use crate::{config::FontDescriptor, io::relative_path, transform::SubsetResult};

/// First line of every generated stylesheet.
pub const GENERATED_HEADER: &str = "/* Generated by fontsieve. Do not edit this file by hand. */";

/// Face metadata of a configured font.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Face {
    pub family: String,
    pub weight: u16,
    pub style: String,
}

impl From<&FontDescriptor> for Face {
    fn from(descriptor: &FontDescriptor) -> Self {
        Self {
            family: descriptor.family.clone().unwrap_or_default(),
            weight: descriptor.weight,
            style: descriptor.style.clone(),
        }
    }
}

/// One `@font-face` rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssEntry {
    pub family: String,
    pub weight: u16,
    pub style: String,
    /// Path of the subset font relative to the stylesheet's directory.
    pub relative_path: String,
}

/// A subset font's bytes, carried along for emission.
#[derive(Debug, Clone)]
pub struct GroupedFont {
    pub relative_path: String,
    pub file_name: String,
    pub buffer: Vec<u8>,
}

/// All fonts sharing one source directory.
#[derive(Debug, Clone)]
pub struct CssGroup {
    pub dir: PathBuf,
    pub entries: Vec<CssEntry>,
    pub fonts: Vec<GroupedFont>,
}

impl CssGroup {
    fn new(dir: PathBuf) -> Self {
        Self { dir, entries: Vec::new(), fonts: Vec::new() }
    }

    /// Path of the development stylesheet for this group.
    pub fn css_path(&self, css_file_name: &str) -> PathBuf {
        self.dir.join(css_file_name)
    }
}

/// How font paths are written into a stylesheet.
#[derive(Debug, Clone, Copy)]
pub enum CssMode<'a> {
    /// Paths relative to the stylesheet next to the source fonts.
    Development,
    /// Paths rewritten to emitted file names; keys are development relative paths.
    Bundle(&'a HashMap<String, String>),
}

/// Groups subset results by source directory, keeping first-seen order of directories.
pub fn group(results: impl IntoIterator<Item = (Face, SubsetResult)>) -> IndexMap<PathBuf, CssGroup> {
    let mut groups: IndexMap<PathBuf, CssGroup> = IndexMap::new();
    for (face, result) in results {
        let dir = result.input_path.parent().map(Path::to_path_buf).unwrap_or_default();
        let relative = relative_path(&dir, &result.output_path);
        let file_name = result
            .output_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let group = groups.entry(dir.clone()).or_insert_with(|| CssGroup::new(dir));
        group.entries.push(CssEntry {
            family: face.family,
            weight: face.weight,
            style: face.style,
            relative_path: relative.clone(),
        });
        group.fonts.push(GroupedFont { relative_path: relative, file_name, buffer: result.buffer });
    }
    groups
}

/// Quotes `value` as a single-quoted CSS string.
fn css_string(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for c in value.chars() {
        match c {
            '\'' | '\\' => {
                quoted.push('\\');
                quoted.push(c);
            }
            '\n' => quoted.push_str("\\a "),
            _ => quoted.push(c),
        }
    }
    quoted.push('\'');
    quoted
}

/// Case-insensitive comparison with a byte-wise tiebreak, so the order is total.
fn locale_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

fn entry_cmp(a: &CssEntry, b: &CssEntry) -> Ordering {
    locale_cmp(&a.family, &b.family)
        .then_with(|| a.weight.cmp(&b.weight))
        .then_with(|| locale_cmp(&a.style, &b.style))
        .then_with(|| a.relative_path.cmp(&b.relative_path))
}

/// Entries in rendering order: family, then weight, then style.
pub fn sorted_entries(entries: &[CssEntry]) -> Vec<&CssEntry> {
    let mut ordered: Vec<&CssEntry> = entries.iter().collect();
    ordered.sort_by(|a, b| entry_cmp(a, b));
    ordered
}

/// Renders a stylesheet with one `@font-face` rule per entry.
pub fn render_css(entries: &[CssEntry], mode: CssMode<'_>, format: FontFormat) -> String {
    let indent = match mode {
        CssMode::Development => "  ",
        CssMode::Bundle(_) => "\t",
    };

    let body = sorted_entries(entries)
        .into_iter()
        .map(|entry| {
            let path = match mode {
                CssMode::Development => entry.relative_path.as_str(),
                CssMode::Bundle(names) => names
                    .get(&entry.relative_path)
                    .map(String::as_str)
                    .unwrap_or(&entry.relative_path),
            };
            format!(
                "@font-face {{\n\
                 {indent}font-family: {family};\n\
                 {indent}font-style: {style};\n\
                 {indent}font-weight: {weight};\n\
                 {indent}font-display: swap;\n\
                 {indent}src: url('./{path}') format('{format}');\n\
                 }}",
                family = css_string(&entry.family),
                style = entry.style,
                weight = entry.weight,
                format = format.css_format(),
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!("{GENERATED_HEADER}\n{body}\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(family: &str, weight: u16, style: &str) -> CssEntry {
        CssEntry {
            family: family.to_string(),
            weight,
            style: style.to_string(),
            relative_path: format!("subset/{family}-{weight}-{style}.woff2"),
        }
    }

    fn result(src: &str, out: &str) -> SubsetResult {
        SubsetResult {
            input_path: PathBuf::from(src),
            output_path: PathBuf::from(out),
            original_size: 10,
            subset_size: 5,
            compression_ratio: 0.5,
            charset: String::new(),
            buffer: vec![1, 2, 3],
        }
    }

    fn face(family: &str, weight: u16) -> Face {
        Face { family: family.to_string(), weight, style: "normal".to_string() }
    }

    #[test]
    fn test_same_source_dir_shares_one_group() {
        let groups = group([
            (face("X", 700), result("/p/D/a.otf", "/p/D/subset/a.woff2")),
            (face("X", 400), result("/p/D/a.otf", "/p/D/subset/a.woff2")),
        ]);

        assert_eq!(groups.len(), 1);
        let group = &groups[&PathBuf::from("/p/D")];
        assert_eq!(group.entries.len(), 2);
        assert_eq!(group.entries[0].relative_path, "subset/a.woff2");
        assert_eq!(group.fonts[0].file_name, "a.woff2");

        let ordered = sorted_entries(&group.entries);
        assert_eq!(ordered[0].weight, 400);
        assert_eq!(ordered[1].weight, 700);
    }

    #[test]
    fn test_groups_keep_first_seen_order() {
        let groups = group([
            (face("B", 400), result("/p/z/b.otf", "/p/z/subset/b.woff2")),
            (face("A", 400), result("/p/a/a.otf", "/p/a/subset/a.woff2")),
            (face("C", 400), result("/p/z/c.otf", "/p/z/subset/c.woff2")),
        ]);
        let dirs: Vec<_> = groups.keys().cloned().collect();
        assert_eq!(dirs, vec![PathBuf::from("/p/z"), PathBuf::from("/p/a")]);
        assert_eq!(groups[0].entries.len(), 2);
    }

    #[test]
    fn test_order_is_independent_of_input_order() {
        let entries = vec![
            entry("b", 400, "normal"),
            entry("A", 700, "normal"),
            entry("a", 400, "italic"),
            entry("A", 400, "normal"),
            entry("A", 400, "italic"),
        ];
        let mut reversed = entries.clone();
        reversed.reverse();

        let forward = render_css(&entries, CssMode::Development, FontFormat::Woff2);
        let backward = render_css(&reversed, CssMode::Development, FontFormat::Woff2);
        assert_eq!(forward, backward);

        let order: Vec<_> = sorted_entries(&entries)
            .iter()
            .map(|e| (e.family.as_str(), e.weight, e.style.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("A", 400, "italic"),
                ("A", 400, "normal"),
                ("A", 700, "normal"),
                ("a", 400, "italic"),
                ("b", 400, "normal"),
            ]
        );
    }

    #[test]
    fn test_development_render() {
        let css = render_css(
            &[CssEntry {
                family: "Source Han Sans CN".to_string(),
                weight: 500,
                style: "normal".to_string(),
                relative_path: "subset/Han.woff2".to_string(),
            }],
            CssMode::Development,
            FontFormat::Woff2,
        );

        assert_eq!(
            css,
            "/* Generated by fontsieve. Do not edit this file by hand. */\n\
             @font-face {\n\
             \x20 font-family: 'Source Han Sans CN';\n\
             \x20 font-style: normal;\n\
             \x20 font-weight: 500;\n\
             \x20 font-display: swap;\n\
             \x20 src: url('./subset/Han.woff2') format('woff2');\n\
             }\n"
        );
    }

    #[test]
    fn test_family_is_escaped() {
        let css = render_css(&[entry("O'Neil \\ Sans", 400, "normal")], CssMode::Development, FontFormat::Woff2);
        assert!(css.contains(r"font-family: 'O\'Neil \\ Sans';"), "{css}");
        assert_eq!(css_string("a\nb"), r"'a\a b'");
    }

    #[test]
    fn test_bundle_render_rewrites_paths() {
        let entries = vec![entry("A", 400, "normal"), entry("A", 700, "normal")];
        let names = HashMap::from([(
            "subset/A-400-normal.woff2".to_string(),
            "1234abcd-A-400-normal.woff2".to_string(),
        )]);

        let css = render_css(&entries, CssMode::Bundle(&names), FontFormat::Woff);
        assert!(css.starts_with(GENERATED_HEADER));
        assert!(css.contains("\tsrc: url('./1234abcd-A-400-normal.woff2') format('woff');"));
        // Unmapped entries keep their path.
        assert!(css.contains("url('./subset/A-700-normal.woff2')"));
        assert_eq!(css.matches("@font-face").count(), 2);
    }
}
