//! The seam between the pipeline and whatever build tool drives it.

use super::HostSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Font,
    Stylesheet,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetSource {
    Bytes(Vec<u8>),
    Text(String),
}

impl AssetSource {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Bytes(bytes) => bytes,
            Self::Text(text) => text.as_bytes(),
        }
    }
}

/// A file handed to the host, named relative to the host's output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedAsset {
    pub kind: AssetKind,
    pub file_name: String,
    pub source: AssetSource,
}

/// A build tool hosting a pipeline run.
///
/// The pipeline calls `settings` once when the run is configured, `emit` for
/// every asset in order, and `inject` at most once with all stylesheet links.
pub trait Host {
    fn settings(&self) -> HostSettings;

    fn emit(&mut self, asset: &EmittedAsset) -> anyhow::Result<()>;

    fn inject(&mut self, links: &[StylesheetLink]) -> anyhow::Result<()>;
}

/// A reference to an emitted stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StylesheetLink {
    pub href: String,
}

impl StylesheetLink {
    pub fn to_html(&self) -> String {
        format!(r#"<link rel="stylesheet" href="{}">"#, self.href)
    }
}

/// Inserts link tags before `</head>`, or appends them when there is none.
pub fn inject_into_html(html: &str, links: &[StylesheetLink]) -> String {
    if links.is_empty() {
        return html.to_string();
    }

    let tags: String = links.iter().map(|link| format!("    {}\n", link.to_html())).collect();
    match html.find("</head>") {
        Some(pos) => {
            let (head, rest) = html.split_at(pos);
            let mut out = String::with_capacity(html.len() + tags.len() + 1);
            out.push_str(head);
            if !head.ends_with('\n') {
                out.push('\n');
            }
            out.push_str(&tags);
            out.push_str(rest);
            out
        }
        None => {
            let mut out = html.to_string();
            if !out.is_empty() && !out.ends_with('\n') {
                out.push('\n');
            }
            out.push_str(&tags);
            out
        }
    }
}
