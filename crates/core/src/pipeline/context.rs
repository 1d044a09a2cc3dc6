use std::path::PathBuf;

/// What a host tells the pipeline when a run is configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostSettings {
    /// Project root; relative font and scan paths resolve against it.
    pub root: PathBuf,
    /// Public base path prepended to injected stylesheet links.
    pub base: String,
    /// Directory, inside the host's output, that receives emitted assets.
    pub assets_dir: String,
    /// Only production runs do any work.
    pub production: bool,
}

impl Default for HostSettings {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            base: "/".to_string(),
            assets_dir: "assets".to_string(),
            production: true,
        }
    }
}

/// Immutable per-run values resolved from [`HostSettings`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    pub root: PathBuf,
    /// Always ends with `/`.
    pub base: String,
    /// No leading or trailing `/`; empty means the output root.
    pub assets_dir: String,
    pub production: bool,
}

impl RunContext {
    pub fn new(settings: HostSettings) -> Self {
        let mut base = settings.base;
        if !base.ends_with('/') {
            base.push('/');
        }
        Self {
            root: settings.root,
            base,
            assets_dir: settings.assets_dir.trim_matches('/').to_string(),
            production: settings.production,
        }
    }

    /// Emitted file name for `name` under the fonts directory of the assets dir.
    pub fn asset_name(&self, name: &str) -> String {
        if self.assets_dir.is_empty() {
            format!("fonts/{name}")
        } else {
            format!("{}/fonts/{name}", self.assets_dir)
        }
    }

    /// Public URL of an emitted file.
    pub fn href(&self, file_name: &str) -> String {
        format!("{}{file_name}", self.base)
    }
}
