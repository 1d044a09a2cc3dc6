//! A host that writes pipeline output into a dist directory.

use std::{
    fs::{read_to_string, write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use fontsieve_core::{
    EmittedAsset, Host, HostSettings, StylesheetLink, inject_into_html,
    io::{FontFile, glob_files},
};
use log::{debug, info};

/// Writes emitted assets under `dist` and links stylesheets into its HTML pages.
#[derive(Debug, Clone)]
pub struct DistHost {
    dist: PathBuf,
    settings: HostSettings,
    written: Vec<PathBuf>,
}

impl DistHost {
    pub fn new(dist: impl Into<PathBuf>, settings: HostSettings) -> Self {
        Self { dist: dist.into(), settings, written: Vec::new() }
    }

    pub fn dist(&self) -> &Path {
        &self.dist
    }

    /// Files written by [`Host::emit`], in emission order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// HTML pages directly under the dist directory.
    pub fn html_pages(&self) -> Result<Vec<PathBuf>> {
        Ok(glob_files(&self.dist, &["*.html".to_string()])?)
    }
}

impl Host for DistHost {
    fn settings(&self) -> HostSettings {
        self.settings.clone()
    }

    fn emit(&mut self, asset: &EmittedAsset) -> Result<()> {
        let path = self.dist.join(&asset.file_name);
        FontFile::new(&path).write(asset.source.as_bytes())?;
        debug!("Emitted {}", path.display());
        self.written.push(path);
        Ok(())
    }

    fn inject(&mut self, links: &[StylesheetLink]) -> Result<()> {
        for page in self.html_pages()? {
            let html = read_to_string(&page).with_context(|| format!("Failed to read {}", page.display()))?;
            write(&page, inject_into_html(&html, links))
                .with_context(|| format!("Failed to write {}", page.display()))?;
            info!("Linked {} stylesheet(s) into {}", links.len(), page.display());
        }
        Ok(())
    }
}
