//! The run orchestrator.
//!
//! A run goes through four phases, strictly in order:
//!
//! 1. [`Pipeline::configure`] resolves the [`RunContext`] and resets all state.
//! 2. [`Pipeline::collect_and_transform`] builds the character set once, then
//!    subsets every configured font in order and groups the results. Subset
//!    files are written only after every font has been transformed.
//! 3. [`Pipeline::emit`] writes development stylesheets and flushes the
//!    emitted asset list to the host.
//! 4. [`Pipeline::inject`] hands the host one link per emitted stylesheet.
//!
//! Any failure in phase 2 resets the pipeline, so nothing from that run can
//! be emitted. Runs that are not production, are disabled, or have no fonts
//! pass through every phase without doing any work.

mod context;
mod host;

pub use context::{HostSettings, RunContext};
pub use host::{AssetKind, AssetSource, EmittedAsset, Host, StylesheetLink, inject_into_html};

use std::{collections::HashMap, path::PathBuf, time::Instant};

use indexmap::IndexMap;
use log::{debug, info, warn};

use crate::{
    charset::{self, CharacterSet, ScanReport},
    config::Options,
    css::{self, CssGroup, CssMode, Face},
    error::{Error, Result},
    hash::{address_css, address_font},
    io::{FontFile, relative_path},
    transform::{self, FontTransform, HarfBuzz},
};

/// Where a run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Configured,
    Transformed,
    Emitted,
    Injected,
}

pub struct Pipeline<T: FontTransform = HarfBuzz> {
    options: Options,
    transform: T,
    phase: Phase,
    context: Option<RunContext>,
    charset: Option<CharacterSet>,
    scan: ScanReport,
    groups: IndexMap<PathBuf, CssGroup>,
    assets: Vec<EmittedAsset>,
}

impl Pipeline<HarfBuzz> {
    pub fn harfbuzz(options: Options) -> Self {
        Self::new(options, HarfBuzz)
    }
}

impl<T: FontTransform> Pipeline<T> {
    pub fn new(options: Options, transform: T) -> Self {
        Self {
            options,
            transform,
            phase: Phase::Idle,
            context: None,
            charset: None,
            scan: ScanReport::default(),
            groups: IndexMap::new(),
            assets: Vec::new(),
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn context(&self) -> Option<&RunContext> {
        self.context.as_ref()
    }

    /// The frozen character set of the current run, once collected.
    pub fn charset(&self) -> Option<&CharacterSet> {
        self.charset.as_ref()
    }

    pub fn scan_report(&self) -> &ScanReport {
        &self.scan
    }

    pub fn groups(&self) -> &IndexMap<PathBuf, CssGroup> {
        &self.groups
    }

    /// Assets of the current run, in emission order.
    pub fn assets(&self) -> &[EmittedAsset] {
        &self.assets
    }

    /// Whether this run does any work.
    pub fn is_active(&self) -> bool {
        self.options.enabled
            && !self.options.fonts.is_empty()
            && self.context.as_ref().is_some_and(|ctx| ctx.production)
    }

    /// Starts a fresh run. Allowed from any phase.
    pub fn configure(&mut self, settings: HostSettings) -> &RunContext {
        self.reset();
        let context = RunContext::new(settings);
        debug!("Configured run (root {}, base {})", context.root.display(), context.base);
        self.phase = Phase::Configured;
        self.context.insert(context)
    }

    /// Phase 2: collect characters, subset every font, group the results.
    pub fn collect_and_transform(&mut self) -> Result<()> {
        self.require_phase(Phase::Configured)?;
        if !self.is_active() {
            self.log_inactive();
            self.phase = Phase::Transformed;
            return Ok(());
        }

        match self.try_collect_and_transform() {
            Ok(()) => {
                self.phase = Phase::Transformed;
                Ok(())
            }
            Err(e) => {
                self.reset();
                Err(e)
            }
        }
    }

    fn try_collect_and_transform(&mut self) -> Result<()> {
        self.options.validate()?;
        let root = self.root();

        let collection = charset::collect(
            &self.options.scan_globs,
            &self.options.extra_chars,
            self.options.preset.as_deref(),
            &root,
        )?;

        let mut results = Vec::with_capacity(self.options.fonts.len());
        for descriptor in &self.options.fonts {
            let result = transform::subset(
                &self.transform,
                descriptor,
                &collection.charset,
                &root,
                &self.options.output_dir,
                self.options.format,
            )?;
            results.push((Face::from(descriptor), result));
        }
        for (_, result) in &results {
            result.write()?;
        }

        self.groups = css::group(results);
        self.charset = Some(collection.charset);
        self.scan = collection.scan;
        Ok(())
    }

    /// Phase 3: write development stylesheets and flush assets to `host`.
    pub fn emit(&mut self, host: &mut dyn Host) -> Result<()> {
        self.require_phase(Phase::Transformed)?;
        if self.is_active() {
            self.assets = self.prepare_assets()?;
            for asset in &self.assets {
                host.emit(asset).map_err(Error::Emit)?;
            }
        }
        self.phase = Phase::Emitted;
        Ok(())
    }

    fn prepare_assets(&self) -> Result<Vec<EmittedAsset>> {
        let root = self.root();
        let Some(context) = &self.context else {
            return Ok(Vec::new());
        };
        let format = self.options.format;
        let mut assets = Vec::new();

        for group in self.groups.values() {
            if self.options.generate_css {
                let path = group.css_path(&self.options.css_file_name);
                FontFile::new(&path).write(css::render_css(&group.entries, CssMode::Development, format))?;
                info!("Wrote {}", relative_path(&root, &path));
            }

            let group_key = PathBuf::from(relative_path(&root, &group.dir));
            let mut names = HashMap::new();
            for font in &group.fonts {
                if names.contains_key(&font.relative_path) {
                    continue;
                }
                let emitted = format!("{}-{}", address_font(&group_key, &font.file_name), font.file_name);
                assets.push(EmittedAsset {
                    kind: AssetKind::Font,
                    file_name: context.asset_name(&emitted),
                    source: AssetSource::Bytes(font.buffer.clone()),
                });
                names.insert(font.relative_path.clone(), emitted);
            }

            if self.options.generate_css {
                let css = css::render_css(&group.entries, CssMode::Bundle(&names), format);
                let file_name = context.asset_name(&format!("font-{}.css", address_css(&css)));
                info!("Prepared {file_name}");
                assets.push(EmittedAsset {
                    kind: AssetKind::Stylesheet,
                    file_name,
                    source: AssetSource::Text(css),
                });
            }
        }
        Ok(assets)
    }

    /// Phase 4: link every emitted stylesheet, in emission order.
    pub fn inject(&mut self, host: &mut dyn Host) -> Result<Vec<StylesheetLink>> {
        self.require_phase(Phase::Emitted)?;
        let links = self.links();
        if !links.is_empty() {
            for link in &links {
                info!("Injecting {}", link.href);
            }
            host.inject(&links).map_err(Error::Emit)?;
        }
        self.phase = Phase::Injected;
        Ok(links)
    }

    fn links(&self) -> Vec<StylesheetLink> {
        let Some(context) = &self.context else {
            return Vec::new();
        };
        if !self.options.inject_css || !self.options.generate_css {
            return Vec::new();
        }
        self.assets
            .iter()
            .filter(|asset| asset.kind == AssetKind::Stylesheet)
            .map(|asset| StylesheetLink { href: context.href(&asset.file_name) })
            .collect()
    }

    /// Runs all four phases against `host`.
    pub fn run(&mut self, host: &mut dyn Host) -> Result<Vec<StylesheetLink>> {
        let start = Instant::now();
        self.configure(host.settings());
        self.collect_and_transform()?;
        self.emit(host)?;
        let links = self.inject(host)?;

        if self.is_active() {
            info!(
                "Subset {} fonts into {} assets in {:.2}s",
                self.options.fonts.len(),
                self.assets.len(),
                start.elapsed().as_secs_f64()
            );
        }
        Ok(links)
    }

    fn require_phase(&self, expected: Phase) -> Result<()> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(Error::OutOfOrder { expected, found: self.phase })
        }
    }

    fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.context = None;
        self.charset = None;
        self.scan = ScanReport::default();
        self.groups.clear();
        self.assets.clear();
    }

    fn root(&self) -> PathBuf {
        self.context.as_ref().map(|ctx| ctx.root.clone()).unwrap_or_default()
    }

    fn log_inactive(&self) {
        if !self.options.enabled {
            warn!("Font subsetting is disabled; skipping");
        } else if self.options.fonts.is_empty() {
            warn!("No fonts configured; skipping");
        } else {
            debug!("Not a production run; skipping");
        }
    }
}
