//! fontsieve core - character collection, font subsetting and stylesheet assets.

pub mod charset;
pub mod config;
pub mod css;
pub mod error;
pub mod hash;
pub mod io;
pub mod pipeline;
pub mod transform;

pub use charset::{CharacterSet, Collection, PRESETS, Preset, ScanOutcome, ScanReport, collect};
pub use config::{FontDescriptor, Options};
pub use error::{Error, Result};
pub use pipeline::{
    AssetKind, AssetSource, EmittedAsset, Host, HostSettings, Phase, Pipeline, RunContext, StylesheetLink,
    inject_into_html,
};
pub use transform::{FontTransform, HarfBuzz, SubsetResult};
pub use fontsieve_font_woff::FontFormat;
