//! CLI definitions and command dispatch.

use std::{fs::read_to_string, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fontsieve_core::{
    FontFormat, HarfBuzz, HostSettings, Options, PRESETS, Pipeline, collect, config::CONFIG_FILE_NAME,
    io::resolve,
};
use log::{info, warn};

use crate::{host::DistHost, subset::subset_file};

#[derive(Parser)]
#[command(name = "fontsieve")]
#[command(about = "Subset web fonts down to the characters a project uses")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, clap::Args)]
pub struct ProjectArgs {
    /// Configuration file, relative to the project root
    #[arg(short, long, default_value = CONFIG_FILE_NAME)]
    pub config: PathBuf,
    /// Project root
    #[arg(long, default_value = ".")]
    pub root: PathBuf,
}

impl ProjectArgs {
    pub fn load(&self) -> Result<Options> {
        let path = resolve(&self.root, &self.config);
        Options::load(&path).with_context(|| format!("Failed to load {}", path.display()))
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the whole pipeline and write assets into the dist directory
    Build {
        #[command(flatten)]
        project: ProjectArgs,
        /// Output directory, relative to the project root
        #[arg(long, default_value = "dist")]
        dist: PathBuf,
        /// Public base path of the site
        #[arg(long, default_value = "/")]
        base: String,
        /// Assets directory inside dist
        #[arg(long, default_value = "assets")]
        assets_dir: String,
        /// Development run: configure only, subset nothing
        #[arg(long)]
        dev: bool,
    },
    /// Collect the character set and report on the scan
    Chars {
        #[command(flatten)]
        project: ProjectArgs,
        /// Print the collected characters
        #[arg(long)]
        print: bool,
    },
    /// List the available character presets
    Presets,
    /// Subset a single font file
    Subset {
        input: PathBuf,
        output: PathBuf,
        /// Characters to keep
        #[arg(long, required_unless_present = "chars_file", conflicts_with = "chars_file")]
        text: Option<String>,
        /// File whose characters are kept
        #[arg(long)]
        chars_file: Option<PathBuf>,
        #[arg(long, default_value = "woff2")]
        format: FontFormat,
    },
}

impl Commands {
    pub fn run(self) -> Result<()> {
        match self {
            Commands::Build { project, dist, base, assets_dir, dev } => {
                let options = project.load()?;
                let settings = HostSettings {
                    root: project.root.clone(),
                    base,
                    assets_dir,
                    production: !dev,
                };
                let mut host = DistHost::new(resolve(&project.root, dist), settings);
                let links = Pipeline::harfbuzz(options).run(&mut host)?;
                info!(
                    "Wrote {} assets to {} ({} stylesheet links)",
                    host.written().len(),
                    host.dist().display(),
                    links.len()
                );
            }
            Commands::Chars { project, print } => {
                let options = project.load()?;
                let collection = collect(
                    &options.scan_globs,
                    &options.extra_chars,
                    options.preset.as_deref(),
                    &project.root,
                )?;
                for (path, reason) in collection.scan.skipped() {
                    warn!("Skipped {}: {reason}", path.display());
                }
                info!(
                    "{} characters from {} files ({} skipped)",
                    collection.charset.len(),
                    collection.scan.read_count(),
                    collection.scan.skipped_count()
                );
                if print {
                    println!("{}", collection.charset.text());
                }
            }
            Commands::Presets => {
                for preset in PRESETS {
                    println!(
                        "{:<14} {:<8} {} ({})",
                        preset.name, preset.estimated_size, preset.label, preset.description
                    );
                }
            }
            Commands::Subset { input, output, text, chars_file, format } => {
                let text = match (text, chars_file) {
                    (Some(text), _) => text,
                    (None, Some(path)) => read_to_string(&path)
                        .with_context(|| format!("Failed to read {}", path.display()))?,
                    (None, None) => String::new(),
                };
                subset_file(&HarfBuzz, &input, &output, &text, format)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_build_defaults() {
        let cli = Cli::try_parse_from(["fontsieve", "build"]).unwrap();
        let Commands::Build { project, dist, base, assets_dir, dev } = cli.command else {
            panic!("expected build");
        };
        assert_eq!(project.config, PathBuf::from("fontsieve.toml"));
        assert_eq!(project.root, PathBuf::from("."));
        assert_eq!(dist, PathBuf::from("dist"));
        assert_eq!(base, "/");
        assert_eq!(assets_dir, "assets");
        assert!(!dev);
    }

    #[test]
    fn test_subset_requires_characters() {
        assert!(Cli::try_parse_from(["fontsieve", "subset", "a.ttf", "b.woff2"]).is_err());
        assert!(
            Cli::try_parse_from(["fontsieve", "subset", "a.ttf", "b.woff2", "--text", "x", "--chars-file", "c"])
                .is_err()
        );

        let cli = Cli::try_parse_from(["fontsieve", "subset", "a.ttf", "b.woff", "--text", "xy", "--format", "woff"])
            .unwrap();
        let Commands::Subset { text, format, .. } = cli.command else {
            panic!("expected subset");
        };
        assert_eq!(text.as_deref(), Some("xy"));
        assert_eq!(format, FontFormat::Woff);
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        assert!(Cli::try_parse_from(["fontsieve", "subset", "a", "b", "--text", "x", "--format", "eot"]).is_err());
    }

    #[test]
    fn test_missing_config_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let project = ProjectArgs { config: PathBuf::from("fontsieve.toml"), root: dir.path().to_path_buf() };
        let err = project.load().unwrap_err();
        assert!(err.to_string().contains("fontsieve.toml"));
    }

    #[test]
    fn test_dev_build_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(
            root.join("fontsieve.toml"),
            "[[fonts]]\nsrc = \"fonts/missing.otf\"\nfamily = \"X\"\n",
        )
        .unwrap();

        let command = Commands::Build {
            project: ProjectArgs { config: PathBuf::from("fontsieve.toml"), root: root.to_path_buf() },
            dist: PathBuf::from("dist"),
            base: "/".to_string(),
            assets_dir: "assets".to_string(),
            dev: true,
        };
        command.run().unwrap();
        assert!(!root.join("dist").exists());
    }

    #[test]
    fn test_build_with_missing_font_fails() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(
            root.join("fontsieve.toml"),
            "[[fonts]]\nsrc = \"fonts/missing.otf\"\nfamily = \"X\"\n",
        )
        .unwrap();

        let command = Commands::Build {
            project: ProjectArgs { config: PathBuf::from("fontsieve.toml"), root: root.to_path_buf() },
            dist: PathBuf::from("dist"),
            base: "/".to_string(),
            assets_dir: "assets".to_string(),
            dev: false,
        };
        let err = command.run().unwrap_err();
        assert!(err.to_string().contains("missing.otf"));
        assert!(!root.join("dist").exists());
    }
}
