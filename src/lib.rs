//! mksite: a small static site generator
//!
//! Reads an INI config, a directory of Markdown posts with front-matter and a
//! directory of Tera (Jinja-style) templates, and writes a directory of HTML
//! pages plus a copy of the static assets.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod generator;
pub mod output;
pub mod templates;

pub use error::{Error, Result};

use std::path::{Path, PathBuf};

use config::{Config, ConfigMode};
use content::DateFallback;
use generator::{BuildSummary, Generator};

/// Knobs that are not part of the config file
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    pub config_mode: ConfigMode,
    pub date_fallback: DateFallback,
}

/// The main mksite application
#[derive(Debug, Clone)]
pub struct Mksite {
    /// Site configuration
    pub config: Config,
    pub options: BuildOptions,
    /// Base directory relative settings paths are resolved against
    pub base_dir: PathBuf,
    pub posts_dir: PathBuf,
    pub templates_dir: PathBuf,
    /// Generated site
    pub output_dir: PathBuf,
    pub static_dir: PathBuf,
}

impl Mksite {
    /// Create a new instance from an already loaded configuration
    pub fn new<P: AsRef<Path>>(base_dir: P, config: Config, options: BuildOptions) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let settings = &config.settings;

        let posts_dir = base_dir.join(&settings.posts);
        let templates_dir = base_dir.join(&settings.templates);
        let output_dir = base_dir.join(&settings.output);
        let static_dir = base_dir.join(&settings.static_dir);

        Self {
            config,
            options,
            base_dir,
            posts_dir,
            templates_dir,
            output_dir,
            static_dir,
        }
    }

    /// Load the config file at `config_path` (relative to `base_dir` unless
    /// absolute) and create an instance from it
    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(
        base_dir: P,
        config_path: Q,
        options: BuildOptions,
    ) -> Result<Self> {
        let base_dir = base_dir.as_ref();
        let config_path = base_dir.join(config_path);
        let config = Config::load(&config_path, options.config_mode)?;
        Ok(Self::new(base_dir, config, options))
    }

    /// Generate the static site
    pub fn generate(&self) -> Result<BuildSummary> {
        Generator::new(self).generate()
    }
}
