//! Error types shared by every stage of a build

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can stop a build or a config scaffold
#[derive(Error, Debug)]
pub enum Error {
    #[error("{} is not a directory or does not exist.", .0.display())]
    MissingDirectory(PathBuf),

    #[error("Missing {0} template")]
    MissingTemplate(String),

    #[error("Config file {} not found", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("Config file {} already exists", .0.display())]
    ConfigExists(PathBuf),

    #[error("Failed to parse config {}: {message}", .path.display())]
    ConfigParse { path: PathBuf, message: String },

    #[error("Config file {} has no [{section}] section", .path.display())]
    MissingSection { path: PathBuf, section: String },

    #[error("Unknown key `{key}` in [settings] of {}", .path.display())]
    UnknownSetting { path: PathBuf, key: String },

    #[error("Failed to read {}: {source}", .path.display())]
    ReadSource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Front-matter error in {}: {message}", .path.display())]
    FrontMatter { path: PathBuf, message: String },

    #[error("Invalid date `{value}` in {}", .path.display())]
    InvalidDate { path: PathBuf, value: String },

    #[error("{} has no date and undated posts are not allowed", .0.display())]
    MissingDate(PathBuf),

    #[error("Failed to clear output directory {}: {source}", .path.display())]
    ClearOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Static output directory {} already exists", .0.display())]
    StaticExists(PathBuf),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("Failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Pre-flight failures: a required directory or template is missing.
    /// Nothing has been written when one of these is returned.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::MissingDirectory(_) | Error::MissingTemplate(_))
    }
}
