//! Output writer - owns the layout of the generated site

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::content::POSTS_DIR;
use crate::error::{Error, Result};

/// Outcome of clearing a directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cleared {
    Removed,
    /// There was nothing to remove
    Absent,
}

/// Recursively delete `path`. A missing directory is fine; anything else
/// (permissions, a file in the way, ...) is an error.
pub fn clear_dir(path: &Path) -> Result<Cleared> {
    match fs::remove_dir_all(path) {
        Ok(()) => {
            tracing::info!("Deleted: {:?}", path);
            Ok(Cleared::Removed)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Cleared::Absent),
        Err(source) => Err(Error::ClearOutput {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Copy a directory tree verbatim, empty directories included.
/// Refuses to merge into an existing destination.
pub fn copy_tree(src: &Path, dest: &Path) -> Result<usize> {
    if !src.is_dir() {
        return Err(Error::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("static directory {} not found", src.display()),
        )));
    }
    if dest.exists() {
        return Err(Error::StaticExists(dest.to_path_buf()));
    }

    let mut copied = 0;
    for entry in WalkDir::new(src).follow_links(true) {
        let entry = entry?;
        let relative = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
            tracing::debug!("Copied: {:?} -> {:?}", entry.path(), target);
            copied += 1;
        }
    }

    Ok(copied)
}

/// Writes rendered pages under the output root
pub struct OutputWriter {
    root: PathBuf,
}

impl OutputWriter {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Create the output root and its posts directory
    pub fn prepare(&self) -> Result<()> {
        fs::create_dir_all(self.root.join(POSTS_DIR))?;
        Ok(())
    }

    /// `<output>/posts/<slug>.html`
    pub fn write_post(&self, slug: &str, html: &str) -> Result<PathBuf> {
        self.write(self.root.join(POSTS_DIR).join(format!("{}.html", slug)), html)
    }

    /// `<output>/<slug>.html`
    pub fn write_standalone(&self, slug: &str, html: &str) -> Result<PathBuf> {
        self.write(self.root.join(format!("{}.html", slug)), html)
    }

    /// `<output>/index.html`
    pub fn write_index(&self, html: &str) -> Result<PathBuf> {
        self.write(self.root.join("index.html"), html)
    }

    /// Copy the static tree to `<output>/<name>`
    pub fn copy_static(&self, src: &Path, name: &str) -> Result<usize> {
        copy_tree(src, &self.root.join(name))
    }

    fn write(&self, path: PathBuf, html: &str) -> Result<PathBuf> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, html)?;
        tracing::debug!("Wrote: {:?}", path);
        Ok(path)
    }
}
