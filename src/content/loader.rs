//! Content loader - loads posts and standalone pages from the posts directory

use chrono::{Local, NaiveDateTime};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use super::{parse_date, slugify, FrontMatter, MarkdownRenderer, Post, PostMeta, Standalone};
use crate::error::{Error, Result};
use crate::Mksite;

/// Template for standalone pages that do not name one
pub const DEFAULT_PAGE_TEMPLATE: &str = "page.html";

const DEFAULT_TITLE: &str = "Untitled";
const DEFAULT_CATEGORY: &str = "none";

/// What to do with a post that has no `date`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateFallback {
    /// Use the time the build started. Every undated post in a run gets the
    /// same timestamp, but two runs sort them differently against dated posts.
    #[default]
    Now,
    /// Refuse to build
    Require,
}

/// Everything found under the posts directory
#[derive(Debug, Default)]
pub struct Content {
    pub posts: Vec<Post>,
    pub standalones: Vec<Standalone>,
}

/// Loads content from the posts directory
pub struct ContentLoader<'a> {
    site: &'a Mksite,
    renderer: MarkdownRenderer,
    now: NaiveDateTime,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader; undated posts get the current time
    pub fn new(site: &'a Mksite) -> Self {
        Self {
            site,
            renderer: MarkdownRenderer::new(),
            now: Local::now().naive_local(),
        }
    }

    /// Pin the timestamp given to undated posts
    pub fn with_now(mut self, now: NaiveDateTime) -> Self {
        self.now = now;
        self
    }

    /// Load every markdown file under the posts directory, in file-name order.
    /// The first file that fails to parse aborts the load.
    pub fn load(&self) -> Result<Content> {
        let mut content = Content::default();

        for entry in WalkDir::new(&self.site.posts_dir)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry?;
            let path = entry.path();
            if entry.file_type().is_file() && is_markdown_file(path) {
                self.load_file(path, &mut content)?;
            }
        }

        Ok(content)
    }

    fn load_file(&self, path: &Path, content: &mut Content) -> Result<()> {
        let raw = fs::read_to_string(path).map_err(|source| Error::ReadSource {
            path: path.to_path_buf(),
            source,
        })?;
        let (fm, body) = FrontMatter::parse(&raw, path)?;

        let slug = derive_slug(&fm, path);
        let html = self.renderer.render(body);

        if fm.standalone {
            tracing::info!("{} is a standalone page", path.display());
            content.standalones.push(Standalone {
                title: fm.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
                slug,
                template: fm
                    .template
                    .unwrap_or_else(|| DEFAULT_PAGE_TEMPLATE.to_string()),
                content: html,
                source: path.to_path_buf(),
            });
            return Ok(());
        }

        let date = match fm.date.as_deref() {
            Some(value) => parse_date(value).ok_or_else(|| Error::InvalidDate {
                path: path.to_path_buf(),
                value: value.to_string(),
            })?,
            None => match self.site.options.date_fallback {
                DateFallback::Now => self.now,
                DateFallback::Require => return Err(Error::MissingDate(path.to_path_buf())),
            },
        };

        tracing::debug!("Loaded post {} ({})", path.display(), date);
        content.posts.push(Post {
            title: fm.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            link: Post::link_for(&slug),
            slug,
            author: fm
                .author
                .unwrap_or_else(|| self.site.config.author().to_string()),
            meta: PostMeta {
                category: fm.category.unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
                date,
            },
            content: html,
            source: path.to_path_buf(),
        });

        Ok(())
    }
}

/// Explicit slug, else title, else the file name.
/// A page with neither slug nor title is named after its file, never a
/// shared placeholder such as `none`.
fn derive_slug(fm: &FrontMatter, path: &Path) -> String {
    let candidate = fm
        .slug
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .or(fm.title.as_deref());

    if let Some(slug) = candidate.map(slugify).filter(|s| !s.is_empty()) {
        return slug;
    }

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .map(slugify)
        .unwrap_or_default();
    if stem.is_empty() {
        DEFAULT_TITLE.to_lowercase()
    } else {
        stem
    }
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}
