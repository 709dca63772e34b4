//! Post and standalone page models

use chrono::NaiveDateTime;
use serde::Serialize;
use std::path::PathBuf;

/// Directory (under the output root) that holds rendered posts
pub const POSTS_DIR: &str = "posts";

/// Turn a title into a URL-safe slug: lower-case, punctuation stripped,
/// whitespace hyphenated. Slugifying a slug returns it unchanged.
pub fn slugify(s: &str) -> String {
    slug::slugify(s)
}

/// A dated blog post, listed on the index
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    /// Post title
    pub title: String,

    /// Slug (URL-friendly name)
    pub slug: String,

    /// Post author
    pub author: String,

    pub meta: PostMeta,

    /// Rendered HTML content
    pub content: String,

    /// Output path relative to the site root, e.g. `posts/hello-world.html`
    pub link: String,

    /// Source markdown file
    #[serde(skip)]
    pub source: PathBuf,
}

/// Sortable/groupable post metadata
#[derive(Debug, Clone, Serialize)]
pub struct PostMeta {
    pub category: String,
    pub date: NaiveDateTime,
}

impl Post {
    /// Link for a post slug
    pub fn link_for(slug: &str) -> String {
        format!("{}/{}.html", POSTS_DIR, slug)
    }
}

/// A page rendered on its own, outside the post list
#[derive(Debug, Clone, Serialize)]
pub struct Standalone {
    pub title: String,
    pub slug: String,
    /// Template used to render this page
    pub template: String,
    pub content: String,
    #[serde(skip)]
    pub source: PathBuf,
}
