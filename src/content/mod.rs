//! Content module - handles posts, standalone pages, and content processing

mod date;
mod frontmatter;
pub mod loader;
mod markdown;
mod post;

pub use date::parse_date;
pub use frontmatter::FrontMatter;
pub use loader::{Content, ContentLoader, DateFallback};
pub use markdown::MarkdownRenderer;
pub use post::{slugify, Post, PostMeta, Standalone, POSTS_DIR};
