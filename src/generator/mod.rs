//! Generator module - runs one build from validation to static copy

use std::path::Path;
use tera::Context;

use crate::content::{ContentLoader, Post, Standalone};
use crate::error::{Error, Result};
use crate::output::{self, OutputWriter};
use crate::templates::{self, TemplateRenderer};
use crate::Mksite;

/// Templates that must exist before anything is rendered
pub const REQUIRED_TEMPLATES: [&str; 2] = ["post.html", "index.html"];

const POST_TEMPLATE: &str = "post.html";
const INDEX_TEMPLATE: &str = "index.html";

/// What a build produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub posts: usize,
    pub standalones: usize,
    pub static_files: usize,
}

/// Static site generator over one `Mksite`
pub struct Generator<'a> {
    site: &'a Mksite,
}

impl<'a> Generator<'a> {
    /// Create a new generator
    pub fn new(site: &'a Mksite) -> Self {
        Self { site }
    }

    /// Generate the entire site.
    ///
    /// Directories and required templates are checked before the output
    /// directory is touched. After that any failure leaves a partial site.
    pub fn generate(&self) -> Result<BuildSummary> {
        self.check_directories()?;
        let renderer = TemplateRenderer::load(&self.site.templates_dir)?;
        check_templates(&renderer)?;

        output::clear_dir(&self.site.output_dir)?;

        let content = ContentLoader::new(self.site).load()?;
        tracing::info!(
            "Loaded {} posts and {} standalone pages",
            content.posts.len(),
            content.standalones.len()
        );

        let writer = OutputWriter::new(&self.site.output_dir);
        writer.prepare()?;
        let base = templates::base_context(&self.site.config);

        self.render_posts(&renderer, &writer, &base, &content.posts)?;
        self.render_standalones(&renderer, &writer, &base, &content.standalones)?;

        let mut posts = content.posts;
        sort_posts(&mut posts);
        self.render_index(&renderer, &writer, &base, &posts)?;

        let static_files = writer.copy_static(&self.site.static_dir, &self.static_name())?;

        Ok(BuildSummary {
            posts: posts.len(),
            standalones: content.standalones.len(),
            static_files,
        })
    }

    fn check_directories(&self) -> Result<()> {
        for dir in [
            &self.site.posts_dir,
            &self.site.templates_dir,
            &self.site.static_dir,
        ] {
            if !dir.is_dir() {
                return Err(Error::MissingDirectory(dir.clone()));
            }
        }
        Ok(())
    }

    fn render_posts(
        &self,
        renderer: &TemplateRenderer,
        writer: &OutputWriter,
        base: &Context,
        posts: &[Post],
    ) -> Result<()> {
        for post in posts {
            let mut context = base.clone();
            context.insert("post", post);
            let html = renderer.render(POST_TEMPLATE, &context)?;
            writer.write_post(&post.slug, &html)?;
        }
        Ok(())
    }

    /// Each page names its own template; a missing one fails here, not upfront
    fn render_standalones(
        &self,
        renderer: &TemplateRenderer,
        writer: &OutputWriter,
        base: &Context,
        pages: &[Standalone],
    ) -> Result<()> {
        for page in pages {
            let mut context = base.clone();
            context.insert("post", page);
            let html = renderer.render(&page.template, &context).map_err(|e| {
                tracing::error!(
                    "Failed to render {} with template {}",
                    page.source.display(),
                    page.template
                );
                e
            })?;
            writer.write_standalone(&page.slug, &html)?;
        }
        Ok(())
    }

    fn render_index(
        &self,
        renderer: &TemplateRenderer,
        writer: &OutputWriter,
        base: &Context,
        posts: &[Post],
    ) -> Result<()> {
        let mut context = base.clone();
        context.insert("posts", posts);
        let html = renderer.render(INDEX_TEMPLATE, &context)?;
        writer.write_index(&html)?;
        Ok(())
    }

    /// Last component of the `static` setting
    fn static_name(&self) -> String {
        Path::new(&self.site.config.settings.static_dir)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("static")
            .to_string()
    }
}

fn check_templates(renderer: &TemplateRenderer) -> Result<()> {
    for name in REQUIRED_TEMPLATES {
        if !renderer.has_template(name) {
            return Err(Error::MissingTemplate(name.to_string()));
        }
    }
    Ok(())
}

/// Newest first; posts with equal dates keep their load order
pub fn sort_posts(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.meta.date.cmp(&a.meta.date));
}
