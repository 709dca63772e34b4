//! Directory-backed Jinja-style templates (Tera)
//!
//! Every template file under the templates directory is loaded and named by
//! its path relative to that directory, so `templates/partials/nav.html` is
//! `partials/nav.html` to `{% include %}` and `{% extends %}`. Hidden files
//! and files without a template extension are left alone.

use std::path::Path;
use tera::{Context, Tera};
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::Result;

const TEMPLATE_EXTENSIONS: &[&str] = &["html", "htm", "xml", "txt", "j2", "jinja"];

fn is_template_file(rel: &Path) -> bool {
    let hidden = rel
        .components()
        .any(|c| c.as_os_str().to_string_lossy().starts_with('.'));
    let known_ext = rel
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| TEMPLATE_EXTENSIONS.iter().any(|t| ext.eq_ignore_ascii_case(t)))
        .unwrap_or(false);
    !hidden && known_ext
}

/// Template renderer over a templates directory
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Load every template under `dir`
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let mut files = Vec::new();

        for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let rel = entry.path().strip_prefix(dir).unwrap_or(entry.path());
            if !is_template_file(rel) {
                tracing::debug!("Skipping non-template file {:?}", entry.path());
                continue;
            }
            let name = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            files.push((entry.path().to_path_buf(), Some(name)));
        }

        let mut tera = Tera::default();

        // Rendered markdown is already HTML; nothing gets escaped
        tera.autoescape_on(vec![]);

        tera.add_template_files(files)?;

        tracing::debug!(
            "Loaded {} templates from {:?}",
            tera.get_template_names().count(),
            dir
        );

        Ok(Self { tera })
    }

    /// Whether a template with this name was loaded
    pub fn has_template(&self, name: &str) -> bool {
        self.tera.get_template_names().any(|n| n == name)
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Context shared by every page: `site` metadata and the `root` URL prefix
pub fn base_context(config: &Config) -> Context {
    let mut context = Context::new();
    context.insert("site", &config.site);
    context.insert("root", &config.settings.site_root);
    context
}
