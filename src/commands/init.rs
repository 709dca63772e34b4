//! Create a new config and scaffold the site directories

use std::fs;
use std::path::Path;

use crate::config::Config;
use crate::error::{Error, Result};

/// Directories every site needs, created next to the config
pub const SCAFFOLD_DIRS: [&str; 3] = ["posts", "templates", "static"];

const POST_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>{{ post.title }} - {{ site.site_title }}</title>
</head>
<body>
  <p><a href="{{ root }}">{{ site.site_title }}</a></p>
  <article>
    <h1>{{ post.title }}</h1>
    <p>{{ post.author }} &middot; {{ post.meta.date | date(format="%Y-%m-%d") }} &middot; {{ post.meta.category }}</p>
    {{ post.content }}
  </article>
</body>
</html>
"#;

const INDEX_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>{{ site.site_title }}</title>
</head>
<body>
  <h1>{{ site.site_title }}</h1>
  <ul>
  {% for post in posts %}
    <li>{{ post.meta.date | date(format="%Y-%m-%d") }} <a href="{{ root }}{{ post.link }}">{{ post.title }}</a></li>
  {% endfor %}
  </ul>
</body>
</html>
"#;

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>{{ post.title }} - {{ site.site_title }}</title>
</head>
<body>
  <p><a href="{{ root }}">{{ site.site_title }}</a></p>
  {{ post.content }}
</body>
</html>
"#;

/// Write a default config to `config_path` and create the site directories
/// under `base_dir`. Starter templates are added where none exist yet.
pub fn create_config(config_path: &Path, base_dir: &Path) -> Result<()> {
    if config_path.exists() {
        return Err(Error::ConfigExists(config_path.to_path_buf()));
    }

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }
    Config::default().write(config_path)?;
    tracing::info!("Created config {:?}", config_path);

    for dir in SCAFFOLD_DIRS {
        let path = base_dir.join(dir);
        if !path.exists() {
            fs::create_dir_all(&path)?;
            tracing::info!("Created directory {:?}", path);
        }
    }

    let templates_dir = base_dir.join("templates");
    for (name, body) in [
        ("post.html", POST_TEMPLATE),
        ("index.html", INDEX_TEMPLATE),
        ("page.html", PAGE_TEMPLATE),
    ] {
        let path = templates_dir.join(name);
        if !path.exists() {
            fs::write(&path, body)?;
            tracing::debug!("Wrote starter template {:?}", path);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigMode;
    use crate::{BuildOptions, Mksite};
    use tempfile::TempDir;

    #[test]
    fn test_create_in_empty_directory() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.ini");

        create_config(&config_path, dir.path()).unwrap();

        let text = fs::read_to_string(&config_path).unwrap();
        assert!(text.contains("[settings]"));
        assert!(text.contains("[site]"));
        assert!(text.contains("site_title=My Site"));
        for d in SCAFFOLD_DIRS {
            assert!(dir.path().join(d).is_dir(), "{}", d);
        }
        assert_eq!(
            Config::load(&config_path, ConfigMode::Strict).unwrap(),
            Config::default()
        );
    }

    #[test]
    fn test_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.ini");
        fs::write(&config_path, "[site]\nsite_title = Mine\n").unwrap();

        let err = create_config(&config_path, dir.path()).unwrap_err();
        assert!(matches!(err, Error::ConfigExists(_)));
        assert_eq!(
            fs::read_to_string(&config_path).unwrap(),
            "[site]\nsite_title = Mine\n"
        );
    }

    #[test]
    fn test_keeps_existing_templates() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("templates")).unwrap();
        fs::write(dir.path().join("templates/post.html"), "mine").unwrap();

        create_config(&dir.path().join("config.ini"), dir.path()).unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("templates/post.html")).unwrap(),
            "mine"
        );
        assert!(dir.path().join("templates/index.html").is_file());
    }

    #[test]
    fn test_scaffold_builds() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.ini");
        create_config(&config_path, dir.path()).unwrap();
        fs::write(
            dir.path().join("posts/hello.md"),
            "---\ntitle: Hello World\ndate: 2021-06-01\n---\n# Hi\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("posts/about.md"),
            "---\ntitle: About\nstandalone: true\n---\nHello.\n",
        )
        .unwrap();

        let site = Mksite::load(dir.path(), "config.ini", BuildOptions::default()).unwrap();
        site.generate().unwrap();

        let index = fs::read_to_string(dir.path().join("output/index.html")).unwrap();
        assert!(index.contains("2021-06-01 <a href=\"/posts/hello-world.html\">Hello World</a>"));
        assert!(dir.path().join("output/about.html").is_file());
        assert!(dir.path().join("output/static").is_dir());
    }
}
