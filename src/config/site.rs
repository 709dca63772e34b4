//! Site configuration (config.ini)

use indexmap::IndexMap;
use ini::{EscapePolicy, Ini, ParseOption};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::Path;

use crate::error::{Error, Result};

/// Fallback author when the site map does not name one
const ANONYMOUS: &str = "Anonymous";

/// How forgiving the loader is about a missing or incomplete config file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigMode {
    /// Missing file or sections fall back to defaults, with a warning
    #[default]
    Lenient,
    /// Missing file, missing `[settings]` or unknown settings keys are errors
    Strict,
}

/// The `[settings]` section: where things live
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub posts: String,
    pub templates: String,
    pub output: String,
    #[serde(rename = "static")]
    pub static_dir: String,
    pub site_root: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            posts: "posts".to_string(),
            templates: "templates".to_string(),
            output: "output".to_string(),
            static_dir: "static".to_string(),
            site_root: "/".to_string(),
        }
    }
}

impl Settings {
    /// Override one key. Returns false if the key is not a known setting.
    fn set(&mut self, key: &str, value: &str) -> bool {
        let slot = match key {
            "posts" => &mut self.posts,
            "templates" => &mut self.templates,
            "output" => &mut self.output,
            "static" => &mut self.static_dir,
            "site_root" => &mut self.site_root,
            _ => return false,
        };
        *slot = value.to_string();
        true
    }

    fn entries(&self) -> [(&'static str, &str); 5] {
        [
            ("posts", &self.posts),
            ("templates", &self.templates),
            ("output", &self.output),
            ("static", &self.static_dir),
            ("site_root", &self.site_root),
        ]
    }
}

/// Immutable configuration for one run: built-in defaults merged with the file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    pub settings: Settings,
    /// Free-form site metadata handed to every template as `site`
    pub site: IndexMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        let mut site = IndexMap::new();
        site.insert("site_title".to_string(), "My Site".to_string());
        site.insert("site_author".to_string(), "John Smith".to_string());
        site.insert("site_email".to_string(), "jsmith@example.com".to_string());

        Self {
            settings: Settings::default(),
            site,
        }
    }
}

impl Config {
    /// Load configuration from an INI file
    pub fn load<P: AsRef<Path>>(path: P, mode: ConfigMode) -> Result<Self> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(content) => Self::parse(&content, path, mode),
            Err(e) if e.kind() == io::ErrorKind::NotFound => match mode {
                ConfigMode::Strict => Err(Error::ConfigNotFound(path.to_path_buf())),
                ConfigMode::Lenient => {
                    tracing::warn!("Config file {:?} not found, using defaults", path);
                    Ok(Self::default())
                }
            },
            Err(e) => Err(e.into()),
        }
    }

    /// Parse INI text. `path` is only used in messages.
    pub fn parse(content: &str, path: &Path, mode: ConfigMode) -> Result<Self> {
        // Values are taken literally: no backslash escapes, quotes kept
        let options = ParseOption {
            enabled_quote: false,
            enabled_escape: false,
            ..Default::default()
        };
        let ini = Ini::load_from_str_opt(content, options).map_err(|e| Error::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let mut config = Self::default();

        match ini.section(Some("settings")) {
            Some(section) => {
                for (key, value) in section.iter() {
                    let key = key.to_lowercase();
                    if !config.settings.set(&key, value) {
                        if mode == ConfigMode::Strict {
                            return Err(Error::UnknownSetting {
                                path: path.to_path_buf(),
                                key,
                            });
                        }
                        tracing::warn!("Ignoring unknown setting `{}` in {:?}", key, path);
                    }
                }
            }
            None if mode == ConfigMode::Strict => {
                return Err(Error::MissingSection {
                    path: path.to_path_buf(),
                    section: "settings".to_string(),
                });
            }
            None => {
                tracing::warn!("No [settings] section in {:?}, using defaults", path);
            }
        }

        match ini.section(Some("site")) {
            Some(section) => {
                for (key, value) in section.iter() {
                    config.site.insert(key.to_lowercase(), value.to_string());
                }
            }
            None => {
                tracing::warn!("No [site] section in {:?}, using defaults", path);
            }
        }

        Ok(config)
    }

    /// Render this configuration as an INI document
    pub fn to_ini(&self) -> Ini {
        let mut ini = Ini::new();
        for (key, value) in self.settings.entries() {
            ini.with_section(Some("settings")).set(key, value);
        }
        for (key, value) in &self.site {
            ini.with_section(Some("site")).set(key.as_str(), value.as_str());
        }
        ini
    }

    /// Write this configuration to a file
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.to_ini()
            .write_to_file_policy(path.as_ref(), EscapePolicy::Nothing)?;
        Ok(())
    }

    /// Default author for posts that do not name one
    pub fn author(&self) -> &str {
        self.site
            .get("site_author")
            .map(String::as_str)
            .unwrap_or(ANONYMOUS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.settings.posts, "posts");
        assert_eq!(config.settings.static_dir, "static");
        assert_eq!(config.settings.site_root, "/");
        assert_eq!(config.site["site_title"], "My Site");
        assert_eq!(config.author(), "John Smith");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let ini = r#"
[settings]
posts = content
Output: public

[site]
site_title = My Blog
Twitter = @me
"#;
        let config = Config::parse(ini, Path::new("config.ini"), ConfigMode::Lenient).unwrap();
        assert_eq!(config.settings.posts, "content");
        assert_eq!(config.settings.output, "public");
        assert_eq!(config.settings.templates, "templates");
        assert_eq!(config.site["site_title"], "My Blog");
        assert_eq!(config.site["site_author"], "John Smith");
        assert_eq!(config.site["twitter"], "@me");
    }

    #[test]
    fn test_lenient_missing_sections() {
        let config = Config::parse("", Path::new("config.ini"), ConfigMode::Lenient).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_strict_missing_settings_section() {
        let err = Config::parse("[site]\nsite_title = x\n", Path::new("c.ini"), ConfigMode::Strict)
            .unwrap_err();
        assert!(matches!(err, Error::MissingSection { ref section, .. } if section == "settings"));
    }

    #[test]
    fn test_strict_unknown_setting() {
        let err = Config::parse("[settings]\npots = posts\n", Path::new("c.ini"), ConfigMode::Strict)
            .unwrap_err();
        assert!(matches!(err, Error::UnknownSetting { ref key, .. } if key == "pots"));

        let config =
            Config::parse("[settings]\npots = posts\n", Path::new("c.ini"), ConfigMode::Lenient)
                .unwrap();
        assert_eq!(config.settings.posts, "posts");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.ini");

        let config = Config::load(&path, ConfigMode::Lenient).unwrap();
        assert_eq!(config, Config::default());

        let err = Config::load(&path, ConfigMode::Strict).unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound(_)));
    }

    #[test]
    fn test_malformed_config() {
        let err = Config::parse("[settings\nposts = x\n", Path::new("c.ini"), ConfigMode::Lenient)
            .unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }));
    }

    #[test]
    fn test_written_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        Config::default().write(&path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("[settings]"));
        assert!(text.contains("[site]"));

        let config = Config::load(&path, ConfigMode::Strict).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_values_are_literal() {
        let ini = "[settings]\nposts = C:\\site\\posts\n\n[site]\nsite_email = \"a@b.c\"\nsite_author = Dom\\Ada\n";
        let config = Config::parse(ini, Path::new("c.ini"), ConfigMode::Strict).unwrap();
        assert_eq!(config.settings.posts, r"C:\site\posts");
        assert_eq!(config.site["site_email"], "\"a@b.c\"");
        assert_eq!(config.site["site_author"], r"Dom\Ada");
    }

    #[test]
    fn test_literal_values_survive_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        let mut config = Config::default();
        config.settings.output = r"D:\www\out".to_string();
        config
            .site
            .insert("site_author".to_string(), r#"Dom\Ada "the dev""#.to_string());
        config.write(&path).unwrap();

        let loaded = Config::load(&path, ConfigMode::Strict).unwrap();
        assert_eq!(loaded, config);
    }
}
