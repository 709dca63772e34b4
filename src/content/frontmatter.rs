//! Front-matter parsing

use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::path::Path;

use crate::error::{Error, Result};

/// Accepts any scalar (string, number, boolean) and keeps it as text
fn scalar_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct ScalarString;

    impl<'de> Visitor<'de> for ScalarString {
        type Value = Option<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string, number or boolean")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> std::result::Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_string<E: de::Error>(self, value: String) -> std::result::Result<Self::Value, E> {
            Ok(Some(value))
        }

        fn visit_bool<E: de::Error>(self, value: bool) -> std::result::Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> std::result::Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> std::result::Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> std::result::Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_none<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D>(self, deserializer: D) -> std::result::Result<Self::Value, D::Error>
        where
            D: Deserializer<'de>,
        {
            deserializer.deserialize_any(ScalarString)
        }
    }

    deserializer.deserialize_any(ScalarString)
}

/// Loose truthiness: zero, empty and null are false, as are the YAML 1.1
/// spellings of false (`no`, `off`, `n`)
fn truthy<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    struct Truthy;

    impl<'de> Visitor<'de> for Truthy {
        type Value = bool;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("any value")
        }

        fn visit_bool<E: de::Error>(self, value: bool) -> std::result::Result<bool, E> {
            Ok(value)
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> std::result::Result<bool, E> {
            Ok(value != 0)
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> std::result::Result<bool, E> {
            Ok(value != 0)
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> std::result::Result<bool, E> {
            Ok(value != 0.0)
        }

        fn visit_str<E: de::Error>(self, value: &str) -> std::result::Result<bool, E> {
            let value = value.trim();
            Ok(!(value.is_empty()
                || ["false", "no", "off", "n"]
                    .iter()
                    .any(|f| value.eq_ignore_ascii_case(f))))
        }

        fn visit_none<E: de::Error>(self) -> std::result::Result<bool, E> {
            Ok(false)
        }

        fn visit_unit<E: de::Error>(self) -> std::result::Result<bool, E> {
            Ok(false)
        }

        fn visit_some<D>(self, deserializer: D) -> std::result::Result<bool, D::Error>
        where
            D: Deserializer<'de>,
        {
            deserializer.deserialize_any(Truthy)
        }

        fn visit_seq<S>(self, mut seq: S) -> std::result::Result<bool, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut len = 0;
            while seq.next_element::<IgnoredAny>()?.is_some() {
                len += 1;
            }
            Ok(len > 0)
        }

        fn visit_map<M>(self, mut map: M) -> std::result::Result<bool, M::Error>
        where
            M: MapAccess<'de>,
        {
            let mut len = 0;
            while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {
                len += 1;
            }
            Ok(len > 0)
        }
    }

    deserializer.deserialize_any(Truthy)
}

/// Front-matter data from a post or standalone page
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    #[serde(deserialize_with = "truthy")]
    pub standalone: bool,
    #[serde(deserialize_with = "scalar_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub slug: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub template: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub author: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub category: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub date: Option<String>,
}

impl FrontMatter {
    /// Parse front-matter from a file's content.
    /// Returns (front_matter, body); `path` only appears in errors.
    pub fn parse<'a>(content: &'a str, path: &Path) -> Result<(Self, &'a str)> {
        let content = content.trim_start_matches('\u{feff}');
        let invalid = |message: String| Error::FrontMatter {
            path: path.to_path_buf(),
            message,
        };

        if let Some((block, body)) = split_fenced(content, "---") {
            if block.trim().is_empty() {
                return Ok((FrontMatter::default(), body));
            }
            let fm = serde_yaml::from_str(block).map_err(|e| invalid(e.to_string()))?;
            return Ok((fm, body));
        }

        if let Some((block, body)) = split_fenced(content, "+++") {
            if block.trim().is_empty() {
                return Ok((FrontMatter::default(), body));
            }
            let table = block
                .parse::<toml::Table>()
                .map_err(|e| invalid(e.to_string()))?;
            let value = toml_to_json(toml::Value::Table(table));
            let fm = serde_json::from_value(value).map_err(|e| invalid(e.to_string()))?;
            return Ok((fm, body));
        }

        if content.trim_start().starts_with('{') {
            return Self::parse_json(content.trim_start()).map_err(invalid);
        }

        // No front-matter found
        Ok((FrontMatter::default(), content))
    }

    fn parse_json(content: &str) -> std::result::Result<(Self, &str), String> {
        let mut stream = serde_json::Deserializer::from_str(content).into_iter::<FrontMatter>();
        match stream.next() {
            Some(Ok(fm)) => {
                let remaining = content[stream.byte_offset()..].trim_start_matches(['\n', '\r']);
                Ok((fm, remaining))
            }
            Some(Err(e)) => Err(format!("Failed to parse JSON front-matter: {}", e)),
            None => Ok((FrontMatter::default(), content)),
        }
    }
}

/// Split `fence\n block \nfence\n body`. Without a closing fence the file
/// has no front-matter at all.
fn split_fenced<'a>(content: &'a str, fence: &str) -> Option<(&'a str, &'a str)> {
    let (first, rest) = match content.find('\n') {
        Some(i) => (&content[..i], &content[i + 1..]),
        None => return None,
    };
    if first.trim_end() != fence {
        return None;
    }

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == fence {
            let block = &rest[..offset];
            let body = rest[offset + line.len()..].trim_start_matches(['\n', '\r']);
            return Some((block, body));
        }
        offset += line.len();
    }
    None
}

/// TOML dates have no JSON counterpart; they travel as strings
fn toml_to_json(value: toml::Value) -> serde_json::Value {
    use serde_json::Value as Json;

    match value {
        toml::Value::String(s) => Json::String(s),
        toml::Value::Integer(i) => Json::from(i),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Json::Number)
            .unwrap_or(Json::Null),
        toml::Value::Boolean(b) => Json::Bool(b),
        toml::Value::Datetime(dt) => Json::String(dt.to_string()),
        toml::Value::Array(items) => Json::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Json::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> (FrontMatter, &str) {
        FrontMatter::parse(content, Path::new("test.md")).unwrap()
    }

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
title: Hello World
date: 2024-01-15 10:30:00
category: programming
author: Ada
---

This is the content.
"#;

        let (fm, body) = parse(content);
        assert_eq!(fm.title.as_deref(), Some("Hello World"));
        assert_eq!(fm.date.as_deref(), Some("2024-01-15 10:30:00"));
        assert_eq!(fm.category.as_deref(), Some("programming"));
        assert_eq!(fm.author.as_deref(), Some("Ada"));
        assert!(!fm.standalone);
        assert_eq!(body, "This is the content.\n");
    }

    #[test]
    fn test_parse_toml_frontmatter() {
        let content = r#"+++
title = "About"
standalone = true
template = "about.html"
date = 2021-06-01
+++
Body.
"#;

        let (fm, body) = parse(content);
        assert_eq!(fm.title.as_deref(), Some("About"));
        assert!(fm.standalone);
        assert_eq!(fm.template.as_deref(), Some("about.html"));
        assert_eq!(fm.date.as_deref(), Some("2021-06-01"));
        assert_eq!(body, "Body.\n");
    }

    #[test]
    fn test_parse_json_frontmatter() {
        let content = r#"{"title": "Test {Post}", "slug": "custom"}

This is content.
"#;

        let (fm, body) = parse(content);
        assert_eq!(fm.title.as_deref(), Some("Test {Post}"));
        assert_eq!(fm.slug.as_deref(), Some("custom"));
        assert!(body.starts_with("This is content."));
    }

    #[test]
    fn test_no_frontmatter() {
        let (fm, body) = parse("# Just markdown\n");
        assert!(fm.title.is_none());
        assert_eq!(body, "# Just markdown\n");
    }

    #[test]
    fn test_unterminated_fence_is_body() {
        let content = "---\ntitle: x\nno closing fence\n";
        let (fm, body) = parse(content);
        assert!(fm.title.is_none());
        assert_eq!(body, content);
    }

    #[test]
    fn test_empty_block() {
        let (fm, body) = parse("---\n---\nHi\n");
        assert!(fm.title.is_none());
        assert_eq!(body, "Hi\n");
    }

    #[test]
    fn test_scalar_values_become_text() {
        let (fm, _) = parse("---\ntitle: 2021\nslug: 3.5\ncategory: true\n---\n");
        assert_eq!(fm.title.as_deref(), Some("2021"));
        assert_eq!(fm.slug.as_deref(), Some("3.5"));
        assert_eq!(fm.category.as_deref(), Some("true"));
    }

    #[test]
    fn test_standalone_truthiness() {
        let cases = [
            ("standalone: true", true),
            ("standalone: false", false),
            ("standalone: 1", true),
            ("standalone: 0", false),
            ("standalone: yes", true),
            ("standalone: no", false),
            ("standalone: \"\"", false),
            ("standalone: page", true),
            ("standalone:", false),
            ("standalone: [a]", true),
            ("standalone: []", false),
            ("title: x", false),
        ];
        for (line, expected) in cases {
            let content = format!("---\n{}\n---\nbody\n", line);
            let (fm, _) = FrontMatter::parse(&content, Path::new("t.md")).unwrap();
            assert_eq!(fm.standalone, expected, "{}", line);
        }
    }

    #[test]
    fn test_malformed_yaml_is_an_error() {
        let err = FrontMatter::parse("---\ntitle: [unclosed\n---\nbody\n", Path::new("bad.md"))
            .unwrap_err();
        assert!(matches!(err, Error::FrontMatter { ref path, .. } if path == Path::new("bad.md")));
    }

    #[test]
    fn test_non_mapping_yaml_is_an_error() {
        assert!(FrontMatter::parse("---\n- a\n- b\n---\nbody\n", Path::new("t.md")).is_err());
    }
}
