//! Frontmatter parsing for post documents.

use std::{collections::HashMap, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Frontmatter metadata for post documents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Frontmatter {
    /// Post title.
    #[serde(default)]
    pub title: String,

    /// Category label shown on cards.
    #[serde(default, alias = "cat")]
    pub category: String,

    /// Publish date as authored (ISO-8601 text).
    #[serde(
        default,
        rename = "publishDate",
        alias = "publish_date",
        alias = "date"
    )]
    pub publish_date: Option<String>,

    /// Explicit slug; derived from the file path when absent.
    #[serde(default)]
    pub slug: Option<String>,

    /// Description for feeds and meta tags.
    #[serde(default)]
    pub description: Option<String>,

    /// Whether this is a draft.
    #[serde(default)]
    pub draft: bool,

    /// Custom extra fields (for extensibility).
    #[serde(default, flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

/// Delimiter types for frontmatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontmatterFormat {
    /// YAML frontmatter delimited by `---`.
    Yaml,
    /// TOML frontmatter delimited by `+++`.
    Toml,
}

impl FrontmatterFormat {
    /// Get the delimiter string for this format.
    pub fn delimiter(&self) -> &'static str {
        match self {
            Self::Yaml => "---",
            Self::Toml => "+++",
        }
    }
}

/// Split content into frontmatter and body.
pub fn split_frontmatter(content: &str) -> Option<(FrontmatterFormat, &str, &str)> {
    let content = content.trim_start();

    let format = if content.starts_with("---") {
        FrontmatterFormat::Yaml
    } else if content.starts_with("+++") {
        FrontmatterFormat::Toml
    } else {
        return None;
    };

    let delimiter = format.delimiter();

    let after_first = &content[delimiter.len()..];
    let closing_pos = after_first.find(delimiter)?;

    let frontmatter = after_first[..closing_pos].trim();
    let body = after_first[closing_pos + delimiter.len()..].trim_start();

    Some((format, frontmatter, body))
}

/// Parse frontmatter from a string.
pub fn parse_frontmatter(content: &str, path: &Path) -> Result<(Frontmatter, String)> {
    let Some((format, fm_str, body)) = split_frontmatter(content) else {
        return Ok((Frontmatter::default(), content.to_string()));
    };

    let frontmatter: Frontmatter = match format {
        FrontmatterFormat::Yaml => {
            serde_yaml::from_str(fm_str).map_err(|e| CoreError::frontmatter(path, e.to_string()))?
        }
        FrontmatterFormat::Toml => parse_toml(fm_str, path)?,
    };

    Ok((frontmatter, body.to_string()))
}

/// TOML dates are native values; keep them as the text the author wrote.
fn parse_toml(fm_str: &str, path: &Path) -> Result<Frontmatter> {
    let mut table: toml::Table =
        toml::from_str(fm_str).map_err(|e| CoreError::frontmatter(path, e.to_string()))?;

    for (_, value) in table.iter_mut() {
        if let toml::Value::Datetime(dt) = value {
            *value = toml::Value::String(dt.to_string());
        }
    }

    toml::Value::Table(table)
        .try_into()
        .map_err(|e: toml::de::Error| CoreError::frontmatter(path, e.to_string()))
}

impl Frontmatter {
    /// Validate required fields.
    pub fn validate(&self, path: &Path) -> Result<()> {
        if self.title.is_empty() {
            return Err(CoreError::frontmatter(path, "title is required"));
        }
        if let Some(slug) = self.slug.as_deref() {
            if slug.is_empty() {
                return Err(CoreError::frontmatter(path, "slug cannot be empty"));
            }
            if !is_safe_slug(slug) {
                return Err(CoreError::frontmatter(
                    path,
                    format!("slug `{slug}` must be a relative path without `..` or backslashes"),
                ));
            }
        }
        Ok(())
    }
}

/// A slug becomes a path under the output directory, so it must stay inside it.
fn is_safe_slug(slug: &str) -> bool {
    !slug.starts_with('/')
        && !slug.contains('\\')
        && slug.split('/').all(|segment| !segment.is_empty() && segment != "." && segment != "..")
}
