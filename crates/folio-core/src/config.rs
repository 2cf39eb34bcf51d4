//! Site configuration management.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    date::DateLocale,
    error::{CoreError, Result},
    images::ImagePolicy,
};

/// Main configuration structure for Folio.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Site-wide settings.
    pub site: SiteConfig,

    /// Build settings.
    #[serde(default)]
    pub build: BuildConfig,

    /// Content source locations.
    #[serde(default)]
    pub content: ContentConfig,

    /// Trusted external image hosts.
    #[serde(default)]
    pub images: ImagePolicy,

    /// RSS feed settings.
    #[serde(default)]
    pub rss: RssConfig,
}

/// Site-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site title.
    pub title: String,

    /// Base URL for the site (e.g., "https://example.com").
    pub base_url: String,

    /// Site description for meta tags and the feed.
    #[serde(default)]
    pub description: Option<String>,

    /// Site author name.
    #[serde(default)]
    pub author: Option<String>,

    /// Locale used to render publish dates.
    #[serde(default)]
    pub locale: DateLocale,
}

/// Build configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Output directory for generated site.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Syntax highlighting theme name.
    #[serde(default = "default_syntax_theme")]
    pub syntax_theme: String,

    /// Whether to generate drafts.
    #[serde(default)]
    pub drafts: bool,

    /// Fail the document instead of dropping unknown component tags.
    #[serde(default)]
    pub strict_components: bool,
}

/// Content source locations, relative to the site root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Root content directory.
    #[serde(default = "default_content_dir")]
    pub dir: String,

    /// Posts directory inside `dir`.
    #[serde(default = "default_posts_dir")]
    pub posts_dir: String,

    /// Static assets copied verbatim to the output (covers live in `head/`).
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

/// RSS feed configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RssConfig {
    /// Whether RSS feed is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Maximum number of items in feed.
    #[serde(default = "default_rss_limit")]
    pub limit: usize,
}

fn default_output_dir() -> String {
    "public".to_string()
}

fn default_syntax_theme() -> String {
    "base16-ocean.dark".to_string()
}

fn default_content_dir() -> String {
    "content".to_string()
}

fn default_posts_dir() -> String {
    "posts".to_string()
}

fn default_static_dir() -> String {
    "static".to_string()
}

fn default_true() -> bool {
    true
}

fn default_rss_limit() -> usize {
    20
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            syntax_theme: default_syntax_theme(),
            drafts: false,
            strict_components: false,
        }
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            dir: default_content_dir(),
            posts_dir: default_posts_dir(),
            static_dir: default_static_dir(),
        }
    }
}

impl Default for RssConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            limit: default_rss_limit(),
        }
    }
}

impl Config {
    /// Create a configuration with defaults for everything but the site
    /// identity.
    pub fn new(title: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            site: SiteConfig {
                title: title.into(),
                base_url: base_url.into(),
                description: None,
                author: None,
                locale: DateLocale::default(),
            },
            build: BuildConfig::default(),
            content: ContentConfig::default(),
            images: ImagePolicy::default(),
            rss: RssConfig::default(),
        }
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration layered with `FOLIO__SECTION__KEY` environment
    /// overrides.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(config::Environment::with_prefix("FOLIO").separator("__"))
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.site.title.is_empty() {
            return Err(CoreError::config("site.title cannot be empty"));
        }

        if self.site.base_url.is_empty() {
            return Err(CoreError::config("site.base_url cannot be empty"));
        }

        if self.site.base_url.ends_with('/') {
            tracing::warn!("site.base_url should not have a trailing slash");
        }

        if self.rss.enabled && self.rss.limit == 0 {
            tracing::warn!("rss.limit is 0, the feed will be empty");
        }

        Ok(())
    }

    /// Get the full URL for a path.
    pub fn url_for(&self, path: &str) -> String {
        let base = self.site.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }

    /// Root content directory, resolved against `root`.
    pub fn content_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.content.dir)
    }

    /// Posts directory, resolved against `root`.
    pub fn posts_dir(&self, root: &Path) -> PathBuf {
        self.content_dir(root).join(&self.content.posts_dir)
    }

    /// Static asset directory, resolved against `root`.
    pub fn static_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.content.static_dir)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn create_test_config() -> String {
        r#"
[site]
title = "Whexy"
base_url = "https://example.com"
author = "Whexy"
locale = "zh-CN"

[build]
output_dir = "dist"
syntax_theme = "InspiredGitHub"
strict_components = true

[content]
dir = "src-content"

[images]
domains = ["img.example.com"]

[[images.remote_patterns]]
hostname = "**.example.org"

[rss]
limit = 15
"#
        .to_string()
    }

    #[test]
    fn test_load_config() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("folio.toml");
        let mut file = std::fs::File::create(&config_path).expect("create file");
        file.write_all(create_test_config().as_bytes())
            .expect("write");

        let config = Config::load(&config_path).expect("load config");

        assert_eq!(config.site.title, "Whexy");
        assert_eq!(config.site.base_url, "https://example.com");
        assert_eq!(config.site.locale, DateLocale::ZhCn);
        assert_eq!(config.build.output_dir, "dist");
        assert_eq!(config.build.syntax_theme, "InspiredGitHub");
        assert!(config.build.strict_components);
        assert_eq!(config.content.dir, "src-content");
        assert_eq!(config.content.posts_dir, "posts");
        assert_eq!(config.images.domains, vec!["img.example.com"]);
        assert!(config.images.is_allowed("https://a.example.org/x.png"));
        assert!(!config.images.is_allowed("https://i.scdn.co/x.png"));
        assert_eq!(config.rss.limit, 15);
    }

    #[test]
    fn test_config_defaults() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("folio.toml");
        let minimal_config = r#"
[site]
title = "Minimal Site"
base_url = "https://example.com"
"#;
        std::fs::write(&config_path, minimal_config).expect("write");

        let config = Config::load(&config_path).expect("load config");

        assert_eq!(config.site.locale, DateLocale::EnUs);
        assert_eq!(config.build.output_dir, "public");
        assert!(!config.build.drafts);
        assert!(!config.build.strict_components);
        assert_eq!(config.content.dir, "content");
        assert_eq!(config.content.static_dir, "static");
        assert_eq!(config.images, ImagePolicy::default());
        assert!(config.rss.enabled);
        assert_eq!(config.rss.limit, 20);
    }

    #[test]
    fn test_unknown_locale_rejected() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("folio.toml");
        let content = r#"
[site]
title = "Test"
base_url = "https://example.com"
locale = "tlh"
"#;
        std::fs::write(&config_path, content).expect("write");

        let err = Config::load(&config_path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_url_for() {
        let config = Config::new("Test", "https://example.com/");

        assert_eq!(
            config.url_for("/posts/hello"),
            "https://example.com/posts/hello"
        );
        assert_eq!(
            config.url_for("posts/hello"),
            "https://example.com/posts/hello"
        );
    }

    #[test]
    fn test_resolved_dirs() {
        let config = Config::new("Test", "https://example.com");
        let root = Path::new("/site");
        assert_eq!(config.posts_dir(root), PathBuf::from("/site/content/posts"));
        assert_eq!(config.static_dir(root), PathBuf::from("/site/static"));
    }

    #[test]
    fn test_config_validation_empty_title() {
        let config = Config::new("", "https://example.com");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("title cannot be empty"));
    }

    #[test]
    fn test_config_not_found() {
        let result = Config::load(Path::new("/nonexistent/folio.toml"));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not found"));
    }
}
