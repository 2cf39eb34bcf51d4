//! Post records and rendered content structures.

use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::{date, frontmatter::Frontmatter};

/// Route prefix for post detail pages.
pub const POSTS_ROUTE: &str = "/posts";

/// Directory (under the static root) holding one cover image per post.
pub const COVER_DIR: &str = "/head";

/// Type of content source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Plain Markdown (.md files). Raw HTML passes through untouched.
    Markdown,
    /// Markdown with component tags (.mdx files).
    Mdx,
}

impl ContentType {
    /// Determine content type from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "md" | "markdown" => Some(Self::Markdown),
            "mdx" => Some(Self::Mdx),
            _ => None,
        }
    }

    /// Determine content type from a path.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Get the file extension for this content type.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Mdx => "mdx",
        }
    }

    /// Whether component tags are expanded for this content type.
    pub fn expands_components(&self) -> bool {
        matches!(self, Self::Mdx)
    }
}

/// Derive a post slug from its source path.
///
/// - `posts/hello-world.mdx` → `hello-world`
/// - `posts/hello-world/index.mdx` → `hello-world`
pub fn slug_from_path(path: &Path) -> Option<String> {
    ContentType::from_path(path)?;
    let stem = path.file_stem()?.to_str()?;

    let slug = if stem == "index" {
        path.parent()?.file_name()?.to_str()?
    } else {
        stem
    };

    if slug.is_empty() {
        None
    } else {
        Some(slug.to_string())
    }
}

/// A blog post record as supplied by the content collector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Post title.
    pub title: String,

    /// Category label.
    pub category: String,

    /// Publish date, ISO-8601 text as authored.
    pub publish_date: String,

    /// Unique, URL-safe identifier used for routing and cover images.
    pub slug: String,

    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,

    /// Whether this is a draft.
    #[serde(default)]
    pub draft: bool,
}

impl Post {
    /// Create a post from its four core attributes.
    pub fn new(
        title: impl Into<String>,
        category: impl Into<String>,
        publish_date: impl Into<String>,
        slug: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            category: category.into(),
            publish_date: publish_date.into(),
            slug: slug.into(),
            description: None,
            draft: false,
        }
    }

    /// Build a post from frontmatter, falling back to `slug` when the
    /// frontmatter carries none.
    pub fn from_frontmatter(fm: &Frontmatter, slug: &str) -> Self {
        Self {
            title: fm.title.clone(),
            category: fm.category.clone(),
            publish_date: fm.publish_date.clone().unwrap_or_default(),
            slug: fm.slug.clone().unwrap_or_else(|| slug.to_string()),
            description: fm.description.clone(),
            draft: fm.draft,
        }
    }

    /// Link target of the post detail page.
    pub fn url(&self) -> String {
        format!("{POSTS_ROUTE}/{}", self.slug)
    }

    /// Cover image path, by convention `/head/{slug}.png`.
    pub fn cover_image(&self) -> String {
        format!("{COVER_DIR}/{}.png", self.slug)
    }

    /// Parse the stored publish date.
    pub fn parse_publish_date(&self) -> date::Result<DateTime<FixedOffset>> {
        date::parse_iso(&self.publish_date)
    }
}

/// Parsed content with metadata and rendered HTML.
#[derive(Debug, Clone)]
pub struct ParsedContent {
    /// Parsed frontmatter metadata.
    pub frontmatter: Frontmatter,

    /// Rendered HTML content.
    pub html: String,

    /// Raw source content (without frontmatter).
    pub raw: String,

    /// Table of contents extracted from headings.
    pub toc: Vec<TocEntry>,
}

/// Table of contents entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    /// Heading level (1-6).
    pub level: u8,

    /// Heading text.
    pub text: String,

    /// Anchor ID for linking.
    pub id: String,
}

/// A post together with its rendered body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    /// Post metadata.
    pub post: Post,

    /// Rendered HTML content.
    pub content: String,

    /// Summary/excerpt for feeds.
    #[serde(default)]
    pub summary: Option<String>,

    /// Reading time in minutes.
    pub reading_time: u32,

    /// Word count.
    pub word_count: u32,

    /// Table of contents.
    #[serde(default)]
    pub toc: Vec<TocEntry>,

    /// Source file path.
    #[serde(default)]
    pub source_path: Option<PathBuf>,
}

impl Article {
    /// Create an article from parsed content, using `default_slug` when the
    /// frontmatter has no explicit slug.
    pub fn from_parsed(content: ParsedContent, default_slug: &str, source: &Path) -> Self {
        let post = Post::from_frontmatter(&content.frontmatter, default_slug);

        let word_count = content.raw.split_whitespace().count() as u32;
        let reading_time = (word_count / 200).max(1);

        let summary = post.description.clone().or_else(|| {
            let plain_text = strip_html(&content.html);
            let plain_text = plain_text.trim();
            (!plain_text.is_empty()).then(|| truncate_at_word_boundary(plain_text, 160))
        });

        Self {
            post,
            content: content.html,
            summary,
            reading_time,
            word_count,
            toc: content.toc,
            source_path: Some(source.to_path_buf()),
        }
    }
}

/// Strip HTML tags from content.
fn strip_html(html: &str) -> String {
    let mut result = String::new();
    let mut in_tag = false;

    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }

    result
}

/// Truncate text at word boundary, respecting UTF-8 character boundaries.
fn truncate_at_word_boundary(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let truncate_byte_idx = text
        .char_indices()
        .nth(max_chars)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len());

    let truncated = &text[..truncate_byte_idx];

    if let Some(last_space_byte) = truncated.rfind(' ') {
        format!("{}...", &truncated[..last_space_byte])
    } else {
        format!("{truncated}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_from_extension() {
        assert_eq!(
            ContentType::from_extension("md"),
            Some(ContentType::Markdown)
        );
        assert_eq!(ContentType::from_extension("MDX"), Some(ContentType::Mdx));
        assert_eq!(ContentType::from_extension("txt"), None);
        assert!(ContentType::Mdx.expands_components());
        assert!(!ContentType::Markdown.expands_components());
    }

    #[test]
    fn test_slug_from_path() {
        assert_eq!(
            slug_from_path(Path::new("posts/hello-world.mdx")).as_deref(),
            Some("hello-world")
        );
        assert_eq!(
            slug_from_path(Path::new("posts/hello-world/index.md")).as_deref(),
            Some("hello-world")
        );
        assert_eq!(slug_from_path(Path::new("posts/notes.txt")), None);
    }

    #[test]
    fn test_post_routes() {
        let post = Post::new("Hello", "Life", "2023-05-01", "hello-world");
        assert_eq!(post.url(), "/posts/hello-world");
        assert_eq!(post.cover_image(), "/head/hello-world.png");
    }

    #[test]
    fn test_post_from_frontmatter() {
        let fm = Frontmatter {
            title: "T".to_string(),
            category: "C".to_string(),
            publish_date: Some("2023-05-01".to_string()),
            ..Default::default()
        };
        let post = Post::from_frontmatter(&fm, "from-file");
        assert_eq!(post.slug, "from-file");
        assert_eq!(post.publish_date, "2023-05-01");

        let fm = Frontmatter {
            slug: Some("explicit".to_string()),
            ..fm
        };
        assert_eq!(Post::from_frontmatter(&fm, "from-file").slug, "explicit");
    }

    #[test]
    fn test_missing_date_fails_to_parse() {
        let fm = Frontmatter {
            title: "T".to_string(),
            ..Default::default()
        };
        let post = Post::from_frontmatter(&fm, "t");
        assert!(post.publish_date.is_empty());
        assert!(post.parse_publish_date().is_err());
    }

    #[test]
    fn test_article_from_parsed() {
        let parsed = ParsedContent {
            frontmatter: Frontmatter {
                title: "Hello".to_string(),
                ..Default::default()
            },
            html: "<p>Hello <strong>World</strong></p>".to_string(),
            raw: "Hello **World**".to_string(),
            toc: vec![],
        };

        let article = Article::from_parsed(parsed, "hello", Path::new("posts/hello.md"));
        assert_eq!(article.post.slug, "hello");
        assert_eq!(article.summary.as_deref(), Some("Hello World"));
        assert_eq!(article.word_count, 2);
        assert_eq!(article.reading_time, 1);
    }

    #[test]
    fn test_truncate_at_word_boundary() {
        let text = "Hello world this is a test";
        assert_eq!(truncate_at_word_boundary(text, 100), text);
        assert_eq!(truncate_at_word_boundary(text, 12), "Hello world...");

        let chinese_text = "你好世界 Hello World";
        assert_eq!(truncate_at_word_boundary(chinese_text, 7), "你好世界...");
    }
}
