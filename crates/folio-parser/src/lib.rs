//! Folio Parser Library
//!
//! Renders Markdown and MDX posts to HTML, expanding component tags through
//! the component registry.

pub mod markdown;
pub mod mdx;
pub mod syntax;

use std::path::Path;

use folio_core::{
    Config, ImagePolicy,
    content::{ContentType, ParsedContent},
};
pub use markdown::MarkdownParser;
pub use mdx::{MdxError, UnknownTagPolicy};
pub use syntax::SyntaxHighlighter;
use thiserror::Error;

/// Parser errors.
#[derive(Debug, Error)]
pub enum ParserError {
    /// Markdown or MDX rendering error.
    #[error(transparent)]
    Markdown(#[from] markdown::MarkdownError),

    /// Unknown file extension.
    #[error("unknown file extension: {0}")]
    UnknownExtension(String),
}

/// Result type for parser operations.
pub type Result<T> = std::result::Result<T, ParserError>;

/// Rendering options shared by all parsers.
#[derive(Debug, Clone)]
pub struct ParserOptions {
    /// Syntax highlighting theme.
    pub syntax_theme: String,
    /// Trusted image hosts.
    pub images: ImagePolicy,
    /// Handling of unregistered component tags.
    pub unknown_tags: UnknownTagPolicy,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            syntax_theme: "base16-ocean.dark".to_string(),
            images: ImagePolicy::default(),
            unknown_tags: UnknownTagPolicy::default(),
        }
    }
}

impl From<&Config> for ParserOptions {
    fn from(config: &Config) -> Self {
        Self {
            syntax_theme: config.build.syntax_theme.clone(),
            images: config.images.clone(),
            unknown_tags: UnknownTagPolicy::from_strict(config.build.strict_components),
        }
    }
}

/// Trait for content parsers.
pub trait ContentParser {
    /// Parse content from a string and file path.
    fn parse(&self, content: &str, path: &Path) -> Result<ParsedContent>;
}

impl ContentParser for MarkdownParser {
    fn parse(&self, content: &str, path: &Path) -> Result<ParsedContent> {
        Ok(self.parse(content, path)?)
    }
}

/// Picks the dialect from the file extension.
#[derive(Debug)]
pub struct ParserRegistry {
    markdown: MarkdownParser,
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserRegistry {
    /// Create a registry with default options.
    pub fn new() -> Self {
        Self::with_options(&ParserOptions::default())
    }

    /// Create a registry with explicit options.
    pub fn with_options(options: &ParserOptions) -> Self {
        Self {
            markdown: MarkdownParser::with_options(options),
        }
    }

    /// Create a registry configured from the site configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::with_options(&ParserOptions::from(config))
    }

    /// Parse content, detecting `.md` or `.mdx` from the file extension.
    pub fn parse(&self, content: &str, path: &Path) -> Result<ParsedContent> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| ParserError::UnknownExtension("(none)".to_string()))?;

        let content_type = ContentType::from_extension(ext)
            .ok_or_else(|| ParserError::UnknownExtension(ext.to_string()))?;

        Ok(self.markdown.parse_as(content, path, content_type)?)
    }

    /// Get the markdown parser.
    pub fn markdown(&self) -> &MarkdownParser {
        &self.markdown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_markdown() {
        let registry = ParserRegistry::new();
        let content = "---\ntitle: \"Test\"\n---\n\n# Hello";

        let result = registry.parse(content, Path::new("test.md")).unwrap();
        assert_eq!(result.frontmatter.title, "Test");
    }

    #[test]
    fn test_registry_picks_mdx_by_extension() {
        let registry = ParserRegistry::new();
        let content = "---\ntitle: T\n---\n\n<Small>x</Small>";

        let mdx = registry.parse(content, Path::new("post.mdx")).unwrap();
        assert!(mdx.html.contains(r#"<small class="small">"#));

        let md = registry.parse(content, Path::new("post.md")).unwrap();
        assert!(md.html.contains("<Small>"));
    }

    #[test]
    fn test_registry_unknown_extension() {
        let registry = ParserRegistry::new();
        let result = registry.parse("content", Path::new("test.xyz"));

        assert!(matches!(result, Err(ParserError::UnknownExtension(_))));
    }

    #[test]
    fn test_options_from_config() {
        let mut config = Config::new("T", "https://example.com");
        config.build.strict_components = true;
        let options = ParserOptions::from(&config);
        assert_eq!(options.unknown_tags, UnknownTagPolicy::Reject);
        assert_eq!(options.syntax_theme, "base16-ocean.dark");
    }

    #[test]
    fn test_content_parser_trait() {
        let parser = MarkdownParser::new();
        let content = "---\ntitle: \"Trait Test\"\n---\n\nContent";

        let result: Result<ParsedContent> =
            ContentParser::parse(&parser, content, Path::new("test.md"));
        assert!(result.is_ok());
    }
}
