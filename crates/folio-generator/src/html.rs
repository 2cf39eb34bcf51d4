//! HTML generation for the index and post pages.

use std::path::{Path, PathBuf};

use chrono::{Datelike, Utc};
use folio_components::{PostCard, WelcomePanel, html::escape_html};
use folio_core::{Article, Config, DateError, Post, TocEntry, content::POSTS_ROUTE};
use thiserror::Error;
use tracing::debug;

use crate::template::{Template, TemplateContext, TemplateError, TemplateRegistry};

/// HTML generation errors.
#[derive(Debug, Error)]
pub enum HtmlError {
    /// Template error.
    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    /// A post's publish date could not be formatted.
    #[error("post `{slug}` has an invalid publish date: {source}")]
    Date {
        slug: String,
        #[source]
        source: DateError,
    },
}

/// Result type for HTML generation.
pub type Result<T> = std::result::Result<T, HtmlError>;

/// HTML page generator.
#[derive(Debug)]
pub struct HtmlGenerator {
    templates: TemplateRegistry,
    config: Config,
}

impl HtmlGenerator {
    /// Create a new HTML generator with the given configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            templates: TemplateRegistry::new(),
            config,
        }
    }

    /// Replace a built-in template.
    pub fn register_template(&mut self, template: Template) {
        self.templates.register(template);
    }

    /// Build the summary card for a post.
    pub fn card(&self, post: &Post) -> Result<PostCard> {
        PostCard::new(post, self.config.site.locale).map_err(|source| HtmlError::Date {
            slug: post.slug.clone(),
            source,
        })
    }

    /// Generate the index page: welcome panel followed by one card per post,
    /// in the order given.
    pub fn generate_index(&self, articles: &[&Article]) -> Result<String> {
        debug!(posts = articles.len(), "generating index page");

        let cards = articles
            .iter()
            .map(|article| self.card(&article.post).map(|card| card.to_html()))
            .collect::<Result<Vec<_>>>()?
            .join("\n");

        let ctx = TemplateContext::new()
            .with_var("welcome", WelcomePanel::to_html())
            .with_var("cards", cards);
        let body = self.templates.render("index", &ctx)?;

        let title = escape_html(&self.config.site.title);
        let description = self.config.site.description.as_deref().map(escape_html);
        self.wrap(&title, description.as_deref(), "/", &body)
    }

    /// Generate the detail page of one post.
    pub fn generate_post(&self, article: &Article) -> Result<String> {
        let post = &article.post;
        debug!(slug = %post.slug, "generating post page");

        let date_error = |source| HtmlError::Date {
            slug: post.slug.clone(),
            source,
        };
        let published = post.parse_publish_date().map_err(date_error)?;
        let locale = self.config.site.locale;

        let ctx = TemplateContext::new()
            .with_var("category", escape_html(&post.category))
            .with_var("title", escape_html(&post.title))
            .with_var("date_iso", published.to_rfc3339())
            .with_var("date", locale.format(&published))
            .with_var("reading_time", article.reading_time.to_string())
            .with_opt("toc", toc_html(&article.toc))
            .with_var("content", &article.content);
        let body = self.templates.render("post", &ctx)?;

        let title = format!(
            "{} | {}",
            escape_html(&post.title),
            escape_html(&self.config.site.title)
        );
        let description = article.summary.as_deref().map(escape_html);
        self.wrap(&title, description.as_deref(), &post.url(), &body)
    }

    /// Output path of a post page: `{output}/posts/{slug}/index.html`.
    pub fn output_path(&self, post: &Post, output_dir: &Path) -> PathBuf {
        output_dir
            .join(POSTS_ROUTE.trim_start_matches('/'))
            .join(&post.slug)
            .join("index.html")
    }

    fn wrap(
        &self,
        title: &str,
        description: Option<&str>,
        path: &str,
        content: &str,
    ) -> Result<String> {
        let site = &self.config.site;
        let ctx = TemplateContext::new()
            .with_var("lang", site.locale.language())
            .with_var("title", title)
            .with_opt("description", description)
            .with_opt("author", site.author.as_deref().map(escape_html))
            .with_var("canonical_url", self.config.url_for(path))
            .with_var("site_title", escape_html(&site.title))
            .with_var("year", Utc::now().year().to_string())
            .with_var("content", content);

        Ok(self.templates.render("base", &ctx)?)
    }
}

/// Render a nested table of contents. `None` when the post has no headings.
pub fn toc_html(toc: &[TocEntry]) -> Option<String> {
    if toc.is_empty() {
        return None;
    }

    let items: String = toc
        .iter()
        .map(|entry| {
            format!(
                r##"<li class="toc-level-{}"><a href="#{}">{}</a></li>"##,
                entry.level,
                escape_html(&entry.id),
                escape_html(&entry.text)
            )
        })
        .collect();

    Some(format!(
        r#"<nav class="post-toc" aria-label="Table of contents"><ul>{items}</ul></nav>"#
    ))
}

#[cfg(test)]
mod tests {
    use folio_core::DateLocale;

    use super::*;

    fn test_config() -> Config {
        let mut config = Config::new("Whexy", "https://example.com");
        config.site.author = Some("Whexy".to_string());
        config
    }

    fn test_article(slug: &str, date: &str) -> Article {
        Article {
            post: Post::new("Hello <World>", "Life", date, slug),
            content: "<p>Body</p>".to_string(),
            summary: Some("Body".to_string()),
            reading_time: 1,
            word_count: 1,
            toc: vec![TocEntry {
                level: 2,
                text: "Intro".to_string(),
                id: "intro".to_string(),
            }],
            source_path: None,
        }
    }

    #[test]
    fn test_generate_index() {
        let generator = HtmlGenerator::new(test_config());
        let a = test_article("hello-world", "2023-05-01T00:00:00.000Z");
        let b = test_article("older", "2022-01-01");

        let html = generator.generate_index(&[&a, &b]).unwrap();

        assert!(html.contains(r#"<h1 class="welcome-name">Whexy</h1>"#));
        assert!(html.contains(r#"href="/posts/hello-world""#));
        assert!(html.contains("5/1/2023"));
        let first = html.find("/posts/hello-world").unwrap();
        let second = html.find("/posts/older").unwrap();
        assert!(first < second);
        assert!(html.contains(r#"<link rel="canonical" href="https://example.com/">"#));
    }

    #[test]
    fn test_index_fails_on_invalid_date() {
        let generator = HtmlGenerator::new(test_config());
        let bad = test_article("broken", "not-a-date");

        let err = generator.generate_index(&[&bad]).unwrap_err();
        assert!(matches!(err, HtmlError::Date { ref slug, .. } if slug == "broken"));
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn test_generate_post() {
        let mut config = test_config();
        config.site.locale = DateLocale::Iso;
        let generator = HtmlGenerator::new(config);
        let article = test_article("hello-world", "2023-05-01T00:00:00.000Z");

        let html = generator.generate_post(&article).unwrap();

        assert!(html.contains(r#"<html lang="en">"#));
        assert!(html.contains("<title>Hello &lt;World&gt; | Whexy</title>"));
        assert!(html.contains(r#"<time datetime="2023-05-01T00:00:00+00:00">2023-05-01</time>"#));
        assert!(html.contains(r##"<a href="#intro">Intro</a>"##));
        assert!(html.contains("<p>Body</p>"));
        assert!(html.contains(r#"href="https://example.com/posts/hello-world""#));
    }

    #[test]
    fn test_output_path() {
        let generator = HtmlGenerator::new(test_config());
        let post = Post::new("T", "C", "2023-05-01", "hello-world");
        assert_eq!(
            generator.output_path(&post, Path::new("public")),
            PathBuf::from("public/posts/hello-world/index.html")
        );
    }

    #[test]
    fn test_toc_html() {
        assert!(toc_html(&[]).is_none());
        let toc = toc_html(&[TocEntry {
            level: 3,
            text: "A & B".to_string(),
            id: "a-b".to_string(),
        }])
        .unwrap();
        assert!(toc.contains(r##"<li class="toc-level-3"><a href="#a-b">A &amp; B</a></li>"##));
    }
}
