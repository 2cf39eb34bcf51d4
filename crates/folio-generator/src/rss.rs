//! RSS feed generation.
//!
//! Generates an RSS 2.0 feed of the newest posts.

use std::io::Write;

use chrono::Utc;
use folio_core::{Article, Config};
use rss::{ChannelBuilder, GuidBuilder, Item, ItemBuilder};
use thiserror::Error;
use tracing::{debug, warn};

/// RSS generation errors.
#[derive(Debug, Error)]
pub enum RssError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for RSS operations.
pub type Result<T> = std::result::Result<T, RssError>;

/// RSS feed generator.
#[derive(Debug)]
pub struct RssGenerator {
    config: Config,
}

impl RssGenerator {
    /// Create a new RSS generator.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Generate RSS feed XML. `articles` are expected newest first; only the
    /// first `rss.limit` are included.
    pub fn generate(&self, articles: &[&Article]) -> String {
        let limit = self.config.rss.limit;
        debug!(count = articles.len().min(limit), limit, "generating RSS feed");

        let items: Vec<Item> = articles
            .iter()
            .take(limit)
            .map(|article| self.article_to_item(article))
            .collect();

        let site = &self.config.site;
        ChannelBuilder::default()
            .title(&site.title)
            .link(&site.base_url)
            .description(site.description.as_deref().unwrap_or(&site.title))
            .language(Some(site.locale.language().to_string()))
            .last_build_date(Some(Utc::now().to_rfc2822()))
            .items(items)
            .build()
            .to_string()
    }

    fn article_to_item(&self, article: &Article) -> Item {
        let post = &article.post;
        let url = self.config.url_for(&post.url());
        let guid = GuidBuilder::default().value(&url).permalink(true).build();

        let mut builder = ItemBuilder::default();
        builder.title(Some(post.title.clone()));
        builder.link(Some(url));
        builder.guid(Some(guid));
        builder.description(article.summary.clone());

        match post.parse_publish_date() {
            Ok(date) => {
                builder.pub_date(Some(date.to_rfc2822()));
            }
            Err(e) => warn!(slug = %post.slug, error = %e, "omitting pubDate from feed item"),
        }

        if let Some(author) = &self.config.site.author {
            builder.author(Some(author.clone()));
        }

        if !post.category.is_empty() {
            builder.categories(vec![rss::Category {
                name: post.category.clone(),
                domain: None,
            }]);
        }

        builder.build()
    }

    /// Write the RSS feed to a writer.
    pub fn write_to<W: Write>(&self, articles: &[&Article], writer: &mut W) -> Result<()> {
        writer.write_all(self.generate(articles).as_bytes())?;
        Ok(())
    }
}
