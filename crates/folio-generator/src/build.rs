//! Build orchestration.
//!
//! Coordinates the full site build process.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Instant,
};

use folio_core::{Article, Config};
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    assets::{AssetError, AssetProcessor},
    collector::{CollectorError, ContentCollector, SiteContent},
    html::{HtmlError, HtmlGenerator},
    rss::{RssError, RssGenerator},
};

/// Build errors.
#[derive(Debug, Error)]
pub enum BuildError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Collector error.
    #[error("collector error: {0}")]
    Collector(#[from] CollectorError),

    /// HTML generation error.
    #[error("HTML error: {0}")]
    Html(#[from] HtmlError),

    /// RSS generation error.
    #[error("RSS error: {0}")]
    Rss(#[from] RssError),

    /// Asset error.
    #[error("asset error: {0}")]
    Asset(#[from] AssetError),
}

/// Result type for build operations.
pub type Result<T> = std::result::Result<T, BuildError>;

/// Build statistics.
#[derive(Debug, Clone, Default)]
pub struct BuildStats {
    /// Number of posts collected.
    pub posts: usize,

    /// Number of HTML pages written, index included.
    pub pages: usize,

    /// Number of posts whose page could not be generated.
    pub failed: usize,

    /// Number of static assets copied.
    pub assets: usize,

    /// Build duration in milliseconds.
    pub duration_ms: u64,
}

/// Site builder that orchestrates the build process.
#[derive(Debug)]
pub struct Builder {
    config: Config,
    posts_dir: PathBuf,
    output_dir: PathBuf,
    static_dir: Option<PathBuf>,
}

impl Builder {
    /// Create a new builder.
    #[must_use]
    pub fn new(config: Config, posts_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            config,
            posts_dir: posts_dir.into(),
            output_dir: output_dir.into(),
            static_dir: None,
        }
    }

    /// Create a builder with every directory resolved from the configuration
    /// against the project `root`.
    #[must_use]
    pub fn from_root(config: Config, root: &Path) -> Self {
        let posts_dir = config.posts_dir(root);
        let output_dir = root.join(&config.build.output_dir);
        let static_dir = config.static_dir(root);
        Self::new(config, posts_dir, output_dir).with_static_dir(static_dir)
    }

    /// Set the static assets directory.
    #[must_use]
    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(dir.into());
        self
    }

    /// Override the output directory.
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Output directory of this build.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Execute the full build process.
    pub fn build(&self) -> Result<BuildStats> {
        let start = Instant::now();
        let mut stats = BuildStats::default();

        info!(
            posts = %self.posts_dir.display(),
            output = %self.output_dir.display(),
            "starting build"
        );

        // 1. Collect posts
        let collector = ContentCollector::new(self.config.clone(), &self.posts_dir);
        let content = collector.collect()?;
        stats.posts = content.len();
        let articles = content.by_date();

        let generator = HtmlGenerator::new(self.config.clone());

        // 2. Render the index before touching the previous output
        let index = generator.generate_index(&articles)?;

        // 3. Clean output directory and write the index
        self.clean_output()?;
        fs::write(self.output_dir.join("index.html"), index)?;
        stats.pages += 1;

        // 4. Post pages
        let (written, failed) = self.generate_posts(&generator, &content);
        stats.pages += written;
        stats.failed = failed;

        // 5. RSS feed
        if self.config.rss.enabled {
            self.generate_rss(&articles)?;
        }

        // 6. Static assets
        if let Some(ref static_dir) = self.static_dir {
            stats.assets = AssetProcessor::new().process(static_dir, &self.output_dir)?;
        }

        stats.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            posts = stats.posts,
            pages = stats.pages,
            failed = stats.failed,
            assets = stats.assets,
            duration_ms = stats.duration_ms,
            "build complete"
        );

        Ok(stats)
    }

    /// Clean the output directory.
    fn clean_output(&self) -> Result<()> {
        if self.output_dir.exists() {
            debug!(dir = %self.output_dir.display(), "cleaning output directory");
            fs::remove_dir_all(&self.output_dir)?;
        }
        fs::create_dir_all(&self.output_dir)?;
        Ok(())
    }

    /// Write every post page in parallel. Returns `(written, failed)`.
    fn generate_posts(&self, generator: &HtmlGenerator, content: &SiteContent) -> (usize, usize) {
        let articles: Vec<_> = content.articles.values().collect();
        info!(count = articles.len(), "generating post pages");

        let results: Vec<_> = articles
            .par_iter()
            .map(|article| {
                let html = generator.generate_post(article)?;
                let output_path = generator.output_path(&article.post, &self.output_dir);

                if let Some(parent) = output_path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&output_path, &html)?;

                debug!(path = %output_path.display(), "wrote post");
                Ok::<_, BuildError>(())
            })
            .collect();

        let mut written = 0;
        let mut failed = 0;
        for (article, result) in articles.iter().zip(results) {
            match result {
                Ok(()) => written += 1,
                Err(e) => {
                    warn!(slug = %article.post.slug, error = %e, "failed to generate post page");
                    failed += 1;
                }
            }
        }

        (written, failed)
    }

    fn generate_rss(&self, articles: &[&Article]) -> Result<()> {
        let output_path = self.output_dir.join("rss.xml");
        let mut file = fs::File::create(&output_path)?;
        RssGenerator::new(self.config.clone()).write_to(articles, &mut file)?;

        info!(path = %output_path.display(), "generated RSS feed");
        Ok(())
    }
}
