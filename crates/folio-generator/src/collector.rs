//! Post collection.
//!
//! Walks the posts directory, parses every `.md`/`.mdx` file in parallel and
//! indexes the results by slug.

use std::{
    cmp::Ordering,
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use folio_core::{Article, Config, ContentType, CoreError, content::slug_from_path};
use folio_parser::{ParserError, ParserRegistry};
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Content collection errors.
#[derive(Debug, Error)]
pub enum CollectorError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory walk error.
    #[error("failed to walk content directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// Parser error.
    #[error("parse error in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParserError,
    },

    /// Frontmatter failed validation.
    #[error(transparent)]
    Frontmatter(#[from] CoreError),

    /// No slug could be derived from the file path.
    #[error("cannot derive a slug from {}", .0.display())]
    InvalidPath(PathBuf),

    /// Two posts resolve to the same slug.
    #[error("duplicate slug `{slug}`: {} and {}", .first.display(), .second.display())]
    DuplicateSlug {
        slug: String,
        first: PathBuf,
        second: PathBuf,
    },
}

/// Result type for collector operations.
pub type Result<T> = std::result::Result<T, CollectorError>;

/// Collected posts.
#[derive(Debug, Default)]
pub struct SiteContent {
    /// All posts indexed by slug.
    pub articles: HashMap<String, Article>,

    /// Files that failed to parse and were left out.
    pub skipped: Vec<PathBuf>,
}

impl SiteContent {
    /// Posts sorted newest first. Posts whose date does not parse sort last,
    /// ties are broken by title.
    pub fn by_date(&self) -> Vec<&Article> {
        let mut articles: Vec<_> = self.articles.values().collect();
        articles.sort_by(|a, b| {
            let a_date = a.post.parse_publish_date().ok();
            let b_date = b.post.parse_publish_date().ok();
            match (b_date, a_date) {
                (Some(b_date), Some(a_date)) => b_date.cmp(&a_date),
                (Some(_), None) => Ordering::Greater,
                (None, Some(_)) => Ordering::Less,
                (None, None) => Ordering::Equal,
            }
            .then_with(|| a.post.title.cmp(&b.post.title))
        });
        articles
    }

    /// Look up a post by slug.
    pub fn get(&self, slug: &str) -> Option<&Article> {
        self.articles.get(slug)
    }

    /// Number of collected posts.
    pub fn len(&self) -> usize {
        self.articles.len()
    }

    /// Whether no posts were collected.
    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

/// Content collector that walks the posts directory and parses files.
#[derive(Debug)]
pub struct ContentCollector {
    config: Config,
    parser: ParserRegistry,
    posts_dir: PathBuf,
}

impl ContentCollector {
    /// Create a collector for `posts_dir`.
    #[must_use]
    pub fn new(config: Config, posts_dir: impl Into<PathBuf>) -> Self {
        Self {
            parser: ParserRegistry::from_config(&config),
            config,
            posts_dir: posts_dir.into(),
        }
    }

    /// Collect all posts. Files that fail to parse are skipped with a warning;
    /// duplicate slugs fail the collection.
    pub fn collect(&self) -> Result<SiteContent> {
        info!(dir = %self.posts_dir.display(), "collecting posts");

        let files = self.content_files()?;
        info!(count = files.len(), "found post files");

        let results: Vec<_> = files
            .par_iter()
            .map(|path| (path, self.load_file(path)))
            .collect();

        let mut content = SiteContent::default();
        let mut origins: HashMap<String, PathBuf> = HashMap::new();

        for (path, result) in results {
            let article = match result {
                Ok(article) => article,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to parse post");
                    content.skipped.push(path.clone());
                    continue;
                }
            };

            if article.post.draft && !self.config.build.drafts {
                debug!(slug = %article.post.slug, "skipping draft");
                continue;
            }

            let slug = article.post.slug.clone();
            if let Some(first) = origins.get(&slug) {
                return Err(CollectorError::DuplicateSlug {
                    slug,
                    first: first.clone(),
                    second: path.clone(),
                });
            }
            origins.insert(slug.clone(), path.clone());
            content.articles.insert(slug, article);
        }

        info!(
            posts = content.len(),
            skipped = content.skipped.len(),
            "post collection complete"
        );

        Ok(content)
    }

    /// All post source files, sorted by path. Hidden entries are ignored.
    pub fn content_files(&self) -> Result<Vec<PathBuf>> {
        if !self.posts_dir.exists() {
            warn!(dir = %self.posts_dir.display(), "posts directory does not exist");
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(&self.posts_dir)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'));

        for entry in walker {
            let entry = entry?;
            if entry.file_type().is_file() && ContentType::from_path(entry.path()).is_some() {
                files.push(entry.into_path());
            }
        }

        Ok(files)
    }

    /// Read, parse and validate one post file.
    pub fn load_file(&self, path: &Path) -> Result<Article> {
        debug!(path = %path.display(), "parsing post");

        let source = fs::read_to_string(path)?;
        let parsed = self
            .parser
            .parse(&source, path)
            .map_err(|source| CollectorError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        parsed.frontmatter.validate(path)?;

        let relative = path.strip_prefix(&self.posts_dir).unwrap_or(path);
        let default_slug = if parsed.frontmatter.slug.is_some() {
            String::new()
        } else {
            slug_from_path(relative).ok_or_else(|| CollectorError::InvalidPath(path.to_path_buf()))?
        };

        Ok(Article::from_parsed(parsed, &default_slug, path))
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn write(dir: &Path, name: &str, content: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn post(title: &str, date: &str) -> String {
        format!("---\ntitle: \"{title}\"\ncat: \"Notes\"\npublishDate: \"{date}\"\n---\n\nBody of {title}.\n")
    }

    fn collector(dir: &Path) -> ContentCollector {
        ContentCollector::new(Config::new("Test", "https://example.com"), dir)
    }

    #[test]
    fn test_collect_posts() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "hello-world.mdx", &post("Hello", "2023-05-01T00:00:00.000Z"));
        write(dir.path(), "nested/index.md", &post("Nested", "2022-01-01"));
        write(dir.path(), "notes.txt", "ignored");
        write(dir.path(), ".hidden/secret.md", &post("Secret", "2022-01-01"));

        let content = collector(dir.path()).collect().unwrap();

        assert_eq!(content.len(), 2);
        assert_eq!(content.get("hello-world").unwrap().post.category, "Notes");
        assert!(content.get("nested").is_some());
        assert!(content.skipped.is_empty());
    }

    #[test]
    fn test_by_date_newest_first() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "old.md", &post("Old", "2020-01-01"));
        write(dir.path(), "new.md", &post("New", "2024-03-01T10:00:00Z"));
        write(dir.path(), "broken.md", &post("Broken", "someday"));
        write(dir.path(), "mid.md", &post("Mid", "2022-06-15"));

        let content = collector(dir.path()).collect().unwrap();
        let slugs: Vec<_> = content
            .by_date()
            .iter()
            .map(|a| a.post.slug.as_str())
            .collect();

        assert_eq!(slugs, ["new", "mid", "old", "broken"]);
    }

    #[test]
    fn test_drafts_filtered() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "draft.md",
            "---\ntitle: Draft\ndraft: true\npublishDate: 2023-01-01\n---\nWIP",
        );

        let content = collector(dir.path()).collect().unwrap();
        assert!(content.is_empty());

        let mut config = Config::new("Test", "https://example.com");
        config.build.drafts = true;
        let content = ContentCollector::new(config, dir.path()).collect().unwrap();
        assert_eq!(content.len(), 1);
    }

    #[test]
    fn test_duplicate_slug_is_an_error() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.md", &post("A", "2023-01-01"));
        write(
            dir.path(),
            "b.md",
            "---\ntitle: B\nslug: a\npublishDate: 2023-01-02\n---\nB",
        );

        let err = collector(dir.path()).collect().unwrap_err();
        assert!(matches!(err, CollectorError::DuplicateSlug { ref slug, .. } if slug == "a"));
    }

    #[test]
    fn test_parse_failures_are_skipped() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "good.md", &post("Good", "2023-01-01"));
        write(dir.path(), "untitled.md", "---\ncat: x\n---\nNo title");
        write(
            dir.path(),
            "evil.md",
            "---\ntitle: Evil\n---\n![x](https://evil.test/x.png)",
        );

        let content = collector(dir.path()).collect().unwrap();
        assert_eq!(content.len(), 1);
        assert_eq!(content.skipped.len(), 2);
    }

    #[test]
    fn test_load_file_reports_parse_error() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "typo.mdx", "---\ntitle: T\n---\n<Callout>\nnever closed\n");

        let err = collector(dir.path())
            .load_file(&dir.path().join("typo.mdx"))
            .unwrap_err();
        assert!(matches!(err, CollectorError::Parse { .. }));
    }

    #[test]
    fn test_slug_outside_output_is_rejected() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "escape.md",
            "---\ntitle: Escape\nslug: \"../../../escaped\"\npublishDate: 2023-01-01\n---\nx",
        );
        write(
            dir.path(),
            "absolute.md",
            "---\ntitle: Absolute\nslug: /tmp/absolute\npublishDate: 2023-01-01\n---\nx",
        );

        let collector = collector(dir.path());
        let err = collector
            .load_file(&dir.path().join("escape.md"))
            .unwrap_err();
        assert!(matches!(err, CollectorError::Frontmatter(CoreError::Frontmatter { .. })));

        let content = collector.collect().unwrap();
        assert!(content.is_empty());
        assert_eq!(content.skipped.len(), 2);
    }

    #[test]
    fn test_missing_posts_dir() {
        let dir = TempDir::new().unwrap();
        let content = collector(&dir.path().join("nope")).collect().unwrap();
        assert!(content.is_empty());
    }
}
