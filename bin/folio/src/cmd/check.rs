//! Check command - validate configuration and content

use std::{collections::HashMap, path::Path};

use color_eyre::eyre::{Result, bail};
use folio_core::Config;
use folio_generator::{ContentCollector, HtmlGenerator};

use crate::project_root;

/// Validation result.
#[derive(Debug, Default)]
struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Run the check command.
///
/// Validates the configuration, then every post: it must parse and render,
/// its publish date must be formattable and its slug unique. A missing cover
/// image is a warning.
pub fn run(config_path: &Path, strict: bool) -> Result<()> {
    tracing::info!(?config_path, strict, "Checking configuration and content");

    let mut result = ValidationResult::default();

    println!("Checking configuration...");
    let config = match Config::load_with_env(config_path) {
        Ok(c) => {
            println!("  ✓ Configuration valid");
            c
        }
        Err(e) => {
            println!("  ✗ Configuration invalid: {e}");
            bail!("Configuration error: {e}");
        }
    };

    check_config_values(&config, &mut result);

    let root = project_root(config_path);
    let posts_dir = config.posts_dir(root);
    if posts_dir.exists() {
        println!("\nChecking posts...");
        validate_posts(&config, root, &mut result)?;
    } else {
        result.add_warning(format!(
            "Posts directory does not exist: {}",
            posts_dir.display()
        ));
    }

    println!();
    println!("Summary:");
    println!("  Errors:   {}", result.errors.len());
    println!("  Warnings: {}", result.warnings.len());

    if result.has_errors() {
        println!();
        println!("Errors:");
        for err in &result.errors {
            println!("  ✗ {err}");
        }
    }

    if result.has_warnings() {
        println!();
        println!("Warnings:");
        for warn in &result.warnings {
            println!("  ⚠ {warn}");
        }
    }

    if result.has_errors() {
        bail!("Validation failed with {} error(s)", result.errors.len());
    }

    if strict && result.has_warnings() {
        bail!(
            "Validation failed with {} warning(s) (strict mode)",
            result.warnings.len()
        );
    }

    println!();
    println!("✓ All checks passed");

    Ok(())
}

/// Validate every post file under the configured posts directory.
fn validate_posts(config: &Config, root: &Path, result: &mut ValidationResult) -> Result<()> {
    let collector = ContentCollector::new(config.clone(), config.posts_dir(root));
    let generator = HtmlGenerator::new(config.clone());
    let static_dir = config.static_dir(root);

    let files = collector.content_files()?;
    let mut slugs: HashMap<String, &Path> = HashMap::new();
    let mut failed = 0;

    for path in &files {
        let article = match collector.load_file(path) {
            Ok(article) => article,
            Err(e) => {
                result.add_error(format!("{}: {e}", path.display()));
                failed += 1;
                continue;
            }
        };
        if article.post.draft && !config.build.drafts {
            continue;
        }
        let post = &article.post;

        if let Err(e) = generator.card(post) {
            result.add_error(format!("{}: {e}", path.display()));
            failed += 1;
        }

        if let Some(first) = slugs.insert(post.slug.clone(), path.as_path()) {
            result.add_error(format!(
                "{}: slug `{}` already used by {}",
                path.display(),
                post.slug,
                first.display()
            ));
            failed += 1;
        }

        let cover = static_dir.join(post.cover_image().trim_start_matches('/'));
        if !cover.exists() {
            result.add_warning(format!(
                "{}: missing cover image {}",
                path.display(),
                post.cover_image()
            ));
        }
    }

    let checked = files.len();
    if failed == 0 {
        println!("  ✓ All {checked} posts valid");
    } else {
        println!("  ✗ {failed} problem(s) across {checked} posts");
    }

    Ok(())
}

/// Check configuration values for common issues.
fn check_config_values(config: &Config, result: &mut ValidationResult) {
    if !config.site.base_url.starts_with("http") {
        result.add_warning("site.base_url should start with http:// or https://");
    }

    if config.site.base_url.ends_with('/') {
        result.add_warning("site.base_url should not end with a slash");
    }

    if config.rss.enabled && config.rss.limit == 0 {
        result.add_warning("rss.limit is 0, the feed will be empty");
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn site(posts: &[(&str, &str)], covers: &[&str]) -> TempDir {
        let root = TempDir::new().unwrap();
        fs::write(
            root.path().join("folio.toml"),
            "[site]\ntitle = \"Blog\"\nbase_url = \"https://example.com\"\n",
        )
        .unwrap();

        let posts_dir = root.path().join("content/posts");
        fs::create_dir_all(&posts_dir).unwrap();
        for (name, content) in posts {
            fs::write(posts_dir.join(name), content).unwrap();
        }

        let head = root.path().join("static/head");
        fs::create_dir_all(&head).unwrap();
        for slug in covers {
            fs::write(head.join(format!("{slug}.png")), b"png").unwrap();
        }
        root
    }

    const GOOD: &str = "---\ntitle: Good\npublishDate: 2023-05-01\n---\nBody";

    #[test]
    fn test_check_passes() {
        let root = site(&[("good.md", GOOD)], &["good"]);
        run(&root.path().join("folio.toml"), true).unwrap();
    }

    #[test]
    fn test_missing_cover_is_warning() {
        let root = site(&[("good.md", GOOD)], &[]);
        let config = root.path().join("folio.toml");

        run(&config, false).unwrap();
        assert!(run(&config, true).is_err());
    }

    #[test]
    fn test_invalid_date_is_error() {
        let root = site(
            &[("bad.md", "---\ntitle: Bad\npublishDate: nope\n---\nBody")],
            &["bad"],
        );
        assert!(run(&root.path().join("folio.toml"), false).is_err());
    }

    #[test]
    fn test_duplicate_slug_is_error() {
        let root = site(
            &[
                ("good.md", GOOD),
                ("other.md", "---\ntitle: Other\nslug: good\npublishDate: 2023-05-02\n---\nx"),
            ],
            &["good"],
        );
        assert!(run(&root.path().join("folio.toml"), false).is_err());
    }

    #[test]
    fn test_drafts_skipped_like_build() {
        let root = site(
            &[
                ("good.md", GOOD),
                (
                    "draft.md",
                    "---\ntitle: Draft\nslug: good\ndraft: true\npublishDate: 2023-05-02\n---\nx",
                ),
            ],
            &["good"],
        );
        run(&root.path().join("folio.toml"), true).unwrap();
    }

    #[test]
    fn test_broken_component_is_error() {
        let root = site(
            &[("typo.mdx", "---\ntitle: Typo\npublishDate: 2023-05-01\n---\n\n<Callout>\nopen\n")],
            &["typo"],
        );
        assert!(run(&root.path().join("folio.toml"), false).is_err());
    }

    #[test]
    fn test_missing_config_is_error() {
        let root = TempDir::new().unwrap();
        assert!(run(&root.path().join("folio.toml"), false).is_err());
    }
}
