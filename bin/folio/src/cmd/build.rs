//! Build command - generates the static site

use std::{path::Path, time::Instant};

use color_eyre::eyre::{Result, WrapErr};
use folio_core::Config;
use folio_generator::Builder;

use crate::project_root;

/// Run the build command.
///
/// Loads the configuration (with `FOLIO__*` environment overrides), applies
/// the command-line overrides and builds the site.
pub fn run(
    config_path: &Path,
    output: Option<&Path>,
    drafts: bool,
    base_url: Option<&str>,
) -> Result<()> {
    let start = Instant::now();
    tracing::info!(?config_path, ?output, drafts, ?base_url, "Starting build");

    let mut config =
        Config::load_with_env(config_path).wrap_err("Failed to load configuration")?;

    if drafts {
        config.build.drafts = true;
    }

    if let Some(url) = base_url {
        tracing::info!(base_url = url, "Overriding site base_url from CLI");
        config.site.base_url = url.to_string();
        config.validate().wrap_err("Invalid base URL override")?;
    }

    tracing::debug!(?config, "Loaded configuration");

    let mut builder = Builder::from_root(config, project_root(config_path));
    if let Some(output) = output {
        builder = builder.with_output_dir(output);
    }

    let stats = builder.build().wrap_err("Build failed")?;
    let duration = start.elapsed();

    println!();
    println!("  Build completed successfully!");
    println!();
    println!("  Posts:      {}", stats.posts);
    println!("  Pages:      {}", stats.pages);
    if stats.failed > 0 {
        println!("  Failed:     {} (see warnings)", stats.failed);
    }
    println!("  Assets:     {}", stats.assets);
    println!();
    println!("  Duration:   {:.2}s", duration.as_secs_f64());
    println!("  Output:     {}", builder.output_dir().display());
    println!();

    tracing::info!(?stats, ?duration, "Build completed successfully");

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn sample_site() -> TempDir {
        let root = TempDir::new().unwrap();
        fs::write(
            root.path().join("folio.toml"),
            "[site]\ntitle = \"Blog\"\nbase_url = \"https://example.com\"\n",
        )
        .unwrap();
        let posts = root.path().join("content/posts");
        fs::create_dir_all(&posts).unwrap();
        fs::write(
            posts.join("hello.md"),
            "---\ntitle: Hello\npublishDate: 2023-05-01\n---\nHi",
        )
        .unwrap();
        fs::write(
            posts.join("wip.md"),
            "---\ntitle: WIP\ndraft: true\npublishDate: 2023-06-01\n---\nSoon",
        )
        .unwrap();
        root
    }

    #[test]
    fn test_build_command() {
        let root = sample_site();
        let config = root.path().join("folio.toml");

        run(&config, None, false, None).unwrap();

        let public = root.path().join("public");
        assert!(public.join("index.html").exists());
        assert!(public.join("posts/hello/index.html").exists());
        assert!(!public.join("posts/wip").exists());
    }

    #[test]
    fn test_build_command_overrides() {
        let root = sample_site();
        let config = root.path().join("folio.toml");
        let output = root.path().join("dist");

        run(&config, Some(&output), true, Some("https://blog.example.org")).unwrap();

        assert!(output.join("posts/wip/index.html").exists());
        let rss = fs::read_to_string(output.join("rss.xml")).unwrap();
        assert!(rss.contains("https://blog.example.org/posts/hello"));
    }

    #[test]
    fn test_build_command_missing_config() {
        let root = TempDir::new().unwrap();
        let result = run(&root.path().join("folio.toml"), None, false, None);
        assert!(result.is_err());
    }
}
