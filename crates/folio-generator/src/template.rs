//! Page templates.
//!
//! A small `{{ variable }}` interpolation scheme; `{{ variable? }}` renders
//! nothing when the variable is unset. Values are inserted verbatim, so
//! callers escape text before putting it in a context.

use std::collections::HashMap;

use thiserror::Error;

/// Template rendering errors.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Missing required variable.
    #[error("template `{template}` needs variable `{name}`")]
    MissingVariable { template: String, name: String },

    /// Template not found.
    #[error("template not found: {0}")]
    NotFound(String),

    /// Invalid template syntax.
    #[error("template `{0}` has an unclosed {{{{ delimiter")]
    Unclosed(String),
}

/// Result type for template operations.
pub type Result<T> = std::result::Result<T, TemplateError>;

/// Variables available to a template.
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    variables: HashMap<String, String>,
}

impl TemplateContext {
    /// Create a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a variable into the context.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a variable only when a value is present.
    #[must_use]
    pub fn with_opt(mut self, key: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        if let Some(value) = value {
            self.insert(key, value);
        }
        self
    }

    /// Get a variable value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }
}

/// A named template.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    content: String,
}

impl Template {
    /// Create a new template with the given name and content.
    #[must_use]
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Get the template name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Render the template with the given context.
    pub fn render(&self, context: &TemplateContext) -> Result<String> {
        let mut out = String::with_capacity(self.content.len());
        let mut rest = self.content.as_str();

        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let end = after
                .find("}}")
                .ok_or_else(|| TemplateError::Unclosed(self.name.clone()))?;

            let var = after[..end].trim();
            let (var, optional) = match var.strip_suffix('?') {
                Some(stripped) => (stripped.trim_end(), true),
                None => (var, false),
            };

            match context.get(var) {
                Some(value) => out.push_str(value),
                None if optional => {}
                None => {
                    return Err(TemplateError::MissingVariable {
                        template: self.name.clone(),
                        name: var.to_string(),
                    });
                }
            }

            rest = &after[end + 2..];
        }

        out.push_str(rest);
        Ok(out)
    }
}

/// Registry of templates.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, Template>,
}

impl TemplateRegistry {
    /// Create a registry holding the built-in templates.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self::default();
        registry.register(Template::new("base", BASE_TEMPLATE));
        registry.register(Template::new("index", INDEX_TEMPLATE));
        registry.register(Template::new("post", POST_TEMPLATE));
        registry
    }

    /// Register or replace a template.
    pub fn register(&mut self, template: Template) {
        self.templates.insert(template.name.clone(), template);
    }

    /// Get a template by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    /// Render a named template with the given context.
    pub fn render(&self, name: &str, context: &TemplateContext) -> Result<String> {
        self.get(name)
            .ok_or_else(|| TemplateError::NotFound(name.to_string()))?
            .render(context)
    }
}

/// Page shell shared by every page.
pub const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="{{ lang }}">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{ title }}</title>
    <meta name="description" content="{{ description? }}">
    <meta name="author" content="{{ author? }}">
    <link rel="canonical" href="{{ canonical_url }}">
    <link rel="alternate" type="application/rss+xml" title="{{ site_title }}" href="/rss.xml">
    <style>
        :root {
            --bg: #f5f5f7;
            --card: #ffffff;
            --text: #1d1d1f;
            --muted: #6e6e73;
            --accent: #ef4444;
            --radius: 1rem;
        }
        @media (prefers-color-scheme: dark) {
            :root { --bg: #111; --card: #1c1c1e; --text: #f5f5f7; --muted: #a1a1a6; }
        }
        * { box-sizing: border-box; }
        body { margin: 0; background: var(--bg); color: var(--text); font-family: system-ui, -apple-system, sans-serif; line-height: 1.6; }
        a { color: inherit; }
        img { max-width: 100%; height: auto; }
        .container { max-width: 64rem; margin: 0 auto; padding: 1rem; }
        .site-header { display: flex; justify-content: space-between; align-items: center; padding: 1rem 0; }
        .site-header a { text-decoration: none; font-weight: 700; }
        .site-footer { color: var(--muted); font-size: .875rem; padding: 2rem 0; text-align: center; }

        .welcome-panel { display: flex; justify-content: space-between; gap: 1rem; background: var(--card); border-radius: var(--radius); padding: 2rem; }
        .welcome-name { margin: 0 0 .5rem; font-size: 2.25rem; letter-spacing: -.02em; }
        .muted { opacity: .8; }
        .social-links { display: flex; gap: .5rem; margin-top: 1.25rem; }
        .social-link { display: inline-flex; gap: .25rem; align-items: center; padding: .5rem .75rem; border-radius: .5rem; background: var(--bg); text-decoration: none; }
        .social-link:hover { box-shadow: 0 0 0 2px var(--accent); }
        .welcome-avatar img { border-radius: 50%; transition: transform .5s; }
        .welcome-avatar:hover img { transform: rotate(2deg) scale(1.05); }

        .post-list { display: grid; gap: 1.5rem; margin-top: 1.5rem; }
        .post-card { background: var(--card); border-radius: var(--radius); overflow: hidden; }
        .post-card a { display: block; text-decoration: none; }
        .post-card-cover { overflow: hidden; }
        .post-card-cover img { display: block; width: 100%; transition: transform .3s; }
        .post-card:hover .post-card-cover img { transform: scale(1.05); }
        .post-card-body { padding: 2rem; }
        .post-card-category { margin: 0; font-size: .75rem; font-weight: 700; color: var(--muted); }
        .post-card-title { margin: 0; font-size: 2rem; }
        .post-card-date { padding-top: .5rem; font-size: .875rem; font-weight: 600; opacity: .6; }

        .post { background: var(--card); border-radius: var(--radius); padding: 2rem; }
        .post-category { font-size: .75rem; font-weight: 700; color: var(--muted); margin: 0; }
        .post-title { margin: 0 0 .5rem; }
        .post-toc { font-size: .875rem; border-left: 2px solid var(--bg); padding-left: 1rem; }
        .post-toc ul { list-style: none; padding-left: 0; }
        .toc-level-3 { padding-left: 1rem; }
        .toc-level-4, .toc-level-5, .toc-level-6 { padding-left: 2rem; }
        .code-block pre { padding: 1rem; border-radius: .5rem; overflow-x: auto; }

        figure.image { margin: 1.5rem 0; text-align: center; }
        figure.image figcaption { color: var(--muted); font-size: .875rem; }
        .quote { border-left: 4px solid var(--accent); margin: 1.5rem 0; padding: .5rem 1rem; }
        .quote cite { display: block; color: var(--muted); font-style: normal; }
        .quote cite::before { content: "— "; }
        .small { color: var(--muted); }
        .callout { display: flex; gap: .75rem; border-radius: .75rem; padding: 1rem; margin: 1.5rem 0; background: #eff6ff; }
        .callout-tip { background: #ecfdf5; }
        .callout-warning { background: #fffbeb; }
        .callout-danger { background: #fef2f2; }
        .callout-title { font-weight: 700; margin: 0; }
        .dialog { display: flex; gap: .75rem; margin: 1rem 0; }
        .dialog-right { flex-direction: row-reverse; }
        .dialog-avatar { border-radius: 50%; }
        .dialog-name { margin: 0; font-size: .75rem; color: var(--muted); }
        .dialog-bubble { background: var(--bg); border-radius: 1rem; padding: .5rem 1rem; }
        .dialog-right .dialog-bubble { background: #0a84ff; color: #fff; }
        .step { display: flex; gap: 1rem; margin: 1.5rem 0; }
        .step-number { flex-shrink: 0; width: 2rem; height: 2rem; border-radius: 50%; background: var(--text); color: var(--card); display: grid; place-items: center; font-weight: 700; }
        .step-title { margin: .25rem 0; }
        .github-repo { display: block; border-radius: .75rem; overflow: hidden; background: var(--bg); text-decoration: none; }
        .github-repo-name { display: block; padding: .5rem 1rem; font-family: ui-monospace, monospace; }
        .fancy-card { border-radius: var(--radius); padding: 1.5rem; background: linear-gradient(120deg, #fde68a, #fca5a5, #c4b5fd); background-size: 200% 200%; animation: fancy 8s ease infinite; }
        @keyframes fancy { 0%, 100% { background-position: 0% 50%; } 50% { background-position: 100% 50%; } }
        .wasm-riscv-emu { min-height: 20rem; border-radius: .75rem; background: #000; color: #0f0; font-family: ui-monospace, monospace; padding: 1rem; }
        @media (max-width: 640px) {
            .welcome-panel { flex-direction: column-reverse; padding: 1rem; }
            .welcome-avatar img { width: 80px; height: 80px; }
            .post-card-body { padding: 2rem .5rem; }
        }
    </style>
</head>
<body>
    <div class="container">
        <header class="site-header">
            <a href="/">{{ site_title }}</a>
            <a href="/rss.xml">RSS</a>
        </header>
        <main>
            {{ content }}
        </main>
        <footer class="site-footer">© {{ year }} {{ author? }}</footer>
    </div>
</body>
</html>"##;

/// Index page body: welcome panel then one card per post.
pub const INDEX_TEMPLATE: &str = r#"{{ welcome }}
<section class="post-list">
{{ cards }}
</section>"#;

/// Post page body.
pub const POST_TEMPLATE: &str = r#"<article class="post">
    <header>
        <p class="post-category">{{ category }}</p>
        <h1 class="post-title">{{ title }}</h1>
        <time datetime="{{ date_iso }}">{{ date }}</time>
        <span class="reading-time">{{ reading_time }} min read</span>
    </header>
    {{ toc? }}
    <div class="content">
        {{ content }}
    </div>
</article>"#;
