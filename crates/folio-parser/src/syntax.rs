//! Syntax highlighting for fenced code blocks.

use folio_components::html::escape_html;
use syntect::{highlighting::ThemeSet, html::highlighted_html_for_string, parsing::SyntaxSet};
use tracing::{debug, warn};

/// Syntax highlighter using syntect's bundled syntaxes and themes.
#[derive(Debug)]
pub struct SyntaxHighlighter {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme: String,
}

impl Default for SyntaxHighlighter {
    fn default() -> Self {
        Self::new("base16-ocean.dark")
    }
}

impl SyntaxHighlighter {
    /// Create a highlighter. Unknown theme names fall back to the default.
    pub fn new(theme: &str) -> Self {
        let mut highlighter = Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme: "base16-ocean.dark".to_string(),
        };
        highlighter.set_theme(theme);
        highlighter
    }

    /// Names of the bundled themes.
    pub fn available_themes(&self) -> Vec<&str> {
        self.theme_set.themes.keys().map(String::as_str).collect()
    }

    /// Whether a theme exists.
    pub fn has_theme(&self, theme: &str) -> bool {
        self.theme_set.themes.contains_key(theme)
    }

    /// The active theme name.
    pub fn theme(&self) -> &str {
        &self.theme
    }

    /// Switch theme. Returns `false` and keeps the current one when the
    /// name is unknown.
    pub fn set_theme(&mut self, theme: &str) -> bool {
        if self.has_theme(theme) {
            self.theme = theme.to_string();
            true
        } else {
            warn!(theme, fallback = %self.theme, "unknown syntax theme");
            false
        }
    }

    /// Highlight a code block. Unknown languages are rendered as plain text.
    pub fn highlight(&self, code: &str, lang: Option<&str>) -> String {
        let syntax = lang
            .and_then(|l| self.syntax_set.find_syntax_by_token(l))
            .unwrap_or_else(|| {
                if let Some(lang) = lang {
                    debug!(lang, "no syntax for language, using plain text");
                }
                self.syntax_set.find_syntax_plain_text()
            });

        let highlighted = self
            .theme_set
            .themes
            .get(&self.theme)
            .and_then(|theme| {
                highlighted_html_for_string(code, &self.syntax_set, syntax, theme).ok()
            })
            .unwrap_or_else(|| plain_block(code, lang));

        match lang {
            Some(lang) => format!(
                r#"<div class="code-block" data-lang="{}">{highlighted}</div>"#,
                escape_html(lang)
            ),
            None => format!(r#"<div class="code-block">{highlighted}</div>"#),
        }
    }
}

fn plain_block(code: &str, lang: Option<&str>) -> String {
    let lang_class = lang
        .map(|l| format!(r#" class="language-{}""#, escape_html(l)))
        .unwrap_or_default();
    format!("<pre><code{lang_class}>{}</code></pre>", escape_html(code))
}
