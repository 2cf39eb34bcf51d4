//! Text decorations: `Quote`, `Small`, `Callout` and `Step`.

use tracing::warn;

use crate::{Props, RenderContext, Result, html::escape_html};

/// Callout flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CalloutKind {
    #[default]
    Info,
    Tip,
    Warning,
    Danger,
}

impl CalloutKind {
    /// Parse a `type` prop. Unknown values fall back to `Info`.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            None | Some("info") => Self::Info,
            Some("tip") => Self::Tip,
            Some("warning") => Self::Warning,
            Some("danger") => Self::Danger,
            Some(other) => {
                warn!(callout_type = other, "unknown callout type, using info");
                Self::Info
            }
        }
    }

    /// CSS modifier name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Tip => "tip",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }
}

pub fn quote_open() -> String {
    r#"<blockquote class="quote">"#.to_string()
}

pub fn quote_close(props: &Props) -> String {
    match props.get("author") {
        Some(author) => format!("<cite>{}</cite></blockquote>", escape_html(author)),
        None => "</blockquote>".to_string(),
    }
}

pub fn small_open() -> String {
    r#"<small class="small">"#.to_string()
}

pub fn callout_open(props: &Props) -> String {
    let kind = CalloutKind::parse(props.get("type"));

    let mut html = format!(r#"<aside class="callout callout-{}">"#, kind.as_str());
    if let Some(emoji) = props.get("emoji") {
        html.push_str(&format!(
            r#"<span class="callout-emoji" aria-hidden="true">{}</span>"#,
            escape_html(emoji)
        ));
    }
    html.push_str(r#"<div class="callout-body">"#);
    if let Some(title) = props.get("title") {
        html.push_str(&format!(
            r#"<p class="callout-title">{}</p>"#,
            escape_html(title)
        ));
    }
    html
}

pub fn step_open(props: &Props, ctx: &mut RenderContext<'_>) -> Result<String> {
    let explicit = props.number("Step", "n")?;
    let n = ctx.next_step(explicit);

    let mut html = format!(
        r#"<section class="step"><div class="step-number">{n}</div><div class="step-body">"#
    );
    if let Some(title) = props.get("title") {
        html.push_str(&format!(
            r#"<h4 class="step-title">{}</h4>"#,
            escape_html(title)
        ));
    }
    Ok(html)
}
