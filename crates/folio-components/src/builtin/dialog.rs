//! Chat-style dialog bubbles.

use crate::{
    Props, RenderContext, Result,
    html::{attr, escape_html},
};

/// Which side the bubble sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// `Dialog`: the other party speaking.
    Left,
    /// `DialogBack`: the author replying.
    Right,
}

impl Side {
    fn class(&self) -> &'static str {
        match self {
            Self::Left => "dialog-left",
            Self::Right => "dialog-right",
        }
    }
}

pub fn open(side: Side, props: &Props, ctx: &mut RenderContext<'_>) -> Result<String> {
    let name = props.get("name");

    let mut html = format!(r#"<div class="dialog {}">"#, side.class());
    if let Some(avatar) = props.get("avatar") {
        ctx.images().check(avatar)?;
        html.push_str(&format!(
            r#"<img class="dialog-avatar"{}{} width="40" height="40" loading="lazy">"#,
            attr("src", avatar),
            attr("alt", name.unwrap_or_default()),
        ));
    }
    html.push_str(r#"<div class="dialog-content">"#);
    if let Some(name) = name {
        html.push_str(&format!(
            r#"<p class="dialog-name">{}</p>"#,
            escape_html(name)
        ));
    }
    html.push_str(r#"<div class="dialog-bubble">"#);
    Ok(html)
}
