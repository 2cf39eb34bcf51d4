//! Image-bearing components: `img` and `GithubRepo`.

use crate::{
    ComponentError, Props, RenderContext, Result,
    html::{attr, escape_html, opt_attr},
};

/// Opening fragment of `img`: a figure with a lazily loaded image and an
/// optional caption.
pub fn img_open(props: &Props, ctx: &mut RenderContext<'_>) -> Result<String> {
    let src = props.require("img", "src")?;
    ctx.images().check(src)?;

    let alt = props.get("alt").unwrap_or_default();
    let width = props.number("img", "width")?;
    let height = props.number("img", "height")?;

    let mut html = String::from(r#"<figure class="image"><img"#);
    html.push_str(&attr("src", src));
    html.push_str(&attr("alt", alt));
    html.push_str(&opt_attr("title", props.get("title")));
    if let Some(width) = width {
        html.push_str(&format!(r#" width="{width}""#));
    }
    if let Some(height) = height {
        html.push_str(&format!(r#" height="{height}""#));
    }
    html.push_str(r#" loading="lazy" decoding="async">"#);

    if let Some(caption) = props.get("title").or(props.get("alt")) {
        html.push_str(&format!(
            "<figcaption>{}</figcaption>",
            escape_html(caption)
        ));
    }

    Ok(html)
}

/// Opening fragment of `GithubRepo`: a card linking to the repository with its
/// OpenGraph preview.
pub fn github_repo_open(props: &Props, ctx: &mut RenderContext<'_>) -> Result<String> {
    let repo = props.require("GithubRepo", "repo")?;
    validate_repo(repo)?;

    let preview = format!("https://opengraph.githubassets.com/1/{repo}");
    ctx.images().check(&preview)?;

    Ok(format!(
        r#"<a class="github-repo"{href} target="_blank" rel="noopener noreferrer"><img class="github-repo-preview"{src}{alt} width="1200" height="600" loading="lazy" decoding="async"><span class="github-repo-name">{name}</span>"#,
        href = attr("href", &format!("https://github.com/{repo}")),
        src = attr("src", &preview),
        alt = attr("alt", repo),
        name = escape_html(repo),
    ))
}

fn validate_repo(repo: &str) -> Result<()> {
    let valid_part = |part: &str| {
        !part.is_empty()
            && part
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    };

    match repo.split_once('/') {
        Some((owner, name)) if valid_part(owner) && valid_part(name) => Ok(()),
        _ => Err(ComponentError::InvalidProp {
            component: "GithubRepo",
            prop: "repo",
            value: repo.to_string(),
            reason: "expected `owner/name`",
        }),
    }
}
