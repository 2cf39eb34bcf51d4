//! Component tag expansion for `.mdx` documents.
//!
//! Component tags reach the renderer as raw HTML events. Tags whose name
//! starts with an uppercase letter (plus `img`) are looked up in the
//! component registry and replaced by the component's markup. Everything
//! else in the raw HTML is passed through.

use std::{path::Path, sync::LazyLock};

use folio_components::{Component, ComponentError, ComponentRegistry, Props, RenderContext};
use regex::Regex;
use thiserror::Error;
use tracing::warn;

const NAME: &str = r"[A-Za-z][A-Za-z0-9_.]*";
const ATTR: &str = r#"[A-Za-z_:][-A-Za-z0-9_:.]*(?:\s*=\s*(?:"[^"]*"|'[^']*'|\{[^}]*\}))?"#;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"<(/?)({NAME})((?:\s+{ATTR})*)\s*(/?)>"))
        .expect("component tag pattern is valid")
});

static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"([A-Za-z_:][-A-Za-z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|\{([^}]*)\}))?"#,
    )
    .expect("attribute pattern is valid")
});

/// A line made only of component tags.
static TAG_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^\s*(?:</?(?:[A-Z][A-Za-z0-9_.]*|img)(?:\s+{ATTR})*\s*/?>\s*)+$"
    ))
    .expect("tag line pattern is valid")
});

/// The start of a component tag whose attributes continue on later lines.
static TAG_START_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*<[A-Z][A-Za-z0-9_.]*(?:\s[^>]*)?$").expect("tag start pattern is valid"));

/// MDX expansion errors.
#[derive(Debug, Error)]
pub enum MdxError {
    /// A capitalized tag that is not registered, in strict mode.
    #[error("unknown component <{tag}>")]
    UnknownComponent { tag: String },

    /// A closing tag that does not match the innermost open component.
    #[error("unexpected closing tag </{tag}> (open component: {})", .expected.unwrap_or("none"))]
    UnexpectedClose {
        tag: String,
        expected: Option<&'static str>,
    },

    /// A component still open at the end of the document.
    #[error("component <{tag}> is never closed")]
    Unclosed { tag: &'static str },

    /// A component failed to render.
    #[error("<{tag}>: {source}")]
    Component {
        tag: &'static str,
        #[source]
        source: ComponentError,
    },
}

/// Result type for MDX expansion.
pub type Result<T> = std::result::Result<T, MdxError>;

/// What to do with capitalized tags missing from the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownTagPolicy {
    /// Drop the tag markup, keep its children, log a warning.
    #[default]
    Drop,
    /// Fail the document.
    Reject,
}

impl UnknownTagPolicy {
    /// Map the `build.strict_components` flag.
    pub fn from_strict(strict: bool) -> Self {
        if strict { Self::Reject } else { Self::Drop }
    }
}

/// Parse JSX-style attributes.
///
/// Supports `a="v"`, `a='v'`, `a={"v"}`, `a={v}` and bare `a` (meaning
/// `"true"`).
pub fn parse_attributes(input: &str) -> Props {
    ATTR_RE
        .captures_iter(input)
        .map(|caps| {
            let name = caps[1].to_string();
            let value = if let Some(v) = caps.get(2).or(caps.get(3)) {
                v.as_str().to_string()
            } else if let Some(expr) = caps.get(4) {
                unquote_expression(expr.as_str())
            } else {
                "true".to_string()
            };
            (name, value)
        })
        .collect()
}

fn unquote_expression(expr: &str) -> String {
    let expr = expr.trim();
    for quote in ['"', '\'', '`'] {
        if let Some(inner) = expr
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner.to_string();
        }
    }
    expr.to_string()
}

/// Put every line consisting only of component tags into its own block.
///
/// CommonMark ends an HTML block at the next blank line only, so without this
/// the Markdown children of `<Callout>` would be swallowed as raw HTML.
/// Multi-line opening tags are joined onto one line. Fenced code is left
/// untouched.
pub fn isolate_block_tags(source: &str) -> String {
    let mut out = String::with_capacity(source.len() + 64);
    let mut fence: Option<&'static str> = None;
    let mut pending: Vec<&str> = Vec::new();

    for line in source.lines() {
        let trimmed = line.trim_start();

        if let Some(marker) = fence {
            if trimmed.starts_with(marker) {
                fence = None;
            }
            push_line(&mut out, line);
            continue;
        }

        if !pending.is_empty() {
            if trimmed.is_empty() {
                for raw in pending.drain(..) {
                    push_line(&mut out, raw);
                }
                push_line(&mut out, line);
                continue;
            }
            pending.push(line);
            let joined = pending
                .iter()
                .map(|l| l.trim())
                .collect::<Vec<_>>()
                .join(" ");
            if TAG_LINE_RE.is_match(&joined) {
                push_isolated(&mut out, &joined);
                pending.clear();
            }
            continue;
        }

        if trimmed.starts_with("```") {
            fence = Some("```");
            push_line(&mut out, line);
        } else if trimmed.starts_with("~~~") {
            fence = Some("~~~");
            push_line(&mut out, line);
        } else if TAG_LINE_RE.is_match(line) {
            push_isolated(&mut out, line.trim());
        } else if TAG_START_RE.is_match(line) {
            pending.push(line);
        } else {
            push_line(&mut out, line);
        }
    }

    for raw in pending {
        push_line(&mut out, raw);
    }

    out
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

fn push_isolated(out: &mut String, tags: &str) {
    if !out.is_empty() && !out.ends_with("\n\n") {
        out.push('\n');
    }
    out.push_str(tags);
    out.push_str("\n\n");
}

struct OpenComponent {
    component: Component,
    props: Props,
}

/// Expands component tags found in raw HTML chunks of one document.
///
/// Tracks open components across chunks so children rendered as ordinary
/// Markdown end up between the opening and closing fragments.
pub struct MdxExpander<'a> {
    registry: &'a ComponentRegistry,
    unknown_tags: UnknownTagPolicy,
    document: &'a Path,
    stack: Vec<OpenComponent>,
}

impl<'a> MdxExpander<'a> {
    /// Create an expander for `document`.
    pub fn new(
        registry: &'a ComponentRegistry,
        unknown_tags: UnknownTagPolicy,
        document: &'a Path,
    ) -> Self {
        Self {
            registry,
            unknown_tags,
            document,
            stack: Vec::new(),
        }
    }

    /// Number of components currently open.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Expand the component tags in one raw HTML chunk.
    pub fn expand(&mut self, raw: &str, ctx: &mut RenderContext<'_>) -> Result<String> {
        let mut out = String::with_capacity(raw.len());
        let mut last = 0;

        for caps in TAG_RE.captures_iter(raw) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            let name = &caps[2];
            if !is_component_name(name) {
                continue;
            }

            out.push_str(&raw[last..whole.start()]);
            last = whole.end();

            let closing = !caps[1].is_empty();
            let self_closing = !caps[4].is_empty();

            let Some(component) = self.registry.lookup(name) else {
                self.unknown(name)?;
                continue;
            };

            if closing {
                out.push_str(&self.close(component, name)?);
            } else {
                let props = parse_attributes(&caps[3]);
                if self_closing || component == Component::Img {
                    out.push_str(&render_error(component, component.render(&props, "", ctx))?);
                } else {
                    out.push_str(&render_error(component, component.open(&props, ctx))?);
                    self.stack.push(OpenComponent { component, props });
                }
            }
        }

        out.push_str(&raw[last..]);
        Ok(out)
    }

    /// Check that every component was closed.
    pub fn finish(self) -> Result<()> {
        match self.stack.last() {
            Some(open) => Err(MdxError::Unclosed {
                tag: open.component.name(),
            }),
            None => Ok(()),
        }
    }

    fn close(&mut self, component: Component, name: &str) -> Result<String> {
        if component == Component::Img {
            // `<img>` is void; its closing tag carries nothing.
            return Ok(String::new());
        }

        let expected = self.stack.last().map(|open| open.component);
        if expected == Some(component)
            && let Some(open) = self.stack.pop()
        {
            return Ok(open.component.close(&open.props));
        }

        Err(MdxError::UnexpectedClose {
            tag: name.to_string(),
            expected: expected.map(|c| c.name()),
        })
    }

    fn unknown(&self, name: &str) -> Result<()> {
        match self.unknown_tags {
            UnknownTagPolicy::Reject => Err(MdxError::UnknownComponent {
                tag: name.to_string(),
            }),
            UnknownTagPolicy::Drop => {
                warn!(
                    tag = name,
                    document = %self.document.display(),
                    "unknown component, rendering its children only"
                );
                Ok(())
            }
        }
    }
}

fn is_component_name(name: &str) -> bool {
    name == "img" || name.starts_with(|c: char| c.is_ascii_uppercase())
}

fn render_error(
    component: Component,
    result: folio_components::Result<String>,
) -> Result<String> {
    result.map_err(|source| MdxError::Component {
        tag: component.name(),
        source,
    })
}
