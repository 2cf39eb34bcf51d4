//! Markdown and MDX rendering with pulldown-cmark.

use std::{
    borrow::Cow,
    collections::HashMap,
    path::{Path, PathBuf},
};

use folio_components::{
    Component, ComponentError, ComponentRegistry, Props, RenderContext, html::escape_html,
};
use folio_core::{
    ContentType, ImagePolicy,
    content::{ParsedContent, TocEntry},
    frontmatter::parse_frontmatter,
};
use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use thiserror::Error;

use crate::{
    ParserOptions,
    mdx::{self, MdxError, MdxExpander, UnknownTagPolicy},
    syntax::SyntaxHighlighter,
};

/// Markdown parsing errors.
#[derive(Debug, Error)]
pub enum MarkdownError {
    /// Failed to parse frontmatter.
    #[error("frontmatter error: {0}")]
    Frontmatter(#[from] folio_core::CoreError),

    /// Component expansion failed.
    #[error("{}: {source}", .path.display())]
    Mdx {
        path: PathBuf,
        #[source]
        source: MdxError,
    },

    /// A Markdown image was rejected.
    #[error("{}: image: {source}", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: ComponentError,
    },
}

/// Result type for markdown operations.
pub type Result<T> = std::result::Result<T, MarkdownError>;

/// Markdown parser with syntax highlighting and component expansion.
#[derive(Debug)]
pub struct MarkdownParser {
    highlighter: SyntaxHighlighter,
    options: Options,
    images: ImagePolicy,
    unknown_tags: UnknownTagPolicy,
}

impl Default for MarkdownParser {
    fn default() -> Self {
        Self::new()
    }
}

struct HeadingState {
    level: u8,
    explicit_id: Option<String>,
    text: String,
    id_at: usize,
}

struct ImageState {
    src: String,
    title: String,
    alt: String,
}

impl MarkdownParser {
    /// Create a parser with default options.
    pub fn new() -> Self {
        Self::with_options(&ParserOptions::default())
    }

    /// Create a parser from explicit options.
    pub fn with_options(opts: &ParserOptions) -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_HEADING_ATTRIBUTES);

        Self {
            highlighter: SyntaxHighlighter::new(&opts.syntax_theme),
            options,
            images: opts.images.clone(),
            unknown_tags: opts.unknown_tags,
        }
    }

    /// Parse a document with frontmatter. The dialect follows the file
    /// extension; unknown extensions are treated as plain Markdown.
    pub fn parse(&self, content: &str, path: &Path) -> Result<ParsedContent> {
        let content_type = ContentType::from_path(path).unwrap_or(ContentType::Markdown);
        self.parse_as(content, path, content_type)
    }

    /// Parse a document with frontmatter as the given dialect.
    pub fn parse_as(
        &self,
        content: &str,
        path: &Path,
        content_type: ContentType,
    ) -> Result<ParsedContent> {
        let (frontmatter, body) = parse_frontmatter(content, path)?;
        let (html, toc) = self.render(&body, content_type, path)?;

        Ok(ParsedContent {
            frontmatter,
            html,
            raw: body,
            toc,
        })
    }

    /// Render a Markdown body without frontmatter.
    pub fn parse_body(&self, body: &str) -> Result<(String, Vec<TocEntry>)> {
        self.render(body, ContentType::Markdown, Path::new("<body>"))
    }

    /// Render an MDX body without frontmatter.
    pub fn parse_mdx_body(&self, body: &str) -> Result<(String, Vec<TocEntry>)> {
        self.render(body, ContentType::Mdx, Path::new("<body>"))
    }

    /// Render a body to HTML with TOC extraction.
    fn render(
        &self,
        body: &str,
        content_type: ContentType,
        path: &Path,
    ) -> Result<(String, Vec<TocEntry>)> {
        let mdx_error = |source| MarkdownError::Mdx {
            path: path.to_path_buf(),
            source,
        };

        let source = if content_type.expands_components() {
            Cow::Owned(mdx::isolate_block_tags(body))
        } else {
            Cow::Borrowed(body)
        };

        let mut ctx = RenderContext::new(&self.images);
        let mut expander = content_type
            .expands_components()
            .then(|| MdxExpander::new(ComponentRegistry::global(), self.unknown_tags, path));

        let mut toc = Vec::new();
        let mut used_ids: HashMap<String, usize> = HashMap::new();
        let mut html = String::new();
        let mut heading: Option<HeadingState> = None;
        let mut image: Option<ImageState> = None;
        let mut code_block: Option<Option<String>> = None;
        let mut code_block_content = String::new();
        let mut in_table_head = false;

        for event in Parser::new_ext(&source, self.options) {
            // Image alt text is collected, not rendered.
            if image.is_some() {
                match event {
                    Event::End(TagEnd::Image) => {
                        if let Some(img) = image.take() {
                            let rendered = render_image(img, &mut ctx).map_err(|source| {
                                MarkdownError::Image {
                                    path: path.to_path_buf(),
                                    source,
                                }
                            })?;
                            html.push_str(&rendered);
                        }
                    }
                    Event::Text(text) | Event::Code(text) => {
                        if let Some(img) = image.as_mut() {
                            img.alt.push_str(&text);
                        }
                    }
                    _ => {}
                }
                continue;
            }

            match event {
                Event::Start(Tag::Heading { level, id, .. }) => {
                    let lvl = level as u8;
                    html.push_str(&format!("<h{lvl}"));
                    heading = Some(HeadingState {
                        level: lvl,
                        explicit_id: id.map(|i| i.to_string()),
                        text: String::new(),
                        id_at: html.len(),
                    });
                    html.push('>');
                }

                Event::End(TagEnd::Heading(_)) => {
                    if let Some(state) = heading.take() {
                        let id = state
                            .explicit_id
                            .unwrap_or_else(|| unique_id(&slugify(&state.text), &mut used_ids));
                        html.insert_str(state.id_at, &format!(r#" id="{}""#, escape_html(&id)));
                        html.push_str(&format!("</h{}>\n", state.level));
                        toc.push(TocEntry {
                            level: state.level,
                            text: state.text,
                            id,
                        });
                    }
                }

                Event::Start(Tag::Image {
                    dest_url, title, ..
                }) => {
                    image = Some(ImageState {
                        src: dest_url.to_string(),
                        title: title.to_string(),
                        alt: String::new(),
                    });
                }

                Event::Start(Tag::CodeBlock(kind)) => {
                    code_block = Some(match kind {
                        CodeBlockKind::Fenced(lang) => {
                            let lang = lang.split_whitespace().next().unwrap_or_default();
                            (!lang.is_empty()).then(|| lang.to_string())
                        }
                        CodeBlockKind::Indented => None,
                    });
                    code_block_content.clear();
                }

                Event::End(TagEnd::CodeBlock) => {
                    let lang = code_block.take().flatten();
                    html.push_str(
                        &self
                            .highlighter
                            .highlight(&code_block_content, lang.as_deref()),
                    );
                    code_block_content.clear();
                }

                Event::Text(text) if code_block.is_some() => {
                    code_block_content.push_str(&text);
                }

                Event::Text(text) => {
                    if let Some(state) = heading.as_mut() {
                        state.text.push_str(&text);
                    }
                    html.push_str(&escape_html(&text));
                }

                Event::Code(code) => {
                    if let Some(state) = heading.as_mut() {
                        state.text.push_str(&code);
                    }
                    html.push_str(&format!("<code>{}</code>", escape_html(&code)));
                }

                Event::SoftBreak => html.push('\n'),
                Event::HardBreak => html.push_str("<br />\n"),

                Event::Start(Tag::TableHead) => {
                    in_table_head = true;
                    html.push_str("<thead><tr>");
                }
                Event::End(TagEnd::TableHead) => {
                    in_table_head = false;
                    html.push_str("</tr></thead>\n<tbody>\n");
                }
                Event::Start(Tag::TableCell) => {
                    html.push_str(if in_table_head { "<th>" } else { "<td>" });
                }
                Event::End(TagEnd::TableCell) => {
                    html.push_str(if in_table_head { "</th>" } else { "</td>" });
                }

                Event::Start(tag) => html.push_str(&tag_to_html_start(&tag)),
                Event::End(tag) => html.push_str(&tag_to_html_end(&tag)),

                Event::Html(raw) | Event::InlineHtml(raw) => match expander.as_mut() {
                    Some(expander) => {
                        html.push_str(&expander.expand(&raw, &mut ctx).map_err(mdx_error)?)
                    }
                    None => html.push_str(&raw),
                },

                Event::FootnoteReference(name) => {
                    let name = escape_html(&name);
                    html.push_str(&format!(
                        r##"<sup class="footnote-ref"><a href="#fn-{name}">[{name}]</a></sup>"##
                    ));
                }

                Event::Rule => html.push_str("<hr />\n"),

                Event::TaskListMarker(checked) => {
                    html.push_str(if checked {
                        r#"<input type="checkbox" checked disabled />"#
                    } else {
                        r#"<input type="checkbox" disabled />"#
                    });
                }

                Event::InlineMath(math) => {
                    html.push_str(&format!(
                        r#"<span class="math inline">\({}\)</span>"#,
                        escape_html(&math)
                    ));
                }

                Event::DisplayMath(math) => {
                    html.push_str(&format!(
                        r#"<div class="math display">\[{}\]</div>"#,
                        escape_html(&math)
                    ));
                }
            }
        }

        if let Some(expander) = expander {
            expander.finish().map_err(mdx_error)?;
        }

        Ok((html, toc))
    }
}

/// Markdown images always go through the `img` component.
fn render_image(
    img: ImageState,
    ctx: &mut RenderContext<'_>,
) -> std::result::Result<String, ComponentError> {
    let mut props = Props::new().with("src", img.src).with("alt", img.alt);
    if !img.title.is_empty() {
        props.insert("title", img.title);
    }
    Component::Img.render(&props, "", ctx)
}

/// Convert a pulldown-cmark tag to HTML opening tag.
fn tag_to_html_start(tag: &Tag) -> String {
    match tag {
        Tag::Paragraph => "<p>".to_string(),
        Tag::BlockQuote(_) => "<blockquote>\n".to_string(),
        Tag::List(Some(1)) => "<ol>\n".to_string(),
        Tag::List(Some(start)) => format!(r#"<ol start="{start}">"#),
        Tag::List(None) => "<ul>\n".to_string(),
        Tag::Item => "<li>".to_string(),
        Tag::FootnoteDefinition(name) => {
            format!(r#"<div class="footnote" id="fn-{}">"#, escape_html(name))
        }
        Tag::Table(_) => "<table>".to_string(),
        Tag::TableRow => "<tr>".to_string(),
        Tag::Emphasis => "<em>".to_string(),
        Tag::Strong => "<strong>".to_string(),
        Tag::Strikethrough => "<del>".to_string(),
        Tag::Link {
            dest_url, title, ..
        } => {
            let title_attr = if title.is_empty() {
                String::new()
            } else {
                format!(r#" title="{}""#, escape_html(title))
            };
            format!(r#"<a href="{}"{title_attr}>"#, escape_html(dest_url))
        }
        Tag::DefinitionList => "<dl>".to_string(),
        Tag::DefinitionListTitle => "<dt>".to_string(),
        Tag::DefinitionListDefinition => "<dd>".to_string(),
        Tag::Superscript => "<sup>".to_string(),
        Tag::Subscript => "<sub>".to_string(),
        // Headings, code blocks, images and table heads/cells are handled by
        // the render loop.
        Tag::Heading { .. }
        | Tag::CodeBlock(_)
        | Tag::Image { .. }
        | Tag::TableHead
        | Tag::TableCell
        | Tag::HtmlBlock
        | Tag::MetadataBlock(_) => String::new(),
    }
}

/// Convert a pulldown-cmark tag end to HTML closing tag.
fn tag_to_html_end(tag: &TagEnd) -> String {
    match tag {
        TagEnd::Paragraph => "</p>\n".to_string(),
        TagEnd::BlockQuote(_) => "</blockquote>\n".to_string(),
        TagEnd::List(true) => "</ol>\n".to_string(),
        TagEnd::List(false) => "</ul>\n".to_string(),
        TagEnd::Item => "</li>\n".to_string(),
        TagEnd::FootnoteDefinition => "</div>\n".to_string(),
        TagEnd::Table => "</tbody></table>\n".to_string(),
        TagEnd::TableRow => "</tr>\n".to_string(),
        TagEnd::Emphasis => "</em>".to_string(),
        TagEnd::Strong => "</strong>".to_string(),
        TagEnd::Strikethrough => "</del>".to_string(),
        TagEnd::Link => "</a>".to_string(),
        TagEnd::DefinitionList => "</dl>\n".to_string(),
        TagEnd::DefinitionListTitle => "</dt>\n".to_string(),
        TagEnd::DefinitionListDefinition => "</dd>\n".to_string(),
        TagEnd::Superscript => "</sup>".to_string(),
        TagEnd::Subscript => "</sub>".to_string(),
        TagEnd::Heading(_)
        | TagEnd::CodeBlock
        | TagEnd::Image
        | TagEnd::TableHead
        | TagEnd::TableCell
        | TagEnd::HtmlBlock
        | TagEnd::MetadataBlock(_) => String::new(),
    }
}

/// Convert heading text to an anchor id.
pub fn slugify(text: &str) -> String {
    let slug = text
        .to_lowercase()
        .chars()
        .filter_map(|c| {
            if c.is_alphanumeric() {
                Some(c)
            } else if c.is_whitespace() || c == '-' || c == '_' {
                Some('-')
            } else {
                None
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    if slug.is_empty() {
        "section".to_string()
    } else {
        slug
    }
}

/// Suffix repeated anchor ids with `-1`, `-2`, ...
fn unique_id(base: &str, used: &mut HashMap<String, usize>) -> String {
    let count = used.entry(base.to_string()).or_insert(0);
    let id = if *count == 0 {
        base.to_string()
    } else {
        format!("{base}-{count}")
    };
    *count += 1;
    id
}
