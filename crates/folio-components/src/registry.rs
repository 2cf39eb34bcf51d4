//! The component registry.
//!
//! Maps tag names used in post content to the closed set of components Folio
//! knows how to render. The map is built once and never changes afterwards.

use std::{collections::HashMap, sync::LazyLock};

use folio_core::ImagePolicy;

use crate::{Props, Result, builtin};

/// A renderable component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    /// Images, including every Markdown `![alt](src)`.
    Img,
    Quote,
    Small,
    Callout,
    /// Chat bubble on the left.
    Dialog,
    /// Chat bubble on the right.
    DialogBack,
    Step,
    GithubRepo,
    AnimatedFancyCard,
    WasmRiscvEmu,
}

impl Component {
    /// Every component, in registry order.
    pub const ALL: [Component; 10] = [
        Self::Img,
        Self::Quote,
        Self::Small,
        Self::Callout,
        Self::Dialog,
        Self::DialogBack,
        Self::Step,
        Self::GithubRepo,
        Self::AnimatedFancyCard,
        Self::WasmRiscvEmu,
    ];

    /// The tag name the component is registered under.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Img => "img",
            Self::Quote => "Quote",
            Self::Small => "Small",
            Self::Callout => "Callout",
            Self::Dialog => "Dialog",
            Self::DialogBack => "DialogBack",
            Self::Step => "Step",
            Self::GithubRepo => "GithubRepo",
            Self::AnimatedFancyCard => "AnimatedFancyCard",
            Self::WasmRiscvEmu => "WasmRiscvEmu",
        }
    }

    /// Render the opening fragment.
    pub fn open(&self, props: &Props, ctx: &mut RenderContext<'_>) -> Result<String> {
        match self {
            Self::Img => builtin::media::img_open(props, ctx),
            Self::Quote => Ok(builtin::text::quote_open()),
            Self::Small => Ok(builtin::text::small_open()),
            Self::Callout => Ok(builtin::text::callout_open(props)),
            Self::Dialog => builtin::dialog::open(builtin::dialog::Side::Left, props, ctx),
            Self::DialogBack => builtin::dialog::open(builtin::dialog::Side::Right, props, ctx),
            Self::Step => builtin::text::step_open(props, ctx),
            Self::GithubRepo => builtin::media::github_repo_open(props, ctx),
            Self::AnimatedFancyCard => Ok(builtin::embeds::fancy_card_open()),
            Self::WasmRiscvEmu => Ok(builtin::embeds::wasm_riscv_emu_open(props)),
        }
    }

    /// Render the closing fragment.
    pub fn close(&self, props: &Props) -> String {
        match self {
            Self::Img => "</figure>".to_string(),
            Self::Quote => builtin::text::quote_close(props),
            Self::Small => "</small>".to_string(),
            Self::Callout => "</div></aside>".to_string(),
            Self::Dialog | Self::DialogBack => "</div></div></div>".to_string(),
            Self::Step => "</div></section>".to_string(),
            Self::GithubRepo => "</a>".to_string(),
            Self::AnimatedFancyCard => "</div>".to_string(),
            Self::WasmRiscvEmu => "</div>".to_string(),
        }
    }

    /// Render the component around already-rendered children.
    ///
    /// Self-closing tags pass empty children.
    pub fn render(
        &self,
        props: &Props,
        children: &str,
        ctx: &mut RenderContext<'_>,
    ) -> Result<String> {
        let mut html = self.open(props, ctx)?;
        html.push_str(children);
        html.push_str(&self.close(props));
        Ok(html)
    }
}

/// Per-document rendering state.
#[derive(Debug)]
pub struct RenderContext<'a> {
    images: &'a ImagePolicy,
    step: u32,
}

impl<'a> RenderContext<'a> {
    /// Create a context for one document.
    pub fn new(images: &'a ImagePolicy) -> Self {
        Self { images, step: 0 }
    }

    /// The image policy remote sources are checked against.
    pub fn images(&self) -> &ImagePolicy {
        self.images
    }

    /// Advance the step counter. An explicit number resets the count.
    pub fn next_step(&mut self, explicit: Option<u32>) -> u32 {
        self.step = explicit.unwrap_or(self.step.saturating_add(1));
        self.step
    }
}

static GLOBAL: LazyLock<ComponentRegistry> = LazyLock::new(ComponentRegistry::new);

/// Immutable tag name to component map.
#[derive(Debug, Clone)]
pub struct ComponentRegistry {
    components: HashMap<&'static str, Component>,
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentRegistry {
    /// Build the registry with every built-in component.
    pub fn new() -> Self {
        let components = Component::ALL.iter().map(|c| (c.name(), *c)).collect();
        Self { components }
    }

    /// The process-wide registry.
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Look up a tag name. Tag names are case-sensitive.
    pub fn lookup(&self, tag: &str) -> Option<Component> {
        self.components.get(tag).copied()
    }

    /// Whether a tag is registered.
    pub fn contains(&self, tag: &str) -> bool {
        self.components.contains_key(tag)
    }

    /// Number of registered components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Registered tag names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.components.keys().copied().collect();
        names.sort_unstable();
        names
    }
}
