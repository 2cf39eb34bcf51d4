//! Folio Components
//!
//! The component registry used while expanding post content, the post summary
//! card and the welcome panel shown on the index page. Everything here renders
//! to HTML strings.

pub mod builtin;
pub mod html;
pub mod post_card;
pub mod props;
pub mod registry;
pub mod welcome;

pub use post_card::{CardImage, PostCard};
pub use props::Props;
pub use registry::{Component, ComponentRegistry, RenderContext};
use thiserror::Error;
pub use welcome::{SocialLink, WelcomePanel};

/// Component rendering errors.
#[derive(Debug, Error)]
pub enum ComponentError {
    /// A required prop was not supplied.
    #[error("<{component}> requires the `{prop}` prop")]
    MissingProp {
        component: &'static str,
        prop: &'static str,
    },

    /// A prop was supplied with a value the component cannot use.
    #[error("<{component}> has invalid `{prop}` value `{value}`: {reason}")]
    InvalidProp {
        component: &'static str,
        prop: &'static str,
        value: String,
        reason: &'static str,
    },

    /// An image source was rejected by the image policy.
    #[error(transparent)]
    Image(#[from] folio_core::ImageError),
}

/// Result type for component rendering.
pub type Result<T> = std::result::Result<T, ComponentError>;
