//! Markup for the built-in components.

pub mod dialog;
pub mod embeds;
pub mod media;
pub mod text;
