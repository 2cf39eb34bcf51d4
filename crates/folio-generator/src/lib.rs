//! Folio Generator Library
//!
//! Static site generation engine for Folio.
//!
//! # Modules
//!
//! - [`template`] - HTML page templates with variable interpolation
//! - [`html`] - index and post page generation
//! - [`collector`] - post collection and ordering
//! - [`rss`] - RSS feed generation
//! - [`assets`] - static asset copying
//! - [`build`] - build orchestration

pub mod assets;
pub mod build;
pub mod collector;
pub mod html;
pub mod rss;
pub mod template;

pub use assets::AssetProcessor;
pub use build::{BuildError, BuildStats, Builder};
pub use collector::{CollectorError, ContentCollector, SiteContent};
pub use html::{HtmlError, HtmlGenerator};
pub use rss::RssGenerator;
pub use template::{Template, TemplateContext, TemplateRegistry};
