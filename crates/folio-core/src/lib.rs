//! Folio Core Library
//!
//! Core types, configuration, date handling and the image host policy for the
//! Folio blog builder.

pub mod config;
pub mod content;
pub mod date;
pub mod error;
pub mod frontmatter;
pub mod images;

pub use config::Config;
pub use content::{Article, ContentType, ParsedContent, Post, TocEntry};
pub use date::{DateError, DateLocale};
pub use error::{CoreError, Result};
pub use frontmatter::Frontmatter;
pub use images::{ImageError, ImagePolicy, ImageSource, RemotePattern};
