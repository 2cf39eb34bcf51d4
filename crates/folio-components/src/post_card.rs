//! Post summary card shown on the index page.

use folio_core::{DateError, DateLocale, Post};
use serde::Serialize;

use crate::html::{attr, escape_html};

/// Cover image of a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardImage {
    pub src: String,
    pub alt: String,
    pub width: u32,
    pub height: u32,
}

/// A clickable summary of one post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostCard {
    /// Link to the post detail page.
    pub href: String,
    pub image: CardImage,
    pub category: String,
    pub title: String,
    /// Publish date formatted for the configured locale.
    pub date: String,
}

impl PostCard {
    /// Cover image width in pixels.
    pub const IMAGE_WIDTH: u32 = 1024;
    /// Cover image height in pixels.
    pub const IMAGE_HEIGHT: u32 = 576;

    /// Build the card for `post`.
    ///
    /// Fails when the publish date is not ISO-8601. The other fields are
    /// taken as-is.
    pub fn new(post: &Post, locale: DateLocale) -> Result<Self, DateError> {
        let date = locale.format_iso(&post.publish_date)?;

        Ok(Self {
            href: post.url(),
            image: CardImage {
                src: post.cover_image(),
                alt: post.slug.clone(),
                width: Self::IMAGE_WIDTH,
                height: Self::IMAGE_HEIGHT,
            },
            category: post.category.clone(),
            title: post.title.clone(),
            date,
        })
    }

    /// Render the card markup.
    pub fn to_html(&self) -> String {
        format!(
            r#"<article class="post-card">
  <a{href}>
    <div class="post-card-cover">
      <img{src}{alt} width="{width}" height="{height}" loading="lazy" decoding="async">
    </div>
    <div class="post-card-body">
      <div>
        <p class="post-card-category">{category}</p>
        <h2 class="post-card-title">{title}</h2>
      </div>
      <div class="post-card-date">{date}</div>
    </div>
  </a>
</article>"#,
            href = attr("href", &self.href),
            src = attr("src", &self.image.src),
            alt = attr("alt", &self.image.alt),
            width = self.image.width,
            height = self.image.height,
            category = escape_html(&self.category),
            title = escape_html(&self.title),
            date = escape_html(&self.date),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Post {
        Post::new(
            "Hello World",
            "Life",
            "2023-05-01T00:00:00.000Z",
            "hello-world",
        )
    }

    #[test]
    fn test_card_fields() {
        let card = PostCard::new(&sample(), DateLocale::EnUs).unwrap();

        assert_eq!(card.href, "/posts/hello-world");
        assert_eq!(
            card.image,
            CardImage {
                src: "/head/hello-world.png".to_string(),
                alt: "hello-world".to_string(),
                width: 1024,
                height: 576,
            }
        );
        assert_eq!(card.category, "Life");
        assert_eq!(card.title, "Hello World");
        assert_eq!(card.date, "5/1/2023");
    }

    #[test]
    fn test_card_other_locales() {
        let card = PostCard::new(&sample(), DateLocale::De).unwrap();
        assert_eq!(card.date, "1.5.2023");
        let card = PostCard::new(&sample(), DateLocale::Iso).unwrap();
        assert_eq!(card.date, "2023-05-01");
    }

    #[test]
    fn test_invalid_date_fails() {
        let mut post = sample();
        post.publish_date = "not-a-date".to_string();
        let err = PostCard::new(&post, DateLocale::EnUs).unwrap_err();
        assert!(matches!(err, DateError::InvalidIso { .. }));
    }

    #[test]
    fn test_empty_fields_not_validated() {
        let post = Post::new("", "", "2023-05-01", "");
        let card = PostCard::new(&post, DateLocale::EnUs).unwrap();
        assert_eq!(card.href, "/posts/");
        assert_eq!(card.image.src, "/head/.png");
    }

    #[test]
    fn test_to_html_escapes() {
        let mut post = sample();
        post.title = "Rust & <Friends>".to_string();
        let html = PostCard::new(&post, DateLocale::EnUs).unwrap().to_html();

        assert!(html.contains(r#"<a href="/posts/hello-world">"#));
        assert!(html.contains(r#"src="/head/hello-world.png" alt="hello-world" width="1024" height="576""#));
        assert!(html.contains("Rust &amp; &lt;Friends&gt;"));
        assert!(html.contains(r#"<div class="post-card-date">5/1/2023</div>"#));
    }
}
