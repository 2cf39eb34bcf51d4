//! The welcome panel at the top of the index page.

use crate::html::attr;

/// An outbound profile link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SocialLink {
    /// Accessible name of the link.
    pub label: &'static str,
    pub href: &'static str,
    /// Whether the label is printed next to the icon.
    pub show_label: bool,
    /// SVG path data of the icon, on a 24x24 view box.
    pub icon: &'static str,
}

const SOCIAL_LINKS: [SocialLink; 3] = [
    SocialLink {
        label: "Github",
        href: "https://github.com/whexy",
        show_label: true,
        icon: "M12 2A10 10 0 0 0 2 12c0 4.42 2.87 8.17 6.84 9.5c.5.08.66-.23.66-.5v-1.69c-2.77.6-3.36-1.34-3.36-1.34c-.46-1.16-1.11-1.47-1.11-1.47c-.91-.62.07-.6.07-.6c1 .07 1.53 1.03 1.53 1.03c.87 1.52 2.34 1.07 2.91.83c.09-.65.35-1.09.63-1.34c-2.22-.25-4.55-1.11-4.55-4.92c0-1.11.38-2 1.03-2.71c-.1-.25-.45-1.29.1-2.64c0 0 .84-.27 2.75 1.02c.79-.22 1.65-.33 2.5-.33c.85 0 1.71.11 2.5.33c1.91-1.29 2.75-1.02 2.75-1.02c.55 1.35.2 2.39.1 2.64c.65.71 1.03 1.6 1.03 2.71c0 3.82-2.34 4.66-4.57 4.91c.36.31.69.92.69 1.85V21c0 .27.16.59.67.5C19.14 20.16 22 16.42 22 12A10 10 0 0 0 12 2Z",
    },
    SocialLink {
        label: "Twitter",
        href: "https://twitter.com/whexyshi",
        show_label: false,
        icon: "M22.46 6c-.77.35-1.6.58-2.46.69c.88-.53 1.56-1.37 1.88-2.38c-.83.5-1.75.85-2.72 1.05C18.37 4.5 17.26 4 16 4c-2.35 0-4.27 1.92-4.27 4.29c0 .34.04.67.11.98C8.28 9.09 5.11 7.38 3 4.79c-.37.63-.58 1.37-.58 2.15c0 1.49.75 2.81 1.91 3.56c-.71 0-1.37-.2-1.95-.5v.03c0 2.08 1.48 3.82 3.44 4.21a4.22 4.22 0 0 1-1.93.07a4.28 4.28 0 0 0 4 2.98a8.521 8.521 0 0 1-5.33 1.84c-.34 0-.68-.02-1.02-.06C3.44 20.29 5.7 21 8.12 21C16 21 20.33 14.46 20.33 8.79c0-.19 0-.37-.01-.56c.84-.6 1.56-1.36 2.14-2.23Z",
    },
    SocialLink {
        label: "Mastodon",
        href: "https://mastodon.social/@whexy",
        show_label: false,
        icon: "M20.94 14c-.28 1.41-2.44 2.96-4.97 3.26c-1.31.15-2.6.3-3.97.24c-2.25-.11-4-.54-4-.54v.62c.32 2.22 2.22 2.35 4.03 2.42c1.82.05 3.44-.46 3.44-.46l.08 1.65s-1.28.68-3.55.81c-1.25.07-2.81-.03-4.62-.5c-3.92-1.05-4.6-5.24-4.7-9.5l-.01-3.43c0-4.34 2.83-5.61 2.83-5.61C6.95 2.3 9.41 2 11.97 2h.06c2.56 0 5.02.3 6.47.96c0 0 2.83 1.27 2.83 5.61c0 0 .04 3.21-.39 5.43M18 8.91c0-1.08-.3-1.91-.85-2.56c-.56-.63-1.3-.96-2.23-.96c-1.06 0-1.87.41-2.42 1.23l-.5.88l-.5-.88c-.56-.82-1.36-1.23-2.43-1.23c-.92 0-1.66.33-2.23.96C6.29 7 6 7.83 6 8.91v5.26h2.1V9.06c0-1.06.45-1.62 1.36-1.62c1 0 1.5.65 1.5 1.93v2.79h2.07V9.37c0-1.28.5-1.93 1.51-1.93c.9 0 1.35.56 1.35 1.62v5.11H18V8.91Z",
    },
];

/// The fixed profile panel. It takes no input.
#[derive(Debug, Clone, Copy, Default)]
pub struct WelcomePanel;

impl WelcomePanel {
    pub const NAME: &'static str = "Whexy";
    pub const AFFILIATION_PREFIX: &'static str = "CS PhD student at ";
    pub const AFFILIATION: &'static str = "Northwestern";
    pub const AVATAR_SRC: &'static str = "/img/face.png";
    pub const AVATAR_ALT: &'static str = "a photo of Whexy";
    pub const HOMEPAGE: &'static str = "https://shiwx.org";

    /// The three outbound profile links, in display order.
    pub fn social_links() -> &'static [SocialLink; 3] {
        &SOCIAL_LINKS
    }

    /// Render the panel markup.
    pub fn to_html() -> String {
        let links: String = Self::social_links()
            .iter()
            .map(|link| {
                let label = if link.show_label {
                    format!("<span>{}</span>", link.label)
                } else {
                    String::new()
                };
                format!(
                    r#"<a class="social-link"{href}{aria}><svg xmlns="http://www.w3.org/2000/svg" aria-hidden="true" width="24" height="24" viewBox="0 0 24 24"><path fill="currentColor" d="{icon}"/></svg>{label}</a>"#,
                    href = attr("href", link.href),
                    aria = attr("aria-label", link.label),
                    icon = link.icon,
                )
            })
            .collect::<Vec<_>>()
            .join("\n        ");

        format!(
            r#"<section class="welcome">
  <div class="welcome-panel">
    <div>
      <h1 class="welcome-name">{name}</h1>
      <p class="welcome-affiliation"><span class="muted">{prefix}</span>{affiliation}</p>
      <div class="social-links">
        {links}
      </div>
    </div>
    <a class="welcome-avatar"{homepage}><img{avatar}{avatar_alt} width="120" height="120"></a>
  </div>
</section>"#,
            name = Self::NAME,
            prefix = Self::AFFILIATION_PREFIX,
            affiliation = Self::AFFILIATION,
            homepage = attr("href", Self::HOMEPAGE),
            avatar = attr("src", Self::AVATAR_SRC),
            avatar_alt = attr("alt", Self::AVATAR_ALT),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exactly_three_social_links() {
        let hrefs: Vec<_> = WelcomePanel::social_links()
            .iter()
            .map(|l| l.href)
            .collect();
        assert_eq!(
            hrefs,
            [
                "https://github.com/whexy",
                "https://twitter.com/whexyshi",
                "https://mastodon.social/@whexy",
            ]
        );
    }

    #[test]
    fn test_rendered_links() {
        let html = WelcomePanel::to_html();
        assert_eq!(html.matches(r#"class="social-link""#).count(), 3);
        for link in WelcomePanel::social_links() {
            assert!(html.contains(&format!(r#"href="{}""#, link.href)));
        }
    }

    #[test]
    fn test_rendered_profile() {
        let html = WelcomePanel::to_html();
        assert!(html.contains(r#"<h1 class="welcome-name">Whexy</h1>"#));
        assert!(html.contains("CS PhD student at </span>Northwestern"));
        assert!(html.contains(r#"src="/img/face.png" alt="a photo of Whexy""#));
        assert!(html.contains(r#"href="https://shiwx.org""#));
        assert!(html.contains("<span>Github</span>"));
    }

    #[test]
    fn test_render_is_stable() {
        assert_eq!(WelcomePanel::to_html(), WelcomePanel::to_html());
    }
}
