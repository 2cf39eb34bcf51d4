//! Trusted image hosts.
//!
//! Remote images referenced from posts and components are only emitted when
//! their host is declared here, either as an exact domain or as a remote
//! pattern with `*`/`**` wildcards.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Image policy errors.
#[derive(Debug, Error)]
pub enum ImageError {
    /// The source looked like an absolute URL but failed to parse.
    #[error("invalid image URL `{src}`: {source}")]
    InvalidUrl {
        src: String,
        #[source]
        source: url::ParseError,
    },

    /// Only http and https images can be loaded remotely.
    #[error("unsupported image scheme `{scheme}` in `{src}`")]
    UnsupportedScheme { src: String, scheme: String },

    /// The host is neither a configured domain nor matched by a pattern.
    #[error("image host `{host}` is not configured in [images] (src `{src}`)")]
    UntrustedHost { src: String, host: String },
}

/// Result type for image policy checks.
pub type Result<T> = std::result::Result<T, ImageError>;

/// Where an image is loaded from once it passed the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    /// Served from the site's own static tree.
    Local,
    /// Served by a trusted external host.
    Remote,
}

/// URL scheme accepted by a remote pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Http,
    Https,
}

impl Protocol {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

/// A wildcard description of trusted image URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemotePattern {
    /// Required scheme; any of http/https when unset.
    #[serde(default)]
    pub protocol: Option<Protocol>,

    /// Hostname glob. `*` matches one label, `**` one or more labels.
    pub hostname: String,

    /// Required port; any port when unset or empty.
    #[serde(default)]
    pub port: Option<String>,

    /// Path glob. `*` matches one segment, `**` any number of segments.
    #[serde(default)]
    pub pathname: Option<String>,
}

impl RemotePattern {
    /// Create a pattern matching `hostname` over any protocol.
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            protocol: None,
            hostname: hostname.into(),
            port: None,
            pathname: None,
        }
    }

    /// Restrict the pattern to one protocol.
    #[must_use]
    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = Some(protocol);
        self
    }

    /// Restrict the pattern to a path glob.
    #[must_use]
    pub fn with_pathname(mut self, pathname: impl Into<String>) -> Self {
        self.pathname = Some(pathname.into());
        self
    }

    /// Check whether a parsed URL matches this pattern.
    pub fn matches(&self, url: &Url) -> bool {
        if let Some(protocol) = self.protocol
            && url.scheme() != protocol.as_str()
        {
            return false;
        }

        if let Some(port) = self.port.as_deref().filter(|p| !p.is_empty()) {
            let actual = url.port().map(|p| p.to_string());
            if actual.as_deref() != Some(port) {
                return false;
            }
        }

        let Some(host) = url.host_str() else {
            return false;
        };
        let pattern = self.hostname.to_ascii_lowercase();
        let pattern_labels: Vec<&str> = pattern.split('.').collect();
        let host_labels: Vec<&str> = host.split('.').collect();
        if !glob_match(&pattern_labels, &host_labels, 1) {
            return false;
        }

        match self.pathname.as_deref() {
            Some(pathname) => {
                let pattern_segments: Vec<&str> = pathname.split('/').collect();
                let path_segments: Vec<&str> = url.path().split('/').collect();
                glob_match(&pattern_segments, &path_segments, 0)
            }
            None => true,
        }
    }
}

/// Segment-wise glob matching. `**` consumes at least `double_min` segments.
fn glob_match(pattern: &[&str], value: &[&str], double_min: usize) -> bool {
    match pattern.split_first() {
        None => value.is_empty(),
        Some((&"**", rest)) => (double_min..=value.len())
            .any(|skip| glob_match(rest, &value[skip..], double_min)),
        Some((&"*", rest)) => !value.is_empty() && glob_match(rest, &value[1..], double_min),
        Some((segment, rest)) => {
            value.first().is_some_and(|v| v == segment) && glob_match(rest, &value[1..], double_min)
        }
    }
}

/// The `[images]` configuration section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePolicy {
    /// Exact hostnames trusted over http and https.
    #[serde(default)]
    pub domains: Vec<String>,

    /// Wildcard patterns for trusted URLs.
    #[serde(default)]
    pub remote_patterns: Vec<RemotePattern>,
}

impl Default for ImagePolicy {
    fn default() -> Self {
        Self {
            domains: vec![
                "avatars.githubusercontent.com".to_string(), // GitHub avatars
                "opengraph.githubassets.com".to_string(),    // GitHub OpenGraph
                "i.scdn.co".to_string(),                     // Spotify album art
                "img.foreverblog.cn".to_string(),            // Forever Blog
                "img.cdn.whexy.com".to_string(),             // gallery
            ],
            remote_patterns: vec![
                RemotePattern::new("**.mzstatic.com").with_protocol(Protocol::Https), // Apple Music
                RemotePattern::new("**.hdslb.com"),                                  // bilibili
            ],
        }
    }
}

impl ImagePolicy {
    /// A policy that trusts no remote host.
    pub fn local_only() -> Self {
        Self {
            domains: Vec::new(),
            remote_patterns: Vec::new(),
        }
    }

    /// Check an image source against the policy.
    ///
    /// Relative and root-relative sources are local and always allowed.
    /// Protocol-relative sources (`//host/...`) are checked as https.
    pub fn check(&self, src: &str) -> Result<ImageSource> {
        let candidate = if src.starts_with("//") {
            format!("https:{src}")
        } else {
            src.to_string()
        };

        let url = match Url::parse(&candidate) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => return Ok(ImageSource::Local),
            Err(source) => {
                return Err(ImageError::InvalidUrl {
                    src: src.to_string(),
                    source,
                });
            }
        };

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ImageError::UnsupportedScheme {
                src: src.to_string(),
                scheme: url.scheme().to_string(),
            });
        }

        let host = url.host_str().unwrap_or_default();
        let trusted_domain = self
            .domains
            .iter()
            .any(|domain| domain.eq_ignore_ascii_case(host));

        if trusted_domain || self.remote_patterns.iter().any(|p| p.matches(&url)) {
            Ok(ImageSource::Remote)
        } else {
            Err(ImageError::UntrustedHost {
                src: src.to_string(),
                host: host.to_string(),
            })
        }
    }

    /// Whether `src` passes the policy.
    pub fn is_allowed(&self, src: &str) -> bool {
        self.check(src).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_sources_allowed() {
        let policy = ImagePolicy::local_only();
        assert_eq!(policy.check("/head/hello.png").unwrap(), ImageSource::Local);
        assert_eq!(policy.check("img/face.png").unwrap(), ImageSource::Local);
    }

    #[test]
    fn test_default_domains() {
        let policy = ImagePolicy::default();
        assert_eq!(
            policy
                .check("https://avatars.githubusercontent.com/u/1?v=4")
                .unwrap(),
            ImageSource::Remote
        );
        assert!(policy.is_allowed("http://i.scdn.co/image/abc"));
        assert!(policy.is_allowed("https://opengraph.githubassets.com/1/whexy/folio"));
        assert!(!policy.is_allowed("https://example.com/cat.png"));
    }

    #[test]
    fn test_double_star_hostname() {
        let policy = ImagePolicy::default();
        assert!(policy.is_allowed("https://is1-ssl.mzstatic.com/image/thumb/a.jpg"));
        assert!(policy.is_allowed("https://a.b.mzstatic.com/x.jpg"));
        // `**` needs at least one label in front of the suffix.
        assert!(!policy.is_allowed("https://mzstatic.com/x.jpg"));
        // Apple Music is https only; bilibili allows either.
        assert!(!policy.is_allowed("http://is1-ssl.mzstatic.com/x.jpg"));
        assert!(policy.is_allowed("http://i0.hdslb.com/bfs/archive/a.jpg"));
    }

    #[test]
    fn test_single_star_hostname() {
        let policy = ImagePolicy {
            domains: vec![],
            remote_patterns: vec![RemotePattern::new("*.example.com")],
        };
        assert!(policy.is_allowed("https://cdn.example.com/a.png"));
        assert!(!policy.is_allowed("https://a.cdn.example.com/a.png"));
    }

    #[test]
    fn test_pathname_and_port() {
        let mut pattern = RemotePattern::new("images.example.com").with_pathname("/account123/**");
        pattern.port = Some("8443".to_string());
        let policy = ImagePolicy {
            domains: vec![],
            remote_patterns: vec![pattern],
        };

        assert!(policy.is_allowed("https://images.example.com:8443/account123/a/b.png"));
        assert!(!policy.is_allowed("https://images.example.com:8443/other/b.png"));
        assert!(!policy.is_allowed("https://images.example.com/account123/b.png"));
    }

    #[test]
    fn test_protocol_relative_and_schemes() {
        let policy = ImagePolicy::default();
        assert!(policy.is_allowed("//i.scdn.co/image/abc"));
        assert!(matches!(
            policy.check("ftp://i.scdn.co/image/abc"),
            Err(ImageError::UnsupportedScheme { .. })
        ));
        assert!(matches!(
            policy.check("https://evil.test/a.png"),
            Err(ImageError::UntrustedHost { ref host, .. }) if host == "evil.test"
        ));
    }

    #[test]
    fn test_glob_match() {
        assert!(glob_match(&["**", "com"], &["a", "b", "com"], 1));
        assert!(!glob_match(&["**", "com"], &["com"], 1));
        assert!(glob_match(&["", "a", "**"], &["", "a"], 0));
        assert!(glob_match(&["*", "b"], &["a", "b"], 1));
        assert!(!glob_match(&["*", "b"], &["b"], 1));
    }

    #[test]
    fn test_policy_deserialize() {
        let policy: ImagePolicy = toml::from_str(
            r#"
domains = ["img.example.com"]

[[remote_patterns]]
protocol = "https"
hostname = "**.cdn.example.org"
"#,
        )
        .unwrap();

        assert_eq!(policy.domains, vec!["img.example.com"]);
        assert_eq!(policy.remote_patterns[0].protocol, Some(Protocol::Https));
        assert!(policy.is_allowed("https://a.cdn.example.org/x.png"));
    }
}
