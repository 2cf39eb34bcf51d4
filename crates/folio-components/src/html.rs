//! Small HTML helpers shared by components and page templates.

/// Escape HTML special characters in text and attribute values.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Render ` name="value"` with the value escaped.
pub fn attr(name: &str, value: &str) -> String {
    format!(r#" {name}="{}""#, escape_html(value))
}

/// Render an attribute only when a value is present.
pub fn opt_attr(name: &str, value: Option<&str>) -> String {
    value.map(|v| attr(name, v)).unwrap_or_default()
}
