//! Sanitization of model-generated HTML ahead of export.
//!
//! The canvas document normally renders inside a fully isolated surface.
//! Export parses it in a live browsing context instead, so scripts and
//! inline event handlers are stripped textually first.

use std::sync::LazyLock;

use regex::Regex;

static SCRIPT_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script.*?</script>").expect("valid regex"));
static ON_ATTR_DQUOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\son\w+\s*=\s*"[^"]*""#).expect("valid regex"));
static ON_ATTR_SQUOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\son\w+\s*=\s*'[^']*'").expect("valid regex"));
static ON_ATTR_BARE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\son\w+\s*=[^\s>]*").expect("valid regex"));

/// Strip every script element and inline event-handler attribute.
pub fn sanitize_for_export(html: &str) -> String {
    let html = SCRIPT_TAG.replace_all(html, "");
    let html = ON_ATTR_DQUOTE.replace_all(&html, "");
    let html = ON_ATTR_SQUOTE.replace_all(&html, "");
    ON_ATTR_BARE.replace_all(&html, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_script_elements() {
        let html = "<div>keep</div><script>alert(1)</script><p>also keep</p>";
        let out = sanitize_for_export(html);
        assert_eq!(out, "<div>keep</div><p>also keep</p>");
    }

    #[test]
    fn test_strips_scripts_with_attributes_and_newlines() {
        let html = "<script type=\"module\">\nlet x = 1;\n</script><b>x</b>";
        assert_eq!(sanitize_for_export(html), "<b>x</b>");
    }

    #[test]
    fn test_strips_inline_event_handlers() {
        let html = r#"<img src="a.png" onerror="alert(1)" onclick='go()' onload=boom>"#;
        let out = sanitize_for_export(html);
        assert_eq!(out, r#"<img src="a.png">"#);
    }

    #[test]
    fn test_leaves_ordinary_attributes_alone() {
        let html = r#"<div class="one" data-online="yes" style="color:red">hi</div>"#;
        assert_eq!(sanitize_for_export(html), html);
    }
}
