//! Byte-exact span replacement.

use super::document::Span;

/// Replace `span` of `html` with `replacement`, leaving every other byte intact.
///
/// `span` must fit `html` (see [`Span::fits`]).
pub fn splice(html: &str, span: Span, replacement: &str) -> String {
    let mut out = String::with_capacity(html.len() - span.len() + replacement.len());
    out.push_str(&html[..span.start]);
    out.push_str(replacement);
    out.push_str(&html[span.end..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splice_replaces_span() {
        let html = r#"<div><image inline src="icon.svg"></div>"#;
        let out = splice(html, Span::new(5, 34), "<svg>...</svg>");
        assert_eq!(out, "<div><svg>...</svg></div>");
    }

    #[test]
    fn test_splice_preserves_prefix_and_suffix() {
        let html = "  prefix <x> suffix\n\t";
        let out = splice(html, Span::new(9, 12), "REPLACED");
        assert!(out.starts_with("  prefix "));
        assert!(out.ends_with(" suffix\n\t"));
        assert_eq!(out, "  prefix REPLACED suffix\n\t");
    }

    #[test]
    fn test_splice_edges() {
        assert_eq!(splice("abc", Span::new(0, 0), "x"), "xabc");
        assert_eq!(splice("abc", Span::new(3, 3), "x"), "abcx");
        assert_eq!(splice("abc", Span::new(0, 3), ""), "");
    }

    #[test]
    fn test_splice_multibyte_neighbours() {
        let html = "é<image inline>ü";
        let start = "é".len();
        let end = start + "<image inline>".len();
        assert_eq!(splice(html, Span::new(start, end), "<svg/>"), "é<svg/>ü");
    }
}
