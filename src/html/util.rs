//! Low-level HTML helpers used when building the document tree.
//!
//! - `is_void_element()` - Elements that never own children (img, image, ...)
//! - `start_tag_end()` - End offset of a start tag, quote-aware
//! - `stray_end_tag()` - Length of a matching `</tag>` right after a void start tag
//! - `matching_end_tag()` - Locate the end tag closing an element
//! - `parse_attributes()` - Attributes of a raw start tag
//! - `unescape()` - Decode character references in attribute values

use std::borrow::Cow;
use std::ops::Range;

// =============================================================================
// Element Classification
// =============================================================================

/// Check if an HTML tag is a void element.
///
/// `image` is included because HTML parsers treat it as an alias of `img`.
#[inline]
pub fn is_void_element(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "image"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "source"
            | "track"
            | "wbr"
    )
}

/// Elements whose content is never scanned for references.
///
/// Script, style and textarea hold raw text; template content is inert.
#[inline]
pub fn is_opaque_element(tag: &str) -> bool {
    matches!(tag, "script" | "style" | "textarea" | "template")
}

/// Elements whose content ends at the first `</tag`, whatever it contains.
#[inline]
fn is_raw_text_element(tag: &str) -> bool {
    matches!(tag, "script" | "style" | "textarea" | "title")
}

// =============================================================================
// Start Tag Scanning
// =============================================================================

/// Find the exclusive end offset of the start tag beginning at `start`.
///
/// `source[start]` must be `<`. Quotes only open after `=`, so an apostrophe
/// inside an unquoted value does not swallow the rest of the document.
/// Returns `source.len()` for an unterminated tag.
pub fn start_tag_end(source: &str, start: usize) -> usize {
    let bytes = source.as_bytes();
    let mut quote: Option<u8> = None;
    let mut after_eq = false;

    for (i, &b) in bytes.iter().enumerate().skip(start + 1) {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => continue,
            None => match b {
                b'>' => return i + 1,
                b'"' | b'\'' if after_eq => {
                    quote = Some(b);
                    after_eq = false;
                    continue;
                }
                _ => {}
            },
        }
        if !b.is_ascii_whitespace() {
            after_eq = b == b'=';
        }
    }

    source.len()
}

/// Length of a `</tag>` found exactly at `offset`, compared case-insensitively.
///
/// Returns 0 when there is none.
pub fn stray_end_tag(source: &str, offset: usize, tag: &str) -> usize {
    let Some(rest) = source.get(offset..) else {
        return 0;
    };
    let Some(name) = rest.strip_prefix("</") else {
        return 0;
    };
    let Some(candidate) = name.get(..tag.len()) else {
        return 0;
    };
    if !candidate.eq_ignore_ascii_case(tag) {
        return 0;
    }

    let after = &name[tag.len()..];
    let trimmed = after.trim_start_matches(|c: char| c.is_ascii_whitespace());
    if trimmed.starts_with('>') {
        2 + tag.len() + (after.len() - trimmed.len()) + 1
    } else {
        0
    }
}

/// Byte range of the end tag closing a `tag` element whose start tag ends at `from`.
///
/// Nested elements of the same name are counted and comments are skipped.
/// Returns `None` when the element is never closed.
pub fn matching_end_tag(source: &str, from: usize, tag: &str) -> Option<Range<usize>> {
    let raw_text = is_raw_text_element(tag);
    let mut depth = 1usize;
    let mut pos = from;

    while let Some(found) = source.get(pos..)?.find('<') {
        let at = pos + found;
        let rest = &source[at..];

        if !raw_text && rest.starts_with("<!--") {
            pos = rest.find("-->").map_or(source.len(), |end| at + end + 3);
            continue;
        }

        if let Some(after) = rest.strip_prefix("</") {
            if names_tag(after, tag) {
                let close = start_tag_end(source, at);
                depth -= 1;
                if depth == 0 {
                    return Some(at..close);
                }
                pos = close;
                continue;
            }
        } else if !raw_text && names_tag(&rest[1..], tag) {
            let open_end = start_tag_end(source, at);
            if !source[at..open_end].ends_with("/>") {
                depth += 1;
            }
            pos = open_end;
            continue;
        }

        pos = at + 1;
    }

    None
}

/// `s` starts with `tag` (ASCII case-insensitive) followed by a name boundary.
fn names_tag(s: &str, tag: &str) -> bool {
    let Some(name) = s.get(..tag.len()) else {
        return false;
    };
    name.eq_ignore_ascii_case(tag)
        && s[tag.len()..]
            .chars()
            .next()
            .is_none_or(|c| c.is_ascii_whitespace() || c == '/' || c == '>')
}

// =============================================================================
// Attributes
// =============================================================================

/// Parse the attributes of a raw start tag such as `<image inline src="a.svg">`.
///
/// Names are lower-cased and values unescaped. An attribute without `=` has
/// no value.
pub fn parse_attributes(start_tag: &str) -> Vec<(String, Option<String>)> {
    let inner = start_tag.strip_prefix('<').unwrap_or(start_tag);
    let inner = inner.strip_suffix('>').unwrap_or(inner);
    // Skip the tag name
    let body = inner
        .find(|c: char| c.is_ascii_whitespace() || c == '/')
        .map_or("", |i| &inner[i..]);

    let mut attrs = Vec::new();
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        if c.is_ascii_whitespace() || c == '/' {
            continue;
        }

        // Read attribute name
        let mut name = String::from(c);
        while let Some(&next) = chars.peek() {
            if next == '=' || next == '/' || next.is_ascii_whitespace() {
                break;
            }
            name.push(next);
            chars.next();
        }

        while chars.peek().is_some_and(char::is_ascii_whitespace) {
            chars.next();
        }

        if chars.peek() != Some(&'=') {
            // Boolean attribute
            attrs.push((name.to_ascii_lowercase(), None));
            continue;
        }
        chars.next(); // consume '='

        while chars.peek().is_some_and(char::is_ascii_whitespace) {
            chars.next();
        }

        let value: String = match chars.peek() {
            Some(&quote) if quote == '"' || quote == '\'' => {
                chars.next();
                chars.by_ref().take_while(|&c| c != quote).collect()
            }
            _ => {
                let mut value = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_whitespace() {
                        break;
                    }
                    value.push(c);
                    chars.next();
                }
                value
            }
        };

        attrs.push((name.to_ascii_lowercase(), Some(unescape(&value).into_owned())));
    }

    attrs
}

// =============================================================================
// Character References
// =============================================================================

/// Decode character references (`&amp;`, `&#39;`, `&#x2F;`).
///
/// Unknown or malformed references are kept verbatim.
pub fn unescape(s: &str) -> Cow<'_, str> {
    if !s.contains('&') {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(amp) = rest.find('&') {
        result.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let decoded = rest
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| decode_reference(&rest[1..semi]).map(|c| (c, semi)));

        match decoded {
            Some((c, semi)) => {
                result.push(c);
                rest = &rest[semi + 1..];
            }
            None => {
                result.push('&');
                rest = &rest[1..];
            }
        }
    }
    result.push_str(rest);

    Cow::Owned(result)
}

fn decode_reference(entity: &str) -> Option<char> {
    match entity {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{00A0}'),
        _ => {
            let num = entity.strip_prefix('#')?;
            let code = match num.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => num.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_void_elements() {
        assert!(is_void_element("image"));
        assert!(is_void_element("img"));
        assert!(is_void_element("br"));
        assert!(!is_void_element("div"));
        assert!(!is_void_element("svg"));
    }

    #[test]
    fn test_start_tag_end_simple() {
        let html = r#"<div><image inline src="icon.svg"></div>"#;
        assert_eq!(start_tag_end(html, 5), 34);
        assert_eq!(&html[5..34], r#"<image inline src="icon.svg">"#);
    }

    #[test]
    fn test_start_tag_end_quoted_gt() {
        let html = r#"<image alt="a > b" inline src='x.svg'>tail"#;
        let end = start_tag_end(html, 0);
        assert_eq!(&html[end..], "tail");
    }

    #[test]
    fn test_start_tag_end_apostrophe_in_unquoted_value() {
        let html = "<image inline src=it's.svg>rest";
        let end = start_tag_end(html, 0);
        assert_eq!(&html[end..], "rest");
    }

    #[test]
    fn test_start_tag_end_unterminated() {
        let html = "<image inline src=\"a.svg\"";
        assert_eq!(start_tag_end(html, 0), html.len());
    }

    #[test]
    fn test_stray_end_tag() {
        let html = "<image inline></image>after";
        assert_eq!(stray_end_tag(html, 14, "image"), 8);
        assert_eq!(stray_end_tag("</IMAGE >", 0, "image"), 9);
        assert_eq!(stray_end_tag("</img>", 0, "image"), 0);
        assert_eq!(stray_end_tag("</imagery>", 0, "image"), 0);
        assert_eq!(stray_end_tag("text", 0, "image"), 0);
        assert_eq!(stray_end_tag("", 5, "image"), 0);
    }

    #[test]
    fn test_opaque_elements() {
        assert!(is_opaque_element("script"));
        assert!(is_opaque_element("template"));
        assert!(!is_opaque_element("div"));
    }

    #[test]
    fn test_matching_end_tag() {
        let html = r#"<div><image inline src="icon.svg"></div>"#;
        assert_eq!(matching_end_tag(html, 5, "div"), Some(34..40));
    }

    #[test]
    fn test_matching_end_tag_nested_and_comments() {
        let html = "<div><div></div><!-- </div> --><DIV/></div >tail";
        let close = matching_end_tag(html, 5, "div").unwrap();
        assert_eq!(&html[close.end..], "tail");
        assert_eq!(&html[close], "</div >");

        assert_eq!(matching_end_tag("<section><p></p>", 9, "section"), None);
        assert_eq!(matching_end_tag("<divx></divx>", 6, "div"), None);
    }

    #[test]
    fn test_matching_end_tag_raw_text() {
        let html = "<script>if (a <script) { '<!--' }</script>after";
        let close = matching_end_tag(html, 8, "script").unwrap();
        assert_eq!(&html[close.end..], "after");
    }

    #[test]
    fn test_parse_attributes() {
        let attrs = parse_attributes(r#"<image inline src="icon.svg">"#);
        assert_eq!(
            attrs,
            [
                ("inline".to_owned(), None),
                ("src".to_owned(), Some("icon.svg".to_owned()))
            ]
        );
    }

    #[test]
    fn test_parse_attributes_forms() {
        let attrs = parse_attributes("<IMAGE Inline='' SRC = a&amp;b.svg alt=\"x > y\"/>");
        assert_eq!(
            attrs,
            [
                ("inline".to_owned(), Some(String::new())),
                ("src".to_owned(), Some("a&b.svg".to_owned())),
                ("alt".to_owned(), Some("x > y".to_owned()))
            ]
        );
        assert!(parse_attributes("<br>").is_empty());
        assert!(parse_attributes("<br/>").is_empty());
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape("icons/a.svg"), "icons/a.svg");
        assert_eq!(unescape("a&amp;b.svg"), "a&b.svg");
        assert_eq!(unescape("&lt;svg&gt;"), "<svg>");
        assert_eq!(unescape("&#39;"), "'");
        assert_eq!(unescape("&#x2F;icons"), "/icons");
        assert_eq!(unescape("&nbsp;"), "\u{00A0}");
    }

    #[test]
    fn test_unescape_keeps_unknown() {
        assert_eq!(unescape("a & b"), "a & b");
        assert_eq!(unescape("&bogus;"), "&bogus;");
        assert_eq!(unescape("&#xZZ;"), "&#xZZ;");
        assert_eq!(unescape("trailing &"), "trailing &");
    }
}
