//! Document tree built from the `tl` parser.
//!
//! `tl` hands out slices borrowed from the input, so every node's start offset
//! is recovered by pointer arithmetic against the source string. The resulting
//! tree owns its data and carries `[start, end)` byte spans.
//!
//! # Void elements
//!
//! `tl` does not know that `<image>` is void in HTML and may nest the following
//! content under it. The converter hoists such children back out as siblings,
//! so traversal order always matches document order.
//!
//! # Opaque elements
//!
//! The content of `script`, `style`, `textarea` and `template` becomes a single
//! text node, whatever tl made of it.

use std::fmt;

use super::util::{
    is_opaque_element, is_void_element, matching_end_tag, parse_attributes, start_tag_end,
    stray_end_tag,
};
use crate::error::InlineError;

// ============================================================================
// Span
// ============================================================================

/// Byte range `[start, end)` into the string a [`Document`] was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether this span can be sliced out of `source`.
    pub fn fits(&self, source: &str) -> bool {
        self.start <= self.end
            && self.end <= source.len()
            && source.is_char_boundary(self.start)
            && source.is_char_boundary(self.end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

// ============================================================================
// Nodes
// ============================================================================

/// A single attribute. Boolean attributes have no value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    pub name: String,
    pub value: Option<String>,
}

/// An element node with lower-cased tag and attribute names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<Attr>,
    pub children: Vec<Node>,
    pub span: Span,
}

impl Element {
    #[inline]
    pub fn is_tag(&self, tag: &str) -> bool {
        self.tag == tag
    }

    /// First attribute with the given name.
    pub fn attr(&self, name: &str) -> Option<&Attr> {
        self.attrs.iter().find(|a| a.name == name)
    }

    #[inline]
    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(Span),
    Comment(Span),
}

impl Node {
    pub fn span(&self) -> Span {
        match self {
            Self::Element(elem) => elem.span,
            Self::Text(span) | Self::Comment(span) => *span,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(elem) => Some(elem),
            _ => None,
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Self::Element(elem) => &elem.children,
            _ => &[],
        }
    }
}

// ============================================================================
// Document
// ============================================================================

/// Parsed HTML fragment. Spans refer to the string passed to [`Document::parse`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub nodes: Vec<Node>,
}

impl Document {
    pub fn parse(source: &str) -> Result<Self, InlineError> {
        let dom = tl::parse(source, tl::ParserOptions::default())
            .map_err(|e| InlineError::Parse(format!("{e:?}")))?;
        let nodes = convert_all(dom.children().iter(), dom.parser(), source);
        Ok(Self { nodes })
    }
}

/// Convert sibling handles, dropping nodes that fall inside an opaque element.
fn convert_all<'h>(
    handles: impl IntoIterator<Item = &'h tl::NodeHandle>,
    parser: &tl::Parser,
    source: &str,
) -> Vec<Node> {
    let mut nodes = Vec::new();
    for handle in handles {
        convert(*handle, parser, source, &mut nodes);
    }

    let mut covered = 0;
    nodes.retain(|node| {
        let span = node.span();
        if span.start < covered {
            return false;
        }
        if node.as_element().is_some_and(|e| is_opaque_element(&e.tag)) {
            covered = span.end;
        }
        true
    });
    nodes
}

/// Convert a tl node into `out`.
///
/// Only tag positions and nesting come from tl. Attributes and element ends
/// are read from the source text.
fn convert(handle: tl::NodeHandle, parser: &tl::Parser, source: &str, out: &mut Vec<Node>) {
    let Some(node) = handle.get(parser) else {
        return;
    };

    match node {
        tl::Node::Tag(tag) => {
            let raw = tag.raw().as_bytes();
            let Some(start) = offset_in(source, raw) else {
                return;
            };
            let open_end = start_tag_end(source, start);

            let name = tag.name().as_utf8_str().to_ascii_lowercase();
            let attrs = parse_attributes(&source[start..open_end])
                .into_iter()
                .map(|(name, value)| Attr { name, value })
                .collect();
            // Fragments of a start tag tl misread are not content.
            let children: Vec<_> = convert_all(tag.children().top().iter(), parser, source)
                .into_iter()
                .filter(|child| child.span().start >= open_end)
                .collect();

            if is_void_element(&name) {
                let end = open_end + stray_end_tag(source, open_end, &name);
                out.push(Node::Element(Element {
                    tag: name,
                    attrs,
                    children: Vec::new(),
                    span: Span::new(start, end),
                }));
                // Anything tl nested under a void element is a following sibling.
                out.extend(children);
                return;
            }

            let (content_end, end) = match matching_end_tag(source, open_end, &name) {
                Some(close) => (close.start, close.end),
                None => {
                    let end = children
                        .iter()
                        .map(|child| child.span().end)
                        .fold(open_end.max(start + raw.len()), usize::max);
                    (end, end)
                }
            };

            let (inside, after): (Vec<_>, Vec<_>) = children
                .into_iter()
                .partition(|child| child.span().start < end);
            let children = if !is_opaque_element(&name) {
                inside
            } else if content_end > open_end {
                vec![Node::Text(Span::new(open_end, content_end))]
            } else {
                Vec::new()
            };

            out.push(Node::Element(Element {
                tag: name,
                attrs,
                children,
                span: Span::new(start, end),
            }));
            out.extend(after);
        }
        tl::Node::Raw(bytes) => {
            if let Some(span) = span_in(source, bytes.as_bytes()) {
                out.push(Node::Text(span));
            }
        }
        tl::Node::Comment(bytes) => {
            if let Some(span) = span_in(source, bytes.as_bytes()) {
                out.push(Node::Comment(span));
            }
        }
    }
}

/// Offset of `slice` within `source`, if it was borrowed from it.
fn offset_in(source: &str, slice: &[u8]) -> Option<usize> {
    let base = source.as_ptr() as usize;
    let offset = (slice.as_ptr() as usize).checked_sub(base)?;
    (offset + slice.len() <= source.len()).then_some(offset)
}

fn span_in(source: &str, slice: &[u8]) -> Option<Span> {
    offset_in(source, slice).map(|start| Span::new(start, start + slice.len()))
}
