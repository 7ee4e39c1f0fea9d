//! Recognizes `<image inline src="...svg">` references.
//!
//! Structural eligibility is tag + marker attribute. A reference is only
//! *inlinable* when it also carries a usable `src`; discovery selects
//! inlinable nodes so a malformed reference is never picked twice.

use super::document::{Element, Node, Span};
use crate::error::InlineError;

/// Tag name of an inline-eligible image reference.
pub const IMAGE_TAG: &str = "image";

/// Boolean marker attribute requesting inlining.
pub const INLINE_ATTR: &str = "inline";

/// Attribute holding the path of the svg file.
pub const SRC_ATTR: &str = "src";

/// Substring a usable `src` must contain.
pub const SVG_EXTENSION: &str = ".svg";

/// Tag is `image` and the `inline` marker is present (value ignored).
pub fn is_eligible(node: &Node) -> bool {
    node.as_element().is_some_and(is_eligible_element)
}

#[inline]
fn is_eligible_element(elem: &Element) -> bool {
    elem.is_tag(IMAGE_TAG) && elem.has_attr(INLINE_ATTR)
}

/// Value of `src` if present, non-empty and referencing an svg file.
pub fn source_path(node: &Node) -> Option<&str> {
    let value = node.as_element()?.attr(SRC_ATTR)?.value.as_deref()?;
    (!value.is_empty() && value.contains(SVG_EXTENSION)).then_some(value)
}

/// Eligible and carrying a usable source path.
pub fn is_inlinable(node: &Node) -> bool {
    is_eligible(node) && source_path(node).is_some()
}

// ============================================================================
// InlineImage
// ============================================================================

/// One unit of work: where the reference sits and what it points to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub span: Span,
    pub src: String,
}

impl InlineImage {
    /// Extract a reference from an eligible node.
    ///
    /// Fails with [`InlineError::MalformedReference`] when `src` is unusable.
    pub fn from_node(node: &Node) -> Result<Self, InlineError> {
        let span = node.span();
        let src = source_path(node).ok_or(InlineError::MalformedReference { span })?;
        Ok(Self {
            span,
            src: src.to_owned(),
        })
    }
}
