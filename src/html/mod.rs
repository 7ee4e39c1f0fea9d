//! HTML document model and the primitives of the inlining pass.
//!
//! # Modules
//!
//! - [`document`]: Parsed node tree with byte spans into the source string
//! - [`matcher`]: Decides whether a node is an `<image inline>` reference
//! - [`walker`]: Depth-first, document-order traversal
//! - [`splice`]: Byte-exact span replacement
//! - [`util`]: Void elements, start-tag scanning, entity unescaping
//!
//! A [`Document`] is only valid for the exact string it was parsed from.
//! After every splice the string changes length, so the tree is re-parsed.

pub mod document;
pub mod matcher;
pub mod splice;
pub mod util;
pub mod walker;

pub use document::{Attr, Document, Element, Node, Span};
pub use matcher::InlineImage;
pub use splice::splice;
