//! Inline `<image inline src="*.svg">` references into generated HTML.
//!
//! Each reference is replaced by the optimized markup of the svg file it
//! names, one at a time in document order. If any file cannot be read or
//! optimized, the document is returned exactly as it came in.
//!
//! ```ignore
//! let html = inline_svg::process_document(r#"<div><image inline src="icon.svg"></div>"#, None).await;
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod hook;
pub mod html;
pub mod loader;
pub mod logger;
pub mod pipeline;
pub mod svg;

pub use error::{InlineError, OptimizeError};
pub use hook::{HtmlPluginData, InlineSvgPlugin};
pub use loader::ContentLoader;
pub use pipeline::{InlineSvg, Inlined, process_document};
pub use svg::{Optimizer, OptimizerSettings, OptionMap, Plugin, UsvgOptimizer};
