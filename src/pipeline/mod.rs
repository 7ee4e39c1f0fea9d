//! The inlining pass over one HTML document.
//!
//! # Flow
//!
//! ```text
//! Start ─► Scanning ─┬─► Done
//!             ▲      └─► Processing ─► Loading ─► Optimizing ─► Splicing ─┐
//!             └───────────────────────────────────────────────────────────┘
//! ```
//!
//! Each scan parses the latest HTML string and takes the first inlinable
//! reference past the cursor, so one reference is fully loaded, optimized and
//! spliced before the next is located. The cursor sits at the end of the last
//! inlined payload, so markup inside a payload is never scanned. Any read or
//! optimize failure abandons the pass and the caller gets the original
//! document back.


use crate::error::InlineError;
use crate::html::{Document, InlineImage, Span, splice, walker};
use crate::loader::ContentLoader;
use crate::svg::{self, Optimizer, OptimizerSettings, OptionMap, UsvgOptimizer};
use crate::{debug, log};

/// Result of a successful pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inlined {
    pub html: String,
    /// Number of references replaced.
    pub replaced: usize,
    /// Eligible references left untouched because their `src` is unusable.
    pub skipped: Vec<Span>,
}

/// Inlines `<image inline src="...svg">` references.
///
/// Holds the per-invocation configuration; nothing is shared between instances.
#[derive(Debug, Clone)]
pub struct InlineSvg<O = UsvgOptimizer> {
    loader: ContentLoader,
    optimizer: O,
    settings: OptimizerSettings,
}

impl InlineSvg<UsvgOptimizer> {
    /// usvg optimizer, default options overlaid with `overrides`.
    pub fn new(overrides: Option<&OptionMap>) -> Self {
        Self::with_optimizer(UsvgOptimizer, overrides)
    }
}

impl<O: Optimizer> InlineSvg<O> {
    pub fn with_optimizer(optimizer: O, overrides: Option<&OptionMap>) -> Self {
        Self {
            loader: ContentLoader::new(),
            optimizer,
            settings: OptimizerSettings::new(overrides),
        }
    }

    /// Resolve `src` paths with `loader` instead of the working directory.
    pub fn loader(mut self, loader: ContentLoader) -> Self {
        self.loader = loader;
        self
    }

    pub fn settings(&self) -> &OptimizerSettings {
        &self.settings
    }

    /// Run one pass. Never fails: on any error the original `html` is returned.
    pub async fn process_document(&self, html: &str) -> String {
        match self.try_process(html).await {
            Ok(inlined) => inlined.html,
            Err(e) => {
                log!("inline"; "{}, keeping original document", error_chain(&e));
                html.to_owned()
            }
        }
    }

    /// Run one pass, surfacing the first fatal error.
    pub async fn try_process(&self, html: &str) -> Result<Inlined, InlineError> {
        let doc = Document::parse(html)?;

        let skipped = malformed_references(&doc);
        let total = walker::collect_all(&doc).len();
        drop(doc);

        if total == 0 {
            return Ok(Inlined {
                html: html.to_owned(),
                replaced: 0,
                skipped,
            });
        }

        let mut current = html.to_owned();
        let mut cursor = 0;
        let mut replaced = 0;

        while replaced < total {
            let Some(image) = next_image(&current, cursor)? else {
                break;
            };
            (current, cursor) = self.inline_one(&current, &image).await?;
            replaced += 1;
        }

        Ok(Inlined {
            html: current,
            replaced,
            skipped,
        })
    }

    /// Load, optimize and splice a single reference into `html`.
    ///
    /// Returns the new document and the offset just past the inlined payload.
    async fn inline_one(
        &self,
        html: &str,
        image: &InlineImage,
    ) -> Result<(String, usize), InlineError> {
        let raw = self.loader.load(&image.src).await?;

        let optimized = svg::optimize(&self.optimizer, &raw, &self.settings)
            .await
            .map_err(|source| InlineError::Optimize {
                path: self.loader.resolve(&image.src),
                source,
            })?;

        if !image.span.fits(html) {
            return Err(InlineError::InvalidSpan {
                span: image.span,
                len: html.len(),
            });
        }

        debug!("inline"; "{} -> {} bytes at {}", image.src, optimized.len(), image.span);
        let cursor = image.span.start + optimized.len();
        Ok((splice(html, image.span, &optimized), cursor))
    }
}

/// Parse `html` and extract the first inlinable reference starting at or
/// after `cursor`.
///
/// The tree is dropped before returning; only the span survives, and it is
/// valid for `html` alone.
fn next_image(html: &str, cursor: usize) -> Result<Option<InlineImage>, InlineError> {
    let doc = Document::parse(html)?;
    walker::find_first_from(&doc, cursor)
        .map(InlineImage::from_node)
        .transpose()
}

/// Report eligible references that cannot be inlined.
fn malformed_references(doc: &Document) -> Vec<Span> {
    walker::collect_eligible(doc)
        .into_iter()
        .filter_map(|node| InlineImage::from_node(node).err())
        .filter_map(|err| match &err {
            InlineError::MalformedReference { span } => {
                debug!("inline"; "skipping {}", err);
                Some(*span)
            }
            _ => None,
        })
        .collect()
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// One pass with the usvg optimizer, resolving paths against the working directory.
pub async fn process_document(html: &str, overrides: Option<&OptionMap>) -> String {
    InlineSvg::new(overrides).process_document(html).await
}
