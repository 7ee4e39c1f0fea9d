//! Host build-tool extension point.
//!
//! The host calls [`InlineSvgPlugin::after_html_processing`] once per generated
//! page. The per-invocation optimizer overrides travel with the page payload,
//! so concurrent builds never share configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::loader::ContentLoader;
use crate::pipeline::InlineSvg;
use crate::svg::OptionMap;

/// Key in [`HtmlPluginData::options`] holding optimizer overrides.
pub const OPTIMIZER_KEY: &str = "optimizer";

/// A generated page as handed over by the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HtmlPluginData {
    pub html: String,
    /// Host-side options for this page; only `optimizer` is read.
    #[serde(default)]
    pub options: Value,
}

impl HtmlPluginData {
    pub fn new(html: impl Into<String>, options: Value) -> Self {
        Self {
            html: html.into(),
            options,
        }
    }

    /// Optimizer overrides, if `options.optimizer` is an object.
    pub fn overrides(&self) -> Option<&OptionMap> {
        self.options.get(OPTIMIZER_KEY).and_then(Value::as_object)
    }
}

/// Stateless plugin; it takes no options of its own.
#[derive(Debug, Clone, Default)]
pub struct InlineSvgPlugin {
    root: Option<PathBuf>,
}

impl InlineSvgPlugin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `src` paths against `root` instead of the working directory.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn loader(&self) -> ContentLoader {
        match &self.root {
            Some(root) => ContentLoader::with_root(root),
            None => ContentLoader::new(),
        }
    }

    /// Inline the page's svg references. Never fails.
    ///
    /// `data.html` is replaced only by a non-empty result.
    pub async fn after_html_processing(&self, data: &mut HtmlPluginData) {
        let inline = InlineSvg::new(data.overrides()).loader(self.loader());
        let html = inline.process_document(&data.html).await;
        if !html.is_empty() {
            data.html = html;
        }
    }
}
