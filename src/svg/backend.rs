//! usvg-based optimizer.
//!
//! usvg parses the markup into a normalized tree (shapes become paths, styles
//! are resolved, comments and metadata are dropped) and writes it back
//! minified. The plugin list is folded, in order, into a [`Plan`].
//!
//! | Option                 | Value                                   | Effect                     |
//! |------------------------|-----------------------------------------|----------------------------|
//! | `cleanupNumericValues` | `true` / `{ floatPrecision = n }`       | coordinate precision       |
//! | `convertTransform`     | `true` / `{ floatPrecision = n }`       | transform precision        |
//! | `prefixIds`            | `true` / `"prefix"` / `{ prefix = "" }` | prefix element ids         |
//! | `removeDimensions`     | bool                                    | drop root width/height     |
//! | `expandViewBox`        | bool                                    | viewBox covers strokes     |
//! | `useSingleQuote`       | bool                                    | single-quoted attributes   |
//! | `pretty`               | bool                                    | two-space indentation      |
//! | `dpi`                  | number                                  | unit conversion DPI        |

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::Optimizer;
use super::bounds::{expand_viewbox, stroke_bounds};
use super::settings::Plugin;
use crate::debug;
use crate::error::OptimizeError;
use crate::html::util::start_tag_end;

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Precision used when a precision plugin is enabled without parameters.
const DEFAULT_FLOAT_PRECISION: u8 = 3;

/// Prefix used when `prefixIds` is `true`.
const DEFAULT_ID_PREFIX: &str = "svg-";

static DIMENSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[ \t\r\n](?:width|height)=(?:"[^"]*"|'[^']*')"#).unwrap());

static XMLNS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t\r\n]xmlns[ \t\r\n]*=").unwrap());

/// Optimizer backed by usvg. Work runs on the blocking thread pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct UsvgOptimizer;

impl Optimizer for UsvgOptimizer {
    async fn optimize(&self, svg: &str, plugins: &[Plugin]) -> Result<String, OptimizeError> {
        let plan = Plan::from_plugins(plugins)?;
        let svg = svg.to_owned();
        tokio::task::spawn_blocking(move || run(&svg, &plan)).await?
    }
}

// ============================================================================
// Plan
// ============================================================================

/// Concrete usvg settings derived from the plugin list.
#[derive(Debug, Clone, PartialEq)]
struct Plan {
    dpi: f32,
    coordinates_precision: u8,
    transforms_precision: u8,
    id_prefix: Option<String>,
    remove_dimensions: bool,
    expand_viewbox: bool,
    single_quote: bool,
    pretty: bool,
}

impl Default for Plan {
    fn default() -> Self {
        let write = usvg::WriteOptions::default();
        Self {
            dpi: 96.0,
            coordinates_precision: write.coordinates_precision,
            transforms_precision: write.transforms_precision,
            id_prefix: None,
            remove_dimensions: false,
            expand_viewbox: false,
            single_quote: false,
            pretty: false,
        }
    }
}

impl Plan {
    fn from_plugins(plugins: &[Plugin]) -> Result<Self, OptimizeError> {
        let mut plan = Self::default();
        for plugin in plugins {
            plan.apply(plugin)?;
        }
        Ok(plan)
    }

    /// Later plugins override earlier ones.
    fn apply(&mut self, plugin: &Plugin) -> Result<(), OptimizeError> {
        let on = plugin.is_enabled();
        let base = Self::default();

        match plugin.name.as_str() {
            "cleanupNumericValues" => {
                self.coordinates_precision = if on {
                    float_precision(plugin)?
                } else {
                    base.coordinates_precision
                };
            }
            "convertTransform" => {
                self.transforms_precision = if on {
                    float_precision(plugin)?
                } else {
                    base.transforms_precision
                };
            }
            "prefixIds" => self.id_prefix = if on { Some(id_prefix(plugin)?) } else { None },
            "removeDimensions" => self.remove_dimensions = on,
            "expandViewBox" => self.expand_viewbox = on,
            "useSingleQuote" => self.single_quote = on,
            "pretty" => self.pretty = on,
            "dpi" => self.dpi = if on { dpi(plugin)? } else { base.dpi },
            other => debug!("optimize"; "ignoring unsupported option `{}`", other),
        }

        Ok(())
    }
}

fn float_precision(plugin: &Plugin) -> Result<u8, OptimizeError> {
    let raw = match &plugin.value {
        Value::Bool(true) => return Ok(DEFAULT_FLOAT_PRECISION),
        Value::Object(params) => match params.get("floatPrecision") {
            Some(value) => value,
            None => return Ok(DEFAULT_FLOAT_PRECISION),
        },
        value => value,
    };

    raw.as_u64()
        .and_then(|n| u8::try_from(n).ok())
        .ok_or_else(|| {
            OptimizeError::invalid_option(&plugin.name, "floatPrecision must be an integer in 0..=255")
        })
}

fn id_prefix(plugin: &Plugin) -> Result<String, OptimizeError> {
    match &plugin.value {
        Value::Bool(true) => Ok(DEFAULT_ID_PREFIX.to_owned()),
        Value::String(prefix) => Ok(prefix.clone()),
        Value::Object(params) => params
            .get("prefix")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| OptimizeError::invalid_option(&plugin.name, "`prefix` must be a string")),
        _ => Err(OptimizeError::invalid_option(
            &plugin.name,
            "expected a boolean, a string or { prefix }",
        )),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn dpi(plugin: &Plugin) -> Result<f32, OptimizeError> {
    plugin
        .value
        .as_f64()
        .filter(|d| *d > 0.0)
        .map(|d| d as f32)
        .ok_or_else(|| OptimizeError::invalid_option(&plugin.name, "expected a positive number"))
}

// ============================================================================
// Optimization
// ============================================================================

fn run(svg: &str, plan: &Plan) -> Result<String, OptimizeError> {
    let svg = ensure_namespace(svg);

    let options = usvg::Options {
        dpi: plan.dpi,
        ..Default::default()
    };
    let tree = usvg::Tree::from_data(svg.as_bytes(), &options)?;

    let write_options = usvg::WriteOptions {
        id_prefix: plan.id_prefix.clone(),
        coordinates_precision: plan.coordinates_precision,
        transforms_precision: plan.transforms_precision,
        use_single_quote: plan.single_quote,
        indent: if plan.pretty {
            usvg::Indent::Spaces(2)
        } else {
            usvg::Indent::None
        },
        ..Default::default()
    };

    let mut optimized = strip_xml_declaration(&tree.to_string(&write_options))
        .trim_end()
        .to_owned();

    if plan.expand_viewbox
        && let Some(bounds) = stroke_bounds(&tree)
    {
        optimized = expand_viewbox(&optimized, bounds);
    }

    if plan.remove_dimensions {
        optimized = remove_dimensions(&optimized);
    }

    Ok(optimized)
}

/// Inline markup often omits the namespace, which usvg requires on the root.
fn ensure_namespace(svg: &str) -> Cow<'_, str> {
    let Some(open) = svg.find("<svg") else {
        return Cow::Borrowed(svg);
    };
    let close = start_tag_end(svg, open);
    if XMLNS_RE.is_match(&svg[open..close]) {
        return Cow::Borrowed(svg);
    }

    let insert_at = open + "<svg".len();
    Cow::Owned(format!(
        r#"{} xmlns="{SVG_NS}"{}"#,
        &svg[..insert_at],
        &svg[insert_at..]
    ))
}

fn strip_xml_declaration(svg: &str) -> &str {
    let trimmed = svg.trim_start();
    if trimmed.starts_with("<?xml")
        && let Some(end) = trimmed.find("?>")
    {
        return trimmed[end + 2..].trim_start();
    }
    svg
}

/// Drop `width` and `height` from the root `<svg>` start tag.
fn remove_dimensions(svg: &str) -> String {
    let Some(open) = svg.find("<svg") else {
        return svg.to_owned();
    };
    let close = start_tag_end(svg, open);
    let tag = DIMENSION_RE.replace_all(&svg[open..close], "");
    format!("{}{}{}", &svg[..open], tag, &svg[close..])
}
