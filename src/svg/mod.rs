//! SVG optimization.
//!
//! # Modules
//!
//! - [`settings`]: Default/override merge and reshaping into an ordered plugin list
//! - [`defaults`]: Built-in option set
//! - [`backend`]: usvg-based optimizer (normalize + minify)
//! - [`bounds`]: Stroke-inclusive viewBox expansion
//!
//! # Flow
//!
//! ```text
//! defaults ──┐
//!            ├─► merge ─► reshape ─► [{name: value}, ...] ─┐
//! overrides ─┘                                            ├─► Optimizer ─► svg
//! raw svg ────────────────────────────────────────────────┘
//! ```

pub mod backend;
mod bounds;
pub mod defaults;
pub mod settings;

use std::future::Future;

pub use backend::UsvgOptimizer;
pub use settings::{OptimizerSettings, OptionMap, Plugin};

use crate::error::OptimizeError;

/// A black-box svg optimizer.
///
/// Receives the raw markup and the ordered plugin list, returns optimized
/// markup. Completion is always awaited, even for synchronous backends.
pub trait Optimizer: Send + Sync {
    fn optimize(
        &self,
        svg: &str,
        plugins: &[Plugin],
    ) -> impl Future<Output = Result<String, OptimizeError>> + Send;
}

/// Run `optimizer` on `raw` with the merged settings.
pub async fn optimize<O: Optimizer>(
    optimizer: &O,
    raw: &str,
    settings: &OptimizerSettings,
) -> Result<String, OptimizeError> {
    optimizer.optimize(raw, settings.plugins()).await
}
