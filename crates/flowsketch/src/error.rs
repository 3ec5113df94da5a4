use thiserror::Error;

use flowsketch_core::SchemaError;
use flowsketch_layout::LayoutError;

/// The top-level error produced by [`crate::generate`], unifying every fallible stage of the
/// pipeline.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Input did not satisfy the diagram schema. No layout or rendering was attempted.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The external hierarchical layout service failed. No partial SVG is emitted.
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// Reserved: the clean renderer paths never produce this, but callers may match on it.
    #[error("render failed: {0}")]
    Render(String),

    /// SVG→PNG rasterisation failed. The SVG itself is still available to the caller if they
    /// generated it separately.
    #[cfg(feature = "raster")]
    #[error("png rasterisation failed: {0}")]
    Png(String),
}
