//! `flowsketch` is a deterministic diagram layout and sketch-rendering engine.
//!
//! Given a declarative flow or sequence diagram description, [`generate`] validates the input,
//! computes a layout, and emits a self-contained SVG document in one of three visual themes
//! (hand-drawn, clean, minimal). With the `raster` feature, the produced SVG can also be
//! rasterised to PNG.

mod error;
#[cfg(feature = "raster")]
pub mod raster;

pub use error::Error;
pub use flowsketch_core::{
    Diagram, Direction, EdgeDef, EdgeDirection, EdgeStyle, FlowDiagram, GroupDef, MessageDef,
    NodeDef, ParticipantDef, SequenceDiagram, Shape, Theme,
};
pub use flowsketch_core::{LayoutEdge, LayoutGroup, LayoutNode, LayoutResult, Point};
pub use flowsketch_core::{LayoutMessage, LayoutParticipant, SequenceLayoutResult};

pub type Result<T> = std::result::Result<T, Error>;

/// Options for [`generate`].
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// When `true`, rasterise the produced SVG to PNG at scale factor 2 (requires the `raster`
    /// feature) and populate [`GenerateOutput::png`].
    pub png: bool,
}

/// The result of a successful [`generate`] call.
#[derive(Debug, Clone)]
pub struct GenerateOutput {
    pub svg: String,
    pub png: Option<Vec<u8>>,
}

/// Validates `input` against the diagram schema, lays it out, and renders it to SVG (and
/// optionally PNG). This is the single operation the core exposes to its collaborators.
pub fn generate(input: &serde_json::Value, options: &GenerateOptions) -> Result<GenerateOutput> {
    let diagram = flowsketch_core::parse(input)?;
    tracing::debug!(
        kind = match &diagram {
            Diagram::Flow(_) => "flow",
            Diagram::Sequence(_) => "sequence",
        },
        "generating diagram"
    );

    let theme = diagram.style();
    let svg = match &diagram {
        Diagram::Flow(flow) => {
            let layout = flowsketch_layout::layout_flow(flow)?;
            flowsketch_render::render_flow(&layout, theme)
        }
        Diagram::Sequence(sequence) => {
            let layout = flowsketch_layout::layout_sequence(sequence);
            flowsketch_render::render_sequence(&layout, theme)
        }
    };

    let png = rasterize_if_requested(&svg, options.png)?;

    Ok(GenerateOutput { svg, png })
}

#[cfg(feature = "raster")]
fn rasterize_if_requested(svg: &str, want_png: bool) -> Result<Option<Vec<u8>>> {
    if !want_png {
        return Ok(None);
    }
    let png = raster::svg_to_png(svg, raster::DEFAULT_SCALE).map_err(|e| Error::Png(e.to_string()))?;
    Ok(Some(png))
}

#[cfg(not(feature = "raster"))]
fn rasterize_if_requested(_svg: &str, want_png: bool) -> Result<Option<Vec<u8>>> {
    if want_png {
        tracing::warn!("options.png requested but the `raster` feature is not enabled, skipping");
    }
    Ok(None)
}
