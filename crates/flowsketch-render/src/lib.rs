//! Renders a positioned [`flowsketch_core::LayoutResult`]/[`flowsketch_core::SequenceLayoutResult`]
//! into a self-contained SVG document, in one of three themes.
//!
//! The renderer's output is deterministic: the seeded RNG in [`rng`] is reset at the start of
//! every [`render_flow`]/[`render_sequence`] call, and consumer draw order is fixed by iterating
//! nodes/edges/groups (or participants/messages) in their input order.

mod assembler;
mod color;
mod edges;
mod groups;
mod rng;
mod sequence_renderer;
mod shapes;
mod text;
mod theme;

use flowsketch_core::{LayoutResult, SequenceLayoutResult, Theme};

pub use color::{darken, palette_color, PALETTE};
pub use rng::Rng;
pub use theme::{config_for, ThemeConfig};

/// Renders a flow diagram's layout result to a complete SVG document.
pub fn render_flow(layout: &LayoutResult, theme: Theme) -> String {
    let config = theme::config_for(theme);
    let mut rng = rng::Rng::new();
    rng.reset();

    let mut content = String::new();
    for (i, node) in layout.nodes.iter().enumerate() {
        content.push_str(&shapes::render_node(node, i, &config, &mut rng));
    }
    for edge in &layout.edges {
        content.push_str(&edges::render_edge(edge, &config, &mut rng));
    }
    for group in &layout.groups {
        content.push_str(&groups::render_group(group, &config, &mut rng));
    }

    assembler::assemble(&content, layout.width, layout.height, layout.title.as_deref(), &config)
}

/// Renders a sequence diagram's layout result to a complete SVG document.
pub fn render_sequence(layout: &SequenceLayoutResult, theme: Theme) -> String {
    let config = theme::config_for(theme);
    let mut rng = rng::Rng::new();
    rng.reset();

    let mut content = String::new();
    for (i, participant) in layout.participants.iter().enumerate() {
        content.push_str(&sequence_renderer::render_participant(
            participant,
            i,
            layout.top_y,
            layout.bottom_y,
            &config,
            &mut rng,
        ));
    }
    for message in &layout.messages {
        if let Some(rendered) =
            sequence_renderer::render_message(message, &layout.participants, &config, &mut rng)
        {
            content.push_str(&rendered);
        }
    }

    assembler::assemble(&content, layout.width, layout.height, layout.title.as_deref(), &config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowsketch_core::{Direction, EdgeDef, EdgeDirection, EdgeStyle, FlowDiagram, GroupDef, NodeDef, Shape};

    fn node(id: &str, label: &str, shape: Shape) -> NodeDef {
        NodeDef {
            id: id.to_string(),
            label: label.to_string(),
            shape,
            color: None,
            text_color: None,
            width: None,
            height: None,
        }
    }

    fn layout_simple_flow(theme: Theme) -> LayoutResult {
        let diagram = FlowDiagram {
            title: Some("Test".into()),
            nodes: vec![node("a", "Start", Shape::Ellipse), node("b", "End", Shape::Ellipse)],
            edges: vec![EdgeDef {
                from: "a".into(),
                to: "b".into(),
                label: None,
                style: EdgeStyle::Solid,
                direction: EdgeDirection::Forward,
                color: None,
            }],
            groups: vec![],
            style: theme,
            direction: Direction::TB,
        };
        flowsketch_layout::layout_flow(&diagram).unwrap()
    }

    #[test]
    fn simple_flow_scenario_contains_title_and_labels() {
        let layout = layout_simple_flow(Theme::HandDrawn);
        let svg = render_flow(&layout, Theme::HandDrawn);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("Test"));
        assert!(svg.contains("Start"));
        assert!(svg.contains("End"));
        assert!(svg.contains("<path"));
        assert!(svg.contains("<polygon"));
    }

    #[test]
    fn clean_theme_uses_native_ellipse_primitive() {
        let layout = layout_simple_flow(Theme::Clean);
        let svg = render_flow(&layout, Theme::Clean);
        assert!(svg.contains("<ellipse"));
    }

    #[test]
    fn rendering_twice_is_byte_identical() {
        let layout = layout_simple_flow(Theme::HandDrawn);
        let first = render_flow(&layout, Theme::HandDrawn);
        let second = render_flow(&layout, Theme::HandDrawn);
        assert_eq!(first, second);
    }

    #[test]
    fn group_scenario_wraps_nodes_in_a_group_element() {
        let diagram = FlowDiagram {
            title: None,
            nodes: vec![node("a", "A", Shape::Rectangle), node("b", "B", Shape::Rectangle), node("c", "C", Shape::Rectangle)],
            edges: vec![],
            groups: vec![GroupDef {
                id: "g1".into(),
                label: None,
                contains: vec!["a".into(), "b".into()],
                color: None,
            }],
            style: Theme::Clean,
            direction: Direction::TB,
        };
        let layout = flowsketch_layout::layout_flow(&diagram).unwrap();
        let svg = render_flow(&layout, Theme::Clean);
        assert!(svg.contains(r#"<g class="group" data-id="g1""#));
    }
}
