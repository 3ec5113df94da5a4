//! Diagram data model and schema validation shared by the flowsketch layout and render crates.

mod error;
mod model;
pub mod schema;

pub use error::SchemaError;
pub use model::{
    Diagram, Direction, EdgeDef, EdgeDirection, EdgeStyle, FlowDiagram, GroupDef, LayoutEdge,
    LayoutGroup, LayoutMessage, LayoutNode, LayoutParticipant, LayoutResult, MessageDef, NodeDef,
    ParticipantDef, Point, SequenceDiagram, SequenceLayoutResult, Shape, Theme,
};
pub use schema::parse;

/// Returns an XML-safe id derived from a user-supplied node/group/participant id: non
/// `[A-Za-z0-9_-]` bytes are replaced with `_`. Used when emitting `data-id` attributes.
pub fn sanitize_svg_id(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Escapes the five XML-significant characters in `s` for safe embedding in SVG text/attributes.
pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_all_five_entities() {
        assert_eq!(escape_xml(r#"a&b<c>d"e'f"#), "a&amp;b&lt;c&gt;d&quot;e&apos;f");
    }

    #[test]
    fn sanitizes_non_id_chars() {
        assert_eq!(sanitize_svg_id("node one.two"), "node_one_two");
        assert_eq!(sanitize_svg_id("a-b_c9"), "a-b_c9");
    }
}
