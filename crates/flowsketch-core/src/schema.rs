//! Validates a raw [`serde_json::Value`] against the diagram schema, applies the documented
//! defaults, and produces a typed [`Diagram`] or a [`SchemaError`] pointing at the offending
//! field.
//!
//! The parser performs no semantic validation (dangling edges, duplicate ids, cyclic group
//! membership) — those are handled permissively by the layout stage.

use serde_json::Value;

use crate::error::SchemaError;
use crate::model::{
    Diagram, Direction, EdgeDef, EdgeDirection, EdgeStyle, FlowDiagram, GroupDef, MessageDef,
    NodeDef, ParticipantDef, SequenceDiagram, Shape, Theme,
};

/// Parses and defaults a raw diagram value. See module docs.
pub fn parse(raw: &Value) -> Result<Diagram, SchemaError> {
    let obj = require_object(raw, "$")?;
    let ty = require_str(obj, "$", "type")?;

    match ty {
        "flow" => parse_flow(obj).map(Diagram::Flow),
        "sequence" => parse_sequence(obj).map(Diagram::Sequence),
        other => Err(SchemaError::new(
            "$.type",
            format!("unknown diagram type {other:?}, expected \"flow\" or \"sequence\""),
        )),
    }
}

fn parse_flow(obj: &serde_json::Map<String, Value>) -> Result<FlowDiagram, SchemaError> {
    let title = optional_str(obj, "$", "title")?;
    let style = optional_theme(obj, "$")?.unwrap_or_default();
    let direction = optional_direction(obj, "$")?.unwrap_or_default();

    let nodes_val = obj.get("nodes").ok_or_else(|| {
        SchemaError::new("$.nodes", "missing required field \"nodes\"")
    })?;
    let nodes_arr = require_array(nodes_val, "$.nodes")?;
    let mut nodes = Vec::with_capacity(nodes_arr.len());
    for (i, n) in nodes_arr.iter().enumerate() {
        nodes.push(parse_node(n, &format!("$.nodes[{i}]"))?);
    }

    let mut edges = Vec::new();
    if let Some(edges_val) = obj.get("edges") {
        let edges_arr = require_array(edges_val, "$.edges")?;
        for (i, e) in edges_arr.iter().enumerate() {
            edges.push(parse_edge(e, &format!("$.edges[{i}]"))?);
        }
    }

    let mut groups = Vec::new();
    if let Some(groups_val) = obj.get("groups") {
        let groups_arr = require_array(groups_val, "$.groups")?;
        for (i, g) in groups_arr.iter().enumerate() {
            groups.push(parse_group(g, &format!("$.groups[{i}]"))?);
        }
    }

    Ok(FlowDiagram {
        title,
        nodes,
        edges,
        groups,
        style,
        direction,
    })
}

fn parse_node(v: &Value, path: &str) -> Result<NodeDef, SchemaError> {
    let obj = require_object(v, path)?;
    let id = require_str(obj, path, "id")?.to_string();
    let label = require_str(obj, path, "label")?.to_string();

    let shape = match obj.get("shape") {
        None => Shape::default(),
        Some(Value::String(s)) => Shape::from_str(s).ok_or_else(|| {
            SchemaError::new(
                format!("{path}.shape"),
                format!("unknown shape {s:?}, expected one of the seven shape kinds"),
            )
        })?,
        Some(other) => {
            return Err(SchemaError::new(
                format!("{path}.shape"),
                format!("expected a string, found {}", kind_name(other)),
            ));
        }
    };

    let color = optional_str(obj, path, "color")?;
    let text_color = optional_str(obj, path, "textColor")?;
    let width = optional_f64(obj, path, "width")?;
    let height = optional_f64(obj, path, "height")?;

    Ok(NodeDef {
        id,
        label,
        shape,
        color,
        text_color,
        width,
        height,
    })
}

fn parse_edge(v: &Value, path: &str) -> Result<EdgeDef, SchemaError> {
    let obj = require_object(v, path)?;
    let from = require_str(obj, path, "from")?.to_string();
    let to = require_str(obj, path, "to")?.to_string();
    let label = optional_str(obj, path, "label")?;
    let color = optional_str(obj, path, "color")?;

    let style = match obj.get("style") {
        None => EdgeStyle::default(),
        Some(Value::String(s)) => EdgeStyle::from_str(s).ok_or_else(|| {
            SchemaError::new(
                format!("{path}.style"),
                format!("unknown edge style {s:?}, expected solid/dashed/dotted"),
            )
        })?,
        Some(other) => {
            return Err(SchemaError::new(
                format!("{path}.style"),
                format!("expected a string, found {}", kind_name(other)),
            ));
        }
    };

    let direction = match obj.get("direction") {
        None => EdgeDirection::default(),
        Some(Value::String(s)) => EdgeDirection::from_str(s).ok_or_else(|| {
            SchemaError::new(
                format!("{path}.direction"),
                format!("unknown edge direction {s:?}, expected forward/backward/both/none"),
            )
        })?,
        Some(other) => {
            return Err(SchemaError::new(
                format!("{path}.direction"),
                format!("expected a string, found {}", kind_name(other)),
            ));
        }
    };

    Ok(EdgeDef {
        from,
        to,
        label,
        style,
        direction,
        color,
    })
}

fn parse_group(v: &Value, path: &str) -> Result<GroupDef, SchemaError> {
    let obj = require_object(v, path)?;
    let id = require_str(obj, path, "id")?.to_string();
    let label = optional_str(obj, path, "label")?;
    let color = optional_str(obj, path, "color")?;

    let mut contains = Vec::new();
    if let Some(contains_val) = obj.get("contains") {
        let arr = require_array(contains_val, &format!("{path}.contains"))?;
        for (i, item) in arr.iter().enumerate() {
            match item {
                Value::String(s) => contains.push(s.clone()),
                other => {
                    return Err(SchemaError::new(
                        format!("{path}.contains[{i}]"),
                        format!("expected a string, found {}", kind_name(other)),
                    ));
                }
            }
        }
    }

    Ok(GroupDef {
        id,
        label,
        contains,
        color,
    })
}

fn parse_sequence(obj: &serde_json::Map<String, Value>) -> Result<SequenceDiagram, SchemaError> {
    let title = optional_str(obj, "$", "title")?;
    let style = optional_theme(obj, "$")?.unwrap_or_default();

    let participants_val = obj.get("participants").ok_or_else(|| {
        SchemaError::new("$.participants", "missing required field \"participants\"")
    })?;
    let participants_arr = require_array(participants_val, "$.participants")?;
    if participants_arr.is_empty() {
        return Err(SchemaError::new(
            "$.participants",
            "a sequence diagram requires at least one participant",
        ));
    }
    let mut participants = Vec::with_capacity(participants_arr.len());
    for (i, p) in participants_arr.iter().enumerate() {
        participants.push(parse_participant(p, &format!("$.participants[{i}]"))?);
    }

    let mut messages = Vec::new();
    if let Some(messages_val) = obj.get("messages") {
        let arr = require_array(messages_val, "$.messages")?;
        for (i, m) in arr.iter().enumerate() {
            messages.push(parse_message(m, &format!("$.messages[{i}]"))?);
        }
    }

    Ok(SequenceDiagram {
        title,
        participants,
        messages,
        style,
    })
}

fn parse_participant(v: &Value, path: &str) -> Result<ParticipantDef, SchemaError> {
    let obj = require_object(v, path)?;
    let id = require_str(obj, path, "id")?.to_string();
    let label = require_str(obj, path, "label")?.to_string();
    let color = optional_str(obj, path, "color")?;
    Ok(ParticipantDef { id, label, color })
}

fn parse_message(v: &Value, path: &str) -> Result<MessageDef, SchemaError> {
    let obj = require_object(v, path)?;
    let from = require_str(obj, path, "from")?.to_string();
    let to = require_str(obj, path, "to")?.to_string();
    let label = optional_str(obj, path, "label")?;
    let color = optional_str(obj, path, "color")?;

    let style = match obj.get("style") {
        None => EdgeStyle::default(),
        Some(Value::String(s)) => EdgeStyle::from_str(s).ok_or_else(|| {
            SchemaError::new(
                format!("{path}.style"),
                format!("unknown message style {s:?}, expected solid/dashed/dotted"),
            )
        })?,
        Some(other) => {
            return Err(SchemaError::new(
                format!("{path}.style"),
                format!("expected a string, found {}", kind_name(other)),
            ));
        }
    };

    Ok(MessageDef {
        from,
        to,
        label,
        style,
        color,
    })
}

// -- small JSON helpers -----------------------------------------------------

fn kind_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn require_object<'a>(
    v: &'a Value,
    path: &str,
) -> Result<&'a serde_json::Map<String, Value>, SchemaError> {
    v.as_object()
        .ok_or_else(|| SchemaError::new(path, format!("expected an object, found {}", kind_name(v))))
}

fn require_array<'a>(v: &'a Value, path: &str) -> Result<&'a Vec<Value>, SchemaError> {
    v.as_array()
        .ok_or_else(|| SchemaError::new(path, format!("expected an array, found {}", kind_name(v))))
}

fn require_str<'a>(
    obj: &'a serde_json::Map<String, Value>,
    path: &str,
    field: &str,
) -> Result<&'a str, SchemaError> {
    match obj.get(field) {
        None => Err(SchemaError::new(
            format!("{path}.{field}"),
            format!("missing required field \"{field}\""),
        )),
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(other) => Err(SchemaError::new(
            format!("{path}.{field}"),
            format!("expected a string, found {}", kind_name(other)),
        )),
    }
}

fn optional_str(
    obj: &serde_json::Map<String, Value>,
    path: &str,
    field: &str,
) -> Result<Option<String>, SchemaError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(SchemaError::new(
            format!("{path}.{field}"),
            format!("expected a string, found {}", kind_name(other)),
        )),
    }
}

fn optional_f64(
    obj: &serde_json::Map<String, Value>,
    path: &str,
    field: &str,
) -> Result<Option<f64>, SchemaError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n.as_f64().ok_or_else(|| {
            SchemaError::new(format!("{path}.{field}"), "number is not representable as f64")
        }).map(Some),
        Some(other) => Err(SchemaError::new(
            format!("{path}.{field}"),
            format!("expected a number, found {}", kind_name(other)),
        )),
    }
}

fn optional_theme(
    obj: &serde_json::Map<String, Value>,
    path: &str,
) -> Result<Option<Theme>, SchemaError> {
    match obj.get("style") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => match s.as_str() {
            "hand-drawn" => Ok(Some(Theme::HandDrawn)),
            "clean" => Ok(Some(Theme::Clean)),
            "minimal" => Ok(Some(Theme::Minimal)),
            other => Err(SchemaError::new(
                format!("{path}.style"),
                format!("unknown theme {other:?}, expected hand-drawn/clean/minimal"),
            )),
        },
        Some(other) => Err(SchemaError::new(
            format!("{path}.style"),
            format!("expected a string, found {}", kind_name(other)),
        )),
    }
}

fn optional_direction(
    obj: &serde_json::Map<String, Value>,
    path: &str,
) -> Result<Option<Direction>, SchemaError> {
    match obj.get("direction") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => match s.as_str() {
            "TB" => Ok(Some(Direction::TB)),
            "LR" => Ok(Some(Direction::LR)),
            "BT" => Ok(Some(Direction::BT)),
            "RL" => Ok(Some(Direction::RL)),
            other => Err(SchemaError::new(
                format!("{path}.direction"),
                format!("unknown direction {other:?}, expected TB/LR/BT/RL"),
            )),
        },
        Some(other) => Err(SchemaError::new(
            format!("{path}.direction"),
            format!("expected a string, found {}", kind_name(other)),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_minimal_flow() {
        let raw = json!({
            "type": "flow",
            "nodes": [{"id": "a", "label": "A"}],
        });
        let diagram = parse(&raw).unwrap();
        match diagram {
            Diagram::Flow(f) => {
                assert_eq!(f.nodes.len(), 1);
                assert_eq!(f.nodes[0].shape, Shape::Rectangle);
                assert_eq!(f.style, Theme::HandDrawn);
                assert_eq!(f.direction, Direction::TB);
            }
            Diagram::Sequence(_) => panic!("expected flow"),
        }
    }

    #[test]
    fn rejects_unknown_shape() {
        let raw = json!({
            "type": "flow",
            "nodes": [{"id": "a", "label": "A", "shape": "triangle"}],
        });
        let err = parse(&raw).unwrap_err();
        assert_eq!(err.path, "$.nodes[0].shape");
    }

    #[test]
    fn rejects_unknown_type() {
        let raw = json!({"type": "bogus"});
        let err = parse(&raw).unwrap_err();
        assert_eq!(err.path, "$.type");
    }

    #[test]
    fn requires_at_least_one_participant() {
        let raw = json!({"type": "sequence", "participants": []});
        let err = parse(&raw).unwrap_err();
        assert_eq!(err.path, "$.participants");
    }

    #[test]
    fn parses_sequence_with_defaults() {
        let raw = json!({
            "type": "sequence",
            "participants": [{"id": "svc", "label": "Service"}],
            "messages": [{"from": "svc", "to": "svc", "label": "tick"}],
        });
        let diagram = parse(&raw).unwrap();
        match diagram {
            Diagram::Sequence(s) => {
                assert_eq!(s.participants.len(), 1);
                assert_eq!(s.messages[0].style, EdgeStyle::Solid);
            }
            Diagram::Flow(_) => panic!("expected sequence"),
        }
    }
}
