//! Sequence diagram layout: pure arithmetic placement of participants along X and messages
//! along Y. No external layout service is involved.

use std::collections::HashMap;

use flowsketch_core::{LayoutMessage, LayoutParticipant, SequenceDiagram, SequenceLayoutResult};

const PADDING: f64 = 40.0;
const PARTICIPANT_GAP: f64 = 60.0;
const MIN_BOX_WIDTH: f64 = 100.0;
const CHAR_WIDTH_PX: f64 = 10.0;
const LABEL_PADDING: f64 = 40.0;
const TITLE_HEIGHT: f64 = 40.0;
const MESSAGE_SPACING: f64 = 50.0;
const SELF_MESSAGE_EXTRA_HEIGHT: f64 = 30.0;
const LIFELINE_BOTTOM_PADDING: f64 = 40.0;

/// Lays out a sequence diagram. See `flowsketch-layout` crate docs for the algorithm.
pub fn layout_sequence(diagram: &SequenceDiagram) -> SequenceLayoutResult {
    tracing::debug!(
        participants = diagram.participants.len(),
        messages = diagram.messages.len(),
        "laying out sequence diagram"
    );

    let has_title = diagram.title.is_some();
    let start_y = PADDING + if has_title { TITLE_HEIGHT } else { 0.0 };

    let mut participants = Vec::with_capacity(diagram.participants.len());
    let mut x_by_id: HashMap<&str, f64> = HashMap::new();
    let mut cursor = PADDING;
    for p in &diagram.participants {
        let width = (p.label.chars().count() as f64 * CHAR_WIDTH_PX + LABEL_PADDING).max(MIN_BOX_WIDTH);
        let centre = cursor + width / 2.0;
        x_by_id.insert(p.id.as_str(), centre);
        participants.push(LayoutParticipant {
            id: p.id.clone(),
            label: p.label.clone(),
            x: centre,
            width,
            color: p.color.clone(),
        });
        cursor += width + PARTICIPANT_GAP;
    }

    let mut messages = Vec::with_capacity(diagram.messages.len());
    let mut y = start_y + 40.0 + MESSAGE_SPACING;
    for m in &diagram.messages {
        if !x_by_id.contains_key(m.from.as_str()) || !x_by_id.contains_key(m.to.as_str()) {
            tracing::warn!(from = %m.from, to = %m.to, "message references unknown participant id, skipped");
            continue;
        }

        let is_self = m.from == m.to;
        messages.push(LayoutMessage {
            from: m.from.clone(),
            to: m.to.clone(),
            label: m.label.clone(),
            style: m.style,
            color: m.color.clone(),
            y,
            is_self,
        });
        y += if is_self {
            MESSAGE_SPACING + SELF_MESSAGE_EXTRA_HEIGHT
        } else {
            MESSAGE_SPACING
        };
    }

    let last_msg_y = messages.last().map(|m| m.y).unwrap_or(start_y + 40.0);
    let self_adjustment = messages
        .last()
        .map(|m| if m.is_self { SELF_MESSAGE_EXTRA_HEIGHT } else { 0.0 })
        .unwrap_or(0.0);
    let lifeline_bottom = (last_msg_y + self_adjustment).max(start_y + 40.0) + LIFELINE_BOTTOM_PADDING;

    let width = participants
        .last()
        .map(|p| p.x + p.width / 2.0 + PADDING)
        .unwrap_or(2.0 * PADDING);
    let height = lifeline_bottom + PADDING;

    SequenceLayoutResult {
        width,
        height,
        top_y: start_y,
        bottom_y: lifeline_bottom,
        participants,
        messages,
        title: diagram.title.clone(),
    }
}
