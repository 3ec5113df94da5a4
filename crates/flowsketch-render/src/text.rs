//! Label wrapping: greedy word wrap used by shape and participant labels.

pub const FONT_SIZE_SHAPE: f64 = 14.0;
pub const FONT_SIZE_EDGE_LABEL: f64 = 12.0;
pub const FONT_SIZE_PARTICIPANT: f64 = 13.0;
pub const LINE_HEIGHT_FACTOR: f64 = 1.3;

/// Greedy word wrap: if `text` is longer than 20 characters, wraps to at most `max_chars_per_line`
/// characters per line; otherwise returns it as a single line.
pub fn wrap_label(text: &str, max_chars_per_line: usize) -> Vec<String> {
    if text.chars().count() <= 20 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let candidate_len = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if candidate_len > max_chars_per_line && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(text.to_string());
    }
    lines
}

/// The Y offset (from the shape centre) at which the first `tspan` line should be placed so the
/// whole wrapped block is vertically centred: half the total text block height, moved up.
pub fn first_line_y_offset(line_count: usize, font_size: f64) -> f64 {
    let total_height = line_count as f64 * font_size * LINE_HEIGHT_FACTOR;
    -(total_height / 2.0) + font_size * 0.35
}
