//! The fixed palette and the `darken` colour function, both per `#RRGGBB` lowercase hex.

pub const PALETTE: [&str; 10] = [
    "#4ECDC4", "#FF6B6B", "#45B7D1", "#96CEB4", "#FFEAA7", "#DDA0DD", "#98D8C8", "#F7DC6F",
    "#BB8FCE", "#85C1E9",
];

/// The palette colour for the given node/participant index, cycling every 10.
pub fn palette_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

/// `darken(rgb, a) = round(rgb * (1 - a))`, preserving the `#rrggbb` lowercase format.
pub fn darken(color: &str, amount: f64) -> String {
    let Some((r, g, b)) = parse_hex(color) else {
        return color.to_lowercase();
    };
    let factor = 1.0 - amount;
    let d = |c: u8| ((c as f64 * factor).round().clamp(0.0, 255.0)) as u8;
    format!("#{:02x}{:02x}{:02x}", d(r), d(g), d(b))
}
