use egui::Color32;

use crate::error::{DrawingError, Result};

// Names accepted in addition to hex notation, as (name, 0xAARRGGBB)
const NAMED_COLORS: &[(&str, u32)] = &[
    ("black", 0xFF000000),
    ("darkgray", 0xFF444444),
    ("darkgrey", 0xFF444444),
    ("gray", 0xFF888888),
    ("grey", 0xFF888888),
    ("lightgray", 0xFFCCCCCC),
    ("lightgrey", 0xFFCCCCCC),
    ("white", 0xFFFFFFFF),
    ("red", 0xFFFF0000),
    ("green", 0xFF00FF00),
    ("blue", 0xFF0000FF),
    ("yellow", 0xFFFFFF00),
    ("cyan", 0xFF00FFFF),
    ("magenta", 0xFFFF00FF),
    ("aqua", 0xFF00FFFF),
    ("fuchsia", 0xFFFF00FF),
    ("lime", 0xFF00FF00),
    ("maroon", 0xFF800000),
    ("navy", 0xFF000080),
    ("olive", 0xFF808000),
    ("purple", 0xFF800080),
    ("silver", 0xFFC0C0C0),
    ("teal", 0xFF008080),
];

/// Parse `#RRGGBB`, `#AARRGGBB` or a color name into a color.
pub fn parse_color(input: &str) -> Result<Color32> {
    let trimmed = input.trim();
    let argb = if let Some(hex) = trimmed.strip_prefix('#') {
        parse_hex(hex)
    } else {
        NAMED_COLORS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(trimmed))
            .map(|(_, argb)| *argb)
    };

    argb.map(argb_to_color)
        .ok_or_else(|| DrawingError::InvalidColor(input.to_owned()))
}

fn parse_hex(hex: &str) -> Option<u32> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let value = u32::from_str_radix(hex, 16).ok()?;
    match hex.len() {
        6 => Some(0xFF00_0000 | value),
        8 => Some(value),
        _ => None,
    }
}

fn argb_to_color(argb: u32) -> Color32 {
    let [a, r, g, b] = argb.to_be_bytes();
    Color32::from_rgba_unmultiplied(r, g, b, a)
}

/// Format a color back into `#AARRGGBB`
pub fn to_hex(color: Color32) -> String {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    format!("#{a:02X}{r:02X}{g:02X}{b:02X}")
}
