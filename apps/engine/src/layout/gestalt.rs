//! Gestalt rule primitives — pure functions computing typographic, spacing,
//! and color constants from hierarchy level and density, plus geometric
//! snapping to the layout grid.
//!
//! No state. Constants follow a perfect-fourth modular scale on an 11pt base
//! and a 12-column grid over a 10in page.

use crate::models::session::VisualDensity;

/// Base font size in points.
pub const BASE_SIZE_PT: f64 = 11.0;
/// Perfect fourth modular scale ratio.
pub const SCALE_RATIO: f64 = 1.333;

/// Grid system configuration, all lengths in inches.
pub const GRID_COLUMNS: usize = 12;
pub const GUTTER_IN: f64 = 0.2;
pub const MARGIN_IN: f64 = 0.75;
pub const PAGE_WIDTH_IN: f64 = 10.0;

/// Default baseline grid size in inches.
pub const DEFAULT_BASELINE_GRID_IN: f64 = 0.25;

/// Text color palette keyed by hierarchy level, darkest first.
const TEXT_COLORS: [(u8, &str); 5] = [
    (1, "#1a1a1a"), // primary headings - near black
    (2, "#333333"), // secondary headings - dark gray
    (3, "#4a4a4a"), // tertiary headings - medium gray
    (4, "#333333"), // body text - dark gray
    (5, "#666666"), // captions - light gray
];

/// Body-text color used as the fallback for unknown levels.
const BODY_COLOR: &str = "#333333";

// ────────────────────────────────────────────────────────────────────────────
// Typography
// ────────────────────────────────────────────────────────────────────────────

/// Font size for a hierarchy level via the modular scale.
///
/// Levels map to scale exponents 1→3, 2→2, 3→1, 4→0, 5→−1 (unknown → 0),
/// producing 26 / 20 / 15 / 11 / 8 pt. Result is rounded to the nearest
/// whole point.
pub fn hierarchy_size(hierarchy_level: u8) -> u32 {
    let exponent: i32 = match hierarchy_level {
        1 => 3,
        2 => 2,
        3 => 1,
        4 => 0,
        5 => -1,
        _ => 0,
    };
    (BASE_SIZE_PT * SCALE_RATIO.powi(exponent)).round() as u32
}

/// Text color for a hierarchy level. Unknown levels fall back to the body
/// color.
pub fn text_color(hierarchy_level: u8) -> &'static str {
    TEXT_COLORS
        .iter()
        .find(|(level, _)| *level == hierarchy_level)
        .map(|(_, color)| *color)
        .unwrap_or(BODY_COLOR)
}

// ────────────────────────────────────────────────────────────────────────────
// Spacing
// ────────────────────────────────────────────────────────────────────────────

/// Spacing multiplier for a visual density preference: tight 0.7,
/// balanced 1.0, airy 1.5.
pub fn density_factor(visual_density: VisualDensity) -> f64 {
    match visual_density {
        VisualDensity::Tight => 0.7,
        VisualDensity::Balanced => 1.0,
        VisualDensity::Airy => 1.5,
    }
}

/// Vertical spacing (before, after) in inches for an element at the given
/// hierarchy level, scaled by the density factor.
pub fn element_spacing(hierarchy_level: u8, density_factor: f64) -> (f64, f64) {
    let (base_before, base_after) = match hierarchy_level {
        1 => (1.0, 0.5),   // title
        2 => (0.75, 0.3),  // heading
        3 => (0.5, 0.25),  // subheading
        5 => (0.2, 0.2),   // caption
        _ => (0.3, 0.3),   // body
    };
    (base_before * density_factor, base_after * density_factor)
}

// ────────────────────────────────────────────────────────────────────────────
// Contrast
// ────────────────────────────────────────────────────────────────────────────

/// WCAG contrast ratio between two hex colors, 1.0 to 21.0.
///
/// Returns `None` when either color is not a parseable `#rrggbb` value.
pub fn contrast_ratio(foreground: &str, background: &str) -> Option<f64> {
    let fg = relative_luminance(hex_to_rgb(foreground)?);
    let bg = relative_luminance(hex_to_rgb(background)?);

    let lighter = fg.max(bg);
    let darker = fg.min(bg);

    Some((lighter + 0.05) / (darker + 0.05))
}

fn hex_to_rgb(hex_color: &str) -> Option<[u8; 3]> {
    let hex = hex_color.strip_prefix('#').unwrap_or(hex_color);
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some([r, g, b])
}

fn relative_luminance(rgb: [u8; 3]) -> f64 {
    let linearize = |channel: u8| {
        let c = channel as f64 / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    0.2126 * linearize(rgb[0]) + 0.7152 * linearize(rgb[1]) + 0.0722 * linearize(rgb[2])
}

// ────────────────────────────────────────────────────────────────────────────
// Grid snapping
// ────────────────────────────────────────────────────────────────────────────

/// Snaps an x-coordinate to the nearest column start on the 12-column grid.
pub fn snap_to_column(x_position: f64) -> f64 {
    let column_width = column_width(PAGE_WIDTH_IN);
    let mut snapped = MARGIN_IN;
    let mut best_distance = (MARGIN_IN - x_position).abs();

    for column in 1..GRID_COLUMNS {
        let start = MARGIN_IN + column as f64 * (column_width + GUTTER_IN);
        let distance = (start - x_position).abs();
        if distance < best_distance {
            best_distance = distance;
            snapped = start;
        }
    }
    snapped
}

/// Snaps a y-coordinate to the nearest multiple of the baseline grid.
pub fn snap_to_baseline(y_position: f64, baseline_grid: f64) -> f64 {
    (y_position / baseline_grid).round() * baseline_grid
}

/// Width of a single grid column for the given page width.
pub fn column_width(page_width: f64) -> f64 {
    let usable_width = page_width - 2.0 * MARGIN_IN;
    let total_gutter = GUTTER_IN * (GRID_COLUMNS as f64 - 1.0);
    (usable_width - total_gutter) / GRID_COLUMNS as f64
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
