use palette::{Hsl, IntoColor, Srgb};
use plotters::style::RGBColor;

// ---------------------------------------------------------------------------
// Fixed line colours
// ---------------------------------------------------------------------------

pub const BLUE: RGBColor = RGBColor(0, 0, 255);
pub const GREEN: RGBColor = RGBColor(0, 128, 0);
pub const RED: RGBColor = RGBColor(255, 0, 0);

/// Colours for compounds in command-line order: the baseline is green, the
/// second compound red and the third blue.
pub const COMPOUND_COLORS: [RGBColor; 3] = [GREEN, RED, BLUE];

/// Colour for the compound at `index`, cycling past the third.
pub fn compound_color(index: usize) -> RGBColor {
    COMPOUND_COLORS[index % COMPOUND_COLORS.len()]
}

// ---------------------------------------------------------------------------
// Shade generator
// ---------------------------------------------------------------------------

/// Hue used for spin-up ion magnetization curves.
pub const SPIN_UP_HUE: f32 = 120.0;
/// Hue used for spin-down ion magnetization curves.
pub const SPIN_DOWN_HUE: f32 = 240.0;

/// Generates `n` shades of one hue, from dark to light, so curves of the same
/// family stay distinguishable.
pub fn generate_shades(hue: f32, n: usize) -> Vec<RGBColor> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let t = if n == 1 { 0.0 } else { i as f32 / (n - 1) as f32 };
            let hsl = Hsl::new(hue, 0.8, 0.25 + 0.35 * t);
            let rgb: Srgb = hsl.into_color();
            RGBColor(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}
