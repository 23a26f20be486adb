use std::collections::{BTreeMap, BTreeSet};

use palette::{Hsl, IntoColor, Srgb};
use plotters::style::RGBColor;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<RGBColor> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.45);
            let rgb: Srgb = hsl.into_color();
            RGBColor(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: Reynolds number → RGBColor
// ---------------------------------------------------------------------------

/// Assigns each Reynolds number a fixed colour so a condition looks the same
/// on the drag, lift and L/D charts.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<u64, RGBColor>,
    default_color: RGBColor,
}

impl ColorMap {
    pub fn new(reynolds_numbers: &BTreeSet<u64>) -> Self {
        let palette = generate_palette(reynolds_numbers.len());
        let mapping = reynolds_numbers.iter().copied().zip(palette).collect();

        ColorMap {
            mapping,
            default_color: RGBColor(128, 128, 128),
        }
    }

    pub fn color_for(&self, reynolds_number: u64) -> RGBColor {
        self.mapping
            .get(&reynolds_number)
            .copied()
            .unwrap_or(self.default_color)
    }
}
