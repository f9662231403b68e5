use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

pub const NO_COLOR: Color32 = Color32::from_rgb(99, 110, 250);
pub const YES_COLOR: Color32 = Color32::from_rgb(239, 85, 59);
pub const BAR_COLOR: Color32 = Color32::from_rgb(0, 150, 199);

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Category colours: bucket label → Color32
// ---------------------------------------------------------------------------

/// Stable colours for the categories of a stacked chart.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Assign colours to `labels` in the given order. Repeats are ignored.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ordered: Vec<String> = Vec::new();
        for label in labels {
            let label = label.into();
            if !ordered.contains(&label) {
                ordered.push(label);
            }
        }
        let palette = generate_palette(ordered.len());
        ColorMap {
            mapping: ordered.into_iter().zip(palette).collect(),
            default_color: Color32::GRAY,
        }
    }

    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping
            .get(label)
            .copied()
            .unwrap_or(self.default_color)
    }
}
