use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Sequential color ramp: metric value → fill color
// ---------------------------------------------------------------------------

/// Maps metric values onto a pale-yellow → deep-green ramp, the usual
/// vegetation palette for choropleths.
#[derive(Debug, Clone, Copy)]
pub struct ColorRamp {
    min: f64,
    max: f64,
}

impl ColorRamp {
    /// Build a ramp spanning the given values.  Collapsed or empty ranges
    /// produce a flat mid-ramp color rather than dividing by zero.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Self {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in values {
            min = min.min(v);
            max = max.max(v);
        }
        if !min.is_finite() || !max.is_finite() {
            return ColorRamp { min: 0.0, max: 0.0 };
        }
        ColorRamp { min, max }
    }

    /// Fill color for one value, clamped to the ramp's range.
    pub fn color_for(&self, value: f64) -> Color32 {
        let t = if (self.max - self.min).abs() < f64::EPSILON {
            0.5
        } else {
            ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
        };
        ramp_color(t as f32)
    }
}

/// Interpolate the ramp at `t ∈ [0, 1]`: hue 55° (straw) to 140° (forest
/// green), darkening as the value grows.
fn ramp_color(t: f32) -> Color32 {
    let hue = 55.0 + t * 85.0;
    let lightness = 0.85 - t * 0.5;
    let hsl = Hsl::new(hue, 0.7, lightness);
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}
