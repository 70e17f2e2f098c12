use std::fmt;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Lab, LinSrgb, Mix, Srgb};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Themes: sequential colour scales for the heatmap
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Blues,
    Viridis,
    Plasma,
    Inferno,
    Magma,
    Turbo,
}

impl Theme {
    pub const ALL: [Theme; 6] = [
        Theme::Blues,
        Theme::Viridis,
        Theme::Plasma,
        Theme::Inferno,
        Theme::Magma,
        Theme::Turbo,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Theme::Blues => "blues",
            Theme::Viridis => "viridis",
            Theme::Plasma => "plasma",
            Theme::Inferno => "inferno",
            Theme::Magma => "magma",
            Theme::Turbo => "turbo",
        }
    }

    /// Anchor colours, low → high.
    fn stops(self) -> &'static [u32] {
        match self {
            Theme::Blues => &[0xf7fbff, 0xc6dbef, 0x6baed6, 0x2171b5, 0x08306b],
            Theme::Viridis => &[0x440154, 0x3b528b, 0x21918c, 0x5ec962, 0xfde725],
            Theme::Plasma => &[0x0d0887, 0x7e03a8, 0xcc4778, 0xf89540, 0xf0f921],
            Theme::Inferno => &[0x000004, 0x57106e, 0xbc3754, 0xf98e09, 0xfcffa4],
            Theme::Magma => &[0x000004, 0x51127c, 0xb73779, 0xfc8961, 0xfcfdbf],
            Theme::Turbo => &[0x30123b, 0x4686fb, 0x1ae4b6, 0xa4fc3c, 0xfb8022, 0x7a0403],
        }
    }

    pub fn scale(self) -> ColorScale {
        ColorScale::from_hex(self.stops())
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Piecewise-linear colour scale, interpolated in linear RGB.
#[derive(Debug, Clone)]
pub struct ColorScale {
    stops: Vec<LinSrgb>,
}

impl ColorScale {
    fn from_hex(hex: &[u32]) -> Self {
        let stops = hex
            .iter()
            .map(|&h| {
                let rgb = Srgb::new((h >> 16) as u8, (h >> 8) as u8, h as u8);
                rgb.into_format::<f32>().into_linear()
            })
            .collect();
        ColorScale { stops }
    }

    /// Colour for `t` in `[0, 1]`; out-of-range values are clamped.
    pub fn sample(&self, t: f64) -> Srgb {
        let Some(&first) = self.stops.first() else {
            return Srgb::new(0.5, 0.5, 0.5);
        };
        if self.stops.len() == 1 || !t.is_finite() {
            return Srgb::from_linear(first);
        }
        let segments = (self.stops.len() - 1) as f32;
        let pos = t.clamp(0.0, 1.0) as f32 * segments;
        let i = (pos.floor() as usize).min(self.stops.len() - 2);
        let mixed = self.stops[i].mix(self.stops[i + 1], pos - i as f32);
        Srgb::from_linear(mixed)
    }

    /// Colour for a percentage in `[0, 100]`.
    pub fn color_for_percent(&self, percent: f64) -> Color32 {
        to_color32(self.sample(percent / 100.0))
    }

    /// Black or white, whichever reads better on top of `percent`'s colour.
    pub fn label_color_for_percent(&self, percent: f64) -> Color32 {
        let lab: Lab = self.sample(percent / 100.0).into_color();
        if lab.l > 60.0 {
            Color32::BLACK
        } else {
            Color32::WHITE
        }
    }
}

// ---------------------------------------------------------------------------
// Qualitative palette for categorical bars
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct pastel colours using evenly spaced hues.
/// `hue_offset` lets two charts on one screen use different colour sets.
pub fn qualitative_palette(n: usize, hue_offset: f32) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = hue_offset + (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.55, 0.65);
            let rgb: Srgb = hsl.into_color();
            to_color32(rgb)
        })
        .collect()
}

fn to_color32(rgb: Srgb) -> Color32 {
    let rgb = rgb.into_format::<u8>();
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_endpoints_match_stops() {
        let scale = Theme::Viridis.scale();
        assert_eq!(scale.color_for_percent(0.0), Color32::from_rgb(0x44, 0x01, 0x54));
        assert_eq!(scale.color_for_percent(100.0), Color32::from_rgb(0xfd, 0xe7, 0x25));
        // Clamped outside [0, 100].
        assert_eq!(scale.color_for_percent(150.0), scale.color_for_percent(100.0));
        assert_eq!(scale.color_for_percent(-5.0), scale.color_for_percent(0.0));
    }

    #[test]
    fn label_color_contrasts_with_tile() {
        let blues = Theme::Blues.scale();
        assert_eq!(blues.label_color_for_percent(0.0), Color32::BLACK);
        assert_eq!(blues.label_color_for_percent(100.0), Color32::WHITE);
    }

    #[test]
    fn qualitative_palette_is_distinct() {
        let colors = qualitative_palette(5, 0.0);
        assert_eq!(colors.len(), 5);
        for (i, a) in colors.iter().enumerate() {
            assert!(colors[i + 1..].iter().all(|b| a != b));
        }
        assert!(qualitative_palette(0, 0.0).is_empty());
    }

    #[test]
    fn theme_names_round_trip_through_serde() {
        for theme in Theme::ALL {
            let json = serde_json::to_string(&theme).unwrap();
            assert_eq!(json, format!("\"{}\"", theme.name()));
            assert_eq!(format!("{theme:<8}|"), format!("{:<8}|", theme.name()));
        }
    }
}
