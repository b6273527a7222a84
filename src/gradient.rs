//! Color gradients for per-vertex field plotting

use serde::{Deserialize, Serialize};

/// 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const BLUE: Color = Color::new(0, 0, 255);
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const RED: Color = Color::new(255, 0, 0);

    /// Linear blend, `t` in [0, 1].
    pub fn interpolate(a: Color, b: Color, t: f64) -> Color {
        let mix = |a: u8, b: u8| ((b as f64 * t) as u16 + (a as f64 * (1.0 - t)) as u16) as u8;
        Color::new(mix(a.r, b.r), mix(a.g, b.g), mix(a.b, b.b))
    }
}

/// Maps scalar values onto evenly spaced color stops.
///
/// Unsigned gradients span `0..=max` (magnitude plots, von Mises),
/// signed gradients span `min..=max` around zero (tension/compression
/// channels). Out-of-range values clamp to the end stops.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Gradient {
    Unsigned { max: f64, stops: Vec<Color> },
    Signed { min: f64, max: f64, stops: Vec<Color> },
}

impl Gradient {
    /// Blue-white-red over `0..=max`.
    pub fn unsigned(max: f64) -> Self {
        Gradient::Unsigned {
            max,
            stops: vec![Color::BLUE, Color::WHITE, Color::RED],
        }
    }

    /// Blue-white-red over `-max..=max`.
    pub fn signed(max: f64) -> Self {
        Gradient::Signed {
            min: -max,
            max,
            stops: vec![Color::BLUE, Color::WHITE, Color::RED],
        }
    }

    pub fn with_stops(mut self, new_stops: Vec<Color>) -> Self {
        match &mut self {
            Gradient::Unsigned { stops, .. } | Gradient::Signed { stops, .. } => {
                *stops = new_stops
            }
        }
        self
    }

    pub fn color_at(&self, x: f64) -> Color {
        let (lo, hi, stops) = match self {
            Gradient::Unsigned { max, stops } => (0.0, *max, stops),
            Gradient::Signed { min, max, stops } => (*min, *max, stops),
        };
        if x <= lo || hi <= lo {
            return stops[0];
        }
        if x >= hi {
            return stops[stops.len() - 1];
        }

        let t = (x - lo) / (hi - lo) * (stops.len() - 1) as f64;
        let i = t.floor() as usize;
        Color::interpolate(stops[i], stops[i + 1], t - i as f64)
    }

    /// One color per value; the usual per-vertex color array.
    pub fn colors(&self, values: &[f32]) -> Vec<Color> {
        values.iter().map(|&v| self.color_at(v as f64)).collect()
    }
}
