//! Sequential blue colormap
//!
//! The anchor colors are the 9-class ColorBrewer "Blues" scheme, from
//! almost white to dark navy.
use plotters::style::RGBColor;

const BLUES: [(u8, u8, u8); 9] = [
    (247, 251, 255),
    (222, 235, 247),
    (198, 219, 239),
    (158, 202, 225),
    (107, 174, 214),
    (66, 146, 198),
    (33, 113, 181),
    (8, 81, 156),
    (8, 48, 107),
];

/// Linear colormap over the Blues anchors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Blues {
    reversed: bool,
}

impl Blues {
    /// Light for low values, dark for high values
    pub fn new() -> Self {
        Self { reversed: false }
    }

    /// Dark for low values, light for high values
    ///
    /// Used for p-values, where small values are the interesting ones.
    pub fn reversed() -> Self {
        Self { reversed: true }
    }

    /// Returns the color at position `t`
    ///
    /// `t` is clamped into `0.0..=1.0`, `NaN` maps to `0.0`
    pub fn color(&self, t: f64) -> RGBColor {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let t = if self.reversed { 1.0 - t } else { t };

        let last = BLUES.len() - 1;
        let scaled = t * crate::f64_from_usize(last);
        // `scaled` is within 0..=8
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let lower = (scaled.floor() as usize).min(last - 1);
        let frac = scaled - crate::f64_from_usize(lower);

        let (r0, g0, b0) = BLUES[lower];
        let (r1, g1, b1) = BLUES[lower + 1];
        RGBColor(lerp(r0, r1, frac), lerp(g0, g1, frac), lerp(b0, b1, frac))
    }
}

fn lerp(a: u8, b: u8, frac: f64) -> u8 {
    let value = f64::from(a) + (f64::from(b) - f64::from(a)) * frac;
    // always within the range of the two u8 inputs
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let value = value.round() as u8;
    value
}

/// Maps `value` into `0.0..=1.0` relative to `min..=max`
///
/// If `min` and `max` are equal, every value maps to `0.0`
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
    let span = max - min;
    if span <= 0.0 || !span.is_finite() {
        return 0.0;
    }
    ((value - min) / span).clamp(0.0, 1.0)
}
