// Scalar-to-color mapping for RAS cells and the correlation heatmap.
//
// Every function here is total: bad input maps to a fixed neutral color.

use std::fmt;

use serde::Serialize;

/// 24-bit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    pub const fn from_hex(hex: u32) -> Self {
        Rgb {
            r: ((hex >> 16) & 0xff) as u8,
            g: ((hex >> 8) & 0xff) as u8,
            b: (hex & 0xff) as u8,
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Color for absent or invalid input.
pub const MISSING: Rgb = Rgb::from_hex(0xf0f0f0);
/// Midpoint of a two-sided scale and low end of a one-sided scale.
pub const MIDPOINT: Rgb = Rgb::new(255, 255, 255);
/// Background for a RAS cell without a score.
pub const RAS_MISSING: Rgb = Rgb::from_hex(0xcccccc);

pub const TEXT_LIGHT: Rgb = Rgb::new(255, 255, 255);
pub const TEXT_DARK: Rgb = Rgb::new(0, 0, 0);

// ---------------------------------------------------------------------------
// Domain
// ---------------------------------------------------------------------------

/// Closed value range a scale is drawn over.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleDomain {
    pub min: f64,
    pub max: f64,
}

impl ScaleDomain {
    /// Correlation coefficients.
    pub const CORRELATION: ScaleDomain = ScaleDomain { min: -1.0, max: 1.0 };
    /// Model probabilities.
    pub const PROBABILITY: ScaleDomain = ScaleDomain { min: 0.0, max: 1.0 };
    /// RAS values.
    pub const RAS: ScaleDomain = ScaleDomain { min: 0.0, max: 10.0 };

    pub const fn new(min: f64, max: f64) -> Self {
        ScaleDomain { min, max }
    }

    fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min < self.max
    }

    /// A domain that straddles zero gets a diverging scale centered on 0.
    pub fn is_two_sided(&self) -> bool {
        self.min < 0.0 && self.max > 0.0
    }
}

// ---------------------------------------------------------------------------
// Scales
// ---------------------------------------------------------------------------

fn intensity(t: f64) -> u8 {
    (t.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn toward_red(i: u8) -> Rgb {
    Rgb::new(255, 255 - i, 255 - i)
}

fn toward_blue(i: u8) -> Rgb {
    Rgb::new(255 - i, 255 - i, 255)
}

/// Map `value` onto a color scale over `domain`.
///
/// Two-sided domains fade white -> red above zero and white -> blue below,
/// each side scaled to its own bound. One-sided domains fade white -> red
/// from `min` to `max`. Out-of-range values clamp. Absent, non-finite, or
/// degenerate input yields [`MISSING`].
pub fn color_for_scalar(value: Option<f64>, domain: ScaleDomain) -> Rgb {
    let Some(v) = value.filter(|v| v.is_finite()) else {
        return MISSING;
    };
    if !domain.is_valid() {
        return MISSING;
    }
    let v = v.clamp(domain.min, domain.max);

    if domain.is_two_sided() {
        if v >= 0.0 {
            toward_red(intensity(v / domain.max))
        } else {
            toward_blue(intensity(v / domain.min))
        }
    } else {
        toward_red(intensity((v - domain.min) / (domain.max - domain.min)))
    }
}

/// Text color that stays readable on a heatmap cell.
pub fn contrast_text(value: Option<f64>) -> Rgb {
    match value {
        Some(v) if v.abs() > 0.5 => TEXT_LIGHT,
        _ => TEXT_DARK,
    }
}

/// Pastel band for a RAS cell, from light red (< 2) to light green (>= 9).
pub fn ras_band_color(score: Option<f64>) -> Rgb {
    let Some(ras) = score.filter(|s| s.is_finite()) else {
        return RAS_MISSING;
    };
    let hex = if ras >= 9.0 {
        0xc6f6d5
    } else if ras >= 8.0 {
        0xd4edd4
    } else if ras >= 7.0 {
        0xe2f5d3
    } else if ras >= 6.0 {
        0xf0fad2
    } else if ras >= 5.0 {
        0xfafad2
    } else if ras >= 4.0 {
        0xfaecd2
    } else if ras >= 3.0 {
        0xfaded2
    } else if ras >= 2.0 {
        0xfad0d2
    } else {
        0xfac2c2
    };
    Rgb::from_hex(hex)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
