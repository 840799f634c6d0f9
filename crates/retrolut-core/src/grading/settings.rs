//! Resolved per-frame grading settings.
//!
//! `AdjustmentSettings` and `CurveSettings` are plain value bags produced by
//! [`crate::grading::volume::VolumeStack::resolve`] (or built directly). The
//! renderer only reads them.

use palette::{LinSrgb, Srgb};
use serde::{Deserialize, Serialize};

use crate::grading::curve::TextureCurve;

/// Declared range of `contrast`.
pub const CONTRAST_RANGE: (f32, f32) = (-100.0, 100.0);
/// Declared range of `hue_shift`, in degrees.
pub const HUE_SHIFT_RANGE: (f32, f32) = (-180.0, 180.0);
/// Declared range of `saturation`.
pub const SATURATION_RANGE: (f32, f32) = (-100.0, 100.0);

/// Color adjustments baked into the LUT.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjustmentSettings {
    /// Blend strength of the graded result. Applied downstream, not baked.
    pub intensity: f32,
    /// Expands or shrinks the tonal range. `[-100, 100]`, 0 = neutral.
    pub contrast: f32,
    /// Multiplicative tint, sRGB-encoded. HDR values above 1 are allowed.
    pub color_filter: [f32; 3],
    /// Hue rotation in degrees. `[-180, 180]`, 0 = neutral.
    pub hue_shift: f32,
    /// Saturation push. `[-100, 100]`, 0 = neutral.
    pub saturation: f32,
}

impl Default for AdjustmentSettings {
    /// Identity adjustments: the LUT passes colors through unchanged.
    fn default() -> Self {
        Self {
            intensity: 1.0,
            contrast: 0.0,
            color_filter: [1.0, 1.0, 1.0],
            hue_shift: 0.0,
            saturation: 0.0,
        }
    }
}

impl AdjustmentSettings {
    /// Color filter converted to linear space.
    pub fn linear_color_filter(&self) -> [f32; 3] {
        let [r, g, b] = self.color_filter;
        let linear: LinSrgb<f32> = Srgb::new(r, g, b).into_linear();
        [linear.red, linear.green, linear.blue]
    }

    /// Clamp every field with a declared range into that range.
    pub fn clamped(self) -> Self {
        Self {
            contrast: self.contrast.clamp(CONTRAST_RANGE.0, CONTRAST_RANGE.1),
            hue_shift: self.hue_shift.clamp(HUE_SHIFT_RANGE.0, HUE_SHIFT_RANGE.1),
            saturation: self.saturation.clamp(SATURATION_RANGE.0, SATURATION_RANGE.1),
            ..self
        }
    }
}

/// The eight tone-response curves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveSettings {
    pub master: TextureCurve,
    pub red: TextureCurve,
    pub green: TextureCurve,
    pub blue: TextureCurve,

    pub hue_vs_hue: TextureCurve,
    pub hue_vs_sat: TextureCurve,
    pub sat_vs_sat: TextureCurve,
    pub lum_vs_sat: TextureCurve,
}

impl Default for CurveSettings {
    fn default() -> Self {
        Self {
            master: TextureCurve::identity(),
            red: TextureCurve::identity(),
            green: TextureCurve::identity(),
            blue: TextureCurve::identity(),
            hue_vs_hue: TextureCurve::flat(0.5, true),
            hue_vs_sat: TextureCurve::flat(0.5, true),
            sat_vs_sat: TextureCurve::flat(0.5, false),
            lum_vs_sat: TextureCurve::flat(0.5, false),
        }
    }
}

/// Everything the LUT pass reads for one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigurationSnapshot {
    pub adjustments: AdjustmentSettings,
    pub curves: CurveSettings,
}
