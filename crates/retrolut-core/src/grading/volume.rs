//! Layered configuration stack ("volumes").
//!
//! Each [`VolumeLayer`] overrides any subset of the grading fields. The stack
//! resolves to a single [`ConfigurationSnapshot`] by starting from defaults
//! and applying layers in ascending priority:
//!
//! ```text
//! value = lerp(value, layer_value, weight)    // scalars and color
//! curve = layer_curve  if weight > 0          // curves are replaced
//! ```
//!
//! Ties in priority keep insertion order. A NaN weight counts as 0. Fields
//! with a declared range are clamped after resolution.

use serde::{Deserialize, Serialize};

use crate::error::LutError;
use crate::grading::curve::TextureCurve;
use crate::grading::settings::{AdjustmentSettings, ConfigurationSnapshot, CurveSettings};

/// Per-field overrides for [`AdjustmentSettings`]. `None` leaves the field alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjustmentOverrides {
    pub intensity: Option<f32>,
    pub contrast: Option<f32>,
    pub color_filter: Option<[f32; 3]>,
    pub hue_shift: Option<f32>,
    pub saturation: Option<f32>,
}

/// Per-curve overrides for [`CurveSettings`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveOverrides {
    pub master: Option<TextureCurve>,
    pub red: Option<TextureCurve>,
    pub green: Option<TextureCurve>,
    pub blue: Option<TextureCurve>,
    pub hue_vs_hue: Option<TextureCurve>,
    pub hue_vs_sat: Option<TextureCurve>,
    pub sat_vs_sat: Option<TextureCurve>,
    pub lum_vs_sat: Option<TextureCurve>,
}

/// One prioritized override bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeLayer {
    pub name: String,
    #[serde(default)]
    pub priority: i32,
    /// Blend weight in `[0, 1]`. Out-of-range values are clamped.
    #[serde(default = "full_weight")]
    pub weight: f32,
    #[serde(default)]
    pub adjustments: AdjustmentOverrides,
    #[serde(default)]
    pub curves: CurveOverrides,
}

fn full_weight() -> f32 {
    1.0
}

impl VolumeLayer {
    /// A full-weight layer with no overrides.
    pub fn new(name: impl Into<String>, priority: i32) -> Self {
        Self {
            name: name.into(),
            priority,
            weight: 1.0,
            adjustments: AdjustmentOverrides::default(),
            curves: CurveOverrides::default(),
        }
    }

    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_adjustments(mut self, adjustments: AdjustmentOverrides) -> Self {
        self.adjustments = adjustments;
        self
    }

    pub fn with_curves(mut self, curves: CurveOverrides) -> Self {
        self.curves = curves;
        self
    }
}

/// Serialized list of layers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VolumeProfile {
    #[serde(default)]
    pub layers: Vec<VolumeLayer>,
}

/// The layered stack that resolves effective grading settings.
#[derive(Debug, Clone, Default)]
pub struct VolumeStack {
    layers: Vec<VolumeLayer>,
}

impl VolumeStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load layers from a JSON [`VolumeProfile`].
    pub fn from_json(json: &str) -> Result<Self, LutError> {
        let profile: VolumeProfile = serde_json::from_str(json)?;
        tracing::debug!("Loaded volume profile with {} layers", profile.layers.len());
        Ok(Self {
            layers: profile.layers,
        })
    }

    pub fn push(&mut self, layer: VolumeLayer) {
        self.layers.push(layer);
    }

    /// Remove every layer with the given name. Returns how many were removed.
    pub fn remove(&mut self, name: &str) -> usize {
        let before = self.layers.len();
        self.layers.retain(|layer| layer.name != name);
        before - self.layers.len()
    }

    pub fn layers(&self) -> &[VolumeLayer] {
        &self.layers
    }

    /// Merge all layers over the defaults.
    pub fn resolve(&self) -> ConfigurationSnapshot {
        let mut ordered: Vec<&VolumeLayer> = self.layers.iter().collect();
        // Stable: equal priorities keep insertion order.
        ordered.sort_by_key(|layer| layer.priority);

        let mut adjustments = AdjustmentSettings::default();
        let mut curves = CurveSettings::default();

        for layer in ordered {
            if layer.weight.is_nan() || layer.weight <= 0.0 {
                continue;
            }
            let weight = layer.weight.min(1.0);
            blend_adjustments(&mut adjustments, &layer.adjustments, weight);
            override_curves(&mut curves, &layer.curves);
        }

        ConfigurationSnapshot {
            adjustments: adjustments.clamped(),
            curves,
        }
    }
}

fn blend_adjustments(target: &mut AdjustmentSettings, overrides: &AdjustmentOverrides, weight: f32) {
    blend(&mut target.intensity, overrides.intensity, weight);
    blend(&mut target.contrast, overrides.contrast, weight);
    blend(&mut target.hue_shift, overrides.hue_shift, weight);
    blend(&mut target.saturation, overrides.saturation, weight);
    if let Some(color) = overrides.color_filter {
        for (c, v) in target.color_filter.iter_mut().zip(color) {
            *c = lerp(*c, v, weight);
        }
    }
}

fn override_curves(target: &mut CurveSettings, overrides: &CurveOverrides) {
    let pairs = [
        (&mut target.master, &overrides.master),
        (&mut target.red, &overrides.red),
        (&mut target.green, &overrides.green),
        (&mut target.blue, &overrides.blue),
        (&mut target.hue_vs_hue, &overrides.hue_vs_hue),
        (&mut target.hue_vs_sat, &overrides.hue_vs_sat),
        (&mut target.sat_vs_sat, &overrides.sat_vs_sat),
        (&mut target.lum_vs_sat, &overrides.lum_vs_sat),
    ];
    for (curve, replacement) in pairs {
        if let Some(replacement) = replacement {
            *curve = replacement.clone();
        }
    }
}

fn blend(value: &mut f32, layer_value: Option<f32>, weight: f32) {
    if let Some(v) = layer_value {
        *value = lerp(*value, v, weight);
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use glam::Vec4;

    use super::*;
    use crate::render::draw::pack_hue_sat_con;

    const EPSILON: f32 = 1e-5;

    fn saturation_layer(name: &str, priority: i32, saturation: f32) -> VolumeLayer {
        VolumeLayer::new(name, priority).with_adjustments(AdjustmentOverrides {
            saturation: Some(saturation),
            ..Default::default()
        })
    }

    #[test]
    fn test_empty_stack_resolves_to_defaults() {
        let snapshot = VolumeStack::new().resolve();
        assert_eq!(snapshot, ConfigurationSnapshot::default());
    }

    #[test]
    fn test_higher_priority_wins() {
        let mut stack = VolumeStack::new();
        stack.push(saturation_layer("high", 10, 80.0));
        stack.push(saturation_layer("low", 0, -50.0));
        assert_eq!(stack.resolve().adjustments.saturation, 80.0);
    }

    #[test]
    fn test_equal_priority_keeps_insertion_order() {
        let mut stack = VolumeStack::new();
        stack.push(saturation_layer("first", 0, 10.0));
        stack.push(saturation_layer("second", 0, 20.0));
        assert_eq!(stack.resolve().adjustments.saturation, 20.0);
    }

    #[test]
    fn test_partial_weight_blends_from_previous_value() {
        let mut stack = VolumeStack::new();
        stack.push(saturation_layer("half", 0, 40.0).with_weight(0.5));
        assert!((stack.resolve().adjustments.saturation - 20.0).abs() < EPSILON);
    }

    #[test]
    fn test_unset_fields_are_untouched() {
        let mut stack = VolumeStack::new();
        stack.push(saturation_layer("sat", 0, 40.0));
        let adjustments = stack.resolve().adjustments;
        assert_eq!(adjustments.contrast, 0.0);
        assert_eq!(adjustments.intensity, 1.0);
        assert_eq!(adjustments.color_filter, [1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_resolved_values_are_clamped() {
        let mut stack = VolumeStack::new();
        stack.push(VolumeLayer::new("loud", 0).with_adjustments(AdjustmentOverrides {
            contrast: Some(500.0),
            hue_shift: Some(-400.0),
            ..Default::default()
        }));
        let adjustments = stack.resolve().adjustments;
        assert_eq!(adjustments.contrast, 100.0);
        assert_eq!(adjustments.hue_shift, -180.0);
    }

    #[test]
    fn test_zero_weight_layer_is_ignored() {
        let mut stack = VolumeStack::new();
        stack.push(
            VolumeLayer::new("off", 0)
                .with_weight(0.0)
                .with_curves(CurveOverrides {
                    master: Some(TextureCurve::flat(0.2, false)),
                    ..Default::default()
                }),
        );
        assert_eq!(stack.resolve().curves, CurveSettings::default());
    }

    #[test]
    fn test_nan_weight_layer_is_ignored() {
        let mut stack = VolumeStack::new();
        stack.push(
            VolumeLayer::new("broken", 0)
                .with_weight(f32::NAN)
                .with_adjustments(AdjustmentOverrides {
                    saturation: Some(50.0),
                    ..Default::default()
                })
                .with_curves(CurveOverrides {
                    master: Some(TextureCurve::flat(0.2, false)),
                    ..Default::default()
                }),
        );

        let resolved = stack.resolve();
        assert_eq!(resolved.adjustments, AdjustmentSettings::default());
        assert_eq!(resolved.curves, CurveSettings::default());
        assert_eq!(pack_hue_sat_con(&resolved.adjustments), Vec4::new(0.0, 1.0, 1.0, 0.0));
    }

    #[test]
    fn test_curve_override_replaces_curve() {
        let mut stack = VolumeStack::new();
        let curve = TextureCurve::flat(0.25, true);
        stack.push(VolumeLayer::new("curves", 0).with_weight(0.3).with_curves(CurveOverrides {
            hue_vs_sat: Some(curve.clone()),
            ..Default::default()
        }));
        assert_eq!(stack.resolve().curves.hue_vs_sat, curve);
    }

    #[test]
    fn test_remove_by_name() {
        let mut stack = VolumeStack::new();
        stack.push(saturation_layer("a", 0, 10.0));
        stack.push(saturation_layer("b", 0, 20.0));
        assert_eq!(stack.remove("a"), 1);
        assert_eq!(stack.layers().len(), 1);
        assert_eq!(stack.remove("missing"), 0);
    }

    #[test]
    fn test_from_json_profile() {
        let json = r#"{
            "layers": [
                { "name": "global", "adjustments": { "contrast": 20.0 } },
                { "name": "cave", "priority": 5, "weight": 0.5,
                  "adjustments": { "color_filter": [0.5, 0.5, 1.0] } }
            ]
        }"#;
        let stack = VolumeStack::from_json(json).unwrap();
        let adjustments = stack.resolve().adjustments;
        assert_eq!(adjustments.contrast, 20.0);
        assert!((adjustments.color_filter[0] - 0.75).abs() < EPSILON);
        assert_eq!(adjustments.color_filter[2], 1.0);
    }

    #[test]
    fn test_from_json_rejects_malformed_profile() {
        let err = VolumeStack::from_json("{ layers: ").unwrap_err();
        assert!(matches!(err, LutError::Profile(_)));
    }
}
