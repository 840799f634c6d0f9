//! Immutable per-draw shader parameters and their builder.
//!
//! Constants are accumulated on a [`DrawParametersBuilder`] and frozen into
//! a [`DrawParameters`] value that is handed to the recorder in one call.

use std::collections::BTreeMap;

use glam::{Mat4, Vec4};

use crate::grading::curve::BakedCurve;
use crate::grading::settings::AdjustmentSettings;
use crate::render::property::ShaderProperty;

/// Everything a full-screen draw binds, keyed by shader property.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawParameters {
    vectors: BTreeMap<ShaderProperty, Vec4>,
    matrices: BTreeMap<ShaderProperty, Mat4>,
    curves: BTreeMap<ShaderProperty, BakedCurve>,
}

impl DrawParameters {
    pub fn builder() -> DrawParametersBuilder {
        DrawParametersBuilder::default()
    }

    pub fn vector(&self, property: ShaderProperty) -> Option<Vec4> {
        self.vectors.get(&property).copied()
    }

    pub fn matrix(&self, property: ShaderProperty) -> Option<Mat4> {
        self.matrices.get(&property).copied()
    }

    pub fn curve(&self, property: ShaderProperty) -> Option<&BakedCurve> {
        self.curves.get(&property)
    }

    pub fn curves(&self) -> impl Iterator<Item = (ShaderProperty, &BakedCurve)> {
        self.curves.iter().map(|(p, c)| (*p, c))
    }
}

/// Accumulates constants for a [`DrawParameters`].
#[derive(Debug, Default)]
pub struct DrawParametersBuilder {
    params: DrawParameters,
}

impl DrawParametersBuilder {
    pub fn vector(mut self, property: ShaderProperty, value: Vec4) -> Self {
        self.params.vectors.insert(property, value);
        self
    }

    pub fn matrix(mut self, property: ShaderProperty, value: Mat4) -> Self {
        self.params.matrices.insert(property, value);
        self
    }

    pub fn curve(mut self, property: ShaderProperty, curve: BakedCurve) -> Self {
        self.params.curves.insert(property, curve);
        self
    }

    pub fn build(self) -> DrawParameters {
        self.params
    }
}

/// Pack hue shift, saturation and contrast into shader units.
///
/// ```text
/// x = hue_shift / 360          // fraction of a turn
/// y = saturation / 100 + 1     // multiplier, 1 = neutral
/// z = contrast / 100 + 1       // multiplier, 1 = neutral
/// w = 0
/// ```
pub fn pack_hue_sat_con(adjustments: &AdjustmentSettings) -> Vec4 {
    Vec4::new(
        adjustments.hue_shift / 360.0,
        adjustments.saturation / 100.0 + 1.0,
        adjustments.contrast / 100.0 + 1.0,
        0.0,
    )
}

/// Adapt a projection matrix to the GPU's clip-space conventions.
///
/// Depth is remapped from `[-1, 1]` to `[0, 1]`. When rendering into a
/// texture on a top-left-origin API, Y is flipped so row 0 of the target
/// corresponds to `v = 0`.
pub fn gpu_projection_matrix(projection: Mat4, render_into_texture: bool) -> Mat4 {
    let flip = if render_into_texture {
        Mat4::from_scale(glam::Vec3::new(1.0, -1.0, 1.0))
    } else {
        Mat4::IDENTITY
    };
    let depth_remap = Mat4::from_cols(
        Vec4::X,
        Vec4::Y,
        Vec4::new(0.0, 0.0, 0.5, 0.0),
        Vec4::new(0.0, 0.0, 0.5, 1.0),
    );
    depth_remap * flip * projection
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::curve::TextureCurve;

    const EPSILON: f32 = 1e-6;

    fn hue_sat_con(hue_shift: f32, saturation: f32, contrast: f32) -> Vec4 {
        pack_hue_sat_con(&AdjustmentSettings {
            hue_shift,
            saturation,
            contrast,
            ..Default::default()
        })
    }

    #[test]
    fn test_neutral_adjustments_pack_to_identity() {
        assert_eq!(hue_sat_con(0.0, 0.0, 0.0), Vec4::new(0.0, 1.0, 1.0, 0.0));
    }

    #[test]
    fn test_hue_shift_extremes_are_half_turns() {
        assert!((hue_sat_con(180.0, 0.0, 0.0).x - 0.5).abs() < EPSILON);
        assert!((hue_sat_con(-180.0, 0.0, 0.0).x + 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_saturation_and_contrast_boundaries() {
        assert!((hue_sat_con(0.0, 100.0, 0.0).y - 2.0).abs() < EPSILON);
        assert!(hue_sat_con(0.0, -100.0, 0.0).y.abs() < EPSILON);
        assert!((hue_sat_con(0.0, 0.0, 100.0).z - 2.0).abs() < EPSILON);
        assert!(hue_sat_con(0.0, 0.0, -100.0).z.abs() < EPSILON);
    }

    #[test]
    fn test_texture_projection_flips_y_and_remaps_depth() {
        let m = gpu_projection_matrix(Mat4::IDENTITY, true);
        let top = m * Vec4::new(0.0, 1.0, -1.0, 1.0);
        assert_eq!(top.y, -1.0);
        assert!(top.z.abs() < EPSILON);

        let far = m * Vec4::new(0.0, 0.0, 1.0, 1.0);
        assert!((far.z - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_screen_projection_keeps_y() {
        let m = gpu_projection_matrix(Mat4::IDENTITY, false);
        let p = m * Vec4::new(0.25, 0.75, 0.0, 1.0);
        assert_eq!(p.x, 0.25);
        assert_eq!(p.y, 0.75);
        assert!((p.z - 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_builder_last_write_wins() {
        let params = DrawParameters::builder()
            .vector(ShaderProperty::HueSatCon, Vec4::ZERO)
            .vector(ShaderProperty::HueSatCon, Vec4::ONE)
            .curve(ShaderProperty::CurveMaster, TextureCurve::identity().bake())
            .build();
        assert_eq!(params.vector(ShaderProperty::HueSatCon), Some(Vec4::ONE));
        assert!(params.vector(ShaderProperty::LutParams).is_none());
        assert_eq!(params.curves().count(), 1);
    }
}
