//! GPU layout of the LUT builder's uniform block.

use retrolut_core::{DrawParameters, ShaderProperty};

/// Mirrors `LutUniforms` in `lut_builder.wgsl`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LutBuilderUniforms {
    pub lut_params: [f32; 4],
    pub color_filter: [f32; 4],
    pub hue_sat_con: [f32; 4],
    /// Column-major.
    pub fullscreen_proj: [[f32; 4]; 4],
}

impl LutBuilderUniforms {
    /// Pack draw parameters. Missing vectors are zero, a missing matrix is identity.
    pub fn from_params(params: &DrawParameters) -> Self {
        let vector = |p: ShaderProperty| params.vector(p).unwrap_or_default().to_array();
        Self {
            lut_params: vector(ShaderProperty::LutParams),
            color_filter: vector(ShaderProperty::ColorFilter),
            hue_sat_con: vector(ShaderProperty::HueSatCon),
            fullscreen_proj: params
                .matrix(ShaderProperty::FullscreenProjMat)
                .unwrap_or_default()
                .to_cols_array_2d(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat4, Vec4};

    #[test]
    fn test_size_is_uniform_aligned() {
        assert_eq!(std::mem::size_of::<LutBuilderUniforms>(), 112);
        assert_eq!(std::mem::size_of::<LutBuilderUniforms>() % 16, 0);
    }

    #[test]
    fn test_from_params_copies_vectors() {
        let params = DrawParameters::builder()
            .vector(ShaderProperty::HueSatCon, Vec4::new(0.5, 2.0, 1.0, 0.0))
            .matrix(ShaderProperty::FullscreenProjMat, Mat4::from_scale(glam::Vec3::splat(2.0)))
            .build();
        let u = LutBuilderUniforms::from_params(&params);
        assert_eq!(u.hue_sat_con, [0.5, 2.0, 1.0, 0.0]);
        assert_eq!(u.lut_params, [0.0; 4]);
        assert_eq!(u.fullscreen_proj[0][0], 2.0);
        assert_eq!(u.fullscreen_proj[3][3], 1.0);
    }
}
