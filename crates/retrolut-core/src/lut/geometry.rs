//! Strip layout of a 3D color cube flattened into a 2D texture.
//!
//! A cube of edge `N` is stored as `N` slices of `N x N` texels placed side
//! by side, giving a `N² x N` strip. Blue selects the slice, red runs along
//! the slice's width, green along the height.
//!
//! ```text
//! width  = N²
//! height = N
//! half_texel = (0.5 / width, 0.5 / height)
//! scale = N / (N − 1)
//! ```

use glam::Vec4;

use crate::error::LutError;

/// Largest accepted edge size. The strip is `N²` texels wide, so 128 gives a
/// 16384-wide texture, the common 2D limit of desktop adapters.
pub const MAX_LUT_SIZE: u32 = 128;

/// Texture dimensions and sampling constants for a LUT of a given edge size.
///
/// A pure function of `edge_size`; recomputed every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LutGeometry {
    pub edge_size: u32,
    pub width: u32,
    pub height: u32,
    /// Offset to the first texel center along U.
    pub half_texel_u: f32,
    /// Offset to the first texel center along V.
    pub half_texel_v: f32,
    /// Maps `N − 1` discrete steps onto the full `[0, 1]` range.
    pub scale: f32,
}

impl LutGeometry {
    /// Compute the geometry for `edge_size`.
    ///
    /// `edge_size` must be in `2..=MAX_LUT_SIZE`. This is only checked in
    /// debug builds; use [`LutGeometry::try_new`] for untrusted input.
    pub fn new(edge_size: u32) -> Self {
        debug_assert!(
            (2..=MAX_LUT_SIZE).contains(&edge_size),
            "LUT edge size must be in 2..={MAX_LUT_SIZE}, got {edge_size}"
        );

        let height = edge_size;
        let width = height * height;
        Self {
            edge_size,
            width,
            height,
            half_texel_u: 0.5 / width as f32,
            half_texel_v: 0.5 / height as f32,
            scale: height as f32 / (height as f32 - 1.0),
        }
    }

    /// Checked variant of [`LutGeometry::new`].
    pub fn try_new(edge_size: u32) -> Result<Self, LutError> {
        if !(2..=MAX_LUT_SIZE).contains(&edge_size) {
            return Err(LutError::InvalidGeometry { edge_size });
        }
        Ok(Self::new(edge_size))
    }

    /// Generator-side constants: `(height, half_texel_u, half_texel_v, scale)`.
    pub fn lut_params(&self) -> Vec4 {
        Vec4::new(
            self.height as f32,
            self.half_texel_u,
            self.half_texel_v,
            self.scale,
        )
    }

    /// Sampler-side constants: `(1 / width, 1 / height, height − 1, 0)`.
    ///
    /// Passes that sample the finished LUT read this instead of re-deriving
    /// the layout.
    pub fn inverse_params(&self) -> Vec4 {
        Vec4::new(
            1.0 / self.width as f32,
            1.0 / self.height as f32,
            self.height as f32 - 1.0,
            0.0,
        )
    }

    /// Color encoded by the texel at `(x, y)`, matching what the builder
    /// shader reconstructs from the texel-center UV.
    pub fn texel_color(&self, x: u32, y: u32) -> [f32; 3] {
        let steps = (self.edge_size - 1) as f32;
        let r = (x % self.edge_size) as f32 / steps;
        let b = (x / self.edge_size) as f32 / steps;
        let g = y as f32 / steps;
        [r, g, b]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;
    const SIZES: [u32; 6] = [2, 4, 8, 16, 32, 64];

    #[test]
    fn test_dimensions_follow_edge_size() {
        for n in SIZES {
            let g = LutGeometry::new(n);
            assert_eq!(g.width, n * n);
            assert_eq!(g.height, n);
            assert_eq!(g.width, g.height * g.height);
            let expected = n as f32 / (n as f32 - 1.0);
            assert!((g.scale - expected).abs() < EPSILON, "n={n}: {}", g.scale);
        }
    }

    #[test]
    fn test_half_texel_lands_on_texel_center() {
        for n in SIZES {
            let g = LutGeometry::new(n);
            assert!((g.half_texel_u * g.width as f32 - 0.5).abs() < EPSILON);
            assert!((g.half_texel_v * g.height as f32 - 0.5).abs() < EPSILON);
        }
    }

    #[test]
    fn test_inverse_params_match_generator_geometry() {
        for n in SIZES {
            let g = LutGeometry::new(n);
            let inv = g.inverse_params();
            assert!((inv.x * g.width as f32 - 1.0).abs() < EPSILON);
            assert!((inv.y * g.height as f32 - 1.0).abs() < EPSILON);
            assert_eq!(inv.z, (g.height - 1) as f32);
            assert_eq!(inv.w, 0.0);
        }
    }

    #[test]
    fn test_lut_params_layout() {
        let g = LutGeometry::new(32);
        let p = g.lut_params();
        assert_eq!(p.x, 32.0);
        assert!((p.y - 0.5 / 1024.0).abs() < EPSILON);
        assert!((p.z - 0.5 / 32.0).abs() < EPSILON);
        assert!((p.w - 32.0 / 31.0).abs() < EPSILON);
    }

    #[test]
    fn test_try_new_rejects_degenerate_sizes() {
        assert!(matches!(
            LutGeometry::try_new(1),
            Err(LutError::InvalidGeometry { edge_size: 1 })
        ));
        assert!(LutGeometry::try_new(0).is_err());
        assert_eq!(LutGeometry::try_new(2).unwrap(), LutGeometry::new(2));
    }

    #[test]
    fn test_try_new_rejects_oversized_strips() {
        let max = LutGeometry::try_new(MAX_LUT_SIZE).unwrap();
        assert_eq!(max.width, 16384);

        for edge_size in [MAX_LUT_SIZE + 1, 256, 65536, u32::MAX] {
            assert!(
                matches!(
                    LutGeometry::try_new(edge_size),
                    Err(LutError::InvalidGeometry { edge_size: e }) if e == edge_size
                ),
                "edge size {edge_size} accepted"
            );
        }
    }

    #[test]
    fn test_texel_color_corners() {
        let g = LutGeometry::new(4);
        assert_eq!(g.texel_color(0, 0), [0.0, 0.0, 0.0]);
        assert_eq!(g.texel_color(g.width - 1, g.height - 1), [1.0, 1.0, 1.0]);
        // Last texel of the first slice: full red, no blue.
        assert_eq!(g.texel_color(3, 0), [1.0, 0.0, 0.0]);
        // First texel of the last slice: full blue.
        assert_eq!(g.texel_color(12, 0), [0.0, 0.0, 1.0]);
    }
}
