//! Well-known shader binding names used by the LUT pass and its consumers.

/// Every shader-facing property the LUT pass reads or publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShaderProperty {
    /// The LUT texture itself. Also the identifier of the scratch texture.
    ColorGradingLut,
    /// Sampler-side `(1/width, 1/height, height−1, 0)`.
    ColorGradingLutParams,
    /// Generator-side `(height, half_texel_u, half_texel_v, scale)`.
    LutParams,
    FullscreenProjMat,

    // Color adjustments
    ColorFilter,
    HueSatCon,
    Intensity,

    // YRGB curves
    CurveMaster,
    CurveRed,
    CurveGreen,
    CurveBlue,

    // Secondary curves
    CurveHueVsHue,
    CurveHueVsSat,
    CurveLumVsSat,
    CurveSatVsSat,
}

impl ShaderProperty {
    /// The eight curve slots, in shader binding order.
    pub const CURVES: [ShaderProperty; 8] = [
        Self::CurveMaster,
        Self::CurveRed,
        Self::CurveGreen,
        Self::CurveBlue,
        Self::CurveHueVsHue,
        Self::CurveHueVsSat,
        Self::CurveLumVsSat,
        Self::CurveSatVsSat,
    ];

    /// Binding name as seen by shaders.
    pub const fn name(self) -> &'static str {
        match self {
            Self::ColorGradingLut => "_ColorGradingLUT",
            Self::ColorGradingLutParams => "_ColorGradingLUTParams",
            Self::LutParams => "_Lut_Params",
            Self::FullscreenProjMat => "_FullscreenProjMat",
            Self::ColorFilter => "_ColorFilter",
            Self::HueSatCon => "_HueSatCon",
            Self::Intensity => "_Intensity",
            Self::CurveMaster => "_CurveMaster",
            Self::CurveRed => "_CurveRed",
            Self::CurveGreen => "_CurveGreen",
            Self::CurveBlue => "_CurveBlue",
            Self::CurveHueVsHue => "_CurveHueVsHue",
            Self::CurveHueVsSat => "_CurveHueVsSat",
            Self::CurveLumVsSat => "_CurveLumVsSat",
            Self::CurveSatVsSat => "_CurveSatVsSat",
        }
    }
}

impl std::fmt::Display for ShaderProperty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
