//! The color grading LUT pass.
//!
//! Owns the LUT builder program for the lifetime of the pass, records one
//! full-screen draw per frame that bakes the resolved settings into a
//! strip LUT, publishes the result as frame-global bindings, and releases
//! the scratch texture at frame end.
//!
//! Frame order:
//! ```text
//! render_lut → push_global_parameters → (passes sampling the LUT) → on_finish_rendering
//! ```
//!
//! If the builder program is missing at construction, or the backend later
//! fails to allocate the LUT or compile the program, the pass is disabled
//! for the rest of its lifetime and every per-frame call is a no-op. A
//! disabled pass never publishes the LUT binding.

use glam::{Mat4, Vec4};

use crate::config::LutRendererConfig;
use crate::error::LutError;
use crate::grading::settings::{AdjustmentSettings, ConfigurationSnapshot};
use crate::lut::geometry::LutGeometry;
use crate::render::draw::{DrawParameters, gpu_projection_matrix, pack_hue_sat_con};
use crate::render::property::ShaderProperty;
use crate::render::recorder::{CommandRecorder, ShaderLibrary, ShaderProgram, TextureDesc, TextureId};

/// Library name of the LUT builder program.
pub const LUT_BUILDER_SHADER: &str = "Hidden/RetroLut/ColorGradingLUTBuilder";

/// Bakes color adjustments and curves into a strip LUT once per frame.
pub struct ColorGradingLutRenderer {
    program: Option<ShaderProgram>,
    lut_size: u32,
    lut_id: TextureId,
    /// Whether the scratch texture is allocated for the current frame.
    lut_allocated: bool,
}

impl ColorGradingLutRenderer {
    /// Load the builder program from `library`.
    ///
    /// A missing program or an edge size outside `2..=MAX_LUT_SIZE` is
    /// logged once and disables the pass.
    pub fn new(library: &impl ShaderLibrary, config: &LutRendererConfig) -> Self {
        let loaded = LutGeometry::try_new(config.lut_size)
            .and_then(|_| load_program(library, LUT_BUILDER_SHADER));
        let program = match loaded {
            Ok(program) => {
                tracing::debug!("Loaded LUT builder program {}", program.name);
                Some(program)
            }
            Err(e) => {
                tracing::error!("{e}. ColorGradingLutRenderer will not execute.");
                None
            }
        };

        Self {
            program,
            lut_size: config.lut_size,
            lut_id: TextureId::from(ShaderProperty::ColorGradingLut),
            lut_allocated: false,
        }
    }

    /// Whether the builder program loaded and the pass will run.
    pub fn is_enabled(&self) -> bool {
        self.program.is_some()
    }

    /// Identifier of the LUT texture.
    pub fn lut_id(&self) -> TextureId {
        self.lut_id
    }

    pub fn lut_size(&self) -> u32 {
        self.lut_size
    }

    /// Geometry for the configured edge size, or `None` if the size is invalid.
    pub fn geometry(&self) -> Option<LutGeometry> {
        LutGeometry::try_new(self.lut_size).ok()
    }

    /// Record the LUT bake for this frame.
    ///
    /// If the recorder cannot allocate the LUT or record the draw, the pass
    /// disables itself and publishes nothing from then on.
    pub fn render_lut(&mut self, recorder: &mut impl CommandRecorder, snapshot: &ConfigurationSnapshot) {
        let (Some(program), Some(geometry)) = (self.program.as_ref(), self.geometry()) else {
            return;
        };
        let _span = tracing::debug_span!("color_grading_lut").entered();

        let desc = TextureDesc::lut(geometry.width, geometry.height);
        if !recorder.get_temporary_texture(self.lut_id, &desc) {
            self.disable(&format!(
                "Could not allocate {}x{} {}",
                geometry.width, geometry.height, self.lut_id.0
            ));
            return;
        }
        self.lut_allocated = true;

        let params = build_draw_parameters(&geometry, snapshot);
        if !recorder.draw_fullscreen(self.lut_id, program, &params) {
            self.disable(&format!("{LUT_BUILDER_SHADER} could not be drawn"));
            return;
        }
        tracing::trace!("Recorded LUT bake {}x{}", geometry.width, geometry.height);
    }

    /// Publish the LUT, its sampling constants, and the blend intensity.
    ///
    /// Call after [`Self::render_lut`] and before any pass that samples color.
    pub fn push_global_parameters(&self, recorder: &mut impl CommandRecorder, adjustments: &AdjustmentSettings) {
        let Some(geometry) = self.geometry().filter(|_| self.is_enabled()) else {
            return;
        };

        recorder.set_global_float(ShaderProperty::Intensity, adjustments.intensity);
        recorder.set_global_vector(ShaderProperty::ColorGradingLutParams, geometry.inverse_params());
        recorder.set_global_texture(ShaderProperty::ColorGradingLut, self.lut_id);
        tracing::trace!("Published {}", ShaderProperty::ColorGradingLut);
    }

    /// Release the frame's scratch texture.
    pub fn on_finish_rendering(&mut self, recorder: &mut impl CommandRecorder) {
        if self.lut_allocated {
            recorder.release_temporary_texture(self.lut_id);
            self.lut_allocated = false;
        }
    }

    /// Release the builder program. Later calls are no-ops.
    pub fn cleanup(&mut self) {
        if let Some(program) = self.program.take() {
            tracing::debug!("Released LUT builder program {}", program.name);
        }
    }

    fn disable(&mut self, reason: &str) {
        if self.program.take().is_some() {
            tracing::error!("{reason}. ColorGradingLutRenderer will not execute.");
        }
    }
}

fn load_program(library: &impl ShaderLibrary, name: &str) -> Result<ShaderProgram, LutError> {
    library.find(name).ok_or_else(|| LutError::MissingResource {
        name: name.to_string(),
    })
}

/// Pack geometry, adjustments and baked curves for the builder draw.
pub fn build_draw_parameters(geometry: &LutGeometry, snapshot: &ConfigurationSnapshot) -> DrawParameters {
    let adjustments = &snapshot.adjustments;
    let curves = &snapshot.curves;
    let [r, g, b] = adjustments.linear_color_filter();

    DrawParameters::builder()
        .vector(ShaderProperty::LutParams, geometry.lut_params())
        .vector(ShaderProperty::ColorFilter, Vec4::new(r, g, b, 1.0))
        .vector(ShaderProperty::HueSatCon, pack_hue_sat_con(adjustments))
        // YRGB curves
        .curve(ShaderProperty::CurveMaster, curves.master.bake())
        .curve(ShaderProperty::CurveRed, curves.red.bake())
        .curve(ShaderProperty::CurveGreen, curves.green.bake())
        .curve(ShaderProperty::CurveBlue, curves.blue.bake())
        // Secondary curves
        .curve(ShaderProperty::CurveHueVsHue, curves.hue_vs_hue.bake())
        .curve(ShaderProperty::CurveHueVsSat, curves.hue_vs_sat.bake())
        .curve(ShaderProperty::CurveLumVsSat, curves.lum_vs_sat.bake())
        .curve(ShaderProperty::CurveSatVsSat, curves.sat_vs_sat.bake())
        .matrix(ShaderProperty::FullscreenProjMat, gpu_projection_matrix(Mat4::IDENTITY, true))
        .build()
}
