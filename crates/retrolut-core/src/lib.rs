//! RetroLut Core — CPU side of the color grading LUT pass.
//!
//! This crate owns the settings model, curve baking, the layered volume
//! stack, LUT geometry, and the renderer that records the LUT bake through
//! a [`render::recorder::CommandRecorder`]. No GPU dependency; the wgpu
//! backend lives in `retrolut-gpu`.

pub mod config;
pub mod error;
pub mod grading;
pub mod lut;
pub mod render;

// Re-exports for convenience.
pub use config::LutRendererConfig;
pub use error::LutError;
pub use grading::settings::{AdjustmentSettings, ConfigurationSnapshot, CurveSettings};
pub use lut::geometry::LutGeometry;
pub use lut::renderer::ColorGradingLutRenderer;
pub use render::draw::DrawParameters;
pub use render::property::ShaderProperty;
pub use render::recorder::{CommandRecorder, ShaderLibrary, ShaderProgram, TextureDesc, TextureId};
