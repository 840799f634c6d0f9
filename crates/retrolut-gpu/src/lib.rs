//! RetroLut GPU — wgpu backend for the color grading LUT pass.
//!
//! Implements `retrolut_core::CommandRecorder` on wgpu: temporary render
//! targets, the LUT builder render pipeline, curve texture upload, and the
//! frame-global bindings later passes read.

pub mod backend;
pub mod error;
pub mod pipeline;
pub mod readback;
pub mod shaders;
pub mod transient;
pub mod uniforms;

pub use backend::{FrameRecorder, GpuBackend};
pub use error::GpuError;
pub use shaders::EmbeddedShaderLibrary;
pub use transient::TransientTexture;
