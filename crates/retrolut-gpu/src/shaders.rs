//! Shader programs compiled into the binary.

use retrolut_core::lut::renderer::LUT_BUILDER_SHADER;
use retrolut_core::{ShaderLibrary, ShaderProgram};

/// WGSL source of the LUT builder.
pub const LUT_BUILDER_WGSL: &str = include_str!("../shaders/lut_builder.wgsl");

/// [`ShaderLibrary`] over the programs shipped with this crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbeddedShaderLibrary;

impl ShaderLibrary for EmbeddedShaderLibrary {
    fn find(&self, name: &str) -> Option<ShaderProgram> {
        match name {
            LUT_BUILDER_SHADER => Some(ShaderProgram {
                name: LUT_BUILDER_SHADER.into(),
                source: LUT_BUILDER_WGSL.into(),
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_lut_builder() {
        let program = EmbeddedShaderLibrary.find(LUT_BUILDER_SHADER).unwrap();
        assert!(program.source.contains("fn fs_main"));
        assert!(EmbeddedShaderLibrary.find("Hidden/Unknown").is_none());
    }
}
