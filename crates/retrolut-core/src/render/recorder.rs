//! Command-recording seam between the LUT pass and a rendering backend.
//!
//! The pass never touches GPU objects directly. It records allocations,
//! draws and global bindings through [`CommandRecorder`]; `retrolut-gpu`
//! implements it on wgpu, tests implement it with a plain event log.

use std::borrow::Cow;
use std::collections::BTreeMap;

use glam::Vec4;

use crate::render::draw::DrawParameters;
use crate::render::property::ShaderProperty;

/// Identifier of a frame-scoped texture. Same identifier every frame; the
/// contents are fully rewritten each time it is allocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub ShaderProperty);

impl From<ShaderProperty> for TextureId {
    fn from(property: ShaderProperty) -> Self {
        Self(property)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    /// 8 bits per channel, unsigned normalized RGBA.
    Rgba8Unorm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterMode {
    Bilinear,
}

/// Description of a temporary 2D render target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureDesc {
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
    pub filter: FilterMode,
    /// Always 1 for the LUT; kept explicit so pooled targets match exactly.
    pub sample_count: u32,
}

impl TextureDesc {
    /// Single-sampled, bilinear RGBA8 target.
    pub fn lut(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            format: TextureFormat::Rgba8Unorm,
            filter: FilterMode::Bilinear,
            sample_count: 1,
        }
    }
}

/// A loaded shader program. Backends compile `source` on first use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderProgram {
    pub name: Cow<'static, str>,
    /// WGSL source.
    pub source: Cow<'static, str>,
}

/// Looks shader programs up by name.
pub trait ShaderLibrary {
    fn find(&self, name: &str) -> Option<ShaderProgram>;
}

/// Records rendering commands for one frame, in order.
pub trait CommandRecorder {
    /// Allocate (or reuse) a temporary texture under `id`. Returns `false`
    /// when the backend cannot create a texture matching `desc`.
    fn get_temporary_texture(&mut self, id: TextureId, desc: &TextureDesc) -> bool;

    /// Release the temporary texture bound to `id`.
    fn release_temporary_texture(&mut self, id: TextureId);

    /// Full-screen draw of `program` into `target` with `params`. Returns
    /// `false` when nothing was recorded, e.g. the program failed to compile.
    fn draw_fullscreen(&mut self, target: TextureId, program: &ShaderProgram, params: &DrawParameters) -> bool;

    fn set_global_float(&mut self, property: ShaderProperty, value: f32);

    fn set_global_vector(&mut self, property: ShaderProperty, value: Vec4);

    fn set_global_texture(&mut self, property: ShaderProperty, texture: TextureId);
}

/// Frame-global shader bindings visible to every later pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlobalBindings {
    floats: BTreeMap<ShaderProperty, f32>,
    vectors: BTreeMap<ShaderProperty, Vec4>,
    textures: BTreeMap<ShaderProperty, TextureId>,
}

impl GlobalBindings {
    pub fn set_float(&mut self, property: ShaderProperty, value: f32) {
        self.floats.insert(property, value);
    }

    pub fn set_vector(&mut self, property: ShaderProperty, value: Vec4) {
        self.vectors.insert(property, value);
    }

    pub fn set_texture(&mut self, property: ShaderProperty, texture: TextureId) {
        self.textures.insert(property, texture);
    }

    pub fn float(&self, property: ShaderProperty) -> Option<f32> {
        self.floats.get(&property).copied()
    }

    pub fn vector(&self, property: ShaderProperty) -> Option<Vec4> {
        self.vectors.get(&property).copied()
    }

    pub fn texture(&self, property: ShaderProperty) -> Option<TextureId> {
        self.textures.get(&property).copied()
    }

    /// Drop texture bindings that point at `id`.
    pub fn unbind_texture(&mut self, id: TextureId) {
        self.textures.retain(|_, bound| *bound != id);
    }

    pub fn is_empty(&self) -> bool {
        self.floats.is_empty() && self.vectors.is_empty() && self.textures.is_empty()
    }
}
